//! PostgreSQL courier repository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::error;

use tms_shared::types::Pagination;

use tms_core::domain::{Courier, CourierStatus};
use tms_core::error::DomainError;
use tms_core::repositories::{CourierRepository, NewCourier};

pub struct PgCourierRepository {
    pool: PgPool,
}

impl PgCourierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

#[derive(Debug, FromRow)]
struct CourierRow {
    id: i64,
    user_id: i64,
    to_org: String,
    to_name: String,
    to_addr: String,
    to_pin: String,
    to_mobile: String,
    emp_from: String,
    urgency: String,
    expected_delivery_date: NaiveDate,
    status: i32,
    docs: Value,
    courier_provider: Option<String>,
    docket_no: Option<String>,
    pickup_date: Option<NaiveDate>,
    delivery_date: Option<NaiveDate>,
    delivery_pod: Option<String>,
    within_time: Option<bool>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CourierRow> for Courier {
    fn from(row: CourierRow) -> Self {
        Courier {
            id: row.id,
            user_id: row.user_id,
            to_org: row.to_org,
            to_name: row.to_name,
            to_addr: row.to_addr,
            to_pin: row.to_pin,
            to_mobile: row.to_mobile,
            emp_from: row.emp_from,
            urgency: row.urgency,
            expected_delivery_date: row.expected_delivery_date,
            status: CourierStatus::from_code(row.status).unwrap_or(CourierStatus::Pending),
            docs: serde_json::from_value(row.docs).unwrap_or_default(),
            courier_provider: row.courier_provider,
            docket_no: row.docket_no,
            pickup_date: row.pickup_date,
            delivery_date: row.delivery_date,
            delivery_pod: row.delivery_pod,
            within_time: row.within_time,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const COURIER_COLUMNS: &str = "id, user_id, to_org, to_name, to_addr, to_pin, to_mobile, \
                               emp_from, urgency, expected_delivery_date, status, docs, \
                               courier_provider, docket_no, pickup_date, delivery_date, \
                               delivery_pod, within_time, created_at, updated_at";

#[async_trait]
impl CourierRepository for PgCourierRepository {
    async fn create(&self, courier: &NewCourier) -> Result<Courier, DomainError> {
        let docs = serde_json::to_value(&courier.docs)
            .map_err(|e| DomainError::InternalError(e.to_string()))?;

        let row: CourierRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO couriers
                (user_id, to_org, to_name, to_addr, to_pin, to_mobile, emp_from, urgency,
                 expected_delivery_date, status, docs)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 0, $10)
            RETURNING {COURIER_COLUMNS}
            "#
        ))
        .bind(courier.user_id)
        .bind(&courier.to_org)
        .bind(&courier.to_name)
        .bind(&courier.to_addr)
        .bind(&courier.to_pin)
        .bind(&courier.to_mobile)
        .bind(&courier.emp_from)
        .bind(&courier.urgency)
        .bind(courier.expected_delivery_date)
        .bind(docs)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("creating courier", e))?;

        Ok(row.into())
    }

    async fn find(&self, id: i64) -> Result<Option<Courier>, DomainError> {
        let row: Option<CourierRow> = sqlx::query_as(&format!(
            "SELECT {COURIER_COLUMNS} FROM couriers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("finding courier", e))?;

        Ok(row.map(Into::into))
    }

    async fn update(&self, courier: &Courier) -> Result<Courier, DomainError> {
        let docs = serde_json::to_value(&courier.docs)
            .map_err(|e| DomainError::InternalError(e.to_string()))?;

        let row: CourierRow = sqlx::query_as(&format!(
            r#"
            UPDATE couriers SET
                status = $2,
                docs = $3,
                courier_provider = $4,
                docket_no = $5,
                pickup_date = $6,
                delivery_date = $7,
                delivery_pod = $8,
                within_time = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COURIER_COLUMNS}
            "#
        ))
        .bind(courier.id)
        .bind(courier.status.code())
        .bind(docs)
        .bind(&courier.courier_provider)
        .bind(&courier.docket_no)
        .bind(courier.pickup_date)
        .bind(courier.delivery_date)
        .bind(&courier.delivery_pod)
        .bind(courier.within_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("updating courier", e))?;

        Ok(row.into())
    }

    async fn list(
        &self,
        user_id: Option<i64>,
        pagination: &Pagination,
    ) -> Result<(Vec<Courier>, i64), DomainError> {
        let rows: Vec<CourierRow> = sqlx::query_as(&format!(
            r#"
            SELECT {COURIER_COLUMNS} FROM couriers
            WHERE ($1::bigint IS NULL OR user_id = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("listing couriers", e))?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM couriers WHERE ($1::bigint IS NULL OR user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("counting couriers", e))?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }
}
