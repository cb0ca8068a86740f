//! PostgreSQL follow-up repository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::error;

use tms_shared::types::{Pagination, SortOrder};

use tms_core::domain::{FollowUp, FollowUpContact, FollowUpTab, Frequency, StopReason};
use tms_core::error::DomainError;
use tms_core::repositories::{
    FollowUpAmountSummary, FollowUpListFilter, FollowUpRepository, NewFollowUp,
};

pub struct PgFollowUpRepository {
    pool: PgPool,
}

impl PgFollowUpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

#[derive(Debug, FromRow)]
struct FollowUpRow {
    id: i64,
    area: String,
    party_name: String,
    amount: Decimal,
    assigned_to_id: i64,
    created_by_id: i64,
    assignment_status: String,
    details: Option<String>,
    latest_comment: Option<String>,
    frequency: String,
    start_from: NaiveDate,
    reminder_count: i32,
    stop_reason: Option<String>,
    proof_text: Option<String>,
    proof_image_path: Option<String>,
    stop_remarks: Option<String>,
    contacts: Value,
    attachments: Value,
    instrument_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<FollowUpRow> for FollowUp {
    fn from(row: FollowUpRow) -> Self {
        FollowUp {
            id: row.id,
            area: row.area,
            party_name: row.party_name,
            amount: row.amount,
            assigned_to_id: row.assigned_to_id,
            created_by_id: row.created_by_id,
            assignment_status: row.assignment_status,
            details: row.details,
            latest_comment: row.latest_comment,
            frequency: Frequency::from_str(&row.frequency).unwrap_or(Frequency::Daily),
            start_from: row.start_from,
            reminder_count: row.reminder_count,
            stop_reason: row.stop_reason.as_deref().and_then(StopReason::from_str),
            proof_text: row.proof_text,
            proof_image_path: row.proof_image_path,
            stop_remarks: row.stop_remarks,
            contacts: serde_json::from_value(row.contacts).unwrap_or_default(),
            attachments: serde_json::from_value(row.attachments).unwrap_or_default(),
            instrument_id: row.instrument_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

const FOLLOW_UP_COLUMNS: &str = "id, area, party_name, amount, assigned_to_id, created_by_id, \
                                 assignment_status, details, latest_comment, frequency, \
                                 start_from, reminder_count, stop_reason, proof_text, \
                                 proof_image_path, stop_remarks, contacts, attachments, \
                                 instrument_id, created_at, updated_at, deleted_at";

fn order_column(sort_by: Option<&str>) -> &'static str {
    match sort_by {
        Some("created_at") => "created_at",
        Some("updated_at") => "updated_at",
        Some("amount") => "amount",
        Some("party_name") => "party_name",
        _ => "start_from",
    }
}

fn push_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    filter: &FollowUpListFilter,
) {
    builder.push(" WHERE deleted_at IS NULL");

    if let Some(assigned_to_id) = filter.assigned_to_id {
        builder.push(" AND assigned_to_id = ").push_bind(assigned_to_id);
    }

    if let Some(search) = filter.search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        builder
            .push(" AND (party_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR area ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    match filter.tab {
        Some(FollowUpTab::Ongoing) => {
            builder.push(" AND frequency <> 'stopped'");
        }
        Some(FollowUpTab::Achieved) => {
            builder.push(" AND frequency = 'stopped'");
        }
        Some(FollowUpTab::Angry) => {
            builder.push(" AND frequency = 'stopped' AND stop_reason = 'party_angry'");
        }
        Some(FollowUpTab::Future) => {
            builder.push(" AND start_from > ").push_bind(filter.today);
        }
        None => {}
    }
}

#[async_trait]
impl FollowUpRepository for PgFollowUpRepository {
    async fn create(&self, follow_up: &NewFollowUp) -> Result<FollowUp, DomainError> {
        let contacts = serde_json::to_value(&follow_up.contacts)
            .map_err(|e| DomainError::InternalError(e.to_string()))?;

        let row: FollowUpRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO follow_ups
                (area, party_name, amount, assigned_to_id, created_by_id, latest_comment,
                 contacts, start_from, frequency, instrument_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'daily', $9)
            RETURNING {FOLLOW_UP_COLUMNS}
            "#
        ))
        .bind(&follow_up.area)
        .bind(&follow_up.party_name)
        .bind(follow_up.amount)
        .bind(follow_up.assigned_to_id)
        .bind(follow_up.created_by_id)
        .bind(&follow_up.comment)
        .bind(contacts)
        .bind(follow_up.start_from)
        .bind(follow_up.instrument_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("creating follow-up", e))?;

        Ok(row.into())
    }

    async fn find(&self, id: i64) -> Result<Option<FollowUp>, DomainError> {
        let row: Option<FollowUpRow> = sqlx::query_as(&format!(
            "SELECT {FOLLOW_UP_COLUMNS} FROM follow_ups WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("finding follow-up", e))?;

        Ok(row.map(Into::into))
    }

    async fn update(&self, follow_up: &FollowUp) -> Result<FollowUp, DomainError> {
        let contacts = serde_json::to_value(&follow_up.contacts)
            .map_err(|e| DomainError::InternalError(e.to_string()))?;
        let attachments = serde_json::to_value(&follow_up.attachments)
            .map_err(|e| DomainError::InternalError(e.to_string()))?;

        let row: FollowUpRow = sqlx::query_as(&format!(
            r#"
            UPDATE follow_ups SET
                area = $2,
                party_name = $3,
                amount = $4,
                assigned_to_id = $5,
                assignment_status = $6,
                details = $7,
                latest_comment = $8,
                frequency = $9,
                start_from = $10,
                reminder_count = $11,
                stop_reason = $12,
                proof_text = $13,
                proof_image_path = $14,
                stop_remarks = $15,
                contacts = $16,
                attachments = $17,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {FOLLOW_UP_COLUMNS}
            "#
        ))
        .bind(follow_up.id)
        .bind(&follow_up.area)
        .bind(&follow_up.party_name)
        .bind(follow_up.amount)
        .bind(follow_up.assigned_to_id)
        .bind(&follow_up.assignment_status)
        .bind(&follow_up.details)
        .bind(&follow_up.latest_comment)
        .bind(follow_up.frequency.as_str())
        .bind(follow_up.start_from)
        .bind(follow_up.reminder_count)
        .bind(follow_up.stop_reason.map(|r| r.as_str()))
        .bind(&follow_up.proof_text)
        .bind(&follow_up.proof_image_path)
        .bind(&follow_up.stop_remarks)
        .bind(contacts)
        .bind(attachments)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("updating follow-up", e))?;

        Ok(row.into())
    }

    async fn soft_delete(&self, id: i64) -> Result<(), DomainError> {
        sqlx::query("UPDATE follow_ups SET deleted_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("deleting follow-up", e))?;
        Ok(())
    }

    async fn list(
        &self,
        filter: &FollowUpListFilter,
        pagination: &Pagination,
    ) -> Result<(Vec<FollowUp>, i64), DomainError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {FOLLOW_UP_COLUMNS} FROM follow_ups"));
        push_filters(&mut builder, filter);

        let direction = filter.sort_order.unwrap_or(SortOrder::Desc);
        builder
            .push(" ORDER BY ")
            .push(order_column(filter.sort_by.as_deref()))
            .push(" ")
            .push(direction.as_sql())
            .push(" LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let rows: Vec<FollowUpRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("listing follow-ups", e))?;

        let mut count_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM follow_ups");
        push_filters(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("counting follow-ups", e))?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    async fn amount_summary(
        &self,
        assigned_to_id: Option<i64>,
    ) -> Result<Vec<FollowUpAmountSummary>, DomainError> {
        #[derive(FromRow)]
        struct SummaryRow {
            assigned_to_id: i64,
            total_amount: Option<Decimal>,
        }

        let rows: Vec<SummaryRow> = sqlx::query_as(
            r#"
            SELECT assigned_to_id, SUM(amount) AS total_amount
            FROM follow_ups
            WHERE deleted_at IS NULL
              AND ($1::bigint IS NULL OR assigned_to_id = $1)
            GROUP BY assigned_to_id
            "#,
        )
        .bind(assigned_to_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("summarising follow-up amounts", e))?;

        Ok(rows
            .into_iter()
            .map(|r| FollowUpAmountSummary {
                assigned_to_id: r.assigned_to_id,
                total_amount: r.total_amount.unwrap_or_default(),
            })
            .collect())
    }

    async fn due_candidates(&self, date: NaiveDate) -> Result<Vec<FollowUp>, DomainError> {
        let rows: Vec<FollowUpRow> = sqlx::query_as(&format!(
            r#"
            SELECT {FOLLOW_UP_COLUMNS} FROM follow_ups
            WHERE deleted_at IS NULL
              AND frequency <> 'stopped'
              AND start_from <= $1
            "#
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("loading due follow-ups", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn increment_reminder_count(&self, id: i64) -> Result<(), DomainError> {
        sqlx::query(
            "UPDATE follow_ups SET reminder_count = reminder_count + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("incrementing reminder count", e))?;
        Ok(())
    }

    async fn sync_directory_contact(
        &self,
        contact: &FollowUpContact,
    ) -> Result<(), DomainError> {
        let existing: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM client_directory
            WHERE ($1::varchar IS NOT NULL AND email = $1)
               OR ($2::varchar IS NOT NULL AND phone = $2)
            LIMIT 1
            "#,
        )
        .bind(&contact.email)
        .bind(&contact.phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("checking client directory", e))?;

        if existing.is_some() {
            return Ok(());
        }

        sqlx::query(
            "INSERT INTO client_directory (name, email, phone, organization) VALUES ($1, $2, $3, $4)",
        )
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.org)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("inserting client directory entry", e))?;

        Ok(())
    }
}
