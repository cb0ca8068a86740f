//! PostgreSQL tender repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::error;

use tms_shared::types::Pagination;

use tms_core::dashboard::{bucket_for_status, FieldCondition, TenderBucket};
use tms_core::domain::{Tender, TenderRow};
use tms_core::error::DomainError;
use tms_core::repositories::{BucketCount, TabQuery, TenderRepository};

pub struct PgTenderRepository {
    pool: PgPool,
}

impl PgTenderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

#[derive(Debug, FromRow)]
struct TenderFullRow {
    id: i64,
    tender_no: String,
    tender_name: String,
    client_name: Option<String>,
    project_name: Option<String>,
    team_member: Option<i64>,
    team_id: Option<i64>,
    status_id: i32,
    item_id: Option<i64>,
    due_date: Option<DateTime<Utc>>,
    emd_amount: Option<Decimal>,
    gst_values: Option<Decimal>,
    emd_required: bool,
    is_approved: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<TenderFullRow> for Tender {
    fn from(row: TenderFullRow) -> Self {
        Tender {
            id: row.id,
            tender_no: row.tender_no,
            tender_name: row.tender_name,
            client_name: row.client_name,
            project_name: row.project_name,
            team_member: row.team_member,
            team_id: row.team_id,
            status_id: row.status_id,
            item_id: row.item_id,
            due_date: row.due_date,
            emd_amount: row.emd_amount,
            gst_values: row.gst_values,
            emd_required: row.emd_required,
            is_approved: row.is_approved,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ListRow {
    id: i64,
    tender_no: String,
    tender_name: String,
    team_member: Option<i64>,
    team_member_name: Option<String>,
    status_id: i32,
    status_name: Option<String>,
    item_name: Option<String>,
    due_date: Option<DateTime<Utc>>,
    emd_amount: Option<Decimal>,
    updated_at: DateTime<Utc>,
}

fn sort_column(sort_by: &str) -> &'static str {
    match sort_by {
        "updated_at" => "t.updated_at",
        "tender_no" => "t.tender_no",
        "tender_name" => "t.tender_name",
        "emd_amount" => "t.emd_amount",
        _ => "t.due_date",
    }
}

fn push_tab_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &TabQuery) {
    builder.push(" WHERE t.deleted_at IS NULL AND t.is_active = TRUE");

    if !query.status_ids.is_empty() {
        builder.push(" AND t.status_id = ANY(").push_bind(query.status_ids.clone()).push(")");
    }

    if let Some(team_id) = query.team_id {
        builder.push(" AND t.team_id = ").push_bind(team_id);
    }

    if let Some(search) = query.search.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        builder
            .push(" AND (t.tender_no ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR t.tender_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    for condition in &query.field_conditions {
        match condition {
            FieldCondition::IsNull(field) => {
                builder.push(" AND ").push(field.column()).push(" IS NULL");
            }
            FieldCondition::IsNotNull(field) => {
                builder.push(" AND ").push(field.column()).push(" IS NOT NULL");
            }
        }
    }
}

#[async_trait]
impl TenderRepository for PgTenderRepository {
    async fn find(&self, id: i64) -> Result<Option<Tender>, DomainError> {
        let row: Option<TenderFullRow> = sqlx::query_as(
            r#"
            SELECT id, tender_no, tender_name, client_name, project_name, team_member, team_id,
                   status_id, item_id, due_date, emd_amount, gst_values, emd_required,
                   is_approved, is_active, created_at, updated_at, deleted_at
            FROM tenders
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("finding tender", e))?;

        Ok(row.map(Into::into))
    }

    async fn list_tab(
        &self,
        query: &TabQuery,
        pagination: &Pagination,
    ) -> Result<(Vec<TenderRow>, i64), DomainError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT t.id, t.tender_no, t.tender_name, t.team_member, u.name AS team_member_name,
                   t.status_id, s.name AS status_name, i.name AS item_name, t.due_date,
                   t.emd_amount, t.updated_at
            FROM tenders t
            LEFT JOIN users u ON u.id = t.team_member
            LEFT JOIN statuses s ON s.id = t.status_id
            LEFT JOIN items i ON i.id = t.item_id
            "#,
        );
        push_tab_filters(&mut builder, query);
        builder
            .push(" ORDER BY ")
            .push(sort_column(&query.sort_by))
            .push(if query.sort_desc { " DESC" } else { " ASC" })
            .push(" NULLS LAST LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let rows: Vec<ListRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_err("listing dashboard tab", e))?;

        let mut count_builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM tenders t");
        push_tab_filters(&mut count_builder, query);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_err("counting dashboard tab", e))?;

        let data = rows
            .into_iter()
            .map(|r| TenderRow {
                id: r.id,
                tender_no: r.tender_no,
                tender_name: r.tender_name,
                team_member: r.team_member,
                team_member_name: r.team_member_name,
                status_id: r.status_id,
                status_name: r.status_name,
                item_name: r.item_name,
                due_date: r.due_date,
                emd_amount: r.emd_amount,
                updated_at: r.updated_at,
            })
            .collect();

        Ok((data, total))
    }

    async fn bucket_counts(&self, team_id: Option<i64>) -> Result<Vec<BucketCount>, DomainError> {
        #[derive(FromRow)]
        struct StatusCount {
            status_id: i32,
            count: i64,
        }

        let rows: Vec<StatusCount> = sqlx::query_as(
            r#"
            SELECT status_id, COUNT(*) AS count
            FROM tenders
            WHERE deleted_at IS NULL AND is_active = TRUE
              AND ($1::bigint IS NULL OR team_id = $1)
            GROUP BY status_id
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("counting tender buckets", e))?;

        let mut counts: Vec<BucketCount> = TenderBucket::ALL
            .iter()
            .map(|bucket| BucketCount { bucket: *bucket, count: 0 })
            .collect();
        for row in rows {
            if let Some(bucket) = bucket_for_status(row.status_id) {
                if let Some(entry) = counts.iter_mut().find(|c| c.bucket == bucket) {
                    entry.count += row.count;
                }
            }
        }

        Ok(counts)
    }
}
