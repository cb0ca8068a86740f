//! PostgreSQL costing sheet repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::error;

use tms_core::domain::{CostingApprovalRow, CostingSheet, CostingStatus};
use tms_core::error::DomainError;
use tms_core::repositories::CostingRepository;

pub struct PgCostingRepository {
    pool: PgPool,
}

impl PgCostingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

#[derive(Debug, FromRow)]
struct SheetRow {
    id: i64,
    tender_id: i64,
    status: String,
    sheet_url: Option<String>,
    approval_remarks: Option<String>,
    approved_by: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SheetRow> for CostingSheet {
    fn from(row: SheetRow) -> Self {
        CostingSheet {
            id: row.id,
            tender_id: row.tender_id,
            status: CostingStatus::from_str(&row.status).unwrap_or(CostingStatus::Pending),
            sheet_url: row.sheet_url,
            approval_remarks: row.approval_remarks,
            approved_by: row.approved_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl CostingRepository for PgCostingRepository {
    async fn approval_rows(&self, team_id: i64) -> Result<Vec<CostingApprovalRow>, DomainError> {
        #[derive(FromRow)]
        struct ApprovalRow {
            tender_id: i64,
            tender_no: String,
            tender_name: String,
            team_member: Option<i64>,
            team_member_name: Option<String>,
            item_name: Option<String>,
            status_name: Option<String>,
            due_date: Option<DateTime<Utc>>,
            emd_amount: Option<Decimal>,
            costing_sheet_id: i64,
            costing_status: String,
            sheet_url: Option<String>,
        }

        let rows: Vec<ApprovalRow> = sqlx::query_as(
            r#"
            SELECT
                t.id AS tender_id,
                t.tender_no,
                t.tender_name,
                t.team_member,
                u.name AS team_member_name,
                i.name AS item_name,
                s.name AS status_name,
                t.due_date,
                t.emd_amount,
                cs.id AS costing_sheet_id,
                cs.status AS costing_status,
                cs.sheet_url
            FROM tenders t
            INNER JOIN statuses s ON s.id = t.status_id
            INNER JOIN costing_sheets cs ON cs.tender_id = t.id
            LEFT JOIN items i ON i.id = t.item_id
            LEFT JOIN users u ON u.id = t.team_member
            WHERE t.deleted_at IS NULL
              AND t.is_active = TRUE
              AND t.is_approved = TRUE
              AND t.team_id = $1
              AND s.key NOT IN ('dnb', 'lost')
              AND cs.status IN ('Pending', 'Approved', 'Rejected/Redo')
            ORDER BY t.due_date ASC
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("loading costing approval rows", e))?;

        Ok(rows
            .into_iter()
            .map(|r| CostingApprovalRow {
                tender_id: r.tender_id,
                tender_no: r.tender_no,
                tender_name: r.tender_name,
                team_member: r.team_member,
                team_member_name: r.team_member_name,
                item_name: r.item_name,
                status_name: r.status_name,
                due_date: r.due_date,
                emd_amount: r.emd_amount,
                costing_sheet_id: r.costing_sheet_id,
                costing_status: CostingStatus::from_str(&r.costing_status)
                    .unwrap_or(CostingStatus::Pending),
                sheet_url: r.sheet_url,
            })
            .collect())
    }

    async fn find(&self, id: i64) -> Result<Option<CostingSheet>, DomainError> {
        let row: Option<SheetRow> = sqlx::query_as(
            r#"
            SELECT id, tender_id, status, sheet_url, approval_remarks, approved_by,
                   created_at, updated_at
            FROM costing_sheets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("finding costing sheet", e))?;

        Ok(row.map(Into::into))
    }

    async fn update_status(
        &self,
        id: i64,
        status: CostingStatus,
        remarks: Option<String>,
        approved_by: i64,
    ) -> Result<CostingSheet, DomainError> {
        let row: SheetRow = sqlx::query_as(
            r#"
            UPDATE costing_sheets
            SET status = $2, approval_remarks = $3, approved_by = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, tender_id, status, sheet_url, approval_remarks, approved_by,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(&remarks)
        .bind(approved_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("updating costing sheet", e))?;

        Ok(row.into())
    }
}
