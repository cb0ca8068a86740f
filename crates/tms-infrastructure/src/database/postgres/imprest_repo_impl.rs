//! PostgreSQL imprest repository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::error;

use tms_shared::types::Pagination;

use tms_core::domain::{
    EmployeeImprestSummary, ImprestEntry, ImprestTransaction, ImprestVoucher,
};
use tms_core::error::DomainError;
use tms_core::repositories::ImprestRepository;

pub struct PgImprestRepository {
    pool: PgPool,
}

impl PgImprestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

#[derive(Debug, FromRow)]
struct EntryRow {
    id: i64,
    user_id: i64,
    amount: Decimal,
    approval_status: i32,
    project_name: Option<String>,
    remarks: Option<String>,
    approved_by: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EntryRow> for ImprestEntry {
    fn from(row: EntryRow) -> Self {
        ImprestEntry {
            id: row.id,
            user_id: row.user_id,
            amount: row.amount,
            approval_status: row.approval_status,
            project_name: row.project_name,
            remarks: row.remarks,
            approved_by: row.approved_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ImprestRepository for PgImprestRepository {
    async fn employee_summary(&self) -> Result<Vec<EmployeeImprestSummary>, DomainError> {
        #[derive(FromRow)]
        struct SummaryRow {
            user_id: i64,
            user_name: String,
            amount_spent: Option<Decimal>,
            amount_approved: Option<Decimal>,
            amount_received: Option<Decimal>,
        }

        // Transactions are aggregated separately so the imprest join cannot
        // fan them out.
        let rows: Vec<SummaryRow> = sqlx::query_as(
            r#"
            SELECT
                i.user_id,
                u.name AS user_name,
                COALESCE(SUM(i.amount), 0) AS amount_spent,
                COALESCE(SUM(CASE WHEN i.approval_status = 1 THEN i.amount ELSE 0 END), 0)
                    AS amount_approved,
                COALESCE(t.received, 0) AS amount_received
            FROM employee_imprests i
            INNER JOIN users u ON u.id = i.user_id
            LEFT JOIN (
                SELECT user_id, SUM(amount) AS received
                FROM employee_imprest_transactions
                GROUP BY user_id
            ) t ON t.user_id = i.user_id
            GROUP BY i.user_id, u.name, t.received
            ORDER BY u.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("summarising imprests", e))?;

        Ok(rows
            .into_iter()
            .map(|r| {
                let approved = r.amount_approved.unwrap_or_default();
                let received = r.amount_received.unwrap_or_default();
                EmployeeImprestSummary {
                    user_id: r.user_id,
                    user_name: r.user_name,
                    amount_spent: r.amount_spent.unwrap_or_default(),
                    amount_approved: approved,
                    amount_received: received,
                    amount_left: approved - received,
                }
            })
            .collect())
    }

    async fn transactions_for(
        &self,
        user_id: i64,
    ) -> Result<Vec<ImprestTransaction>, DomainError> {
        #[derive(FromRow)]
        struct TxnRow {
            id: i64,
            user_id: i64,
            team_member_name: Option<String>,
            txn_date: NaiveDate,
            amount: Decimal,
            project_name: Option<String>,
            created_at: DateTime<Utc>,
        }

        let rows: Vec<TxnRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, team_member_name, txn_date, amount, project_name, created_at
            FROM employee_imprest_transactions
            WHERE user_id = $1
            ORDER BY txn_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("listing imprest transactions", e))?;

        Ok(rows
            .into_iter()
            .map(|r| ImprestTransaction {
                id: r.id,
                user_id: r.user_id,
                team_member_name: r.team_member_name,
                txn_date: r.txn_date,
                amount: r.amount,
                project_name: r.project_name,
                created_at: r.created_at,
            })
            .collect())
    }

    async fn list_vouchers(
        &self,
        beneficiary_user_id: Option<i64>,
        pagination: &Pagination,
    ) -> Result<(Vec<ImprestVoucher>, i64), DomainError> {
        #[derive(FromRow)]
        struct VoucherRow {
            id: i64,
            voucher_code: String,
            beneficiary_name: String,
            amount: Decimal,
            status: String,
            created_at: DateTime<Utc>,
        }

        let beneficiary = beneficiary_user_id.map(|id| id.to_string());

        let rows: Vec<VoucherRow> = sqlx::query_as(
            r#"
            SELECT id, voucher_code, beneficiary_name, amount, status, created_at
            FROM employee_imprest_vouchers
            WHERE ($1::varchar IS NULL OR beneficiary_name = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&beneficiary)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("listing imprest vouchers", e))?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM employee_imprest_vouchers \
             WHERE ($1::varchar IS NULL OR beneficiary_name = $1)",
        )
        .bind(&beneficiary)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("counting imprest vouchers", e))?;

        Ok((
            rows.into_iter()
                .map(|r| ImprestVoucher {
                    id: r.id,
                    voucher_code: r.voucher_code,
                    beneficiary_name: r.beneficiary_name,
                    amount: r.amount,
                    status: r.status,
                    created_at: r.created_at,
                })
                .collect(),
            total,
        ))
    }

    async fn find_entry(&self, id: i64) -> Result<Option<ImprestEntry>, DomainError> {
        let row: Option<EntryRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, amount, approval_status, project_name, remarks, approved_by,
                   created_at, updated_at
            FROM employee_imprests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("finding imprest entry", e))?;

        Ok(row.map(Into::into))
    }

    async fn set_approval(
        &self,
        id: i64,
        approval_status: i32,
        approved_by: i64,
    ) -> Result<ImprestEntry, DomainError> {
        let row: EntryRow = sqlx::query_as(
            r#"
            UPDATE employee_imprests
            SET approval_status = $2, approved_by = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, amount, approval_status, project_name, remarks, approved_by,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(approval_status)
        .bind(approved_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("updating imprest approval", e))?;

        Ok(row.into())
    }
}
