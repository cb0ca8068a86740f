//! Employee imprest accounting entities

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Approval status codes on an imprest entry.
pub const IMPREST_PENDING: i32 = 0;
pub const IMPREST_APPROVED: i32 = 1;
pub const IMPREST_REJECTED: i32 = 2;

#[derive(Debug, Clone, Serialize)]
pub struct ImprestEntry {
    pub id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub approval_status: i32,
    pub project_name: Option<String>,
    pub remarks: Option<String>,
    pub approved_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImprestTransaction {
    pub id: i64,
    pub user_id: i64,
    pub team_member_name: Option<String>,
    pub txn_date: NaiveDate,
    pub amount: Decimal,
    pub project_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImprestVoucher {
    pub id: i64,
    pub voucher_code: String,
    pub beneficiary_name: String,
    pub amount: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Per-employee rollup:
/// spent = all entries, approved = entries with approval_status approved,
/// received = all transactions, left = approved - received.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeImprestSummary {
    pub user_id: i64,
    pub user_name: String,
    pub amount_spent: Decimal,
    pub amount_approved: Decimal,
    pub amount_received: Decimal,
    pub amount_left: Decimal,
}
