//! Tender domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Tender {
    pub id: i64,
    pub tender_no: String,
    pub tender_name: String,
    pub client_name: Option<String>,
    pub project_name: Option<String>,
    pub team_member: Option<i64>,
    pub team_id: Option<i64>,
    pub status_id: i32,
    pub item_id: Option<i64>,
    pub due_date: Option<DateTime<Utc>>,
    pub emd_amount: Option<Decimal>,
    pub gst_values: Option<Decimal>,
    pub emd_required: bool,
    pub is_approved: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Row shape for dashboard listings (tender joined with master data).
#[derive(Debug, Clone, Serialize)]
pub struct TenderRow {
    pub id: i64,
    pub tender_no: String,
    pub tender_name: String,
    pub team_member: Option<i64>,
    pub team_member_name: Option<String>,
    pub status_id: i32,
    pub status_name: Option<String>,
    pub item_name: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub emd_amount: Option<Decimal>,
    pub updated_at: DateTime<Utc>,
}
