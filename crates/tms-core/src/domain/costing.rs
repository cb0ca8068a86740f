//! Costing sheet entities

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostingStatus {
    Pending,
    Approved,
    RejectedRedo,
}

impl CostingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostingStatus::Pending => "Pending",
            CostingStatus::Approved => "Approved",
            CostingStatus::RejectedRedo => "Rejected/Redo",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(CostingStatus::Pending),
            "Approved" => Some(CostingStatus::Approved),
            "Rejected/Redo" => Some(CostingStatus::RejectedRedo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CostingSheet {
    pub id: i64,
    pub tender_id: i64,
    pub status: CostingStatus,
    pub sheet_url: Option<String>,
    pub approval_remarks: Option<String>,
    pub approved_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row for the team-leader approval dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct CostingApprovalRow {
    pub tender_id: i64,
    pub tender_no: String,
    pub tender_name: String,
    pub team_member: Option<i64>,
    pub team_member_name: Option<String>,
    pub item_name: Option<String>,
    pub status_name: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub emd_amount: Option<Decimal>,
    pub costing_sheet_id: i64,
    pub costing_status: CostingStatus,
    pub sheet_url: Option<String>,
}
