//! Courier domain entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Integer status codes persisted on the courier row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourierStatus {
    Pending,
    Dispatched,
    NotDelivered,
    Delivered,
    Rejected,
}

impl CourierStatus {
    pub fn code(&self) -> i32 {
        match self {
            CourierStatus::Pending => 0,
            CourierStatus::Dispatched => 1,
            CourierStatus::NotDelivered => 2,
            CourierStatus::Delivered => 3,
            CourierStatus::Rejected => 4,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(CourierStatus::Pending),
            1 => Some(CourierStatus::Dispatched),
            2 => Some(CourierStatus::NotDelivered),
            3 => Some(CourierStatus::Delivered),
            4 => Some(CourierStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourierDoc {
    pub url: String,
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Courier {
    pub id: i64,
    pub user_id: i64,
    pub to_org: String,
    pub to_name: String,
    pub to_addr: String,
    pub to_pin: String,
    pub to_mobile: String,
    pub emp_from: String,
    pub urgency: String,
    /// Date the shipment is expected to reach the recipient.
    pub expected_delivery_date: NaiveDate,
    pub status: CourierStatus,
    pub docs: Vec<CourierDoc>,

    // Dispatch fields
    pub courier_provider: Option<String>,
    pub docket_no: Option<String>,
    pub pickup_date: Option<NaiveDate>,

    // Delivery fields
    pub delivery_date: Option<NaiveDate>,
    pub delivery_pod: Option<String>,
    pub within_time: Option<bool>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
