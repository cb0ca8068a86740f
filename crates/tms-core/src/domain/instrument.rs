//! Payment request and instrument entities

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstrumentKind {
    Dd,
    Fdr,
    Bg,
    Cheque,
    BankTransfer,
    PortalPayment,
}

impl InstrumentKind {
    pub const ALL: &'static [InstrumentKind] = &[
        InstrumentKind::Dd,
        InstrumentKind::Fdr,
        InstrumentKind::Bg,
        InstrumentKind::Cheque,
        InstrumentKind::BankTransfer,
        InstrumentKind::PortalPayment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentKind::Dd => "DD",
            InstrumentKind::Fdr => "FDR",
            InstrumentKind::Bg => "BG",
            InstrumentKind::Cheque => "Cheque",
            InstrumentKind::BankTransfer => "Bank Transfer",
            InstrumentKind::PortalPayment => "Portal Payment",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "DD" => Some(InstrumentKind::Dd),
            "FDR" => Some(InstrumentKind::Fdr),
            "BG" => Some(InstrumentKind::Bg),
            "Cheque" => Some(InstrumentKind::Cheque),
            "Bank Transfer" => Some(InstrumentKind::BankTransfer),
            "Portal Payment" => Some(InstrumentKind::PortalPayment),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentPurpose {
    Emd,
    TenderFee,
    ProcessingFee,
    SecurityDeposit,
    PerformanceBg,
    OtherPayment,
}

impl PaymentPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentPurpose::Emd => "EMD",
            PaymentPurpose::TenderFee => "Tender Fee",
            PaymentPurpose::ProcessingFee => "Processing Fee",
            PaymentPurpose::SecurityDeposit => "Security Deposit",
            PaymentPurpose::PerformanceBg => "Performance BG",
            PaymentPurpose::OtherPayment => "Other Payment",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "EMD" => Some(PaymentPurpose::Emd),
            "Tender Fee" => Some(PaymentPurpose::TenderFee),
            "Processing Fee" => Some(PaymentPurpose::ProcessingFee),
            "Security Deposit" => Some(PaymentPurpose::SecurityDeposit),
            "Performance BG" => Some(PaymentPurpose::PerformanceBg),
            "Other Payment" => Some(PaymentPurpose::OtherPayment),
            _ => None,
        }
    }
}

/// A request for funds against a tender; instruments are issued under it.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequest {
    pub id: i64,
    pub tender_id: i64,
    pub purpose: PaymentPurpose,
    pub amount_required: Decimal,
    pub due_date: Option<DateTime<Utc>>,
    pub requested_by: Option<String>,
    pub status: String,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentInstrument {
    pub id: i64,
    pub request_id: i64,
    pub kind: InstrumentKind,
    pub amount: Decimal,
    pub favouring: Option<String>,
    pub payable_at: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub status: String,
    /// Stage number the last accepted form belongs to.
    pub action: i32,
    pub is_active: bool,
    pub utr: Option<String>,
    pub docket_no: Option<String>,
    pub courier_address: Option<String>,
    pub courier_deadline: Option<i32>,
    pub rejection_reason: Option<String>,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One audit row per status change or resubmission.
#[derive(Debug, Clone, Serialize)]
pub struct InstrumentStatusHistory {
    pub id: i64,
    pub instrument_id: i64,
    pub from_status: Option<String>,
    pub to_status: String,
    pub stage: Option<i32>,
    pub changed_by: Option<i64>,
    pub rejection_reason: Option<String>,
    pub form_data: Option<Value>,
    pub resubmitted_from: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct StatusChangeContext {
    pub changed_by: Option<i64>,
    pub rejection_reason: Option<String>,
}

/// Next-step summary surfaced to the UI for one instrument.
#[derive(Debug, Clone, Serialize)]
pub struct AvailableActions {
    pub current_status: String,
    pub kind: InstrumentKind,
    pub next_stages: Vec<StageSummary>,
    pub can_resubmit: bool,
    pub is_terminal: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageSummary {
    pub stage: u8,
    pub name: &'static str,
    pub statuses: &'static [&'static str],
}
