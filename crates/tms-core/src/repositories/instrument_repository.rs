//! Payment request / instrument repository trait (port)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::domain::{
    InstrumentKind, InstrumentStatusHistory, PaymentInstrument, PaymentPurpose, PaymentRequest,
};
use crate::error::DomainError;

#[derive(Debug, Clone)]
pub struct NewPaymentRequest {
    pub tender_id: i64,
    pub purpose: PaymentPurpose,
    pub amount_required: Decimal,
    pub due_date: Option<DateTime<Utc>>,
    pub requested_by: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewInstrument {
    pub request_id: i64,
    pub kind: InstrumentKind,
    pub amount: Decimal,
    pub favouring: Option<String>,
    pub payable_at: Option<String>,
    pub status: String,
    pub courier_address: Option<String>,
    pub courier_deadline: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewStatusHistory {
    pub instrument_id: i64,
    pub from_status: Option<String>,
    pub to_status: String,
    pub stage: Option<i32>,
    pub changed_by: Option<i64>,
    pub rejection_reason: Option<String>,
    pub form_data: Option<Value>,
    pub resubmitted_from: Option<i64>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InstrumentRepository: Send + Sync {
    async fn find_request(&self, id: i64) -> Result<Option<PaymentRequest>, DomainError>;
    async fn create_request(&self, req: &NewPaymentRequest)
        -> Result<PaymentRequest, DomainError>;
    async fn list_requests_for_tender(
        &self,
        tender_id: i64,
    ) -> Result<Vec<PaymentRequest>, DomainError>;

    async fn find_instrument(&self, id: i64) -> Result<Option<PaymentInstrument>, DomainError>;
    async fn list_instruments(
        &self,
        request_id: i64,
    ) -> Result<Vec<PaymentInstrument>, DomainError>;
    async fn create_instrument(
        &self,
        instrument: &NewInstrument,
    ) -> Result<PaymentInstrument, DomainError>;
    async fn update_instrument_status(
        &self,
        id: i64,
        status: &str,
        stage: i32,
    ) -> Result<PaymentInstrument, DomainError>;
    async fn set_instrument_active(&self, id: i64, active: bool) -> Result<(), DomainError>;

    /// Patch the kind-specific detail row with accepted form fields.
    async fn update_detail(
        &self,
        instrument_id: i64,
        kind: InstrumentKind,
        form_data: &Value,
    ) -> Result<(), DomainError>;
    async fn create_detail(
        &self,
        instrument_id: i64,
        kind: InstrumentKind,
        form_data: &Value,
    ) -> Result<(), DomainError>;

    async fn record_history(&self, entry: &NewStatusHistory) -> Result<(), DomainError>;
    async fn history(
        &self,
        instrument_id: i64,
    ) -> Result<Vec<InstrumentStatusHistory>, DomainError>;
}
