//! Follow-up repository trait (port)

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use tms_shared::types::{Pagination, SortOrder};

use crate::domain::{FollowUp, FollowUpContact, FollowUpTab};
use crate::error::DomainError;

#[derive(Debug, Clone)]
pub struct NewFollowUp {
    pub area: String,
    pub party_name: String,
    pub amount: Decimal,
    pub assigned_to_id: i64,
    pub created_by_id: i64,
    pub comment: Option<String>,
    pub contacts: Vec<FollowUpContact>,
    pub start_from: NaiveDate,
    pub instrument_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct FollowUpListFilter {
    pub tab: Option<FollowUpTab>,
    /// Non-admin callers are pinned to their own id.
    pub assigned_to_id: Option<i64>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub today: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowUpAmountSummary {
    pub assigned_to_id: i64,
    pub total_amount: Decimal,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowUpRepository: Send + Sync {
    async fn create(&self, follow_up: &NewFollowUp) -> Result<FollowUp, DomainError>;
    async fn find(&self, id: i64) -> Result<Option<FollowUp>, DomainError>;
    async fn update(&self, follow_up: &FollowUp) -> Result<FollowUp, DomainError>;
    async fn soft_delete(&self, id: i64) -> Result<(), DomainError>;
    async fn list(
        &self,
        filter: &FollowUpListFilter,
        pagination: &Pagination,
    ) -> Result<(Vec<FollowUp>, i64), DomainError>;
    async fn amount_summary(
        &self,
        assigned_to_id: Option<i64>,
    ) -> Result<Vec<FollowUpAmountSummary>, DomainError>;

    /// Active follow-ups whose schedule could fire on `date`; the recurrence
    /// rule is applied in the service.
    async fn due_candidates(&self, date: NaiveDate) -> Result<Vec<FollowUp>, DomainError>;
    async fn increment_reminder_count(&self, id: i64) -> Result<(), DomainError>;

    /// Insert into the client directory unless email or phone already matches.
    async fn sync_directory_contact(
        &self,
        contact: &FollowUpContact,
    ) -> Result<(), DomainError>;
}
