//! Costing sheet repository trait (port)

use async_trait::async_trait;

use crate::domain::{CostingApprovalRow, CostingSheet, CostingStatus};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CostingRepository: Send + Sync {
    /// Approval dashboard rows for one team, ordered by tender due date.
    async fn approval_rows(&self, team_id: i64) -> Result<Vec<CostingApprovalRow>, DomainError>;
    async fn find(&self, id: i64) -> Result<Option<CostingSheet>, DomainError>;
    async fn update_status(
        &self,
        id: i64,
        status: CostingStatus,
        remarks: Option<String>,
        approved_by: i64,
    ) -> Result<CostingSheet, DomainError>;
}
