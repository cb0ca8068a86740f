//! Imprest repository trait (port)

use async_trait::async_trait;

use tms_shared::types::Pagination;

use crate::domain::{EmployeeImprestSummary, ImprestEntry, ImprestTransaction, ImprestVoucher};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImprestRepository: Send + Sync {
    /// One row per employee with at least one imprest entry.
    async fn employee_summary(&self) -> Result<Vec<EmployeeImprestSummary>, DomainError>;
    async fn transactions_for(
        &self,
        user_id: i64,
    ) -> Result<Vec<ImprestTransaction>, DomainError>;
    async fn list_vouchers(
        &self,
        beneficiary_user_id: Option<i64>,
        pagination: &Pagination,
    ) -> Result<(Vec<ImprestVoucher>, i64), DomainError>;
    async fn find_entry(&self, id: i64) -> Result<Option<ImprestEntry>, DomainError>;
    async fn set_approval(
        &self,
        id: i64,
        approval_status: i32,
        approved_by: i64,
    ) -> Result<ImprestEntry, DomainError>;
}
