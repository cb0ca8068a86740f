//! Employee imprest accounting

use std::sync::Arc;

use tms_shared::types::{Paginated, Pagination};

use crate::domain::imprest::{IMPREST_APPROVED, IMPREST_REJECTED};
use crate::domain::{
    CurrentUser, EmployeeImprestSummary, ImprestEntry, ImprestTransaction, ImprestVoucher,
};
use crate::error::DomainError;
use crate::repositories::ImprestRepository;

pub struct ImprestService<R: ImprestRepository> {
    repo: Arc<R>,
}

impl<R: ImprestRepository> ImprestService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Admin-only rollup across all employees with imprest activity.
    pub async fn employee_summary(
        &self,
        current_user: &CurrentUser,
    ) -> Result<Vec<EmployeeImprestSummary>, DomainError> {
        if !current_user.is_admin() {
            return Err(DomainError::Forbidden("imprest summary is admin-only".into()));
        }
        self.repo.employee_summary().await
    }

    pub async fn transactions(
        &self,
        user_id: i64,
        current_user: &CurrentUser,
    ) -> Result<Vec<ImprestTransaction>, DomainError> {
        if !current_user.is_admin() && current_user.id != user_id {
            return Err(DomainError::Forbidden(
                "cannot view another employee's imprest transactions".into(),
            ));
        }
        self.repo.transactions_for(user_id).await
    }

    pub async fn vouchers(
        &self,
        current_user: &CurrentUser,
        pagination: Pagination,
    ) -> Result<Paginated<ImprestVoucher>, DomainError> {
        let beneficiary = if current_user.is_admin() { None } else { Some(current_user.id) };
        let (data, total) = self.repo.list_vouchers(beneficiary, &pagination).await?;
        Ok(Paginated::new(data, total, &pagination))
    }

    pub async fn approve(
        &self,
        entry_id: i64,
        current_user: &CurrentUser,
    ) -> Result<ImprestEntry, DomainError> {
        self.set_approval(entry_id, IMPREST_APPROVED, current_user).await
    }

    pub async fn reject(
        &self,
        entry_id: i64,
        current_user: &CurrentUser,
    ) -> Result<ImprestEntry, DomainError> {
        self.set_approval(entry_id, IMPREST_REJECTED, current_user).await
    }

    async fn set_approval(
        &self,
        entry_id: i64,
        status: i32,
        current_user: &CurrentUser,
    ) -> Result<ImprestEntry, DomainError> {
        if !current_user.is_admin() {
            return Err(DomainError::Forbidden("imprest approval is admin-only".into()));
        }
        self.repo
            .find_entry(entry_id)
            .await?
            .ok_or(DomainError::ImprestEntryNotFound(entry_id))?;
        self.repo.set_approval(entry_id, status, current_user.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::repositories::imprest_repository::MockImprestRepository;

    fn admin() -> CurrentUser {
        CurrentUser { id: 1, role: Role::Admin, team_id: None }
    }

    fn employee(id: i64) -> CurrentUser {
        CurrentUser { id, role: Role::TenderExecutive, team_id: Some(3) }
    }

    #[tokio::test]
    async fn summary_is_admin_only() {
        let repo = MockImprestRepository::new();
        let svc = ImprestService::new(Arc::new(repo));
        let err = svc.employee_summary(&employee(5)).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn employees_cannot_read_each_others_transactions() {
        let repo = MockImprestRepository::new();
        let svc = ImprestService::new(Arc::new(repo));
        let err = svc.transactions(6, &employee(5)).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn voucher_listing_scopes_to_beneficiary_for_non_admins() {
        let mut repo = MockImprestRepository::new();
        repo.expect_list_vouchers()
            .withf(|beneficiary, _| *beneficiary == Some(5))
            .returning(|_, _| Ok((vec![], 0)));

        let svc = ImprestService::new(Arc::new(repo));
        svc.vouchers(&employee(5), Pagination::default()).await.unwrap();
    }

    #[tokio::test]
    async fn admin_approval_stamps_the_approver() {
        use chrono::Utc;
        use rust_decimal::Decimal;

        let mut repo = MockImprestRepository::new();
        let entry = ImprestEntry {
            id: 8,
            user_id: 5,
            amount: Decimal::new(12_000_00, 2),
            approval_status: 0,
            project_name: None,
            remarks: None,
            approved_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        {
            let entry = entry.clone();
            repo.expect_find_entry().returning(move |_| Ok(Some(entry.clone())));
        }
        repo.expect_set_approval()
            .withf(|id, status, approved_by| {
                *id == 8 && *status == IMPREST_APPROVED && *approved_by == 1
            })
            .returning(move |_, status, by| {
                let mut updated = entry.clone();
                updated.approval_status = status;
                updated.approved_by = Some(by);
                Ok(updated)
            });

        let svc = ImprestService::new(Arc::new(repo));
        let updated = svc.approve(8, &admin()).await.unwrap();
        assert_eq!(updated.approval_status, IMPREST_APPROVED);
    }
}
