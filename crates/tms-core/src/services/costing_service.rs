//! Costing sheet approvals

use std::sync::Arc;

use crate::domain::{CostingApprovalRow, CostingSheet, CostingStatus, CurrentUser, Role};
use crate::error::DomainError;
use crate::repositories::CostingRepository;

pub struct CostingService<R: CostingRepository> {
    repo: Arc<R>,
}

impl<R: CostingRepository> CostingService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Approval queue for the team leader's own team.
    pub async fn approval_dashboard(
        &self,
        current_user: &CurrentUser,
    ) -> Result<Vec<CostingApprovalRow>, DomainError> {
        let team_id = self.require_team_leader(current_user)?;
        self.repo.approval_rows(team_id).await
    }

    pub async fn approve(
        &self,
        sheet_id: i64,
        current_user: &CurrentUser,
    ) -> Result<CostingSheet, DomainError> {
        self.require_team_leader(current_user)?;
        let sheet = self.pending_sheet(sheet_id).await?;
        self.repo
            .update_status(sheet.id, CostingStatus::Approved, None, current_user.id)
            .await
    }

    pub async fn reject(
        &self,
        sheet_id: i64,
        remarks: String,
        current_user: &CurrentUser,
    ) -> Result<CostingSheet, DomainError> {
        self.require_team_leader(current_user)?;
        if remarks.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "rejection remarks are required".into(),
            ));
        }
        let sheet = self.pending_sheet(sheet_id).await?;
        self.repo
            .update_status(sheet.id, CostingStatus::RejectedRedo, Some(remarks), current_user.id)
            .await
    }

    async fn pending_sheet(&self, sheet_id: i64) -> Result<CostingSheet, DomainError> {
        let sheet = self
            .repo
            .find(sheet_id)
            .await?
            .ok_or(DomainError::CostingSheetNotFound(sheet_id))?;
        if sheet.status != CostingStatus::Pending {
            return Err(DomainError::CostingNotPending {
                id: sheet_id,
                status: sheet.status.as_str().to_string(),
            });
        }
        Ok(sheet)
    }

    fn require_team_leader(&self, current_user: &CurrentUser) -> Result<i64, DomainError> {
        if current_user.role != Role::TeamLeader && !current_user.is_admin() {
            return Err(DomainError::Forbidden("costing approval is for team leaders".into()));
        }
        current_user
            .team_id
            .ok_or_else(|| DomainError::Forbidden("approver has no team".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::costing_repository::MockCostingRepository;
    use chrono::Utc;

    fn team_leader() -> CurrentUser {
        CurrentUser { id: 2, role: Role::TeamLeader, team_id: Some(4) }
    }

    fn sheet(status: CostingStatus) -> CostingSheet {
        CostingSheet {
            id: 12,
            tender_id: 30,
            status,
            sheet_url: Some("https://sheets.example/12".into()),
            approval_remarks: None,
            approved_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn executives_cannot_approve() {
        let repo = MockCostingRepository::new();
        let svc = CostingService::new(Arc::new(repo));
        let te = CurrentUser { id: 9, role: Role::TenderExecutive, team_id: Some(4) };
        let err = svc.approve(12, &te).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn approve_requires_pending() {
        let mut repo = MockCostingRepository::new();
        repo.expect_find()
            .returning(|_| Ok(Some(sheet(CostingStatus::Approved))));

        let svc = CostingService::new(Arc::new(repo));
        let err = svc.approve(12, &team_leader()).await.unwrap_err();
        assert!(matches!(err, DomainError::CostingNotPending { .. }));
    }

    #[tokio::test]
    async fn reject_needs_remarks() {
        let repo = MockCostingRepository::new();
        let svc = CostingService::new(Arc::new(repo));
        let err = svc.reject(12, "  ".into(), &team_leader()).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn reject_moves_to_redo_with_remarks() {
        let mut repo = MockCostingRepository::new();
        repo.expect_find()
            .returning(|_| Ok(Some(sheet(CostingStatus::Pending))));
        repo.expect_update_status()
            .withf(|id, status, remarks, by| {
                *id == 12
                    && *status == CostingStatus::RejectedRedo
                    && remarks.as_deref() == Some("margin too thin")
                    && *by == 2
            })
            .returning(|_, status, remarks, by| {
                let mut s = sheet(status);
                s.approval_remarks = remarks;
                s.approved_by = Some(by);
                Ok(s)
            });

        let svc = CostingService::new(Arc::new(repo));
        let updated = svc.reject(12, "margin too thin".into(), &team_leader()).await.unwrap();
        assert_eq!(updated.status, CostingStatus::RejectedRedo);
    }
}
