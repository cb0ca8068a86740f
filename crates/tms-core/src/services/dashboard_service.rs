//! Tender dashboard queries

use std::sync::Arc;

use tms_shared::types::{Paginated, Pagination, SortOrder};

use crate::dashboard::tab_config;
use crate::domain::{CurrentUser, TenderRow};
use crate::error::DomainError;
use crate::repositories::{BucketCount, TabQuery, TenderRepository};

#[derive(Debug, Clone, Default)]
pub struct TabRequest {
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

pub struct DashboardService<R: TenderRepository> {
    repo: Arc<R>,
}

impl<R: TenderRepository> DashboardService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn tab(
        &self,
        tab_key: &str,
        request: TabRequest,
        pagination: Pagination,
        current_user: &CurrentUser,
    ) -> Result<Paginated<TenderRow>, DomainError> {
        let config = tab_config(tab_key).ok_or_else(|| {
            DomainError::ValidationError(format!("unknown dashboard tab: {tab_key}"))
        })?;

        let query = TabQuery {
            status_ids: config.effective_status_ids(),
            field_conditions: config.field_conditions.to_vec(),
            // Admins see the whole board, everyone else their team's slice.
            team_id: if current_user.is_admin() { None } else { current_user.team_id },
            search: request.search,
            sort_by: request.sort_by.unwrap_or_else(|| config.sort_by.to_string()),
            sort_desc: request
                .sort_order
                .map(|o| o == SortOrder::Desc)
                .unwrap_or(config.sort_desc),
        };

        let (data, total) = self.repo.list_tab(&query, &pagination).await?;
        Ok(Paginated::new(data, total, &pagination))
    }

    pub async fn bucket_counts(
        &self,
        current_user: &CurrentUser,
    ) -> Result<Vec<BucketCount>, DomainError> {
        let team_id = if current_user.is_admin() { None } else { current_user.team_id };
        self.repo.bucket_counts(team_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::repositories::tender_repository::MockTenderRepository;

    #[tokio::test]
    async fn tab_resolves_config_and_scopes_team() {
        let mut repo = MockTenderRepository::new();
        repo.expect_list_tab()
            .withf(|query, _| {
                query.team_id == Some(4)
                    && query.sort_by == "due_date"
                    && !query.sort_desc
                    && !query.status_ids.is_empty()
            })
            .returning(|_, _| Ok((vec![], 0)));

        let svc = DashboardService::new(Arc::new(repo));
        let tl = CurrentUser { id: 2, role: Role::TeamLeader, team_id: Some(4) };
        svc.tab("live", TabRequest::default(), Pagination::default(), &tl)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unknown_tab_is_a_validation_error() {
        let repo = MockTenderRepository::new();
        let svc = DashboardService::new(Arc::new(repo));
        let admin = CurrentUser { id: 1, role: Role::Admin, team_id: None };
        let err = svc
            .tab("bogus", TabRequest::default(), Pagination::default(), &admin)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }
}
