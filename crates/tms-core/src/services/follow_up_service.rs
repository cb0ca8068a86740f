//! Follow-up lifecycle

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;

use tms_shared::types::{Paginated, Pagination};

use crate::domain::{CurrentUser, FollowUp, FollowUpContact, Frequency, StopReason};
use crate::error::DomainError;
use crate::repositories::{
    FollowUpAmountSummary, FollowUpListFilter, FollowUpRepository, NewFollowUp,
};

#[derive(Debug, Clone)]
pub struct CreateFollowUpInput {
    pub area: String,
    pub party_name: String,
    pub amount: Option<Decimal>,
    pub assigned_to_id: i64,
    pub comment: Option<String>,
    pub contacts: Vec<ContactInput>,
    pub start_from: Option<NaiveDate>,
    pub instrument_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct ContactInput {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub org: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateFollowUpInput {
    pub area: Option<String>,
    pub party_name: Option<String>,
    pub amount: Option<Decimal>,
    pub assigned_to_id: Option<i64>,
    pub details: Option<String>,
    pub frequency: Option<Frequency>,
    pub start_from: Option<NaiveDate>,
    pub stop_reason: Option<StopReason>,
    pub proof_text: Option<String>,
    pub proof_image_path: Option<String>,
    pub stop_remarks: Option<String>,
    pub attachments: Option<Vec<String>>,
    pub contacts: Option<Vec<ContactInput>>,
}

#[derive(Debug, Clone, Default)]
pub struct StatusUpdateInput {
    pub latest_comment: Option<String>,
    pub frequency: Option<Frequency>,
    pub stop_reason: Option<StopReason>,
    pub proof_text: Option<String>,
    pub proof_image_path: Option<String>,
    pub stop_remarks: Option<String>,
}

pub struct FollowUpService<R: FollowUpRepository> {
    repo: Arc<R>,
}

impl<R: FollowUpRepository> FollowUpService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        input: CreateFollowUpInput,
        current_user: &CurrentUser,
    ) -> Result<FollowUp, DomainError> {
        let now = Utc::now();
        let contacts: Vec<FollowUpContact> = input
            .contacts
            .into_iter()
            .map(|c| FollowUpContact {
                name: c.name,
                email: c.email.filter(|e| !e.is_empty()),
                phone: c.phone.filter(|p| !p.is_empty()),
                org: c.org,
                added_at: now,
            })
            .collect();

        // New parties land in the shared directory as a side effect.
        for contact in &contacts {
            if contact.email.is_none() && contact.phone.is_none() {
                continue;
            }
            self.repo.sync_directory_contact(contact).await?;
        }

        let created = self
            .repo
            .create(&NewFollowUp {
                area: input.area,
                party_name: input.party_name,
                amount: input.amount.unwrap_or(Decimal::ZERO),
                assigned_to_id: input.assigned_to_id,
                created_by_id: current_user.id,
                comment: input.comment,
                contacts,
                start_from: input.start_from.unwrap_or_else(|| Utc::now().date_naive()),
                instrument_id: input.instrument_id,
            })
            .await?;

        info!(follow_up_id = created.id, party = %created.party_name, "follow-up created");
        Ok(created)
    }

    pub async fn find(&self, id: i64) -> Result<FollowUp, DomainError> {
        self.repo.find(id).await?.ok_or(DomainError::FollowUpNotFound(id))
    }

    pub async fn update(
        &self,
        id: i64,
        input: UpdateFollowUpInput,
    ) -> Result<FollowUp, DomainError> {
        let mut follow_up = self.find(id).await?;
        let now = Utc::now();

        if let Some(area) = input.area {
            follow_up.area = area;
        }
        if let Some(party_name) = input.party_name {
            follow_up.party_name = party_name;
        }
        if let Some(amount) = input.amount {
            follow_up.amount = amount;
        }
        if let Some(assigned_to_id) = input.assigned_to_id {
            follow_up.assigned_to_id = assigned_to_id;
        }
        if let Some(details) = input.details {
            follow_up.details = Some(details);
        }
        if let Some(frequency) = input.frequency {
            follow_up.frequency = frequency;
        }
        if let Some(start_from) = input.start_from {
            follow_up.start_from = start_from;
        }
        if let Some(stop_reason) = input.stop_reason {
            follow_up.stop_reason = Some(stop_reason);
        }
        if let Some(proof_text) = input.proof_text {
            follow_up.proof_text = Some(proof_text);
        }
        if let Some(proof_image_path) = input.proof_image_path {
            follow_up.proof_image_path = Some(proof_image_path);
        }
        if let Some(stop_remarks) = input.stop_remarks {
            follow_up.stop_remarks = Some(stop_remarks);
        }
        if let Some(attachments) = input.attachments {
            follow_up.attachments = attachments;
        }
        if let Some(contacts) = input.contacts {
            follow_up.contacts = contacts
                .into_iter()
                .map(|c| FollowUpContact {
                    name: c.name,
                    email: c.email.filter(|e| !e.is_empty()),
                    phone: c.phone.filter(|p| !p.is_empty()),
                    org: c.org,
                    added_at: now,
                })
                .collect();
        }
        follow_up.updated_at = now;

        // Stopping requires the reason trail.
        if follow_up.frequency == Frequency::Stopped && follow_up.stop_reason.is_none() {
            return Err(DomainError::ValidationError(
                "stop reason is required when stopping a follow-up".into(),
            ));
        }

        self.repo.update(&follow_up).await
    }

    /// Quick status update from the dashboard modal: records the comment with
    /// the acting user's name and flips the assignment to initiated.
    pub async fn update_status(
        &self,
        id: i64,
        input: StatusUpdateInput,
        current_user_name: &str,
    ) -> Result<FollowUp, DomainError> {
        let mut follow_up = self.find(id).await?;

        if let Some(comment) = input.latest_comment {
            follow_up.latest_comment = Some(format!("{} - {}", comment, current_user_name));
        }
        if let Some(frequency) = input.frequency {
            follow_up.frequency = frequency;
        }
        if let Some(stop_reason) = input.stop_reason {
            follow_up.stop_reason = Some(stop_reason);
        }
        if let Some(proof_text) = input.proof_text {
            follow_up.proof_text = Some(proof_text);
        }
        if let Some(proof_image_path) = input.proof_image_path {
            follow_up.proof_image_path = Some(proof_image_path);
        }
        if let Some(stop_remarks) = input.stop_remarks {
            follow_up.stop_remarks = Some(stop_remarks);
        }
        follow_up.assignment_status = "initiated".to_string();
        follow_up.updated_at = Utc::now();

        if follow_up.frequency == Frequency::Stopped && follow_up.stop_reason.is_none() {
            return Err(DomainError::ValidationError(
                "stop reason is required when stopping a follow-up".into(),
            ));
        }

        self.repo.update(&follow_up).await
    }

    pub async fn remove(&self, id: i64) -> Result<(), DomainError> {
        self.find(id).await?;
        self.repo.soft_delete(id).await
    }

    /// Non-admins only ever see their own assignments.
    pub async fn list(
        &self,
        mut filter: FollowUpListFilter,
        pagination: Pagination,
        current_user: &CurrentUser,
    ) -> Result<Paginated<FollowUp>, DomainError> {
        if !current_user.is_admin() {
            filter.assigned_to_id = Some(current_user.id);
        }
        let (data, total) = self.repo.list(&filter, &pagination).await?;
        Ok(Paginated::new(data, total, &pagination))
    }

    pub async fn amount_summary(
        &self,
        current_user: &CurrentUser,
    ) -> Result<Vec<FollowUpAmountSummary>, DomainError> {
        let assigned_to = if current_user.is_admin() { None } else { Some(current_user.id) };
        self.repo.amount_summary(assigned_to).await
    }

    /// Follow-ups whose recurrence fires on `date`.
    pub async fn due_on(&self, date: NaiveDate) -> Result<Vec<FollowUp>, DomainError> {
        Ok(self
            .repo
            .due_candidates(date)
            .await?
            .into_iter()
            .filter(|fu| fu.is_due_on(date))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::repositories::follow_up_repository::MockFollowUpRepository;

    fn admin() -> CurrentUser {
        CurrentUser { id: 1, role: Role::Admin, team_id: None }
    }

    fn user(id: i64) -> CurrentUser {
        CurrentUser { id, role: Role::TenderExecutive, team_id: Some(2) }
    }

    fn follow_up(id: i64, frequency: Frequency, start_from: NaiveDate) -> FollowUp {
        FollowUp {
            id,
            area: "West".into(),
            party_name: "Metro Rail".into(),
            amount: Decimal::ZERO,
            assigned_to_id: 7,
            created_by_id: 1,
            assignment_status: "assigned".into(),
            details: None,
            latest_comment: None,
            frequency,
            start_from,
            reminder_count: 0,
            stop_reason: None,
            proof_text: None,
            proof_image_path: None,
            stop_remarks: None,
            contacts: vec![],
            attachments: vec![],
            instrument_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn create_syncs_reachable_contacts_only() {
        let mut repo = MockFollowUpRepository::new();
        repo.expect_sync_directory_contact()
            .times(1)
            .withf(|c| c.email.as_deref() == Some("ravi@example.com"))
            .returning(|_| Ok(()));
        repo.expect_create().returning(|n| {
            Ok(follow_up(1, Frequency::Daily, n.start_from))
        });

        let svc = FollowUpService::new(Arc::new(repo));
        svc.create(
            CreateFollowUpInput {
                area: "West".into(),
                party_name: "Metro Rail".into(),
                amount: None,
                assigned_to_id: 7,
                comment: None,
                contacts: vec![
                    ContactInput {
                        name: "Ravi".into(),
                        email: Some("ravi@example.com".into()),
                        phone: None,
                        org: None,
                    },
                    ContactInput { name: "Walk-in".into(), email: None, phone: None, org: None },
                ],
                start_from: None,
                instrument_id: None,
            },
            &admin(),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn stopping_without_reason_is_rejected() {
        let mut repo = MockFollowUpRepository::new();
        repo.expect_find().returning(|id| {
            Ok(Some(follow_up(id, Frequency::Daily, Utc::now().date_naive())))
        });

        let svc = FollowUpService::new(Arc::new(repo));
        let err = svc
            .update(
                1,
                UpdateFollowUpInput { frequency: Some(Frequency::Stopped), ..Default::default() },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn status_update_signs_comment_and_initiates() {
        let mut repo = MockFollowUpRepository::new();
        repo.expect_find().returning(|id| {
            Ok(Some(follow_up(id, Frequency::Daily, Utc::now().date_naive())))
        });
        repo.expect_update()
            .withf(|fu| {
                fu.latest_comment.as_deref() == Some("Spoke to accounts - Asha")
                    && fu.assignment_status == "initiated"
            })
            .returning(|fu| Ok(fu.clone()));

        let svc = FollowUpService::new(Arc::new(repo));
        svc.update_status(
            1,
            StatusUpdateInput {
                latest_comment: Some("Spoke to accounts".into()),
                ..Default::default()
            },
            "Asha",
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn non_admin_listing_is_pinned_to_self() {
        let mut repo = MockFollowUpRepository::new();
        repo.expect_list()
            .withf(|filter, _| filter.assigned_to_id == Some(9))
            .returning(|_, _| Ok((vec![], 0)));

        let svc = FollowUpService::new(Arc::new(repo));
        let page = svc
            .list(FollowUpListFilter::default(), Pagination::default(), &user(9))
            .await
            .unwrap();
        assert_eq!(page.meta.total, 0);
    }

    #[tokio::test]
    async fn due_on_applies_recurrence_to_candidates() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let mut repo = MockFollowUpRepository::new();
        repo.expect_due_candidates().returning(move |_| {
            Ok(vec![
                follow_up(1, Frequency::Daily, start),
                follow_up(2, Frequency::Weekly, start),
            ])
        });

        let svc = FollowUpService::new(Arc::new(repo));
        // Tuesday: daily fires, weekly does not.
        let due = svc.due_on(NaiveDate::from_ymd_opt(2025, 3, 11).unwrap()).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, 1);
    }
}
