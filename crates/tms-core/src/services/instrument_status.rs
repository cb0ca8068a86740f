//! Instrument lifecycle transitions

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::domain::instrument_stages::{
    initial_status, is_rejected_status, is_terminal_status, next_available_stages,
    rejected_status, stage, stage_from_status,
};
use crate::domain::{
    AvailableActions, InstrumentKind, PaymentInstrument, StageSummary, StatusChangeContext,
};
use crate::error::DomainError;
use crate::repositories::{InstrumentRepository, NewInstrument, NewStatusHistory};

pub struct InstrumentStatusService<R: InstrumentRepository> {
    repo: Arc<R>,
}

impl<R: InstrumentRepository> InstrumentStatusService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Issue a fresh instrument under a payment request, at the kind's
    /// initial status.
    pub async fn register(
        &self,
        mut instrument: NewInstrument,
        form_data: Value,
        ctx: StatusChangeContext,
    ) -> Result<PaymentInstrument, DomainError> {
        self.repo
            .find_request(instrument.request_id)
            .await?
            .ok_or(DomainError::PaymentRequestNotFound(instrument.request_id))?;

        instrument.status = initial_status(instrument.kind).to_string();
        let created = self.repo.create_instrument(&instrument).await?;
        self.repo.create_detail(created.id, created.kind, &form_data).await?;

        self.repo
            .record_history(&NewStatusHistory {
                instrument_id: created.id,
                from_status: None,
                to_status: created.status.clone(),
                stage: Some(0),
                changed_by: ctx.changed_by,
                rejection_reason: None,
                form_data: Some(form_data),
                resubmitted_from: None,
            })
            .await?;

        info!(instrument_id = created.id, kind = created.kind.as_str(), "instrument issued");
        Ok(created)
    }

    /// Move an instrument to `new_status`, patching the detail table with the
    /// accepted form and recording history.
    pub async fn transition(
        &self,
        instrument_id: i64,
        new_status: &str,
        form_data: Value,
        ctx: StatusChangeContext,
    ) -> Result<PaymentInstrument, DomainError> {
        let instrument = self.get_instrument(instrument_id).await?;
        let kind = instrument.kind;
        let current_status = instrument.status.clone();

        let new_stage = Self::validate_transition(kind, &current_status, new_status)?;

        let updated = self
            .repo
            .update_instrument_status(instrument_id, new_status, new_stage as i32)
            .await?;

        if !form_data.as_object().map_or(true, |o| o.is_empty()) {
            self.repo.update_detail(instrument_id, kind, &form_data).await?;
        }

        self.repo
            .record_history(&NewStatusHistory {
                instrument_id,
                from_status: Some(current_status.clone()),
                to_status: new_status.to_string(),
                stage: Some(new_stage as i32),
                changed_by: ctx.changed_by,
                rejection_reason: None,
                form_data: Some(form_data),
                resubmitted_from: None,
            })
            .await?;

        info!(instrument_id, from = %current_status, to = %new_status, "instrument transitioned");
        Ok(updated)
    }

    /// Reject at the current stage; the landing status depends on kind + stage.
    pub async fn reject(
        &self,
        instrument_id: i64,
        rejection_reason: String,
        ctx: StatusChangeContext,
    ) -> Result<PaymentInstrument, DomainError> {
        let instrument = self.get_instrument(instrument_id).await?;
        let kind = instrument.kind;
        let current_status = instrument.status.clone();

        let rejected = rejected_status(kind, &current_status);
        let stage_num = stage_from_status(kind, rejected).map(|n| n as i32).unwrap_or(0);

        let updated = self
            .repo
            .update_instrument_status(instrument_id, rejected, stage_num)
            .await?;

        self.repo
            .record_history(&NewStatusHistory {
                instrument_id,
                from_status: Some(current_status),
                to_status: rejected.to_string(),
                stage: Some(stage_num),
                changed_by: ctx.changed_by,
                rejection_reason: Some(rejection_reason),
                form_data: None,
                resubmitted_from: None,
            })
            .await?;

        warn!(instrument_id, status = rejected, "instrument rejected");
        Ok(updated)
    }

    /// A rejected instrument is replaced wholesale: the old row goes inactive
    /// and a fresh one starts at the kind's initial status.
    pub async fn resubmit(
        &self,
        rejected_instrument_id: i64,
        form_data: Value,
        ctx: StatusChangeContext,
    ) -> Result<PaymentInstrument, DomainError> {
        let rejected = self.get_instrument(rejected_instrument_id).await?;

        if !is_rejected_status(&rejected.status) {
            return Err(DomainError::NotRejected(rejected_instrument_id));
        }

        self.repo.set_instrument_active(rejected_instrument_id, false).await?;

        let replacement = self
            .repo
            .create_instrument(&NewInstrument {
                request_id: rejected.request_id,
                kind: rejected.kind,
                amount: rejected.amount,
                favouring: rejected.favouring.clone(),
                payable_at: rejected.payable_at.clone(),
                status: initial_status(rejected.kind).to_string(),
                courier_address: rejected.courier_address.clone(),
                courier_deadline: rejected.courier_deadline,
            })
            .await?;

        self.repo.create_detail(replacement.id, rejected.kind, &form_data).await?;

        self.repo
            .record_history(&NewStatusHistory {
                instrument_id: replacement.id,
                from_status: None,
                to_status: replacement.status.clone(),
                stage: Some(0),
                changed_by: ctx.changed_by,
                rejection_reason: None,
                form_data: Some(form_data),
                resubmitted_from: Some(rejected_instrument_id),
            })
            .await?;

        info!(
            old = rejected_instrument_id,
            new = replacement.id,
            "instrument resubmitted"
        );
        Ok(replacement)
    }

    pub async fn available_actions(
        &self,
        instrument_id: i64,
    ) -> Result<AvailableActions, DomainError> {
        let instrument = self.get_instrument(instrument_id).await?;
        let kind = instrument.kind;
        let current_status = instrument.status.clone();

        if is_rejected_status(&current_status) {
            return Ok(AvailableActions {
                current_status,
                kind,
                next_stages: vec![],
                can_resubmit: true,
                is_terminal: false,
            });
        }

        if is_terminal_status(kind, &current_status) {
            return Ok(AvailableActions {
                current_status,
                kind,
                next_stages: vec![],
                can_resubmit: false,
                is_terminal: true,
            });
        }

        let next_stages = next_available_stages(kind, &current_status)
            .iter()
            .filter_map(|number| stage(kind, *number))
            .map(|s| StageSummary {
                stage: s.number,
                name: s.name,
                statuses: s.statuses,
            })
            .collect();

        Ok(AvailableActions {
            current_status,
            kind,
            next_stages,
            can_resubmit: false,
            is_terminal: false,
        })
    }

    fn validate_transition(
        kind: InstrumentKind,
        current_status: &str,
        new_status: &str,
    ) -> Result<u8, DomainError> {
        if is_rejected_status(current_status) {
            return Err(DomainError::TransitionFromRejected);
        }
        if is_terminal_status(kind, current_status) {
            return Err(DomainError::TransitionFromTerminal(current_status.to_string()));
        }

        let current_stage = stage_from_status(kind, current_status).ok_or_else(|| {
            DomainError::UnknownInstrumentStatus {
                kind: kind.as_str(),
                status: current_status.to_string(),
            }
        })?;
        let new_stage = stage_from_status(kind, new_status).ok_or_else(|| {
            DomainError::UnknownInstrumentStatus {
                kind: kind.as_str(),
                status: new_status.to_string(),
            }
        })?;

        if current_stage != new_stage
            && !next_available_stages(kind, current_status).contains(&new_stage)
        {
            return Err(DomainError::StageNotReachable {
                from: current_stage,
                to: new_stage,
            });
        }

        Ok(new_stage)
    }

    async fn get_instrument(&self, id: i64) -> Result<PaymentInstrument, DomainError> {
        self.repo
            .find_instrument(id)
            .await?
            .ok_or(DomainError::InstrumentNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::instrument_stages::dd;
    use crate::repositories::instrument_repository::MockInstrumentRepository;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn instrument(status: &str) -> PaymentInstrument {
        PaymentInstrument {
            id: 5,
            request_id: 2,
            kind: InstrumentKind::Dd,
            amount: Decimal::new(50_000_00, 2),
            favouring: Some("State Power Corp".into()),
            payable_at: Some("Mumbai".into()),
            issue_date: None,
            expiry_date: None,
            status: status.to_string(),
            action: 1,
            is_active: true,
            utr: None,
            docket_no: None,
            courier_address: None,
            courier_deadline: None,
            rejection_reason: None,
            remarks: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn transition_within_reachable_stage_updates_and_records() {
        let mut repo = MockInstrumentRepository::new();
        repo.expect_find_instrument()
            .returning(|_| Ok(Some(instrument(dd::ACCOUNTS_FORM_ACCEPTED))));
        // The first stage lists every DD status, so the transition resolves
        // within stage 1.
        repo.expect_update_instrument_status()
            .withf(|id, status, stage| *id == 5 && status == dd::FOLLOWUP_INITIATED && *stage == 1)
            .returning(|_, status, _| Ok(instrument(status)));
        repo.expect_update_detail().returning(|_, _, _| Ok(()));
        repo.expect_record_history()
            .withf(|h| h.to_status == dd::FOLLOWUP_INITIATED && h.stage == Some(1))
            .returning(|_| Ok(()));

        let svc = InstrumentStatusService::new(Arc::new(repo));
        let updated = svc
            .transition(5, dd::FOLLOWUP_INITIATED, json!({ "req_no": "R-102" }), Default::default())
            .await
            .unwrap();
        assert_eq!(updated.status, dd::FOLLOWUP_INITIATED);
    }

    #[tokio::test]
    async fn transition_from_rejected_is_refused() {
        let mut repo = MockInstrumentRepository::new();
        repo.expect_find_instrument()
            .returning(|_| Ok(Some(instrument(dd::ACCOUNTS_FORM_REJECTED))));

        let svc = InstrumentStatusService::new(Arc::new(repo));
        let err = svc
            .transition(5, dd::FOLLOWUP_INITIATED, json!({}), Default::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::TransitionFromRejected));
    }

    #[tokio::test]
    async fn transition_to_unreachable_stage_is_refused() {
        use crate::domain::instrument_stages::cheque;

        let mut repo = MockInstrumentRepository::new();
        repo.expect_find_instrument().returning(|_| {
            let mut i = instrument(cheque::CANCELLED_TORN);
            i.kind = InstrumentKind::Cheque;
            Ok(Some(i))
        });

        let svc = InstrumentStatusService::new(Arc::new(repo));
        // Cancelled/Torn reaches nothing.
        let err = svc
            .transition(5, cheque::PAID_VIA_BANK_TRANSFER, json!({}), Default::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::StageNotReachable { from: 6, to: 4 }));
    }

    #[tokio::test]
    async fn resubmit_requires_rejected_status() {
        let mut repo = MockInstrumentRepository::new();
        repo.expect_find_instrument()
            .returning(|_| Ok(Some(instrument(dd::REQUESTED))));

        let svc = InstrumentStatusService::new(Arc::new(repo));
        let err = svc.resubmit(5, json!({}), Default::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotRejected(5)));
    }

    #[tokio::test]
    async fn resubmit_replaces_instrument_and_links_history() {
        let mut repo = MockInstrumentRepository::new();
        repo.expect_find_instrument()
            .returning(|_| Ok(Some(instrument(dd::ACCOUNTS_FORM_REJECTED))));
        repo.expect_set_instrument_active()
            .withf(|id, active| *id == 5 && !active)
            .returning(|_, _| Ok(()));
        repo.expect_create_instrument()
            .withf(|n| n.status == dd::REQUESTED && n.request_id == 2)
            .returning(|n| {
                let mut i = instrument(&n.status);
                i.id = 9;
                Ok(i)
            });
        repo.expect_create_detail().returning(|_, _, _| Ok(()));
        repo.expect_record_history()
            .withf(|h| h.resubmitted_from == Some(5) && h.instrument_id == 9)
            .returning(|_| Ok(()));

        let svc = InstrumentStatusService::new(Arc::new(repo));
        let replacement = svc
            .resubmit(5, json!({ "dd_no": "004512" }), Default::default())
            .await
            .unwrap();
        assert_eq!(replacement.id, 9);
        assert_eq!(replacement.status, dd::REQUESTED);
    }

    #[tokio::test]
    async fn available_actions_for_rejected_is_resubmit_only() {
        let mut repo = MockInstrumentRepository::new();
        repo.expect_find_instrument()
            .returning(|_| Ok(Some(instrument(dd::ACCOUNTS_FORM_REJECTED))));

        let svc = InstrumentStatusService::new(Arc::new(repo));
        let actions = svc.available_actions(5).await.unwrap();
        assert!(actions.can_resubmit);
        assert!(actions.next_stages.is_empty());
    }

    #[tokio::test]
    async fn available_actions_lists_reachable_stages() {
        let mut repo = MockInstrumentRepository::new();
        repo.expect_find_instrument()
            .returning(|_| Ok(Some(instrument(dd::ACCOUNTS_FORM_ACCEPTED))));

        let svc = InstrumentStatusService::new(Arc::new(repo));
        let actions = svc.available_actions(5).await.unwrap();
        assert!(!actions.can_resubmit);
        let stages: Vec<u8> = actions.next_stages.iter().map(|s| s.stage).collect();
        assert_eq!(stages, vec![2, 3, 4, 5, 6]);
    }
}
