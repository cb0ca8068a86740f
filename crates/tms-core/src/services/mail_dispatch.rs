//! Follow-up reminder dispatch
//!
//! Builds the daily reminder audience and hands each message to the broker
//! queue. Rendering and SMTP happen in the worker.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::instrument_stages::status_label;
use crate::domain::FollowUp;
use crate::error::DomainError;
use crate::repositories::{
    EmailLogRepository, FollowUpRepository, InstrumentRepository, MailQueue, NewEmailLog,
    OutboundEmail,
};
use crate::services::follow_up_service::FollowUpService;

pub const TEMPLATE_REMINDER: &str = "follow_up_reminder";
pub const TEMPLATE_INSTRUMENT_REMINDER: &str = "follow_up_instrument_reminder";

pub struct FollowUpMailDispatcher<F, I, E, Q>
where
    F: FollowUpRepository,
    I: InstrumentRepository,
    E: EmailLogRepository,
    Q: MailQueue,
{
    follow_ups: Arc<FollowUpService<F>>,
    instruments: Arc<I>,
    email_logs: Arc<E>,
    queue: Arc<Q>,
}

impl<F, I, E, Q> FollowUpMailDispatcher<F, I, E, Q>
where
    F: FollowUpRepository,
    I: InstrumentRepository,
    E: EmailLogRepository,
    Q: MailQueue,
{
    pub fn new(
        follow_ups: Arc<FollowUpService<F>>,
        instruments: Arc<I>,
        email_logs: Arc<E>,
        queue: Arc<Q>,
    ) -> Self {
        Self { follow_ups, instruments, email_logs, queue }
    }

    /// Queue one reminder per due follow-up with at least one mailable
    /// contact. Returns how many were queued.
    pub async fn dispatch_due(&self, date: NaiveDate) -> Result<usize, DomainError> {
        let due = self.follow_ups.due_on(date).await?;
        let mut queued = 0usize;

        for follow_up in due {
            match self.build_payload(&follow_up).await? {
                Some(email) => {
                    self.queue.enqueue(&email).await?;
                    queued += 1;
                }
                None => {
                    warn!(follow_up_id = follow_up.id, "follow-up has no mailable contact");
                }
            }
        }

        info!(date = %date, queued, "follow-up reminders queued");
        Ok(queued)
    }

    async fn build_payload(
        &self,
        follow_up: &FollowUp,
    ) -> Result<Option<OutboundEmail>, DomainError> {
        let to: Vec<String> = follow_up
            .contacts
            .iter()
            .filter_map(|c| c.email.clone())
            .collect();
        if to.is_empty() {
            return Ok(None);
        }

        let mut context = json!({
            "party_name": follow_up.party_name,
            "area": follow_up.area,
            "details": follow_up.details,
            "reminder": follow_up.reminder_count + 1,
            "since": follow_up.start_from.to_string(),
        });

        let template = match follow_up.instrument_id {
            Some(instrument_id) => match self.instruments.find_instrument(instrument_id).await? {
                Some(instrument) => {
                    context["instrument"] = json!({
                        "kind": instrument.kind.as_str(),
                        "amount": instrument.amount,
                        "favouring": instrument.favouring,
                        "status": status_label(&instrument.status),
                    });
                    TEMPLATE_INSTRUMENT_REMINDER
                }
                None => TEMPLATE_REMINDER,
            },
            None => TEMPLATE_REMINDER,
        };

        let subject = format!("Follow Up for {}", follow_up.party_name);
        let email_log_id = self
            .email_logs
            .create_queued(&NewEmailLog {
                template: template.to_string(),
                recipients: to.clone(),
                subject: subject.clone(),
                follow_up_id: Some(follow_up.id),
            })
            .await?;

        Ok(Some(OutboundEmail {
            email_log_id,
            template: template.to_string(),
            context,
            to,
            cc: vec![],
            subject,
            follow_up_id: Some(follow_up.id),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FollowUpContact, Frequency};
    use crate::repositories::email_repository::{MockEmailLogRepository, MockMailQueue};
    use crate::repositories::follow_up_repository::MockFollowUpRepository;
    use crate::repositories::instrument_repository::MockInstrumentRepository;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn due_follow_up(with_email: bool) -> FollowUp {
        FollowUp {
            id: 3,
            area: "South".into(),
            party_name: "Harbour Works".into(),
            amount: Decimal::ZERO,
            assigned_to_id: 7,
            created_by_id: 1,
            assignment_status: "assigned".into(),
            details: Some("EMD refund pending".into()),
            latest_comment: None,
            frequency: Frequency::Daily,
            start_from: Utc::now().date_naive(),
            reminder_count: 2,
            stop_reason: None,
            proof_text: None,
            proof_image_path: None,
            stop_remarks: None,
            contacts: vec![FollowUpContact {
                name: "Accounts desk".into(),
                email: with_email.then(|| "accounts@harbour.example".to_string()),
                phone: None,
                org: None,
                added_at: Utc::now(),
            }],
            attachments: vec![],
            instrument_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[tokio::test]
    async fn queues_reminders_for_mailable_follow_ups() {
        let mut follow_ups = MockFollowUpRepository::new();
        follow_ups
            .expect_due_candidates()
            .returning(|_| Ok(vec![due_follow_up(true), due_follow_up(false)]));

        let instruments = MockInstrumentRepository::new();

        let mut email_logs = MockEmailLogRepository::new();
        email_logs
            .expect_create_queued()
            .times(1)
            .returning(|_| Ok(42));

        let mut queue = MockMailQueue::new();
        queue
            .expect_enqueue()
            .times(1)
            .withf(|e| {
                e.email_log_id == 42
                    && e.template == TEMPLATE_REMINDER
                    && e.subject == "Follow Up for Harbour Works"
                    && e.context["reminder"] == 3
            })
            .returning(|_| Ok(()));

        let dispatcher = FollowUpMailDispatcher::new(
            Arc::new(FollowUpService::new(Arc::new(follow_ups))),
            Arc::new(instruments),
            Arc::new(email_logs),
            Arc::new(queue),
        );

        let queued = dispatcher.dispatch_due(Utc::now().date_naive()).await.unwrap();
        assert_eq!(queued, 1);
    }
}
