//! Outbound mail worker
//!
//! Two duties on one loop: scan for follow-ups due today and queue their
//! reminders, then drain the queue over SMTP with bounded retries.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{error, info, warn};

use tms_core::repositories::{EmailLogRepository, FollowUpRepository, MailQueue, OutboundEmail};
use tms_core::services::{FollowUpMailDispatcher, FollowUpService};
use tms_infrastructure::database::connection;
use tms_infrastructure::database::postgres::{
    PgEmailLogRepository, PgFollowUpRepository, PgInstrumentRepository,
};
use tms_infrastructure::mailer::SmtpMailer;
use tms_infrastructure::queue::RedisMailQueue;
use tms_shared::config::AppConfig;
use tms_shared::utils::mask_email;

const DEQUEUE_BLOCK_SECS: u64 = 5;

struct Worker {
    dispatcher: FollowUpMailDispatcher<
        PgFollowUpRepository,
        PgInstrumentRepository,
        PgEmailLogRepository,
        RedisMailQueue,
    >,
    follow_up_repo: Arc<PgFollowUpRepository>,
    email_logs: Arc<PgEmailLogRepository>,
    queue: Arc<RedisMailQueue>,
    mailer: SmtpMailer,
    max_retries: u32,
}

impl Worker {
    async fn deliver(&self, email: OutboundEmail) {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match self.mailer.send(&email).await {
                Ok(()) => {
                    if let Err(e) = self.email_logs.mark_sent(email.email_log_id).await {
                        error!("failed to mark email {} sent: {}", email.email_log_id, e);
                    }
                    if let Some(follow_up_id) = email.follow_up_id {
                        if let Err(e) =
                            self.follow_up_repo.increment_reminder_count(follow_up_id).await
                        {
                            error!("failed to bump reminder count: {}", e);
                        }
                    }
                    let recipients: Vec<String> =
                        email.to.iter().map(|r| mask_email(r)).collect();
                    info!(
                        email_log_id = email.email_log_id,
                        recipients = ?recipients,
                        attempts,
                        "email sent"
                    );
                    return;
                }
                Err(e) if attempts <= self.max_retries => {
                    warn!(
                        email_log_id = email.email_log_id,
                        attempts, "send failed, backing off: {}", e
                    );
                    tokio::time::sleep(Duration::from_secs(2u64.pow(attempts))).await;
                }
                Err(e) => {
                    error!(
                        email_log_id = email.email_log_id,
                        "send failed permanently: {}", e
                    );
                    if let Err(log_err) = self
                        .email_logs
                        .mark_failed(email.email_log_id, &e.to_string(), attempts)
                        .await
                    {
                        error!("failed to mark email failed: {}", log_err);
                    }
                    return;
                }
            }
        }
    }

    async fn run(&self, scan_interval: Duration) {
        let mut last_scan: Option<Instant> = None;

        loop {
            let scan_due =
                last_scan.map_or(true, |at| at.elapsed() >= scan_interval);
            if scan_due {
                match self.dispatcher.dispatch_due(Utc::now().date_naive()).await {
                    Ok(queued) => info!(queued, "follow-up scan complete"),
                    Err(e) => error!("follow-up scan failed: {}", e),
                }
                last_scan = Some(Instant::now());
            }

            tokio::select! {
                popped = self.queue.dequeue(DEQUEUE_BLOCK_SECS) => match popped {
                    Ok(Some(email)) => self.deliver(email).await,
                    Ok(None) => {}
                    Err(e) => {
                        error!("queue read failed: {}", e);
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown signal received, draining stopped");
                    return;
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tms_shared::telemetry::init_telemetry();

    info!("Mail worker starting...");

    let config = AppConfig::load()?;

    let pool =
        connection::create_pool(&config.database.url, config.database.max_connections).await?;
    info!("Database connection established.");

    let queue = Arc::new(RedisMailQueue::connect(&config.redis.url)?);
    let mailer = SmtpMailer::new(&config.mail)?;

    let follow_up_repo = Arc::new(PgFollowUpRepository::new(pool.clone()));
    let email_logs = Arc::new(PgEmailLogRepository::new(pool.clone()));

    let dispatcher = FollowUpMailDispatcher::new(
        Arc::new(FollowUpService::new(follow_up_repo.clone())),
        Arc::new(PgInstrumentRepository::new(pool.clone())),
        email_logs.clone(),
        queue.clone(),
    );

    let worker = Worker {
        dispatcher,
        follow_up_repo,
        email_logs,
        queue,
        mailer,
        max_retries: config.mail.max_retries,
    };

    worker.run(Duration::from_secs(config.mail.scan_interval_secs)).await;

    info!("Mail worker stopped.");
    Ok(())
}
