//! SMTP mailer with template rendering

use std::path::PathBuf;

use chrono::NaiveDate;
use handlebars::{Context, Handlebars, Helper, HelperResult, Output, RenderContext};
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use rust_decimal::Decimal;
use tracing::warn;

use tms_shared::config::MailSettings;

use tms_core::error::DomainError;
use tms_core::repositories::OutboundEmail;

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    templates_dir: PathBuf,
    handlebars: Handlebars<'static>,
}

impl SmtpMailer {
    pub fn new(settings: &MailSettings) -> Result<Self, DomainError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)
            .map_err(|e| DomainError::MailError(e.to_string()))?
            .port(settings.smtp_port)
            .credentials(Credentials::new(
                settings.smtp_user.clone(),
                settings.smtp_password.clone(),
            ))
            .build();

        let from = settings
            .from_address
            .parse()
            .map_err(|_| DomainError::MailError(format!("bad from address: {}", settings.from_address)))?;

        let mut handlebars = Handlebars::new();
        register_helpers(&mut handlebars);

        Ok(Self {
            transport,
            from,
            templates_dir: PathBuf::from(&settings.templates_dir),
            handlebars,
        })
    }

    pub fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, DomainError> {
        let path = self.templates_dir.join(format!("{template}.hbs"));
        let source = std::fs::read_to_string(&path)
            .map_err(|e| DomainError::MailError(format!("template {} unreadable: {e}", path.display())))?;
        self.handlebars
            .render_template(&source, context)
            .map_err(|e| DomainError::MailError(format!("template {template} failed: {e}")))
    }

    pub async fn send(&self, email: &OutboundEmail) -> Result<(), DomainError> {
        let html = self.render(&email.template, &email.context)?;

        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(&email.subject)
            .header(ContentType::TEXT_HTML);

        for recipient in &email.to {
            match recipient.parse() {
                Ok(mailbox) => builder = builder.to(mailbox),
                Err(_) => warn!("skipping unparseable recipient: {}", recipient),
            }
        }
        for recipient in &email.cc {
            match recipient.parse() {
                Ok(mailbox) => builder = builder.cc(mailbox),
                Err(_) => warn!("skipping unparseable cc recipient: {}", recipient),
            }
        }

        let message = builder
            .body(html)
            .map_err(|e| DomainError::MailError(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| DomainError::MailError(e.to_string()))?;

        Ok(())
    }
}

fn register_helpers(handlebars: &mut Handlebars<'_>) {
    handlebars.register_helper(
        "format_date",
        Box::new(
            |h: &Helper,
             _: &Handlebars,
             _: &Context,
             _: &mut RenderContext,
             out: &mut dyn Output|
             -> HelperResult {
                let raw = h.param(0).and_then(|p| p.value().as_str()).unwrap_or("");
                let formatted = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map(|d| d.format("%-d %B %Y").to_string())
                    .unwrap_or_else(|_| raw.to_string());
                out.write(&formatted)?;
                Ok(())
            },
        ),
    );

    handlebars.register_helper(
        "format_currency",
        Box::new(
            |h: &Helper,
             _: &Handlebars,
             _: &Context,
             _: &mut RenderContext,
             out: &mut dyn Output|
             -> HelperResult {
                let value = h.param(0).map(|p| p.value().clone()).unwrap_or_default();
                let amount = value
                    .as_str()
                    .and_then(|s| s.parse::<Decimal>().ok())
                    .or_else(|| value.as_f64().and_then(|f| Decimal::try_from(f).ok()))
                    .unwrap_or_default();
                out.write(&format_inr(amount))?;
                Ok(())
            },
        ),
    );
}

/// Indian digit grouping: the last three digits, then pairs.
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative();
    let as_string = rounded.abs().to_string();
    let (int_part, frac_part) = match as_string.split_once('.') {
        Some((i, f)) => (i.to_string(), format!("{:0<2}", f)),
        None => (as_string, "00".to_string()),
    };

    let grouped = if int_part.len() <= 3 {
        int_part
    } else {
        let (head, tail) = int_part.split_at(int_part.len() - 3);
        let mut parts = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (left, right) = rest.split_at(rest.len() - 2);
            parts.push(right.to_string());
            rest = left;
        }
        parts.push(rest.to_string());
        parts.reverse();
        format!("{},{}", parts.join(","), tail)
    };

    let sign = if negative { "-" } else { "" };
    format!("{sign}\u{20b9}{grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inr_grouping_uses_lakhs_and_crores() {
        assert_eq!(format_inr(Decimal::new(1_23_45_678_00, 2)), "\u{20b9}1,23,45,678.00");
        assert_eq!(format_inr(Decimal::new(999_00, 2)), "\u{20b9}999.00");
        assert_eq!(format_inr(Decimal::new(1_000_50, 2)), "\u{20b9}1,000.50");
        assert_eq!(format_inr(Decimal::new(-50_000_00, 2)), "-\u{20b9}50,000.00");
    }
}
