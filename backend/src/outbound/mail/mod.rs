//! Mail transport adapters for the `Mailer` port.
//!
//! Two implementations exist: [`SmtpMailer`] delivers over async SMTP, and
//! [`LoggingMailer`] is substituted at startup when SMTP environment
//! variables are absent — every send is then logged and treated as a no-op
//! success, which keeps development and test deployments working without a
//! mail account.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use crate::domain::ports::{MailDeliveryError, Mailer, OutgoingEmail};

/// Display name used on the From line and in the HTML chrome.
const SENDER_NAME: &str = "Atelier School of Fine Arts";

/// SMTP settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    /// SMTP relay host.
    pub host: String,
    /// SMTP submission port.
    pub port: u16,
    /// Authentication username.
    pub username: String,
    /// Authentication password.
    pub password: String,
    /// From address; defaults to the username.
    pub from_email: String,
}

impl MailConfig {
    /// Resolve the configuration from process environment variables.
    ///
    /// Returns `None` when any of `SMTP_HOST`, `SMTP_USER`, or `SMTP_PASS`
    /// is unset; the caller then substitutes the logging mailer.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve the configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let host = lookup("SMTP_HOST")?;
        let username = lookup("SMTP_USER")?;
        let password = lookup("SMTP_PASS")?;
        let port = lookup("SMTP_PORT")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(587);
        let from_email = lookup("SMTP_FROM_EMAIL").unwrap_or_else(|| username.clone());
        Some(Self {
            host,
            port,
            username,
            password,
            from_email,
        })
    }
}

/// Wrap a plain-text body in the fixed branding chrome.
///
/// The body is HTML-escaped and newlines become `<br>`; the chrome itself
/// is static.
fn branded_html(body_text: &str) -> String {
    let escaped = body_text
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\n', "<br>");
    format!(
        "<div style=\"font-family: Georgia, serif; max-width: 600px; margin: 0 auto;\">\
           <div style=\"background: #1f2a44; color: #f5f0e8; padding: 16px 24px;\">\
             <h2 style=\"margin: 0;\">{SENDER_NAME}</h2>\
           </div>\
           <div style=\"padding: 24px; color: #2b2b2b; line-height: 1.6;\">{escaped}</div>\
           <div style=\"padding: 12px 24px; color: #8a8a8a; font-size: 12px; \
                        border-top: 1px solid #e5e0d8;\">\
             This is an automated message from {SENDER_NAME}.\
           </div>\
         </div>"
    )
}

/// Async SMTP implementation of the `Mailer` port.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build the transport from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns `MailDeliveryError::Transport` when the relay parameters are
    /// rejected, or `MailDeliveryError::Compose` when the configured from
    /// address cannot be parsed.
    pub fn new(config: &MailConfig) -> Result<Self, MailDeliveryError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|err| MailDeliveryError::transport(err.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        let from: Mailbox = format!("{SENDER_NAME} <{}>", config.from_email)
            .parse()
            .map_err(|err: lettre::address::AddressError| {
                MailDeliveryError::compose(err.to_string())
            })?;
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailDeliveryError> {
        let to: Mailbox = format!("{} <{}>", email.to_name, email.to_email)
            .parse()
            .map_err(|err: lettre::address::AddressError| {
                MailDeliveryError::invalid_recipient(err.to_string())
            })?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&email.subject)
            .header(ContentType::TEXT_HTML)
            .body(branded_html(&email.body_text))
            .map_err(|err| MailDeliveryError::compose(err.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|err| MailDeliveryError::transport(err.to_string()))?;
        debug!(to = %email.to_email, subject = %email.subject, "email sent");
        Ok(())
    }
}

/// No-op mailer used when SMTP is not configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMailer;

#[async_trait]
impl Mailer for LoggingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailDeliveryError> {
        info!(
            to = %email.to_email,
            subject = %email.subject,
            "smtp transport not configured; email logged and skipped"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        move |name| map.get(name).map(|value| (*value).to_owned())
    }

    #[test]
    fn config_requires_host_user_and_pass() {
        assert!(
            MailConfig::from_lookup(lookup_from(&[
                ("SMTP_HOST", "smtp.example.com"),
                ("SMTP_USER", "mailer"),
            ]))
            .is_none()
        );
    }

    #[test]
    fn config_defaults_port_and_from_address() {
        let config = MailConfig::from_lookup(lookup_from(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_USER", "mailer@example.com"),
            ("SMTP_PASS", "secret"),
        ]))
        .expect("config resolves");
        assert_eq!(config.port, 587);
        assert_eq!(config.from_email, "mailer@example.com");
    }

    #[test]
    fn config_honours_explicit_port_and_from() {
        let config = MailConfig::from_lookup(lookup_from(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "2525"),
            ("SMTP_USER", "mailer@example.com"),
            ("SMTP_PASS", "secret"),
            ("SMTP_FROM_EMAIL", "no-reply@atelier.example"),
        ]))
        .expect("config resolves");
        assert_eq!(config.port, 2525);
        assert_eq!(config.from_email, "no-reply@atelier.example");
    }

    #[test]
    fn branded_html_escapes_and_converts_newlines() {
        let html = branded_html("Dear A,\nfees < 100 & rising");
        assert!(html.contains("Dear A,<br>fees &lt; 100 &amp; rising"));
        assert!(html.contains(SENDER_NAME));
    }

    #[tokio::test]
    async fn logging_mailer_always_succeeds() {
        let email = OutgoingEmail {
            to_name: "Mira".to_owned(),
            to_email: "mira@example.com".to_owned(),
            subject: "Hello".to_owned(),
            body_text: "Hi".to_owned(),
        };
        assert!(LoggingMailer.send(&email).await.is_ok());
    }
}
