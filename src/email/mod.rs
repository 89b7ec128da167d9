use serde::Serialize;
use thiserror::Error;

use crate::config::MailConfig;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Mail request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Mail API returned status {0}")]
    Status(u16),
}

#[derive(Debug, Serialize)]
struct MailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Thin client for the transactional-mail HTTP API.
///
/// Confirmation and password-reset mails are part of their flows and surface
/// failures; notification mails (freelancer selected) are best-effort and
/// only logged.
#[derive(Clone)]
pub struct EmailService {
    client: reqwest::Client,
    config: MailConfig,
}

impl EmailService {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub async fn send(&self, to: &str, subject: &str, text: &str) -> Result<(), EmailError> {
        let payload = MailPayload {
            from: &self.config.from,
            to,
            subject,
            text,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EmailError::Status(response.status().as_u16()));
        }

        tracing::info!(to, subject, "email sent");
        Ok(())
    }
}
