//! Telegram Bot API notifier (`sendMessage`).

use std::time::Duration;

use pm25_traits::{AlertMessage, AlertNotifier, BoxError};

use crate::error::SinkError;
use crate::message::format_alert;

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Scheme and host, e.g. `https://api.telegram.org`.
    pub api_base: String,
    pub bot_token: String,
    pub chat_id: String,
    pub timeout: Duration,
}

/// One POST per alert, no retries. Only HTTP 200 counts as delivered.
pub struct TelegramNotifier {
    agent: ureq::Agent,
    endpoint: String,
    token: String,
    chat_id: String,
}

impl core::fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramNotifier {
    pub fn new(cfg: TelegramConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(cfg.timeout).build();
        Self {
            agent,
            endpoint: send_message_url(&cfg.api_base, &cfg.bot_token),
            token: cfg.bot_token,
            chat_id: cfg.chat_id,
        }
    }

    fn post(&self, text: &str) -> Result<(), SinkError> {
        let resp = self
            .agent
            .post(&self.endpoint)
            .send_form(&[("chat_id", self.chat_id.as_str()), ("text", text)])?;
        let status = resp.status();
        if status != 200 {
            return Err(SinkError::Status {
                status,
                body: resp.into_string().unwrap_or_default(),
            });
        }
        Ok(())
    }
}

/// `{api_base}/bot{token}/sendMessage`, tolerating a trailing slash on the base.
pub fn send_message_url(api_base: &str, token: &str) -> String {
    format!("{}/bot{}/sendMessage", api_base.trim_end_matches('/'), token)
}

impl AlertNotifier for TelegramNotifier {
    fn send_alert(&mut self, alert: &AlertMessage) -> Result<(), BoxError> {
        let text = format_alert(alert);
        self.post(&text).map_err(|e| e.redact(&self.token))?;
        tracing::debug!(chat_id = %self.chat_id, level = alert.level_name, "telegram alert delivered");
        Ok(())
    }
}
