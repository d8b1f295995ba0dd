/// Slack notifier.
///
/// Posts intake results with the Slack Web API (`chat.postMessage`) using a
/// bot token. Slack answers HTTP 200 with `{"ok": false, "error": ...}` for
/// most failures, so the body is checked as well as the status.
use ablage_core::{IntakeError, Notifier};
use ablage_logging::redact_secrets;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

const SLACK_API_BASE: &str = "https://slack.com/api";

// ---------------------------------------------------------------------------
// Slack wire types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SlackPostMessage<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct SlackResponse {
    ok: bool,
    error: Option<String>,
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

pub struct SlackNotifier {
    bot_token: String,
    channel: String,
    api_base: String,
    http_client: Client,
}

impl SlackNotifier {
    pub fn new(bot_token: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            channel: channel.into(),
            api_base: SLACK_API_BASE.to_string(),
            http_client: Client::new(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub async fn send_message(&self, text: &str) -> Result<(), IntakeError> {
        let url = format!("{}/chat.postMessage", self.api_base.trim_end_matches('/'));
        let body = SlackPostMessage {
            channel: &self.channel,
            text,
        };
        let res = self
            .http_client
            .post(&url)
            .bearer_auth(&self.bot_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| IntakeError::Notification(redact_secrets(&e.to_string())))?;

        let status = res.status();
        let raw = res.text().await.unwrap_or_default();
        if !status.is_success() {
            let err = redact_secrets(&raw);
            error!("[Slack] chat.postMessage failed with {}: {}", status, err);
            return Err(IntakeError::Notification(format!("HTTP {status}: {err}")));
        }

        match serde_json::from_str::<SlackResponse>(&raw) {
            Ok(SlackResponse { ok: true, .. }) => {}
            Ok(SlackResponse { error, .. }) => {
                let err = error.unwrap_or_else(|| "unknown_error".into());
                error!("[Slack] chat.postMessage rejected: {}", err);
                return Err(IntakeError::Notification(err));
            }
            Err(e) => {
                return Err(IntakeError::Notification(format!(
                    "unreadable Slack response: {e}"
                )));
            }
        }

        info!("[Slack] Sent message to channel {}", self.channel);
        Ok(())
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    fn name(&self) -> &str {
        "slack"
    }

    async fn notify(&self, text: &str) -> Result<(), IntakeError> {
        self.send_message(text).await
    }
}
