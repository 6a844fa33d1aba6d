pub mod client;
#[cfg(test)]
pub mod testing;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use url::Url;

pub use client::TelegramClient;

/// Who the bot is, as reported by `getMe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BotIdentity {
    pub id: u64,
    pub username: String,
}

/// A single URL button shown under a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkButton {
    pub text: String,
    pub url: Url,
}

/// Snapshot of the webhook registration held by Telegram.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookStatus {
    /// Empty when no webhook is registered.
    pub url: String,
    pub pending_update_count: u32,
    pub ip_address: Option<String>,
    /// Unix seconds of the most recent delivery error, 0 when there is none.
    pub last_error_date: i64,
    pub last_error_message: Option<String>,
}

impl WebhookStatus {
    pub fn is_set(&self) -> bool {
        !self.url.is_empty()
    }

    pub fn has_error(&self) -> bool {
        self.last_error_date != 0
    }
}

/// The slice of the Bot API this bot relies on.
///
/// Everything above the transport layer talks to Telegram through this trait,
/// so dispatch and update sources can be exercised without a network.
#[async_trait]
pub trait BotApi: Send + Sync {
    async fn get_me(&self) -> Result<BotIdentity>;

    async fn send_message(&self, chat_id: i64, text: &str, button: Option<&LinkButton>)
        -> Result<()>;

    /// Stops the loading spinner on the button the user pressed.
    async fn answer_callback(&self, callback_id: &str) -> Result<()>;

    async fn set_webhook(&self, url: &Url, max_connections: u8) -> Result<()>;

    /// Removes the webhook, keeping pending updates.
    async fn delete_webhook(&self) -> Result<()>;

    async fn webhook_info(&self) -> Result<WebhookStatus>;

    /// Long-poll for updates newer than `offset`.
    async fn get_updates(
        &self,
        offset: Option<i32>,
        timeout_secs: u32,
    ) -> Result<Vec<teloxide::types::Update>>;
}

/// Decode a webhook request body into a wire update.
pub fn decode_update(body: &[u8]) -> Result<teloxide::types::Update> {
    Ok(serde_json::from_slice(body)?)
}
