use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, InlineKeyboardButton, InlineKeyboardMarkup, WebhookInfo};
use url::Url;

use super::{BotApi, BotIdentity, LinkButton, WebhookStatus};

/// Extra headroom on top of the long-poll timeout before the HTTP client gives up.
const HTTP_TIMEOUT_HEADROOM_SECS: u64 = 10;

/// `BotApi` backed by a teloxide `Bot`.
#[derive(Clone)]
pub struct TelegramClient {
    bot: Bot,
}

impl TelegramClient {
    /// Build a client whose HTTP timeout outlasts a `poll_timeout_secs` long poll.
    pub fn new(token: &str, poll_timeout_secs: u32) -> Result<Self> {
        let http = teloxide::net::default_reqwest_settings()
            .timeout(Duration::from_secs(
                u64::from(poll_timeout_secs) + HTTP_TIMEOUT_HEADROOM_SECS,
            ))
            .build()
            .context("Failed to build HTTP client for Telegram")?;
        Ok(Self {
            bot: Bot::with_client(token, http),
        })
    }
}

fn webhook_status(info: WebhookInfo) -> WebhookStatus {
    WebhookStatus {
        url: info.url.map(|u| u.to_string()).unwrap_or_default(),
        pending_update_count: info.pending_update_count,
        ip_address: info.ip_address.map(|ip| ip.to_string()),
        last_error_date: info.last_error_date.map_or(0, |d| d.timestamp()),
        last_error_message: info.last_error_message,
    }
}

#[async_trait]
impl BotApi for TelegramClient {
    async fn get_me(&self) -> Result<BotIdentity> {
        let me = self.bot.get_me().await.context("getMe failed")?;
        Ok(BotIdentity {
            id: me.user.id.0,
            username: me.user.username.clone().unwrap_or_default(),
        })
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        button: Option<&LinkButton>,
    ) -> Result<()> {
        let mut request = self.bot.send_message(ChatId(chat_id), text.to_string());
        if let Some(button) = button {
            let markup = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(
                button.text.clone(),
                button.url.clone(),
            )]]);
            request = request.reply_markup(markup);
        }
        request
            .await
            .with_context(|| format!("sendMessage to chat {} failed", chat_id))?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<()> {
        self.bot
            .answer_callback_query(CallbackQueryId(callback_id.to_string()))
            .await
            .context("answerCallbackQuery failed")?;
        Ok(())
    }

    async fn set_webhook(&self, url: &Url, max_connections: u8) -> Result<()> {
        self.bot
            .set_webhook(url.clone())
            .max_connections(max_connections)
            .await
            .context("setWebhook failed")?;
        Ok(())
    }

    async fn delete_webhook(&self) -> Result<()> {
        self.bot
            .delete_webhook()
            .drop_pending_updates(false)
            .await
            .context("deleteWebhook failed")?;
        Ok(())
    }

    async fn webhook_info(&self) -> Result<WebhookStatus> {
        let info = self
            .bot
            .get_webhook_info()
            .await
            .context("getWebhookInfo failed")?;
        Ok(webhook_status(info))
    }

    async fn get_updates(
        &self,
        offset: Option<i32>,
        timeout_secs: u32,
    ) -> Result<Vec<teloxide::types::Update>> {
        let mut request = self.bot.get_updates().timeout(timeout_secs);
        if let Some(offset) = offset {
            request = request.offset(offset);
        }
        Ok(request.await.context("getUpdates failed")?)
    }
}
