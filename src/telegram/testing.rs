//! In-memory `BotApi` double that records every call.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use url::Url;

use super::{BotApi, BotIdentity, LinkButton, WebhookStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Send {
        chat_id: i64,
        text: String,
        button: Option<LinkButton>,
    },
    AnswerCallback(String),
    SetWebhook {
        url: String,
        max_connections: u8,
    },
    DeleteWebhook,
    WebhookInfo,
    GetUpdates {
        offset: Option<i32>,
        timeout_secs: u32,
    },
}

/// Scripted result for one `get_updates` call.
pub enum PollStep {
    Updates(Vec<serde_json::Value>),
    Fail,
}

pub struct RecordingBot {
    pub identity: BotIdentity,
    calls: Mutex<Vec<Call>>,
    polls: Mutex<VecDeque<PollStep>>,
    webhook: Mutex<WebhookStatus>,
    fail_sends: AtomicBool,
    fail_delete_webhook: AtomicBool,
    fail_set_webhook: AtomicBool,
}

impl RecordingBot {
    pub fn new() -> Self {
        Self {
            identity: BotIdentity {
                id: 999,
                username: "gofer_uz_bot".to_string(),
            },
            calls: Mutex::new(Vec::new()),
            polls: Mutex::new(VecDeque::new()),
            webhook: Mutex::new(WebhookStatus::default()),
            fail_sends: AtomicBool::new(false),
            fail_delete_webhook: AtomicBool::new(false),
            fail_set_webhook: AtomicBool::new(false),
        }
    }

    pub fn failing_sends(self) -> Self {
        self.fail_sends.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_delete_webhook(self) -> Self {
        self.fail_delete_webhook.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_set_webhook(self) -> Self {
        self.fail_set_webhook.store(true, Ordering::SeqCst);
        self
    }

    pub fn with_webhook(self, status: WebhookStatus) -> Self {
        *self.webhook.lock().unwrap() = status;
        self
    }

    pub fn push_poll(&self, step: PollStep) {
        self.polls.lock().unwrap().push_back(step);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Texts of every attempted send, in order.
    pub fn sent_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BotApi for RecordingBot {
    async fn get_me(&self) -> Result<BotIdentity> {
        Ok(self.identity.clone())
    }

    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        button: Option<&LinkButton>,
    ) -> Result<()> {
        self.record(Call::Send {
            chat_id,
            text: text.to_string(),
            button: button.cloned(),
        });
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(anyhow!("chat not found"));
        }
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<()> {
        self.record(Call::AnswerCallback(callback_id.to_string()));
        Ok(())
    }

    async fn set_webhook(&self, url: &Url, max_connections: u8) -> Result<()> {
        self.record(Call::SetWebhook {
            url: url.to_string(),
            max_connections,
        });
        if self.fail_set_webhook.load(Ordering::SeqCst) {
            return Err(anyhow!("bad webhook: HTTPS url must be provided"));
        }
        self.webhook.lock().unwrap().url = url.to_string();
        Ok(())
    }

    async fn delete_webhook(&self) -> Result<()> {
        self.record(Call::DeleteWebhook);
        if self.fail_delete_webhook.load(Ordering::SeqCst) {
            return Err(anyhow!("webhook is not set"));
        }
        self.webhook.lock().unwrap().url.clear();
        Ok(())
    }

    async fn webhook_info(&self) -> Result<WebhookStatus> {
        self.record(Call::WebhookInfo);
        Ok(self.webhook.lock().unwrap().clone())
    }

    async fn get_updates(
        &self,
        offset: Option<i32>,
        timeout_secs: u32,
    ) -> Result<Vec<teloxide::types::Update>> {
        self.record(Call::GetUpdates {
            offset,
            timeout_secs,
        });
        let step = self.polls.lock().unwrap().pop_front();
        match step {
            Some(PollStep::Updates(values)) => Ok(values
                .into_iter()
                .map(|v| wire::decode(&v))
                .collect()),
            Some(PollStep::Fail) => Err(anyhow!("connection reset")),
            // Script exhausted: behave like an idle long poll.
            None => {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                Ok(Vec::new())
            }
        }
    }
}

/// Wire-format builders for test updates.
pub mod wire {
    use serde_json::{json, Value};

    /// Decode through the JSON text, the way real request bodies arrive.
    /// teloxide's `Update` does not deserialize correctly from a `Value`.
    pub fn decode(value: &Value) -> teloxide::types::Update {
        serde_json::from_str(&value.to_string()).expect("test update must decode")
    }

    pub fn user(id: u64, first_name: &str, username: Option<&str>) -> Value {
        let mut user = json!({"id": id, "is_bot": false, "first_name": first_name});
        if let Some(username) = username {
            user["username"] = json!(username);
        }
        user
    }

    pub fn group_chat(id: i64) -> Value {
        json!({"id": id, "type": "supergroup", "title": "Gophers"})
    }

    pub fn text_message(update_id: u32, chat_id: i64, from: Value, text: &str) -> Value {
        let mut message = json!({
            "message_id": update_id,
            "date": 1_700_000_000,
            "chat": group_chat(chat_id),
            "from": from,
            "text": text,
        });
        if text.starts_with('/') {
            let len = text.split_whitespace().next().unwrap_or("").encode_utf16().count();
            message["entities"] = json!([{"type": "bot_command", "offset": 0, "length": len}]);
        }
        json!({"update_id": update_id, "message": message})
    }

    pub fn members_joined(update_id: u32, chat_id: i64, members: Vec<Value>) -> Value {
        json!({
            "update_id": update_id,
            "message": {
                "message_id": update_id,
                "date": 1_700_000_000,
                "chat": group_chat(chat_id),
                "from": members[0].clone(),
                "new_chat_members": members,
            }
        })
    }

    pub fn callback(update_id: u32, chat_id: i64, callback_id: &str, data: &str) -> Value {
        json!({
            "update_id": update_id,
            "callback_query": {
                "id": callback_id,
                "from": user(7, "Ali", Some("ali")),
                "chat_instance": "-42",
                "data": data,
                "message": {
                    "message_id": 10,
                    "date": 1_700_000_000,
                    "chat": group_chat(chat_id),
                    "from": {"id": 999, "is_bot": true, "first_name": "Gofer", "username": "gofer_uz_bot"},
                    "text": "menu",
                }
            }
        })
    }
}

/// Formatted log output from this crate, captured on the current thread.
pub mod logs {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing::subscriber::DefaultGuard;
    use tracing_subscriber::fmt::MakeWriter;
    use tracing_subscriber::EnvFilter;

    #[derive(Clone, Default)]
    pub struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Capture every level until the guard drops.
    pub fn capture() -> (Captured, DefaultGuard) {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("gofer_bot=trace"))
            .with_writer(captured.clone())
            .with_ansi(false)
            .finish();
        (captured, tracing::subscriber::set_default(subscriber))
    }
}
