use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::commands::{catalog, CommandContext, CommandRegistry};
use crate::telegram::{BotApi, BotIdentity, LinkButton};
use crate::transport::UpdateReceiver;
use crate::update::{JoinedUser, Update};

/// Routes one update to its reply. Every outbound failure is logged and dropped.
pub struct Dispatcher {
    api: Arc<dyn BotApi>,
    registry: Arc<CommandRegistry>,
    me: BotIdentity,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn BotApi>, registry: Arc<CommandRegistry>, me: BotIdentity) -> Self {
        Self { api, registry, me }
    }

    pub async fn dispatch(&self, update: Update) {
        match update {
            Update::MemberJoined { chat_id, new_users } => {
                for user in new_users.iter().filter(|u| u.id != self.me.id) {
                    self.welcome(chat_id, user).await;
                }
            }
            Update::Command {
                chat_id,
                name,
                args,
                sender_username,
            } => {
                info!(command = %name, chat_id, "Command received");
                let reply = match self.registry.lookup(&name) {
                    Some(handler) => handler(&CommandContext {
                        chat_id,
                        args,
                        sender_username,
                    }),
                    None => catalog::UNKNOWN_COMMAND_TEXT.to_string(),
                };
                self.send(chat_id, &reply, None).await;
            }
            // Group chatter is neither echoed nor logged.
            Update::PlainMessage { .. } => {}
            Update::Callback { id, data, chat_id } => {
                if let Err(e) = self.api.answer_callback(&id).await {
                    error!("Failed to acknowledge callback {}: {:#}", id, e);
                }
                debug!(data = %data, "Callback received");

                let Some(chat_id) = chat_id else {
                    warn!("Callback {} has no accessible message; nothing to reply to", id);
                    return;
                };
                let reply = match data.as_str() {
                    "about" => catalog::ABOUT_TEXT,
                    "roadmap" => catalog::ROADMAP_TEXT,
                    _ => catalog::UNKNOWN_CALLBACK_TEXT,
                };
                self.send(chat_id, reply, None).await;
            }
        }
    }

    async fn welcome(&self, chat_id: i64, user: &JoinedUser) {
        let start_link = format!("https://t.me/{}?start=welcome", self.me.username);
        let button = match Url::parse(&start_link) {
            Ok(url) => Some(LinkButton {
                text: catalog::WELCOME_BUTTON_TEXT.to_string(),
                url,
            }),
            Err(e) => {
                warn!("Invalid start link {}: {}", start_link, e);
                None
            }
        };
        self.send(chat_id, &catalog::welcome_text(&user.mention()), button.as_ref())
            .await;
    }

    async fn send(&self, chat_id: i64, text: &str, button: Option<&LinkButton>) {
        if let Err(e) = self.api.send_message(chat_id, text, button).await {
            error!(chat_id, "Failed to send message: {:#}", e);
        }
    }
}

/// Consume updates in arrival order, running each dispatch as its own task.
///
/// At most `max_in_flight` dispatches run at once; when all permits are taken
/// the loop stops pulling from the stream until one finishes. Returns once the
/// stream closes and every started dispatch has completed.
pub async fn run_dispatch_loop(
    dispatcher: Arc<Dispatcher>,
    mut updates: UpdateReceiver,
    max_in_flight: usize,
) {
    let semaphore = Arc::new(Semaphore::new(max_in_flight));
    let mut workers = JoinSet::new();

    while let Some(update) = updates.recv().await {
        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };
        let worker = Arc::clone(&dispatcher);
        workers.spawn(async move {
            let _permit = permit;
            worker.dispatch(update).await;
        });

        while let Some(result) = workers.try_join_next() {
            if let Err(e) = result {
                error!("Dispatch task crashed: {}", e);
            }
        }
    }

    while let Some(result) = workers.join_next().await {
        if let Err(e) = result {
            error!("Dispatch task crashed: {}", e);
        }
    }
    info!("Update stream closed");
}
