//! Update sources. Both transport modes end up as one `UpdateStream`.

mod listener;
pub mod polling;
pub mod webhook;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::{Config, TransportMode};
use crate::telegram::{BotApi, BotIdentity};
use crate::update::Update;

pub use polling::PollingSource;
pub use webhook::WebhookSource;

/// Receiving half of the update channel.
///
/// Polling feeds an unbounded channel; the webhook handler feeds a bounded one
/// so a slow dispatcher pushes back on Telegram's requests.
pub enum UpdateReceiver {
    Bounded(mpsc::Receiver<Update>),
    Unbounded(mpsc::UnboundedReceiver<Update>),
}

impl UpdateReceiver {
    pub async fn recv(&mut self) -> Option<Update> {
        match self {
            UpdateReceiver::Bounded(rx) => rx.recv().await,
            UpdateReceiver::Unbounded(rx) => rx.recv().await,
        }
    }
}

/// A started update source.
pub struct UpdateStream {
    pub updates: UpdateReceiver,
    task: JoinHandle<()>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl UpdateStream {
    pub fn new(
        updates: UpdateReceiver,
        task: JoinHandle<()>,
        shutdown: Option<oneshot::Sender<()>>,
    ) -> Self {
        Self {
            updates,
            task,
            shutdown,
        }
    }

    /// Split into the receiver and a handle that stops the producer.
    pub fn into_parts(self) -> (UpdateReceiver, SourceHandle) {
        (
            self.updates,
            SourceHandle {
                task: self.task,
                shutdown: self.shutdown,
            },
        )
    }
}

/// Stops whatever is producing updates.
pub struct SourceHandle {
    task: JoinHandle<()>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl SourceHandle {
    pub async fn stop(self) {
        match self.shutdown {
            // Graceful: let the producer finish what it is doing.
            Some(tx) => {
                let _ = tx.send(());
                if let Err(e) = self.task.await {
                    warn!("Update source task ended abnormally: {}", e);
                }
            }
            None => self.task.abort(),
        }
    }
}

/// Something that can be started to yield a stream of updates.
#[async_trait]
pub trait UpdateSource: Send {
    fn mode(&self) -> TransportMode;

    async fn start(self: Box<Self>) -> Result<UpdateStream>;
}

/// Pick the source for the configured mode. The only place the mode is branched on.
pub fn select_source(
    config: &Config,
    api: Arc<dyn BotApi>,
    me: BotIdentity,
) -> Box<dyn UpdateSource> {
    match config.mode() {
        TransportMode::Polling => Box::new(PollingSource::new(api, config.polling.timeout_secs)),
        TransportMode::Webhook => Box::new(WebhookSource::new(
            api,
            me,
            config.telegram.bot_token.clone(),
            webhook::WebhookSettings::from_config(&config.webhook),
        )),
    }
}

/// Drop any webhook registration left behind by a previous run.
///
/// Telegram refuses `getUpdates` while a webhook is set, so this runs before
/// either mode starts. Failure only means there was nothing to delete.
pub async fn reset_webhook(api: &dyn BotApi) {
    info!("Removing existing webhook registration...");
    match api.delete_webhook().await {
        Ok(()) => info!("Webhook removed"),
        Err(e) => warn!("Failed to remove webhook: {:#}", e),
    }
}
