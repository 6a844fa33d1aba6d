use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{reset_webhook, UpdateReceiver, UpdateSource, UpdateStream};
use crate::config::TransportMode;
use crate::telegram::BotApi;
use crate::update::Update;

const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(1);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Exponential backoff between failed polls: 1s, 2s, 4s, ... capped at 60s.
#[derive(Debug)]
pub struct Backoff {
    next: Duration,
    max: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self { next: initial, max }
    }

    /// Delay to wait now; doubles the following one.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = (self.next * 2).min(self.max);
        delay
    }

    pub fn reset(&mut self, initial: Duration) {
        self.next = initial;
    }
}

/// Pulls updates with `getUpdates` long polling.
pub struct PollingSource {
    api: Arc<dyn BotApi>,
    timeout_secs: u32,
}

impl PollingSource {
    pub fn new(api: Arc<dyn BotApi>, timeout_secs: u32) -> Self {
        Self { api, timeout_secs }
    }
}

#[async_trait]
impl UpdateSource for PollingSource {
    fn mode(&self) -> TransportMode {
        TransportMode::Polling
    }

    async fn start(self: Box<Self>) -> Result<UpdateStream> {
        reset_webhook(self.api.as_ref()).await;

        let (tx, rx) = mpsc::unbounded_channel();
        info!(
            "Polling for updates (long-poll timeout {}s)",
            self.timeout_secs
        );
        let task = tokio::spawn(poll_loop(self.api, self.timeout_secs, tx));
        Ok(UpdateStream::new(UpdateReceiver::Unbounded(rx), task, None))
    }
}

/// Runs until the receiving side of `tx` is dropped.
async fn poll_loop(api: Arc<dyn BotApi>, timeout_secs: u32, tx: mpsc::UnboundedSender<Update>) {
    let mut offset: Option<i32> = None;
    let mut backoff = Backoff::new(INITIAL_RETRY_DELAY, MAX_RETRY_DELAY);

    loop {
        if tx.is_closed() {
            break;
        }

        let batch = match api.get_updates(offset, timeout_secs).await {
            Ok(batch) => {
                backoff.reset(INITIAL_RETRY_DELAY);
                batch
            }
            Err(e) => {
                let delay = backoff.next_delay();
                warn!("Polling failed, retrying in {:?}: {:#}", delay, e);
                tokio::time::sleep(delay).await;
                continue;
            }
        };

        for raw in batch {
            offset = Some(raw.id.as_offset());
            let Some(update) = Update::from_telegram(&raw) else {
                debug!(update_id = raw.id.0, "Skipping unsupported update kind");
                continue;
            };
            if tx.send(update).is_err() {
                info!("Update consumer gone, stopping poller");
                return;
            }
        }
    }
}
