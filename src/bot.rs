use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::commands::CommandRegistry;
use crate::config::Config;
use crate::dispatcher::{run_dispatch_loop, Dispatcher};
use crate::telegram::{BotApi, TelegramClient};
use crate::transport::select_source;

/// Start the bot and run until Ctrl+C.
pub async fn run(config: Config) -> Result<()> {
    let client = TelegramClient::new(&config.telegram.bot_token, config.polling.timeout_secs)?;
    run_until(Arc::new(client), &config, shutdown_signal()).await
}

/// Run the bot against `api` until `shutdown` resolves or the update source
/// stops on its own.
///
/// On shutdown the source is stopped first, then every update already
/// accepted is dispatched before returning.
pub async fn run_until<F>(api: Arc<dyn BotApi>, config: &Config, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let me = api
        .get_me()
        .await
        .context("Failed to get bot info from Telegram")?;
    info!("Authorized as @{} (id {})", me.username, me.id);

    let registry = Arc::new(CommandRegistry::builtin());
    let source = select_source(config, Arc::clone(&api), me.clone());
    info!("Starting bot in {} mode...", source.mode());
    let (updates, handle) = source
        .start()
        .await
        .context("Failed to start update source")?
        .into_parts();

    let dispatcher = Arc::new(Dispatcher::new(api, registry, me));
    let dispatch = run_dispatch_loop(dispatcher, updates, config.dispatch.max_in_flight);
    tokio::pin!(dispatch);

    let interrupted = tokio::select! {
        _ = &mut dispatch => {
            warn!("Update source stopped unexpectedly");
            false
        }
        _ = shutdown => {
            info!("Shutting down...");
            true
        }
    };

    handle.stop().await;
    if interrupted {
        dispatch.await;
    }
    info!("Bot stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
