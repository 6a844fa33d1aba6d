use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};
use url::Url;

use super::listener::{serve, ConnectionLimits};
use super::{reset_webhook, UpdateReceiver, UpdateSource, UpdateStream};
use crate::config::{TransportMode, WebhookConfig};
use crate::telegram::{decode_update, BotApi, BotIdentity};
use crate::update::Update;

/// Upper bound on handling and answering a single request, including time
/// spent waiting for room in the update queue.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct WebhookSettings {
    pub url: String,
    pub port: u16,
    pub max_connections: u8,
    pub queue_capacity: usize,
}

impl WebhookSettings {
    pub fn from_config(config: &WebhookConfig) -> Self {
        Self {
            url: config.url.clone().unwrap_or_default(),
            port: config.port,
            max_connections: config.max_connections,
            queue_capacity: config.queue_capacity,
        }
    }
}

/// The URL registered with Telegram.
///
/// A bare host (`https://example.com` or `https://example.com/`) gets the bot
/// token appended as its path so the endpoint cannot be guessed; any other
/// path is kept as configured.
pub fn effective_webhook_url(raw: &str, token: &str) -> Result<Url> {
    let mut url =
        Url::parse(raw.trim()).with_context(|| format!("Invalid webhook URL: {}", raw))?;
    if url.path().len() <= 1 {
        url.set_path(&format!("/{}", token));
    }
    Ok(url)
}

/// Receives updates pushed by Telegram over HTTPS.
pub struct WebhookSource {
    api: Arc<dyn BotApi>,
    me: BotIdentity,
    token: String,
    settings: WebhookSettings,
}

impl WebhookSource {
    pub fn new(
        api: Arc<dyn BotApi>,
        me: BotIdentity,
        token: String,
        settings: WebhookSettings,
    ) -> Self {
        Self {
            api,
            me,
            token,
            settings,
        }
    }

    async fn register(&self) -> Result<Url> {
        let url = effective_webhook_url(&self.settings.url, &self.token)?;
        info!("Registering webhook with Telegram...");
        self.api
            .set_webhook(&url, self.settings.max_connections)
            .await
            .context("Webhook registration failed")?;

        match self.api.webhook_info().await {
            Ok(status) if status.has_error() => warn!(
                "Telegram reports a webhook error: {}",
                status.last_error_message.as_deref().unwrap_or("unknown")
            ),
            Ok(_) => info!("Webhook registered without errors"),
            Err(e) => warn!("Could not read webhook info: {:#}", e),
        }
        Ok(url)
    }
}

#[async_trait]
impl UpdateSource for WebhookSource {
    fn mode(&self) -> TransportMode {
        TransportMode::Webhook
    }

    async fn start(self: Box<Self>) -> Result<UpdateStream> {
        reset_webhook(self.api.as_ref()).await;
        self.register().await?;

        let (tx, rx) = mpsc::channel(self.settings.queue_capacity);
        let state = WebhookState {
            api: Arc::clone(&self.api),
            me: self.me.clone(),
            tx,
        };
        let app = router(state, &self.token);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.settings.port));
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind webhook listener on {}", addr))?;
        info!(
            "Webhook server listening on {} (health check at /health)",
            listener.local_addr().unwrap_or(addr)
        );

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            serve(listener, app, ConnectionLimits::default(), shutdown_rx).await;
            info!("Webhook server stopped");
        });

        Ok(UpdateStream::new(
            UpdateReceiver::Bounded(rx),
            task,
            Some(shutdown_tx),
        ))
    }
}

#[derive(Clone)]
struct WebhookState {
    api: Arc<dyn BotApi>,
    me: BotIdentity,
    tx: mpsc::Sender<Update>,
}

fn router(state: WebhookState, token: &str) -> Router {
    Router::new()
        .route(&format!("/{}", token), any(receive_update))
        .route("/health", get(health))
        .route("/webhook-test", get(liveness))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn receive_update(
    State(state): State<WebhookState>,
    method: Method,
    body: Bytes,
) -> Result<StatusCode, (StatusCode, &'static str)> {
    if method != Method::POST {
        warn!("Rejected {} request on the update endpoint", method);
        return Err((
            StatusCode::METHOD_NOT_ALLOWED,
            "Faqat POST so'rovlari qabul qilinadi",
        ));
    }

    let raw = decode_update(&body).map_err(|e| {
        error!("Failed to decode webhook update: {:#}", e);
        (StatusCode::BAD_REQUEST, "Update ni qayta ishlashda xatolik")
    })?;

    let Some(update) = Update::from_telegram(&raw) else {
        debug!(update_id = raw.id.0, "Skipping unsupported update kind");
        return Ok(StatusCode::OK);
    };

    // Waits while the queue is full, holding Telegram's request open.
    if state.tx.send(update).await.is_err() {
        error!("Update queue is closed");
        return Err((StatusCode::SERVICE_UNAVAILABLE, "update queue unavailable"));
    }
    Ok(StatusCode::OK)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    bot: BotIdentity,
    webhook: WebhookHealth,
}

#[derive(Serialize)]
struct WebhookHealth {
    url: String,
    is_set: bool,
    last_error: String,
    error_date: i64,
    pending: u32,
    ip_address: String,
    server_time: String,
}

async fn health(State(state): State<WebhookState>) -> Json<HealthResponse> {
    let status = state.api.webhook_info().await.unwrap_or_else(|e| {
        warn!("Health check could not read webhook info: {:#}", e);
        Default::default()
    });
    Json(HealthResponse {
        status: "ok",
        bot: state.me.clone(),
        webhook: WebhookHealth {
            is_set: status.is_set(),
            url: status.url,
            last_error: status.last_error_message.unwrap_or_default(),
            error_date: status.last_error_date,
            pending: status.pending_update_count,
            ip_address: status.ip_address.unwrap_or_default(),
            server_time: chrono::Utc::now().to_rfc3339(),
        },
    })
}

async fn liveness() -> &'static str {
    "Webhook server is running!"
}
