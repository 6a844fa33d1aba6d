use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// How updates reach the bot. Fixed for the lifetime of the process.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Webhook,
    #[default]
    Polling,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportMode::Webhook => write!(f, "webhook"),
            TransportMode::Polling => write!(f, "polling"),
        }
    }
}

impl std::str::FromStr for TransportMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "webhook" => Ok(TransportMode::Webhook),
            "polling" => Ok(TransportMode::Polling),
            other => bail!("Unknown transport mode '{}' (expected webhook or polling)", other),
        }
    }
}

/// Log verbosity. Unknown names fall back to `Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "warn" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Directive string for `tracing_subscriber::EnvFilter`.
    pub fn filter_directive(&self) -> String {
        format!("{},gofer_bot={}", self.as_str(), self.as_str())
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TransportConfig {
    #[serde(default)]
    pub mode: TransportMode,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebhookConfig {
    /// Public callback URL registered with Telegram.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_webhook_port")]
    pub port: u16,
    #[serde(default = "default_max_connections")]
    pub max_connections: u8,
    /// Capacity of the channel between the HTTP handler and the dispatcher.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingConfig {
    #[serde(default = "default_poll_timeout")]
    pub timeout_secs: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DispatchConfig {
    /// Upper bound on concurrently running dispatch tasks.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_webhook_port() -> u16 {
    8443
}

fn default_max_connections() -> u8 {
    40
}

fn default_queue_capacity() -> usize {
    100
}

fn default_poll_timeout() -> u32 {
    60
}

fn default_max_in_flight() -> usize {
    64
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            port: default_webhook_port(),
            max_connections: default_max_connections(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_poll_timeout(),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_in_flight: default_max_in_flight(),
        }
    }
}

impl Config {
    pub fn mode(&self) -> TransportMode {
        self.transport.mode
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::parse(&self.log.level)
    }

    /// Load from an optional TOML file, then `.env`, then the process environment.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_toml(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Config::default()
        };

        // A missing .env is normal outside local development.
        dotenvy::dotenv().ok();

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides. Empty values count as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get("TELEGRAM_BOT_TOKEN") {
            self.telegram.bot_token = token;
        }
        if let Some(level) = get("LOG_LEVEL") {
            self.log.level = level;
        }
        if let Some(mode) = get("BOT_MODE") {
            self.transport.mode = mode.parse()?;
        }
        if let Some(url) = get("WEBHOOK_URL") {
            self.webhook.url = Some(url);
        }
        if let Some(port) = get("WEBHOOK_PORT") {
            self.webhook.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid WEBHOOK_PORT: {}", port))?;
        }
        if let Some(limit) = get("DISPATCH_MAX_IN_FLIGHT") {
            self.dispatch.max_in_flight = limit
                .trim()
                .parse()
                .with_context(|| format!("Invalid DISPATCH_MAX_IN_FLIGHT: {}", limit))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.telegram.bot_token.trim().is_empty() {
            bail!(
                "TELEGRAM_BOT_TOKEN is not set. Put it in .env, the environment, \
                 or [telegram] bot_token in the config file."
            );
        }
        if self.mode() == TransportMode::Webhook
            && self
                .webhook
                .url
                .as_deref()
                .map_or(true, |u| u.trim().is_empty())
        {
            bail!("Webhook mode requires WEBHOOK_URL (or [webhook] url) to be set");
        }
        if self.webhook.queue_capacity == 0 {
            bail!("[webhook] queue_capacity must be greater than zero");
        }
        if self.dispatch.max_in_flight == 0 {
            bail!("[dispatch] max_in_flight must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.mode(), TransportMode::Polling);
        assert_eq!(config.log_level(), LogLevel::Info);
        assert_eq!(config.webhook.port, 8443);
        assert_eq!(config.webhook.max_connections, 40);
        assert_eq!(config.webhook.queue_capacity, 100);
        assert_eq!(config.polling.timeout_secs, 60);
        assert!(config.webhook.url.is_none());
    }

    #[test]
    fn test_parse_full_file() {
        let config = Config::from_toml(
            r#"
            [telegram]
            bot_token = "123:abc"

            [log]
            level = "debug"

            [transport]
            mode = "webhook"

            [webhook]
            url = "https://bot.example.com"
            port = 9000
            queue_capacity = 10

            [dispatch]
            max_in_flight = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.telegram.bot_token, "123:abc");
        assert_eq!(config.log_level(), LogLevel::Debug);
        assert_eq!(config.mode(), TransportMode::Webhook);
        assert_eq!(config.webhook.url.as_deref(), Some("https://bot.example.com"));
        assert_eq!(config.webhook.port, 9000);
        assert_eq!(config.webhook.queue_capacity, 10);
        assert_eq!(config.dispatch.max_in_flight, 4);
        config.validate().unwrap();
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::from_toml("[telegram]\nbot_token = \"from-file\"").unwrap();
        config
            .apply_env(env(&[
                ("TELEGRAM_BOT_TOKEN", "from-env"),
                ("LOG_LEVEL", "warn"),
                ("BOT_MODE", "Webhook"),
                ("WEBHOOK_URL", "https://example.com"),
                ("WEBHOOK_PORT", "8080"),
            ]))
            .unwrap();
        assert_eq!(config.telegram.bot_token, "from-env");
        assert_eq!(config.log_level(), LogLevel::Warn);
        assert_eq!(config.mode(), TransportMode::Webhook);
        assert_eq!(config.webhook.port, 8080);
        config.validate().unwrap();
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = Config::from_toml("[telegram]\nbot_token = \"keep\"").unwrap();
        config
            .apply_env(env(&[("TELEGRAM_BOT_TOKEN", ""), ("BOT_MODE", "  ")]))
            .unwrap();
        assert_eq!(config.telegram.bot_token, "keep");
        assert_eq!(config.mode(), TransportMode::Polling);
    }

    #[test]
    fn test_invalid_overrides_are_errors() {
        let mut config = Config::default();
        assert!(config.apply_env(env(&[("WEBHOOK_PORT", "eighty")])).is_err());
        assert!(config.apply_env(env(&[("BOT_MODE", "carrier-pigeon")])).is_err());
    }

    #[test]
    fn test_missing_token_fails_validation() {
        let err = Config::default().validate().unwrap_err();
        assert!(err.to_string().contains("TELEGRAM_BOT_TOKEN"));
    }

    #[test]
    fn test_webhook_mode_requires_url() {
        let mut config = Config::default();
        config.telegram.bot_token = "t".into();
        config.transport.mode = TransportMode::Webhook;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("WEBHOOK_URL"));

        config.webhook.url = Some("https://example.com".into());
        config.validate().unwrap();
    }

    #[test]
    fn test_polling_mode_ignores_missing_url() {
        let mut config = Config::default();
        config.telegram.bot_token = "t".into();
        config.validate().unwrap();
    }

    #[test]
    fn test_unknown_log_level_defaults_to_info() {
        assert_eq!(LogLevel::parse("verbose"), LogLevel::Info);
        assert_eq!(LogLevel::parse("ERROR"), LogLevel::Error);
        assert_eq!(LogLevel::Debug.filter_directive(), "debug,gofer_bot=debug");
    }
}
