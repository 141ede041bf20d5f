//! Configuration management for the MCP server.
//!
//! Everything is read once at startup from environment variables (a `.env`
//! file is honored). The Prometheus URL is the only required setting.

use std::env;

use reqwest::Url;
use tracing::{Level, info, warn};

use super::error::{Error, Result};
use super::transport::TransportConfig;

/// Default per-request timeout towards Prometheus.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Prometheus connection settings.
    pub prometheus: PrometheusConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_timestamps: true,
        }
    }
}

impl LoggingConfig {
    /// Read `MCP_LOG_LEVEL` and `MCP_LOG_TIMESTAMPS`.
    ///
    /// Separate from [`Config::from_env`]: logging starts before the rest of
    /// the configuration is validated.
    pub fn from_env() -> Self {
        let mut logging = Self::default();
        if let Ok(level) = env::var("MCP_LOG_LEVEL") {
            logging.level = level;
        }
        if let Ok(raw) = env::var("MCP_LOG_TIMESTAMPS") {
            logging.with_timestamps = !matches!(
                raw.trim().to_lowercase().as_str(),
                "false" | "0" | "no" | "off"
            );
        }
        logging
    }

    /// The configured level; unknown names fall back to `INFO`.
    pub fn level(&self) -> Level {
        match self.level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// How to reach Prometheus.
#[derive(Clone)]
pub struct PrometheusConfig {
    /// Base URL without trailing slash, e.g. `http://prometheus:9090`.
    pub url: String,

    /// Basic auth user.
    pub username: Option<String>,

    /// Basic auth password. Ignored without a username.
    pub password: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for PrometheusConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl PrometheusConfig {
    /// Validate `url` (absolute http/https) and strip trailing slashes.
    pub fn new(url: &str) -> Result<Self> {
        let trimmed = url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed)
            .map_err(|e| Error::config(format!("PROMETHEUS_URL '{url}' is not a valid URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "PROMETHEUS_URL '{url}' must use http or https"
            )));
        }
        Ok(Self {
            url: trimmed.to_string(),
            ..Self::default()
        })
    }

    /// Attach basic auth credentials.
    ///
    /// A password without a username is dropped with a warning.
    pub fn with_credentials(mut self, username: Option<String>, password: Option<String>) -> Self {
        let username = username.filter(|u| !u.is_empty());
        if username.is_none() && password.is_some() {
            warn!("PROMETHEUS_PASSWORD is set without PROMETHEUS_USERNAME; ignoring it");
        }
        self.password = username.as_ref().and(password);
        self.username = username;
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9090".to_string(),
            username: None,
            password: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "prometheus-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            transport: TransportConfig::default(),
            prometheus: PrometheusConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `PROMETHEUS_URL` is required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(name) = env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }


        config.transport = TransportConfig::from_env();

        let url = env::var("PROMETHEUS_URL")
            .map_err(|_| Error::config("PROMETHEUS_URL must be set, e.g. http://localhost:9090"))?;

        let timeout_secs = match env::var("PROMETHEUS_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().ok().filter(|t| *t > 0).ok_or_else(|| {
                Error::config(format!(
                    "PROMETHEUS_TIMEOUT_SECS must be a positive integer, got '{raw}'"
                ))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        config.prometheus = PrometheusConfig::new(&url)?
            .with_credentials(
                env::var("PROMETHEUS_USERNAME").ok(),
                env::var("PROMETHEUS_PASSWORD").ok(),
            )
            .with_timeout(timeout_secs);

        info!(
            "Prometheus at {} (basic auth: {}, timeout: {}s)",
            config.prometheus.url,
            config.prometheus.username.is_some(),
            config.prometheus.timeout_secs
        );

        Ok(config)
    }
}
