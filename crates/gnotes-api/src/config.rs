//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::HeaderValue;

use gnotes_core::{Error, Result};
use gnotes_inference::OpenAIConfig;
use gnotes_search::SearchConfig;

/// Origins allowed when `ALLOWED_ORIGINS` is unset or blank.
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend URL including access credentials.
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub openai: OpenAIConfig,
    pub search: SearchConfig,
    /// Where the last analytics snapshot is kept, if anywhere.
    pub analytics_cache_path: Option<PathBuf>,
    pub allowed_origins: Vec<HeaderValue>,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// `DATABASE_URL` and `OPENAI_API_KEY` are required; the error names the
    /// first one missing.
    pub fn from_env() -> Result<Self> {
        let database_url = require_var("DATABASE_URL")?;
        let openai = OpenAIConfig::from_env()?;

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| Error::Config(format!("PORT is not a valid port: {}", raw)))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            database_url,
            host: std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port,
            openai,
            search: SearchConfig::from_env(),
            analytics_cache_path: std::env::var("ANALYTICS_CACHE_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            allowed_origins: parse_allowed_origins(
                &std::env::var("ALLOWED_ORIGINS").unwrap_or_default(),
            ),
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid listen address: {}", e)))
    }
}

/// Value of `name`, or a configuration error naming it when unset or blank.
pub fn require_var(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::Config(format!("{} is not set", name)))
}

/// Parse a comma-separated origin list. Blank input yields the defaults;
/// invalid entries are skipped with a warning.
pub fn parse_allowed_origins(raw: &str) -> Vec<HeaderValue> {
    let raw = if raw.trim().is_empty() {
        DEFAULT_ALLOWED_ORIGINS
    } else {
        raw
    };

    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}
