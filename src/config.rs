use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_ROOT_MESSAGE: &str = "Backend działa";

/// Origins allowed to make cross-origin requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// Any origin (mirrored back, since credentials are allowed)
    Any,
    /// Explicit allow-list, e.g. `https://example.com`
    List(Vec<String>),
}

impl CorsOrigins {
    /// Parse `*` or a comma-separated list of origins.
    ///
    /// A `*` anywhere in the list, or an empty list, means any origin.
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Content
    pub data_dir: PathBuf,
    pub root_message: String,

    // Server
    pub host: String,
    pub port: u16,

    // CORS
    pub cors_origins: CorsOrigins,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Content
            data_dir: std::env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            root_message: std::env::var("ROOT_MESSAGE")
                .unwrap_or_else(|_| DEFAULT_ROOT_MESSAGE.to_string()),

            // Server
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: match std::env::var("PORT") {
                Ok(v) => v
                    .trim()
                    .parse()
                    .with_context(|| format!("PORT is not a valid port number: {}", v))?,
                Err(_) => 8000,
            },

            // CORS
            cors_origins: CorsOrigins::parse(
                &std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            ),
        })
    }

    /// Address string suitable for `TcpListener::bind`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
