//! Configuration loader and defaults for the qkdweb server.
//!
//! Exposes a lazily-initialized `CONFIG` which reads values from environment
//! variables (with sensible defaults). Fields cover the HTTP listen port
//! (`port`) and the CORS origin allow-list (`allow_origins`) consumed by
//! the browser chat frontend.
//!
use std::env;

use once_cell::sync::Lazy;

/// Default HTTP port for the backend API
const DEFAULT_PORT: u16 = 8001;

/// Default CORS origins for a locally served chat frontend
const DEFAULT_ALLOW_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Application configuration for the HTTP backend
pub struct Config {
    /// API listen port
    pub port: u16,
    /// Origins allowed to call the API from a browser
    pub allow_origins: Vec<String>,
}

/// Global application configuration instance, lazily initialized
pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    let origins =
        env::var("QKDCHAT_ALLOW_ORIGINS").unwrap_or_else(|_| DEFAULT_ALLOW_ORIGINS.into());

    Config {
        port: env::var("QKDCHAT_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT),

        allow_origins: origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect(),
    }
});
