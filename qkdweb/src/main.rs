//! qkdweb crate entrypoint.
//!
//! Starts the Tokio runtime and launches the web server defined in the
//! `server` module. Keep this file minimal; the application logic lives
//! in `server` and `config`.
//!
/// HTTP server implementation and request handling
mod server;
/// Configuration management and settings
mod config;

/// Entry point for the async Tokio runtime
#[tokio::main]
async fn main() {
    server::run().await;
}
