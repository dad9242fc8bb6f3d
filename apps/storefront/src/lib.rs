//! # KeyToWish Storefront Library
//!
//! Application layer for the KeyToWish storefront: live state, commands, and
//! the JSON-lines loop the frontend bridge talks to.
//!
//! ## Module Organization
//! ```text
//! keytowish_storefront/
//! ├── lib.rs          ◄─── You are here (startup & command loop)
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState + state type exports
//! │   ├── cart.rs     ◄─── Cart state management
//! │   ├── checkout.rs ◄─── Open checkout session
//! │   ├── catalog.rs  ◄─── Seeded template catalog
//! │   └── config.rs   ◄─── Storefront configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command enum + dispatch
//! │   ├── catalog.rs  ◄─── Categories and templates
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   ├── checkout.rs ◄─── Checkout step commands
//! │   ├── wish.rs     ◄─── Wish-card commands
//! │   └── config.rs   ◄─── Store info
//! ├── gateway.rs      ◄─── Order submission service
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Wire Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdin  (one JSON request per line)                                     │
//! │    {"requestId":1,"command":"addToCart","templateId":"b1"}              │
//! │                                                                         │
//! │  stdout (one JSON response per line, same order)                        │
//! │    {"requestId":1,"ok":true,"data":{"items":[...],...}}                 │
//! │                                                                         │
//! │  stderr: logs                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod gateway;
pub mod state;

use std::path::PathBuf;

use keytowish_core::CoreError;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use commands::{Request, Response};
use error::ApiError;
use state::{AppState, CatalogState, ConfigError, StorefrontConfig};

/// Startup or I/O failure that ends the process.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs the storefront over stdin/stdout.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Initialize Logging (stderr, RUST_LOG overrides the filter)          │
/// │  2. Load Config: first CLI argument, else KEYTOWISH_CONFIG, + env vars  │
/// │  3. Seed Catalog                                                        │
/// │  4. Build AppState (empty cart, no checkout, simulated gateway)         │
/// │  5. Serve requests until stdin closes                                   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), RunError> {
    init_tracing();

    info!("Starting KeyToWish storefront");

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = StorefrontConfig::load(config_path)?;
    info!(store = %config.store_name, tax_rate_bps = config.tax_rate_bps, "Config loaded");

    let catalog = CatalogState::seeded()?;
    let state = AppState::new(config, catalog);
    info!("State initialized");

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    serve(&state, stdin, stdout).await?;

    info!("Input closed, shutting down");
    Ok(())
}

/// Reads requests line by line and writes one response line for each.
///
/// Blank lines are skipped. Returns when the reader hits end of input.
pub async fn serve<R, W>(state: &AppState, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let mut reply = handle_line(state, &line).await;
        reply.push('\n');
        writer.write_all(reply.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Handles one request line and returns the encoded response.
pub async fn handle_line(state: &AppState, line: &str) -> String {
    let response = match serde_json::from_str::<Request>(line) {
        Ok(request) => {
            debug!(command = request.command.name(), "request received");
            let result = commands::dispatch(state, request.command).await;
            Response::from_result(request.request_id, result)
        }
        Err(e) => {
            warn!(error = %e, "unreadable request");
            Response::from_result(
                None,
                Err(ApiError::bad_request(format!("Invalid request: {}", e))),
            )
        }
    };

    serde_json::to_string(&response).unwrap_or_else(|e| {
        warn!(error = %e, "failed to encode response");
        r#"{"ok":false,"error":{"code":"INTERNAL","message":"Failed to encode response"}}"#
            .to_string()
    })
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr; stdout carries responses only.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=keytowish=trace` - Show trace for keytowish crates only
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,keytowish=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::SimulatedGateway;
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Duration;

    fn state() -> AppState {
        AppState::with_gateway(
            StorefrontConfig::default(),
            CatalogState::seeded().unwrap(),
            Arc::new(SimulatedGateway::new(Duration::ZERO)),
        )
    }

    async fn run_lines(state: &AppState, input: &str) -> Vec<Value> {
        let mut output = Vec::new();
        serve(state, input.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_one_response_per_line() {
        let state = state();
        let input = concat!(
            r#"{"requestId":1,"command":"addToCart","templateId":"b1"}"#,
            "\n\n",
            r#"{"requestId":2,"command":"addToCart","templateId":"b1"}"#,
            "\n",
            r#"{"requestId":3,"command":"getCart"}"#,
            "\n",
        );

        let responses = run_lines(&state, input).await;
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["requestId"], 1);
        assert_eq!(responses[2]["requestId"], 3);
        assert_eq!(responses[2]["ok"], true);
        assert_eq!(responses[2]["data"]["itemCount"], 2);
        assert_eq!(responses[2]["data"]["formattedSubtotal"], "$9.98");
    }

    #[tokio::test]
    async fn test_bad_lines_do_not_stop_the_loop() {
        let state = state();
        let input = "not json\n{\"command\":\"nope\"}\n{\"command\":\"getStoreInfo\"}";

        let responses = run_lines(&state, input).await;
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["ok"], false);
        assert_eq!(responses[0]["error"]["code"], "BAD_REQUEST");
        assert_eq!(responses[1]["error"]["code"], "BAD_REQUEST");
        assert_eq!(responses[2]["ok"], true);
        assert_eq!(responses[2]["data"]["storeName"], "KeyToWish");
    }

    #[tokio::test]
    async fn test_command_errors_keep_request_id() {
        let state = state();
        let reply = handle_line(&state, r#"{"requestId":"x","command":"getCheckout"}"#).await;
        let json: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(json["requestId"], "x");
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"]["code"], "NO_CHECKOUT");
    }
}
