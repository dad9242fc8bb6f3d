//! # KeyToWish Storefront Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      KeyToWish Storefront                               │
//! │                                                                         │
//! │   Next.js frontend ── one JSON command per line ──► stdin               │
//! │                                                        │                │
//! │                                   keytowish_storefront::run()           │
//! │                                                        │                │
//! │   Next.js frontend ◄── one JSON response per line ─── stdout            │
//! │                                                                         │
//! │   Logs go to stderr so they never mix with responses.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for testability
    match keytowish_storefront::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("keytowish-storefront: {e}");
            ExitCode::FAILURE
        }
    }
}
