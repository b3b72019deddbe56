//! # Sentry Operator
//!
//! Entry point of the operator binary. See the library documentation for an
//! overview and the README for configuration.

use anyhow::Result;
use sentry_operator::runtime::{initialize, run_watch_loop};

#[tokio::main]
async fn main() -> Result<()> {
    let init_result = initialize().await?;
    run_watch_loop(init_result).await
}
