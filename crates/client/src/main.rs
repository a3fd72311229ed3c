//! `tactics` binary: replays a scripted battle and reports the outcome.
//!
//! ```bash
//! # Built-in content, bundled demo script
//! cargo run -p tactics-client
//!
//! # Custom content and script, saving the finished room
//! TACTICS_CONTENT_DIR=./content TACTICS_SCRIPT=./my.ron TACTICS_ROOMS_DIR=./rooms \
//!     cargo run -p tactics-client
//! ```

use anyhow::Result;
use tactics_client::ClientConfig;
use tactics_runtime::BattleOutcome;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env();
    tracing::debug!(?config, "configuration loaded");

    let summary = tactics_client::run(&config).await?;

    tracing::info!(
        accepted = summary.accepted,
        rejected = summary.rejected.len(),
        skipped = summary.skipped,
        "replay complete"
    );
    match summary.outcome {
        BattleOutcome::Victory { winner } => tracing::info!(%winner, "battle won"),
        BattleOutcome::Draw => tracing::info!("battle drawn"),
        BattleOutcome::Ongoing => tracing::info!("battle still in progress"),
    }
    Ok(())
}
