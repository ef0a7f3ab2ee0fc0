use anyhow::{Context, Result};
use lumen::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = LumenConfig::load().context("Failed to load configuration")?;
    init_logging(&config.logging)?;

    tracing::info!("Starting Lumen chat demo against {}", config.api.base_url);

    let mut app = App::builder().config(config).build()?;

    match app.api().system_status().await {
        Ok(status) if status.is_healthy() => {
            tracing::info!(status = %status.status, version = ?status.version, "Backend is up");
        }
        Ok(status) => tracing::warn!(status = %status.status, "Backend reports degraded status"),
        Err(e) => {
            tracing::error!("Backend unreachable: {}", e);
            return Err(e.into());
        }
    }

    let prompt = std::env::args()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");
    let prompt = if prompt.trim().is_empty() {
        "Give me three ideas for a weekend project".to_string()
    } else {
        prompt
    };

    let mut session = app.session();
    let synced = session.sync_conversations(false).await?;
    tracing::info!(synced, "Loaded conversations");

    let conversation_id = session.start_conversation("Chat demo").await?;
    let reply = session.send(&prompt).await?;

    println!("You: {}", prompt);
    println!(
        "{} ({}): {}",
        reply.variant.as_deref().unwrap_or(DEFAULT_VARIANT),
        reply.model.as_deref().unwrap_or("unknown model"),
        reply.content
    );

    app.preferences()
        .touch_last_used(&conversation_id, chrono::Utc::now())?;

    let stats = app.api().cache_stats();
    tracing::info!(
        hits = stats.hits,
        misses = stats.misses,
        entries = stats.total_entries,
        "Query cache"
    );

    Ok(())
}
