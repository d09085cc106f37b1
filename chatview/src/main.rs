use anyhow::{Context as _, anyhow};
use chatview::action::ActionPolicy;
use chatview::config::ConfigManager;
use chatview::models::{DateTime, Message, MessageDirection};
use tracing_subscriber::prelude::*;

/// Prints the long-press menu a message would get.
///
/// Usage: `chatview <message.json> [current-user-id]`
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing (optional, controlled via RUST_LOG)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatview=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    let mut args = std::env::args().skip(1);
    let message_path = args
        .next()
        .ok_or(anyhow!("Usage: chatview <message.json> [current-user-id]"))?;
    let current_user_id = args.next();
    let config_path = ConfigManager::default_path()?;
    tracing::debug!(path = ?config_path, "Loading config");
    let config = ConfigManager::new(config_path).load().await?;
    let data = tokio::fs::read_to_string(&message_path)
        .await
        .with_context(|| format!("Failed to read {message_path}"))?;
    let mut message: Message =
        serde_json::from_str(&data).with_context(|| format!("Failed to parse {message_path}"))?;
    if let Some(current_user_id) = current_user_id {
        message.direction = MessageDirection::classify(&message.from, &current_user_id);
    }
    let policy = ActionPolicy::new(config.master_actions(), config.recall_expiry());
    for action in policy.allowed_actions(&message, DateTime::now()) {
        println!("{}", action.label);
    }
    Ok(())
}
