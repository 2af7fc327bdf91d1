//! `rollcall run` — Start the bot on its enabled channels.
//!
//! Wires the store, dispatcher, and channel registry together, then pumps
//! the merged inbound stream until Ctrl+C or until every channel closes.

use std::sync::Arc;

use rollcall_bot::Dispatcher;
use rollcall_channels::{ChannelRegistry, CliChannel, TelegramChannel, TelegramConfig};
use rollcall_config::AppConfig;
use rollcall_core::RecordStore;
use rollcall_store::SqliteStore;
use tracing::{info, warn};

pub async fn run(cli_only: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let store: Arc<dyn RecordStore> =
        Arc::new(SqliteStore::new(&config.database.path).await?);
    info!(backend = store.name(), path = %config.database.path, "Store ready");

    let dispatcher = Dispatcher::new(store, config.policy);

    let mut registry = ChannelRegistry::new();
    if cli_only {
        registry.register(Arc::new(CliChannel::new()));
    } else {
        for name in config.enabled_channels() {
            match name.as_str() {
                "cli" => registry.register(Arc::new(CliChannel::new())),
                "telegram" => {
                    let channel = config.channel("telegram").cloned().unwrap_or_default();
                    registry.register(Arc::new(TelegramChannel::new(TelegramConfig {
                        bot_token: channel.bot_token.unwrap_or_default(),
                        allowed_users: channel.allowed_users,
                    })));
                }
                other => warn!(channel = %other, "Skipping unrecognized channel"),
            }
        }
    }

    if registry.is_empty() {
        return Err("No channels enabled. Enable one in config.toml or pass --cli.".into());
    }

    let mut names = registry.list();
    names.sort();
    println!("📋 Rollcall — listening on: {}", names.join(", "));
    if cli_only {
        println!("   Type /start to begin, exit to quit.\n");
    }

    let mut rx = registry.start_all().await?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
            incoming = rx.recv() => {
                let Some((channel_name, result)) = incoming else {
                    // All channels closed their streams.
                    break;
                };

                let msg = match result {
                    Ok(msg) => msg,
                    Err(e) => {
                        warn!(channel = %channel_name, error = %e, "Channel error");
                        continue;
                    }
                };

                let allowed = registry
                    .get(&channel_name)
                    .is_some_and(|c| c.is_allowed(&msg.sender_id));
                if !allowed {
                    warn!(
                        channel = %channel_name,
                        sender = %msg.sender_id,
                        "Dropping message from unauthorized sender"
                    );
                    continue;
                }

                if let Some(reply) = dispatcher.handle(&msg).await {
                    if let Err(e) = registry.send_to(&channel_name, &msg.chat_id, &reply).await {
                        warn!(channel = %channel_name, error = %e, "Failed to deliver reply");
                    }
                }
            }
        }
    }

    registry.stop_all().await;
    Ok(())
}
