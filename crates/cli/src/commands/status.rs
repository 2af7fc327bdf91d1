//! `rollcall status` — Show configuration and store summary.

use rollcall_config::{AppConfig, config_dir};
use rollcall_core::RecordStore;
use rollcall_store::SqliteStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("📋 Rollcall Status");
    println!("==================");
    println!("  Config dir:  {}", config_dir().display());
    println!("  Database:    {}", config.database.path);

    let enabled = config.enabled_channels();
    let channels = if enabled.is_empty() {
        "none".to_string()
    } else {
        enabled.join(", ")
    };
    println!("  Channels:    {channels}");
    println!(
        "  Thresholds:  theory <{}%, tutorial <{}%, lab <{}% critical",
        config.policy.theory.critical_below,
        config.policy.tutorial.critical_below,
        config.policy.lab.critical_below,
    );

    if std::path::Path::new(&config.database.path).exists() {
        let store = SqliteStore::new(&config.database.path).await?;
        println!("  Users:       {}", store.count_users().await?);
    } else {
        println!("  Users:       0 (database not created yet)");
    }

    let config_path = config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `rollcall onboard` first");
    }

    Ok(())
}
