//! `rollcall doctor` — Diagnose configuration and database health.

use rollcall_config::{AppConfig, config_dir};
use rollcall_core::RecordStore;
use rollcall_store::SqliteStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Rollcall Doctor — System Diagnostics");
    println!("=======================================\n");

    let mut issues = 0;

    let config_path = config_dir().join("config.toml");
    let config = if config_path.exists() {
        match AppConfig::load() {
            Ok(config) => {
                println!("  ✅ Config file valid");
                Some(config)
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                issues += 1;
                None
            }
        }
    } else {
        println!("  ⚠️  No config file — run `rollcall onboard` (defaults in effect)");
        Some(AppConfig::default())
    };

    if let Some(config) = config {
        match config.channel("telegram") {
            Some(telegram) if telegram.enabled => {
                println!("  ✅ Telegram channel enabled, token configured");
                if telegram.allowed_users.is_empty() {
                    println!("     ⚠️  allowed_users is empty, every sender will be rejected");
                    issues += 1;
                }
            }
            _ => println!("  ⚪ Telegram channel disabled"),
        }

        match SqliteStore::new(&config.database.path).await {
            Ok(store) => match store.health_check().await {
                Ok(true) => {
                    let users = store.count_users().await.unwrap_or(0);
                    println!(
                        "  ✅ Database reachable at {} ({users} user(s))",
                        config.database.path
                    );
                }
                _ => {
                    println!("  ❌ Database ping failed");
                    issues += 1;
                }
            },
            Err(e) => {
                println!("  ❌ Cannot open database {}: {e}", config.database.path);
                issues += 1;
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
