//! `rollcall onboard` — First-time setup.

use rollcall_config::{AppConfig, ENV_TELEGRAM_TOKEN, config_dir};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = config_dir();
    let config_path = config_dir.join("config.toml");

    println!("📋 Rollcall — First-Time Setup");
    println!("==============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!(
            "   1. Edit {} and enable the channels you use",
            config_path.display()
        );
        println!("   2. For Telegram, set bot_token (or export {ENV_TELEGRAM_TOKEN})");
        println!("   3. Run: rollcall run --cli to try it locally\n");
    }

    println!("🎉 Setup complete! Run `rollcall run --cli` to start chatting.\n");

    Ok(())
}
