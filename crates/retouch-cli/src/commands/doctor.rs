//! Doctor command - Diagnostics

use crate::config::SettingsManager;
use anyhow::Result;
use colored::Colorize;
use retouch_core::ServiceConfig;

pub async fn execute() -> Result<()> {
    println!("{}", "🔍 Retouch Diagnostics".blue().bold());
    println!();

    println!("{}", "System:".cyan());
    println!("   OS: {} {}", std::env::consts::OS, std::env::consts::ARCH);
    println!();

    println!("{}", "Configuration:".cyan());
    let settings = match SettingsManager::load() {
        Ok(settings) => settings,
        Err(e) => {
            println!("   {} Failed to load settings: {}", "✗".red(), e);
            return Ok(());
        }
    };

    match ServiceConfig::from_settings(&settings) {
        Ok(config) => {
            println!("   {}", "✓ API key configured".green());
            println!("   {} Model: {}", "✓".green(), config.model);
            println!("   {} Endpoint: {}", "✓".green(), config.base_url);
        }
        Err(e) => {
            println!("   {} {}", "✗".red(), e);
            println!("      Run: {}", "retouch config set-key".dimmed());
        }
    }
    println!();

    println!("{}", "Output:".cyan());
    let dir = SettingsManager::output_dir(&settings, None);
    match check_writable(&dir).await {
        Ok(()) => println!("   {} {} is writable", "✓".green(), dir.display()),
        Err(e) => println!("   {} {} is not writable: {}", "✗".red(), dir.display(), e),
    }
    println!();

    println!("{}", "Done!".green().bold());

    Ok(())
}

async fn check_writable(dir: &std::path::Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    let probe = dir.join(".retouch-write-test");
    tokio::fs::write(&probe, b"ok").await?;
    tokio::fs::remove_file(&probe).await
}
