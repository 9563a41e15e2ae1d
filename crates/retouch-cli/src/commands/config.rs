//! Config command - Manage CLI configuration

use crate::config::SettingsManager;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// Store the Gemini API key
pub async fn set_key(key: Option<String>) -> Result<()> {
    let key = match key {
        Some(key) => key,
        None => dialoguer::Password::new()
            .with_prompt("Gemini API key")
            .interact()?,
    };

    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("API key cannot be empty");
    }

    let mut settings = SettingsManager::load_stored().context("Failed to load settings")?;
    settings.api_key = Some(key.to_string());
    SettingsManager::save(&settings).context("Failed to save settings")?;

    println!("{} API key saved", "✓".green());
    Ok(())
}

/// Set the image model
pub async fn set_model(model: &str) -> Result<()> {
    let model = model.trim();
    if model.is_empty() {
        anyhow::bail!("Model name cannot be empty");
    }

    let mut settings = SettingsManager::load_stored().context("Failed to load settings")?;
    settings.model = model.to_string();
    SettingsManager::save(&settings).context("Failed to save settings")?;

    println!("{} Model set to: {}", "✓".green(), model.cyan());
    Ok(())
}

/// Set the API base URL
pub async fn set_base_url(url: &str) -> Result<()> {
    let url = url.trim().trim_end_matches('/');
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!(
            "Invalid URL: {}. URL must start with http:// or https://",
            url
        );
    }

    let mut settings = SettingsManager::load_stored().context("Failed to load settings")?;
    settings.base_url = url.to_string();
    SettingsManager::save(&settings).context("Failed to save settings")?;

    println!("{} Base URL set to: {}", "✓".green(), url.cyan());
    Ok(())
}

/// Set the default download directory
pub async fn set_output(dir: PathBuf) -> Result<()> {
    let mut settings = SettingsManager::load_stored().context("Failed to load settings")?;
    println!(
        "{} Output directory set to: {}",
        "✓".green(),
        dir.display().to_string().cyan()
    );
    settings.output_dir = Some(dir);
    SettingsManager::save(&settings).context("Failed to save settings")?;
    Ok(())
}

/// Bound each edit request; `0` removes the limit
pub async fn set_timeout(secs: u64) -> Result<()> {
    let mut settings = SettingsManager::load_stored().context("Failed to load settings")?;
    settings.request_timeout_secs = if secs == 0 { None } else { Some(secs) };
    SettingsManager::save(&settings).context("Failed to save settings")?;

    match settings.request_timeout_secs {
        Some(secs) => println!("{} Request timeout set to {}s", "✓".green(), secs),
        None => println!("{} Request timeout removed", "✓".green()),
    }
    Ok(())
}

/// Show current configuration
pub async fn show() -> Result<()> {
    let settings = SettingsManager::load().context("Failed to load settings")?;

    println!("{}", "Retouch Configuration".bold().underline());
    println!();

    println!("{}", "Service:".cyan().bold());
    println!("  Base URL: {}", settings.base_url);
    println!("  Model:    {}", settings.model);
    match settings.request_timeout_secs {
        Some(secs) => println!("  Timeout:  {}s", secs),
        None => println!("  Timeout:  {}", "none".dimmed()),
    }
    match settings.api_key.as_deref() {
        Some(key) => println!("  API key:  {}", mask_key(key).green()),
        None => println!("  API key:  {}", "Not set".yellow()),
    }
    println!();

    println!("{}", "Output:".cyan().bold());
    println!(
        "  Directory: {}",
        SettingsManager::output_dir(&settings, None).display()
    );
    println!();

    println!("{}", "Config Files:".cyan().bold());
    println!(
        "  Settings: {}",
        SettingsManager::settings_path()?.display().to_string().dimmed()
    );

    Ok(())
}

/// Reset configuration to defaults
pub async fn reset() -> Result<()> {
    use dialoguer::Confirm;

    let confirm = Confirm::new()
        .with_prompt("Reset all configuration? This removes the stored API key.")
        .default(false)
        .interact()?;

    if !confirm {
        println!("{}", "Reset cancelled.".yellow());
        return Ok(());
    }

    SettingsManager::save(&retouch_core::Settings::default())
        .context("Failed to save default settings")?;

    println!("{} Configuration reset to defaults.", "✓".green());
    Ok(())
}

/// Show only the last four characters of a key
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(8), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("abc"), "***");
        assert_eq!(mask_key("AIzaSyExample1234"), "********1234");
    }
}
