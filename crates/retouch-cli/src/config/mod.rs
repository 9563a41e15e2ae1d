//! Configuration management

use anyhow::{Context, Result};
use retouch_core::Settings;
use std::path::{Path, PathBuf};

/// Prefix for environment overrides, e.g. `RETOUCH_MODEL`
const ENV_PREFIX: &str = "RETOUCH";

/// Conventional variables checked when no key is configured
const API_KEY_FALLBACKS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

pub struct SettingsManager;

impl SettingsManager {
    /// Get the retouch home directory (~/.retouch)
    pub fn retouch_home() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("RETOUCH_HOME") {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".retouch"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Result<PathBuf> {
        Ok(Self::retouch_home()?.join("settings.json"))
    }

    /// Default log file, next to the settings
    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::retouch_home()?.join("retouch.log"))
    }

    /// Settings as stored on disk, without environment overrides.
    /// Use this when the result is going to be saved back.
    pub fn load_stored() -> Result<Settings> {
        let path = Self::settings_path()?;
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {:?}", path))
    }

    /// Effective settings: file, then `RETOUCH_*` variables, then the
    /// conventional API key variables if no key was found.
    pub fn load() -> Result<Settings> {
        let path = Self::settings_path()?;
        load_layered(&path, None)
    }

    /// Save settings to disk
    pub fn save(settings: &Settings) -> Result<()> {
        let path = Self::settings_path()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let content =
            serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;

        // Set permissions on Unix (restrict to owner only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Directory downloads go to: explicit override, then settings, then cwd
    pub fn output_dir(settings: &Settings, override_dir: Option<&Path>) -> PathBuf {
        override_dir
            .map(Path::to_path_buf)
            .or_else(|| settings.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Layer the settings file and the environment.
///
/// `env` replaces the process environment when given.
fn load_layered(path: &Path, env: Option<config::Map<String, String>>) -> Result<Settings> {
    let layered = config::Config::builder()
        .add_source(
            config::File::from(path.to_path_buf())
                .format(config::FileFormat::Json)
                .required(false),
        )
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(env.clone()),
        )
        .build()
        .with_context(|| format!("Failed to load settings from {:?}", path))?;

    let mut settings: Settings = layered
        .try_deserialize()
        .with_context(|| format!("Failed to parse settings from {:?}", path))?;

    let has_key = settings
        .api_key
        .as_deref()
        .map(|key| !key.trim().is_empty())
        .unwrap_or(false);
    if !has_key {
        settings.api_key = API_KEY_FALLBACKS.iter().find_map(|name| {
            let value = match &env {
                Some(vars) => vars.get(*name).cloned(),
                None => std::env::var(name).ok(),
            };
            value.filter(|v| !v.trim().is_empty())
        });
    }

    Ok(settings)
}
