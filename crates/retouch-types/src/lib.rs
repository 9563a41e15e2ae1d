//! Retouch Types - Pure type definitions
//!
//! Plain data shared by the workflow core and its front ends. Nothing here
//! touches the network, the file system or an async runtime.

pub mod artifact;
pub mod request;
pub mod state;

pub use artifact::*;
pub use request::*;
pub use state::*;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default Gemini REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default image editing model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Settings persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub version: String,
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Upper bound for a single edit request, in seconds
    pub request_timeout_secs: Option<u64>,
    /// Where downloaded images are written
    pub output_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
            output_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_fill_missing_fields() {
        let settings: Settings = serde_json::from_str(r#"{"api_key": "abc"}"#).unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("abc"));
        assert_eq!(settings.model, DEFAULT_MODEL);
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert!(settings.output_dir.is_none());
    }
}
