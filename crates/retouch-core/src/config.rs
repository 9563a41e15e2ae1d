//! Validated service configuration
//!
//! Built once at startup from [`Settings`]. A missing API key is reported
//! here, before any workflow exists, instead of on the first request.

use crate::error::{Result, RetouchError};
use retouch_types::Settings;
use std::time::Duration;

#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub request_timeout: Option<Duration>,
}

impl ServiceConfig {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| RetouchError::Config("API key is not set".to_string()))?
            .to_string();

        let model = settings.model.trim();
        if model.is_empty() {
            return Err(RetouchError::Config("Model name is empty".to_string()));
        }

        let base_url = settings.base_url.trim().trim_end_matches('/');
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(RetouchError::Config(format!(
                "Invalid base URL: {}. URL must start with http:// or https://",
                base_url
            )));
        }

        let request_timeout = match settings.request_timeout_secs {
            Some(0) => {
                return Err(RetouchError::Config(
                    "Request timeout must be greater than zero".to_string(),
                ))
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(Self {
            api_key,
            model: model.to_string(),
            base_url: base_url.to_string(),
            request_timeout,
        })
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_key", &"********")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
