//! CLI commands

pub mod config;
pub mod doctor;
pub mod edit;
pub mod session;

use crate::api::GeminiClient;
use crate::config::SettingsManager;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use retouch_core::{EditWorkflow, ServiceConfig, WorkflowState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

/// Load settings, validate them and wire a workflow to the Gemini backend.
///
/// A missing API key fails here, before any image is touched.
pub fn build_workflow() -> Result<(EditWorkflow, retouch_core::Settings)> {
    let settings = SettingsManager::load().context("Failed to load settings")?;
    let config = ServiceConfig::from_settings(&settings).context(
        "Service is not configured. Run `retouch config set-key` or set GEMINI_API_KEY",
    )?;
    debug!(?config, "Service configuration");

    let backend = GeminiClient::new(&config)?;
    let workflow = EditWorkflow::new(Arc::new(backend)).with_timeout(config.request_timeout);

    Ok((workflow, settings))
}

/// Log every state transition at debug level until the workflow goes away
pub fn watch_state(mut rx: watch::Receiver<WorkflowState>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            debug!(
                phase = %state.phase(),
                has_original = state.original.is_some(),
                has_edited = state.edited.is_some(),
                prompt_len = state.pending_prompt.len(),
                error = state.last_error.as_deref().unwrap_or(""),
                "Workflow state changed"
            );
        }
    })
}

pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
