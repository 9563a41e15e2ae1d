//! Edit workflow orchestrator
//!
//! Holds the [`WorkflowState`] for one editing session and sequences edit
//! attempts against an [`EditBackend`]. Only one request may be outstanding;
//! a submit issued while one is in flight does nothing. A result that
//! arrives after the original was replaced is dropped.
//!
//! The state lives inside a `watch` channel so front ends can observe it
//! without being able to mutate it.

use crate::codec::{self, ImageResource};
use crate::error::{Result, RetouchError};
use crate::ports::{EditBackend, SaveTarget};
use retouch_types::{EditOutcome, EditRequest, ImageArtifact, WorkflowState};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Shown when a submit is attempted without an image or prompt
pub const VALIDATION_MESSAGE: &str = "Please upload an image and enter a prompt.";

/// Shown for every remote failure, whatever the cause
pub const EDIT_FAILURE_MESSAGE: &str = "Failed to edit image. Please try again.";

/// Shown when the selected file cannot be read
pub const READ_FAILURE_MESSAGE: &str = "Failed to read the selected image.";

/// Stem of the suggested download file name
pub const DOWNLOAD_FILE_STEM: &str = "edited-image";

/// What a call to [`EditWorkflow::submit`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// A request was already outstanding; nothing changed
    Busy,
    /// Preconditions failed; `last_error` holds [`VALIDATION_MESSAGE`]
    Rejected,
    /// The backend was called once and resolved
    Completed(EditOutcome),
    /// The original changed while the request was outstanding; the result
    /// was dropped and the state left as the new original set it
    Superseded,
}

enum Start {
    Busy,
    Rejected(RetouchError),
    Ready(EditRequest, u64),
}

pub struct EditWorkflow {
    backend: Arc<dyn EditBackend>,
    state: watch::Sender<WorkflowState>,
    request_timeout: Option<Duration>,
    /// Bumped whenever the original changes
    generation: AtomicU64,
}

impl EditWorkflow {
    pub fn new(backend: Arc<dyn EditBackend>) -> Self {
        let (state, _) = watch::channel(WorkflowState::default());
        Self {
            backend,
            state,
            request_timeout: None,
            generation: AtomicU64::new(0),
        }
    }

    /// Bound every backend call. Expiry counts as a remote failure.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Receive a fresh copy of the state after every change
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> WorkflowState {
        self.state.borrow().clone()
    }

    /// Replace the original image. Any previous result or error is dropped.
    pub fn set_original(&self, artifact: ImageArtifact) {
        info!(
            media_type = %artifact.media_type,
            encoded_len = artifact.encoded_len(),
            "Original image set"
        );
        self.state.send_modify(|state| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            state.original = Some(artifact);
            state.edited = None;
            state.last_error = None;
        });
    }

    /// Read and encode a file, then make it the original.
    ///
    /// Returns `false` if the file could not be read; the cause is logged and
    /// `last_error` is set to [`READ_FAILURE_MESSAGE`].
    pub async fn open_image(&self, resource: &ImageResource) -> bool {
        match codec::read_image(resource).await {
            Ok(artifact) => {
                self.set_original(artifact);
                true
            }
            Err(e) => {
                error!(path = %resource.path.display(), "Failed to encode image: {:?}", e);
                self.state.send_modify(|state| {
                    state.last_error = Some(READ_FAILURE_MESSAGE.to_string());
                });
                false
            }
        }
    }

    /// Store the prompt as typed; trimming happens at submit time
    pub fn set_prompt(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_if_modified(|state| {
            if state.pending_prompt == text {
                return false;
            }
            state.pending_prompt = text;
            true
        });
    }

    /// Send the original image and prompt to the backend
    pub async fn submit(&self) -> Submission {
        let mut start = Start::Busy;
        self.state.send_if_modified(|state| {
            if state.in_flight {
                return false;
            }
            match prepare_request(state) {
                Ok(request) => {
                    state.edited = None;
                    state.last_error = None;
                    state.in_flight = true;
                    start = Start::Ready(request, self.generation.load(Ordering::SeqCst));
                }
                Err(e) => {
                    state.last_error = Some(VALIDATION_MESSAGE.to_string());
                    start = Start::Rejected(e);
                }
            }
            true
        });

        let (request, generation) = match start {
            Start::Busy => {
                debug!("Edit already in flight, ignoring submit");
                return Submission::Busy;
            }
            Start::Rejected(e) => {
                warn!("Submit rejected: {}", e);
                return Submission::Rejected;
            }
            Start::Ready(request, generation) => (request, generation),
        };

        info!(
            backend = self.backend.name(),
            media_type = %request.media_type,
            prompt_len = request.prompt.len(),
            "Submitting edit request"
        );

        let outcome = match self.call_backend(&request).await {
            Ok(artifact) => {
                info!(media_type = %artifact.media_type, "Edit completed");
                EditOutcome::Success(artifact)
            }
            Err(e) => {
                error!(backend = self.backend.name(), "Edit failed: {}", e);
                EditOutcome::Failure(EDIT_FAILURE_MESSAGE.to_string())
            }
        };

        let mut current = true;
        self.state.send_modify(|state| {
            state.in_flight = false;
            if self.generation.load(Ordering::SeqCst) != generation {
                current = false;
                return;
            }
            match &outcome {
                EditOutcome::Success(artifact) => state.edited = Some(artifact.clone()),
                EditOutcome::Failure(message) => state.last_error = Some(message.clone()),
            }
        });

        if !current {
            warn!("Original replaced while editing, dropping result");
            return Submission::Superseded;
        }
        Submission::Completed(outcome)
    }

    /// Run the same edit again with the current image and prompt
    pub async fn regenerate(&self) -> Submission {
        debug!("Regenerating edit");
        self.submit().await
    }

    /// Discard the edited image and any error
    pub fn undo(&self) {
        self.state.send_modify(|state| {
            state.edited = None;
            state.last_error = None;
        });
    }

    /// Hand the edited image to a save target.
    ///
    /// Returns the file name used, or `None` when there is nothing to save.
    pub async fn download(&self, target: &dyn SaveTarget) -> Result<Option<String>> {
        let edited = self.state.borrow().edited.clone();
        let Some(edited) = edited else {
            debug!("Nothing to download");
            return Ok(None);
        };

        let file_name = download_file_name(&edited);
        target.save(&edited, &file_name).await?;
        info!(file_name = %file_name, "Edited image handed to save target");

        Ok(Some(file_name))
    }

    async fn call_backend(&self, request: &EditRequest) -> Result<ImageArtifact> {
        match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, self.backend.edit_image(request))
                .await
                .map_err(|_| RetouchError::Timeout(limit))?,
            None => self.backend.edit_image(request).await,
        }
    }
}

/// Suggested file name for a downloaded artifact, e.g. `edited-image.png`
pub fn download_file_name(artifact: &ImageArtifact) -> String {
    format!("{}.{}", DOWNLOAD_FILE_STEM, artifact.extension())
}

fn prepare_request(state: &WorkflowState) -> Result<EditRequest> {
    let original = state
        .original
        .as_ref()
        .ok_or_else(|| RetouchError::Validation("no image loaded".to_string()))?;

    let prompt = state.pending_prompt.trim();
    if prompt.is_empty() {
        return Err(RetouchError::Validation("prompt is empty".to_string()));
    }

    Ok(EditRequest::from_artifact(original, prompt))
}
