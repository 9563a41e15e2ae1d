//! Edit requests and their outcomes

use crate::artifact::ImageArtifact;
use serde::{Deserialize, Serialize};

/// A single edit submission: the source image as base64 text, its media
/// type and the instruction. Built per attempt and dropped afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRequest {
    pub image_data: String,
    pub media_type: String,
    pub prompt: String,
}

impl EditRequest {
    /// Build a request from an artifact, stripping its data URL prefix
    pub fn from_artifact(artifact: &ImageArtifact, prompt: impl Into<String>) -> Self {
        Self {
            image_data: artifact.payload().to_string(),
            media_type: artifact.media_type.clone(),
            prompt: prompt.into(),
        }
    }
}

/// Result of the latest edit attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum EditOutcome {
    Success(ImageArtifact),
    /// Carries the user-facing reason only
    Failure(String),
}

impl EditOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, EditOutcome::Success(_))
    }

    pub fn artifact(&self) -> Option<&ImageArtifact> {
        match self {
            EditOutcome::Success(artifact) => Some(artifact),
            EditOutcome::Failure(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_strips_prefix() {
        let artifact = ImageArtifact::from_base64("image/png", "iVBORw0KGgo=");
        let request = EditRequest::from_artifact(&artifact, "add a hat");
        assert_eq!(request.image_data, "iVBORw0KGgo=");
        assert_eq!(request.media_type, "image/png");
        assert_eq!(request.prompt, "add a hat");
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = EditOutcome::Failure("Failed to edit image".to_string());
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failure");
        assert!(!outcome.is_success());
        assert!(outcome.artifact().is_none());
    }

    #[test]
    fn test_success_exposes_artifact() {
        let artifact = ImageArtifact::from_base64("image/webp", "UklGRg==");
        let outcome = EditOutcome::Success(artifact.clone());
        assert!(outcome.is_success());
        assert_eq!(outcome.artifact(), Some(&artifact));
    }
}
