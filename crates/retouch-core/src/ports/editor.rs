//! Remote edit capability

use crate::Result;
use async_trait::async_trait;
use retouch_types::{EditRequest, ImageArtifact};

/// A service that edits an image according to a text instruction.
///
/// Implementations make exactly one attempt per call. They fail with
/// [`crate::RetouchError::NoImage`] when the service answers without an
/// image (e.g. a safety rejection) and with [`crate::RetouchError::Remote`]
/// when the call itself fails.
#[async_trait]
pub trait EditBackend: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    async fn edit_image(&self, request: &EditRequest) -> Result<ImageArtifact>;
}
