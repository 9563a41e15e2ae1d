//! Save boundary

use crate::Result;
use async_trait::async_trait;
use retouch_types::ImageArtifact;

/// Platform-specific destination for finished images
#[async_trait]
pub trait SaveTarget: Send + Sync {
    /// Persist the artifact under the suggested file name
    async fn save(&self, artifact: &ImageArtifact, file_name: &str) -> Result<()>;
}
