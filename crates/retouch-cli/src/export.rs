//! Save edited images to a local directory

use async_trait::async_trait;
use retouch_core::{codec, ImageArtifact, SaveTarget};
use std::path::{Path, PathBuf};
use tracing::info;

pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

#[async_trait]
impl SaveTarget for DirectoryTarget {
    async fn save(&self, artifact: &ImageArtifact, file_name: &str) -> retouch_core::Result<()> {
        let bytes = codec::decode(artifact)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(file_name);
        tokio::fs::write(&path, &bytes).await?;
        info!(path = %path.display(), bytes = bytes.len(), "Saved image");

        Ok(())
    }
}
