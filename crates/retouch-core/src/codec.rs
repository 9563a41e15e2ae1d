//! Image codec
//!
//! Turns a binary image on disk into a data URL artifact and back.

use crate::error::{Result, RetouchError};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use retouch_types::ImageArtifact;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Media type used when nothing better is known
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// A selected image file plus the media type declared for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResource {
    pub path: PathBuf,
    pub media_type: String,
}

impl ImageResource {
    pub fn new(path: impl Into<PathBuf>, media_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            media_type: media_type.into(),
        }
    }

    /// Declare the media type from the file extension
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let media_type = media_type_for_path(&path).unwrap_or(FALLBACK_MEDIA_TYPE);
        Self {
            path,
            media_type: media_type.to_string(),
        }
    }
}

/// Guess an image media type from a file extension
pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// Encode raw bytes as a data URL artifact
pub fn encode(bytes: &[u8], media_type: &str) -> ImageArtifact {
    ImageArtifact::from_base64(media_type, &BASE64.encode(bytes))
}

/// Read a resource and encode it.
///
/// Performs no size or type validation. Any read error is reported as
/// [`RetouchError::Read`] with the underlying cause attached.
pub async fn read_image(resource: &ImageResource) -> Result<ImageArtifact> {
    let bytes = tokio::fs::read(&resource.path)
        .await
        .map_err(RetouchError::Read)?;

    debug!(
        path = %resource.path.display(),
        media_type = %resource.media_type,
        bytes = bytes.len(),
        "Encoded image"
    );

    Ok(encode(&bytes, &resource.media_type))
}

/// Decode an artifact back into raw bytes
pub fn decode(artifact: &ImageArtifact) -> Result<Vec<u8>> {
    let data = match artifact.encoded_payload.strip_prefix("data:") {
        Some(rest) => {
            let (header, data) = rest.split_once(',').ok_or_else(|| {
                RetouchError::MalformedPayload("data URL has no payload separator".to_string())
            })?;
            if !header.split(';').any(|param| param == "base64") {
                return Err(RetouchError::MalformedPayload(format!(
                    "data URL is not base64 encoded: {}",
                    header
                )));
            }
            data
        }
        // Bare base64, as the remote side sends it
        None => artifact.encoded_payload.as_str(),
    };

    Ok(BASE64.decode(data.trim().as_bytes())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_embeds_media_type() {
        let artifact = encode(PNG_HEADER, "image/png");
        assert!(artifact.encoded_payload.starts_with("data:image/png;base64,"));
        assert_eq!(artifact.media_type, "image/png");
        assert_eq!(artifact.embedded_media_type(), Some("image/png"));
    }

    #[test]
    fn test_round_trip() {
        let inputs: [&[u8]; 4] = [b"", PNG_HEADER, &[0u8, 255, 1, 254, 2], &[7u8; 1031]];
        for bytes in inputs {
            let artifact = encode(bytes, "image/png");
            assert_eq!(decode(&artifact).unwrap(), bytes);
        }
    }

    #[test]
    fn test_decode_bare_base64() {
        let artifact = ImageArtifact {
            encoded_payload: "aGVsbG8=".to_string(),
            media_type: "image/png".to_string(),
        };
        assert_eq!(decode(&artifact).unwrap(), b"hello");
    }

    #[test]
    fn test_decode_rejects_malformed() {
        let not_base64 = ImageArtifact {
            encoded_payload: "data:image/png,raw".to_string(),
            media_type: "image/png".to_string(),
        };
        assert!(matches!(
            decode(&not_base64),
            Err(RetouchError::MalformedPayload(_))
        ));

        let no_separator = ImageArtifact {
            encoded_payload: "data:image/png;base64".to_string(),
            media_type: "image/png".to_string(),
        };
        assert_err!(decode(&no_separator));

        let garbage = ImageArtifact::from_base64("image/png", "***");
        assert_err!(decode(&garbage));
    }

    #[test]
    fn test_media_type_for_path() {
        assert_eq!(media_type_for_path(Path::new("a.PNG")), Some("image/png"));
        assert_eq!(media_type_for_path(Path::new("a.jpg")), Some("image/jpeg"));
        assert_eq!(media_type_for_path(Path::new("a.jpeg")), Some("image/jpeg"));
        assert_eq!(media_type_for_path(Path::new("a.txt")), None);
        assert_eq!(media_type_for_path(Path::new("noext")), None);

        let resource = ImageResource::from_path("photo.webp");
        assert_eq!(resource.media_type, "image/webp");
        let unknown = ImageResource::from_path("photo.raw");
        assert_eq!(unknown.media_type, FALLBACK_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_read_image_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        std::fs::write(&path, PNG_HEADER).unwrap();

        let resource = ImageResource::from_path(&path);
        let artifact = assert_ok!(read_image(&resource).await);
        assert_eq!(artifact.media_type, "image/png");
        assert_eq!(decode(&artifact).unwrap(), PNG_HEADER);

        // Reading again yields the same artifact
        let again = read_image(&resource).await.unwrap();
        assert_eq!(artifact, again);
    }

    #[tokio::test]
    async fn test_read_image_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let resource = ImageResource::new(dir.path().join("missing.png"), "image/png");

        match read_image(&resource).await {
            Err(RetouchError::Read(cause)) => {
                assert_eq!(cause.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected read failure, got {:?}", other),
        }
    }
}
