//! Encoded image artifacts

use serde::{Deserialize, Serialize};

/// Extension used when the media type carries no usable subtype
pub const DEFAULT_EXTENSION: &str = "png";

/// An image held as a self-describing data URL (`data:<mime>;base64,<data>`)
/// together with the media type declared by whoever produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageArtifact {
    pub encoded_payload: String,
    pub media_type: String,
}

impl ImageArtifact {
    /// Build an artifact from already base64-encoded data
    pub fn from_base64(media_type: impl Into<String>, data: &str) -> Self {
        let media_type = media_type.into();
        Self {
            encoded_payload: format!("data:{};base64,{}", media_type, data),
            media_type,
        }
    }

    /// The transport payload with the `data:...,` prefix stripped.
    ///
    /// A payload without a comma is returned whole.
    pub fn payload(&self) -> &str {
        match self.encoded_payload.split_once(',') {
            Some((_, data)) => data,
            None => &self.encoded_payload,
        }
    }

    /// Media type embedded in the data URL header, if there is one
    pub fn embedded_media_type(&self) -> Option<&str> {
        let header = self.encoded_payload.strip_prefix("data:")?;
        let (header, _) = header.split_once(',').unwrap_or((header, ""));
        let mime = header.split(';').next()?.trim();
        if mime.is_empty() {
            None
        } else {
            Some(mime)
        }
    }

    /// File extension derived from the embedded media type
    pub fn extension(&self) -> &str {
        self.embedded_media_type()
            .and_then(|mime| mime.split_once('/'))
            .map(|(_, subtype)| subtype.split('+').next().unwrap_or(subtype))
            .filter(|subtype| !subtype.is_empty())
            .unwrap_or(DEFAULT_EXTENSION)
    }

    /// Size of the encoded payload in bytes
    pub fn encoded_len(&self) -> usize {
        self.encoded_payload.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_base64_builds_data_url() {
        let artifact = ImageArtifact::from_base64("image/png", "aGVsbG8=");
        assert_eq!(artifact.encoded_payload, "data:image/png;base64,aGVsbG8=");
        assert_eq!(artifact.media_type, "image/png");
        assert_eq!(artifact.payload(), "aGVsbG8=");
    }

    #[test]
    fn test_payload_without_prefix() {
        let artifact = ImageArtifact {
            encoded_payload: "aGVsbG8=".to_string(),
            media_type: "image/png".to_string(),
        };
        assert_eq!(artifact.payload(), "aGVsbG8=");
        assert_eq!(artifact.embedded_media_type(), None);
        assert_eq!(artifact.extension(), DEFAULT_EXTENSION);
    }

    #[test]
    fn test_extension_from_embedded_type() {
        let jpeg = ImageArtifact::from_base64("image/jpeg", "AAAA");
        assert_eq!(jpeg.extension(), "jpeg");

        let svg = ImageArtifact::from_base64("image/svg+xml", "AAAA");
        assert_eq!(svg.extension(), "svg");

        // The embedded type wins over the declared one
        let mismatched = ImageArtifact {
            encoded_payload: "data:image/webp;base64,AAAA".to_string(),
            media_type: "image/png".to_string(),
        };
        assert_eq!(mismatched.extension(), "webp");
    }

    #[test]
    fn test_extension_falls_back_when_unparseable() {
        let artifact = ImageArtifact {
            encoded_payload: "data:;base64,AAAA".to_string(),
            media_type: String::new(),
        };
        assert_eq!(artifact.extension(), "png");

        let no_subtype = ImageArtifact {
            encoded_payload: "data:image;base64,AAAA".to_string(),
            media_type: "image".to_string(),
        };
        assert_eq!(no_subtype.extension(), "png");
    }
}
