//! Inline image payloads for the vision model.
//!
//! Images are never decoded: they travel as base64 text, optionally carried
//! in a `data:` URL from which the MIME type is sniffed.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// MIME type assumed when the data URL prefix is missing or unrecognised.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

static DATA_URL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:(image/\w+);base64,").expect("data URL pattern is valid")
});

/// Wire shape of Gemini's `inlineData` part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    /// Builds the payload from either a `data:` URL or bare base64.
    ///
    /// The data is everything after the first comma when one is present.
    pub fn from_data_url(source: &str) -> Self {
        let data = match source.split_once(',') {
            Some((_, rest)) => rest,
            None => source,
        };
        Self {
            mime_type: sniff_mime_type(source).to_string(),
            data: data.to_string(),
        }
    }
}

/// Returns the `image/<kind>` type declared by a data URL prefix.
pub fn sniff_mime_type(source: &str) -> &str {
    DATA_URL_PREFIX
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(DEFAULT_MIME_TYPE)
}

/// Reads an image file and encodes it as a data URL.
/// This is the string that is sent to the model and kept in history.
pub fn path_to_data_url(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed reading {}", path.display()))?;
    let mime = mime_for_path(path).unwrap_or(DEFAULT_MIME_TYPE);
    Ok(format!("data:{mime};base64,{}", BASE64.encode(bytes)))
}

fn mime_for_path(path: &Path) -> Option<&'static str> {
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
        "heic" => Some("image/heic"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_data_url_mime_and_payload_are_split() {
        let image = InlineImage::from_data_url("data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, "iVBORw0KGgo=");
    }

    #[test]
    fn test_bare_base64_defaults_to_jpeg() {
        let image = InlineImage::from_data_url("/9j/4AAQSkZJRg==");
        assert_eq!(image.mime_type, DEFAULT_MIME_TYPE);
        assert_eq!(image.data, "/9j/4AAQSkZJRg==");
    }

    #[test]
    fn test_non_image_data_url_defaults_mime_but_keeps_payload() {
        let image = InlineImage::from_data_url("data:application/pdf;base64,JVBERi0=");
        assert_eq!(image.mime_type, DEFAULT_MIME_TYPE);
        assert_eq!(image.data, "JVBERi0=");
    }

    #[test]
    fn test_inline_image_serializes_to_gemini_shape() {
        let image = InlineImage::from_data_url("data:image/webp;base64,UklGRg==");
        let value = serde_json::to_value(&image).unwrap();
        assert_eq!(value["mimeType"], "image/webp");
        assert_eq!(value["data"], "UklGRg==");
    }

    #[test]
    fn test_path_to_data_url_uses_extension_mime() {
        let mut file = tempfile::Builder::new().suffix(".PNG").tempfile().unwrap();
        file.write_all(b"not really a png").unwrap();

        let url = path_to_data_url(file.path()).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        let image = InlineImage::from_data_url(&url);
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(BASE64.decode(image.data).unwrap(), b"not really a png");
    }

    #[test]
    fn test_path_to_data_url_missing_file_errors() {
        let err = path_to_data_url(Path::new("/definitely/not/here.jpg")).unwrap_err();
        assert!(err.to_string().contains("failed reading"));
    }
}
