//! Fetching user photos and preparing them for the vision provider.
//!
//! Photos arrive as URLs; each one is downloaded, validated by magic bytes,
//! and base64-encoded with its detected media type. A failed or unsupported
//! image is reported to the caller, which skips it and continues the batch.

use crate::pipeline_errors::PipelineError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use tracing::{debug, info};

/// An image ready to be embedded in a vision request
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    /// MIME type detected from magic bytes (e.g. "image/jpeg")
    pub media_type: String,
    /// Base64-encoded image bytes
    pub data: String,
}

/// Download an image URL and encode it for the vision provider
///
/// Rejects oversized downloads and formats the provider cannot consume
/// (anything other than JPEG, PNG, GIF, WebP).
pub async fn fetch_and_encode(
    client: &reqwest::Client,
    url: &str,
    max_bytes: u64,
) -> Result<EncodedImage, PipelineError> {
    debug!(url, "Fetching image");

    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| PipelineError::ImageFetch(format!("{url}: {e}")))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| PipelineError::ImageFetch(format!("{url}: {e}")))?;

    if bytes.len() as u64 > max_bytes {
        return Err(PipelineError::ImageFetch(format!(
            "{url}: image is {} bytes, limit is {max_bytes}",
            bytes.len()
        )));
    }

    let media_type = detect_media_type(&bytes)
        .ok_or_else(|| PipelineError::ImageFetch(format!("{url}: unsupported image format")))?;

    info!(url, media_type, size = bytes.len(), "Image fetched and encoded");

    Ok(EncodedImage {
        media_type: media_type.to_string(),
        data: BASE64.encode(&bytes),
    })
}

/// Detect the media type from magic bytes, restricted to formats the vision
/// provider accepts
pub fn detect_media_type(bytes: &[u8]) -> Option<&'static str> {
    match image::guess_format(bytes).ok()? {
        image::ImageFormat::Jpeg => Some("image/jpeg"),
        image::ImageFormat::Png => Some("image/png"),
        image::ImageFormat::Gif => Some("image/gif"),
        image::ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}
