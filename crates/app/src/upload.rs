// crates/app/src/upload.rs

//! Image upload webhook contract.
//!
//! The editor posts image bytes to an external webhook (auth header + body)
//! and gets back `{source_url}`. The core's only obligation is to store
//! that URL string on the relevant document, which `Actions::set_post_image`
//! does. Transport is injected; the shipped implementation declines.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Successful webhook response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub source_url: String,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload rejected: {0}")]
    Rejected(String),

    #[error("upload service unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedImage, UploadError>;
}

/// Offline implementation used when no webhook is configured.
#[derive(Debug, Default, Clone)]
pub struct OfflineUploader;

#[async_trait]
impl ImageUploader for OfflineUploader {
    async fn upload(
        &self,
        filename: &str,
        _content_type: &str,
        _bytes: Vec<u8>,
    ) -> Result<UploadedImage, UploadError> {
        warn!(%filename, "upload requested but no webhook is configured");
        Err(UploadError::Unavailable(
            "no upload webhook configured".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn offline_uploader_declines() {
        let err = OfflineUploader
            .upload("a.png", "image/png", vec![1, 2, 3])
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Unavailable(_)));
    }

    #[test]
    fn webhook_response_shape() {
        let wire: UploadedImage =
            serde_json::from_str(r#"{"source_url": "https://cdn.example.com/up/7.png"}"#).unwrap();
        assert_eq!(wire.source_url, "https://cdn.example.com/up/7.png");
    }
}
