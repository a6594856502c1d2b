// crates/app/src/generate.rs

//! Generative drafting service contract.
//!
//! The site can draft blog content through an external text/image service.
//! The core only owns the request/response shapes and the degradation rule:
//! every failure comes back as a clearly labeled failure value so nothing
//! ever throws into the admin UI. Transport is injected at startup; the
//! shipped implementation is the offline one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftLength {
    Short,
    Medium,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Markdown,
    Html,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftRequest {
    pub topic: String,
    pub keywords: Vec<String>,
    pub length: DraftLength,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleRequest {
    pub topic: String,
    pub keywords: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
}

/// Success or a labeled failure; never an error type, so handlers can pass
/// it straight to the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Generated<T> {
    Ok { value: T },
    Failed { reason: String },
}

impl<T> Generated<T> {
    pub fn failed(reason: impl Into<String>) -> Self {
        Generated::Failed {
            reason: reason.into(),
        }
    }
}

#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Draft a post body for a topic.
    async fn draft_post(&self, request: DraftRequest) -> Generated<String>;

    /// Generate an illustration; the value is a data URI.
    async fn generate_image(&self, prompt: &str) -> Generated<String>;

    /// Suggest post titles for a topic.
    async fn suggest_titles(&self, request: TitleRequest) -> Generated<Vec<String>>;
}

/// Offline implementation: reports the service as unavailable, with the
/// label the UI shows next to the drafting buttons.
#[derive(Debug, Default, Clone)]
pub struct OfflineGenerator;

#[async_trait]
impl ContentGenerator for OfflineGenerator {
    async fn draft_post(&self, request: DraftRequest) -> Generated<String> {
        warn!(topic = %request.topic, "draft requested but no generator is configured");
        Generated::failed("Content generation is not configured.")
    }

    async fn generate_image(&self, prompt: &str) -> Generated<String> {
        warn!(%prompt, "image requested but no generator is configured");
        Generated::failed("Image generation is not configured.")
    }

    async fn suggest_titles(&self, request: TitleRequest) -> Generated<Vec<String>> {
        warn!(topic = %request.topic, "titles requested but no generator is configured");
        Generated::failed("Title suggestions are not configured.")
    }
}
