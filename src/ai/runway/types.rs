//! Runway request/response payloads.

use crate::ai::TaskStatus;
use crate::models::AspectRatio;
use serde::{Deserialize, Serialize};

/// Request body for `POST /v1/image_to_video`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageToVideoRequest {
    pub prompt_image: String,
    pub prompt_text: String,
    pub model: String,
    pub duration: u32,
    pub ratio: AspectRatio,
    pub seed: u32,
    pub content_moderation: ContentModeration,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentModeration {
    pub public_figure_threshold: String,
}

impl ContentModeration {
    /// The least restrictive public-figure policy the API accepts.
    pub fn permissive() -> Self {
        Self {
            public_figure_threshold: "low".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskResponse {
    pub id: Option<String>,
}

/// Response body for `GET /v1/tasks/{id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Option<String>,
    pub status: TaskStatus,
    pub output: Option<TaskOutput>,
    pub failure: Option<serde_json::Value>,
    pub failure_code: Option<serde_json::Value>,
}

/// Task output is either a list of URLs or an object naming the video.
///
/// Variant order matters for `#[serde(untagged)]` decoding.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TaskOutput {
    Urls(Vec<String>),
    Video {
        #[serde(rename = "videoUri", alias = "videoUrl", alias = "url")]
        video_uri: Option<String>,
    },
}

impl TaskOutput {
    pub fn video_url(&self) -> Option<&str> {
        let url = match self {
            TaskOutput::Urls(urls) => urls.first().map(String::as_str),
            TaskOutput::Video { video_uri } => video_uri.as_deref(),
        };
        url.filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    #[serde(alias = "uri", alias = "runwayUri")]
    pub url: Option<String>,
}
