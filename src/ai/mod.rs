//! Video generation vendor integration
//!
//! Provides the interface to Runway's image-to-video task API: optional asset
//! upload, task submission, and task status lookup.

pub mod mock;
pub mod runway;

pub use mock::MockVideoClient;
pub use runway::RunwayVideoClient;

use crate::models::AspectRatio;
use crate::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// One submission to the vendor, with the image already normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageToVideoTask {
    pub prompt_image: String,
    pub prompt_text: String,
    pub duration: u32,
    pub ratio: AspectRatio,
    pub seed: u32,
}

/// Vendor task lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Throttled,
    #[serde(alias = "STARTED", alias = "PROCESSING")]
    Running,
    Succeeded,
    Failed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskStatus::Succeeded | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }
}

/// What one status query observed.
#[derive(Debug, Clone)]
pub struct TaskSnapshot {
    pub id: String,
    pub status: TaskStatus,
    pub video_url: Option<String>,
    pub failure: Option<String>,
    /// Raw vendor payload, forwarded to callers as diagnostics.
    pub raw: serde_json::Value,
}

impl TaskSnapshot {
    pub fn new(id: impl Into<String>, status: TaskStatus) -> Self {
        let id = id.into();
        let raw = serde_json::json!({ "id": id, "status": status_name(status) });
        Self {
            id,
            status,
            video_url: None,
            failure: None,
            raw,
        }
    }

    pub fn with_video_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.raw["output"] = serde_json::json!({ "videoUri": url });
        self.video_url = Some(url);
        self
    }

    pub fn with_failure(mut self, failure: impl Into<String>) -> Self {
        let failure = failure.into();
        self.raw["failure"] = serde_json::Value::String(failure.clone());
        self.failure = Some(failure);
        self
    }
}

fn status_name(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "PENDING",
        TaskStatus::Throttled => "THROTTLED",
        TaskStatus::Running => "RUNNING",
        TaskStatus::Succeeded => "SUCCEEDED",
        TaskStatus::Failed => "FAILED",
        TaskStatus::Cancelled => "CANCELLED",
        TaskStatus::Unknown => "UNKNOWN",
    }
}

#[async_trait]
pub trait VideoGenerationService: Send + Sync {
    /// Store raw image bytes with the vendor and return a reusable reference.
    async fn upload_asset(&self, bytes: &[u8], mime: &str) -> Result<String>;
    /// Start a generation task and return its vendor id.
    async fn submit(&self, task: &ImageToVideoTask) -> Result<String>;
    async fn task_status(&self, task_id: &str) -> Result<TaskSnapshot>;
}
