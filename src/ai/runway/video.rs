use super::client::RunwayHttpClient;
use super::types::{
    ContentModeration, CreateTaskResponse, ImageToVideoRequest, TaskResponse, UploadResponse,
};
use crate::ai::{ImageToVideoTask, TaskSnapshot, VideoGenerationService};
use crate::models::Config;
use crate::{Error, Result};
use async_trait::async_trait;

pub struct RunwayVideoClient {
    http: RunwayHttpClient,
    model: String,
    asset_upload_url: Option<String>,
}

impl RunwayVideoClient {
    pub fn new(http: RunwayHttpClient, model: String) -> Self {
        Self {
            http,
            model,
            asset_upload_url: None,
        }
    }

    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        let http = RunwayHttpClient::new_with_client(
            config.api_key.clone(),
            config.api_version.clone(),
            config.vendor_timeout,
            client,
        )
        .with_base_url(config.base_url.clone());

        let mut video = Self::new(http, config.model.clone());
        video.asset_upload_url = config.asset_upload_url.clone();
        video
    }

    pub fn with_asset_upload_url(mut self, url: String) -> Self {
        self.asset_upload_url = Some(url);
        self
    }
}

/// Re-tag vendor HTTP failures on the submission path.
fn as_submission_error(err: Error) -> Error {
    match err {
        Error::VendorApi {
            status,
            message,
            details,
        } => Error::Submission {
            message: format!("Runway API error (status {}): {}", status, message),
            details,
        },
        other => other,
    }
}

#[async_trait]
impl VideoGenerationService for RunwayVideoClient {
    async fn upload_asset(&self, bytes: &[u8], mime: &str) -> Result<String> {
        let url = self
            .asset_upload_url
            .as_deref()
            .ok_or_else(|| Error::Config("asset upload URL is not configured".to_string()))?;

        tracing::debug!("Uploading {} byte {} asset to {}", bytes.len(), mime, url);

        let body = self
            .http
            .post_bytes(url, bytes.to_vec(), mime)
            .await
            .map_err(as_submission_error)?;

        let response: UploadResponse =
            serde_json::from_value(body.clone()).map_err(|e| Error::Submission {
                message: format!("Unexpected asset upload response: {}", e),
                details: Some(body.clone()),
            })?;

        response
            .url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| Error::Submission {
                message: "asset upload response did not include a reference URL".to_string(),
                details: Some(body),
            })
    }

    async fn submit(&self, task: &ImageToVideoTask) -> Result<String> {
        let request = ImageToVideoRequest {
            prompt_image: task.prompt_image.clone(),
            prompt_text: task.prompt_text.clone(),
            model: self.model.clone(),
            duration: task.duration,
            ratio: task.ratio,
            seed: task.seed,
            content_moderation: ContentModeration::permissive(),
        };

        let body = self
            .http
            .post_json("/v1/image_to_video", &request)
            .await
            .map_err(as_submission_error)?;

        let response: CreateTaskResponse =
            serde_json::from_value(body.clone()).map_err(|e| Error::Submission {
                message: format!("Unexpected task creation response: {}", e),
                details: Some(body.clone()),
            })?;

        response
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::Submission {
                message: "response did not include a task id".to_string(),
                details: Some(body),
            })
    }

    async fn task_status(&self, task_id: &str) -> Result<TaskSnapshot> {
        let body = self.http.get_json(&format!("/v1/tasks/{}", task_id)).await?;

        let response: TaskResponse =
            serde_json::from_value(body.clone()).map_err(|e| Error::VendorApi {
                status: 200,
                message: format!("Unexpected task status response: {}", e),
                details: Some(body.clone()),
            })?;

        let video_url = response
            .output
            .as_ref()
            .and_then(|output| output.video_url())
            .map(str::to_string);
        let failure = response
            .failure
            .or(response.failure_code)
            .filter(|value| !value.is_null())
            .map(|value| match value {
                serde_json::Value::String(message) => message,
                other => other.to_string(),
            });

        Ok(TaskSnapshot {
            id: response.id.unwrap_or_else(|| task_id.to_string()),
            status: response.status,
            video_url,
            failure,
            raw: body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::TaskStatus;
    use crate::models::AspectRatio;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(server: &MockServer) -> RunwayVideoClient {
        let http = RunwayHttpClient::new(
            "test-key".to_string(),
            "2024-11-06".to_string(),
            Duration::from_secs(5),
        )
        .with_base_url(server.uri());
        RunwayVideoClient::new(http, "gen4_turbo".to_string())
    }

    fn sample_task() -> ImageToVideoTask {
        ImageToVideoTask {
            prompt_image: "data:image/png;base64,AQID".to_string(),
            prompt_text: "a cat surfing".to_string(),
            duration: 5,
            ratio: AspectRatio::Landscape,
            seed: 42,
        }
    }

    #[tokio::test]
    async fn test_submit_sends_headers_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/image_to_video"))
            .and(header("Authorization", "Bearer test-key"))
            .and(header("X-Runway-Version", "2024-11-06"))
            .and(body_partial_json(serde_json::json!({
                "promptImage": "data:image/png;base64,AQID",
                "promptText": "a cat surfing",
                "model": "gen4_turbo",
                "duration": 5,
                "ratio": "1280:720",
                "seed": 42,
                "contentModeration": { "publicFigureThreshold": "low" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "abc123"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server);
        let task_id = client.submit(&sample_task()).await.unwrap();
        assert_eq!(task_id, "abc123");
    }

    #[tokio::test]
    async fn test_submit_rejection_is_submission_error_with_details() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/image_to_video"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "Invalid asset aspect ratio"
            })))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let err = client.submit(&sample_task()).await.unwrap_err();

        match err {
            Error::Submission { message, details } => {
                assert!(message.contains("400"));
                assert_eq!(
                    details.unwrap()["error"],
                    serde_json::json!("Invalid asset aspect ratio")
                );
            }
            other => panic!("expected submission error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_without_id_is_submission_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/image_to_video"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let err = client.submit(&sample_task()).await.unwrap_err();
        assert!(matches!(err, Error::Submission { .. }));
        assert!(err.to_string().contains("failed to start generation task"));
    }

    #[tokio::test]
    async fn test_task_status_parses_url_list_output() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/tasks/abc123"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "abc123",
                "status": "SUCCEEDED",
                "output": ["https://cdn.test/video.mp4"]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let snapshot = client.task_status("abc123").await.unwrap();

        assert_eq!(snapshot.id, "abc123");
        assert_eq!(snapshot.status, TaskStatus::Succeeded);
        assert_eq!(
            snapshot.video_url.as_deref(),
            Some("https://cdn.test/video.mp4")
        );
    }

    #[tokio::test]
    async fn test_task_status_parses_video_uri_output() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/tasks/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "abc123",
                "status": "SUCCEEDED",
                "output": { "videoUri": "https://example/video.mp4" }
            })))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let snapshot = client.task_status("abc123").await.unwrap();
        assert_eq!(
            snapshot.video_url.as_deref(),
            Some("https://example/video.mp4")
        );
    }

    #[tokio::test]
    async fn test_task_status_keeps_failure_payload() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/tasks/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "abc123",
                "status": "FAILED",
                "failure": "Content moderation",
                "failureCode": "SAFETY.INPUT.IMAGE"
            })))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let snapshot = client.task_status("abc123").await.unwrap();

        assert_eq!(snapshot.status, TaskStatus::Failed);
        assert_eq!(snapshot.failure.as_deref(), Some("Content moderation"));
        assert_eq!(snapshot.raw["failureCode"], "SAFETY.INPUT.IMAGE");
    }

    #[tokio::test]
    async fn test_task_status_accepts_structured_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/tasks/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "abc123",
                "status": "FAILED",
                "failure": { "reason": "moderation", "code": 42 }
            })))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let snapshot = client.task_status("abc123").await.unwrap();

        assert_eq!(snapshot.status, TaskStatus::Failed);
        let failure = snapshot.failure.unwrap();
        assert!(failure.contains("moderation"));
        assert_eq!(snapshot.raw["failure"]["code"], 42);
    }

    #[tokio::test]
    async fn test_slow_vendor_hits_request_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/image_to_video"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "id": "late" }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let http = RunwayHttpClient::new(
            "test-key".to_string(),
            "2024-11-06".to_string(),
            Duration::from_millis(300),
        )
        .with_base_url(server.uri());
        let client = RunwayVideoClient::new(http, "gen4_turbo".to_string());

        let err = client.submit(&sample_task()).await.unwrap_err();

        match &err {
            Error::Http(e) => assert!(e.is_timeout()),
            other => panic!("expected HTTP timeout, got {:?}", other),
        }
        assert_eq!(
            err.status_code(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_upload_asset_returns_reference() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/assets"))
            .and(header("Content-Type", "image/png"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "runwayUri": "runway://assets/xyz"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server).with_asset_upload_url(format!("{}/assets", server.uri()));
        let reference = client.upload_asset(&[1, 2, 3], "image/png").await.unwrap();
        assert_eq!(reference, "runway://assets/xyz");
    }

    #[tokio::test]
    async fn test_upload_asset_requires_configured_url() {
        let server = MockServer::start().await;
        let client = make_client(&server);

        let err = client.upload_asset(&[1, 2, 3], "image/png").await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
