//! Application orchestration for one image-to-video generation.

use crate::ai::{ImageToVideoTask, RunwayVideoClient, VideoGenerationService};
use crate::intake::{self, GenerateBody};
use crate::models::{Config, GenerationRequest, ImageDelivery, ImageSource};
use crate::poll::{JobPoller, Sleeper, TokioSleeper};
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Validates requests, submits them to the vendor, and waits for the video.
pub struct App {
    video: Box<dyn VideoGenerationService>,
    poller: JobPoller,
    image_delivery: ImageDelivery,
    validate_image_ratio: bool,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub video: Box<dyn VideoGenerationService>,
    pub sleeper: Arc<dyn Sleeper>,
}

/// Behavior knobs taken from [`Config`].
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub poll_interval: Duration,
    pub poll_max_attempts: u32,
    pub image_delivery: ImageDelivery,
    pub validate_image_ratio: bool,
}

impl From<&Config> for AppSettings {
    fn from(config: &Config) -> Self {
        Self {
            poll_interval: config.poll_interval,
            poll_max_attempts: config.poll_max_attempts,
            image_delivery: config.image_delivery,
            validate_image_ratio: config.validate_image_ratio,
        }
    }
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices, settings: AppSettings) -> Self {
        let poller = JobPoller::new(settings.poll_interval, settings.poll_max_attempts)
            .with_sleeper(services.sleeper);

        Self {
            video: services.video,
            poller,
            image_delivery: settings.image_delivery,
            validate_image_ratio: settings.validate_image_ratio,
        }
    }

    /// Construct the production app talking to Runway.
    pub fn new(config: &Config) -> Self {
        info!(
            "Video provider: Runway (model: {}, base URL: {})",
            config.model, config.base_url
        );
        info!(
            "Polling every {:?}, at most {} checks",
            config.poll_interval, config.poll_max_attempts
        );

        let video = RunwayVideoClient::from_config(config, reqwest::Client::new());

        Self::with_services(
            AppServices {
                video: Box::new(video),
                sleeper: Arc::new(TokioSleeper),
            },
            AppSettings::from(config),
        )
    }

    pub fn parse_request(&self, body: GenerateBody) -> Result<GenerationRequest> {
        intake::parse_request(body, self.validate_image_ratio)
    }

    /// Submit one task for `request` and wait for its video URL.
    ///
    /// Submission happens exactly once; a failed submission is never retried.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let prompt_image = self.prepare_image(&request.image).await?;

        let task = ImageToVideoTask {
            prompt_image,
            prompt_text: request.prompt.clone(),
            duration: request.duration,
            ratio: request.ratio,
            seed: rand::random::<u32>(),
        };

        let task_id = self.video.submit(&task).await?;
        info!(
            "Started generation task {} ({}s, {})",
            task_id, task.duration, task.ratio
        );

        let video_url = self
            .poller
            .wait_for_video(self.video.as_ref(), &task_id)
            .await?;
        info!("Task {} produced {}", task_id, video_url);

        Ok(video_url)
    }

    async fn prepare_image(&self, image: &ImageSource) -> Result<String> {
        match (image, self.image_delivery) {
            (ImageSource::Remote(url), _) => Ok(url.to_string()),
            (ImageSource::Inline { mime, bytes }, ImageDelivery::Upload) => {
                let reference = self.video.upload_asset(bytes, mime).await?;
                info!("Uploaded {} byte image as {}", bytes.len(), reference);
                Ok(reference)
            }
            (ImageSource::Inline { .. }, ImageDelivery::Inline) => image
                .to_data_uri()
                .ok_or_else(|| Error::InvalidInput("image could not be encoded".to_string())),
        }
    }
}
