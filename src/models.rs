//! Data models and structures
//!
//! Defines the validated generation request, the supported output aspect
//! ratios, and the process configuration.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Output aspect ratios accepted by the video model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1280:720")]
    Landscape,
    #[serde(rename = "720:1280")]
    Portrait,
    #[serde(rename = "960:960")]
    Square,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 3] = [
        AspectRatio::Landscape,
        AspectRatio::Portrait,
        AspectRatio::Square,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "1280:720",
            AspectRatio::Portrait => "720:1280",
            AspectRatio::Square => "960:960",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value.trim())
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the source image for a generation comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Inline { mime: String, bytes: Vec<u8> },
    Remote(Url),
}

impl ImageSource {
    /// Self-contained `data:` URI for inline images.
    pub fn to_data_uri(&self) -> Option<String> {
        match self {
            ImageSource::Inline { mime, bytes } => {
                use base64::Engine as _;
                let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
                Some(format!("data:{};base64,{}", mime, encoded))
            }
            ImageSource::Remote(_) => None,
        }
    }
}

/// A validated client request, ready for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub duration: u32,
    pub image: ImageSource,
    pub ratio: AspectRatio,
}

/// How inline images reach the vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageDelivery {
    #[default]
    Inline,
    Upload,
}

impl std::str::FromStr for ImageDelivery {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(ImageDelivery::Inline),
            "upload" => Ok(ImageDelivery::Upload),
            other => Err(format!(
                "unknown image delivery '{}', expected 'inline' or 'upload'",
                other
            )),
        }
    }
}

// Configuration
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BASE_URL: &str = "https://api.dev.runwayml.com";
const DEFAULT_API_VERSION: &str = "2024-11-06";
const DEFAULT_MODEL: &str = "gen4_turbo";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 12;
const DEFAULT_VENDOR_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub port: u16,
    pub base_url: String,
    pub api_version: String,
    pub model: String,
    pub poll_interval: Duration,
    pub poll_max_attempts: u32,
    pub vendor_timeout: Duration,
    pub image_delivery: ImageDelivery,
    pub asset_upload_url: Option<String>,
    pub validate_image_ratio: bool,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        load_dotenv(dotenvy::dotenv())?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = var("RUNWAY_API_KEY")
            .ok_or_else(|| crate::Error::Config("RUNWAY_API_KEY not set".to_string()))?;

        let port = parse_or(var("PORT"), "PORT", DEFAULT_PORT)?;
        let poll_interval_secs = parse_or(
            var("POLL_INTERVAL_SECS"),
            "POLL_INTERVAL_SECS",
            DEFAULT_POLL_INTERVAL_SECS,
        )?;
        let poll_max_attempts = parse_or(
            var("POLL_MAX_ATTEMPTS"),
            "POLL_MAX_ATTEMPTS",
            DEFAULT_POLL_MAX_ATTEMPTS,
        )?;
        if poll_max_attempts == 0 {
            return Err(crate::Error::Config(
                "POLL_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }
        let vendor_timeout_secs = parse_or(
            var("VENDOR_TIMEOUT_SECS"),
            "VENDOR_TIMEOUT_SECS",
            DEFAULT_VENDOR_TIMEOUT_SECS,
        )?;

        let image_delivery: ImageDelivery = match var("IMAGE_DELIVERY") {
            Some(raw) => raw.parse().map_err(crate::Error::Config)?,
            None => ImageDelivery::default(),
        };
        let asset_upload_url = var("ASSET_UPLOAD_URL");
        if image_delivery == ImageDelivery::Upload && asset_upload_url.is_none() {
            return Err(crate::Error::Config(
                "ASSET_UPLOAD_URL is required when IMAGE_DELIVERY=upload".to_string(),
            ));
        }

        let validate_image_ratio = match var("VALIDATE_IMAGE_RATIO") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                crate::Error::Config(format!("Invalid VALIDATE_IMAGE_RATIO '{}'", raw))
            })?,
            None => true,
        };

        Ok(Self {
            api_key,
            port,
            base_url: var("RUNWAY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_version: var("RUNWAY_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            model: var("RUNWAY_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            poll_interval: Duration::from_secs(poll_interval_secs),
            poll_max_attempts,
            vendor_timeout: Duration::from_secs(vendor_timeout_secs),
            image_delivery,
            asset_upload_url,
            validate_image_ratio,
        })
    }
}

/// A missing `.env` is fine; an unreadable or malformed one is not.
fn load_dotenv(result: dotenvy::Result<std::path::PathBuf>) -> crate::Result<()> {
    match result {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, key: &str, default: T) -> crate::Result<T> {
    match raw {
        Some(value) => value
            .parse()
            .map_err(|_| crate::Error::Config(format!("Invalid {} '{}'", key, value))),
        None => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
