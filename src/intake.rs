//! Client request intake
//!
//! Turns the JSON body of `POST /api/generate` into a validated
//! [`GenerationRequest`]. Nothing here talks to the vendor.

use crate::image::{bucket_for_ratio, image_ratio, sniff_image_mime, validate_ratio};
use crate::models::{AspectRatio, GenerationRequest, ImageSource};
use crate::{Error, Result};
use base64::Engine as _;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

const MISSING_PARAMETERS: &str = "missing parameters";

/// Raw request body as sent by clients.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    #[serde(alias = "promptText")]
    pub prompt: Option<String>,
    #[serde(alias = "image")]
    pub prompt_image: Option<String>,
    pub duration: Option<Value>,
    pub ratio: Option<String>,
}

pub fn parse_request(body: GenerateBody, validate_image_ratio: bool) -> Result<GenerationRequest> {
    let prompt = body
        .prompt
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());
    let image = body
        .prompt_image
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty());
    let duration = body.duration.filter(|d| !d.is_null());

    let (Some(prompt), Some(image), Some(duration)) = (prompt, image, duration) else {
        return Err(Error::InvalidInput(MISSING_PARAMETERS.to_string()));
    };

    let duration = parse_duration(&duration)?;
    let image = parse_image_source(&image)?;

    let explicit_ratio = match body.ratio.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(AspectRatio::parse(raw).ok_or_else(|| {
            Error::InvalidInput(format!(
                "unsupported ratio '{}', expected one of {}",
                raw,
                AspectRatio::ALL.map(|r| r.as_str()).join(", ")
            ))
        })?),
        _ => None,
    };

    let ratio = match &image {
        ImageSource::Inline { bytes, .. } if validate_image_ratio => {
            let derived = validate_ratio(image_ratio(bytes)?)?;
            explicit_ratio.unwrap_or(derived)
        }
        // Unchecked: still bucket by shape when the header is readable.
        ImageSource::Inline { bytes, .. } => explicit_ratio.unwrap_or_else(|| {
            image_ratio(bytes)
                .map(bucket_for_ratio)
                .unwrap_or(AspectRatio::Landscape)
        }),
        ImageSource::Remote(_) => explicit_ratio.unwrap_or(AspectRatio::Landscape),
    };

    Ok(GenerationRequest {
        prompt,
        duration,
        image,
        ratio,
    })
}

/// Durations must be positive whole seconds, as a number or numeric string.
fn parse_duration(value: &Value) -> Result<u32> {
    let parsed = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };

    match parsed {
        Some(seconds) if seconds > 0 => Ok(seconds),
        _ => Err(Error::InvalidInput(format!(
            "invalid duration {}: expected a positive whole number of seconds",
            value
        ))),
    }
}

/// Classify the image field as a data URI, a remote URL, or bare base64.
pub fn parse_image_source(raw: &str) -> Result<ImageSource> {
    if let Some(rest) = raw.strip_prefix("data:") {
        return parse_data_uri(rest);
    }

    if raw.starts_with("http://") || raw.starts_with("https://") {
        let url = Url::parse(raw)
            .map_err(|e| Error::InvalidInput(format!("invalid image URL: {}", e)))?;
        return Ok(ImageSource::Remote(url));
    }

    let bytes = decode_base64(raw).map_err(|_| {
        Error::InvalidInput(
            "image must be a data URI, an http(s) URL, or base64-encoded bytes".to_string(),
        )
    })?;
    let mime = sniff_image_mime(&bytes).ok_or_else(|| {
        Error::InvalidInput("base64 image is not a JPEG, PNG, WebP or GIF".to_string())
    })?;
    Ok(ImageSource::Inline {
        mime: mime.to_string(),
        bytes,
    })
}

fn parse_data_uri(rest: &str) -> Result<ImageSource> {
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::InvalidInput("malformed image data URI".to_string()))?;

    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| Error::InvalidInput("image data URI must be base64-encoded".to_string()))?
        .trim()
        .to_ascii_lowercase();
    if !mime.starts_with("image/") {
        return Err(Error::InvalidInput(format!(
            "unsupported image type '{}'",
            mime
        )));
    }

    let bytes = decode_base64(payload)
        .map_err(|e| Error::InvalidInput(format!("invalid base64 image data: {}", e)))?;
    Ok(ImageSource::Inline { mime, bytes })
}

fn decode_base64(payload: &str) -> std::result::Result<Vec<u8>, String> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| e.to_string())?;
    if bytes.is_empty() {
        return Err("empty image".to_string());
    }
    Ok(bytes)
}
