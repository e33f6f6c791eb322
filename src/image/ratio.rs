use crate::models::AspectRatio;
use crate::{Error, Result};
use image::ImageReader;
use std::io::Cursor;

pub const MIN_RATIO: f64 = 0.5;
pub const MAX_RATIO: f64 = 2.0;

const LANDSCAPE_ABOVE: f64 = 1.5;
const PORTRAIT_BELOW: f64 = 0.67;

/// Width divided by height, read from the image header without decoding pixels.
pub fn image_ratio(bytes: &[u8]) -> Result<f64> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| Error::InvalidInput(format!("unable to read image: {}", e)))?
        .into_dimensions()
        .map_err(|e| Error::InvalidInput(format!("unable to read image dimensions: {}", e)))?;

    if height == 0 {
        return Err(Error::InvalidInput("image has zero height".to_string()));
    }

    Ok(f64::from(width) / f64::from(height))
}

/// Nearest supported output ratio.
pub fn bucket_for_ratio(ratio: f64) -> AspectRatio {
    if ratio > LANDSCAPE_ABOVE {
        AspectRatio::Landscape
    } else if ratio < PORTRAIT_BELOW {
        AspectRatio::Portrait
    } else {
        AspectRatio::Square
    }
}

/// Reject ratios outside `[MIN_RATIO, MAX_RATIO]`, otherwise bucket them.
pub fn validate_ratio(ratio: f64) -> Result<AspectRatio> {
    if !(MIN_RATIO..=MAX_RATIO).contains(&ratio) {
        return Err(Error::InvalidInput(format!(
            "invalid image aspect ratio {:.2}: width/height must be between {} and {}",
            ratio, MIN_RATIO, MAX_RATIO
        )));
    }
    Ok(bucket_for_ratio(ratio))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;

    fn create_test_image(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_image_ratio_reads_dimensions() {
        let ratio = image_ratio(&create_test_image(40, 20)).unwrap();
        assert!((ratio - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_image_ratio_rejects_garbage() {
        let err = image_ratio(b"definitely not an image").unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_buckets() {
        assert_eq!(bucket_for_ratio(1.78), AspectRatio::Landscape);
        assert_eq!(bucket_for_ratio(0.56), AspectRatio::Portrait);
        assert_eq!(bucket_for_ratio(1.0), AspectRatio::Square);
        assert_eq!(bucket_for_ratio(1.5), AspectRatio::Square);
        assert_eq!(bucket_for_ratio(0.67), AspectRatio::Square);
    }

    #[test]
    fn test_validate_ratio_bounds_are_inclusive() {
        assert_eq!(validate_ratio(0.5).unwrap(), AspectRatio::Portrait);
        assert_eq!(validate_ratio(2.0).unwrap(), AspectRatio::Landscape);
    }

    #[test]
    fn test_validate_ratio_names_the_ratio() {
        let err = validate_ratio(0.3).unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("0.30"));

        let err = validate_ratio(2.5).unwrap_err();
        assert!(err.to_string().contains("2.50"));
    }
}
