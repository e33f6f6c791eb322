//! Image inspection for incoming generation requests
//!
//! Sniffs the MIME type of inline uploads and reads their dimensions to
//! pick a supported output aspect ratio.

pub mod mime;
pub mod ratio;

pub use mime::sniff_image_mime;
pub use ratio::{bucket_for_ratio, image_ratio, validate_ratio, MAX_RATIO, MIN_RATIO};
