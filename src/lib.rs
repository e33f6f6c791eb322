//! Image-to-video generation proxy
//!
//! Accepts an image and a prompt over HTTP, starts a Runway image-to-video
//! task, polls it until it finishes, and answers with the video URL.

pub mod ai;
pub mod app;
pub mod error;
pub mod image;
pub mod intake;
pub mod models;
pub mod poll;
pub mod server;

pub use error::{Error, Result};
