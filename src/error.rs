//! Error handling and custom error types
//!
//! Provides unified error handling across the proxy using thiserror. Each
//! variant maps to exactly one caller-visible failure class; see
//! `server::response` for the HTTP translation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    InvalidInput(String),

    #[error("failed to start generation task: {message}")]
    Submission {
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("generation task {task_id} failed: {message}")]
    JobFailed {
        task_id: String,
        message: String,
        details: serde_json::Value,
    },

    #[error("generation task {task_id} succeeded without a video URL")]
    MissingOutput { task_id: String },

    #[error("generation task {task_id} timed out after {attempts} status checks")]
    PollTimeout { task_id: String, attempts: u32 },

    #[error("Runway API error (status {status}): {message}")]
    VendorApi {
        status: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] dotenvy::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn submission(message: impl Into<String>) -> Self {
        Error::Submission {
            message: message.into(),
            details: None,
        }
    }

    /// True for errors caused by the caller's input rather than the vendor.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
