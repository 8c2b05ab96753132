use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::LandmarkRole;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required landmark {} was not detected", .0.name())]
    MissingLandmark(LandmarkRole),

    #[error("No landmark is visible above {threshold} to estimate body height")]
    InsufficientVisibility { threshold: f64 },

    #[error("Invalid measurement: {0}")]
    InvalidMeasurement(String),

    #[error("No body landmarks were detected in the image")]
    NoPoseDetected,

    #[error("Cannot use {}: {reason}", path.display())]
    UnreadableFile { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error describes bad caller input rather than an internal fault.
    ///
    /// Client errors carry a message that is safe to show to the caller as-is.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Error::Io(_) | Error::Json(_))
    }

    /// A caller-supplied file that is missing, unreadable or malformed.
    pub fn unreadable(path: &Path, reason: impl fmt::Display) -> Self {
        Error::UnreadableFile {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
