//! Error types for the anglemap library
//!
//! Projection itself never fails: missing camera data degrades to a less precise
//! mapper. These errors cover the fallible edges around it, such as loading camera
//! profiles and parsing command-line input.

use anglemap_camera::CameraModelError;
use std::{io::Error, num::ParseFloatError};
use thiserror::Error;

/// Main result type used throughout the anglemap library
pub type AngleMapResult<T> = Result<T, AngleMapError>;

/// Main error type for the anglemap library
#[derive(Debug, Clone, Error)]
pub enum AngleMapError {
    /// IO related errors (file loading)
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed camera profile or configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Camera calibration data failed validation
    #[error("Camera error: {0}")]
    Camera(String),

    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<Error> for AngleMapError {
    fn from(err: Error) -> Self {
        AngleMapError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AngleMapError {
    fn from(err: serde_json::Error) -> Self {
        AngleMapError::Config(err.to_string())
    }
}

impl From<CameraModelError> for AngleMapError {
    fn from(err: CameraModelError) -> Self {
        AngleMapError::Camera(err.to_string())
    }
}

impl From<ParseFloatError> for AngleMapError {
    fn from(err: ParseFloatError) -> Self {
        AngleMapError::InvalidInput(format!("Failed to parse float: {err}"))
    }
}
