//! Core error types for snapstreak-core.
//!
//! This module defines the error hierarchy using thiserror. Each domain
//! (camera device, image pipeline, persistence, configuration) has its own
//! enum, wrapped by [`CoreError`] at the crate boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for snapstreak-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Camera device errors
    #[error("Camera error: {0}")]
    Device(#[from] DeviceError),

    /// Image decode/encode errors
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// Persistence errors
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Camera device errors.
///
/// Stream acquisition failures are recoverable: the capture flow surfaces
/// them with a user-facing message and a retry affordance.
#[derive(Error, Debug)]
pub enum DeviceError {
    /// Stream acquisition was denied or the device is unavailable
    #[error("Failed to access camera: {0}")]
    AccessDenied(String),

    /// No stream is currently held
    #[error("No active camera stream")]
    NoActiveStream,

    /// The stream exists but has not signalled readiness yet
    #[error("Camera stream is not ready")]
    StreamNotReady,

    /// Grabbing a frame from the live stream failed
    #[error("Failed to capture frame: {0}")]
    FrameGrabFailed(String),
}

/// Image pipeline errors.
#[derive(Error, Debug)]
pub enum ImageError {
    /// The source image could not be decoded
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Encoding the processed image failed
    #[error("Failed to encode image: {0}")]
    Encode(String),

    /// The requested output format is not supported by the codec stack
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// A data URL payload was malformed
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),
}

/// Persistence errors.
///
/// A failed write is fatal for the action that triggered it: the caller
/// must not advance state it could not durably record.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing store
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Read failed
    #[error("Failed to read key '{key}': {message}")]
    ReadFailed { key: String, message: String },

    /// Write failed
    #[error("Failed to write key '{key}': {message}")]
    WriteFailed { key: String, message: String },

    /// Schema migration failed
    #[error("Store migration failed: {0}")]
    MigrationFailed(String),

    /// The data directory could not be created
    #[error("Failed to prepare data directory {path}: {message}")]
    DataDirFailed { path: PathBuf, message: String },

    /// A stored value could not be decoded as JSON
    #[error("Corrupt value for key '{key}': {message}")]
    CorruptValue { key: String, message: String },
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<image::ImageError> for ImageError {
    fn from(err: image::ImageError) -> Self {
        match &err {
            image::ImageError::Decoding(_) => ImageError::Decode(err.to_string()),
            image::ImageError::Encoding(_) => ImageError::Encode(err.to_string()),
            image::ImageError::Unsupported(_) => ImageError::UnsupportedFormat(err.to_string()),
            _ => ImageError::Encode(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
