//! Custom error types for cartoonize.

use std::path::PathBuf;
use thiserror::Error;

use crate::engine::EngineState;

/// Main error type for the cartoonize library.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to load an image file.
    #[error("failed to load image from {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to save an image file.
    #[error("failed to save image to {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Input bitmap is malformed and cannot be normalized.
    #[error("invalid input bitmap: {reason}")]
    InvalidInput { reason: String },

    /// The engine is not in the `Ready` state.
    #[error("engine not ready: lifecycle state is {state}")]
    EngineNotReady { state: EngineState },

    /// Failed to download the generator file.
    #[error("failed to download model {name}: {source}")]
    ModelDownload {
        name: String,
        #[source]
        source: reqwest::Error,
    },

    /// Failed to load the ONNX generator.
    #[error("failed to load ONNX model {name}: {source}")]
    ModelLoad {
        name: String,
        #[source]
        source: ort::Error,
    },

    /// The generator file could not be found.
    #[error("model file not found: {path}")]
    ModelNotFound { path: PathBuf },

    /// Model inference failed.
    #[error("model inference failed: {source}")]
    Inference {
        #[source]
        source: ort::Error,
    },

    /// Failed to create cache directory.
    #[error("failed to create cache directory {path}: {source}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Shape mismatch in tensor operations.
    #[error("tensor shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
}

/// Result type alias for cartoonize operations.
pub type Result<T> = std::result::Result<T, Error>;
