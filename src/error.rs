//! Error types for nbpress operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while republishing a notebook or running a helper.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Not a file path: {}", .0.display())]
    InvalidInput(PathBuf),

    #[error("Document has no <body> element")]
    MissingBody,

    #[error("<img> element #{0} has no src attribute")]
    MissingSource(usize),

    #[error("Asset path escapes the assets folder: {0}")]
    UnsafeAssetPath(String),

    #[error("Invalid base64 payload in inline image {filename}: {source}")]
    InvalidPayload {
        filename: String,
        source: base64::DecodeError,
    },

    #[error("Invalid color {0:?}: expected #RRGGBB")]
    InvalidColor(String),

    #[error("Shape mismatch: {0}")]
    Shape(String),

    #[error("Integrator failed: {0}")]
    Integrator(String),

    #[cfg(feature = "fetch")]
    #[error("HTTP error: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[cfg(feature = "fetch")]
    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
