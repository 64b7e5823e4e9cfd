//! Error types for the crop engine.
//!
//! Gesture handling never surfaces these to the caller: singular transforms
//! are absorbed by the coverage test and degenerate borders are clamped.
//! They are returned only from explicit constructors and queries.

use thiserror::Error;

/// Errors produced by crop geometry and configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CropError {
    /// The transform has a zero (or non-finite) determinant and cannot be inverted.
    #[error("Transform is not invertible (determinant {determinant})")]
    SingularTransform {
        /// Determinant of the linear part.
        determinant: f64,
    },

    /// A border rectangle with zero or negative extent.
    #[error("Invalid border geometry: {width}x{height}")]
    InvalidBorderGeometry {
        /// Requested width (right - left).
        width: f64,
        /// Requested height (bottom - top).
        height: f64,
    },

    /// A query that needs an image was made before one was assigned.
    #[error("No image assigned to the crop session")]
    NoImageAssigned,

    /// An image with a zero dimension was assigned.
    #[error("Image has an empty dimension: {width}x{height}")]
    EmptyImage {
        /// Intrinsic width in pixels.
        width: u32,
        /// Intrinsic height in pixels.
        height: u32,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
