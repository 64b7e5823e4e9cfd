//! Tunable parameters for a crop session.

use serde::{Deserialize, Serialize};

use crate::error::CropError;

/// Configuration for a [`CropSession`](crate::CropSession).
///
/// Deserializes from a partial object; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropConfig {
    /// Margin in view pixels between the view edges and the crop border.
    pub border_inset: f64,
    /// Angle increment of the rotation sweep, in degrees.
    pub rotation_step_degrees: f64,
    /// Maximum zoom as a multiple of the current minimum scale.
    pub max_zoom: f64,
    /// Follow the bounding-box correction with an exact pass in image space
    /// when a rotated image still leaves a border corner exposed.
    pub exact_rotated_coverage: bool,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            border_inset: 50.0,
            rotation_step_degrees: 0.2,
            max_zoom: 2.0,
            exact_rotated_coverage: true,
        }
    }
}

impl CropConfig {
    /// Check that every value is finite and in range.
    pub fn validate(&self) -> Result<(), CropError> {
        if !self.border_inset.is_finite() || self.border_inset < 0.0 {
            return Err(CropError::InvalidConfig(format!(
                "border inset must be a non-negative number, got {}",
                self.border_inset
            )));
        }
        if !self.rotation_step_degrees.is_finite() || self.rotation_step_degrees <= 0.0 {
            return Err(CropError::InvalidConfig(format!(
                "rotation step must be positive, got {}",
                self.rotation_step_degrees
            )));
        }
        if !self.max_zoom.is_finite() || self.max_zoom < 1.0 {
            return Err(CropError::InvalidConfig(format!(
                "max zoom must be at least 1, got {}",
                self.max_zoom
            )));
        }
        Ok(())
    }
}
