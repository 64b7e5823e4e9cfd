//! An image's intrinsic size paired with its current transform.

use serde::{Deserialize, Serialize};

use crate::border::CropBorder;
use crate::error::CropError;
use crate::geometry::{AffineTransform, Point, Quad, Rect};

/// Intrinsic pixel dimensions of the image being cropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    /// # Errors
    ///
    /// [`CropError::EmptyImage`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, CropError> {
        if width == 0 || height == 0 {
            return Err(CropError::EmptyImage { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }

    pub(crate) fn width_f64(&self) -> f64 {
        f64::from(self.width)
    }

    pub(crate) fn height_f64(&self) -> f64 {
        f64::from(self.height)
    }
}

/// Uniform scale that fits `size` to `border` along the controlling
/// dimension: width for landscape images, height otherwise.
pub fn fit_scale(size: ImageSize, border: &CropBorder) -> f64 {
    if size.is_landscape() {
        border.width() / size.width_f64()
    } else {
        border.height() / size.height_f64()
    }
}

/// An image placed in view space.
///
/// All state besides the intrinsic size lives in the owned transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagePlacement {
    size: ImageSize,
    transform: AffineTransform,
}

impl ImagePlacement {
    pub fn new(size: ImageSize, transform: AffineTransform) -> Self {
        Self { size, transform }
    }

    /// Placement scaled by [`fit_scale`] and centered on the border.
    pub fn fit_to_border(size: ImageSize, border: &CropBorder) -> Self {
        let scale = fit_scale(size, border);
        let center = border.center();
        let transform = AffineTransform::translate(
            center.x - size.width_f64() / 2.0,
            center.y - size.height_f64() / 2.0,
        )
        .compose_scale(scale, scale, center);
        Self { size, transform }
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn transform(&self) -> AffineTransform {
        self.transform
    }

    /// Replace the transform wholesale.
    pub fn reset_to(&mut self, transform: AffineTransform) {
        self.transform = transform;
    }

    pub fn scale_factor(&self) -> f64 {
        self.transform.scale_factor()
    }

    /// The image rectangle in its own pixel space.
    pub fn local_rect(&self) -> Rect {
        Rect::from_size(self.size.width_f64(), self.size.height_f64())
    }

    pub fn mapped_corners(&self) -> Quad {
        self.transform.map_rect(&self.local_rect())
    }

    pub fn mapped_center(&self) -> Point {
        self.transform.map_point(self.local_rect().center())
    }

    /// Axis-aligned envelope of the mapped corners.
    pub fn mapped_bounds(&self) -> Rect {
        Rect::bounding(&self.mapped_corners())
    }
}
