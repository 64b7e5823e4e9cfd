//! The crop border: the fixed rectangle the cropped output must fill.
//!
//! The border is derived from the view size and the image aspect ratio and
//! is read-only to everything except the sizing routines in this module.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CropError;
use crate::geometry::{Point, Quad, Rect};
use crate::placement::ImageSize;

/// Smallest extent a border may have along either axis.
const MIN_EXTENT: f64 = 1.0;

/// Target rectangle in view-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropBorder {
    rect: Rect,
}

impl CropBorder {
    /// Create a border, validating its extent.
    ///
    /// # Errors
    ///
    /// [`CropError::InvalidBorderGeometry`] if the rectangle is empty,
    /// inverted, or not finite.
    pub fn try_new(rect: Rect) -> Result<Self, CropError> {
        let (width, height) = (rect.width(), rect.height());
        let finite = [rect.left, rect.top, rect.right, rect.bottom]
            .iter()
            .all(|v| v.is_finite());
        if !finite || !(width > 0.0) || !(height > 0.0) {
            return Err(CropError::InvalidBorderGeometry { width, height });
        }
        Ok(Self { rect })
    }

    /// Create a border, clamping a degenerate rectangle to a 1×1 extent
    /// around its center instead of failing.
    pub fn new(rect: Rect) -> Self {
        match Self::try_new(rect) {
            Ok(border) => border,
            Err(err) => {
                warn!(%err, "clamping degenerate crop border");
                let center = rect.center();
                let center = if center.is_finite() {
                    center
                } else {
                    Point::ORIGIN
                };
                let half_w = rect.width().max(MIN_EXTENT) / 2.0;
                let half_h = rect.height().max(MIN_EXTENT) / 2.0;
                let half_w = if half_w.is_finite() { half_w } else { 0.5 };
                let half_h = if half_h.is_finite() { half_h } else { 0.5 };
                Self {
                    rect: Rect::new(
                        center.x - half_w,
                        center.y - half_h,
                        center.x + half_w,
                        center.y + half_h,
                    ),
                }
            }
        }
    }

    /// Largest square inset by `inset` from every view edge, centered.
    ///
    /// Used while no image is assigned.
    pub fn default_for_view(view_width: f64, view_height: f64, inset: f64) -> Self {
        let side = (view_width - 2.0 * inset).min(view_height - 2.0 * inset);
        Self::centered(view_width, view_height, side, side)
    }

    /// Border matching the image aspect ratio inside the inset view.
    ///
    /// Landscape images take the full inset width and derive the height;
    /// portrait and square images take the full inset height and derive the
    /// width. If the derived side overflows the inset view, both sides shrink
    /// to fit. The result is centered in the view.
    pub fn recompute_for_aspect(
        view_width: f64,
        view_height: f64,
        image: ImageSize,
        inset: f64,
    ) -> Self {
        let avail_w = view_width - 2.0 * inset;
        let avail_h = view_height - 2.0 * inset;
        let aspect = image.width_f64() / image.height_f64();

        let (mut width, mut height) = if image.is_landscape() {
            (avail_w, avail_w / aspect)
        } else {
            (avail_h * aspect, avail_h)
        };

        if height > avail_h {
            height = avail_h;
            width = height * aspect;
        }
        if width > avail_w {
            width = avail_w;
            height = width / aspect;
        }

        // Too small a view: keep the aspect ratio at the minimum extent.
        if !(width.min(height) >= MIN_EXTENT) {
            if image.is_landscape() {
                height = MIN_EXTENT;
                width = height * aspect;
            } else {
                width = MIN_EXTENT;
                height = width / aspect;
            }
        }

        Self::centered(view_width, view_height, width, height)
    }

    fn centered(view_width: f64, view_height: f64, width: f64, height: f64) -> Self {
        let left = (view_width - width) / 2.0;
        let top = (view_height - height) / 2.0;
        Self::new(Rect::new(left, top, left + width, top + height))
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn center(&self) -> Point {
        self.rect.center()
    }

    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    pub fn height(&self) -> f64 {
        self.rect.height()
    }

    pub fn corners(&self) -> Quad {
        self.rect.corners()
    }
}
