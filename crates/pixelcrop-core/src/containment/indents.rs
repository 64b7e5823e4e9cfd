//! Gaps between the crop border and the image's bounding box.

use serde::{Deserialize, Serialize};

use crate::border::CropBorder;
use crate::placement::ImagePlacement;

/// Signed gap on each side of the border, measured as
/// `image edge - border edge` and only where that side is uncovered.
///
/// An uncovered left or top side yields a positive value, an uncovered right
/// or bottom side a negative one, and covered sides are zero. The corrective
/// translation is then `-(left + right), -(top + bottom)`: a single gap is
/// closed exactly. On an axis where the image is shorter than the border it
/// cannot cover both sides; each side then carries half its edge offset so
/// the correction centers the image on that axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Indents {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Indents {
    /// Translation that closes the gaps.
    pub fn correction(&self) -> (f64, f64) {
        (-(self.left + self.right), -(self.top + self.bottom))
    }

    pub fn is_zero(&self) -> bool {
        self.left == 0.0 && self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0
    }
}

/// Compute the indents of `placement` against `border`.
///
/// For a rotated image the covering region is its axis-aligned bounding box,
/// not the rotated quad, so corners of the border can still be exposed after
/// this correction alone.
pub fn compute_indents(placement: &ImagePlacement, border: &CropBorder) -> Indents {
    let image = placement.mapped_bounds();
    let border = border.rect();

    let gap = |image_edge: f64, border_edge: f64, uncovered: bool| {
        if uncovered {
            image_edge - border_edge
        } else {
            0.0
        }
    };
    let split = |image_edge: f64, border_edge: f64| (image_edge - border_edge) / 2.0;

    let (left, right) = if image.width() < border.width() {
        (split(image.left, border.left), split(image.right, border.right))
    } else {
        (
            gap(image.left, border.left, image.left > border.left),
            gap(image.right, border.right, image.right < border.right),
        )
    };
    let (top, bottom) = if image.height() < border.height() {
        (split(image.top, border.top), split(image.bottom, border.bottom))
    } else {
        (
            gap(image.top, border.top, image.top > border.top),
            gap(image.bottom, border.bottom, image.bottom < border.bottom),
        )
    };

    Indents {
        left,
        top,
        right,
        bottom,
    }
}
