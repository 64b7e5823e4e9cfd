//! Rotation-aware scale limits.
//!
//! # Algorithm
//!
//! An image rotated by θ covers the border exactly when the border, rotated
//! by -θ into the image's frame, fits inside the image. The rotated border's
//! bounding box is
//!
//! ```text
//! W' = W * |cos θ| + H * |sin θ|
//! H' = W * |sin θ| + H * |cos θ|
//! ```
//!
//! so a uniform scale `s` covers the border when `s * w >= W'` and
//! `s * h >= H'`, where `w × h` is the image's intrinsic size.

use crate::border::CropBorder;
use crate::placement::ImageSize;

/// Compute the bounding box of a `width × height` rectangle rotated by
/// `angle_degrees`.
///
/// Exact multiples of 90° take a fast path so that quarter turns swap the
/// dimensions without trigonometric noise.
///
/// # Example
///
/// ```
/// use pixelcrop_core::containment::rotated_bounds;
///
/// let (w, h) = rotated_bounds(300.0, 150.0, 90.0);
/// assert_eq!((w, h), (150.0, 300.0));
/// ```
pub fn rotated_bounds(width: f64, height: f64, angle_degrees: f64) -> (f64, f64) {
    // Normalize to [0, 180): the bounds repeat every half turn.
    let angle = angle_degrees.rem_euclid(180.0);

    if angle.abs() < 1e-9 || (180.0 - angle).abs() < 1e-9 {
        return (width, height);
    }
    if (angle - 90.0).abs() < 1e-9 {
        return (height, width);
    }

    let (sin, cos) = angle.to_radians().sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());

    (width * cos + height * sin, width * sin + height * cos)
}

/// Factor by which an image that exactly fills the border must grow to keep
/// covering it when rotated by `angle_degrees` about the border center.
pub fn rotation_scale(border: &CropBorder, angle_degrees: f64) -> f64 {
    let (w, h) = (border.width(), border.height());
    let (rotated_w, rotated_h) = rotated_bounds(w, h, angle_degrees);
    (rotated_w / w).max(rotated_h / h)
}

/// Smallest uniform scale at which an image of `image` size, rotated by
/// `angle_degrees`, can cover the border.
///
/// This is the zoom floor while rotated. At 0° on a border that matches the
/// image aspect ratio it equals the border-fit scale.
pub fn min_scale_for_rotation(border: &CropBorder, image: ImageSize, angle_degrees: f64) -> f64 {
    let (rotated_w, rotated_h) = rotated_bounds(border.width(), border.height(), angle_degrees);
    (rotated_w / image.width_f64()).max(rotated_h / image.height_f64())
}
