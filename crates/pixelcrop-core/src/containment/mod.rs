//! Border containment: keeping the image fully behind the crop border.
//!
//! # Coverage
//!
//! The image covers the border when all four border corners, mapped back
//! into image-local space through the inverse transform, land inside
//! `[0, width] × [0, height]`. A transform that cannot be inverted is
//! reported as not covering, never as an error.
//!
//! # Correction
//!
//! An uncovered placement is fixed by a translation built from the
//! [`Indents`] of its bounding box. The translation is added to the delta of
//! the gesture that caused it and applied to the gesture's base transform in
//! one update, so the caller only ever observes the corrected result.
//!
//! Rotated images can still leave a border corner exposed after the
//! bounding-box pass. With exact rotated coverage enabled, a second
//! translation computed in image space closes that gap whenever the image's
//! scale is at or above [`min_scale_for_rotation`].

mod indents;
mod rotation;

pub use indents::{compute_indents, Indents};
pub use rotation::{min_scale_for_rotation, rotated_bounds, rotation_scale};

use tracing::{trace, warn};

use crate::border::CropBorder;
use crate::geometry::{AffineTransform, Point, Rect};
use crate::placement::ImagePlacement;

/// Slack, in image pixels, allowed when testing border corners against the image.
pub const COVERAGE_TOLERANCE: f64 = 1e-6;

/// Whether the transformed image covers every point of the border.
pub fn is_fully_covered(placement: &ImagePlacement, border: &CropBorder) -> bool {
    let Ok(inverse) = placement.transform().invert() else {
        return false;
    };
    let image = placement.local_rect();

    border.corners().iter().all(|&corner| {
        let p = inverse.map_point(corner);
        p.is_finite()
            && p.x >= image.left - COVERAGE_TOLERANCE
            && p.x <= image.right + COVERAGE_TOLERANCE
            && p.y >= image.top - COVERAGE_TOLERANCE
            && p.y <= image.bottom + COVERAGE_TOLERANCE
    })
}

/// Outcome of a containment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The placement already covered the border.
    Covered,
    /// A corrective translation was applied.
    Corrected,
    /// The transform was unusable and the placement was refitted to the border.
    Reset,
}

/// Applies gesture deltas while keeping the border covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainmentSolver {
    exact_rotated: bool,
}

impl Default for ContainmentSolver {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ContainmentSolver {
    /// `exact_rotated` enables the image-space pass after the bounding-box
    /// correction.
    pub fn new(exact_rotated: bool) -> Self {
        Self { exact_rotated }
    }

    /// Correct the placement in place.
    pub fn correct(&self, placement: &mut ImagePlacement, border: &CropBorder) -> Settlement {
        let base = placement.transform();
        self.translate_and_correct(placement, border, base, 0.0, 0.0)
    }

    /// Set the placement to `base` translated by `(dx, dy)`, folding any
    /// corrective translation into the same update.
    ///
    /// # Arguments
    ///
    /// * `base` - Transform the gesture started from
    /// * `dx`, `dy` - Total gesture translation since `base`
    pub fn translate_and_correct(
        &self,
        placement: &mut ImagePlacement,
        border: &CropBorder,
        base: AffineTransform,
        dx: f64,
        dy: f64,
    ) -> Settlement {
        let candidate = base.compose_translate(dx, dy);
        placement.reset_to(candidate);

        if is_fully_covered(placement, border) {
            return Settlement::Covered;
        }

        if !candidate.is_finite() || candidate.invert().is_err() {
            warn!(
                determinant = candidate.determinant(),
                "singular image transform; refitting to crop border"
            );
            *placement = ImagePlacement::fit_to_border(placement.size(), border);
            return Settlement::Reset;
        }

        let indents = compute_indents(placement, border);
        let (cx, cy) = indents.correction();
        placement.reset_to(base.compose_translate(dx + cx, dy + cy));
        trace!(cx, cy, "bounding-box correction");

        if self.exact_rotated && !is_fully_covered(placement, border) {
            cover_in_image_space(placement, border);
        }

        Settlement::Corrected
    }
}

/// Translate the image in its own frame so that the border's image-space
/// bounding box lies inside the image, centering it on any axis where it
/// cannot fit.
fn cover_in_image_space(placement: &mut ImagePlacement, border: &CropBorder) {
    let transform = placement.transform();
    let Ok(inverse) = transform.invert() else {
        return;
    };

    let local = Rect::bounding(&inverse.map_rect(&border.rect()));
    let image = placement.local_rect();
    let shift_x = axis_shift(local.left, local.right, image.left, image.right);
    let shift_y = axis_shift(local.top, local.bottom, image.top, image.bottom);

    // Moving the border by `shift` inside the image means moving the image
    // by `-shift` in its own frame.
    let delta = transform.map_vector(Point::new(-shift_x, -shift_y));
    placement.reset_to(transform.compose_translate(delta.x, delta.y));
    trace!(shift_x, shift_y, "image-space correction");
}

/// Shift that moves the span `[lo, hi]` inside `[min, max]`.
fn axis_shift(lo: f64, hi: f64, min: f64, max: f64) -> f64 {
    if hi - lo > max - min {
        (min + max - lo - hi) / 2.0
    } else if lo < min {
        min - lo
    } else if hi > max {
        max - hi
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::{fit_scale, ImageSize};
    use proptest::prelude::*;

    fn square_border() -> CropBorder {
        CropBorder::new(Rect::new(50.0, 50.0, 350.0, 350.0))
    }

    fn placed(width: u32, height: u32, transform: AffineTransform) -> ImagePlacement {
        ImagePlacement::new(ImageSize::new(width, height).unwrap(), transform)
    }

    #[test]
    fn test_exact_cover_is_covered() {
        let p = placed(300, 300, AffineTransform::translate(50.0, 50.0));
        assert!(is_fully_covered(&p, &square_border()));
    }

    #[test]
    fn test_shifted_image_is_not_covered() {
        let p = placed(300, 300, AffineTransform::translate(51.0, 50.0));
        assert!(!is_fully_covered(&p, &square_border()));
    }

    #[test]
    fn test_singular_transform_fails_closed() {
        let t = AffineTransform::IDENTITY.compose_scale(0.0, 0.0, Point::ORIGIN);
        let p = placed(300, 300, t);
        assert!(!is_fully_covered(&p, &square_border()));
    }

    #[test]
    fn test_rotated_diamond_exposes_corners() {
        let center = Point::new(200.0, 200.0);
        let t = AffineTransform::translate(50.0, 50.0).compose_rotate(45.0, center);
        let p = placed(300, 300, t);
        assert!(!is_fully_covered(&p, &square_border()));
    }

    #[test]
    fn test_correct_snaps_back_dragged_image() {
        let solver = ContainmentSolver::default();
        let border = square_border();
        let base = AffineTransform::translate(0.0, 0.0);
        let mut p = placed(400, 400, base);

        let outcome = solver.translate_and_correct(&mut p, &border, base, 120.0, -90.0);
        assert_eq!(outcome, Settlement::Corrected);
        assert!(is_fully_covered(&p, &border));

        let bounds = p.mapped_bounds();
        assert!((bounds.left - 50.0).abs() < 1e-9);
        assert!((bounds.bottom - 350.0).abs() < 1e-9);
    }

    #[test]
    fn test_correct_leaves_covered_image_alone() {
        let solver = ContainmentSolver::default();
        let border = square_border();
        let t = AffineTransform::translate(10.0, 20.0);
        let mut p = placed(400, 400, t);

        assert_eq!(solver.correct(&mut p, &border), Settlement::Covered);
        assert_eq!(p.transform(), t);
    }

    #[test]
    fn test_fit_landscape_in_square_border_centers_vertically() {
        // 400x200 image fitted to a 300x300 border: 0.75 scale, 150px tall.
        let border = CropBorder::default_for_view(400.0, 400.0, 50.0);
        let size = ImageSize::new(400, 200).unwrap();
        let mut p = ImagePlacement::fit_to_border(size, &border);
        assert!((p.scale_factor() - 0.75).abs() < 1e-12);
        assert!((p.mapped_bounds().height() - 150.0).abs() < 1e-9);

        // Push it to the top, then let the solver settle it.
        let pushed = p.transform().compose_translate(0.0, -60.0);
        p.reset_to(pushed);
        assert!(!is_fully_covered(&p, &border));

        let indents = compute_indents(&p, &border);
        assert!(indents.top != 0.0 || indents.bottom != 0.0);

        ContainmentSolver::new(false).correct(&mut p, &border);
        let after = compute_indents(&p, &border);
        assert!((after.top + after.bottom).abs() < 1e-9);
        assert!((p.mapped_center().y - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_singular_transform_resets_to_fit() {
        let solver = ContainmentSolver::default();
        let border = square_border();
        let size = ImageSize::new(300, 300).unwrap();
        let collapsed = AffineTransform::IDENTITY.compose_scale(0.0, 0.0, Point::ORIGIN);
        let mut p = ImagePlacement::new(size, collapsed);

        assert_eq!(solver.correct(&mut p, &border), Settlement::Reset);
        assert_eq!(p, ImagePlacement::fit_to_border(size, &border));
        assert!(is_fully_covered(&p, &border));
    }

    #[test]
    fn test_bounding_box_only_leaves_rotated_corner_exposed() {
        let border = square_border();
        let center = border.center();
        let size = ImageSize::new(300, 300).unwrap();
        let scale = min_scale_for_rotation(&border, size, 30.0) * 1.05;
        let t = AffineTransform::translate(50.0, 50.0)
            .compose_scale(scale, scale, center)
            .compose_rotate(30.0, center)
            .compose_translate(60.0, 0.0);

        let mut loose = ImagePlacement::new(size, t);
        ContainmentSolver::new(false).correct(&mut loose, &border);
        assert!(!is_fully_covered(&loose, &border));

        let mut exact = ImagePlacement::new(size, t);
        ContainmentSolver::new(true).correct(&mut exact, &border);
        assert!(is_fully_covered(&exact, &border));
    }

    #[test]
    fn test_axis_shift() {
        assert_eq!(axis_shift(-5.0, 10.0, 0.0, 100.0), 5.0);
        assert_eq!(axis_shift(95.0, 110.0, 0.0, 100.0), -10.0);
        assert_eq!(axis_shift(10.0, 20.0, 0.0, 100.0), 0.0);
        assert_eq!(axis_shift(-10.0, 130.0, 0.0, 100.0), -10.0);
    }

    proptest! {
        #[test]
        fn prop_correction_covers_and_is_idempotent(
            width in 50u32..2000,
            height in 50u32..2000,
            zoom in 1.0f64..3.0,
            tx in -2000.0f64..2000.0,
            ty in -2000.0f64..2000.0,
        ) {
            let border = square_border();
            let size = ImageSize::new(width, height).unwrap();
            let scale = min_scale_for_rotation(&border, size, 0.0) * zoom;
            let t = AffineTransform::IDENTITY
                .compose_scale(scale, scale, Point::ORIGIN)
                .compose_translate(tx, ty);
            let mut p = ImagePlacement::new(size, t);
            let solver = ContainmentSolver::new(false);

            solver.correct(&mut p, &border);
            prop_assert!(is_fully_covered(&p, &border));

            let settled = p.transform();
            prop_assert_eq!(solver.correct(&mut p, &border), Settlement::Covered);
            prop_assert_eq!(p.transform(), settled);
        }

        #[test]
        fn prop_exact_correction_covers_rotated(
            width in 50u32..2000,
            height in 50u32..2000,
            angle in -180.0f64..180.0,
            zoom in 1.0001f64..3.0,
            tx in -1000.0f64..1000.0,
            ty in -1000.0f64..1000.0,
        ) {
            let border = square_border();
            let center = border.center();
            let size = ImageSize::new(width, height).unwrap();
            let grow = min_scale_for_rotation(&border, size, angle) * zoom / fit_scale(size, &border);
            let t = ImagePlacement::fit_to_border(size, &border)
                .transform()
                .compose_scale(grow, grow, center)
                .compose_rotate(angle, center)
                .compose_translate(tx, ty);
            let mut p = ImagePlacement::new(size, t);

            let solver = ContainmentSolver::new(true);
            solver.correct(&mut p, &border);
            prop_assert!(is_fully_covered(&p, &border));

            let settled = p.transform();
            prop_assert_eq!(solver.correct(&mut p, &border), Settlement::Covered);
            prop_assert_eq!(p.transform(), settled);
        }
    }
}
