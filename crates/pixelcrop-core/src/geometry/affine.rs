//! 2×3 affine transform value type.
//!
//! The transform maps a point `(x, y)` to
//!
//! ```text
//! x' = a * x + c * y + e
//! y' = b * x + d * y + f
//! ```
//!
//! # Composition
//!
//! Every `compose_*` operation post-multiplies: the new operation is applied
//! after the transform accumulated so far, in the space the transform maps
//! into. Pivots are therefore given in output (view) coordinates, so scaling
//! about the border center keeps that center fixed on screen.
//!
//! Transforms are immutable `Copy` values. Composing returns a new value and
//! never edits a shared matrix in place.

use serde::{Deserialize, Serialize};

use super::{Point, Quad, Rect};
use crate::error::CropError;

/// Determinants at or below this magnitude are treated as singular.
const SINGULAR_DETERMINANT: f64 = 1e-12;

/// A 2D affine transform with six coefficients `[a, b, c, d, e, f]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    coeffs: [f64; 6],
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        coeffs: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    /// Build a transform from raw coefficients `[a, b, c, d, e, f]`.
    pub const fn new(coeffs: [f64; 6]) -> Self {
        Self { coeffs }
    }

    pub fn translate(dx: f64, dy: f64) -> Self {
        Self::new([1.0, 0.0, 0.0, 1.0, dx, dy])
    }

    pub fn coeffs(&self) -> [f64; 6] {
        self.coeffs
    }

    /// Apply `op` after `self`.
    fn then(self, op: AffineTransform) -> Self {
        let [a, b, c, d, e, f] = self.coeffs;
        let [oa, ob, oc, od, oe, of] = op.coeffs;
        Self::new([
            oa * a + oc * b,
            ob * a + od * b,
            oa * c + oc * d,
            ob * c + od * d,
            oa * e + oc * f + oe,
            ob * e + od * f + of,
        ])
    }

    /// Translate the already-transformed output by `(dx, dy)`.
    pub fn compose_translate(self, dx: f64, dy: f64) -> Self {
        let [a, b, c, d, e, f] = self.coeffs;
        Self::new([a, b, c, d, e + dx, f + dy])
    }

    /// Scale the output by `(sx, sy)` about `pivot`, which stays fixed.
    pub fn compose_scale(self, sx: f64, sy: f64, pivot: Point) -> Self {
        let op = Self::new([
            sx,
            0.0,
            0.0,
            sy,
            pivot.x - sx * pivot.x,
            pivot.y - sy * pivot.y,
        ]);
        self.then(op)
    }

    /// Rotate the output by `degrees` (clockwise on screen) about `pivot`.
    pub fn compose_rotate(self, degrees: f64, pivot: Point) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let op = Self::new([
            cos,
            sin,
            -sin,
            cos,
            pivot.x - cos * pivot.x + sin * pivot.y,
            pivot.y - sin * pivot.x - cos * pivot.y,
        ]);
        self.then(op)
    }

    pub fn map_point(&self, p: Point) -> Point {
        let [a, b, c, d, e, f] = self.coeffs;
        Point::new(a * p.x + c * p.y + e, b * p.x + d * p.y + f)
    }

    /// Map a displacement; translation does not apply.
    pub fn map_vector(&self, v: Point) -> Point {
        let [a, b, c, d, _, _] = self.coeffs;
        Point::new(a * v.x + c * v.y, b * v.x + d * v.y)
    }

    /// Map the four corners of `rect`.
    pub fn map_rect(&self, rect: &Rect) -> Quad {
        rect.corners().map(|p| self.map_point(p))
    }

    pub fn determinant(&self) -> f64 {
        let [a, b, c, d, _, _] = self.coeffs;
        a * d - b * c
    }

    /// Inverse transform.
    ///
    /// # Errors
    ///
    /// [`CropError::SingularTransform`] when the linear part has a
    /// (near-)zero or non-finite determinant.
    pub fn invert(&self) -> Result<Self, CropError> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() <= SINGULAR_DETERMINANT {
            return Err(CropError::SingularTransform { determinant: det });
        }

        let [a, b, c, d, e, f] = self.coeffs;
        let inv_det = 1.0 / det;
        let ia = d * inv_det;
        let ib = -b * inv_det;
        let ic = -c * inv_det;
        let id = a * inv_det;
        Ok(Self::new([
            ia,
            ib,
            ic,
            id,
            -(ia * e + ic * f),
            -(ib * e + id * f),
        ]))
    }

    /// Uniform scale, read as the length of the mapped unit x vector.
    pub fn scale_factor(&self) -> f64 {
        let [a, b, ..] = self.coeffs;
        a.hypot(b)
    }

    /// Rotation of the mapped x axis, in degrees within (-180, 180].
    pub fn rotation_degrees(&self) -> f64 {
        let [a, b, ..] = self.coeffs;
        b.atan2(a).to_degrees()
    }

    pub fn is_finite(&self) -> bool {
        self.coeffs.iter().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_point_eq(actual: Point, expected: Point) {
        assert!(
            (actual.x - expected.x).abs() < EPS && (actual.y - expected.y).abs() < EPS,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_identity_maps_point_unchanged() {
        let p = Point::new(12.5, -3.0);
        assert_eq!(AffineTransform::IDENTITY.map_point(p), p);
    }

    #[test]
    fn test_translate_then_scale_order() {
        // Translation happens first, then scaling about the origin doubles it.
        let t = AffineTransform::IDENTITY
            .compose_translate(10.0, 0.0)
            .compose_scale(2.0, 2.0, Point::ORIGIN);
        assert_point_eq(t.map_point(Point::new(1.0, 1.0)), Point::new(22.0, 2.0));
    }

    #[test]
    fn test_scale_keeps_pivot_fixed() {
        let pivot = Point::new(200.0, 150.0);
        let t = AffineTransform::translate(5.0, 7.0).compose_scale(3.0, 0.5, pivot);
        let before = AffineTransform::translate(5.0, 7.0)
            .invert()
            .unwrap()
            .map_point(pivot);
        assert_point_eq(t.map_point(before), pivot);
    }

    #[test]
    fn test_rotate_quarter_turn_about_pivot() {
        let pivot = Point::new(100.0, 100.0);
        let t = AffineTransform::IDENTITY.compose_rotate(90.0, pivot);
        // A point to the right of the pivot ends up below it (y grows downward).
        assert_point_eq(t.map_point(Point::new(110.0, 100.0)), Point::new(100.0, 110.0));
        assert_point_eq(t.map_point(pivot), pivot);
        assert!((t.rotation_degrees() - 90.0).abs() < EPS);
    }

    #[test]
    fn test_map_rect_under_rotation_is_not_axis_aligned() {
        let t = AffineTransform::IDENTITY.compose_rotate(45.0, Point::ORIGIN);
        let quad = t.map_rect(&Rect::from_size(2.0, 2.0));
        assert_point_eq(quad[0], Point::ORIGIN);
        assert_point_eq(quad[2], Point::new(0.0, 8.0_f64.sqrt()));
    }

    #[test]
    fn test_invert_round_trip() {
        let t = AffineTransform::IDENTITY
            .compose_scale(0.75, 0.75, Point::new(200.0, 200.0))
            .compose_rotate(33.0, Point::new(150.0, 120.0))
            .compose_translate(-40.0, 12.0);
        let inv = t.invert().unwrap();
        let p = Point::new(17.0, 250.0);
        assert_point_eq(inv.map_point(t.map_point(p)), p);
        assert_point_eq(t.map_point(inv.map_point(p)), p);
    }

    #[test]
    fn test_invert_singular_fails() {
        let t = AffineTransform::IDENTITY.compose_scale(0.0, 1.0, Point::ORIGIN);
        assert!(matches!(
            t.invert(),
            Err(CropError::SingularTransform { .. })
        ));

        let t = AffineTransform::new([f64::NAN, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert!(t.invert().is_err());
    }

    #[test]
    fn test_scale_factor_ignores_rotation() {
        let t = AffineTransform::IDENTITY
            .compose_scale(1.5, 1.5, Point::ORIGIN)
            .compose_rotate(-70.0, Point::new(3.0, 4.0));
        assert!((t.scale_factor() - 1.5).abs() < EPS);
    }

    #[test]
    fn test_map_vector_ignores_translation() {
        let t = AffineTransform::translate(100.0, 100.0).compose_scale(2.0, 2.0, Point::ORIGIN);
        assert_point_eq(t.map_vector(Point::new(1.0, 0.0)), Point::new(2.0, 0.0));
    }
}
