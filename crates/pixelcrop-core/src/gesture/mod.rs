//! Gesture interpretation: pointer events and rotation sweeps to transforms.
//!
//! # State Machine
//!
//! ```text
//! None ──first pointer down──▶ Drag ──second pointer down──▶ Zoom
//!   ▲                           │                              │
//!   └──────last pointer up──────┘◀───pointer up (one left)─────┘
//! ```
//!
//! A gesture snapshots the placement's transform when it starts. Every move
//! recomputes the candidate from that snapshot and the total delta since the
//! start, never from the previous frame, so long gestures do not drift.
//! Leaving `Zoom` with one pointer still down does not resume dragging.
//!
//! # Rotation
//!
//! Rotation is driven by the host (a dial or buttons), not by touch. A sweep
//! walks from the current angle to the target in small steps; every step
//! rotates about the border center, grows the image enough to keep the
//! border covered at that angle, and corrects its position. Each step is a
//! complete state that may be rendered as an animation frame.

mod pointers;
mod sweep;

pub use pointers::{PointerId, MAX_POINTERS};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::border::CropBorder;
use crate::config::CropConfig;
use crate::containment::{
    is_fully_covered, min_scale_for_rotation, rotation_scale, ContainmentSolver, Settlement,
};
use crate::geometry::{AffineTransform, Point};
use crate::placement::ImagePlacement;
use pointers::PointerTracker;
use sweep::RotationSweep;

/// Pinch distances below this many pixels cannot anchor a zoom ratio.
const MIN_PINCH_DISTANCE: f64 = 1e-3;

/// Current interaction mode, as reported to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GestureMode {
    #[default]
    None,
    Drag,
    Zoom,
}

/// Phase of a pointer event.
///
/// Primary and secondary pointers share the same phases; which one an event
/// belongs to is inferred from how many pointers are already down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// A pointer event delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub id: PointerId,
    pub position: Point,
    pub phase: PointerPhase,
}

impl PointerEvent {
    pub fn new(id: PointerId, x: f64, y: f64, phase: PointerPhase) -> Self {
        Self {
            id,
            position: Point::new(x, y),
            phase,
        }
    }
}

/// Snapshot taken when a gesture starts.
#[derive(Debug, Clone, Copy)]
enum GestureState {
    Drag {
        pointer: PointerId,
        down: Point,
        base: AffineTransform,
    },
    Zoom {
        midpoint: Point,
        start_distance: f64,
        base: AffineTransform,
        base_scale: f64,
    },
}

impl GestureState {
    fn mode(&self) -> GestureMode {
        match self {
            GestureState::Drag { .. } => GestureMode::Drag,
            GestureState::Zoom { .. } => GestureMode::Zoom,
        }
    }
}

/// Maps pointer input and rotation requests onto an [`ImagePlacement`].
#[derive(Debug, Clone)]
pub struct GestureController {
    solver: ContainmentSolver,
    rotation_step: f64,
    max_zoom: f64,
    pointers: PointerTracker,
    gesture: Option<GestureState>,
    angle: f64,
    min_scale: f64,
    rotate_state: bool,
    sweeping: bool,
}

impl GestureController {
    pub fn new(config: &CropConfig) -> Self {
        Self {
            solver: ContainmentSolver::new(config.exact_rotated_coverage),
            rotation_step: config.rotation_step_degrees,
            max_zoom: config.max_zoom,
            pointers: PointerTracker::default(),
            gesture: None,
            angle: 0.0,
            min_scale: 0.0,
            rotate_state: false,
            sweeping: false,
        }
    }

    /// Forget any gesture and rotation after the placement was refitted to
    /// `border`.
    pub fn reset(&mut self, placement: &ImagePlacement, border: &CropBorder) {
        self.pointers.clear();
        self.gesture = None;
        self.angle = 0.0;
        self.min_scale = min_scale_for_rotation(border, placement.size(), 0.0);
    }

    pub fn mode(&self) -> GestureMode {
        self.gesture
            .as_ref()
            .map_or(GestureMode::None, GestureState::mode)
    }

    /// True while a sweep runs or while the host has flagged rotation mode.
    pub fn is_rotating(&self) -> bool {
        self.rotate_state || self.sweeping
    }

    /// Flag that the host's rotation control is active.
    pub fn set_rotating(&mut self, rotating: bool) {
        self.rotate_state = rotating;
    }

    /// Accumulated rotation in degrees.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Zoom floor for the current angle.
    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    /// Zoom ceiling for the current angle.
    pub fn max_scale(&self) -> f64 {
        self.min_scale * self.max_zoom
    }

    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        placement: &mut ImagePlacement,
        border: &CropBorder,
    ) {
        if !event.position.is_finite() {
            trace!(id = event.id, "ignoring pointer event with non-finite position");
            return;
        }
        match event.phase {
            PointerPhase::Down => self.pointer_down(event.id, event.position, placement),
            PointerPhase::Move => self.pointer_move(event.id, event.position, placement, border),
            PointerPhase::Up => self.pointer_up(event.id),
        }
    }

    fn pointer_down(&mut self, id: PointerId, position: Point, placement: &ImagePlacement) {
        if !self.pointers.press(id, position) {
            trace!(id, "ignoring pointer beyond the first two");
            return;
        }
        self.begin_gesture(placement);
    }

    /// Start (or restart) a gesture from the tracked pointers and the
    /// current transform.
    fn begin_gesture(&mut self, placement: &ImagePlacement) {
        let base = placement.transform();
        self.gesture = match (self.pointers.count(), self.pointers.primary()) {
            (1, Some((pointer, down))) => Some(GestureState::Drag {
                pointer,
                down,
                base,
            }),
            (2, _) => self
                .pointers
                .pinch()
                .map(|(midpoint, start_distance)| GestureState::Zoom {
                    midpoint,
                    start_distance,
                    base,
                    base_scale: placement.scale_factor(),
                }),
            _ => None,
        };
        debug!(mode = ?self.mode(), pointers = self.pointers.count(), "gesture started");
    }

    fn pointer_move(
        &mut self,
        id: PointerId,
        position: Point,
        placement: &mut ImagePlacement,
        border: &CropBorder,
    ) {
        if !self.pointers.update(id, position) {
            return;
        }

        let settlement = match self.gesture {
            Some(GestureState::Drag {
                pointer,
                down,
                base,
            }) if pointer == id => {
                let delta = position.offset_from(down);
                self.solver
                    .translate_and_correct(placement, border, base, delta.x, delta.y)
            }
            Some(GestureState::Zoom {
                midpoint,
                start_distance,
                base,
                base_scale,
            }) => {
                let Some((_, distance)) = self.pointers.pinch() else {
                    return;
                };
                if start_distance < MIN_PINCH_DISTANCE {
                    return;
                }
                let ratio = distance / start_distance;
                self.zoom(placement, border, midpoint, base, base_scale, ratio)
            }
            _ => return,
        };

        if settlement == Settlement::Reset {
            self.after_reset(placement, border);
        }
    }

    fn zoom(
        &self,
        placement: &mut ImagePlacement,
        border: &CropBorder,
        midpoint: Point,
        base: AffineTransform,
        base_scale: f64,
        ratio: f64,
    ) -> Settlement {
        let floor = self.min_scale;
        if base_scale * ratio <= floor {
            // Pin at the floor, anchored at the pinch midpoint.
            let k = floor / placement.scale_factor();
            placement.reset_to(placement.transform().compose_scale(k, k, midpoint));
            return self.solver.correct(placement, border);
        }

        let ceiling = self.max_scale().max(base_scale);
        let ratio = if base_scale * ratio > ceiling {
            ceiling / base_scale
        } else {
            ratio
        };
        placement.reset_to(base.compose_scale(ratio, ratio, midpoint));

        // Only a shrink can expose the border.
        if ratio < 1.0 || !is_fully_covered(placement, border) {
            self.solver.correct(placement, border)
        } else {
            Settlement::Covered
        }
    }

    fn pointer_up(&mut self, id: PointerId) {
        if !self.pointers.release(id) {
            return;
        }
        let ended = self.mode();
        self.gesture = None;
        debug!(mode = ?ended, pointers = self.pointers.count(), "gesture ended");
    }

    /// Rotate to `degrees`, sweeping through the intermediate angles.
    pub fn rotate_to(
        &mut self,
        degrees: f64,
        placement: &mut ImagePlacement,
        border: &CropBorder,
    ) {
        self.rotate_to_with_frames(degrees, placement, border, |_| {});
    }

    /// Rotate to `degrees`, calling `on_frame` after every sweep step.
    pub fn rotate_to_with_frames<F>(
        &mut self,
        degrees: f64,
        placement: &mut ImagePlacement,
        border: &CropBorder,
        mut on_frame: F,
    ) where
        F: FnMut(&ImagePlacement),
    {
        if !degrees.is_finite() {
            warn!(degrees, "ignoring non-finite rotation");
            return;
        }

        let center = border.center();
        let size = placement.size();
        let from = self.angle;

        // Undo the current rotation and its cover scale to recover the
        // un-rotated baseline; every step is computed from it.
        let undo = 1.0 / rotation_scale(border, from);
        let base = placement
            .transform()
            .compose_scale(undo, undo, center)
            .compose_rotate(-from, center);

        let sweep = RotationSweep::new(from, degrees, self.rotation_step);
        debug!(from, to = degrees, steps = sweep.len(), "rotation sweep");

        self.sweeping = true;
        for angle in sweep {
            let grow = rotation_scale(border, angle);
            let mut step = base
                .compose_rotate(angle, center)
                .compose_scale(grow, grow, center);

            let floor = min_scale_for_rotation(border, size, angle);
            let scale = step.scale_factor();
            if scale < floor {
                let k = floor / scale;
                step = step.compose_scale(k, k, center);
            }

            placement.reset_to(step);
            if self.solver.correct(placement, border) == Settlement::Reset {
                self.sweeping = false;
                self.after_reset(placement, border);
                on_frame(&*placement);
                return;
            }
            self.angle = angle;
            on_frame(&*placement);
        }
        self.sweeping = false;

        self.min_scale = min_scale_for_rotation(border, size, self.angle);

        // A gesture in progress continues from the rotated placement.
        if self.gesture.is_some() {
            self.begin_gesture(placement);
        }
    }

    fn after_reset(&mut self, placement: &ImagePlacement, border: &CropBorder) {
        warn!(angle = self.angle, "placement refitted; rotation cleared");
        self.gesture = None;
        self.angle = 0.0;
        self.min_scale = min_scale_for_rotation(border, placement.size(), 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::ImageSize;
    use proptest::prelude::*;

    /// 400x200 image fitted to the matching 300x150 border of a 400x400 view.
    fn setup() -> (GestureController, ImagePlacement, CropBorder) {
        let size = ImageSize::new(400, 200).unwrap();
        let border = CropBorder::recompute_for_aspect(400.0, 400.0, size, 50.0);
        let placement = ImagePlacement::fit_to_border(size, &border);
        let mut controller = GestureController::new(&CropConfig::default());
        controller.reset(&placement, &border);
        (controller, placement, border)
    }

    fn down(id: PointerId, x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(id, x, y, PointerPhase::Down)
    }

    fn moved(id: PointerId, x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(id, x, y, PointerPhase::Move)
    }

    fn up(id: PointerId, x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(id, x, y, PointerPhase::Up)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn assert_transform_close(actual: AffineTransform, expected: AffineTransform) {
        for (x, y) in actual.coeffs().iter().zip(expected.coeffs()) {
            assert_close(*x, y);
        }
    }

    #[test]
    fn test_mode_transitions() {
        let (mut c, mut p, b) = setup();
        assert_eq!(c.mode(), GestureMode::None);

        c.handle_pointer(down(1, 200.0, 200.0), &mut p, &b);
        assert_eq!(c.mode(), GestureMode::Drag);

        c.handle_pointer(down(2, 260.0, 200.0), &mut p, &b);
        assert_eq!(c.mode(), GestureMode::Zoom);

        // A third finger changes nothing.
        c.handle_pointer(down(3, 100.0, 100.0), &mut p, &b);
        assert_eq!(c.mode(), GestureMode::Zoom);

        c.handle_pointer(up(2, 260.0, 200.0), &mut p, &b);
        assert_eq!(c.mode(), GestureMode::None);

        // The remaining finger does not resume dragging.
        let before = p.transform();
        c.handle_pointer(moved(1, 150.0, 150.0), &mut p, &b);
        assert_eq!(p.transform(), before);

        c.handle_pointer(up(1, 150.0, 150.0), &mut p, &b);
        assert_eq!(c.mode(), GestureMode::None);
    }

    #[test]
    fn test_drag_is_clamped_to_border() {
        let (mut c, mut p, b) = setup();
        // Zoom in first so there is room to pan.
        let grown = p.transform().compose_scale(2.0, 2.0, b.center());
        p.reset_to(grown);

        c.handle_pointer(down(1, 200.0, 200.0), &mut p, &b);
        c.handle_pointer(moved(1, 250.0, 200.0), &mut p, &b);
        assert_close(p.mapped_bounds().left, -50.0);

        // Dragging far right stops with the left edges aligned.
        c.handle_pointer(moved(1, 900.0, 200.0), &mut p, &b);
        assert_close(p.mapped_bounds().left, b.rect().left);
        assert!(is_fully_covered(&p, &b));
    }

    #[test]
    fn test_drag_is_computed_from_snapshot() {
        let (mut c, mut p, b) = setup();
        let grown = p.transform().compose_scale(2.0, 2.0, b.center());
        p.reset_to(grown);

        c.handle_pointer(down(1, 200.0, 200.0), &mut p, &b);
        for i in 1..=100 {
            c.handle_pointer(moved(1, 200.0 + 0.37 * i as f64, 200.0), &mut p, &b);
        }
        let [_, _, _, _, e, f] = p.transform().coeffs();
        let [_, _, _, _, e0, f0] = grown.coeffs();
        assert_close(e, e0 + 37.0);
        assert_eq!(f, f0);
    }

    #[test]
    fn test_consecutive_drags_do_not_jump() {
        let (mut c, mut p, b) = setup();
        let grown = p.transform().compose_scale(2.0, 2.0, b.center());
        p.reset_to(grown);

        c.handle_pointer(down(1, 200.0, 200.0), &mut p, &b);
        c.handle_pointer(moved(1, 230.0, 210.0), &mut p, &b);
        c.handle_pointer(up(1, 230.0, 210.0), &mut p, &b);
        let ended = p.transform();

        c.handle_pointer(down(1, 50.0, 50.0), &mut p, &b);
        assert_eq!(p.transform(), ended);
        c.handle_pointer(moved(1, 50.0, 50.0), &mut p, &b);
        assert_eq!(p.transform(), ended);
    }

    #[test]
    fn test_pinch_zoom_in_about_midpoint() {
        let (mut c, mut p, b) = setup();
        let start = p.scale_factor();

        c.handle_pointer(down(1, 150.0, 200.0), &mut p, &b);
        c.handle_pointer(down(2, 250.0, 200.0), &mut p, &b);
        c.handle_pointer(moved(2, 275.0, 200.0), &mut p, &b);
        c.handle_pointer(moved(1, 125.0, 200.0), &mut p, &b);

        assert_close(p.scale_factor(), start * 1.5);
        assert_close(p.mapped_center().x, 200.0);
        assert!(is_fully_covered(&p, &b));
    }

    #[test]
    fn test_pinch_stops_at_max_zoom() {
        let (mut c, mut p, b) = setup();
        c.handle_pointer(down(1, 190.0, 200.0), &mut p, &b);
        c.handle_pointer(down(2, 210.0, 200.0), &mut p, &b);
        c.handle_pointer(moved(2, 400.0, 200.0), &mut p, &b);
        assert_close(p.scale_factor(), c.max_scale());
    }

    #[test]
    fn test_pinch_below_floor_stays_pinned() {
        let (mut c, mut p, b) = setup();
        assert_close(p.scale_factor(), c.min_scale());

        c.handle_pointer(down(1, 100.0, 200.0), &mut p, &b);
        c.handle_pointer(down(2, 300.0, 200.0), &mut p, &b);
        // Fingers close to 10% of their starting distance.
        c.handle_pointer(moved(1, 190.0, 200.0), &mut p, &b);
        c.handle_pointer(moved(2, 210.0, 200.0), &mut p, &b);

        assert_close(p.scale_factor(), c.min_scale());
        assert!(is_fully_covered(&p, &b));
    }

    #[test]
    fn test_zero_distance_pinch_is_ignored() {
        let (mut c, mut p, b) = setup();
        let before = p.transform();
        c.handle_pointer(down(1, 200.0, 200.0), &mut p, &b);
        c.handle_pointer(down(2, 200.0, 200.0), &mut p, &b);
        c.handle_pointer(moved(2, 300.0, 200.0), &mut p, &b);
        assert_eq!(p.transform(), before);
    }

    #[test]
    fn test_rotate_square_border_keeps_min_scale() {
        let size = ImageSize::new(600, 600).unwrap();
        let border = CropBorder::default_for_view(400.0, 400.0, 50.0);
        let mut p = ImagePlacement::fit_to_border(size, &border);
        let mut c = GestureController::new(&CropConfig::default());
        c.reset(&p, &border);
        let at_zero = c.min_scale();

        c.rotate_to(90.0, &mut p, &border);
        assert_close(c.angle(), 90.0);
        assert_close(c.min_scale(), at_zero);
        assert_close(p.scale_factor(), at_zero);
        assert!(is_fully_covered(&p, &border));
    }

    #[test]
    fn test_rotation_sweep_covers_every_frame() {
        let (mut c, mut p, b) = setup();
        let mut frames = 0;
        c.rotate_to_with_frames(30.0, &mut p, &b, |frame| {
            frames += 1;
            assert!(is_fully_covered(frame, &b), "frame {} exposed the border", frames);
        });
        assert_eq!(frames, 150);
        assert!(!c.is_rotating());
        assert_close(c.angle(), 30.0);
        assert_close(p.transform().rotation_degrees(), 30.0);
        assert!(c.min_scale() > min_scale_for_rotation(&b, p.size(), 0.0));
    }

    #[test]
    fn test_rotating_flag() {
        let (mut c, _, _) = setup();
        assert!(!c.is_rotating());
        c.set_rotating(true);
        assert!(c.is_rotating());
        c.set_rotating(false);
        assert!(!c.is_rotating());
    }

    #[test]
    fn test_rotate_back_restores_placement() {
        let (mut c, mut p, b) = setup();
        let original = p.transform();
        c.rotate_to(-12.0, &mut p, &b);
        c.rotate_to(0.0, &mut p, &b);
        assert_transform_close(p.transform(), original);
    }

    #[test]
    fn test_rotated_pinch_respects_rotated_floor() {
        let (mut c, mut p, b) = setup();
        c.rotate_to(20.0, &mut p, &b);
        let floor = c.min_scale();

        c.handle_pointer(down(1, 100.0, 200.0), &mut p, &b);
        c.handle_pointer(down(2, 300.0, 200.0), &mut p, &b);
        c.handle_pointer(moved(2, 120.0, 200.0), &mut p, &b);

        assert!(p.scale_factor() >= floor - 1e-9);
        assert!(is_fully_covered(&p, &b));
    }

    #[test]
    fn test_rotate_during_drag_rebases_gesture() {
        let (mut c, mut p, b) = setup();
        c.handle_pointer(down(1, 200.0, 200.0), &mut p, &b);
        c.rotate_to(10.0, &mut p, &b);
        let rotated = p.transform();

        assert_eq!(c.mode(), GestureMode::Drag);
        c.handle_pointer(moved(1, 200.0, 200.0), &mut p, &b);
        assert_transform_close(p.transform(), rotated);
    }

    #[test]
    fn test_non_finite_rotation_is_ignored() {
        let (mut c, mut p, b) = setup();
        let before = p.transform();
        c.rotate_to(f64::NAN, &mut p, &b);
        assert_eq!(p.transform(), before);
        assert_eq!(c.angle(), 0.0);
    }

    #[test]
    fn test_singular_placement_resets_rotation() {
        let (mut c, mut p, b) = setup();
        c.rotate_to(15.0, &mut p, &b);
        p.reset_to(AffineTransform::new([0.0; 6]));

        c.handle_pointer(down(1, 200.0, 200.0), &mut p, &b);
        c.handle_pointer(moved(1, 210.0, 200.0), &mut p, &b);

        assert_eq!(p, ImagePlacement::fit_to_border(p.size(), &b));
        assert_eq!(c.angle(), 0.0);
        assert_eq!(c.mode(), GestureMode::None);
    }

    proptest! {
        #[test]
        fn prop_pinch_never_drops_below_floor(
            angle in -45.0f64..45.0,
            spreads in prop::collection::vec(1.0f64..400.0, 1..20),
        ) {
            let (mut c, mut p, b) = setup();
            c.rotate_to(angle, &mut p, &b);
            let floor = c.min_scale();

            c.handle_pointer(down(1, 100.0, 200.0), &mut p, &b);
            c.handle_pointer(down(2, 300.0, 200.0), &mut p, &b);
            for spread in spreads {
                c.handle_pointer(moved(2, 100.0 + spread, 200.0), &mut p, &b);
                prop_assert!(p.scale_factor() >= floor - 1e-9);
                prop_assert!(is_fully_covered(&p, &b));
            }
        }
    }
}
