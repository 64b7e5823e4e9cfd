//! Tracking of the (at most two) active pointers.

use crate::geometry::Point;

/// Platform identifier of a pointer (finger, pen, mouse button).
pub type PointerId = u32;

/// Number of pointers that take part in a gesture.
pub const MAX_POINTERS: usize = 2;

/// Positions of the active pointers, in arrival order.
///
/// Pointers beyond [`MAX_POINTERS`] are not tracked; their events are ignored.
#[derive(Debug, Clone, Default)]
pub(crate) struct PointerTracker {
    slots: [Option<(PointerId, Point)>; MAX_POINTERS],
}

impl PointerTracker {
    /// Start tracking a pointer. Returns `false` if it was ignored because
    /// both slots are taken. A pointer that is already tracked is moved.
    pub(crate) fn press(&mut self, id: PointerId, position: Point) -> bool {
        if self.update(id, position) {
            return true;
        }
        match self.slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some((id, position));
                true
            }
            None => false,
        }
    }

    /// Update a tracked pointer. Returns `false` if the pointer is not tracked.
    pub(crate) fn update(&mut self, id: PointerId, position: Point) -> bool {
        for (slot_id, slot_pos) in self.slots.iter_mut().flatten() {
            if *slot_id == id {
                *slot_pos = position;
                return true;
            }
        }
        false
    }

    /// Stop tracking a pointer. Returns `false` if it was not tracked.
    pub(crate) fn release(&mut self, id: PointerId) -> bool {
        let Some(index) = self
            .slots
            .iter()
            .position(|slot| matches!(slot, Some((slot_id, _)) if *slot_id == id))
        else {
            return false;
        };
        self.slots[index] = None;
        // Keep the remaining pointer in the first slot.
        if index == 0 {
            self.slots.swap(0, 1);
        }
        true
    }

    pub(crate) fn clear(&mut self) {
        self.slots = Default::default();
    }

    pub(crate) fn count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    #[cfg(test)]
    pub(crate) fn position(&self, id: PointerId) -> Option<Point> {
        self.slots
            .iter()
            .flatten()
            .find(|(slot_id, _)| *slot_id == id)
            .map(|(_, pos)| *pos)
    }

    /// The first tracked pointer.
    pub(crate) fn primary(&self) -> Option<(PointerId, Point)> {
        self.slots[0]
    }

    /// Midpoint and distance of the two tracked pointers.
    pub(crate) fn pinch(&self) -> Option<(Point, f64)> {
        match self.slots {
            [Some((_, a)), Some((_, b))] => Some((a.midpoint(b), a.distance(b))),
            _ => None,
        }
    }
}
