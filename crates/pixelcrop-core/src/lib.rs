//! Pixelcrop Core - Geometry engine for interactive image cropping
//!
//! This crate keeps an image's affine transform valid while the user drags,
//! pinches and rotates it behind a fixed crop border. Whatever the gesture,
//! the image never leaves any part of the border uncovered.
//!
//! # Module Structure
//!
//! - `geometry` - Points, rectangles and the 2×3 affine transform
//! - `placement` - An image's intrinsic size paired with its transform
//! - `border` - The crop border and its aspect-driven sizing
//! - `containment` - Coverage test, corrective translation, rotation minimum scale
//! - `gesture` - Pointer state machine and rotation sweeps
//! - `session` - The facade platform adapters drive
//!
//! Nothing here touches pixels: decoding, rendering and export live with the
//! host.

pub mod border;
pub mod config;
pub mod containment;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod placement;
pub mod session;

pub use border::CropBorder;
pub use config::CropConfig;
pub use containment::{
    compute_indents, is_fully_covered, min_scale_for_rotation, rotated_bounds, rotation_scale,
    ContainmentSolver, Indents, Settlement,
};
pub use error::CropError;
pub use geometry::{AffineTransform, Point, Quad, Rect};
pub use gesture::{GestureController, GestureMode, PointerEvent, PointerId, PointerPhase};
pub use placement::{fit_scale, ImagePlacement, ImageSize};
pub use session::{CropSession, RenderSnapshot};
