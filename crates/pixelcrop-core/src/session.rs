//! The crop session: one image, one view, one border.
//!
//! [`CropSession`] owns everything a crop view needs between events and is
//! the only type a platform adapter talks to. Every input is applied and
//! settled before the call returns, so the readers always observe a
//! placement that covers the border.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::border::CropBorder;
use crate::config::CropConfig;
use crate::error::CropError;
use crate::geometry::{AffineTransform, Quad, Rect};
use crate::gesture::{GestureController, GestureMode, PointerEvent};
use crate::placement::{ImagePlacement, ImageSize};

/// Grid lines drawn while rotating.
const ROTATION_GRID: u32 = 9;
/// Grid lines drawn while dragging or zooming.
const GESTURE_GRID: u32 = 3;

/// Interactive crop state for a single view.
#[derive(Debug, Clone)]
pub struct CropSession {
    config: CropConfig,
    view: Option<(f64, f64)>,
    border: CropBorder,
    placement: Option<ImagePlacement>,
    controller: GestureController,
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSnapshot {
    pub transform: [f64; 6],
    pub border: Rect,
    pub mode: GestureMode,
    pub rotating: bool,
    pub rotation_degrees: f64,
    pub scale_factor: f64,
    pub grid_divisions: Option<u32>,
}

impl Default for CropSession {
    fn default() -> Self {
        Self::build(CropConfig::default())
    }
}

impl CropSession {
    /// # Errors
    ///
    /// [`CropError::InvalidConfig`] if the configuration is out of range.
    pub fn new(config: CropConfig) -> Result<Self, CropError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: CropConfig) -> Self {
        let controller = GestureController::new(&config);
        Self {
            config,
            view: None,
            border: CropBorder::new(Rect::from_size(1.0, 1.0)),
            placement: None,
            controller,
        }
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Assign an image by its intrinsic size, fitting it to a border of the
    /// same aspect ratio.
    ///
    /// # Errors
    ///
    /// [`CropError::EmptyImage`] if either dimension is zero; the previous
    /// image, if any, is kept.
    pub fn set_image(&mut self, width: u32, height: u32) -> Result<(), CropError> {
        let size = ImageSize::new(width, height)?;
        debug!(width, height, "image assigned");
        self.placement = Some(ImagePlacement::fit_to_border(size, &self.border));
        self.relayout();
        Ok(())
    }

    pub fn clear_image(&mut self) {
        debug!("image cleared");
        self.placement = None;
        self.relayout();
    }

    /// Resize the view. Sizes that are not finite and positive are ignored
    /// until a usable size arrives.
    pub fn on_view_resize(&mut self, width: f64, height: f64) {
        let usable = width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0;
        if !usable {
            debug!(width, height, "deferring layout for degenerate view size");
            return;
        }
        self.view = Some((width, height));
        self.relayout();
    }

    /// Recompute the border and refit the image. Gestures and rotation
    /// start over.
    fn relayout(&mut self) {
        let inset = self.config.border_inset;
        if let Some((width, height)) = self.view {
            self.border = match &self.placement {
                Some(placement) => {
                    CropBorder::recompute_for_aspect(width, height, placement.size(), inset)
                }
                None => CropBorder::default_for_view(width, height, inset),
            };
        }

        let mut controller = GestureController::new(&self.config);
        if let Some(placement) = self.placement.as_mut() {
            *placement = ImagePlacement::fit_to_border(placement.size(), &self.border);
            controller.reset(placement, &self.border);
        }
        // The host's rotate toggle survives layout changes.
        controller.set_rotating(self.controller.is_rotating());
        self.controller = controller;
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if let Some(placement) = self.placement.as_mut() {
            self.controller
                .handle_pointer(event, placement, &self.border);
        }
    }

    /// Rotate to an absolute angle in degrees.
    pub fn rotate(&mut self, degrees: f64) {
        self.rotate_with_frames(degrees, |_| {});
    }

    /// Rotate to an absolute angle, calling `on_frame` with every
    /// intermediate placement.
    pub fn rotate_with_frames<F>(&mut self, degrees: f64, on_frame: F)
    where
        F: FnMut(&ImagePlacement),
    {
        if let Some(placement) = self.placement.as_mut() {
            self.controller
                .rotate_to_with_frames(degrees, placement, &self.border, on_frame);
        }
    }

    /// Flag that the host's rotation control is active.
    pub fn set_rotating(&mut self, rotating: bool) {
        self.controller.set_rotating(rotating);
    }

    pub fn current_transform(&self) -> Option<AffineTransform> {
        self.placement.as_ref().map(ImagePlacement::transform)
    }

    pub fn current_border(&self) -> CropBorder {
        self.border
    }

    pub fn current_mode(&self) -> GestureMode {
        self.controller.mode()
    }

    pub fn is_rotating(&self) -> bool {
        self.controller.is_rotating()
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.controller.angle()
    }

    /// Zoom floor at the current angle.
    pub fn min_scale(&self) -> Option<f64> {
        self.placement.as_ref().map(|_| self.controller.min_scale())
    }

    pub fn scale_factor(&self) -> Option<f64> {
        self.placement.as_ref().map(ImagePlacement::scale_factor)
    }

    pub fn placement(&self) -> Option<&ImagePlacement> {
        self.placement.as_ref()
    }

    /// The border's corners in image pixel coordinates, in the order
    /// left-top, right-top, right-bottom, left-bottom.
    ///
    /// # Errors
    ///
    /// [`CropError::NoImageAssigned`] without an image, or
    /// [`CropError::SingularTransform`] if the transform cannot be inverted.
    pub fn image_space_crop(&self) -> Result<Quad, CropError> {
        let placement = self.placement.as_ref().ok_or(CropError::NoImageAssigned)?;
        let inverse = placement.transform().invert()?;
        Ok(inverse.map_rect(&self.border.rect()))
    }

    /// Number of grid divisions the overlay should draw, if any.
    pub fn grid_divisions(&self) -> Option<u32> {
        if self.is_rotating() {
            return Some(ROTATION_GRID);
        }
        match self.current_mode() {
            GestureMode::Drag | GestureMode::Zoom => Some(GESTURE_GRID),
            GestureMode::None => None,
        }
    }

    /// State for the renderer, or `None` without an image.
    pub fn snapshot(&self) -> Option<RenderSnapshot> {
        let placement = self.placement.as_ref()?;
        Some(RenderSnapshot {
            transform: placement.transform().coeffs(),
            border: self.border.rect(),
            mode: self.current_mode(),
            rotating: self.is_rotating(),
            rotation_degrees: self.rotation_degrees(),
            scale_factor: placement.scale_factor(),
            grid_divisions: self.grid_divisions(),
        })
    }
}
