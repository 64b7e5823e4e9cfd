//! Crop view WASM bindings.
//!
//! `JsCropView` wraps a [`CropSession`] and translates between browser
//! events and the session's typed API. Transforms cross the boundary as
//! `[a, b, c, d, e, f]` arrays in canvas `setTransform` order.

use crate::config::config_from_js;
use pixelcrop_core::{CropConfig, CropSession, GestureMode, PointerEvent, PointerPhase, Quad};
use wasm_bindgen::prelude::*;

/// JavaScript-accessible interactive crop view.
///
/// # Example (TypeScript)
/// ```typescript
/// const view = new JsCropView();
/// view.resize(400, 400);
/// view.set_image(4032, 3024);
///
/// // Rotate with an animation frame per step
/// view.rotate_with_frames(15, (t: Float64Array) => redraw(t));
///
/// const crop = view.image_space_crop(); // 4 corners in image pixels
/// view.free();
/// ```
#[wasm_bindgen]
pub struct JsCropView {
    inner: CropSession,
}

#[wasm_bindgen]
impl JsCropView {
    /// Create a view from an optional configuration object.
    ///
    /// # Arguments
    /// * `config` - `{ borderInset?, rotationStepDegrees?, maxZoom?, exactRotatedCoverage? }`,
    ///   or `undefined` for the defaults
    ///
    /// # Errors
    /// Returns error if the config cannot be deserialized or holds values
    /// out of range
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsCropView, JsValue> {
        JsCropView::with_config(config_from_js(config)?)
    }

    /// Assign an image by its intrinsic size.
    ///
    /// # Errors
    /// Returns error if either dimension is zero
    pub fn set_image(&mut self, width: u32, height: u32) -> Result<(), JsValue> {
        self.inner
            .set_image(width, height)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn clear_image(&mut self) {
        self.inner.clear_image();
    }

    /// Resize the view in CSS pixels.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.inner.on_view_resize(width, height);
    }

    pub fn pointer_down(&mut self, id: u32, x: f64, y: f64) {
        self.pointer(id, x, y, PointerPhase::Down);
    }

    pub fn pointer_move(&mut self, id: u32, x: f64, y: f64) {
        self.pointer(id, x, y, PointerPhase::Move);
    }

    pub fn pointer_up(&mut self, id: u32, x: f64, y: f64) {
        self.pointer(id, x, y, PointerPhase::Up);
    }

    /// Rotate to an absolute angle in degrees.
    pub fn rotate(&mut self, degrees: f64) {
        self.inner.rotate(degrees);
    }

    /// Rotate to an absolute angle, calling `on_frame` with the transform
    /// after every step.
    ///
    /// # Errors
    /// Returns the first exception thrown by `on_frame`; the sweep itself
    /// always completes
    pub fn rotate_with_frames(
        &mut self,
        degrees: f64,
        on_frame: &js_sys::Function,
    ) -> Result<(), JsValue> {
        let mut failure = None;
        self.inner.rotate_with_frames(degrees, |frame| {
            if failure.is_some() {
                return;
            }
            let coeffs = js_sys::Float64Array::from(&frame.transform().coeffs()[..]);
            if let Err(err) = on_frame.call1(&JsValue::NULL, &coeffs) {
                failure = Some(err);
            }
        });
        failure.map_or(Ok(()), Err)
    }

    /// Set the host's rotate-mode toggle.
    pub fn set_rotating(&mut self, rotating: bool) {
        self.inner.set_rotating(rotating);
    }

    /// Current transform as `[a, b, c, d, e, f]`, or `undefined` without an image.
    pub fn transform(&self) -> Option<Vec<f64>> {
        self.inner
            .current_transform()
            .map(|t| t.coeffs().to_vec())
    }

    /// Crop border as `[left, top, right, bottom]`.
    pub fn border(&self) -> Vec<f64> {
        let r = self.inner.current_border().rect();
        vec![r.left, r.top, r.right, r.bottom]
    }

    /// Gesture mode: `"none"`, `"drag"` or `"zoom"`.
    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        mode_name(self.inner.current_mode()).to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn is_rotating(&self) -> bool {
        self.inner.is_rotating()
    }

    #[wasm_bindgen(getter)]
    pub fn rotation_degrees(&self) -> f64 {
        self.inner.rotation_degrees()
    }

    #[wasm_bindgen(getter)]
    pub fn scale_factor(&self) -> Option<f64> {
        self.inner.scale_factor()
    }

    #[wasm_bindgen(getter)]
    pub fn min_scale(&self) -> Option<f64> {
        self.inner.min_scale()
    }

    /// Grid lines for the overlay, or `undefined` for none.
    #[wasm_bindgen(getter)]
    pub fn grid_divisions(&self) -> Option<u32> {
        self.inner.grid_divisions()
    }

    /// Border corners in image pixels as `[x0, y0, x1, y1, x2, y2, x3, y3]`,
    /// clockwise from the top-left.
    ///
    /// # Errors
    /// Returns error if no image is assigned or the transform is singular
    pub fn image_space_crop(&self) -> Result<Vec<f64>, JsValue> {
        self.inner
            .image_space_crop()
            .map(|quad| flatten(&quad))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Everything needed to draw a frame, as a plain object, or `undefined`
    /// without an image.
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        match self.inner.snapshot() {
            Some(snapshot) => serde_wasm_bindgen::to_value(&snapshot)
                .map_err(|e| JsValue::from_str(&format!("Snapshot failed: {}", e))),
            None => Ok(JsValue::UNDEFINED),
        }
    }
}

impl JsCropView {
    /// Create a view from a typed configuration.
    ///
    /// # Errors
    /// Returns error if the config holds values out of range
    pub fn with_config(config: CropConfig) -> Result<JsCropView, JsValue> {
        let inner = CropSession::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(JsCropView { inner })
    }

    fn pointer(&mut self, id: u32, x: f64, y: f64, phase: PointerPhase) {
        self.inner
            .handle_pointer(PointerEvent::new(id, x, y, phase));
    }
}

fn mode_name(mode: GestureMode) -> &'static str {
    match mode {
        GestureMode::None => "none",
        GestureMode::Drag => "drag",
        GestureMode::Zoom => "zoom",
    }
}

fn flatten(quad: &Quad) -> Vec<f64> {
    quad.iter().flat_map(|p| [p.x, p.y]).collect()
}
