//! Pixelcrop WASM - WebAssembly bindings for Pixelcrop
//!
//! This crate exposes the pixelcrop-core crop engine to JavaScript/TypeScript
//! applications. The host forwards pointer, resize and rotation input and
//! draws the image with the transform it reads back.
//!
//! # Module Structure
//!
//! - `config` - Conversion of JS configuration objects
//! - `view` - The `JsCropView` class wrapping a crop session
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropView } from '@pixelcrop/wasm';
//!
//! await init();
//!
//! const view = new JsCropView({ borderInset: 40 });
//! view.resize(canvas.width, canvas.height);
//! view.set_image(bitmap.width, bitmap.height);
//!
//! canvas.onpointerdown = (e) => view.pointer_down(e.pointerId, e.offsetX, e.offsetY);
//! canvas.onpointermove = (e) => view.pointer_move(e.pointerId, e.offsetX, e.offsetY);
//! canvas.onpointerup = (e) => view.pointer_up(e.pointerId, e.offsetX, e.offsetY);
//!
//! const [a, b, c, d, e, f] = view.transform();
//! ctx.setTransform(a, b, c, d, e, f);
//! ctx.drawImage(bitmap, 0, 0);
//! ```

use wasm_bindgen::prelude::*;

mod config;
mod view;

pub use view::JsCropView;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
