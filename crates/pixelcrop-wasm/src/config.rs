//! Conversion of JS configuration objects into [`CropConfig`].

use pixelcrop_core::CropConfig;
use wasm_bindgen::prelude::*;

/// Parse an optional JS configuration object.
///
/// `undefined` and `null` yield the defaults; missing fields take their
/// default values.
///
/// # Errors
/// Returns error if the object cannot be deserialized or holds values out
/// of range
pub(crate) fn config_from_js(value: JsValue) -> Result<CropConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(CropConfig::default());
    }
    let config: CropConfig = serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid crop config: {}", e)))?;
    config
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(config)
}
