//! Lens rendering and standalone arc validation entry points.

use crate::triplet::{build_arc, checkpoint_set, read_checkpoints};
use refractr_core::lens::{render_lens as core_render_lens, SceneConfig};
use refractr_core::validation::validate_triplet;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

/// Renders the lens described by a `SceneConfig` object into canvas-space
/// polylines for the front end to stroke.
#[wasm_bindgen]
pub fn render_lens(config: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let config: SceneConfig = from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Invalid scene config: {}", e)))?;
    let drawing = core_render_lens(&config)
        .map_err(|e| JsValue::from_str(&format!("Lens rendering failed: {:#}", e)))?;

    to_value(&drawing).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Checks a bare circular arc (not restricted to one branch's domain)
/// against `[x, y]` checkpoints.
#[wasm_bindgen]
pub fn validate_circular_arc(
    radius: f64,
    offset: f64,
    branch: &str,
    checkpoints: js_sys::Array,
) -> Result<(), JsValue> {
    let arc = build_arc(radius, offset, branch)
        .map_err(|e| JsValue::from_str(&format!("{:#}", e)))?;
    let checkpoints = read_checkpoints(&checkpoints)
        .and_then(checkpoint_set)
        .map_err(|e| JsValue::from_str(&format!("{:#}", e)))?;
    validate_triplet(&arc, &checkpoints)
        .map_err(|e| JsValue::from_str(&format!("Validation failed: {}", e)))
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use refractr_core::lens::{LensDrawing, LensParameters};
    use wasm_bindgen_test::wasm_bindgen_test;

    fn config() -> SceneConfig {
        SceneConfig {
            canvas_width: 800.0,
            canvas_height: 700.0,
            origin_x: 300.0,
            origin_y: 350.0,
            resolution: 1000,
            lens: LensParameters {
                left_radius: 400.0,
                right_radius: 300.0,
                thickness: 100.0,
            },
        }
    }

    #[wasm_bindgen_test]
    fn render_lens_round_trips_through_js() {
        let value = to_value(&config()).expect("config");
        let drawing: LensDrawing = from_value(render_lens(value).expect("render")).expect("drawing");
        assert!(!drawing.left_face.points.is_empty());
        assert!(!drawing.right_face.points.is_empty());
        assert!(drawing.rim.x > 0.0 && drawing.rim.x < 100.0);
    }

    #[wasm_bindgen_test]
    fn render_lens_reports_invalid_config() {
        let mut bad = config();
        bad.resolution = 0;
        let message = render_lens(to_value(&bad).expect("config"))
            .err()
            .and_then(|err| err.as_string())
            .unwrap_or_default();
        assert!(message.contains("Lens rendering failed"));
        assert!(message.contains("resolution"));
    }

    #[wasm_bindgen_test]
    fn validate_circular_arc_accepts_apex_checkpoints() {
        let checkpoints = js_sys::Array::new();
        for (x, y) in [(0.0, 0.0), (20.0, 60.0), (40.0, 80.0)] {
            checkpoints.push(&js_sys::Array::of2(&JsValue::from_f64(x), &JsValue::from_f64(y)));
        }
        assert!(validate_circular_arc(100.0, 100.0, "rising", checkpoints).is_ok());
    }

    #[wasm_bindgen_test]
    fn validate_circular_arc_rejects_empty_checkpoints() {
        let message = validate_circular_arc(100.0, 100.0, "rising", js_sys::Array::new())
            .err()
            .and_then(|err| err.as_string())
            .unwrap_or_default();
        assert!(message.contains("No checkpoints provided"));
    }
}
