//! Circular-arc triplets exposed to the canvas front end.

use anyhow::{anyhow, bail, Result};
use refractr_core::curves::{Branch, CircularArc};
use refractr_core::triplet::BoundedFunctionTriplet;
use refractr_core::validation::{validate_triplet, Checkpoint, CheckpointSet};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmTriplet {
    pub(crate) triplet: BoundedFunctionTriplet,
}

pub(crate) fn parse_branch(name: &str) -> Result<Branch> {
    match name {
        "rising" => Ok(Branch::Rising),
        "falling" => Ok(Branch::Falling),
        other => bail!("Unknown branch \"{}\", expected \"rising\" or \"falling\".", other),
    }
}

/// Converts raw `[x, y]` pairs into a checkpoint set, rejecting entries
/// that are not points.
pub(crate) fn checkpoint_set(pairs: Vec<Vec<f64>>) -> Result<CheckpointSet> {
    let mut points = Vec::with_capacity(pairs.len());
    for pair in pairs {
        match pair.as_slice() {
            [x, y] => points.push(Checkpoint::new(*x, *y)),
            _ => bail!("Checkpoint {:?} is not a point", pair),
        }
    }
    Ok(CheckpointSet::new(points)?)
}

pub(crate) fn read_checkpoints(checkpoints: &js_sys::Array) -> Result<Vec<Vec<f64>>> {
    let mut pairs = Vec::with_capacity(checkpoints.length() as usize);
    for (index, entry) in checkpoints.iter().enumerate() {
        if !js_sys::Array::is_array(&entry) {
            bail!("Checkpoint {} is not an array", index);
        }
        let coords = js_sys::Array::from(&entry);
        let pair = coords
            .iter()
            .map(|value| {
                value
                    .as_f64()
                    .ok_or_else(|| anyhow!("Checkpoint {} holds a non-numeric value", index))
            })
            .collect::<Result<Vec<f64>>>()?;
        pairs.push(pair);
    }
    Ok(pairs)
}

pub(crate) fn build_arc(radius: f64, offset: f64, branch: &str) -> Result<CircularArc> {
    let branch = parse_branch(branch)?;
    Ok(CircularArc::new(radius, offset)?.with_branch(branch))
}

fn js_error(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", err))
}

#[wasm_bindgen]
impl WasmTriplet {
    #[wasm_bindgen(constructor)]
    pub fn new(radius: f64, offset: f64, branch: &str) -> Result<WasmTriplet, JsValue> {
        console_error_panic_hook::set_once();

        let arc = build_arc(radius, offset, branch).map_err(js_error)?;
        let triplet = arc
            .to_triplet()
            .map_err(|e| JsValue::from_str(&format!("Failed to build triplet: {}", e)))?;
        Ok(WasmTriplet { triplet })
    }

    pub fn evaluate(&self, x: f64) -> Result<f64, JsValue> {
        self.triplet
            .evaluate(x)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn derivative(&self, x: f64) -> Result<f64, JsValue> {
        self.triplet
            .derivative(x)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn inverse(&self, y: f64) -> Result<f64, JsValue> {
        self.triplet
            .inverse(y)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn shift_right(&self, delta: f64) -> Result<WasmTriplet, JsValue> {
        let triplet = self
            .triplet
            .shift_right(delta)
            .map_err(|e| JsValue::from_str(&format!("Failed to shift triplet: {}", e)))?;
        Ok(WasmTriplet { triplet })
    }

    /// `[low, high]`
    pub fn domain(&self) -> Vec<f64> {
        let domain = self.triplet.domain();
        vec![domain.low, domain.high]
    }

    /// `[low, high]`
    pub fn codomain(&self) -> Vec<f64> {
        let codomain = self.triplet.codomain();
        vec![codomain.low, codomain.high]
    }

    pub fn validate(&self, checkpoints: js_sys::Array) -> Result<(), JsValue> {
        let checkpoints = read_checkpoints(&checkpoints)
            .and_then(checkpoint_set)
            .map_err(js_error)?;
        validate_triplet(&self.triplet, &checkpoints)
            .map_err(|e| JsValue::from_str(&format!("Validation failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::wasm_bindgen_test;

    #[test]
    fn parse_branch_accepts_known_names() {
        assert_eq!(parse_branch("rising").expect("rising"), Branch::Rising);
        assert_eq!(parse_branch("falling").expect("falling"), Branch::Falling);
        let message = format!("{}", parse_branch("sideways").expect_err("unknown"));
        assert!(message.contains("Unknown branch \"sideways\""));
    }

    #[test]
    fn checkpoint_set_rejects_non_points() {
        let message = format!(
            "{}",
            checkpoint_set(vec![vec![0.0, 0.0], vec![1.0]]).expect_err("not a point")
        );
        assert!(message.contains("Checkpoint [1.0] is not a point"));

        let message = format!("{}", checkpoint_set(Vec::new()).expect_err("empty"));
        assert!(message.contains("No checkpoints provided"));

        let set = checkpoint_set(vec![vec![20.0, 60.0]]).expect("set");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn wasm_triplet_evaluates_apex_arc() {
        let triplet = WasmTriplet::new(100.0, 100.0, "rising").expect("triplet");
        assert_eq!(triplet.domain(), vec![0.0, 100.0]);
        assert_eq!(triplet.codomain(), vec![0.0, 100.0]);
        assert!((triplet.evaluate(20.0).expect("value") - 60.0).abs() < 1e-12);
        assert!((triplet.derivative(20.0).expect("slope") - 80.0 / 60.0).abs() < 1e-12);
        assert!((triplet.inverse(60.0).expect("inverse") - 20.0).abs() < 1e-12);
    }

    #[test]
    fn wasm_triplet_shift_moves_domain() {
        let triplet = WasmTriplet::new(100.0, 100.0, "rising").expect("triplet");
        let shifted = triplet.shift_right(50.0).expect("shift");
        assert_eq!(shifted.domain(), vec![50.0, 150.0]);
        let expected = triplet.evaluate(25.0).expect("value");
        assert!((shifted.evaluate(75.0).expect("shifted") - expected).abs() < 1e-12);
    }

    #[cfg(target_arch = "wasm32")]
    #[wasm_bindgen_test]
    fn wasm_triplet_rejects_non_positive_radius() {
        let message = WasmTriplet::new(0.0, 1.0, "rising")
            .err()
            .and_then(|err| err.as_string())
            .unwrap_or_default();
        assert!(message.contains("radius (=0) > 0"));
    }

    #[cfg(target_arch = "wasm32")]
    #[wasm_bindgen_test]
    fn wasm_triplet_reports_domain_errors() {
        let triplet = WasmTriplet::new(10.0, 10.0, "rising").expect("triplet");
        let message = triplet
            .evaluate(25.0)
            .err()
            .and_then(|err| err.as_string())
            .unwrap_or_default();
        assert!(message.contains("25 not within domain [0, 10]"));
    }

    #[cfg(target_arch = "wasm32")]
    #[wasm_bindgen_test]
    fn wasm_triplet_validates_checkpoints() {
        let triplet = WasmTriplet::new(100.0, 100.0, "rising").expect("triplet");
        let good = js_sys::Array::new();
        good.push(&js_sys::Array::of2(&JsValue::from_f64(20.0), &JsValue::from_f64(60.0)));
        assert!(triplet.validate(good).is_ok());

        let bad = js_sys::Array::new();
        bad.push(&js_sys::Array::of2(&JsValue::from_f64(0.0), &JsValue::from_f64(5.0)));
        let message = triplet
            .validate(bad)
            .err()
            .and_then(|err| err.as_string())
            .unwrap_or_default();
        assert!(message.contains("value check failed"));

        let malformed = js_sys::Array::new();
        malformed.push(&js_sys::Array::of1(&JsValue::from_f64(1.0)));
        let message = triplet
            .validate(malformed)
            .err()
            .and_then(|err| err.as_string())
            .unwrap_or_default();
        assert!(message.contains("is not a point"));
    }
}
