//! Lens cross-section built from two face triplets, and the pure renderer
//! that turns a scene configuration into canvas polylines.
//!
//! Model coordinates put the left apex at the origin with `y` pointing up;
//! canvas coordinates put `(origin_x, origin_y)` at the left apex with `y`
//! pointing down.

use crate::curves::CircularArc;
use crate::error::{RefractrError, Result};
use crate::numeric::{approx_eq, assert_strictly_positive, generate_inverse};
use crate::traits::RealFn;
use crate::triplet::BoundedFunctionTriplet;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Smallest sampling step along x, in canvas pixels.
pub const MIN_SAMPLE_STEP: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LensParameters {
    pub left_radius: f64,
    pub right_radius: f64,
    /// Maximum horizontal thickness, apex to apex.
    pub thickness: f64,
}

impl LensParameters {
    pub fn validate(&self) -> Result<()> {
        assert_strictly_positive(self.left_radius, "left_radius")?;
        assert_strictly_positive(self.right_radius, "right_radius")?;
        assert_strictly_positive(self.thickness, "thickness")?;
        Ok(())
    }
}

/// Where the two faces meet, in model coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rim {
    pub x: f64,
    pub height: f64,
}

#[derive(Debug, Clone)]
pub struct Lens {
    thickness: f64,
    left_face: BoundedFunctionTriplet,
    right_face: BoundedFunctionTriplet,
}

impl Lens {
    /// Both faces are given with their apex at `x = 0`; the right face is
    /// moved `thickness` to the right.
    pub fn new(
        thickness: f64,
        left_face: BoundedFunctionTriplet,
        right_face: BoundedFunctionTriplet,
    ) -> Result<Self> {
        assert_strictly_positive(thickness, "thickness")?;
        check_apex(&left_face, "left face")?;
        check_apex(&right_face, "right face")?;

        Ok(Self {
            thickness,
            left_face,
            right_face: right_face.shift_right(thickness)?,
        })
    }

    /// Biconvex lens with circular faces.
    pub fn from_parameters(params: &LensParameters) -> Result<Self> {
        params.validate()?;
        let left = CircularArc::apex(params.left_radius)?.to_triplet()?;
        let right = CircularArc::mirrored_apex(params.right_radius)?.to_triplet()?;
        Self::new(params.thickness, left, right)
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn left_face(&self) -> &BoundedFunctionTriplet {
        &self.left_face
    }

    pub fn right_face(&self) -> &BoundedFunctionTriplet {
        &self.right_face
    }

    /// Locates the point where the faces cross.
    ///
    /// Over the overlap of both domains the left face rises and the right
    /// face falls, so their difference is increasing and its zero is found
    /// by bisection.
    pub fn rim(&self) -> Result<Rim> {
        let left = self.left_face.domain();
        let right = self.right_face.domain();
        let low = left.low.max(right.low);
        let high = left.high.min(right.high);
        if low >= high {
            return Err(RefractrError::config(format!(
                "Lens faces do not overlap: [{}, {}] and [{}, {}]",
                left.low, left.high, right.low, right.high
            )));
        }

        let left_fn = self.left_face.function();
        let right_fn = self.right_face.function();
        let difference: RealFn = Arc::new(move |x| left_fn(x) - right_fn(x));

        let (at_low, at_high) = (difference(low), difference(high));
        if !(at_low <= 0.0 && at_high >= 0.0) {
            return Err(RefractrError::config(format!(
                "Lens faces do not intersect between x = {} and x = {}",
                low, high
            )));
        }

        let x = if at_low == 0.0 {
            low
        } else if at_high == 0.0 {
            high
        } else {
            let crossing = generate_inverse(difference, low, high)?;
            crossing(0.0)?
        };
        let height = self.left_face.evaluate(x)?;
        Ok(Rim { x, height })
    }
}

fn check_apex(face: &BoundedFunctionTriplet, label: &str) -> Result<()> {
    let apex = face.evaluate(0.0).map_err(|_| {
        RefractrError::config(format!(
            "Required that the {} is defined at 0, domain is [{}, {}]",
            label,
            face.domain_low(),
            face.domain_high()
        ))
    })?;
    if !approx_eq(apex, 0.0) {
        return Err(RefractrError::config(format!(
            "Required that {}(0) [={}] = 0",
            label, apex
        )));
    }
    Ok(())
}

fn default_resolution() -> usize {
    1000
}

/// Everything the renderer needs: canvas size, where the left apex sits on
/// the canvas, how finely to sample, and the lens itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    #[serde(default = "default_resolution")]
    pub resolution: usize,
    pub lens: LensParameters,
}

impl SceneConfig {
    pub fn validate(&self) -> Result<()> {
        assert_strictly_positive(self.canvas_width, "canvas_width")?;
        assert_strictly_positive(self.canvas_height, "canvas_height")?;
        assert_strictly_positive(self.origin_x, "origin_x")?;
        assert_strictly_positive(self.origin_y, "origin_y")?;
        if self.origin_x >= self.canvas_width || self.origin_y >= self.canvas_height {
            return Err(RefractrError::config(format!(
                "Origin ({}, {}) lies outside the {}x{} canvas",
                self.origin_x, self.origin_y, self.canvas_width, self.canvas_height
            )));
        }
        if self.resolution == 0 {
            return Err(RefractrError::config("resolution must be greater than zero."));
        }
        self.lens.validate()
    }

    fn to_canvas(&self, x: f64, y: f64) -> [f64; 2] {
        [self.origin_x + x, self.origin_y - y]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<[f64; 2]>,
}

/// Canvas-space outline of a lens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LensDrawing {
    /// Bottom rim, left apex, top rim.
    pub left_face: Polyline,
    /// Bottom rim, right apex, top rim.
    pub right_face: Polyline,
    pub rim: Rim,
    /// The optical axis across the full canvas width.
    pub axis: Polyline,
}

pub fn render_lens(config: &SceneConfig) -> anyhow::Result<LensDrawing> {
    config.validate().context("Invalid scene configuration.")?;
    let lens = Lens::from_parameters(&config.lens).context("Failed to build lens faces.")?;
    let rim = lens.rim().context("Failed to locate the lens rim.")?;

    let mut left = sample_face(lens.left_face(), 0.0, rim.x, config.resolution)
        .context("Failed to sample the left face.")?;
    left.reverse();
    let right = sample_face(lens.right_face(), rim.x, lens.thickness(), config.resolution)
        .context("Failed to sample the right face.")?;

    let drawing = LensDrawing {
        left_face: outline(config, &left),
        right_face: outline(config, &right),
        rim,
        axis: Polyline {
            points: vec![[0.0, config.origin_y], [config.canvas_width, config.origin_y]],
        },
    };
    debug!(
        rim_x = rim.x,
        rim_height = rim.height,
        left_points = drawing.left_face.points.len(),
        right_points = drawing.right_face.points.len(),
        "rendered lens"
    );
    Ok(drawing)
}

/// Samples `face` over `[start, end]` in ascending x, always including `end`.
fn sample_face(
    face: &BoundedFunctionTriplet,
    start: f64,
    end: f64,
    resolution: usize,
) -> Result<Vec<(f64, f64)>> {
    let span = end - start;
    let step = (span / resolution as f64).max(MIN_SAMPLE_STEP);
    let count = (span / step).ceil() as usize;

    let mut samples = Vec::with_capacity(count + 1);
    for i in 0..count {
        let x = start + i as f64 * step;
        samples.push((x, face.evaluate(x)?));
    }
    samples.push((end, face.evaluate(end)?));
    Ok(samples)
}

/// `rim_to_apex` runs from the rim to the apex along the upper half; the
/// outline runs along its mirror image first, then back up.
fn outline(config: &SceneConfig, rim_to_apex: &[(f64, f64)]) -> Polyline {
    let lower = rim_to_apex.iter().map(|&(x, y)| config.to_canvas(x, -y));
    let upper = rim_to_apex
        .iter()
        .rev()
        .skip(1)
        .map(|&(x, y)| config.to_canvas(x, y));
    Polyline {
        points: lower.chain(upper).collect(),
    }
}
