//! Design-time self-test for function triplets.
//!
//! A triplet is checked against literal `(x, y)` checkpoints: the value,
//! a finite-difference tangent against the derivative, and the inverse
//! at `y`. Validation runs once per configured curve, not per sample.

use crate::error::{CheckKind, RefractrError, Result};
use crate::numeric::{approx_eq, approx_equals};
use crate::traits::{FunctionTriplet, RealFn};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tolerance for the value and derivative checks. The tangent step is its
/// square.
pub const CHECKPOINT_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub x: f64,
    pub y: f64,
}

impl Checkpoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Ordered, non-empty sequence of checkpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckpointSet {
    points: Vec<Checkpoint>,
}

impl CheckpointSet {
    pub fn new(points: Vec<Checkpoint>) -> Result<Self> {
        if points.is_empty() {
            return Err(RefractrError::config("No checkpoints provided"));
        }
        Ok(Self { points })
    }

    pub fn from_pairs(pairs: &[[f64; 2]]) -> Result<Self> {
        Self::new(pairs.iter().map(|&[x, y]| Checkpoint::new(x, y)).collect())
    }

    pub fn points(&self) -> &[Checkpoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Three bare closures with no guarding of their own.
#[derive(Clone)]
pub struct ClosureTriplet {
    function: RealFn,
    derivative: RealFn,
    inverse: RealFn,
}

impl ClosureTriplet {
    pub fn new(function: RealFn, derivative: RealFn, inverse: RealFn) -> Self {
        Self {
            function,
            derivative,
            inverse,
        }
    }
}

impl FunctionTriplet for ClosureTriplet {
    fn evaluate(&self, x: f64) -> Result<f64> {
        Ok((self.function)(x))
    }

    fn derivative(&self, x: f64) -> Result<f64> {
        Ok((self.derivative)(x))
    }

    fn inverse(&self, y: f64) -> Result<f64> {
        Ok((self.inverse)(y))
    }
}

/// Checks `triplet` against every checkpoint in order and stops at the
/// first mismatch.
pub fn validate_triplet<T>(triplet: &T, checkpoints: &CheckpointSet) -> Result<()>
where
    T: FunctionTriplet + ?Sized,
{
    for checkpoint in checkpoints.points() {
        validate_checkpoint(triplet, *checkpoint)?;
    }
    Ok(())
}

fn validate_checkpoint<T>(triplet: &T, checkpoint: Checkpoint) -> Result<()>
where
    T: FunctionTriplet + ?Sized,
{
    let Checkpoint { x, y } = checkpoint;

    let value = triplet.evaluate(x)?;
    if !approx_equals(value, y, CHECKPOINT_TOLERANCE) {
        return Err(RefractrError::ValidationMismatch {
            check: CheckKind::Value,
            x,
            expected: value,
            actual: y,
        });
    }

    let tangent = tangent_at(triplet, x, value)?;
    let slope = triplet.derivative(x)?;
    debug!(x, y, value, slope, tangent, "checking checkpoint");
    if !slopes_agree(slope, tangent) {
        return Err(RefractrError::ValidationMismatch {
            check: CheckKind::Derivative,
            x,
            expected: tangent,
            actual: slope,
        });
    }

    let inverse = triplet.inverse(y)?;
    if !approx_eq(inverse, x) {
        return Err(RefractrError::ValidationMismatch {
            check: CheckKind::Inverse,
            x,
            expected: x,
            actual: inverse,
        });
    }

    Ok(())
}

/// Forward difference, falling back to a backward difference when the
/// step leaves a guarded domain.
fn tangent_at<T>(triplet: &T, x: f64, value: f64) -> Result<f64>
where
    T: FunctionTriplet + ?Sized,
{
    let step = CHECKPOINT_TOLERANCE * CHECKPOINT_TOLERANCE;
    match triplet.evaluate(x + step) {
        Ok(ahead) => Ok((ahead - value) / step),
        Err(RefractrError::Domain { .. }) => {
            let behind = triplet.evaluate(x - step)?;
            Ok((value - behind) / step)
        }
        Err(err) => Err(err),
    }
}

/// An infinite slope (vertical tangent at a rim) matches any steep tangent
/// of the same sign.
fn slopes_agree(slope: f64, tangent: f64) -> bool {
    if slope.is_infinite() {
        tangent.signum() == slope.signum() && tangent.abs() >= 1.0 / CHECKPOINT_TOLERANCE
    } else {
        approx_equals(slope, tangent, CHECKPOINT_TOLERANCE)
    }
}

/// A triplet that passed [`validate_triplet`] when it was wrapped.
#[derive(Debug, Clone)]
pub struct ValidatedTriplet<T> {
    inner: T,
}

impl<T: FunctionTriplet> ValidatedTriplet<T> {
    pub fn new(inner: T, checkpoints: &CheckpointSet) -> Result<Self> {
        validate_triplet(&inner, checkpoints)?;
        Ok(Self { inner })
    }

    pub fn get(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: FunctionTriplet> FunctionTriplet for ValidatedTriplet<T> {
    fn evaluate(&self, x: f64) -> Result<f64> {
        self.inner.evaluate(x)
    }

    fn derivative(&self, x: f64) -> Result<f64> {
        self.inner.derivative(x)
    }

    fn inverse(&self, y: f64) -> Result<f64> {
        self.inner.inverse(y)
    }
}
