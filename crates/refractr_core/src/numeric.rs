//! Tolerance-aware comparisons and the two numeric approximations
//! (central-difference derivative, bisection inverse) that back every
//! triplet whose derivative or inverse is not supplied analytically.

use crate::error::{RefractrError, Result};
use crate::traits::{FallibleFn, RealFn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{trace, warn};

/// Tolerance used wherever a call site does not pick its own.
pub const DEFAULT_TOLERANCE: f64 = 1e-11;

/// Step of the central-difference derivative.
pub const DERIVATIVE_STEP: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BisectionSettings {
    pub max_iterations: usize,
}

impl Default for BisectionSettings {
    fn default() -> Self {
        Self {
            max_iterations: 200,
        }
    }
}

/// True iff `|a - b| < tolerance`.
pub fn approx_equals(a: f64, b: f64, tolerance: f64) -> bool {
    (a < b + tolerance) && (a > b - tolerance)
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    approx_equals(a, b, DEFAULT_TOLERANCE)
}

pub fn assert_strictly_positive(n: f64, label: &str) -> Result<()> {
    if n > 0.0 {
        Ok(())
    } else {
        Err(RefractrError::config(format!(
            "Required that {} (={}) > 0",
            label, n
        )))
    }
}

/// Central-difference approximation of f'. Performs no domain check:
/// near the edges of f's domain `f(x ± h)` may be undefined.
pub fn generate_derivative(f: RealFn) -> RealFn {
    Arc::new(move |x: f64| {
        (f(x + DERIVATIVE_STEP) - f(x - DERIVATIVE_STEP)) / (2.0 * DERIVATIVE_STEP)
    })
}

/// Bisection inverse of `f` over `[x_start, x_end]` with default settings.
pub fn generate_inverse(f: RealFn, x_start: f64, x_end: f64) -> Result<FallibleFn> {
    generate_inverse_with(f, x_start, x_end, BisectionSettings::default())
}

/// Bisection inverse of `f` over `[x_start, x_end]`.
///
/// The bounds are validated here, before the first lookup. `f` must be
/// monotonic over the interval; only the endpoint values are checked.
pub fn generate_inverse_with(
    f: RealFn,
    x_start: f64,
    x_end: f64,
    settings: BisectionSettings,
) -> Result<FallibleFn> {
    if !x_start.is_finite() || !x_end.is_finite() {
        return Err(RefractrError::config(format!(
            "Domain bounds must be finite: ({}, {})",
            x_start, x_end
        )));
    }
    if x_end <= x_start {
        return Err(RefractrError::config(format!(
            "Invalid domain bounds: ({}, {})",
            x_start, x_end
        )));
    }
    if settings.max_iterations == 0 {
        return Err(RefractrError::config(
            "max_iterations must be greater than zero.",
        ));
    }

    let f_start = f(x_start);
    let f_end = f(x_end);
    if !f_start.is_finite() || !f_end.is_finite() {
        return Err(RefractrError::config(format!(
            "Function is not finite at the domain bounds: f({}) = {}, f({}) = {}",
            x_start, f_start, x_end, f_end
        )));
    }
    if f_start == f_end {
        return Err(RefractrError::config(
            "Expected a monotonic function, but end values are equal",
        ));
    }

    // `below` always maps to the smaller function value.
    let (below, above) = if f_start < f_end {
        (x_start, x_end)
    } else {
        (x_end, x_start)
    };

    Ok(Arc::new(move |y: f64| {
        bisect(f.as_ref(), y, below, above, settings.max_iterations)
    }))
}

fn bisect(
    f: &(dyn Fn(f64) -> f64 + Send + Sync),
    y: f64,
    mut below: f64,
    mut above: f64,
    max_iterations: usize,
) -> Result<f64> {
    let mut mid = 0.5 * (below + above);
    let mut iterations = 0usize;

    while iterations < max_iterations {
        iterations += 1;
        mid = 0.5 * (below + above);
        let value = f(mid);

        if approx_eq(value, y) {
            trace!(y, x = mid, iterations, "bisection converged");
            return Ok(mid);
        }

        // No representable midpoint left between the bracket ends.
        if mid == below || mid == above {
            break;
        }

        if y < value {
            above = mid;
        } else {
            below = mid;
        }
    }

    warn!(y, best = mid, iterations, "bisection did not converge");
    Err(RefractrError::Convergence {
        target: y,
        iterations,
        best: mid,
    })
}
