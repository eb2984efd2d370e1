use crate::error::Result;
use std::sync::Arc;

/// A plain real-valued mapping, shared by reference between triplets.
pub type RealFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// A real-valued mapping that can fail, such as a bisection inverse.
pub type FallibleFn = Arc<dyn Fn(f64) -> Result<f64> + Send + Sync>;

/// Wraps a closure as a [`RealFn`].
pub fn real_fn<F>(f: F) -> RealFn
where
    F: Fn(f64) -> f64 + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A function bundled with its derivative and its inverse.
///
/// Implementors decide how their arguments are guarded; the checkpoint
/// validator only relies on these three calls.
pub trait FunctionTriplet {
    /// Evaluates f(x).
    fn evaluate(&self, x: f64) -> Result<f64>;

    /// Evaluates f'(x).
    fn derivative(&self, x: f64) -> Result<f64>;

    /// Evaluates the x for which f(x) = y.
    fn inverse(&self, y: f64) -> Result<f64>;
}
