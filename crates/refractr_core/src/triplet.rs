use crate::error::{RangeKind, RefractrError, Result};
use crate::numeric::{generate_derivative, generate_inverse_with, BisectionSettings};
use crate::traits::{FallibleFn, FunctionTriplet, RealFn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A closed interval `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub low: f64,
    pub high: f64,
}

impl Interval {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    pub(crate) fn guard(&self, value: f64, kind: RangeKind) -> Result<()> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(RefractrError::Domain {
                value,
                low: self.low,
                high: self.high,
                kind,
            })
        }
    }
}

/// A strictly monotonic function over a finite domain, bundled with its
/// derivative and inverse.
///
/// The codomain is deduced from the values at the domain ends. Every call
/// is checked against the domain (or codomain, for `inverse`); arguments
/// out of range are reported, never clamped. Triplets are immutable and
/// cheap to clone.
#[derive(Clone)]
pub struct BoundedFunctionTriplet {
    domain: Interval,
    codomain: Interval,
    function: RealFn,
    derivative: RealFn,
    inverse: FallibleFn,
    settings: BisectionSettings,
}

impl fmt::Debug for BoundedFunctionTriplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedFunctionTriplet")
            .field("domain", &self.domain)
            .field("codomain", &self.codomain)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Builder for [`BoundedFunctionTriplet`]. The function and the domain are
/// required; a missing derivative or inverse is approximated numerically.
#[derive(Default)]
pub struct TripletBuilder {
    function: Option<RealFn>,
    derivative: Option<RealFn>,
    inverse: Option<RealFn>,
    domain: Option<(f64, f64)>,
    settings: BisectionSettings,
}

impl TripletBuilder {
    pub fn function<F>(mut self, f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.function = Some(Arc::new(f));
        self
    }

    pub fn derivative<F>(mut self, f_prime: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.derivative = Some(Arc::new(f_prime));
        self
    }

    pub fn inverse<F>(mut self, f_inverse: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.inverse = Some(Arc::new(f_inverse));
        self
    }

    pub fn function_fn(mut self, f: RealFn) -> Self {
        self.function = Some(f);
        self
    }

    pub fn derivative_fn(mut self, f_prime: Option<RealFn>) -> Self {
        self.derivative = f_prime;
        self
    }

    pub fn inverse_fn(mut self, f_inverse: Option<RealFn>) -> Self {
        self.inverse = f_inverse;
        self
    }

    pub fn domain(mut self, d1: f64, d2: f64) -> Self {
        self.domain = Some((d1, d2));
        self
    }

    pub fn bisection(mut self, settings: BisectionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Result<BoundedFunctionTriplet> {
        let function = self
            .function
            .ok_or_else(|| RefractrError::config("f is missing"))?;
        let (d1, d2) = self
            .domain
            .ok_or_else(|| RefractrError::config("domain is missing"))?;

        if !d1.is_finite() || !d2.is_finite() {
            return Err(RefractrError::config(format!(
                "Domain bounds must be finite: [{}, {}]",
                d1, d2
            )));
        }
        if d1 >= d2 {
            return Err(RefractrError::config(format!(
                "Required that d1 [{}] < d2 [{}]",
                d1, d2
            )));
        }

        let c1 = function(d1);
        let c2 = function(d2);
        if !c1.is_finite() || !c2.is_finite() {
            return Err(RefractrError::config(format!(
                "f is not finite at the domain bounds: f({}) = {}, f({}) = {}",
                d1, c1, d2, c2
            )));
        }
        if c1 == c2 {
            return Err(RefractrError::config("f is not strictly monotonic"));
        }
        let codomain = if c1 < c2 {
            Interval::new(c1, c2)
        } else {
            Interval::new(c2, c1)
        };

        let derivative = match self.derivative {
            Some(f_prime) => f_prime,
            None => generate_derivative(function.clone()),
        };
        let inverse: FallibleFn = match self.inverse {
            Some(f_inverse) => Arc::new(move |y: f64| Ok(f_inverse(y))),
            None => generate_inverse_with(function.clone(), d1, d2, self.settings)?,
        };

        debug!(
            d1,
            d2,
            c1 = codomain.low,
            c2 = codomain.high,
            "constructed bounded function triplet"
        );

        Ok(BoundedFunctionTriplet {
            domain: Interval::new(d1, d2),
            codomain,
            function,
            derivative,
            inverse,
            settings: self.settings,
        })
    }
}

/// Builds a triplet from a function, an optional analytic derivative and
/// inverse, and the domain `[d1, d2]`.
pub fn make_bounded_function_triplet(
    f: RealFn,
    f_prime: Option<RealFn>,
    f_inverse: Option<RealFn>,
    d1: f64,
    d2: f64,
) -> Result<BoundedFunctionTriplet> {
    BoundedFunctionTriplet::builder()
        .function_fn(f)
        .derivative_fn(f_prime)
        .inverse_fn(f_inverse)
        .domain(d1, d2)
        .build()
}

impl BoundedFunctionTriplet {
    pub fn builder() -> TripletBuilder {
        TripletBuilder::default()
    }

    /// Triplet with numerically approximated derivative and inverse.
    pub fn new<F>(f: F, d1: f64, d2: f64) -> Result<Self>
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::builder().function(f).domain(d1, d2).build()
    }

    pub fn domain(&self) -> Interval {
        self.domain
    }

    pub fn codomain(&self) -> Interval {
        self.codomain
    }

    pub fn domain_low(&self) -> f64 {
        self.domain.low
    }

    pub fn domain_high(&self) -> f64 {
        self.domain.high
    }

    pub fn evaluate(&self, x: f64) -> Result<f64> {
        self.domain.guard(x, RangeKind::Domain)?;
        Ok((self.function)(x))
    }

    pub fn derivative(&self, x: f64) -> Result<f64> {
        self.domain.guard(x, RangeKind::Domain)?;
        Ok((self.derivative)(x))
    }

    pub fn inverse(&self, y: f64) -> Result<f64> {
        self.codomain.guard(y, RangeKind::Codomain)?;
        (self.inverse)(y)
    }

    /// The unguarded function, for callers that compose it further.
    pub fn function(&self) -> RealFn {
        self.function.clone()
    }

    /// Translates the triplet horizontally by `delta`.
    ///
    /// The derivative and inverse are regenerated numerically against the
    /// shifted function rather than translated, so they can differ from an
    /// exact translation at the scale of the derivative step.
    pub fn shift_right(&self, delta: f64) -> Result<Self> {
        if !delta.is_finite() {
            return Err(RefractrError::config(format!(
                "Shift must be finite, got {}",
                delta
            )));
        }

        let function = self.function.clone();
        let original = self.domain;
        let d1 = original.low + delta;
        let d2 = original.high + delta;
        let target = Interval::new(d1, d2);
        // Inside the shifted domain, `x - delta` may round just past the
        // original bounds; pin it back so `f` never sees an unreachable point.
        let shifted: RealFn = Arc::new(move |x: f64| {
            let back = x - delta;
            if target.contains(x) {
                function(back.clamp(original.low, original.high))
            } else {
                function(back)
            }
        });

        Self::builder()
            .derivative_fn(Some(generate_derivative(shifted.clone())))
            .function_fn(shifted)
            .domain(d1, d2)
            .bisection(self.settings)
            .build()
    }
}

impl FunctionTriplet for BoundedFunctionTriplet {
    fn evaluate(&self, x: f64) -> Result<f64> {
        BoundedFunctionTriplet::evaluate(self, x)
    }

    fn derivative(&self, x: f64) -> Result<f64> {
        BoundedFunctionTriplet::derivative(self, x)
    }

    fn inverse(&self, y: f64) -> Result<f64> {
        BoundedFunctionTriplet::inverse(self, y)
    }
}
