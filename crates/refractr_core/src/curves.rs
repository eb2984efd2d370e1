//! Parameterised curve families used as lens face profiles.

use crate::error::{RangeKind, RefractrError, Result};
use crate::numeric::assert_strictly_positive;
use crate::traits::{FunctionTriplet, RealFn};
use crate::triplet::{BoundedFunctionTriplet, Interval};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which monotonic half of a semicircle a profile follows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    /// `[d - R, d]`, climbing from the rim to the top.
    #[default]
    Rising,
    /// `[d, d + R]`, descending from the top to the rim.
    Falling,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircularArcParameters {
    pub radius: f64,
    pub offset: f64,
    #[serde(default)]
    pub branch: Branch,
}

/// Upper semicircle of radius `R` centred horizontally at `d`:
/// `f(x) = sqrt(R² - (x - d)²)` over `[d - R, d + R]`.
///
/// The inverse is only meaningful on one monotonic half, so every arc
/// carries the [`Branch`] its inverse refers to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CircularArcParameters", into = "CircularArcParameters")]
pub struct CircularArc {
    radius: f64,
    offset: f64,
    branch: Branch,
}

impl TryFrom<CircularArcParameters> for CircularArc {
    type Error = RefractrError;

    fn try_from(params: CircularArcParameters) -> Result<Self> {
        Ok(CircularArc::new(params.radius, params.offset)?.with_branch(params.branch))
    }
}

impl From<CircularArc> for CircularArcParameters {
    fn from(arc: CircularArc) -> Self {
        Self {
            radius: arc.radius,
            offset: arc.offset,
            branch: arc.branch,
        }
    }
}

/// The `circular_arc(R, d)` factory: a rising arc of radius `R` centred at `d`.
pub fn circular_arc(radius: f64, offset: f64) -> Result<CircularArc> {
    CircularArc::new(radius, offset)
}

impl CircularArc {
    pub fn new(radius: f64, offset: f64) -> Result<Self> {
        if !radius.is_finite() {
            return Err(RefractrError::config(format!(
                "Required that radius (={}) is finite",
                radius
            )));
        }
        assert_strictly_positive(radius, "radius")?;
        if !offset.is_finite() {
            return Err(RefractrError::config(format!(
                "Required that offset (={}) is finite",
                offset
            )));
        }
        Ok(Self {
            radius,
            offset,
            branch: Branch::Rising,
        })
    }

    /// Face profile with its origin at the lens apex: rises from `(0, 0)`
    /// to `(R, R)`.
    pub fn apex(radius: f64) -> Result<Self> {
        Self::new(radius, radius)
    }

    /// Mirror image of [`CircularArc::apex`]: falls from `(-R, R)` to
    /// `(0, 0)`.
    pub fn mirrored_apex(radius: f64) -> Result<Self> {
        Ok(Self::new(radius, -radius)?.with_branch(Branch::Falling))
    }

    pub fn with_branch(mut self, branch: Branch) -> Self {
        self.branch = branch;
        self
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn branch(&self) -> Branch {
        self.branch
    }

    pub fn parameters(&self) -> CircularArcParameters {
        CircularArcParameters::from(*self)
    }

    /// `[d - R, d + R]`, where the profile is defined.
    pub fn full_domain(&self) -> Interval {
        Interval::new(self.offset - self.radius, self.offset + self.radius)
    }

    /// The monotonic half selected by the branch.
    pub fn branch_domain(&self) -> Interval {
        match self.branch {
            Branch::Rising => Interval::new(self.offset - self.radius, self.offset),
            Branch::Falling => Interval::new(self.offset, self.offset + self.radius),
        }
    }

    pub fn codomain(&self) -> Interval {
        Interval::new(0.0, self.radius)
    }

    /// `x - d`, pinned to `[-R, R]` for any `x` inside the full domain so
    /// the rounded ends `d ± R` land exactly on the circle.
    fn centred(&self, x: f64) -> f64 {
        let u = x - self.offset;
        if self.full_domain().contains(x) {
            u.clamp(-self.radius, self.radius)
        } else {
            u
        }
    }

    pub fn profile(&self, x: f64) -> f64 {
        let u = self.centred(x);
        ((self.radius - u) * (self.radius + u)).sqrt()
    }

    /// Exact derivative of the profile; infinite at `x = d ± R`.
    pub fn slope(&self, x: f64) -> f64 {
        let u = self.centred(x);
        -u / ((self.radius - u) * (self.radius + u)).sqrt()
    }

    /// Inverse of the profile on the selected branch, for `y ∈ [0, R]`.
    pub fn profile_inverse(&self, y: f64) -> f64 {
        let half_chord = ((self.radius - y) * (self.radius + y)).sqrt();
        match self.branch {
            Branch::Rising => self.offset - half_chord,
            Branch::Falling => self.offset + half_chord,
        }
    }

    /// The raw `(f, f', f⁻¹)` closures, unguarded.
    pub fn functions(&self) -> (RealFn, RealFn, RealFn) {
        let arc = *self;
        (
            Arc::new(move |x| arc.profile(x)),
            Arc::new(move |x| arc.slope(x)),
            Arc::new(move |y| arc.profile_inverse(y)),
        )
    }

    /// Bounded triplet over the branch domain with the analytic derivative
    /// and inverse attached.
    pub fn to_triplet(&self) -> Result<BoundedFunctionTriplet> {
        let (f, f_prime, f_inverse) = self.functions();
        let domain = self.branch_domain();
        BoundedFunctionTriplet::builder()
            .function_fn(f)
            .derivative_fn(Some(f_prime))
            .inverse_fn(Some(f_inverse))
            .domain(domain.low, domain.high)
            .build()
    }
}

impl FunctionTriplet for CircularArc {
    fn evaluate(&self, x: f64) -> Result<f64> {
        self.full_domain().guard(x, RangeKind::Domain)?;
        Ok(self.profile(x))
    }

    fn derivative(&self, x: f64) -> Result<f64> {
        self.full_domain().guard(x, RangeKind::Domain)?;
        Ok(self.slope(x))
    }

    fn inverse(&self, y: f64) -> Result<f64> {
        self.codomain().guard(y, RangeKind::Codomain)?;
        Ok(self.profile_inverse(y))
    }
}
