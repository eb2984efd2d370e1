use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which range a guarded argument was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeKind {
    Domain,
    Codomain,
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeKind::Domain => write!(f, "domain"),
            RangeKind::Codomain => write!(f, "codomain"),
        }
    }
}

/// Which of the three checkpoint checks failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckKind {
    Value,
    Derivative,
    Inverse,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::Value => write!(f, "value"),
            CheckKind::Derivative => write!(f, "derivative"),
            CheckKind::Inverse => write!(f, "inverse"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RefractrError {
    /// Invalid construction input. Never retried.
    #[error("{0}")]
    Configuration(String),

    /// Argument outside the validated domain or codomain at call time.
    #[error("{value} not within {kind} [{low}, {high}]")]
    Domain {
        value: f64,
        low: f64,
        high: f64,
        kind: RangeKind,
    },

    #[error("{check} check failed at x = {x}: expected {expected}, got {actual}")]
    ValidationMismatch {
        check: CheckKind,
        x: f64,
        expected: f64,
        actual: f64,
    },

    #[error("bisection for y = {target} did not converge in {iterations} iterations (best x = {best})")]
    Convergence {
        target: f64,
        iterations: usize,
        best: f64,
    },
}

impl RefractrError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        RefractrError::Configuration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, RefractrError>;
