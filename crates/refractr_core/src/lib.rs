pub mod curves;
pub mod error;
pub mod lens;
pub mod numeric;
/// The `refractr_core` crate provides the numeric engine behind the Refractr
/// lens drawing.
///
/// Key components:
/// - **Numeric kernel**: tolerance-aware comparisons, central-difference
///   derivatives and bisection inverses.
/// - **Triplets**: `BoundedFunctionTriplet`, a strictly monotonic function
///   over a finite domain with its derivative and inverse, guarded on every call.
/// - **Curves**: circular-arc face profiles with analytic derivative and inverse.
/// - **Validation**: checkpoint self-tests for any `FunctionTriplet`.
/// - **Lens**: two faces assembled into a lens and rendered to canvas polylines.
pub mod traits;
pub mod triplet;
pub mod validation;

pub use curves::{circular_arc, Branch, CircularArc, CircularArcParameters};
pub use error::{CheckKind, RangeKind, RefractrError, Result};
pub use lens::{render_lens, Lens, LensDrawing, LensParameters, Polyline, Rim, SceneConfig};
pub use numeric::{
    approx_eq, approx_equals, assert_strictly_positive, generate_derivative, generate_inverse,
    generate_inverse_with, BisectionSettings, DEFAULT_TOLERANCE,
};
pub use traits::{real_fn, FallibleFn, FunctionTriplet, RealFn};
pub use triplet::{make_bounded_function_triplet, BoundedFunctionTriplet, Interval, TripletBuilder};
pub use validation::{
    validate_triplet, Checkpoint, CheckpointSet, ClosureTriplet, ValidatedTriplet,
};
