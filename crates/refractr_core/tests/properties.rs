//! Property-based tests for triplets and circular-arc profiles.

use proptest::prelude::*;
use refractr_core::{
    generate_derivative, generate_inverse, Branch, BoundedFunctionTriplet, CircularArc, RangeKind,
    RefractrError,
};

fn apex_triplet_without_inverse(radius: f64) -> BoundedFunctionTriplet {
    let arc = CircularArc::apex(radius).expect("arc");
    let (f, f_prime, _) = arc.functions();
    BoundedFunctionTriplet::builder()
        .function_fn(f)
        .derivative_fn(Some(f_prime))
        .domain(0.0, radius)
        .build()
        .expect("triplet")
}

proptest! {
    #[test]
    fn prop_arc_points_lie_on_circle(
        radius in 1.0f64..500.0,
        offset in -500.0f64..500.0,
        t in 0.001f64..0.999,
    ) {
        let arc = CircularArc::new(radius, offset).expect("arc");
        let x = offset - radius + 2.0 * radius * t;
        let y = arc.profile(x);
        let u = x - offset;
        prop_assert!((y * y + u * u - radius * radius).abs() < 1e-9 * radius * radius);
    }

    #[test]
    fn prop_inverse_round_trips_on_arc(radius in 10.0f64..500.0, t in 0.1f64..0.9) {
        let triplet = apex_triplet_without_inverse(radius);
        let x = radius * t;
        let y = triplet.evaluate(x).expect("value");
        let back = triplet.inverse(y).expect("inverse");
        prop_assert!((back - x).abs() < 1e-6, "x = {}, back = {}", x, back);
    }

    #[test]
    fn prop_inverse_round_trips_on_cubic(x in -5.0f64..=5.0) {
        let triplet = BoundedFunctionTriplet::new(|x| x * x * x + x, -5.0, 5.0).expect("triplet");
        let y = triplet.evaluate(x).expect("value");
        let back = triplet.inverse(y).expect("inverse");
        prop_assert!((back - x).abs() < 1e-6);
    }

    #[test]
    fn prop_analytic_slope_matches_central_difference(radius in 10.0f64..100.0, t in 0.05f64..0.95) {
        let triplet = apex_triplet_without_inverse(radius);
        let numeric = generate_derivative(triplet.function());
        let x = radius * t;
        let analytic = triplet.derivative(x).expect("slope");
        prop_assert!((analytic - numeric(x)).abs() < 1e-3);
    }

    #[test]
    fn prop_arguments_outside_domain_are_rejected(radius in 1.0f64..500.0, excess in 1e-6f64..1e3) {
        let triplet = apex_triplet_without_inverse(radius);
        for x in [-excess, radius + excess] {
            match triplet.evaluate(x) {
                Err(RefractrError::Domain { kind, .. }) => prop_assert_eq!(kind, RangeKind::Domain),
                other => prop_assert!(false, "expected domain error, got {:?}", other),
            }
        }
    }

    #[test]
    fn prop_shift_right_translates(
        radius in 10.0f64..200.0,
        delta in -1000.0f64..1000.0,
        t in 0.01f64..0.99,
    ) {
        let original = apex_triplet_without_inverse(radius);
        let shifted = original.shift_right(delta).expect("shift");
        prop_assert_eq!(shifted.domain_low(), delta);
        prop_assert_eq!(shifted.domain_high(), radius + delta);

        let x = radius * t;
        let expected = original.evaluate(x).expect("value");
        let actual = shifted.evaluate(x + delta).expect("shifted value");
        prop_assert!((actual - expected).abs() < 1e-6);
    }

    #[test]
    fn prop_shift_right_handles_offset_arcs(
        radius in 10.0f64..500.0,
        offset in -500.0f64..500.0,
        delta in -1000.0f64..1000.0,
        falling in any::<bool>(),
        t in 0.1f64..0.9,
    ) {
        let branch = if falling { Branch::Falling } else { Branch::Rising };
        let original = CircularArc::new(radius, offset)
            .expect("arc")
            .with_branch(branch)
            .to_triplet()
            .expect("triplet");
        let shifted = original.shift_right(delta).expect("shift");

        let low = shifted.evaluate(shifted.domain_low()).expect("low end");
        let high = shifted.evaluate(shifted.domain_high()).expect("high end");
        prop_assert!(low.is_finite() && high.is_finite());

        let x = original.domain_low() + (original.domain_high() - original.domain_low()) * t;
        let y = original.evaluate(x).expect("value");
        let back = shifted.inverse(y).expect("shifted inverse");
        prop_assert!((back - (x + delta)).abs() < 1e-6, "x = {}, back = {}", x + delta, back);
    }

    #[test]
    fn prop_equal_bounds_are_rejected(bound in -1e6f64..1e6) {
        prop_assert!(matches!(
            BoundedFunctionTriplet::new(|x| x, bound, bound),
            Err(RefractrError::Configuration(_))
        ));
    }

    #[test]
    fn prop_symmetric_functions_are_rejected(scale in 0.1f64..10.0) {
        let result = BoundedFunctionTriplet::new(move |x| scale * (x - 5.0) * (x - 5.0), 0.0, 10.0);
        prop_assert!(matches!(result, Err(RefractrError::Configuration(_))));
        let inverse = generate_inverse(refractr_core::real_fn(move |x| scale * (x - 5.0).abs()), 0.0, 10.0);
        prop_assert!(matches!(inverse, Err(RefractrError::Configuration(_))));
    }
}
