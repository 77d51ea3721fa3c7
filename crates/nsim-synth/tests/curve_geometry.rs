use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::{DMatrix, DVector};
use nsim_synth::{
    evenly_spaced, CirclePiece2d, CircleSegmentBuilder, Curve, HelixCurve3d, IdentityKd, SCurve2d,
    SegmentTurn,
};
use proptest::prelude::*;

const TOL: f64 = 1e-9;

fn assert_unit_speed(curve: &dyn Curve, t: f64) {
    let speed = curve.tangent(t).norm();
    assert!((speed - 1.0).abs() < TOL, "speed {speed} at t={t}");
}

fn assert_normal_frame(curve: &dyn Curve, t: f64) {
    let normal = curve.normal(t);
    let dim = curve.n_features();
    assert_eq!(normal.shape(), (dim, dim - 1));
    let gram = normal.transpose() * &normal;
    assert!((gram - DMatrix::<f64>::identity(dim - 1, dim - 1)).norm() < TOL);
    let tangent = curve.tangent(t);
    assert!((normal.transpose() * tangent).norm() < TOL);
}

fn finite_difference(curve: &dyn Curve, t: f64) -> DVector<f64> {
    let h = 1e-6;
    (curve.basepoint(t + h) - curve.basepoint(t - h)) / (2.0 * h)
}

fn sample_curves() -> Vec<Box<dyn Curve>> {
    vec![
        Box::new(IdentityKd::new(5, 0.0, 1.0, None).unwrap()),
        Box::new(IdentityKd::new(5, 0.0, 1.0, Some(3)).unwrap()),
        Box::new(CirclePiece2d::new(3, 0.0, PI).unwrap()),
        Box::new(SCurve2d::new(4, 0.0, PI).unwrap()),
        Box::new(HelixCurve3d::new(4, 0.0, 2.0 * PI, 1.0, 1.0).unwrap()),
        Box::new(HelixCurve3d::new(3, 0.0, 2.0 * PI, 2.0, 0.5).unwrap()),
    ]
}

#[test]
fn curves_are_arc_length_parameterised() {
    for curve in sample_curves() {
        for (t, _) in evenly_spaced(curve.as_ref(), 17) {
            assert_unit_speed(curve.as_ref(), t);
        }
    }
}

#[test]
fn normal_spaces_are_orthonormal_complements() {
    for curve in sample_curves() {
        for (t, _) in evenly_spaced(curve.as_ref(), 9) {
            assert_normal_frame(curve.as_ref(), t);
        }
    }
}

#[test]
fn tangents_match_finite_differences() {
    for curve in sample_curves() {
        for t in [0.3, 0.9, 1.4] {
            let diff = finite_difference(curve.as_ref(), t) - curve.tangent(t);
            assert!(diff.norm() < 1e-6, "{curve:?} at t={t}");
        }
    }
}

#[test]
fn scurve_is_continuous_at_the_join() {
    let curve = SCurve2d::new(2, 0.0, PI).unwrap();
    let before = curve.basepoint(FRAC_PI_2 - 1e-9);
    let after = curve.basepoint(FRAC_PI_2 + 1e-9);
    assert!((before - after).norm() < 1e-6);
    let joint = curve.basepoint(FRAC_PI_2);
    assert!((joint[0] - 1.0).abs() < TOL && joint[1].abs() < TOL);
}

#[test]
fn helix_curvature_lies_in_the_plane() {
    let helix = HelixCurve3d::new(3, 0.0, 2.0 * PI, 1.0, 1.0).unwrap();
    let curvature = helix.curvature_vector(1.1).unwrap();
    assert_eq!(curvature[2], 0.0);
    // a / (a^2 + b^2) for a = b = 1.
    assert!((curvature.norm() - 0.5).abs() < TOL);
    assert!(curvature.dot(&helix.tangent(1.1)).abs() < TOL);
}

#[test]
fn circle_curvature_points_inward() {
    let circle = CirclePiece2d::new(2, 0.0, 2.0 * PI).unwrap();
    let t = 0.7;
    let curvature = circle.curvature_vector(t).unwrap();
    assert!((curvature + circle.basepoint(t)).norm() < TOL);
}

#[test]
fn segment_chain_closes_a_unit_circle() {
    let turns = vec![
        SegmentTurn::new(1, 0),
        SegmentTurn::new(1, 1),
        SegmentTurn::new(-1, 0),
        SegmentTurn::new(-1, 1),
        SegmentTurn::new(1, 0),
    ];
    let chain = CircleSegmentBuilder::new(turns, 3).unwrap();
    assert_eq!(chain.segments(), 4);
    assert!((chain.length() - 2.0 * PI).abs() < TOL);
    assert!(chain.basepoint(0.0).norm() < TOL);
    assert!(chain.basepoint(chain.end()).norm() < TOL);
    for k in 1..4 {
        let t = k as f64 * FRAC_PI_2;
        let gap = chain.basepoint(t - 1e-9) - chain.basepoint(t + 1e-9);
        assert!(gap.norm() < 1e-6, "jump at segment boundary {k}");
        assert_unit_speed(&chain, t - 0.1);
    }
    let centre = DVector::from_vec(vec![0.0, 1.0, 0.0]);
    for (_, point) in evenly_spaced(&chain, 13) {
        assert!(((point - &centre).norm() - 1.0).abs() < TOL);
    }
}

#[test]
fn constructors_reject_bad_geometry() {
    assert_eq!(
        HelixCurve3d::new(2, 0.0, 1.0, 1.0, 1.0).unwrap_err().info().code,
        "curve.dim"
    );
    assert_eq!(
        IdentityKd::new(3, 0.0, 1.0, Some(4)).unwrap_err().info().code,
        "curve.active"
    );
    assert_eq!(
        CirclePiece2d::new(2, 0.0, f64::INFINITY).unwrap_err().info().code,
        "curve.interval"
    );
    assert_eq!(
        HelixCurve3d::new(3, 0.0, 1.0, 0.0, 1.0).unwrap_err().info().code,
        "curve.helix"
    );
    let repeated = vec![SegmentTurn::new(1, 0), SegmentTurn::new(-1, 0)];
    assert!(CircleSegmentBuilder::new(repeated, 2).is_err());
    let out_of_range = vec![SegmentTurn::new(1, 0), SegmentTurn::new(1, 2)];
    assert!(CircleSegmentBuilder::new(out_of_range, 2).is_err());
}

#[test]
fn evenly_spaced_hits_both_ends() {
    let curve = IdentityKd::new(2, 0.0, 1.0, None).unwrap();
    let points = evenly_spaced(&curve, 5);
    assert_eq!(points.len(), 5);
    assert_eq!(points[0].0, 0.0);
    assert_eq!(points[4].0, 1.0);
    assert_eq!(evenly_spaced(&curve, 1).len(), 1);
    assert!(evenly_spaced(&curve, 0).is_empty());
}

proptest! {
    #[test]
    fn helix_stays_on_its_cylinder(t in -10.0f64..10.0, radius in 0.1f64..5.0, pitch in 0.0f64..5.0) {
        let helix = HelixCurve3d::new(3, 0.0, 1.0, radius, pitch).unwrap();
        let point = helix.basepoint(t);
        let planar = (point[0] * point[0] + point[1] * point[1]).sqrt();
        prop_assert!((planar - radius).abs() < 1e-9);
        prop_assert!((helix.tangent(t).norm() - 1.0).abs() < 1e-9);
    }
}
