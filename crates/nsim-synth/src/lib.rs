//! Synthetic problem geometry for NSIM experiments.
//!
//! Test curves are arc-length parameterised embeddings `gamma: [start, end] -> R^D`
//! together with their tangent and normal spaces. A [`ManifoldSpec`] names one
//! of them the way the sweep configuration does (`identity`, `circle`,
//! `scurve`, `helix`).

pub mod curves;
pub mod linalg;
pub mod manifold;

pub use curves::{
    evenly_spaced, CirclePiece2d, CircleSegmentBuilder, Curve, HelixCurve3d, IdentityKd, SCurve2d,
    SegmentTurn,
};
pub use linalg::orthonormal_complement;
pub use manifold::{default_manifolds, ManifoldKind, ManifoldSpec};
