//! Named manifolds as they appear in sweep configurations.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use nsim_core::errors::{ErrorInfo, NsimError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::curves::{CirclePiece2d, Curve, HelixCurve3d, IdentityKd, SCurve2d};

/// Curve families that can be built from a manifold id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifoldKind {
    /// Straight line along the diagonal of the active coordinates.
    Identity,
    /// Circle arc in the first two coordinates.
    Circle,
    /// Two joined half circles.
    SCurve,
    /// Helix around the third axis.
    Helix,
}

impl ManifoldKind {
    /// All known kinds.
    pub const ALL: [ManifoldKind; 4] = [
        ManifoldKind::Identity,
        ManifoldKind::Circle,
        ManifoldKind::SCurve,
        ManifoldKind::Helix,
    ];

    /// Resolves a manifold id.
    pub fn from_id(id: &str) -> Result<Self, NsimError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == id)
            .ok_or_else(|| {
                NsimError::Geometry(
                    ErrorInfo::new("manifold.unknown", "unknown manifold id")
                        .with_context("manifold_id", id)
                        .with_hint("expected one of identity, circle, scurve, helix"),
                )
            })
    }

    /// Id used in configs and result paths.
    pub fn id(&self) -> &'static str {
        match self {
            ManifoldKind::Identity => "identity",
            ManifoldKind::Circle => "circle",
            ManifoldKind::SCurve => "scurve",
            ManifoldKind::Helix => "helix",
        }
    }

    /// Smallest ambient dimension the curve embeds into.
    pub fn min_features(&self) -> usize {
        match self {
            ManifoldKind::Identity => 1,
            ManifoldKind::Circle | ManifoldKind::SCurve => 2,
            ManifoldKind::Helix => 3,
        }
    }
}

impl fmt::Display for ManifoldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ManifoldKind {
    type Err = NsimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s)
    }
}

/// A manifold entry of a sweep configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifoldSpec {
    /// One of `identity`, `circle`, `scurve`, `helix`.
    pub manifold_id: String,
    /// Start of the parameter interval.
    #[serde(default)]
    pub start: f64,
    /// End of the parameter interval.
    pub end: f64,
    /// Active coordinates of an `identity` manifold; all of them when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_active_features: Option<usize>,
    /// Helix radius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Helix pitch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
}

impl ManifoldSpec {
    /// Spec over `[start, end]` with no curve-specific extras.
    pub fn new(manifold_id: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            manifold_id: manifold_id.into(),
            start,
            end,
            n_active_features: None,
            radius: None,
            pitch: None,
        }
    }

    /// Resolved kind of this entry.
    pub fn kind(&self) -> Result<ManifoldKind, NsimError> {
        ManifoldKind::from_id(&self.manifold_id)
    }

    /// Builds the curve embedded in `R^n_features`.
    pub fn build(&self, n_features: usize) -> Result<Box<dyn Curve>, NsimError> {
        let kind = self.kind()?;
        debug!(manifold = %kind, n_features, "building curve");
        let curve: Box<dyn Curve> = match kind {
            ManifoldKind::Identity => Box::new(IdentityKd::new(
                n_features,
                self.start,
                self.end,
                self.n_active_features,
            )?),
            ManifoldKind::Circle => {
                Box::new(CirclePiece2d::new(n_features, self.start, self.end)?)
            }
            ManifoldKind::SCurve => Box::new(SCurve2d::new(n_features, self.start, self.end)?),
            ManifoldKind::Helix => Box::new(HelixCurve3d::new(
                n_features,
                self.start,
                self.end,
                self.radius.unwrap_or(HelixCurve3d::DEFAULT_RADIUS),
                self.pitch.unwrap_or(HelixCurve3d::DEFAULT_PITCH),
            )?),
        };
        Ok(curve)
    }
}

/// The manifolds a sweep covers when the configuration names none.
pub fn default_manifolds() -> Vec<ManifoldSpec> {
    vec![
        ManifoldSpec::new(ManifoldKind::Identity.id(), 0.0, 1.0),
        ManifoldSpec::new(ManifoldKind::SCurve.id(), 0.0, PI),
        ManifoldSpec::new(ManifoldKind::Helix.id(), 0.0, 2.0 * PI),
    ]
}
