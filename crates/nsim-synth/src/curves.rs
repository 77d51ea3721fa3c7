//! Example curves. `IdentityKd` yields a single index model; the others have
//! nonzero curvature. `CircleSegmentBuilder` chains quarter circles.

use std::f64::consts::FRAC_PI_2;
use std::fmt::Debug;

use nalgebra::{DMatrix, DVector};
use nsim_core::errors::{ErrorInfo, NsimError};

use crate::linalg::orthonormal_complement;

fn geometry_error(code: &str, message: impl Into<String>) -> NsimError {
    NsimError::Geometry(ErrorInfo::new(code, message))
}

fn require_features(curve: &str, n_features: usize, needed: usize) -> Result<(), NsimError> {
    if n_features < needed {
        return Err(NsimError::Geometry(
            ErrorInfo::new(
                "curve.dim",
                format!("{curve} needs at least {needed} features"),
            )
            .with_context("n_features", n_features.to_string()),
        ));
    }
    Ok(())
}

fn require_interval(start: f64, end: f64) -> Result<(), NsimError> {
    if !start.is_finite() || !end.is_finite() {
        return Err(geometry_error(
            "curve.interval",
            "curve interval bounds must be finite",
        ));
    }
    Ok(())
}

/// A curve `gamma: [start, end] -> R^D` parameterised by arc length.
pub trait Curve: Debug + Send + Sync {
    /// Ambient dimension `D`.
    fn n_features(&self) -> usize;

    /// Start of the parameter interval.
    fn start(&self) -> f64;

    /// End of the parameter interval.
    fn end(&self) -> f64;

    /// Arc length of the curve.
    fn length(&self) -> f64 {
        (self.end() - self.start()).abs()
    }

    /// Number of leading coordinates worth plotting.
    fn plot_dim(&self) -> usize;

    /// `gamma(t)`.
    fn basepoint(&self, t: f64) -> DVector<f64>;

    /// `gamma'(t)`.
    fn tangent(&self, t: f64) -> DVector<f64>;

    /// Orthonormal basis of the normal space at `t`, as a `D x (D - 1)` matrix.
    fn normal(&self, t: f64) -> DMatrix<f64> {
        let tangent = self.tangent(t);
        orthonormal_complement(&DMatrix::from_column_slice(
            tangent.len(),
            1,
            tangent.as_slice(),
        ))
    }

    /// `gamma''(t)`, for curves that know it in closed form.
    fn curvature_vector(&self, _t: f64) -> Option<DVector<f64>> {
        None
    }
}

/// Evaluates `count` basepoints evenly spaced over the parameter interval.
pub fn evenly_spaced(curve: &dyn Curve, count: usize) -> Vec<(f64, DVector<f64>)> {
    let (start, end) = (curve.start(), curve.end());
    (0..count)
        .map(|i| {
            let t = if count == 1 {
                start
            } else {
                start + (end - start) * i as f64 / (count - 1) as f64
            };
            (t, curve.basepoint(t))
        })
        .collect()
}

/// `gamma(t) = (t, ..., t, 0, ..., 0) / sqrt(k)` with `k` active coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityKd {
    n_features: usize,
    n_active: usize,
    start: f64,
    end: f64,
}

impl IdentityKd {
    /// All `n_features` coordinates active unless `n_active_features` says otherwise.
    pub fn new(
        n_features: usize,
        start: f64,
        end: f64,
        n_active_features: Option<usize>,
    ) -> Result<Self, NsimError> {
        require_features("identity", n_features, 1)?;
        require_interval(start, end)?;
        let n_active = n_active_features.unwrap_or(n_features);
        if n_active == 0 || n_active > n_features {
            return Err(NsimError::Geometry(
                ErrorInfo::new(
                    "curve.active",
                    "active features must be between 1 and n_features",
                )
                .with_context("n_active_features", n_active.to_string())
                .with_context("n_features", n_features.to_string()),
            ));
        }
        Ok(Self {
            n_features,
            n_active,
            start,
            end,
        })
    }

    fn scale(&self) -> f64 {
        1.0 / (self.n_active as f64).sqrt()
    }
}

impl Curve for IdentityKd {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }

    fn plot_dim(&self) -> usize {
        self.n_active.min(3)
    }

    fn basepoint(&self, t: f64) -> DVector<f64> {
        let scale = self.scale();
        DVector::from_fn(self.n_features, |i, _| {
            if i < self.n_active {
                t * scale
            } else {
                0.0
            }
        })
    }

    fn tangent(&self, _t: f64) -> DVector<f64> {
        let scale = self.scale();
        DVector::from_fn(self.n_features, |i, _| if i < self.n_active { scale } else { 0.0 })
    }

    fn curvature_vector(&self, _t: f64) -> Option<DVector<f64>> {
        Some(DVector::zeros(self.n_features))
    }
}

fn planar(n_features: usize, x: f64, y: f64) -> DVector<f64> {
    let mut vec = DVector::zeros(n_features);
    vec[0] = x;
    vec[1] = y;
    vec
}

/// `gamma(t) = (cos t, sin t, 0, ..., 0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CirclePiece2d {
    n_features: usize,
    start: f64,
    end: f64,
}

impl CirclePiece2d {
    /// Creates a circle arc embedded in the first two coordinates.
    pub fn new(n_features: usize, start: f64, end: f64) -> Result<Self, NsimError> {
        require_features("circle", n_features, 2)?;
        require_interval(start, end)?;
        Ok(Self {
            n_features,
            start,
            end,
        })
    }
}

impl Curve for CirclePiece2d {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }

    fn plot_dim(&self) -> usize {
        2
    }

    fn basepoint(&self, t: f64) -> DVector<f64> {
        planar(self.n_features, t.cos(), t.sin())
    }

    fn tangent(&self, t: f64) -> DVector<f64> {
        planar(self.n_features, -t.sin(), t.cos())
    }

    fn curvature_vector(&self, t: f64) -> Option<DVector<f64>> {
        Some(planar(self.n_features, -t.cos(), -t.sin()))
    }
}

/// Two half circles joined at `(1, 0)`, with the parameter shifted by `pi/2`
/// so the natural domain is `[0, pi]`:
///
/// ```text
/// gamma(t) = (cos s, sin s)          for s = t - pi/2 <= 0
/// gamma(t) = (2 - cos s, sin s)      for s > 0
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SCurve2d {
    n_features: usize,
    start: f64,
    end: f64,
}

impl SCurve2d {
    /// Creates an S-curve embedded in the first two coordinates.
    pub fn new(n_features: usize, start: f64, end: f64) -> Result<Self, NsimError> {
        require_features("scurve", n_features, 2)?;
        require_interval(start, end)?;
        Ok(Self {
            n_features,
            start,
            end,
        })
    }
}

impl Curve for SCurve2d {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }

    fn plot_dim(&self) -> usize {
        2
    }

    fn basepoint(&self, t: f64) -> DVector<f64> {
        let s = t - FRAC_PI_2;
        if s <= 0.0 {
            planar(self.n_features, s.cos(), s.sin())
        } else {
            planar(self.n_features, 2.0 - s.cos(), s.sin())
        }
    }

    fn tangent(&self, t: f64) -> DVector<f64> {
        let s = t - FRAC_PI_2;
        if s <= 0.0 {
            planar(self.n_features, -s.sin(), s.cos())
        } else {
            planar(self.n_features, s.sin(), s.cos())
        }
    }

    fn curvature_vector(&self, t: f64) -> Option<DVector<f64>> {
        let s = t - FRAC_PI_2;
        Some(if s <= 0.0 {
            planar(self.n_features, -s.cos(), -s.sin())
        } else {
            planar(self.n_features, s.cos(), -s.sin())
        })
    }
}

/// `gamma(t) = (a cos(alpha t), a sin(alpha t), alpha b t)` with
/// `alpha = 1 / sqrt(a^2 + b^2)`, `a` the radius and `b` the pitch.
#[derive(Debug, Clone, PartialEq)]
pub struct HelixCurve3d {
    n_features: usize,
    start: f64,
    end: f64,
    radius: f64,
    pitch: f64,
    alpha: f64,
}

impl HelixCurve3d {
    /// Radius and pitch both default to one.
    pub const DEFAULT_RADIUS: f64 = 1.0;
    /// See [`HelixCurve3d::DEFAULT_RADIUS`].
    pub const DEFAULT_PITCH: f64 = 1.0;

    /// Creates a helix winding around the third coordinate axis.
    pub fn new(
        n_features: usize,
        start: f64,
        end: f64,
        radius: f64,
        pitch: f64,
    ) -> Result<Self, NsimError> {
        require_features("helix", n_features, 3)?;
        require_interval(start, end)?;
        if !(radius.is_finite() && pitch.is_finite()) || radius <= 0.0 || pitch < 0.0 {
            return Err(NsimError::Geometry(
                ErrorInfo::new(
                    "curve.helix",
                    "helix needs a positive radius and a non-negative pitch",
                )
                .with_context("radius", format!("{radius:?}"))
                .with_context("pitch", format!("{pitch:?}")),
            ));
        }
        Ok(Self {
            n_features,
            start,
            end,
            radius,
            pitch,
            alpha: 1.0 / (radius * radius + pitch * pitch).sqrt(),
        })
    }

    fn spatial(&self, x: f64, y: f64, z: f64) -> DVector<f64> {
        let mut vec = DVector::zeros(self.n_features);
        vec[0] = x;
        vec[1] = y;
        vec[2] = z;
        vec
    }
}

impl Curve for HelixCurve3d {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn start(&self) -> f64 {
        self.start
    }

    fn end(&self) -> f64 {
        self.end
    }

    fn plot_dim(&self) -> usize {
        3
    }

    fn basepoint(&self, t: f64) -> DVector<f64> {
        let phase = self.alpha * t;
        self.spatial(
            self.radius * phase.cos(),
            self.radius * phase.sin(),
            self.alpha * self.pitch * t,
        )
    }

    fn tangent(&self, t: f64) -> DVector<f64> {
        let phase = self.alpha * t;
        self.spatial(
            -self.radius * self.alpha * phase.sin(),
            self.radius * self.alpha * phase.cos(),
            self.alpha * self.pitch,
        )
    }

    fn curvature_vector(&self, t: f64) -> Option<DVector<f64>> {
        let phase = self.alpha * t;
        let scale = self.radius * self.alpha * self.alpha;
        // The axial component of gamma is linear in t.
        Some(self.spatial(-scale * phase.cos(), -scale * phase.sin(), 0.0))
    }
}

/// One step of a [`CircleSegmentBuilder`] chain: the signed coordinate axis the
/// tangent points along where a quarter circle starts or ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentTurn {
    /// `+1` or `-1`.
    pub sign: i8,
    /// Coordinate axis, `0..n_features`.
    pub axis: usize,
}

impl SegmentTurn {
    /// Shorthand constructor.
    pub const fn new(sign: i8, axis: usize) -> Self {
        Self { sign, axis }
    }
}

/// Curve made of quarter circles, starting at the origin.
///
/// A chain of `K` turns yields `K - 1` segments, so the domain is
/// `[0, (K - 1) pi/2]`. Segment `k` sweeps from direction `turns[k]` to
/// direction `turns[k + 1]`; `[(1,0), (1,1), (-1,0), (-1,1), (1,0)]` traces the
/// unit circle in the `0/1` plane.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleSegmentBuilder {
    n_features: usize,
    turns: Vec<SegmentTurn>,
    translations: Vec<DVector<f64>>,
}

impl CircleSegmentBuilder {
    /// Builds the chain, precomputing the offset at the start of every segment.
    pub fn new(turns: Vec<SegmentTurn>, n_features: usize) -> Result<Self, NsimError> {
        if turns.len() < 2 {
            return Err(geometry_error(
                "curve.segments",
                "a segment chain needs at least two turns",
            ));
        }
        for turn in &turns {
            if !matches!(turn.sign, 1 | -1) || turn.axis >= n_features {
                return Err(NsimError::Geometry(
                    ErrorInfo::new("curve.segments", "invalid turn in segment chain")
                        .with_context("sign", turn.sign.to_string())
                        .with_context("axis", turn.axis.to_string()),
                ));
            }
        }
        for pair in turns.windows(2) {
            if pair[0].axis == pair[1].axis {
                return Err(NsimError::Geometry(
                    ErrorInfo::new(
                        "curve.segments",
                        "consecutive turns must use different axes",
                    )
                    .with_context("axis", pair[0].axis.to_string()),
                ));
            }
        }
        let mut translations = vec![DVector::zeros(n_features)];
        for j in 1..turns.len() {
            let mut next = translations[j - 1].clone();
            next[turns[j - 1].axis] += f64::from(turns[j - 1].sign);
            next[turns[j].axis] += f64::from(turns[j].sign);
            translations.push(next);
        }
        Ok(Self {
            n_features,
            turns,
            translations,
        })
    }

    /// Number of quarter circles.
    pub fn segments(&self) -> usize {
        self.turns.len() - 1
    }

    fn locate(&self, t: f64) -> (usize, f64) {
        let raw = (t / FRAC_PI_2).floor();
        let segment = if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(self.segments() - 1)
        };
        (segment, t - segment as f64 * FRAC_PI_2)
    }
}

impl Curve for CircleSegmentBuilder {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn start(&self) -> f64 {
        0.0
    }

    fn end(&self) -> f64 {
        self.segments() as f64 * FRAC_PI_2
    }

    fn plot_dim(&self) -> usize {
        3
    }

    fn basepoint(&self, t: f64) -> DVector<f64> {
        let (segment, local) = self.locate(t);
        let (from, to) = (self.turns[segment], self.turns[segment + 1]);
        let mut vec = self.translations[segment].clone();
        vec[from.axis] += f64::from(from.sign) * local.sin();
        vec[to.axis] += f64::from(to.sign) * (1.0 - local.cos());
        vec
    }

    fn tangent(&self, t: f64) -> DVector<f64> {
        let (segment, local) = self.locate(t);
        let (from, to) = (self.turns[segment], self.turns[segment + 1]);
        let mut vec = DVector::zeros(self.n_features);
        vec[from.axis] = f64::from(from.sign) * local.cos();
        vec[to.axis] = f64::from(to.sign) * local.sin();
        vec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_normalised() {
        let curve = IdentityKd::new(4, 0.0, 1.0, Some(2)).unwrap();
        let point = curve.basepoint(1.0);
        assert!((point.norm() - 1.0).abs() < 1e-12);
        assert_eq!(point[3], 0.0);
        assert_eq!(curve.plot_dim(), 2);
    }

    #[test]
    fn segment_lookup_clamps_to_domain() {
        let chain = CircleSegmentBuilder::new(
            vec![SegmentTurn::new(1, 0), SegmentTurn::new(1, 1), SegmentTurn::new(-1, 0)],
            2,
        )
        .unwrap();
        assert_eq!(chain.locate(-0.5).0, 0);
        assert_eq!(chain.locate(10.0).0, 1);
    }
}
