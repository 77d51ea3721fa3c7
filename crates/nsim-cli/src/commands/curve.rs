use std::error::Error;

use clap::Args;
use nsim_core::{ErrorInfo, NsimError};
use nsim_synth::{default_manifolds, evenly_spaced, ManifoldKind, ManifoldSpec};
use serde::Serialize;

use super::emit_json;

#[derive(Args, Debug)]
pub struct CurveArgs {
    /// Manifold id (`identity`, `circle`, `scurve`, `helix`).
    #[arg(long)]
    pub manifold: String,
    /// Ambient dimension.
    #[arg(long)]
    pub dim: usize,
    /// Number of basepoints.
    #[arg(long, default_value_t = 10)]
    pub points: usize,
    /// Start of the parameter interval; defaults to the runner's interval.
    #[arg(long)]
    pub start: Option<f64>,
    /// End of the parameter interval; defaults to the runner's interval.
    #[arg(long)]
    pub end: Option<f64>,
}

#[derive(Debug, Serialize)]
struct CurveSample {
    t: f64,
    point: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct CurveReport {
    manifold_id: String,
    n_features: usize,
    plot_dim: usize,
    length: f64,
    samples: Vec<CurveSample>,
}

pub fn run(args: &CurveArgs) -> Result<(), Box<dyn Error>> {
    let spec = resolve_spec(args)?;
    let curve = spec.build(args.dim)?;
    let samples = evenly_spaced(curve.as_ref(), args.points)
        .into_iter()
        .map(|(t, point)| CurveSample {
            t,
            point: point.iter().copied().collect(),
        })
        .collect();
    let report = CurveReport {
        manifold_id: spec.manifold_id,
        n_features: curve.n_features(),
        plot_dim: curve.plot_dim(),
        length: curve.length(),
        samples,
    };
    emit_json(&report, None)
}

fn resolve_spec(args: &CurveArgs) -> Result<ManifoldSpec, NsimError> {
    let kind = ManifoldKind::from_id(&args.manifold)?;
    let fallback = default_manifolds()
        .into_iter()
        .find(|spec| spec.manifold_id == kind.id());
    let start = args
        .start
        .or_else(|| fallback.as_ref().map(|spec| spec.start))
        .unwrap_or(0.0);
    let end = args
        .end
        .or_else(|| fallback.as_ref().map(|spec| spec.end))
        .ok_or_else(|| {
            NsimError::Config(
                ErrorInfo::new("curve.interval", "no default interval for this manifold")
                    .with_context("manifold_id", kind.id())
                    .with_hint("pass --end"),
            )
        })?;
    Ok(ManifoldSpec::new(kind.id(), start, end))
}
