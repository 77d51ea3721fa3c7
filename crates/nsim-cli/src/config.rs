//! YAML sweep configuration consumed by `nsim init`.

use std::fs;
use std::path::{Path, PathBuf};

use nsim_core::{derive_substream_seed, ErrorInfo, NsimError};
use nsim_record::ExperimentRecord;
use nsim_synth::{default_manifolds, ManifoldKind, ManifoldSpec};
use serde::Deserialize;
use tracing::{debug, warn};

pub const DEFAULT_RUN_LABEL: &str = "run_1";

/// Where records go, which manifolds they cover and the record itself.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub results_root: PathBuf,
    pub run_label: Option<String>,
    pub manifolds: Option<Vec<ManifoldSpec>>,
    pub record: ExperimentRecord,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSweepConfig {
    results_root: PathBuf,
    #[serde(default)]
    run_label: Option<String>,
    #[serde(default)]
    manifolds: Option<Vec<ManifoldSpec>>,
    record: serde_yaml::Value,
}

impl SweepConfig {
    pub fn load(path: &Path) -> Result<Self, NsimError> {
        let text = fs::read_to_string(path).map_err(|err| NsimError::io("config-read", path, err))?;
        Self::from_yaml_str(&text).map_err(|err| match err {
            NsimError::Config(info) => {
                NsimError::Config(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })
    }

    /// Parses a configuration. The embedded record goes through the same
    /// validation as a `log.txt`, so a bad record is `MalformedRecord`.
    pub fn from_yaml_str(text: &str) -> Result<Self, NsimError> {
        let raw: RawSweepConfig = serde_yaml::from_str(text)
            .map_err(|err| NsimError::Config(ErrorInfo::new("config.yaml", err.to_string())))?;
        let record_json = serde_json::to_vec(&raw.record).map_err(|err| {
            NsimError::Config(
                ErrorInfo::new("config.record", err.to_string())
                    .with_hint("record keys must be strings"),
            )
        })?;
        let record = ExperimentRecord::from_json_slice(&record_json)?;
        debug!(estimator = record.estimator_spec().id(), "loaded sweep configuration");
        Ok(Self {
            results_root: raw.results_root,
            run_label: raw.run_label,
            manifolds: raw.manifolds,
            record,
        })
    }

    pub fn run_label(&self) -> &str {
        match &self.run_label {
            Some(label) => label,
            None => {
                warn!(default = DEFAULT_RUN_LABEL, "no run_label configured");
                DEFAULT_RUN_LABEL
            }
        }
    }

    pub fn manifolds(&self) -> Vec<ManifoldSpec> {
        match &self.manifolds {
            Some(manifolds) => manifolds.clone(),
            None => {
                warn!("no manifolds configured, using identity, scurve and helix");
                default_manifolds()
            }
        }
    }
}

/// Master seed of one manifold's seed table, derived from the sweep seed.
pub fn manifold_seed(sweep_seed: u64, kind: ManifoldKind) -> u64 {
    let substream = ManifoldKind::ALL
        .iter()
        .position(|candidate| *candidate == kind)
        .unwrap_or_default();
    derive_substream_seed(sweep_seed, substream as u64)
}
