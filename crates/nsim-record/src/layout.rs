//! Results directory layout: `<root>/<manifold>/<estimator>/<run>/log.txt`.

use std::fs;
use std::path::{Path, PathBuf};

use nsim_core::errors::NsimError;
use tracing::debug;

use crate::record::ExperimentRecord;

/// File name of the record inside a run directory.
pub const LOG_FILE_NAME: &str = "log.txt";

/// Location of one run's artefacts for a given manifold and estimator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLayout {
    root: PathBuf,
    manifold_id: String,
    estimator_id: String,
    run_label: String,
}

impl RunLayout {
    /// Creates a layout from its four components.
    pub fn new(
        root: impl Into<PathBuf>,
        manifold_id: impl Into<String>,
        estimator_id: impl Into<String>,
        run_label: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            manifold_id: manifold_id.into(),
            estimator_id: estimator_id.into(),
            run_label: run_label.into(),
        }
    }

    /// Layout for `record`, taking the estimator id from the record itself.
    pub fn for_record(
        root: impl Into<PathBuf>,
        manifold_id: impl Into<String>,
        run_label: impl Into<String>,
        record: &ExperimentRecord,
    ) -> Self {
        Self::new(
            root,
            manifold_id,
            record.estimator_spec().id(),
            run_label,
        )
    }

    /// Manifold the run samples from.
    pub fn manifold_id(&self) -> &str {
        &self.manifold_id
    }

    /// Run directory.
    pub fn run_dir(&self) -> PathBuf {
        self.root
            .join(&self.manifold_id)
            .join(&self.estimator_id)
            .join(&self.run_label)
    }

    /// Path of the record file.
    pub fn log_path(&self) -> PathBuf {
        self.run_dir().join(LOG_FILE_NAME)
    }
}

/// Writes `record` to the layout's `log.txt`, creating directories as needed.
pub fn write_log(layout: &RunLayout, record: &ExperimentRecord) -> Result<PathBuf, NsimError> {
    let dir = layout.run_dir();
    fs::create_dir_all(&dir).map_err(|err| NsimError::io("log-mkdir", &dir, err))?;
    let path = layout.log_path();
    let json = record.to_json_pretty()?;
    fs::write(&path, json).map_err(|err| NsimError::io("log-write", &path, err))?;
    debug!(path = %path.display(), "wrote experiment record");
    Ok(path)
}

/// Reads and validates the record at `path`.
pub fn read_log(path: &Path) -> Result<ExperimentRecord, NsimError> {
    ExperimentRecord::load(path)
}
