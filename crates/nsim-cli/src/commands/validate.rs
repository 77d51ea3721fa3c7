use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use nsim_record::ExperimentRecord;
use serde::Serialize;
use tracing::info;

use super::emit_json;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the record (`log.txt`).
    #[arg(long)]
    pub log: PathBuf,
}

#[derive(Debug, Serialize)]
struct RecordSummary<'a> {
    estimator_id: &'a str,
    fingerprint: String,
    grid_points: usize,
    trials: usize,
    repetitions: u32,
}

pub fn run(args: &ValidateArgs) -> Result<(), Box<dyn Error>> {
    let record = ExperimentRecord::load(&args.log)?;
    let summary = RecordSummary {
        estimator_id: record.estimator_spec().id(),
        fingerprint: record.fingerprint()?,
        grid_points: record.grid().len(),
        trials: record.trial_count(),
        repetitions: record.repetitions(),
    };
    info!(path = %args.log.display(), "record is valid");
    emit_json(&summary, None)
}
