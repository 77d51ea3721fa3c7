use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use nsim_record::ExperimentRecord;
use tracing::info;

use super::emit_json;

#[derive(Args, Debug)]
pub struct GridArgs {
    /// Path to the record (`log.txt`).
    #[arg(long)]
    pub log: PathBuf,
    /// Output file; the grid is printed when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(args: &GridArgs) -> Result<(), Box<dyn Error>> {
    let record = ExperimentRecord::load(&args.log)?;
    let points = record.grid().points();
    info!(points = points.len(), "expanded parameter grid");
    emit_json(&points, args.out.as_deref())
}
