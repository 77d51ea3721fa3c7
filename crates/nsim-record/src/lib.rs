//! Experiment record for synthetic NSIM sweeps.
//!
//! The record is the `log.txt` document an experiment runner writes before a
//! sweep starts. This crate parses and validates it, writes it back, and
//! derives read-only views from it: the hyperparameter grid, the trial
//! enumeration with per-trial seeds, and the results directory layout.

pub mod grid;
pub mod hash;
pub mod layout;
pub mod record;
pub mod serde;
pub mod trials;
mod validate;
pub mod value;

pub use grid::{GridIter, GridPoint, ParameterGrid};
pub use hash::stable_hash_string;
pub use layout::{read_log, write_log, RunLayout, LOG_FILE_NAME};
pub use record::{EstimatorSpec, EstimatorSpecBuilder, ExperimentRecord, ExperimentRecordBuilder};
pub use self::serde::{from_json_slice, to_canonical_json_bytes, to_pretty_json};
pub use trials::{SeedTable, Trial, TrialIndex, Trials};
pub use value::{OptionValue, ParamValue};

pub use nsim_core::{ErrorInfo, NsimError};
