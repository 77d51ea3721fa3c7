//! The experiment record and its estimator block.

use std::collections::BTreeMap;
use std::path::Path;

use nsim_core::errors::{ErrorInfo, NsimError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grid::ParameterGrid;
use crate::hash::stable_hash_string;
use crate::serde::to_pretty_json;
use crate::validate;
use crate::value::{OptionValue, ParamValue};

/// Option key holding the fraction of samples held out for cross-validation.
pub const CV_SPLIT_KEY: &str = "CV_split";

/// Snapshot of a sweep's input configuration, as written to `log.txt`.
///
/// Records are immutable: they are produced either by parsing (which
/// validates) or by [`ExperimentRecordBuilder::build`] (which runs the same
/// checks). Every `Deserialize` entry point goes through validation too, so a
/// value of this type always satisfies the record invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct ExperimentRecord {
    #[serde(rename = "N")]
    sample_sizes: Vec<u64>,
    #[serde(rename = "D")]
    dimensions: Vec<u64>,
    #[serde(rename = "sigma_X")]
    input_noise_scale: Vec<f64>,
    #[serde(rename = "sigma_f")]
    output_noise_scale: Vec<f64>,
    // Misspelled on the wire; existing logs depend on it.
    #[serde(rename = "repititions")]
    repetitions: u32,
    #[serde(rename = "estimator")]
    estimator_spec: EstimatorSpec,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRecord {
    #[serde(rename = "N", alias = "sample_sizes")]
    sample_sizes: Vec<i64>,
    #[serde(rename = "D", alias = "dimensions")]
    dimensions: Vec<i64>,
    #[serde(rename = "sigma_X", alias = "input_noise_scale")]
    input_noise_scale: Vec<f64>,
    #[serde(rename = "sigma_f", alias = "output_noise_scale")]
    output_noise_scale: Vec<f64>,
    #[serde(rename = "repititions", alias = "repetitions")]
    repetitions: i64,
    #[serde(rename = "estimator", alias = "estimator_spec")]
    estimator: RawEstimator,
}

impl TryFrom<RawRecord> for ExperimentRecord {
    type Error = NsimError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let record = ExperimentRecord {
            sample_sizes: validate::positive_counts("N", &raw.sample_sizes)?,
            dimensions: validate::positive_counts("D", &raw.dimensions)?,
            input_noise_scale: raw.input_noise_scale,
            output_noise_scale: raw.output_noise_scale,
            repetitions: validate::repetitions(raw.repetitions)?,
            estimator_spec: EstimatorSpec::try_from(raw.estimator)?,
        };
        record.validate()?;
        Ok(record)
    }
}

fn decode_error(err: serde_json::Error) -> NsimError {
    let message = err.to_string();
    let mut info = ErrorInfo::new("record.decode", message.clone())
        .with_context("line", err.line().to_string())
        .with_context("column", err.column().to_string());
    if let Some(field) = named_field(&message) {
        info = info.with_context("field", field);
    }
    NsimError::MalformedRecord(info)
}

/// Pulls the field name out of serde's "missing field `x`" / "unknown field `x`" messages.
fn named_field(message: &str) -> Option<&str> {
    if !(message.starts_with("missing field") || message.starts_with("unknown field")) {
        return None;
    }
    let start = message.find('`')? + 1;
    let len = message[start..].find('`')?;
    Some(&message[start..start + len])
}

impl ExperimentRecord {
    /// Starts building a record around the given estimator block.
    pub fn builder(estimator_spec: EstimatorSpec) -> ExperimentRecordBuilder {
        ExperimentRecordBuilder::new(estimator_spec)
    }

    /// Parses and validates a record from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, NsimError> {
        let raw: RawRecord = serde_json::from_str(text).map_err(decode_error)?;
        let record = Self::try_from(raw)?;
        debug!(
            estimator = record.estimator_spec.id(),
            trials = record.trial_count(),
            grid = record.grid().len(),
            "parsed experiment record"
        );
        Ok(record)
    }

    /// Parses and validates a record from JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, NsimError> {
        let text = std::str::from_utf8(bytes).map_err(|err| {
            NsimError::MalformedRecord(ErrorInfo::new("record.decode", err.to_string()))
        })?;
        Self::from_json_str(text)
    }

    /// Reads and validates a record stored at `path`.
    pub fn load(path: &Path) -> Result<Self, NsimError> {
        let text =
            std::fs::read_to_string(path).map_err(|err| NsimError::io("record-read", path, err))?;
        Self::from_json_str(&text).map_err(|err| match err {
            NsimError::MalformedRecord(info) => NsimError::MalformedRecord(
                info.with_context("path", path.display().to_string()),
            ),
            other => other,
        })
    }

    /// Serializes the record as four-space indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, NsimError> {
        to_pretty_json(self)
    }

    /// SHA-256 over the canonical (key sorted) JSON encoding.
    pub fn fingerprint(&self) -> Result<String, NsimError> {
        stable_hash_string(self)
    }

    /// Re-checks every record invariant.
    pub fn validate(&self) -> Result<(), NsimError> {
        validate::record(self)
    }

    /// Candidate dataset sizes (`N`).
    pub fn sample_sizes(&self) -> &[u64] {
        &self.sample_sizes
    }

    /// Candidate ambient dimensions (`D`).
    pub fn dimensions(&self) -> &[u64] {
        &self.dimensions
    }

    /// Standard deviations of the input perturbation (`sigma_X`).
    pub fn input_noise_scale(&self) -> &[f64] {
        &self.input_noise_scale
    }

    /// Standard deviations of the output perturbation (`sigma_f`).
    pub fn output_noise_scale(&self) -> &[f64] {
        &self.output_noise_scale
    }

    /// Number of repeated trials per parameter combination.
    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }

    /// The estimator block.
    pub fn estimator_spec(&self) -> &EstimatorSpec {
        &self.estimator_spec
    }

    /// Cartesian grid spanned by the estimator's swept params.
    pub fn grid(&self) -> ParameterGrid<'_> {
        ParameterGrid::new(&self.estimator_spec.params)
    }

    /// Number of trials: `|N| * |D| * |sigma_X| * |sigma_f| * repetitions`.
    ///
    /// Saturates at `usize::MAX`; validated records always fit.
    pub fn trial_count(&self) -> usize {
        self.checked_trial_count().unwrap_or(usize::MAX)
    }

    /// Number of trials, or `None` when the product overflows `usize`.
    pub fn checked_trial_count(&self) -> Option<usize> {
        [
            self.sample_sizes.len(),
            self.dimensions.len(),
            self.input_noise_scale.len(),
            self.output_noise_scale.len(),
        ]
        .into_iter()
        .try_fold(usize::try_from(self.repetitions).ok()?, usize::checked_mul)
    }

    /// Splits `n_samples` into `(training, cross-validation)` sizes.
    pub fn split_sizes(&self, n_samples: u64) -> (u64, u64) {
        let n_cv = (self.estimator_spec.cv_split() * n_samples as f64).floor() as u64;
        let n_cv = n_cv.min(n_samples);
        (n_samples - n_cv, n_cv)
    }

    /// The configuration the synthetic NSIM runner ships with.
    pub fn runner_default() -> Self {
        let estimator_spec = EstimatorSpec {
            id: "nsim".to_string(),
            options: BTreeMap::from([
                ("split_by".to_string(), OptionValue::from("stateq")),
                (CV_SPLIT_KEY.to_string(), OptionValue::from(0.1)),
                ("noisefree_levelset_fac".to_string(), OptionValue::from(15i64)),
                (
                    "n_neighbors".to_string(),
                    OptionValue::List(vec![ParamValue::Float(0.5)]),
                ),
            ]),
            params: BTreeMap::from([
                (
                    "n_levelsets".to_string(),
                    (0..14).map(|i| ParamValue::Integer(1 << i)).collect(),
                ),
                ("ball_radius".to_string(), vec![ParamValue::Float(0.5)]),
            ]),
        };
        ExperimentRecord {
            sample_sizes: vec![2000, 4000, 8000, 16000],
            dimensions: vec![4, 8, 16],
            input_noise_scale: vec![0.25],
            output_noise_scale: vec![0.0],
            repetitions: 5,
            estimator_spec,
        }
    }
}

/// Runner-side constructor for [`ExperimentRecord`].
#[derive(Debug, Clone)]
pub struct ExperimentRecordBuilder {
    sample_sizes: Vec<u64>,
    dimensions: Vec<u64>,
    input_noise_scale: Vec<f64>,
    output_noise_scale: Vec<f64>,
    repetitions: u32,
    estimator_spec: EstimatorSpec,
}

impl ExperimentRecordBuilder {
    /// Creates a builder with empty sweeps and a single repetition.
    pub fn new(estimator_spec: EstimatorSpec) -> Self {
        Self {
            sample_sizes: Vec::new(),
            dimensions: Vec::new(),
            input_noise_scale: Vec::new(),
            output_noise_scale: Vec::new(),
            repetitions: 1,
            estimator_spec,
        }
    }

    /// Sets the candidate dataset sizes.
    pub fn sample_sizes(mut self, values: impl IntoIterator<Item = u64>) -> Self {
        self.sample_sizes = values.into_iter().collect();
        self
    }

    /// Sets the candidate ambient dimensions.
    pub fn dimensions(mut self, values: impl IntoIterator<Item = u64>) -> Self {
        self.dimensions = values.into_iter().collect();
        self
    }

    /// Sets the input noise levels.
    pub fn input_noise_scale(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.input_noise_scale = values.into_iter().collect();
        self
    }

    /// Sets the output noise levels.
    pub fn output_noise_scale(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.output_noise_scale = values.into_iter().collect();
        self
    }

    /// Sets the number of repetitions per combination.
    pub fn repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions = repetitions;
        self
    }

    /// Validates and freezes the record.
    pub fn build(self) -> Result<ExperimentRecord, NsimError> {
        let record = ExperimentRecord {
            sample_sizes: self.sample_sizes,
            dimensions: self.dimensions,
            input_noise_scale: self.input_noise_scale,
            output_noise_scale: self.output_noise_scale,
            repetitions: self.repetitions,
            estimator_spec: self.estimator_spec,
        };
        record.validate()?;
        Ok(record)
    }
}

/// Estimator identifier, fixed options and swept hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEstimator")]
pub struct EstimatorSpec {
    #[serde(rename = "estimator_id")]
    id: String,
    options: BTreeMap<String, OptionValue>,
    params: BTreeMap<String, Vec<ParamValue>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEstimator {
    #[serde(rename = "estimator_id", alias = "id")]
    id: String,
    options: BTreeMap<String, OptionValue>,
    params: BTreeMap<String, Vec<ParamValue>>,
}

impl TryFrom<RawEstimator> for EstimatorSpec {
    type Error = NsimError;

    fn try_from(raw: RawEstimator) -> Result<Self, Self::Error> {
        let spec = EstimatorSpec {
            id: raw.id,
            options: raw.options,
            params: raw.params,
        };
        validate::estimator(&spec)?;
        Ok(spec)
    }
}

impl EstimatorSpec {
    /// Starts building an estimator block with the given identifier.
    pub fn builder(id: impl Into<String>) -> EstimatorSpecBuilder {
        EstimatorSpecBuilder::new(id)
    }

    /// Name of the estimation method, e.g. `nsim`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Method-specific options.
    pub fn options(&self) -> &BTreeMap<String, OptionValue> {
        &self.options
    }

    /// Swept hyperparameters and their candidate values.
    pub fn params(&self) -> &BTreeMap<String, Vec<ParamValue>> {
        &self.params
    }

    /// Looks up a single option.
    pub fn option(&self, key: &str) -> Option<&OptionValue> {
        self.options.get(key)
    }

    /// Looks up the candidate values of a swept hyperparameter.
    pub fn param(&self, key: &str) -> Option<&[ParamValue]> {
        self.params.get(key).map(Vec::as_slice)
    }

    /// Fraction of samples held out for cross-validation; `0.0` when unset.
    pub fn cv_split(&self) -> f64 {
        self.option(CV_SPLIT_KEY)
            .and_then(OptionValue::as_scalar)
            .and_then(ParamValue::as_f64)
            .unwrap_or(0.0)
    }
}

/// Builder for [`EstimatorSpec`].
#[derive(Debug, Clone)]
pub struct EstimatorSpecBuilder {
    id: String,
    options: BTreeMap<String, OptionValue>,
    params: BTreeMap<String, Vec<ParamValue>>,
}

impl EstimatorSpecBuilder {
    /// Creates a builder with no options and no swept params.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            options: BTreeMap::new(),
            params: BTreeMap::new(),
        }
    }

    /// Sets an option, replacing any previous value.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Sets the candidate values of a swept hyperparameter.
    pub fn param<V: Into<ParamValue>>(
        mut self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.params
            .insert(key.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Validates and freezes the estimator block.
    pub fn build(self) -> Result<EstimatorSpec, NsimError> {
        let spec = EstimatorSpec {
            id: self.id,
            options: self.options,
            params: self.params,
        };
        validate::estimator(&spec)?;
        Ok(spec)
    }
}
