//! Invariant checks shared by parsing and the builders.
//!
//! Every failure is reported as [`NsimError::MalformedRecord`] with one of the
//! codes below and a `field` context entry naming the offending key path.

use nsim_core::errors::{ErrorInfo, NsimError};

use crate::grid::ParameterGrid;
use crate::record::{EstimatorSpec, ExperimentRecord, CV_SPLIT_KEY};
use crate::value::ParamValue;

const EMPTY: &str = "record.empty";
const RANGE: &str = "record.range";
const ESTIMATOR: &str = "record.estimator";
const OPTION: &str = "record.option";

fn malformed(code: &str, field: &str, message: impl Into<String>) -> NsimError {
    NsimError::MalformedRecord(ErrorInfo::new(code, message).with_context("field", field))
}

/// Value domains of the option and param keys the NSIM and kNN estimators understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Domain {
    /// Number in (0, 1].
    UnitFraction,
    /// Number strictly greater than zero.
    Positive,
    /// Integer of at least one.
    PositiveInteger,
    /// String.
    Text,
}

fn domain_for(key: &str, absolute_neighbors: bool) -> Option<Domain> {
    match key {
        CV_SPLIT_KEY => Some(Domain::UnitFraction),
        "n_neighbors" if absolute_neighbors => Some(Domain::PositiveInteger),
        "n_neighbors" => Some(Domain::UnitFraction),
        "noisefree_levelset_fac" | "ball_radius" => Some(Domain::Positive),
        "n_levelsets" => Some(Domain::PositiveInteger),
        "split_by" | "neighbor_modus" => Some(Domain::Text),
        _ => None,
    }
}

fn within(domain: Domain, value: &ParamValue) -> bool {
    match domain {
        Domain::UnitFraction => matches!(value.as_f64(), Some(v) if v > 0.0 && v <= 1.0),
        Domain::Positive => matches!(value.as_f64(), Some(v) if v > 0.0),
        Domain::PositiveInteger => matches!(value.as_i64(), Some(v) if v >= 1),
        Domain::Text => value.as_str().is_some(),
    }
}

fn describe(domain: Domain) -> &'static str {
    match domain {
        Domain::UnitFraction => "a number in (0, 1]",
        Domain::Positive => "a positive number",
        Domain::PositiveInteger => "a positive integer",
        Domain::Text => "a string",
    }
}

/// Converts a raw count sweep (`N` or `D`), rejecting empty lists and non-positive entries.
pub(crate) fn positive_counts(field: &str, values: &[i64]) -> Result<Vec<u64>, NsimError> {
    if values.is_empty() {
        return Err(malformed(EMPTY, field, format!("`{field}` must not be empty")));
    }
    values
        .iter()
        .map(|&value| {
            u64::try_from(value)
                .ok()
                .filter(|&v| v > 0)
                .ok_or_else(|| {
                    malformed(RANGE, field, format!("`{field}` entries must be positive"))
                        .with_value(value.to_string())
                })
        })
        .collect()
}

/// Converts the raw repetition count.
pub(crate) fn repetitions(raw: i64) -> Result<u32, NsimError> {
    u32::try_from(raw)
        .ok()
        .filter(|&v| v >= 1)
        .ok_or_else(|| {
            malformed(RANGE, "repititions", "repetitions must be at least 1")
                .with_value(raw.to_string())
        })
}

fn counts(field: &str, values: &[u64]) -> Result<(), NsimError> {
    if values.is_empty() {
        return Err(malformed(EMPTY, field, format!("`{field}` must not be empty")));
    }
    if values.contains(&0) {
        return Err(malformed(RANGE, field, format!("`{field}` entries must be positive")));
    }
    Ok(())
}

fn noise_levels(field: &str, values: &[f64]) -> Result<(), NsimError> {
    if values.is_empty() {
        return Err(malformed(EMPTY, field, format!("`{field}` must not be empty")));
    }
    for value in values {
        if !value.is_finite() || *value < 0.0 {
            return Err(malformed(
                RANGE,
                field,
                format!("`{field}` entries must be finite and non-negative"),
            )
            .with_value(format!("{value:?}")));
        }
    }
    Ok(())
}

pub(crate) fn record(record: &ExperimentRecord) -> Result<(), NsimError> {
    counts("N", record.sample_sizes())?;
    counts("D", record.dimensions())?;
    noise_levels("sigma_X", record.input_noise_scale())?;
    noise_levels("sigma_f", record.output_noise_scale())?;
    if record.repetitions() == 0 {
        return Err(malformed(RANGE, "repititions", "repetitions must be at least 1"));
    }
    if record.checked_trial_count().is_none() {
        return Err(malformed(RANGE, "repititions", "number of trials overflows usize")
            .with_value(record.repetitions().to_string()));
    }
    estimator(record.estimator_spec())
}

pub(crate) fn estimator(spec: &EstimatorSpec) -> Result<(), NsimError> {
    if spec.id().trim().is_empty() {
        return Err(malformed(
            ESTIMATOR,
            "estimator.estimator_id",
            "estimator id must not be empty",
        ));
    }
    // kNN counts neighbors in absolute terms unless told to scale by a factor.
    let absolute_neighbors = spec
        .option("neighbor_modus")
        .and_then(|value| value.as_scalar())
        .and_then(ParamValue::as_str)
        .map_or(false, |modus| modus != "factor");

    for (key, value) in spec.options() {
        let field = format!("estimator.options.{key}");
        values(&field, key, value.as_slice(), absolute_neighbors)?;
    }
    for (key, candidates) in spec.params() {
        let field = format!("estimator.params.{key}");
        values(&field, key, candidates, absolute_neighbors)?;
    }
    if ParameterGrid::new(spec.params()).checked_len().is_none() {
        return Err(malformed(RANGE, "estimator.params", "parameter grid size overflows usize"));
    }
    Ok(())
}

fn values(
    field: &str,
    key: &str,
    values: &[ParamValue],
    absolute_neighbors: bool,
) -> Result<(), NsimError> {
    if values.is_empty() {
        return Err(malformed(EMPTY, field, format!("`{key}` must not be empty")));
    }
    let domain = domain_for(key, absolute_neighbors);
    for value in values {
        if value.is_non_finite() {
            return Err(malformed(RANGE, field, format!("`{key}` entries must be finite"))
                .with_value(value.to_string()));
        }
        if let Some(domain) = domain {
            if !within(domain, value) {
                return Err(malformed(
                    OPTION,
                    field,
                    format!("`{key}` entries must be {}", describe(domain)),
                )
                .with_value(value.to_string()));
            }
        }
    }
    Ok(())
}

trait WithValue {
    fn with_value(self, value: String) -> Self;
}

impl WithValue for NsimError {
    fn with_value(self, value: String) -> Self {
        match self {
            NsimError::MalformedRecord(info) => {
                NsimError::MalformedRecord(info.with_context("value", value))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractions_exclude_zero_and_allow_one() {
        assert!(!within(Domain::UnitFraction, &ParamValue::Float(0.0)));
        assert!(within(Domain::UnitFraction, &ParamValue::Float(1.0)));
        assert!(within(Domain::UnitFraction, &ParamValue::Integer(1)));
        assert!(!within(Domain::UnitFraction, &ParamValue::Float(1.5)));
    }

    #[test]
    fn absolute_neighbor_counts_switch_domain() {
        assert_eq!(domain_for("n_neighbors", true), Some(Domain::PositiveInteger));
        assert_eq!(domain_for("n_neighbors", false), Some(Domain::UnitFraction));
        assert_eq!(domain_for("unheard_of", false), None);
    }

    #[test]
    fn negative_counts_are_range_errors() {
        let err = positive_counts("N", &[2000, -1]).unwrap_err();
        assert_eq!(err.info().code, RANGE);
        assert_eq!(err.info().context_value("value"), Some("-1"));
    }
}
