use nsim_core::errors::{ErrorInfo, NsimError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("field", "N")
        .with_context("reason", "example")
}

#[test]
fn malformed_record_surface() {
    let err = NsimError::MalformedRecord(sample_info("record.empty", "empty sweep list"));
    assert_eq!(err.info().code, "record.empty");
    assert_eq!(err.info().context_value("field"), Some("N"));
    assert!(err.is_malformed());
}

#[test]
fn geometry_error_surface() {
    let err = NsimError::Geometry(sample_info("curve.dim", "too few features"));
    assert_eq!(err.info().code, "curve.dim");
    assert!(!err.is_malformed());
}

#[test]
fn config_error_surface() {
    let err = NsimError::Config(sample_info("config.yaml", "bad indentation"));
    assert!(err.info().context.contains_key("reason"));
}

#[test]
fn io_error_records_path() {
    let err = NsimError::io(
        "log-read",
        std::path::Path::new("/nope/log.txt"),
        std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
    );
    assert_eq!(err.info().context_value("path"), Some("/nope/log.txt"));
}

#[test]
fn display_includes_context_and_hint() {
    let err = NsimError::MalformedRecord(
        ErrorInfo::new("record.range", "repetitions must be at least 1")
            .with_context("field", "repititions")
            .with_hint("use a positive trial count"),
    );
    let text = err.to_string();
    assert!(text.starts_with("malformed record: "));
    assert!(text.contains("field=repititions"));
    assert!(text.contains("hint: use a positive trial count"));
}

#[test]
fn errors_round_trip_json() {
    let err = NsimError::Serde(sample_info("json-encode", "boom"));
    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"family\":\"Serde\""));
    let decoded: NsimError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}
