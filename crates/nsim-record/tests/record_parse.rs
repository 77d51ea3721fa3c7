use nsim_record::{
    from_json_slice, to_canonical_json_bytes, ExperimentRecord, OptionValue, ParamValue,
};
use serde_json::Value;

const RUNNER_LOG: &str = include_str!("fixtures/log.txt");

fn runner_record() -> ExperimentRecord {
    ExperimentRecord::from_json_str(RUNNER_LOG).expect("runner log parses")
}

#[test]
fn sweep_lengths_match_the_log() {
    let record = runner_record();
    assert_eq!(record.sample_sizes(), &[2000, 4000, 8000, 16000]);
    assert_eq!(record.dimensions(), &[4, 8, 16]);
    assert_eq!(record.input_noise_scale(), &[0.25]);
    assert_eq!(record.output_noise_scale(), &[0.0]);
    assert_eq!(
        record.estimator_spec().param("n_levelsets").map(<[_]>::len),
        Some(14)
    );
    assert_eq!(
        record.estimator_spec().param("ball_radius"),
        Some(&[ParamValue::Float(0.5)][..])
    );
}

#[test]
fn repetitions_and_id() {
    let record = runner_record();
    assert_eq!(record.repetitions(), 5);
    assert_eq!(record.estimator_spec().id(), "nsim");
}

#[test]
fn options_keep_their_shapes() {
    let record = runner_record();
    let spec = record.estimator_spec();
    assert_eq!(spec.option("split_by"), Some(&OptionValue::from("stateq")));
    assert_eq!(spec.option("noisefree_levelset_fac"), Some(&OptionValue::from(15i64)));
    assert_eq!(
        spec.option("n_neighbors"),
        Some(&OptionValue::List(vec![ParamValue::Float(0.5)]))
    );
    assert_eq!(spec.cv_split(), 0.1);
}

#[test]
fn round_trip_preserves_structure() {
    let record = runner_record();
    let written = record.to_json_pretty().expect("serialize");
    let original: Value = serde_json::from_str(RUNNER_LOG).expect("json");
    let rewritten: Value = serde_json::from_str(&written).expect("json");
    assert_eq!(original, rewritten);
    assert_eq!(ExperimentRecord::from_json_str(&written).expect("reparse"), record);
}

#[test]
fn pretty_output_uses_four_space_indent() {
    let written = runner_record().to_json_pretty().expect("serialize");
    assert!(written.starts_with("{\n    \"N\": [\n        2000,"));
}

#[test]
fn runner_default_matches_the_log() {
    assert_eq!(ExperimentRecord::runner_default(), runner_record());
}

#[test]
fn fingerprint_ignores_key_order() {
    let record = runner_record();
    let reordered = r#"{
        "estimator": {
            "params": {"ball_radius": [0.5], "n_levelsets": [1,2,4,8,16,32,64,128,256,512,1024,2048,4096,8192]},
            "options": {"n_neighbors": [0.5], "noisefree_levelset_fac": 15, "CV_split": 0.1, "split_by": "stateq"},
            "estimator_id": "nsim"
        },
        "repititions": 5,
        "sigma_f": [0.0],
        "sigma_X": [0.25],
        "D": [4, 8, 16],
        "N": [2000, 4000, 8000, 16000]
    }"#;
    let other = ExperimentRecord::from_json_str(reordered).expect("parse");
    assert_eq!(
        record.fingerprint().expect("hash"),
        other.fingerprint().expect("hash")
    );
}

#[test]
fn descriptive_aliases_are_accepted() {
    let text = r#"{
        "sample_sizes": [200],
        "dimensions": [2],
        "input_noise_scale": [0.0],
        "output_noise_scale": [0.01],
        "repetitions": 1,
        "estimator_spec": {
            "id": "knn",
            "options": {"neighbor_modus": "absolute"},
            "params": {"n_neighbors": [5, 10]}
        }
    }"#;
    let record = ExperimentRecord::from_json_str(text).expect("parse");
    assert_eq!(record.estimator_spec().id(), "knn");
    let written: Value = serde_json::from_str(&record.to_json_pretty().unwrap()).unwrap();
    assert!(written.get("N").is_some());
    assert!(written.get("repititions").is_some());
    assert_eq!(written["estimator"]["estimator_id"], "knn");
}

#[test]
fn serde_entry_points_validate() {
    let record: ExperimentRecord = serde_json::from_str(RUNNER_LOG).expect("serde_json");
    assert_eq!(record.trial_count(), 60);
    let yaml = serde_yaml::to_string(&record).expect("yaml");
    let restored: ExperimentRecord = serde_yaml::from_str(&yaml).expect("yaml parse");
    assert_eq!(restored, record);
}

#[test]
fn builder_produces_equivalent_record() {
    let spec = nsim_record::EstimatorSpec::builder("nsim")
        .option("split_by", "stateq")
        .option("CV_split", 0.1)
        .option("noisefree_levelset_fac", 15i64)
        .option("n_neighbors", vec![ParamValue::Float(0.5)])
        .param("n_levelsets", (0..14).map(|i| 1i64 << i))
        .param("ball_radius", [0.5])
        .build()
        .expect("spec");
    let record = ExperimentRecord::builder(spec)
        .sample_sizes([2000, 4000, 8000, 16000])
        .dimensions([4, 8, 16])
        .input_noise_scale([0.25])
        .output_noise_scale([0.0])
        .repetitions(5)
        .build()
        .expect("record");
    assert_eq!(record, runner_record());
}

#[test]
fn canonical_bytes_restore_the_record() {
    let record = runner_record();
    let bytes = to_canonical_json_bytes(&record).expect("canonical bytes");
    let text = std::str::from_utf8(&bytes).expect("utf8");
    assert!(text.find("\"D\"") < text.find("\"N\""));
    let restored: ExperimentRecord = from_json_slice(&bytes).expect("restore");
    assert_eq!(restored, record);
    assert_eq!(restored.fingerprint().unwrap(), record.fingerprint().unwrap());
}

#[test]
fn canonical_bytes_still_validate() {
    let mut value: Value = serde_json::from_str(RUNNER_LOG).expect("fixture");
    value["repititions"] = serde_json::json!(0);
    let bytes = to_canonical_json_bytes(&value).expect("canonical bytes");
    let err = from_json_slice::<ExperimentRecord>(&bytes).unwrap_err();
    assert_eq!(err.info().code, "json-read");
}
