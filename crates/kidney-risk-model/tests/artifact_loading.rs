//! Artifact loading tests against files on disk.

use std::io::Write;

use kidney_risk_model::{load_artifact, Predictor, PredictorError};
use proptest::prelude::*;
use tempfile::NamedTempFile;

fn write_artifact(json: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(json.as_bytes()).unwrap();
    f
}

const LOGISTIC: &str = r#"{
    "format_version": "1.0",
    "n_features": 3,
    "feature_names": ["blood_pressure", "serum_creatinine", "haemoglobin"],
    "classes": [0, 1],
    "model": {
        "kind": "logistic_regression",
        "coefficients": [-0.05, -2.0, 0.6],
        "intercept": 4.0
    }
}"#;

#[test]
fn test_load_logistic_artifact() {
    let f = write_artifact(LOGISTIC);
    let model = load_artifact(f.path()).unwrap();

    assert_eq!(model.kind(), "logistic_regression");
    assert_eq!(model.feature_names().unwrap().len(), 3);

    // High pressure, high creatinine, low hemoglobin → class 0
    assert_eq!(model.predict(&[180.0, 6.0, 8.0]).unwrap(), 0);
    // Healthy values → class 1
    assert_eq!(model.predict(&[80.0, 0.9, 15.0]).unwrap(), 1);
}

#[test]
fn test_load_missing_file() {
    let result = load_artifact("/nonexistent/kidney.json");
    assert!(matches!(result, Err(PredictorError::Io(_))));
}

#[test]
fn test_load_invalid_json() {
    let f = write_artifact("not json {{{");
    assert!(matches!(load_artifact(f.path()), Err(PredictorError::Json(_))));
}

#[test]
fn test_load_unknown_kind() {
    let f = write_artifact(
        r#"{"format_version": "1.0", "n_features": 1, "model": {"kind": "svm", "support": []}}"#,
    );
    assert!(load_artifact(f.path()).is_err());
}

proptest! {
    #[test]
    fn prop_probabilities_sum_to_one(bp in 40.0f64..250.0, sc in 0.0f64..50.0, hemo in 1.0f64..25.0) {
        let f = write_artifact(LOGISTIC);
        let model = load_artifact(f.path()).unwrap();
        let probs = model.predict_proba(&[bp, sc, hemo]).unwrap();

        prop_assert!((probs.probabilities[0] + probs.probabilities[1] - 1.0).abs() < 1e-9);
        let label = model.predict(&[bp, sc, hemo]).unwrap();
        prop_assert!(probs.probability_of(label).unwrap() >= 0.5);
    }
}
