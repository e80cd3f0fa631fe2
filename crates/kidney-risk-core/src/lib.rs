//! Kidney Risk Core Library
//!
//! Chronic kidney disease risk screening from a single patient submission.
//!
//! # Architecture
//!
//! ```text
//!                      Patient Observation (24 fields)
//!                                  │
//!                  ┌───────────────┴───────────────┐
//!                  │                               │
//!                  ▼                               ▼
//!           Feature Encoder                Clinical Flag Evaluator
//!        (fixed column order,             (BP, glucose, creatinine,
//!         categorical codes)                  hemoglobin thresholds)
//!                  │                               │
//!                  ▼                               │
//!        Risk Classifier Adapter                   │
//!     (label → diagnosis, confidence)              │
//!                  │                               │
//!                  └───────────────┬───────────────┘
//!                                  ▼
//!                          Report Assembler
//!                    (vitals, flags, three gauges)
//!                                  │
//!                    ┌─────────────┴─────────────┐
//!                    ▼                           ▼
//!               Dashboard                Report Document
//!                                        (text / JSON export)
//! ```
//!
//! # Core Principle
//!
//! **Flags never depend on the model.** They are computed from raw vitals and
//! are reported whatever the diagnosis.
//!
//! # Modules
//!
//! - [`models`]: Domain types (PatientObservation, Report, ClinicalFlag, etc.)
//! - [`encoder`]: Observation to model feature vector
//! - [`classifier`]: Adapter around the opaque predictor, model lifecycle
//! - [`flags`]: Threshold alerts from raw vitals
//! - [`report`]: Report assembly and gauge layout
//! - [`export`]: Report document and downloadable export
//! - [`config`]: YAML configuration
//! - [`pipeline`]: The four components wired together

pub mod classifier;
pub mod config;
pub mod encoder;
pub mod export;
pub mod flags;
pub mod models;
pub mod pipeline;
pub mod report;

// Re-export commonly used types
pub use classifier::{AssessError, LabelPolarity, ModelState, RiskClassifier};
pub use config::{load_config, PipelineConfig};
pub use encoder::{FeatureEncoder, FeatureLayout, FeatureVector};
pub use export::{ReportDocument, ReportExport};
pub use flags::FlagEvaluator;
pub use models::{
    AssessmentResult, ClinicalFlag, Diagnosis, Field, GaugeSpec, PatientObservation, RawValue,
    Report, Vitals,
};
pub use pipeline::{Assessment, AssessmentPipeline};
pub use report::ReportAssembler;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::path::{Path, PathBuf};
use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum KidneyRiskError {
    #[error("{0}")]
    ModelUnavailable(String),

    #[error("{0}")]
    EncodingFailure(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<AssessError> for KidneyRiskError {
    fn from(e: AssessError) -> Self {
        match e {
            AssessError::ModelUnavailable(_) => KidneyRiskError::ModelUnavailable(e.user_message()),
            AssessError::EncodingFailure { .. } => KidneyRiskError::EncodingFailure(e.user_message()),
        }
    }
}

impl From<config::ConfigError> for KidneyRiskError {
    fn from(e: config::ConfigError) -> Self {
        KidneyRiskError::ConfigError(e.to_string())
    }
}

impl From<serde_json::Error> for KidneyRiskError {
    fn from(e: serde_json::Error) -> Self {
        KidneyRiskError::SerializationError(e.to_string())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Build an assessor. `config_path` is a YAML file; `model_path` overrides
/// the model named there.
///
/// A missing or broken model does not fail here: the assessor is returned
/// and every assessment reports the model as unavailable.
#[uniffi::export]
pub fn open_assessor(
    model_path: Option<String>,
    config_path: Option<String>,
) -> Result<Arc<KidneyRiskCore>, KidneyRiskError> {
    let mut config = match config_path {
        Some(path) => load_config(Path::new(&path))?,
        None => PipelineConfig::default(),
    };
    if let Some(path) = model_path {
        config.model_path = Some(PathBuf::from(path));
    }

    let pipeline = AssessmentPipeline::from_config(&config)?;
    Ok(Arc::new(KidneyRiskCore { pipeline }))
}

/// The collection form's initial values.
#[uniffi::export]
pub fn default_observation() -> FfiObservation {
    PatientObservation::default().into()
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe assessor for FFI. The pipeline is read-only after construction.
#[derive(uniffi::Object)]
pub struct KidneyRiskCore {
    pipeline: AssessmentPipeline,
}

#[uniffi::export]
impl KidneyRiskCore {
    /// True when a model is loaded and matches the feature layout.
    pub fn is_ready(&self) -> bool {
        self.pipeline.is_ready()
    }

    /// Assess a form submission.
    pub fn assess(&self, observation: FfiObservation) -> Result<FfiAssessment, KidneyRiskError> {
        self.run(&observation.into())
    }

    /// Assess a submission given as JSON. Numeric fields may be strings.
    pub fn assess_json(&self, json: String) -> Result<FfiAssessment, KidneyRiskError> {
        let observation: PatientObservation = serde_json::from_str(&json)
            .map_err(|e| KidneyRiskError::InvalidInput(e.to_string()))?;
        self.run(&observation)
    }
}

impl KidneyRiskCore {
    fn run(&self, observation: &PatientObservation) -> Result<FfiAssessment, KidneyRiskError> {
        let assessment = self.pipeline.assess(observation)?;
        let export = self.pipeline.export(&assessment)?;
        let report_json = export.to_json()?;
        let document_text = export.to_text();

        let report = assessment.report;
        Ok(FfiAssessment {
            diagnosis: report.result.diagnosis.description().to_string(),
            risk_level: report.result.diagnosis.risk_level().to_string(),
            positive: report.result.diagnosis.is_positive(),
            model_label: report.result.model_label,
            confidence: report.result.confidence,
            confidence_available: report.result.confidence_available,
            flags_summary: models::flags_summary(&report.flags),
            flags: report.flags.iter().map(|f| f.to_string()).collect(),
            gauges: report.gauges.iter().map(FfiGauge::from).collect(),
            fallbacks: assessment
                .fallbacks
                .iter()
                .map(|n| match &n.suggestion {
                    Some(s) => format!("{}: '{}' (did you mean '{}'?)", n.field, n.value, s),
                    None => format!("{}: '{}'", n.field, n.value),
                })
                .collect(),
            generated_at: report.generated_at,
            document_text,
            report_json,
        })
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// Form submission with every field filled in.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiObservation {
    pub age: f64,
    pub blood_pressure: f64,
    pub specific_gravity: f64,
    pub albumin: f64,
    pub sugar: f64,
    pub blood_glucose_random: f64,
    pub blood_urea: f64,
    pub serum_creatinine: f64,
    pub sodium: f64,
    pub potassium: f64,
    pub haemoglobin: f64,
    pub packed_cell_volume: f64,
    pub white_blood_cell_count: f64,
    pub red_blood_cell_count: f64,
    pub hypertension: String,
    pub diabetes_mellitus: String,
    pub coronary_artery_disease: String,
    pub pedal_edema: String,
    pub anemia: String,
    pub appetite: String,
    pub red_blood_cells: String,
    pub pus_cell: String,
    pub pus_cell_clumps: String,
    pub bacteria: String,
}

impl From<FfiObservation> for PatientObservation {
    fn from(obs: FfiObservation) -> Self {
        PatientObservation {
            age: obs.age.into(),
            blood_pressure: obs.blood_pressure.into(),
            specific_gravity: obs.specific_gravity.into(),
            albumin: obs.albumin.into(),
            sugar: obs.sugar.into(),
            blood_glucose_random: obs.blood_glucose_random.into(),
            blood_urea: obs.blood_urea.into(),
            serum_creatinine: obs.serum_creatinine.into(),
            sodium: obs.sodium.into(),
            potassium: obs.potassium.into(),
            haemoglobin: obs.haemoglobin.into(),
            packed_cell_volume: obs.packed_cell_volume.into(),
            white_blood_cell_count: obs.white_blood_cell_count.into(),
            red_blood_cell_count: obs.red_blood_cell_count.into(),
            hypertension: obs.hypertension,
            diabetes_mellitus: obs.diabetes_mellitus,
            coronary_artery_disease: obs.coronary_artery_disease,
            pedal_edema: obs.pedal_edema,
            anemia: obs.anemia,
            appetite: obs.appetite,
            red_blood_cells: obs.red_blood_cells,
            pus_cell: obs.pus_cell,
            pus_cell_clumps: obs.pus_cell_clumps,
            bacteria: obs.bacteria,
        }
    }
}

impl From<PatientObservation> for FfiObservation {
    fn from(obs: PatientObservation) -> Self {
        FfiObservation {
            age: obs.number(Field::Age),
            blood_pressure: obs.number(Field::BloodPressure),
            specific_gravity: obs.number(Field::SpecificGravity),
            albumin: obs.number(Field::Albumin),
            sugar: obs.number(Field::Sugar),
            blood_glucose_random: obs.number(Field::BloodGlucoseRandom),
            blood_urea: obs.number(Field::BloodUrea),
            serum_creatinine: obs.number(Field::SerumCreatinine),
            sodium: obs.number(Field::Sodium),
            potassium: obs.number(Field::Potassium),
            haemoglobin: obs.number(Field::Haemoglobin),
            packed_cell_volume: obs.number(Field::PackedCellVolume),
            white_blood_cell_count: obs.number(Field::WhiteBloodCellCount),
            red_blood_cell_count: obs.number(Field::RedBloodCellCount),
            hypertension: obs.hypertension,
            diabetes_mellitus: obs.diabetes_mellitus,
            coronary_artery_disease: obs.coronary_artery_disease,
            pedal_edema: obs.pedal_edema,
            anemia: obs.anemia,
            appetite: obs.appetite,
            red_blood_cells: obs.red_blood_cells,
            pus_cell: obs.pus_cell,
            pus_cell_clumps: obs.pus_cell_clumps,
            bacteria: obs.bacteria,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiGauge {
    pub title: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub warn_threshold: f64,
    pub danger_threshold: f64,
    /// "safe", "warn" or "danger"
    pub band: String,
    pub color: String,
    /// Colored axis segments, low to high
    pub steps: Vec<FfiGaugeStep>,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiGaugeStep {
    pub from: f64,
    pub to: f64,
    pub band: String,
    pub color: String,
}

impl From<&GaugeSpec> for FfiGauge {
    fn from(gauge: &GaugeSpec) -> Self {
        let band = gauge.band();
        Self {
            title: gauge.title.clone(),
            value: gauge.value,
            min: gauge.min,
            max: gauge.max,
            warn_threshold: gauge.warn_threshold(),
            danger_threshold: gauge.danger_threshold(),
            band: band.as_str().to_string(),
            color: band.color().to_string(),
            steps: gauge
                .steps()
                .into_iter()
                .map(|step| FfiGaugeStep {
                    from: step.range[0],
                    to: step.range[1],
                    band: step.band.as_str().to_string(),
                    color: step.color,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAssessment {
    pub diagnosis: String,
    pub risk_level: String,
    pub positive: bool,
    pub model_label: u8,
    pub confidence: f64,
    pub confidence_available: bool,
    pub flags: Vec<String>,
    pub flags_summary: Option<String>,
    pub gauges: Vec<FfiGauge>,
    /// Categorical values that were not recognized
    pub fallbacks: Vec<String>,
    pub generated_at: String,
    pub document_text: String,
    pub report_json: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_assessor_without_model() {
        let core = open_assessor(None, None).unwrap();
        assert!(!core.is_ready());

        let err = core.assess(default_observation()).unwrap_err();
        match err {
            KidneyRiskError::ModelUnavailable(msg) => {
                assert_eq!(msg, "Error: Risk model unavailable. No assessment was performed.")
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_open_assessor_missing_config() {
        let result = open_assessor(None, Some("/nonexistent/kidney.yaml".into()));
        assert!(matches!(result, Err(KidneyRiskError::ConfigError(_))));
    }

    #[test]
    fn test_observation_conversion() {
        let ffi = default_observation();
        assert_eq!(ffi.age, 50.0);
        assert_eq!(ffi.pus_cell_clumps, "notpresent");

        let obs: PatientObservation = ffi.into();
        assert_eq!(obs, PatientObservation::default());
    }

    #[test]
    fn test_assess_with_mock_predictor() {
        let predictor = Arc::new(kidney_risk_model::MockPredictor::new(0).with_probabilities(0.8, 0.2));
        let pipeline = AssessmentPipeline::with_predictor(&PipelineConfig::default(), predictor).unwrap();
        let core = KidneyRiskCore { pipeline };

        let mut obs = default_observation();
        obs.blood_pressure = 150.0;
        obs.appetite = "excellent".into();

        let out = core.assess(obs).unwrap();
        assert!(out.positive);
        assert_eq!(out.risk_level, "HIGH RISK");
        assert_eq!(out.flags, vec!["Hypertension".to_string()]);
        assert_eq!(out.flags_summary.as_deref(), Some("Clinical Flags: Hypertension"));
        assert_eq!(out.fallbacks.len(), 1);
        assert_eq!(out.gauges[0].band, "danger");
        let bands: Vec<&str> = out.gauges[0].steps.iter().map(|s| s.band.as_str()).collect();
        assert_eq!(bands, vec!["safe", "warn", "danger"]);
        assert_eq!((out.gauges[0].steps[2].from, out.gauges[0].steps[2].to), (140.0, 200.0));
        assert!(out.document_text.contains("Confidence Level: 80.00%"));
        assert!(out.report_json.contains("SHA-256"));
    }

    #[test]
    fn test_descending_gauge_steps() {
        let mut config = PipelineConfig::default();
        config.gauges.hemoglobin.danger_direction = models::DangerDirection::Descending;
        let predictor = Arc::new(kidney_risk_model::MockPredictor::new(1));
        let pipeline = AssessmentPipeline::with_predictor(&config, predictor).unwrap();
        let core = KidneyRiskCore { pipeline };

        let out = core.assess(default_observation()).unwrap();
        let hemo = out.gauges.iter().find(|g| g.title == "Hemoglobin").unwrap();
        let colors: Vec<&str> = hemo.steps.iter().map(|s| s.color.as_str()).collect();
        assert_eq!(colors, vec!["#ef4444", "#f59e0b", "#10b981"]);
        assert_eq!((hemo.warn_threshold, hemo.danger_threshold), (13.5, 12.0));
    }

    #[test]
    fn test_assess_json_text_value() {
        let predictor = Arc::new(kidney_risk_model::MockPredictor::new(1));
        let pipeline = AssessmentPipeline::with_predictor(&PipelineConfig::default(), predictor).unwrap();
        let core = KidneyRiskCore { pipeline };

        let mut json = serde_json::to_value(PatientObservation::default()).unwrap();
        json["blood_urea"] = serde_json::json!("44.5");
        let out = core.assess_json(json.to_string()).unwrap();
        assert!(!out.positive);
        assert!(!out.confidence_available);

        json["haemoglobin"] = serde_json::json!("low");
        let err = core.assess_json(json.to_string()).unwrap_err();
        match err {
            KidneyRiskError::EncodingFailure(msg) => assert!(msg.contains("Hemoglobin")),
            other => panic!("unexpected error: {}", other),
        }

        json["haemoglobin"] = serde_json::json!(15.0);
        json["age"] = serde_json::json!(true);
        let err = core.assess_json(json.to_string()).unwrap_err();
        match err {
            KidneyRiskError::EncodingFailure(msg) => {
                assert_eq!(msg, "Error: Age must be a number. No assessment was performed.")
            }
            other => panic!("unexpected error: {}", other),
        }

        let err = core.assess_json("not json".into()).unwrap_err();
        assert!(matches!(err, KidneyRiskError::InvalidInput(_)));
    }
}
