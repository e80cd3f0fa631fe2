//! Assessment pipeline.
//!
//! ```text
//! observation ─► FeatureEncoder ─► RiskClassifier ─► (diagnosis, confidence) ─┐
//!      │                                                                       ├─► ReportAssembler ─► Report
//!      └────────► FlagEvaluator ─────────────────────► flags ─────────────────┘
//! ```
//!
//! One call handles one submission, start to finish. Any fatal error aborts
//! the whole submission; no partial report is produced.

use tracing::{error, info, info_span};

use crate::classifier::{
    AssessError, AssessResult, LabelPolarity, ModelState, RiskClassifier, SharedPredictor,
};
use crate::config::{ConfigResult, PipelineConfig};
use crate::encoder::{FallbackNotice, FeatureEncoder};
use crate::export::{ReportDocument, ReportExport};
use crate::flags::FlagEvaluator;
use crate::models::{flags_summary, PatientObservation, Report};
use crate::report::ReportAssembler;

/// Result of one successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    /// The assembled report
    pub report: Report,
    /// Categorical values that fell back to the lenient code
    pub fallbacks: Vec<FallbackNotice>,
}

impl Assessment {
    /// Document content for the report.
    pub fn document(&self) -> ReportDocument {
        ReportDocument::from_report(&self.report)
    }

    /// Dashboard warning line, if any flag fired.
    pub fn flags_summary(&self) -> Option<String> {
        flags_summary(&self.report.flags)
    }
}

/// The configured pipeline. Built once, then used for every submission.
#[derive(Debug)]
pub struct AssessmentPipeline {
    encoder: FeatureEncoder,
    classifier: Result<RiskClassifier, String>,
    flags: FlagEvaluator,
    assembler: ReportAssembler,
    system_id: Option<String>,
}

fn unavailable_reason(err: AssessError) -> String {
    match err {
        AssessError::ModelUnavailable(reason) => reason,
        other => other.to_string(),
    }
}

impl AssessmentPipeline {
    /// Build a pipeline around a loaded (or failed) model.
    ///
    /// Configuration errors are returned. Model problems are not: they are
    /// reported as `ModelUnavailable` by every submission.
    pub fn new(config: &PipelineConfig, model: ModelState) -> ConfigResult<Self> {
        let layout = config.validate()?;
        let polarity = LabelPolarity::new(config.positive_label);

        let classifier = model
            .predictor()
            .map(|predictor| RiskClassifier::new(predictor, polarity))
            .and_then(|classifier| classifier.check_layout(&layout).map(|_| classifier))
            .map_err(|e| {
                error!(error = %e, "Classifier not ready");
                unavailable_reason(e)
            });

        Ok(Self {
            encoder: FeatureEncoder::new(layout, config.unknown_categorical),
            classifier,
            flags: FlagEvaluator::new(),
            assembler: ReportAssembler::new(config.gauges),
            system_id: config.system_id.clone(),
        })
    }

    /// Build a pipeline, loading the model named in the configuration.
    pub fn from_config(config: &PipelineConfig) -> ConfigResult<Self> {
        let model = ModelState::load(config.model_path.as_deref());
        Self::new(config, model)
    }

    /// Build a pipeline around an in-process predictor.
    pub fn with_predictor(config: &PipelineConfig, predictor: SharedPredictor) -> ConfigResult<Self> {
        Self::new(config, ModelState::from_predictor(predictor))
    }

    /// True when submissions can be classified.
    pub fn is_ready(&self) -> bool {
        self.classifier.is_ok()
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    /// Run one submission through the pipeline.
    pub fn assess(&self, observation: &PatientObservation) -> AssessResult<Assessment> {
        let span = info_span!("assessment");
        let _guard = span.enter();

        let classifier = self
            .classifier
            .as_ref()
            .map_err(|reason| AssessError::ModelUnavailable(reason.clone()))?;

        let vector = self.encoder.encode(observation);
        let result = classifier.assess(&vector)?;
        let flags = self.flags.evaluate(observation);
        let report = self.assembler.assemble(observation, result, flags);

        info!(
            diagnosis = ?report.result.diagnosis,
            confidence = report.result.confidence,
            flags = report.flags.len(),
            fallbacks = vector.fallbacks().len(),
            "Assessment complete"
        );

        Ok(Assessment {
            report,
            fallbacks: vector.fallbacks().to_vec(),
        })
    }

    /// Wrap an assessment's report for download.
    pub fn export(&self, assessment: &Assessment) -> Result<ReportExport, serde_json::Error> {
        ReportExport::new(assessment.report.clone(), self.system_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClinicalFlag, Diagnosis, RawValue};
    use kidney_risk_model::MockPredictor;
    use std::sync::Arc;

    #[test]
    fn test_assess_default_observation() {
        let predictor = Arc::new(MockPredictor::new(1).with_probabilities(0.1, 0.9));
        let pipeline = AssessmentPipeline::with_predictor(&PipelineConfig::default(), predictor).unwrap();

        let assessment = pipeline.assess(&PatientObservation::default()).unwrap();
        assert_eq!(assessment.report.result.diagnosis, Diagnosis::Negative);
        assert!((assessment.report.result.confidence - 90.0).abs() < 1e-9);
        assert!(assessment.report.flags.is_empty());
        assert_eq!(assessment.flags_summary(), None);
        assert_eq!(assessment.report.gauges.len(), 3);
    }

    #[test]
    fn test_missing_model_fails_fast() {
        let pipeline = AssessmentPipeline::new(
            &PipelineConfig::default(),
            ModelState::Unavailable("kidney.json not found".into()),
        )
        .unwrap();
        assert!(!pipeline.is_ready());

        let err = pipeline.assess(&PatientObservation::default()).unwrap_err();
        match err {
            AssessError::ModelUnavailable(reason) => assert_eq!(reason, "kidney.json not found"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_encoding_failure_aborts() {
        let predictor = Arc::new(MockPredictor::new(0));
        let pipeline =
            AssessmentPipeline::with_predictor(&PipelineConfig::default(), predictor.clone()).unwrap();

        let obs = PatientObservation {
            blood_pressure: RawValue::Text("one-forty".into()),
            ..Default::default()
        };
        assert!(matches!(
            pipeline.assess(&obs),
            Err(AssessError::EncodingFailure { .. })
        ));
        assert_eq!(predictor.call_count(), 0);
    }

    #[test]
    fn test_positive_label_configurable() {
        let config = PipelineConfig {
            positive_label: 1,
            ..Default::default()
        };
        let pipeline = AssessmentPipeline::with_predictor(&config, Arc::new(MockPredictor::new(1))).unwrap();

        let obs = PatientObservation {
            blood_pressure: 160.0.into(),
            ..Default::default()
        };
        let assessment = pipeline.assess(&obs).unwrap();
        assert_eq!(assessment.report.result.diagnosis, Diagnosis::Positive);
        assert_eq!(assessment.report.flags, vec![ClinicalFlag::Hypertension]);
        assert_eq!(
            assessment.flags_summary().as_deref(),
            Some("Clinical Flags: Hypertension")
        );
    }

    #[test]
    fn test_export_carries_system_id() {
        let config = PipelineConfig {
            system_id: Some("ward-3".into()),
            ..Default::default()
        };
        let pipeline = AssessmentPipeline::with_predictor(&config, Arc::new(MockPredictor::new(0))).unwrap();
        let assessment = pipeline.assess(&PatientObservation::default()).unwrap();

        let export = pipeline.export(&assessment).unwrap();
        assert_eq!(export.metadata.system_id.as_deref(), Some("ward-3"));
        assert!(export.verify().unwrap());
    }
}
