//! Risk classifier adapter.
//!
//! Wraps an opaque [`Predictor`] and turns its raw output into an
//! [`AssessmentResult`]:
//! - a failing `predict` is fatal ([`AssessError::ModelUnavailable`])
//! - a missing or failing probability estimate is not: confidence becomes 0.0
//! - the raw label is mapped through the configured [`LabelPolarity`]

mod model_state;

pub use model_state::*;

use std::sync::Arc;

use kidney_risk_model::{ClassLabel, Predictor};
use thiserror::Error;
use tracing::{debug, warn};

use crate::encoder::{FeatureLayout, FeatureVector};
use crate::models::{AssessmentResult, Diagnosis, Field, FieldKind};

/// Fatal assessment errors.
#[derive(Error, Debug)]
pub enum AssessError {
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Could not encode field '{field}': value is missing or not recognized")]
    EncodingFailure { field: Field },
}

impl AssessError {
    /// One-line message for the person who submitted the form.
    pub fn user_message(&self) -> String {
        match self {
            AssessError::ModelUnavailable(_) => {
                "Error: Risk model unavailable. No assessment was performed.".to_string()
            }
            AssessError::EncodingFailure { field } => match field.kind() {
                FieldKind::Categorical(spec) => format!(
                    "Error: {} must be one of {}. No assessment was performed.",
                    field.label(),
                    spec.options.join("/")
                ),
                FieldKind::Numeric(_) => format!(
                    "Error: {} must be a number. No assessment was performed.",
                    field.label()
                ),
            },
        }
    }
}

pub type AssessResult<T> = Result<T, AssessError>;

/// Shared, read-only predictor handle.
pub type SharedPredictor = Arc<dyn Predictor>;

/// Which raw model label means "disease present".
///
/// The bundled model was trained with `0` = chronic kidney disease and
/// `1` = no disease, hence the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelPolarity {
    positive_label: ClassLabel,
}

impl Default for LabelPolarity {
    fn default() -> Self {
        Self { positive_label: 0 }
    }
}

impl LabelPolarity {
    pub fn new(positive_label: ClassLabel) -> Self {
        Self { positive_label }
    }

    pub fn positive_label(&self) -> ClassLabel {
        self.positive_label
    }

    pub fn diagnose(&self, label: ClassLabel) -> Diagnosis {
        if label == self.positive_label {
            Diagnosis::Positive
        } else {
            Diagnosis::Negative
        }
    }
}

/// Adapter around the opaque predictor.
#[derive(Clone)]
pub struct RiskClassifier {
    predictor: SharedPredictor,
    polarity: LabelPolarity,
}

impl std::fmt::Debug for RiskClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskClassifier")
            .field("polarity", &self.polarity)
            .finish_non_exhaustive()
    }
}

impl RiskClassifier {
    /// Create a new adapter.
    pub fn new(predictor: SharedPredictor, polarity: LabelPolarity) -> Self {
        Self {
            predictor,
            polarity,
        }
    }

    pub fn polarity(&self) -> LabelPolarity {
        self.polarity
    }

    /// Check the model's recorded column names against the encoder layout.
    ///
    /// Models that do not record names pass; their width is checked at predict time.
    pub fn check_layout(&self, layout: &FeatureLayout) -> AssessResult<()> {
        match self.predictor.feature_names() {
            Some(names) if !layout.matches_names(names) => {
                Err(AssessError::ModelUnavailable(format!(
                    "model was trained on columns [{}] but the encoder produces [{}]",
                    names.join(", "),
                    layout.names().join(", ")
                )))
            }
            _ => Ok(()),
        }
    }

    /// Classify one encoded observation.
    pub fn assess(&self, vector: &FeatureVector) -> AssessResult<AssessmentResult> {
        if let Some(field) = vector.first_invalid() {
            return Err(AssessError::EncodingFailure { field });
        }

        let label = self
            .predictor
            .predict(vector.values())
            .map_err(|e| AssessError::ModelUnavailable(e.to_string()))?;

        let confidence = match self.predictor.predict_proba(vector.values()) {
            Ok(probs) => match probs.probability_of(label) {
                Some(p) if p.is_finite() => Some((p * 100.0).clamp(0.0, 100.0)),
                _ => {
                    warn!(label, ?probs, "Probabilities do not cover the predicted label");
                    None
                }
            },
            Err(e) => {
                debug!(error = %e, "Confidence unavailable, defaulting to 0");
                None
            }
        };

        let diagnosis = self.polarity.diagnose(label);
        debug!(label, ?diagnosis, ?confidence, "Classified observation");

        Ok(AssessmentResult {
            diagnosis,
            model_label: label,
            confidence: confidence.unwrap_or(0.0),
            confidence_available: confidence.is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::FeatureEncoder;
    use crate::models::{PatientObservation, RawValue};
    use kidney_risk_model::MockPredictor;

    fn vector() -> FeatureVector {
        FeatureEncoder::default().encode(&PatientObservation::default())
    }

    #[test]
    fn test_default_polarity_zero_is_positive() {
        let polarity = LabelPolarity::default();
        assert_eq!(polarity.diagnose(0), Diagnosis::Positive);
        assert_eq!(polarity.diagnose(1), Diagnosis::Negative);

        let flipped = LabelPolarity::new(1);
        assert_eq!(flipped.diagnose(1), Diagnosis::Positive);
    }

    #[test]
    fn test_confidence_from_probabilities() {
        let predictor = Arc::new(MockPredictor::new(0).with_probabilities(0.92, 0.08));
        let classifier = RiskClassifier::new(predictor, LabelPolarity::default());

        let result = classifier.assess(&vector()).unwrap();
        assert_eq!(result.diagnosis, Diagnosis::Positive);
        assert_eq!(result.model_label, 0);
        assert!((result.confidence - 92.0).abs() < 1e-9);
        assert!(result.confidence_available);
    }

    #[test]
    fn test_confidence_unsupported_defaults_to_zero() {
        let predictor = Arc::new(MockPredictor::new(1));
        let classifier = RiskClassifier::new(predictor, LabelPolarity::default());

        let result = classifier.assess(&vector()).unwrap();
        assert_eq!(result.diagnosis, Diagnosis::Negative);
        assert_eq!(result.confidence, 0.0);
        assert!(!result.confidence_available);
    }

    #[test]
    fn test_confidence_failure_defaults_to_zero() {
        let predictor = Arc::new(MockPredictor::new(1).with_failing_probabilities("boom"));
        let classifier = RiskClassifier::new(predictor, LabelPolarity::default());

        let result = classifier.assess(&vector()).unwrap();
        assert_eq!(result.model_label, 1);
        assert_eq!(result.confidence, 0.0);
        assert!(!result.confidence_available);
    }

    #[test]
    fn test_predict_failure_is_model_unavailable() {
        let predictor = Arc::new(MockPredictor::failing("model exploded"));
        let classifier = RiskClassifier::new(predictor, LabelPolarity::default());

        let err = classifier.assess(&vector()).unwrap_err();
        assert!(matches!(err, AssessError::ModelUnavailable(_)));
    }

    #[test]
    fn test_nan_marker_blocks_prediction() {
        let predictor = Arc::new(MockPredictor::new(0));
        let classifier = RiskClassifier::new(predictor.clone(), LabelPolarity::default());

        let obs = PatientObservation {
            blood_urea: RawValue::Text("n/a".into()),
            ..Default::default()
        };
        let vector = FeatureEncoder::default().encode(&obs);

        let err = classifier.assess(&vector).unwrap_err();
        assert!(matches!(
            err,
            AssessError::EncodingFailure {
                field: Field::BloodUrea
            }
        ));
        assert_eq!(predictor.call_count(), 0);
        assert!(err.user_message().contains("Blood Urea"));
    }

    #[test]
    fn test_categorical_encoding_failure_message() {
        let err = AssessError::EncodingFailure {
            field: Field::Bacteria,
        };
        assert_eq!(
            err.user_message(),
            "Error: Bacteria must be one of notpresent/present. No assessment was performed."
        );
    }

    #[test]
    fn test_check_layout_without_names_passes() {
        let classifier = RiskClassifier::new(Arc::new(MockPredictor::new(0)), LabelPolarity::default());
        assert!(classifier.check_layout(&FeatureLayout::default()).is_ok());
    }
}
