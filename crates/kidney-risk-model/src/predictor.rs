//! The predictor trait and its test double.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Predictor errors.
#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("Artifact I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Artifact parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("Expected {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("Feature at index {index} is not a finite number")]
    NonFinite { index: usize },

    #[error("Probability estimates are not supported by this model")]
    ProbabilityUnsupported,

    #[error("Inference error: {0}")]
    Inference(String),
}

pub type PredictorResult<T> = Result<T, PredictorError>;

/// Raw class label as emitted by the model (`0` or `1` for a binary model).
pub type ClassLabel = u8;

/// Per-class probabilities for a binary model.
///
/// `probabilities[i]` is the mass assigned to `classes[i]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClassProbabilities {
    pub classes: [ClassLabel; 2],
    pub probabilities: [f64; 2],
}

impl ClassProbabilities {
    /// Probabilities over the conventional `[0, 1]` class order.
    pub fn binary(p0: f64, p1: f64) -> Self {
        Self {
            classes: [0, 1],
            probabilities: [p0, p1],
        }
    }

    /// Probability mass assigned to `label`, if the model knows that class.
    pub fn probability_of(&self, label: ClassLabel) -> Option<f64> {
        self.classes
            .iter()
            .position(|c| *c == label)
            .map(|i| self.probabilities[i])
    }

    /// Index of the most probable class. Ties go to the first class.
    pub fn argmax(&self) -> usize {
        if self.probabilities[1] > self.probabilities[0] {
            1
        } else {
            0
        }
    }
}

/// An opaque binary classifier.
///
/// Implementations must be safe to share read-only across requests.
pub trait Predictor: Send + Sync {
    /// Predict the class label for one feature row.
    fn predict(&self, features: &[f64]) -> PredictorResult<ClassLabel>;

    /// Per-class probabilities for one feature row.
    ///
    /// Models without probability support keep the default.
    fn predict_proba(&self, _features: &[f64]) -> PredictorResult<ClassProbabilities> {
        Err(PredictorError::ProbabilityUnsupported)
    }

    /// Column names the model was trained with, when the artifact records them.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }
}

/// Check a feature row against the model's expected width.
pub fn check_features(features: &[f64], expected: usize) -> PredictorResult<()> {
    if features.len() != expected {
        return Err(PredictorError::FeatureCount {
            expected,
            actual: features.len(),
        });
    }
    if let Some(index) = features.iter().position(|v| !v.is_finite()) {
        return Err(PredictorError::NonFinite { index });
    }
    Ok(())
}

#[derive(Debug, Clone)]
enum MockProbabilities {
    Unsupported,
    Fixed(ClassProbabilities),
    Failing(String),
}

/// Mock predictor for testing without a trained artifact.
#[derive(Debug)]
pub struct MockPredictor {
    label: ClassLabel,
    predict_error: Option<String>,
    probabilities: MockProbabilities,
    calls: AtomicUsize,
}

impl MockPredictor {
    /// A predictor that always returns `label` and has no probability support.
    pub fn new(label: ClassLabel) -> Self {
        Self {
            label,
            predict_error: None,
            probabilities: MockProbabilities::Unsupported,
            calls: AtomicUsize::new(0),
        }
    }

    /// A predictor whose `predict` always fails.
    pub fn failing(message: &str) -> Self {
        Self {
            predict_error: Some(message.to_string()),
            ..Self::new(0)
        }
    }

    /// Return fixed probabilities over classes `[0, 1]`.
    pub fn with_probabilities(mut self, p0: f64, p1: f64) -> Self {
        self.probabilities = MockProbabilities::Fixed(ClassProbabilities::binary(p0, p1));
        self
    }

    /// Make `predict_proba` fail with an inference error.
    pub fn with_failing_probabilities(mut self, message: &str) -> Self {
        self.probabilities = MockProbabilities::Failing(message.to_string());
        self
    }

    /// Number of `predict` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Predictor for MockPredictor {
    fn predict(&self, _features: &[f64]) -> PredictorResult<ClassLabel> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.predict_error {
            Some(message) => Err(PredictorError::Inference(message.clone())),
            None => Ok(self.label),
        }
    }

    fn predict_proba(&self, _features: &[f64]) -> PredictorResult<ClassProbabilities> {
        match &self.probabilities {
            MockProbabilities::Unsupported => Err(PredictorError::ProbabilityUnsupported),
            MockProbabilities::Fixed(p) => Ok(*p),
            MockProbabilities::Failing(message) => Err(PredictorError::Inference(message.clone())),
        }
    }
}
