//! Classification outcome models.

use kidney_risk_model::ClassLabel;
use serde::{Deserialize, Serialize};

/// Disease finding derived from the model label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Diagnosis {
    Positive,
    Negative,
}

impl Diagnosis {
    pub fn is_positive(&self) -> bool {
        matches!(self, Diagnosis::Positive)
    }

    /// Diagnosis line shown on the dashboard and the document.
    pub fn description(&self) -> &'static str {
        match self {
            Diagnosis::Positive => "Positive for Chronic Kidney Disease",
            Diagnosis::Negative => "Negative for Chronic Kidney Disease",
        }
    }

    /// Short risk badge.
    pub fn risk_level(&self) -> &'static str {
        match self {
            Diagnosis::Positive => "HIGH RISK",
            Diagnosis::Negative => "LOW RISK",
        }
    }
}

/// Output of the risk classifier adapter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssessmentResult {
    /// Finding after applying the configured label polarity
    pub diagnosis: Diagnosis,
    /// Label exactly as the model emitted it
    pub model_label: ClassLabel,
    /// Probability of the predicted label, as a percentage in [0, 100]
    pub confidence: f64,
    /// False when the model gave no probability estimate and confidence defaulted to 0
    pub confidence_available: bool,
}

impl AssessmentResult {
    /// Dashboard rendering, one decimal.
    pub fn confidence_display(&self) -> String {
        format!("{:.1}%", self.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnosis_text() {
        assert_eq!(
            Diagnosis::Positive.description(),
            "Positive for Chronic Kidney Disease"
        );
        assert_eq!(Diagnosis::Negative.risk_level(), "LOW RISK");
        assert!(Diagnosis::Positive.is_positive());
    }

    #[test]
    fn test_confidence_display() {
        let result = AssessmentResult {
            diagnosis: Diagnosis::Negative,
            model_label: 1,
            confidence: 87.456,
            confidence_available: true,
        };
        assert_eq!(result.confidence_display(), "87.5%");
    }
}
