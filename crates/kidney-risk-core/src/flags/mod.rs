//! Clinical flag evaluator.
//!
//! Fixed threshold rules over raw vitals, evaluated in order. Rules are
//! independent of each other and of the classifier. A value that does not
//! coerce to a number never fires a rule.

use crate::models::{ClinicalFlag, Field, PatientObservation};

/// How a rule compares a vital against its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    AtLeast,
    Above,
    Below,
}

impl Comparison {
    fn holds(&self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::AtLeast => value >= threshold,
            Comparison::Above => value > threshold,
            Comparison::Below => value < threshold,
        }
    }
}

/// One threshold rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlagRule {
    pub flag: ClinicalFlag,
    pub field: Field,
    pub comparison: Comparison,
    pub threshold: f64,
}

impl FlagRule {
    pub fn matches(&self, observation: &PatientObservation) -> bool {
        let value = observation.number(self.field);
        !value.is_nan() && self.comparison.holds(value, self.threshold)
    }
}

/// The rules, in evaluation order.
pub const CLINICAL_RULES: [FlagRule; 4] = [
    FlagRule {
        flag: ClinicalFlag::Hypertension,
        field: Field::BloodPressure,
        comparison: Comparison::AtLeast,
        threshold: 140.0,
    },
    FlagRule {
        flag: ClinicalFlag::Hyperglycemia,
        field: Field::BloodGlucoseRandom,
        comparison: Comparison::AtLeast,
        threshold: 200.0,
    },
    FlagRule {
        flag: ClinicalFlag::HighCreatinine,
        field: Field::SerumCreatinine,
        comparison: Comparison::Above,
        threshold: 1.2,
    },
    FlagRule {
        flag: ClinicalFlag::LowHemoglobin,
        field: Field::Haemoglobin,
        comparison: Comparison::Below,
        threshold: 12.0,
    },
];

/// Applies [`CLINICAL_RULES`] to observations.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlagEvaluator;

impl FlagEvaluator {
    pub fn new() -> Self {
        Self
    }

    pub fn rules(&self) -> &'static [FlagRule] {
        &CLINICAL_RULES
    }

    /// All flags whose rule matches, in rule order.
    pub fn evaluate(&self, observation: &PatientObservation) -> Vec<ClinicalFlag> {
        CLINICAL_RULES
            .iter()
            .filter(|rule| rule.matches(observation))
            .map(|rule| rule.flag)
            .collect()
    }
}
