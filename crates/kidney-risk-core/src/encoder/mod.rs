//! Feature encoder.
//!
//! Turns a [`PatientObservation`] into the numeric row the classifier was
//! trained on:
//! - Categorical values go through the fixed lookup table ([`CategoricalToken`])
//! - Numeric values are coerced; anything that does not coerce becomes NaN
//! - Columns come out in the configured [`FeatureLayout`] order
//!
//! Encoding itself never fails. NaN markers travel with the vector and the
//! classifier adapter refuses to score a vector that carries one.

mod categorical;
mod layout;

pub use categorical::*;
pub use layout::*;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{Field, FieldKind, FieldValue, PatientObservation};

/// A categorical value that was not in the lookup table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FallbackNotice {
    /// Field that held the value
    pub field: Field,
    /// Value as submitted
    pub value: String,
    /// Closest allowed option, when one is similar enough
    pub suggestion: Option<String>,
}

/// Encoded feature row.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    fields: Vec<Field>,
    values: Vec<f64>,
    fallbacks: Vec<FallbackNotice>,
}

impl FeatureVector {
    /// Values in layout order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Fields in layout order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, field: Field) -> Option<f64> {
        self.fields
            .iter()
            .position(|f| *f == field)
            .map(|i| self.values[i])
    }

    /// Categorical values that fell back to the lenient code.
    pub fn fallbacks(&self) -> &[FallbackNotice] {
        &self.fallbacks
    }

    /// Fields carrying a NaN marker, in layout order.
    pub fn invalid_fields(&self) -> Vec<Field> {
        self.fields
            .iter()
            .zip(&self.values)
            .filter(|(_, v)| v.is_nan())
            .map(|(f, _)| *f)
            .collect()
    }

    /// First field carrying a NaN marker.
    pub fn first_invalid(&self) -> Option<Field> {
        self.fields
            .iter()
            .zip(&self.values)
            .find(|(_, v)| v.is_nan())
            .map(|(f, _)| *f)
    }
}

/// Encoder for patient observations.
#[derive(Debug, Clone, Default)]
pub struct FeatureEncoder {
    layout: FeatureLayout,
    policy: UnknownCategoricalPolicy,
}

impl FeatureEncoder {
    /// Create an encoder for a column layout.
    pub fn new(layout: FeatureLayout, policy: UnknownCategoricalPolicy) -> Self {
        Self { layout, policy }
    }

    pub fn layout(&self) -> &FeatureLayout {
        &self.layout
    }

    pub fn policy(&self) -> UnknownCategoricalPolicy {
        self.policy
    }

    /// Encode an observation.
    pub fn encode(&self, observation: &PatientObservation) -> FeatureVector {
        let mut values = Vec::with_capacity(self.layout.len());
        let mut fallbacks = Vec::new();

        for field in self.layout.fields() {
            let value = match observation.value(*field) {
                FieldValue::Numeric(raw) => raw.coerce(),
                FieldValue::Categorical(text) => match CategoricalToken::parse(text) {
                    Some(token) => token.code(),
                    None => {
                        let notice = self.fallback_notice(*field, text);
                        warn!(
                            field = %field,
                            value = %notice.value,
                            suggestion = ?notice.suggestion,
                            policy = ?self.policy,
                            "Unknown categorical value"
                        );
                        fallbacks.push(notice);
                        match self.policy {
                            UnknownCategoricalPolicy::Lenient => LENIENT_FALLBACK_CODE,
                            UnknownCategoricalPolicy::Strict => f64::NAN,
                        }
                    }
                },
            };
            values.push(value);
        }

        FeatureVector {
            fields: self.layout.fields().to_vec(),
            values,
            fallbacks,
        }
    }

    fn fallback_notice(&self, field: Field, value: &str) -> FallbackNotice {
        let suggestion = match field.kind() {
            FieldKind::Categorical(spec) => suggest_option(value, &spec.options),
            FieldKind::Numeric(_) => None,
        };
        FallbackNotice {
            field,
            value: value.to_string(),
            suggestion: suggestion.map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawValue;

    #[test]
    fn test_encode_defaults() {
        let encoder = FeatureEncoder::default();
        let vector = encoder.encode(&PatientObservation::default());

        assert_eq!(vector.values().len(), 24);
        assert_eq!(vector.get(Field::Age), Some(50.0));
        assert_eq!(vector.get(Field::SpecificGravity), Some(1.020));
        // "normal" → 1, "notpresent" → 0, "good" → 0, "no" → 0
        assert_eq!(vector.get(Field::RedBloodCells), Some(1.0));
        assert_eq!(vector.get(Field::Bacteria), Some(0.0));
        assert_eq!(vector.get(Field::Appetite), Some(0.0));
        assert_eq!(vector.get(Field::Hypertension), Some(0.0));
        assert!(vector.first_invalid().is_none());
        assert!(vector.fallbacks().is_empty());
    }

    #[test]
    fn test_encode_follows_layout() {
        let mut names = FeatureLayout::default().names();
        names.swap(0, 1);
        let layout = FeatureLayout::from_names(&names).unwrap();
        let encoder = FeatureEncoder::new(layout, UnknownCategoricalPolicy::Lenient);

        let vector = encoder.encode(&PatientObservation::default());
        assert_eq!(vector.fields()[0], Field::BloodPressure);
        assert_eq!(vector.values()[0], 80.0);
        assert_eq!(vector.values()[1], 50.0);
    }

    #[test]
    fn test_unknown_categorical_lenient() {
        let obs = PatientObservation {
            hypertension: "Yes".into(),
            appetite: "poor".into(),
            ..Default::default()
        };
        let vector = FeatureEncoder::default().encode(&obs);

        assert_eq!(vector.get(Field::Hypertension), Some(0.0));
        assert_eq!(vector.get(Field::Appetite), Some(1.0));
        assert_eq!(vector.fallbacks().len(), 1);
        assert_eq!(vector.fallbacks()[0].field, Field::Hypertension);
        assert_eq!(vector.fallbacks()[0].suggestion.as_deref(), Some("yes"));
        assert!(vector.first_invalid().is_none());
    }

    #[test]
    fn test_unknown_categorical_strict() {
        let obs = PatientObservation {
            bacteria: "maybe".into(),
            ..Default::default()
        };
        let encoder = FeatureEncoder::new(FeatureLayout::default(), UnknownCategoricalPolicy::Strict);
        let vector = encoder.encode(&obs);

        assert!(vector.get(Field::Bacteria).unwrap().is_nan());
        assert_eq!(vector.first_invalid(), Some(Field::Bacteria));
    }

    #[test]
    fn test_token_from_other_field_is_accepted() {
        // The table is global, so "present" encodes even where "yes"/"no" are expected.
        let obs = PatientObservation {
            diabetes_mellitus: "present".into(),
            ..Default::default()
        };
        let vector = FeatureEncoder::default().encode(&obs);
        assert_eq!(vector.get(Field::DiabetesMellitus), Some(1.0));
        assert!(vector.fallbacks().is_empty());
    }

    #[test]
    fn test_bad_numeric_marks_field() {
        let obs = PatientObservation {
            serum_creatinine: RawValue::Text("high".into()),
            sodium: RawValue::Missing,
            ..Default::default()
        };
        let vector = FeatureEncoder::default().encode(&obs);

        assert!(vector.get(Field::SerumCreatinine).unwrap().is_nan());
        assert_eq!(
            vector.invalid_fields(),
            vec![Field::SerumCreatinine, Field::Sodium]
        );
        assert_eq!(vector.first_invalid(), Some(Field::SerumCreatinine));
    }
}
