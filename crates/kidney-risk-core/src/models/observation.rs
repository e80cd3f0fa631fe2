//! Patient observation models.

use serde::{Deserialize, Serialize};

use super::field::{Field, FieldKind};

/// A numeric form value as submitted.
///
/// Forms may deliver numbers, numeric strings, or nothing at all. Coercion
/// happens in the encoder; a value that does not coerce becomes NaN.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
    /// Any other JSON value (bool, array, object)
    Invalid(serde_json::Value),
}

impl RawValue {
    /// Coerce to a number. Unparseable, non-finite or missing values yield NaN.
    pub fn coerce(&self) -> f64 {
        let value = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
            RawValue::Missing | RawValue::Invalid(_) => f64::NAN,
        };
        if value.is_finite() {
            value
        } else {
            f64::NAN
        }
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// A borrowed view of one observation field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Numeric(&'a RawValue),
    Categorical(&'a str),
}

/// One patient submission. Built once per request and only read afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientObservation {
    // Demographics & vitals
    #[serde(default)]
    pub age: RawValue,
    #[serde(default)]
    pub blood_pressure: RawValue,
    #[serde(default)]
    pub specific_gravity: RawValue,
    #[serde(default)]
    pub albumin: RawValue,
    #[serde(default)]
    pub sugar: RawValue,

    // Blood chemistry
    #[serde(default)]
    pub blood_glucose_random: RawValue,
    #[serde(default)]
    pub blood_urea: RawValue,
    #[serde(default)]
    pub serum_creatinine: RawValue,
    #[serde(default)]
    pub sodium: RawValue,
    #[serde(default)]
    pub potassium: RawValue,
    #[serde(default)]
    pub haemoglobin: RawValue,

    // Hematology
    #[serde(default)]
    pub packed_cell_volume: RawValue,
    #[serde(default)]
    pub white_blood_cell_count: RawValue,
    #[serde(default)]
    pub red_blood_cell_count: RawValue,

    // History
    pub hypertension: String,
    pub diabetes_mellitus: String,
    pub coronary_artery_disease: String,
    #[serde(alias = "peda_edema")]
    pub pedal_edema: String,
    #[serde(alias = "aanemia")]
    pub anemia: String,
    pub appetite: String,

    // Microscopic examination
    pub red_blood_cells: String,
    pub pus_cell: String,
    pub pus_cell_clumps: String,
    pub bacteria: String,
}

impl Default for PatientObservation {
    /// The collection form's initial state.
    fn default() -> Self {
        Self {
            age: 50.0.into(),
            blood_pressure: 80.0.into(),
            specific_gravity: 1.020.into(),
            albumin: 0.0.into(),
            sugar: 0.0.into(),
            blood_glucose_random: 120.0.into(),
            blood_urea: 36.0.into(),
            serum_creatinine: 1.2.into(),
            sodium: 137.0.into(),
            potassium: 4.0.into(),
            haemoglobin: 15.0.into(),
            packed_cell_volume: 44.0.into(),
            white_blood_cell_count: 7800.0.into(),
            red_blood_cell_count: 5.2.into(),
            hypertension: "no".into(),
            diabetes_mellitus: "no".into(),
            coronary_artery_disease: "no".into(),
            pedal_edema: "no".into(),
            anemia: "no".into(),
            appetite: "good".into(),
            red_blood_cells: "normal".into(),
            pus_cell: "normal".into(),
            pus_cell_clumps: "notpresent".into(),
            bacteria: "notpresent".into(),
        }
    }
}

impl PatientObservation {
    /// Borrow the raw value of a field.
    pub fn value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Age => FieldValue::Numeric(&self.age),
            Field::BloodPressure => FieldValue::Numeric(&self.blood_pressure),
            Field::SpecificGravity => FieldValue::Numeric(&self.specific_gravity),
            Field::Albumin => FieldValue::Numeric(&self.albumin),
            Field::Sugar => FieldValue::Numeric(&self.sugar),
            Field::BloodGlucoseRandom => FieldValue::Numeric(&self.blood_glucose_random),
            Field::BloodUrea => FieldValue::Numeric(&self.blood_urea),
            Field::SerumCreatinine => FieldValue::Numeric(&self.serum_creatinine),
            Field::Sodium => FieldValue::Numeric(&self.sodium),
            Field::Potassium => FieldValue::Numeric(&self.potassium),
            Field::Haemoglobin => FieldValue::Numeric(&self.haemoglobin),
            Field::PackedCellVolume => FieldValue::Numeric(&self.packed_cell_volume),
            Field::WhiteBloodCellCount => FieldValue::Numeric(&self.white_blood_cell_count),
            Field::RedBloodCellCount => FieldValue::Numeric(&self.red_blood_cell_count),
            Field::Hypertension => FieldValue::Categorical(&self.hypertension),
            Field::DiabetesMellitus => FieldValue::Categorical(&self.diabetes_mellitus),
            Field::CoronaryArteryDisease => FieldValue::Categorical(&self.coronary_artery_disease),
            Field::PedalEdema => FieldValue::Categorical(&self.pedal_edema),
            Field::Anemia => FieldValue::Categorical(&self.anemia),
            Field::Appetite => FieldValue::Categorical(&self.appetite),
            Field::RedBloodCells => FieldValue::Categorical(&self.red_blood_cells),
            Field::PusCell => FieldValue::Categorical(&self.pus_cell),
            Field::PusCellClumps => FieldValue::Categorical(&self.pus_cell_clumps),
            Field::Bacteria => FieldValue::Categorical(&self.bacteria),
        }
    }

    /// Coerced numeric value of a field; NaN for categoricals and bad input.
    pub fn number(&self, field: Field) -> f64 {
        match self.value(field) {
            FieldValue::Numeric(raw) => raw.coerce(),
            FieldValue::Categorical(_) => f64::NAN,
        }
    }

    /// Numeric fields outside the collection form's input range.
    ///
    /// The pipeline does not enforce ranges; this is for the collection layer.
    pub fn out_of_range_fields(&self) -> Vec<Field> {
        Field::ALL
            .iter()
            .copied()
            .filter(|field| match field.kind() {
                FieldKind::Numeric(spec) => {
                    let v = self.number(*field);
                    v.is_finite() && (v < spec.min || v > spec.max)
                }
                FieldKind::Categorical(_) => false,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce() {
        assert_eq!(RawValue::Number(1.5).coerce(), 1.5);
        assert_eq!(RawValue::Text(" 140 ".into()).coerce(), 140.0);
        assert!(RawValue::Text("high".into()).coerce().is_nan());
        assert!(RawValue::Missing.coerce().is_nan());
        assert!(RawValue::Number(f64::INFINITY).coerce().is_nan());
        assert!(RawValue::Invalid(serde_json::json!(true)).coerce().is_nan());
    }

    #[test]
    fn test_deserialize_non_scalar_numeric() {
        let mut json = serde_json::to_value(PatientObservation::default()).unwrap();
        json["age"] = serde_json::json!(true);
        json["sodium"] = serde_json::json!({"v": 3});
        json["potassium"] = serde_json::json!([4.0]);

        let obs: PatientObservation = serde_json::from_value(json).unwrap();
        assert!(matches!(obs.age, RawValue::Invalid(_)));
        assert!(obs.number(Field::Age).is_nan());
        assert!(obs.number(Field::Sodium).is_nan());
        assert!(obs.number(Field::Potassium).is_nan());
    }

    #[test]
    fn test_default_matches_form_defaults() {
        let obs = PatientObservation::default();
        for field in Field::ALL {
            match (field.kind(), obs.value(field)) {
                (FieldKind::Numeric(spec), FieldValue::Numeric(raw)) => {
                    assert_eq!(raw.coerce(), spec.default, "{}", field)
                }
                (FieldKind::Categorical(spec), FieldValue::Categorical(v)) => {
                    assert_eq!(v, spec.default_option(), "{}", field)
                }
                _ => panic!("kind mismatch for {}", field),
            }
        }
        assert!(obs.out_of_range_fields().is_empty());
    }

    #[test]
    fn test_out_of_range() {
        let obs = PatientObservation {
            age: 130.0.into(),
            blood_pressure: "bad".into(),
            ..Default::default()
        };
        // Unparseable values are an encoding concern, not a range concern.
        assert_eq!(obs.out_of_range_fields(), vec![Field::Age]);
    }

    #[test]
    fn test_deserialize_mixed_input() {
        let json = r#"{
            "age": 62, "blood_pressure": "150", "specific_gravity": 1.015,
            "albumin": 2, "sugar": 0, "blood_glucose_random": 250.0,
            "blood_urea": 60, "serum_creatinine": null, "sodium": 135,
            "potassium": 4.5, "haemoglobin": 10.1, "packed_cell_volume": 32,
            "white_blood_cell_count": 9800, "red_blood_cell_count": 3.9,
            "hypertension": "yes", "diabetes_mellitus": "yes",
            "coronary_artery_disease": "no", "peda_edema": "yes", "aanemia": "yes",
            "appetite": "poor", "red_blood_cells": "abnormal", "pus_cell": "abnormal",
            "pus_cell_clumps": "present", "bacteria": "notpresent"
        }"#;
        let obs: PatientObservation = serde_json::from_str(json).unwrap();

        assert_eq!(obs.blood_pressure, RawValue::Text("150".into()));
        assert_eq!(obs.number(Field::BloodPressure), 150.0);
        assert_eq!(obs.serum_creatinine, RawValue::Missing);
        assert_eq!(obs.pedal_edema, "yes");
        assert!(obs.number(Field::Hypertension).is_nan());
    }
}
