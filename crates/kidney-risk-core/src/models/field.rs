//! Observation field catalogue.
//!
//! Every field carries the column name the classifier was trained with.
//! Two of those names keep the training data's spellings (`peda_edema`,
//! `aanemia`); they are part of the model contract.

use serde::{Deserialize, Serialize};

/// One field of a patient observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Age,
    BloodPressure,
    SpecificGravity,
    Albumin,
    Sugar,
    RedBloodCells,
    PusCell,
    PusCellClumps,
    Bacteria,
    BloodGlucoseRandom,
    BloodUrea,
    SerumCreatinine,
    Sodium,
    Potassium,
    Haemoglobin,
    PackedCellVolume,
    WhiteBloodCellCount,
    RedBloodCellCount,
    Hypertension,
    DiabetesMellitus,
    CoronaryArteryDisease,
    Appetite,
    #[serde(rename = "peda_edema")]
    PedalEdema,
    #[serde(rename = "aanemia")]
    Anemia,
}

/// Numeric field metadata for the input-collection layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericSpec {
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

/// Categorical field metadata: the two allowed options, the first is the form default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoricalSpec {
    pub options: [&'static str; 2],
}

impl CategoricalSpec {
    pub fn default_option(&self) -> &'static str {
        self.options[0]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Numeric(NumericSpec),
    Categorical(CategoricalSpec),
}

const YES_NO: CategoricalSpec = CategoricalSpec {
    options: ["no", "yes"],
};
const NORMAL_ABNORMAL: CategoricalSpec = CategoricalSpec {
    options: ["normal", "abnormal"],
};
const NOTPRESENT_PRESENT: CategoricalSpec = CategoricalSpec {
    options: ["notpresent", "present"],
};
const GOOD_POOR: CategoricalSpec = CategoricalSpec {
    options: ["good", "poor"],
};

fn numeric(min: f64, max: f64, default: f64) -> FieldKind {
    FieldKind::Numeric(NumericSpec { min, max, default })
}

impl Field {
    /// All fields, in the training column order of the bundled model.
    pub const ALL: [Field; 24] = [
        Field::Age,
        Field::BloodPressure,
        Field::SpecificGravity,
        Field::Albumin,
        Field::Sugar,
        Field::RedBloodCells,
        Field::PusCell,
        Field::PusCellClumps,
        Field::Bacteria,
        Field::BloodGlucoseRandom,
        Field::BloodUrea,
        Field::SerumCreatinine,
        Field::Sodium,
        Field::Potassium,
        Field::Haemoglobin,
        Field::PackedCellVolume,
        Field::WhiteBloodCellCount,
        Field::RedBloodCellCount,
        Field::Hypertension,
        Field::DiabetesMellitus,
        Field::CoronaryArteryDisease,
        Field::Appetite,
        Field::PedalEdema,
        Field::Anemia,
    ];

    /// Model column name.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Age => "age",
            Field::BloodPressure => "blood_pressure",
            Field::SpecificGravity => "specific_gravity",
            Field::Albumin => "albumin",
            Field::Sugar => "sugar",
            Field::RedBloodCells => "red_blood_cells",
            Field::PusCell => "pus_cell",
            Field::PusCellClumps => "pus_cell_clumps",
            Field::Bacteria => "bacteria",
            Field::BloodGlucoseRandom => "blood_glucose_random",
            Field::BloodUrea => "blood_urea",
            Field::SerumCreatinine => "serum_creatinine",
            Field::Sodium => "sodium",
            Field::Potassium => "potassium",
            Field::Haemoglobin => "haemoglobin",
            Field::PackedCellVolume => "packed_cell_volume",
            Field::WhiteBloodCellCount => "white_blood_cell_count",
            Field::RedBloodCellCount => "red_blood_cell_count",
            Field::Hypertension => "hypertension",
            Field::DiabetesMellitus => "diabetes_mellitus",
            Field::CoronaryArteryDisease => "coronary_artery_disease",
            Field::Appetite => "appetite",
            Field::PedalEdema => "peda_edema",
            Field::Anemia => "aanemia",
        }
    }

    /// Look up a field by model column name.
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Age => "Age",
            Field::BloodPressure => "Blood Pressure",
            Field::SpecificGravity => "Specific Gravity",
            Field::Albumin => "Albumin",
            Field::Sugar => "Sugar",
            Field::RedBloodCells => "RBC",
            Field::PusCell => "Pus Cell",
            Field::PusCellClumps => "Pus Cell Clumps",
            Field::Bacteria => "Bacteria",
            Field::BloodGlucoseRandom => "Blood Glucose (Random)",
            Field::BloodUrea => "Blood Urea",
            Field::SerumCreatinine => "Serum Creatinine",
            Field::Sodium => "Sodium",
            Field::Potassium => "Potassium",
            Field::Haemoglobin => "Hemoglobin",
            Field::PackedCellVolume => "Packed Cell Volume",
            Field::WhiteBloodCellCount => "WBC Count",
            Field::RedBloodCellCount => "RBC Count",
            Field::Hypertension => "Hypertension",
            Field::DiabetesMellitus => "Diabetes Mellitus",
            Field::CoronaryArteryDisease => "Coronary Artery Disease",
            Field::Appetite => "Appetite",
            Field::PedalEdema => "Pedal Edema",
            Field::Anemia => "Anemia",
        }
    }

    /// Measurement unit, empty when dimensionless.
    pub fn unit(&self) -> &'static str {
        match self {
            Field::Age => "years",
            Field::BloodPressure => "mm/Hg",
            Field::BloodGlucoseRandom | Field::BloodUrea | Field::SerumCreatinine => "mgs/dl",
            Field::Sodium | Field::Potassium => "mEq/L",
            Field::Haemoglobin => "gms",
            Field::RedBloodCellCount => "millions/cmm",
            _ => "",
        }
    }

    /// Input range and form default, or the categorical options.
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Age => numeric(1.0, 120.0, 50.0),
            Field::BloodPressure => numeric(40.0, 250.0, 80.0),
            Field::SpecificGravity => numeric(1.005, 1.025, 1.020),
            Field::Albumin => numeric(0.0, 5.0, 0.0),
            Field::Sugar => numeric(0.0, 5.0, 0.0),
            Field::BloodGlucoseRandom => numeric(0.0, 500.0, 120.0),
            Field::BloodUrea => numeric(0.0, 300.0, 36.0),
            Field::SerumCreatinine => numeric(0.0, 50.0, 1.2),
            Field::Sodium => numeric(100.0, 200.0, 137.0),
            Field::Potassium => numeric(1.0, 10.0, 4.0),
            Field::Haemoglobin => numeric(1.0, 25.0, 15.0),
            Field::PackedCellVolume => numeric(10.0, 60.0, 44.0),
            Field::WhiteBloodCellCount => numeric(0.0, 30000.0, 7800.0),
            Field::RedBloodCellCount => numeric(0.0, 10.0, 5.2),
            Field::RedBloodCells | Field::PusCell => FieldKind::Categorical(NORMAL_ABNORMAL),
            Field::PusCellClumps | Field::Bacteria => FieldKind::Categorical(NOTPRESENT_PRESENT),
            Field::Hypertension
            | Field::DiabetesMellitus
            | Field::CoronaryArteryDisease
            | Field::PedalEdema
            | Field::Anemia => FieldKind::Categorical(YES_NO),
            Field::Appetite => FieldKind::Categorical(GOOD_POOR),
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self.kind(), FieldKind::Categorical(_))
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
        assert_eq!(Field::from_name("pedal_edema"), None);
    }

    #[test]
    fn test_all_fields_unique() {
        let names: HashSet<_> = Field::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names.len(), 24);
    }

    #[test]
    fn test_serde_uses_model_names() {
        let json = serde_json::to_string(&Field::PedalEdema).unwrap();
        assert_eq!(json, "\"peda_edema\"");
        let field: Field = serde_json::from_str("\"aanemia\"").unwrap();
        assert_eq!(field, Field::Anemia);
    }

    #[test]
    fn test_field_kinds() {
        let categorical = Field::ALL.iter().filter(|f| f.is_categorical()).count();
        assert_eq!(categorical, 10);

        match Field::Appetite.kind() {
            FieldKind::Categorical(spec) => assert_eq!(spec.default_option(), "good"),
            FieldKind::Numeric(_) => panic!("appetite is categorical"),
        }
    }
}
