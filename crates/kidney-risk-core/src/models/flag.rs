//! Clinical flag models.

use serde::{Deserialize, Serialize};

/// A threshold alert raised from raw vitals, independent of the classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ClinicalFlag {
    #[serde(rename = "Hypertension")]
    Hypertension,
    #[serde(rename = "Hyperglycemia")]
    Hyperglycemia,
    #[serde(rename = "High Creatinine")]
    HighCreatinine,
    #[serde(rename = "Anemia (Low Hemoglobin)")]
    LowHemoglobin,
}

impl ClinicalFlag {
    /// Alert text.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClinicalFlag::Hypertension => "Hypertension",
            ClinicalFlag::Hyperglycemia => "Hyperglycemia",
            ClinicalFlag::HighCreatinine => "High Creatinine",
            ClinicalFlag::LowHemoglobin => "Anemia (Low Hemoglobin)",
        }
    }
}

impl std::fmt::Display for ClinicalFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dashboard summary line; `None` when there is nothing to warn about.
pub fn flags_summary(flags: &[ClinicalFlag]) -> Option<String> {
    if flags.is_empty() {
        return None;
    }
    let names: Vec<&str> = flags.iter().map(|f| f.as_str()).collect();
    Some(format!("Clinical Flags: {}", names.join(", ")))
}
