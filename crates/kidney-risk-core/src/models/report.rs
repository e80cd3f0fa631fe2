//! Report and gauge models.
//!
//! A [`Report`] is plain data. The interactive chart renderer and the
//! document generator both read it; it knows about neither.

use serde::{Deserialize, Serialize};

use super::assessment::AssessmentResult;
use super::field::Field;
use super::flag::ClinicalFlag;

/// Which end of a gauge is dangerous.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DangerDirection {
    /// High values are dangerous (blood pressure, creatinine)
    #[default]
    Ascending,
    /// Low values are dangerous
    Descending,
}

/// Color band of a gauge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GaugeBand {
    Safe,
    Warn,
    Danger,
}

impl GaugeBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            GaugeBand::Safe => "safe",
            GaugeBand::Warn => "warn",
            GaugeBand::Danger => "danger",
        }
    }

    /// Fill color used by the dashboard.
    pub fn color(&self) -> &'static str {
        match self {
            GaugeBand::Safe => "#10b981",
            GaugeBand::Warn => "#f59e0b",
            GaugeBand::Danger => "#ef4444",
        }
    }
}

/// One colored segment of a gauge axis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GaugeStep {
    pub range: [f64; 2],
    pub band: GaugeBand,
    pub color: String,
}

/// A bounded gauge with two breakpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GaugeSpec {
    /// Gauge title
    pub title: String,
    /// Observation field the gauge displays
    pub field: Field,
    /// Displayed value
    pub value: f64,
    /// Axis minimum
    pub min: f64,
    /// Axis maximum
    pub max: f64,
    /// Breakpoints in axis order, `breakpoints[0] <= breakpoints[1]`
    pub breakpoints: [f64; 2],
    /// Which end of the axis is dangerous
    pub direction: DangerDirection,
}

impl GaugeSpec {
    /// Where the warning band starts.
    pub fn warn_threshold(&self) -> f64 {
        match self.direction {
            DangerDirection::Ascending => self.breakpoints[0],
            DangerDirection::Descending => self.breakpoints[1],
        }
    }

    /// Where the danger band starts.
    pub fn danger_threshold(&self) -> f64 {
        match self.direction {
            DangerDirection::Ascending => self.breakpoints[1],
            DangerDirection::Descending => self.breakpoints[0],
        }
    }

    /// Classify a value. A value on a breakpoint belongs to the band above it.
    pub fn band_of(&self, value: f64) -> GaugeBand {
        let [low, high] = self.breakpoints;
        let position = if value < low {
            0
        } else if value < high {
            1
        } else {
            2
        };
        match (self.direction, position) {
            (_, 1) => GaugeBand::Warn,
            (DangerDirection::Ascending, 0) | (DangerDirection::Descending, 2) => GaugeBand::Safe,
            _ => GaugeBand::Danger,
        }
    }

    /// Band of the displayed value.
    pub fn band(&self) -> GaugeBand {
        self.band_of(self.value)
    }

    /// The three axis segments, low to high.
    pub fn steps(&self) -> Vec<GaugeStep> {
        let [low, high] = self.breakpoints;
        [
            [self.min, low],
            [low, high],
            [high, self.max],
        ]
        .into_iter()
        .map(|range| {
            let band = self.band_of((range[0] + range[1]) / 2.0);
            GaugeStep {
                range,
                band,
                color: band.color().to_string(),
            }
        })
        .collect()
    }
}

/// The fixed vitals subset carried into the report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Vitals {
    pub age: f64,
    pub blood_pressure: f64,
    pub serum_creatinine: f64,
    pub blood_urea: f64,
    pub haemoglobin: f64,
    pub specific_gravity: f64,
}

impl Vitals {
    /// Report order of the vitals.
    pub const FIELDS: [Field; 6] = [
        Field::Age,
        Field::BloodPressure,
        Field::SerumCreatinine,
        Field::BloodUrea,
        Field::Haemoglobin,
        Field::SpecificGravity,
    ];

    /// Vitals paired with their fields, in report order.
    pub fn entries(&self) -> [(Field, f64); 6] {
        [
            (Field::Age, self.age),
            (Field::BloodPressure, self.blood_pressure),
            (Field::SerumCreatinine, self.serum_creatinine),
            (Field::BloodUrea, self.blood_urea),
            (Field::Haemoglobin, self.haemoglobin),
            (Field::SpecificGravity, self.specific_gravity),
        ]
    }
}

/// Everything one submission produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    /// Generation timestamp (RFC 3339)
    pub generated_at: String,
    /// Classifier outcome
    pub result: AssessmentResult,
    /// Vitals subset of the observation
    pub vitals: Vitals,
    /// Clinical flags in rule order
    pub flags: Vec<ClinicalFlag>,
    /// Blood pressure, creatinine and hemoglobin gauges
    pub gauges: Vec<GaugeSpec>,
}

impl Report {
    pub fn has_flags(&self) -> bool {
        !self.flags.is_empty()
    }

    /// Gauge for a field, if the report carries one.
    pub fn gauge(&self, field: Field) -> Option<&GaugeSpec> {
        self.gauges.iter().find(|g| g.field == field)
    }
}
