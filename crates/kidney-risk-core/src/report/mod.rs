//! Report assembler.
//!
//! Shapes an observation, a classifier result and the clinical flags into a
//! [`Report`]. No decisions are made here beyond copying values and laying
//! out the gauges.

use chrono::{DateTime, Utc};

use crate::config::GaugeConfig;
use crate::models::{
    AssessmentResult, ClinicalFlag, Field, GaugeSpec, PatientObservation, Report, Vitals,
};

/// Builds reports with a fixed gauge configuration.
#[derive(Debug, Clone, Default)]
pub struct ReportAssembler {
    gauges: GaugeConfig,
}

impl ReportAssembler {
    pub fn new(gauges: GaugeConfig) -> Self {
        Self { gauges }
    }

    /// Assemble a report stamped with the current time.
    pub fn assemble(
        &self,
        observation: &PatientObservation,
        result: AssessmentResult,
        flags: Vec<ClinicalFlag>,
    ) -> Report {
        self.assemble_at(observation, result, flags, Utc::now())
    }

    /// Assemble a report stamped with `generated_at`.
    pub fn assemble_at(
        &self,
        observation: &PatientObservation,
        result: AssessmentResult,
        flags: Vec<ClinicalFlag>,
        generated_at: DateTime<Utc>,
    ) -> Report {
        Report {
            generated_at: generated_at.to_rfc3339(),
            result,
            vitals: vitals_of(observation),
            flags,
            gauges: self.gauges_for(observation),
        }
    }

    /// Gauge specifications for an observation, in dashboard order.
    pub fn gauges_for(&self, observation: &PatientObservation) -> Vec<GaugeSpec> {
        self.gauges
            .entries()
            .into_iter()
            .map(|(title, field, settings)| GaugeSpec {
                title: title.to_string(),
                field,
                value: observation.number(field),
                min: settings.min,
                max: settings.max,
                breakpoints: settings.thresholds,
                direction: settings.danger_direction,
            })
            .collect()
    }
}

/// Copy the report's vitals subset out of an observation.
pub fn vitals_of(observation: &PatientObservation) -> Vitals {
    Vitals {
        age: observation.number(Field::Age),
        blood_pressure: observation.number(Field::BloodPressure),
        serum_creatinine: observation.number(Field::SerumCreatinine),
        blood_urea: observation.number(Field::BloodUrea),
        haemoglobin: observation.number(Field::Haemoglobin),
        specific_gravity: observation.number(Field::SpecificGravity),
    }
}
