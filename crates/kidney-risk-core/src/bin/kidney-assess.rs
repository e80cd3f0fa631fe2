//! Command-line kidney risk assessment.
//!
//! ```text
//! kidney-assess [OBSERVATION.json] [EXPORT_DIR]
//! ```
//!
//! Reads one observation (the form defaults when no file is given), prints
//! the report document, and optionally writes `report.json` and `report.txt`
//! into `EXPORT_DIR`. Configuration comes from the file named by
//! `KIDNEY_RISK_CONFIG`, or defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use kidney_risk_core::classifier::init_process_model;
use kidney_risk_core::config::{load_config, CONFIG_ENV_VAR};
use kidney_risk_core::{AssessmentPipeline, PatientObservation, PipelineConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let observation_path = args.next().map(PathBuf::from);
    let export_dir = args.next().map(PathBuf::from);

    let config = load_pipeline_config()?;
    let model = init_process_model(config.model_path.as_deref());
    let pipeline = AssessmentPipeline::new(&config, model.clone())
        .context("Invalid pipeline configuration")?;

    let observation = match &observation_path {
        Some(path) => read_observation(path)?,
        None => {
            info!("No observation file given, using form defaults");
            PatientObservation::default()
        }
    };

    for field in observation.out_of_range_fields() {
        warn!(field = %field, value = observation.number(field), "Value outside form range");
    }

    let assessment = match pipeline.assess(&observation) {
        Ok(assessment) => assessment,
        Err(e) => {
            eprintln!("{}", e.user_message());
            std::process::exit(1);
        }
    };

    for notice in &assessment.fallbacks {
        match &notice.suggestion {
            Some(s) => eprintln!("note: {} '{}' not recognized (did you mean '{}'?)", notice.field, notice.value, s),
            None => eprintln!("note: {} '{}' not recognized", notice.field, notice.value),
        }
    }

    let export = pipeline.export(&assessment)?;
    print!("{}", export.to_text());

    if let Some(dir) = export_dir {
        export
            .write_to_dir(&dir)
            .with_context(|| format!("Failed to write export to {}", dir.display()))?;
        info!(dir = %dir.display(), report_id = %export.metadata.report_id, "Export written");
    }

    Ok(())
}

/// Configuration from `KIDNEY_RISK_CONFIG`, or defaults.
fn load_pipeline_config() -> anyhow::Result<PipelineConfig> {
    match std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from) {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration from file");
            load_config(&path).with_context(|| format!("Failed to load {}", path.display()))
        }
        None => {
            info!("No config file specified, using defaults");
            Ok(PipelineConfig::default())
        }
    }
}

fn read_observation(path: &Path) -> anyhow::Result<PatientObservation> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read observation {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse observation {}", path.display()))
}
