//! Model lifecycle.
//!
//! The model is loaded once when the process starts and is read-only after
//! that. A load failure is kept, not raised: the process keeps running and
//! every request reports the model as unavailable.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use kidney_risk_model::load_artifact;
use tracing::{error, info};

use super::{AssessError, AssessResult, SharedPredictor};

/// Outcome of loading the model.
#[derive(Clone)]
pub enum ModelState {
    Loaded(SharedPredictor),
    Unavailable(String),
}

impl std::fmt::Debug for ModelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelState::Loaded(_) => f.write_str("Loaded"),
            ModelState::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

impl ModelState {
    /// Load the model artifact at `path`. `None` means no artifact was configured.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            error!("No model artifact configured");
            return ModelState::Unavailable("no model artifact configured".to_string());
        };

        match load_artifact(path) {
            Ok(predictor) => {
                info!(path = %path.display(), "Model ready");
                ModelState::Loaded(Arc::new(predictor))
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Model artifact unavailable");
                ModelState::Unavailable(format!("{}: {}", path.display(), e))
            }
        }
    }

    /// Wrap an already constructed predictor.
    pub fn from_predictor(predictor: SharedPredictor) -> Self {
        ModelState::Loaded(predictor)
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelState::Loaded(_))
    }

    /// The predictor, or [`AssessError::ModelUnavailable`].
    pub fn predictor(&self) -> AssessResult<SharedPredictor> {
        match self {
            ModelState::Loaded(predictor) => Ok(predictor.clone()),
            ModelState::Unavailable(reason) => Err(AssessError::ModelUnavailable(reason.clone())),
        }
    }
}

static PROCESS_MODEL: OnceLock<ModelState> = OnceLock::new();

/// Load the process-wide model on first call; later calls return the same state.
pub fn init_process_model(path: Option<&Path>) -> &'static ModelState {
    PROCESS_MODEL.get_or_init(|| ModelState::load(path))
}

/// The process-wide model, if [`init_process_model`] has run.
pub fn process_model() -> Option<&'static ModelState> {
    PROCESS_MODEL.get()
}
