//! Opaque classifier boundary for kidney disease risk assessment.
//!
//! The assessment pipeline never looks inside the model. It talks to a
//! [`Predictor`]: a label for a feature row, and optionally the per-class
//! probabilities behind that label. This crate provides that trait, a
//! [`MockPredictor`] for tests, and [`ArtifactPredictor`], which evaluates a
//! trained model exported to a JSON artifact.

pub mod artifact;
pub mod predictor;

pub use artifact::*;
pub use predictor::*;
