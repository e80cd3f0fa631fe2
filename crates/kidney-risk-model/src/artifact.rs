//! Trained model artifacts.
//!
//! A model is exported from its training environment to a JSON artifact:
//!
//! ```json
//! {
//!   "format_version": "1.0",
//!   "n_features": 24,
//!   "feature_names": ["age", "blood_pressure", "..."],
//!   "classes": [0, 1],
//!   "expose_probabilities": true,
//!   "model": { "kind": "logistic_regression", "coefficients": [...], "intercept": 0.3 }
//! }
//! ```
//!
//! Supported kinds are `logistic_regression`, `decision_tree` and
//! `random_forest`. Tree splits send a row left when `x[feature] <= threshold`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::predictor::{
    check_features, ClassLabel, ClassProbabilities, Predictor, PredictorError, PredictorResult,
};

/// Artifact format versions this crate can read.
pub const SUPPORTED_FORMAT_VERSIONS: &[&str] = &["1.0"];

/// Serialized model as written by the export step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelArtifact {
    /// Artifact format version
    pub format_version: String,
    /// Width of the feature row the model expects
    pub n_features: usize,
    /// Training column names, in training order
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    /// Label of each probability column
    #[serde(default = "default_classes")]
    pub classes: [ClassLabel; 2],
    /// Whether the model reports probabilities (false for margin-only models)
    #[serde(default = "default_expose_probabilities")]
    pub expose_probabilities: bool,
    /// Model parameters
    pub model: ModelSpec,
}

fn default_classes() -> [ClassLabel; 2] {
    [0, 1]
}

fn default_expose_probabilities() -> bool {
    true
}

/// Model parameters by kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    /// `p(classes[1]) = sigmoid(intercept + coefficients · x)`
    LogisticRegression { coefficients: Vec<f64>, intercept: f64 },
    /// A single CART tree
    DecisionTree(TreeSpec),
    /// Trees whose leaf probabilities are averaged
    RandomForest { trees: Vec<TreeSpec> },
}

/// A flattened tree. Node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreeSpec {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Training-sample counts (or weights) per class column
    Leaf { counts: [f64; 2] },
}

impl TreeSpec {
    fn validate(&self, n_features: usize) -> PredictorResult<()> {
        if self.nodes.is_empty() {
            return Err(PredictorError::InvalidArtifact("tree has no nodes".into()));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(PredictorError::InvalidArtifact(format!(
                            "node {} splits on feature {} but the model has {} features",
                            i, feature, n_features
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(PredictorError::InvalidArtifact(format!(
                            "node {} has a non-finite threshold",
                            i
                        )));
                    }
                    // Children must come after their parent so traversal terminates.
                    for child in [*left, *right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(PredictorError::InvalidArtifact(format!(
                                "node {} has invalid child index {}",
                                i, child
                            )));
                        }
                    }
                }
                TreeNode::Leaf { counts } => {
                    let total: f64 = counts.iter().sum();
                    if counts.iter().any(|c| !c.is_finite() || *c < 0.0) || total <= 0.0 {
                        return Err(PredictorError::InvalidArtifact(format!(
                            "leaf {} has invalid class counts",
                            i
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf_probabilities(&self, features: &[f64]) -> [f64; 2] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                TreeNode::Leaf { counts } => {
                    let total = counts[0] + counts[1];
                    return [counts[0] / total, counts[1] / total];
                }
            }
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Parse an artifact from JSON text.
pub fn parse_artifact(json: &str) -> PredictorResult<ModelArtifact> {
    Ok(serde_json::from_str(json)?)
}

/// Load and validate an artifact from disk.
pub fn load_artifact<P: AsRef<Path>>(path: P) -> PredictorResult<ArtifactPredictor> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let predictor = ArtifactPredictor::from_artifact(parse_artifact(&contents)?)?;
    info!(
        path = %path.display(),
        kind = predictor.kind(),
        n_features = predictor.n_features(),
        "Loaded model artifact"
    );
    Ok(predictor)
}

/// A validated artifact ready for inference.
#[derive(Debug, Clone)]
pub struct ArtifactPredictor {
    artifact: ModelArtifact,
}

impl ArtifactPredictor {
    /// Validate an artifact's structure.
    pub fn from_artifact(artifact: ModelArtifact) -> PredictorResult<Self> {
        if !SUPPORTED_FORMAT_VERSIONS.contains(&artifact.format_version.as_str()) {
            return Err(PredictorError::InvalidArtifact(format!(
                "unsupported format version {}",
                artifact.format_version
            )));
        }
        if artifact.n_features == 0 {
            return Err(PredictorError::InvalidArtifact("n_features is zero".into()));
        }
        if artifact.classes[0] == artifact.classes[1] {
            return Err(PredictorError::InvalidArtifact(
                "class labels must be distinct".into(),
            ));
        }
        if let Some(names) = &artifact.feature_names {
            if names.len() != artifact.n_features {
                return Err(PredictorError::InvalidArtifact(format!(
                    "{} feature names for {} features",
                    names.len(),
                    artifact.n_features
                )));
            }
        }

        match &artifact.model {
            ModelSpec::LogisticRegression {
                coefficients,
                intercept,
            } => {
                if coefficients.len() != artifact.n_features {
                    return Err(PredictorError::InvalidArtifact(format!(
                        "{} coefficients for {} features",
                        coefficients.len(),
                        artifact.n_features
                    )));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(PredictorError::InvalidArtifact(
                        "non-finite logistic parameters".into(),
                    ));
                }
            }
            ModelSpec::DecisionTree(tree) => tree.validate(artifact.n_features)?,
            ModelSpec::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(PredictorError::InvalidArtifact("forest has no trees".into()));
                }
                for tree in trees {
                    tree.validate(artifact.n_features)?;
                }
            }
        }

        Ok(Self { artifact })
    }

    /// Model kind, as named in the artifact.
    pub fn kind(&self) -> &'static str {
        match self.artifact.model {
            ModelSpec::LogisticRegression { .. } => "logistic_regression",
            ModelSpec::DecisionTree(_) => "decision_tree",
            ModelSpec::RandomForest { .. } => "random_forest",
        }
    }

    pub fn n_features(&self) -> usize {
        self.artifact.n_features
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    fn probabilities(&self, features: &[f64]) -> PredictorResult<ClassProbabilities> {
        check_features(features, self.artifact.n_features)?;

        let [p0, p1] = match &self.artifact.model {
            ModelSpec::LogisticRegression {
                coefficients,
                intercept,
            } => {
                let z = intercept
                    + coefficients
                        .iter()
                        .zip(features)
                        .map(|(c, x)| c * x)
                        .sum::<f64>();
                let p1 = sigmoid(z);
                [1.0 - p1, p1]
            }
            ModelSpec::DecisionTree(tree) => tree.leaf_probabilities(features),
            ModelSpec::RandomForest { trees } => {
                let mut sum = [0.0, 0.0];
                for tree in trees {
                    let p = tree.leaf_probabilities(features);
                    sum[0] += p[0];
                    sum[1] += p[1];
                }
                let n = trees.len() as f64;
                [sum[0] / n, sum[1] / n]
            }
        };

        Ok(ClassProbabilities {
            classes: self.artifact.classes,
            probabilities: [p0, p1],
        })
    }
}

impl Predictor for ArtifactPredictor {
    fn predict(&self, features: &[f64]) -> PredictorResult<ClassLabel> {
        let probs = self.probabilities(features)?;
        Ok(probs.classes[probs.argmax()])
    }

    fn predict_proba(&self, features: &[f64]) -> PredictorResult<ClassProbabilities> {
        if !self.artifact.expose_probabilities {
            return Err(PredictorError::ProbabilityUnsupported);
        }
        self.probabilities(features)
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.artifact.feature_names.as_deref()
    }
}
