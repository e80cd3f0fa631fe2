//! Feature column order.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::Field;

/// Feature layout errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Unknown feature name: {0}")]
    UnknownFeature(String),

    #[error("Feature listed more than once: {0}")]
    DuplicateFeature(String),

    #[error("Feature missing from layout: {0}")]
    MissingFeature(String),
}

/// Ordered list of model columns. Always a permutation of [`Field::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureLayout {
    fields: Vec<Field>,
}

impl Default for FeatureLayout {
    fn default() -> Self {
        Self {
            fields: Field::ALL.to_vec(),
        }
    }
}

impl FeatureLayout {
    /// Build a layout from model column names.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, LayoutError> {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(names.len());

        for name in names {
            let name = name.as_ref();
            let field = Field::from_name(name)
                .ok_or_else(|| LayoutError::UnknownFeature(name.to_string()))?;
            if !seen.insert(field) {
                return Err(LayoutError::DuplicateFeature(name.to_string()));
            }
            fields.push(field);
        }

        if let Some(missing) = Field::ALL.iter().find(|f| !seen.contains(*f)) {
            return Err(LayoutError::MissingFeature(missing.name().to_string()));
        }

        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column index of a field.
    pub fn position(&self, field: Field) -> Option<usize> {
        self.fields.iter().position(|f| *f == field)
    }

    /// True when `names` lists exactly this layout's columns in this order.
    pub fn matches_names(&self, names: &[String]) -> bool {
        names.len() == self.fields.len()
            && names.iter().zip(&self.fields).all(|(n, f)| n == f.name())
    }
}
