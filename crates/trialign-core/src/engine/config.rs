use crate::core::models::atom::{Atom, BackboneKind};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Which atoms represent the residues being superposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum BackboneSelection {
    /// Phosphates when the model starts with a nucleic-acid backbone atom,
    /// alpha carbons otherwise.
    #[default]
    Auto,
    CAlpha,
    Phosphate,
}

impl BackboneSelection {
    /// Resolves the selection to a concrete backbone kind, inspecting the first
    /// atom of the model for [`BackboneSelection::Auto`].
    pub fn resolve(&self, first_model_atom: Option<&Atom>) -> BackboneKind {
        match self {
            BackboneSelection::Auto => BackboneKind::detect(first_model_atom),
            BackboneSelection::CAlpha => BackboneKind::CAlpha,
            BackboneSelection::Phosphate => BackboneKind::Phosphate,
        }
    }
}

impl FromStr for BackboneSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(BackboneSelection::Auto),
            "ca" | "calpha" | "protein" => Ok(BackboneSelection::CAlpha),
            "p" | "phosphate" | "rna" => Ok(BackboneSelection::Phosphate),
            other => Err(ConfigError::InvalidParameter {
                name: "backbone",
                reason: format!("unknown backbone selection '{}' (expected auto, ca or p)", other),
            }),
        }
    }
}

impl TryFrom<String> for BackboneSelection {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for BackboneSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackboneSelection::Auto => write!(f, "auto"),
            BackboneSelection::CAlpha => write!(f, "ca"),
            BackboneSelection::Phosphate => write!(f, "p"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentConfig {
    /// Distance threshold in Ångström; also the cell side of the spatial hash.
    pub epsilon: f64,
    pub backbone: BackboneSelection,
}

#[derive(Default)]
pub struct AlignmentConfigBuilder {
    epsilon: Option<f64>,
    backbone: Option<BackboneSelection>,
}

impl AlignmentConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }
    pub fn backbone(mut self, backbone: BackboneSelection) -> Self {
        self.backbone = Some(backbone);
        self
    }

    pub fn build(self) -> Result<AlignmentConfig, ConfigError> {
        let epsilon = self.epsilon.ok_or(ConfigError::MissingParameter("epsilon"))?;
        validate_epsilon(epsilon)?;
        Ok(AlignmentConfig {
            epsilon,
            backbone: self.backbone.unwrap_or_default(),
        })
    }
}

/// Checks that `epsilon` is usable as a distance threshold.
pub fn validate_epsilon(epsilon: f64) -> Result<(), ConfigError> {
    if epsilon.is_finite() && epsilon > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name: "epsilon",
            reason: format!("must be a positive finite distance, got {}", epsilon),
        })
    }
}
