use thiserror::Error;

use super::config::ConfigError;
use crate::core::geometry::GeometryError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Geometry computation failed: {source}")]
    Geometry {
        #[from]
        source: GeometryError,
    },

    #[error("Correspondence refers to {role} atom {index}, but the molecule has only {len} atoms")]
    IndexOutOfBounds {
        role: &'static str,
        index: usize,
        len: usize,
    },
}
