//! # Generator Errors
//!
//! Error types for dimension derivation, configuration, composition and
//! scene bookkeeping. Only [`ConfigError`] and [`SceneError`] abort a run;
//! the others are recovered locally by skipping or keeping a part as is.

use crate::compose::BooleanOp;
use crate::dims::PipeStandard;
use rdwc_mesh::MeshError;
use thiserror::Error;

/// Invalid semantic input to a dimension formula.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DimensionError {
    /// Volume is zero, negative or not finite.
    #[error("Volume must be positive and finite: {liters} L")]
    InvalidVolume { liters: f64 },

    /// Nominal size is not part of the selected standard.
    #[error("Unsupported {standard} pipe size: {size}")]
    UnsupportedPipeSize { standard: PipeStandard, size: f64 },

    /// Outer diameter is zero, negative or not finite.
    #[error("Pipe diameter must be positive and finite: {diameter} m")]
    InvalidDiameter { diameter: f64 },
}

/// Configuration that cannot produce a system. Fatal for the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// JSON could not be parsed, including unknown layout names.
    #[error("Failed to parse configuration: {message}")]
    Parse { message: String },

    /// Layout counts or distances are out of range.
    #[error("Invalid layout: {message}")]
    Layout { message: String },

    /// Pipe size does not belong to its standard.
    #[error("Invalid pipe: {0}")]
    Pipe(#[from] DimensionError),

    /// A numeric field is out of range.
    #[error("Invalid value for {field}: {message}")]
    Value { field: &'static str, message: String },

    /// Segment counts cannot form closed primitives.
    #[error("Invalid resolution: {message}")]
    Resolution { message: String },
}

impl ConfigError {
    /// Creates a layout error.
    pub fn layout(message: impl Into<String>) -> Self {
        Self::Layout {
            message: message.into(),
        }
    }

    /// Creates a field value error.
    pub fn value(field: &'static str, message: impl Into<String>) -> Self {
        Self::Value {
            field,
            message: message.into(),
        }
    }
}

/// A boolean operation that could not be applied. `base` was left unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompositionError {
    /// The solver reported an error.
    #[error("{op} of '{cutter}' into '{base}' failed: {source}")]
    Solver {
        base: String,
        cutter: String,
        op: BooleanOp,
        #[source]
        source: MeshError,
    },

    /// The solver produced NaN or infinite coordinates.
    #[error("{op} of '{cutter}' into '{base}' produced non-finite vertices")]
    NonFinite {
        base: String,
        cutter: String,
        op: BooleanOp,
    },

    /// The solver erased a non-empty base entirely.
    #[error("{op} of '{cutter}' into '{base}' produced an empty mesh")]
    EmptyResult {
        base: String,
        cutter: String,
        op: BooleanOp,
    },
}

/// Scene bookkeeping violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    /// Another solid already uses this name.
    #[error("A solid named '{name}' already exists")]
    DuplicateName { name: String },
}

/// Errors that abort a generation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DimensionError::UnsupportedPipeSize {
            standard: PipeStandard::Tr,
            size: 40.0,
        };
        assert_eq!(err.to_string(), "Unsupported TR pipe size: 40");

        let err = ConfigError::layout("rows must be at least 1");
        assert!(err.to_string().contains("rows"));
    }

    #[test]
    fn test_config_error_wraps_dimension_error() {
        let err: ConfigError = DimensionError::InvalidDiameter { diameter: -1.0 }.into();
        assert!(matches!(err, ConfigError::Pipe(_)));
        let err: GenerateError = err.into();
        assert!(err.to_string().contains("diameter"));
    }
}
