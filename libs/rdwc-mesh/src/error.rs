//! # Mesh Errors
//!
//! Error types for mesh generation operations.

use thiserror::Error;

/// Result alias used throughout the mesh kernel.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors that can occur during mesh generation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// Invalid mesh topology
    #[error("Invalid topology: {message}")]
    InvalidTopology { message: String },

    /// Degenerate geometry (non-positive size, too few segments, ...)
    #[error("Degenerate geometry: {message}")]
    DegenerateGeometry { message: String },

    /// Boolean operation failed
    #[error("Boolean operation failed: {message}")]
    BooleanFailed { message: String },

    /// Mesh validation failed
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    /// Too many vertices
    #[error("Too many vertices: {count} (max: {max})")]
    TooManyVertices { count: usize, max: usize },

    /// Too many triangles
    #[error("Too many triangles: {count} (max: {max})")]
    TooManyTriangles { count: usize, max: usize },
}

impl MeshError {
    /// Creates an invalid topology error.
    pub fn invalid_topology(message: impl Into<String>) -> Self {
        Self::InvalidTopology {
            message: message.into(),
        }
    }

    /// Creates a degenerate geometry error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            message: message.into(),
        }
    }

    /// Creates a boolean operation failed error.
    pub fn boolean_failed(message: impl Into<String>) -> Self {
        Self::BooleanFailed {
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// Returns true for errors caused by invalid input parameters.
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::DegenerateGeometry { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeshError::boolean_failed("tree too deep");
        assert_eq!(err.to_string(), "Boolean operation failed: tree too deep");

        let err = MeshError::TooManyVertices { count: 12, max: 10 };
        assert_eq!(err.to_string(), "Too many vertices: 12 (max: 10)");
    }

    #[test]
    fn test_is_degenerate() {
        assert!(MeshError::degenerate("radius 0").is_degenerate());
        assert!(!MeshError::validation("bad index").is_degenerate());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MeshError>();
    }
}
