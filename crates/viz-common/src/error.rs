//! Error types shared across the vizkit crates.

use thiserror::Error;

/// Result type alias using VizError.
pub type VizResult<T> = Result<T, VizError>;

/// Top-level error type for visualization operations.
///
/// Crate-specific errors (topology decoding, projection, rendering) convert
/// into this so callers crossing crate boundaries handle a single type.
#[derive(Debug, Error)]
pub enum VizError {
    // === Input Errors ===
    #[error("Invalid topology: {0}")]
    InvalidTopology(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid configuration for '{field}': {message}")]
    InvalidConfig { field: String, message: String },

    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    // === Geometry Errors ===
    #[error("Projection error: {0}")]
    ProjectionError(String),

    // === Output Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl VizError {
    /// Short machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            VizError::InvalidTopology(_) => "invalid_topology",
            VizError::InvalidData(_) => "invalid_data",
            VizError::InvalidConfig { .. } => "invalid_config",
            VizError::LayerNotFound(_) => "layer_not_found",
            VizError::ProjectionError(_) => "projection",
            VizError::RenderError(_) => "render",
            VizError::InternalError(_) => "internal",
        }
    }

    /// Whether the error was caused by caller-supplied input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            VizError::InvalidTopology(_)
                | VizError::InvalidData(_)
                | VizError::InvalidConfig { .. }
                | VizError::LayerNotFound(_)
        )
    }
}

// Conversion from common error types
impl From<std::io::Error> for VizError {
    fn from(err: std::io::Error) -> Self {
        VizError::InternalError(err.to_string())
    }
}

impl From<crate::style::StyleError> for VizError {
    fn from(err: crate::style::StyleError) -> Self {
        VizError::InvalidConfig {
            field: "gradient".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for VizError {
    fn from(err: serde_json::Error) -> Self {
        VizError::InvalidData(format!("JSON error: {}", err))
    }
}
