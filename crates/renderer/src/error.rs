//! Rendering errors.

use projection::ProjectionError;
use thiserror::Error;
use viz_common::{StyleError, VizError};

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Layer '{0}' is not in the topology")]
    LayerNotFound(String),

    #[error("Feature {index} does not exist in layer '{layer}'")]
    FeatureNotFound { layer: String, index: usize },

    #[error("Invalid color scale: {0}")]
    InvalidColorScale(String),

    #[error("Failed to parse SVG: {0}")]
    SvgParse(String),

    #[error("Cannot allocate a {width}x{height} pixmap")]
    PixmapAllocation { width: u32, height: u32 },

    #[error("Failed to encode PNG: {0}")]
    PngEncode(String),

    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

impl From<StyleError> for RenderError {
    fn from(err: StyleError) -> Self {
        RenderError::InvalidColorScale(err.to_string())
    }
}

impl From<RenderError> for VizError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::LayerNotFound(layer) => VizError::LayerNotFound(layer),
            RenderError::Projection(inner) => inner.into(),
            RenderError::InvalidColorScale(message) => VizError::InvalidConfig {
                field: "color_scale".to_string(),
                message,
            },
            other => VizError::RenderError(other.to_string()),
        }
    }
}
