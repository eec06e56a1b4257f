//! Projection and view-fitting errors.

use thiserror::Error;
use topology::TopologyError;
use viz_common::VizError;

pub type ProjectionResult<T> = Result<T, ProjectionError>;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Container must have positive finite size, got {width}x{height}")]
    InvalidContainer { width: f64, height: f64 },

    #[error("Fitted scale {0} is not a positive finite number")]
    NonFiniteScale(f64),

    #[error("Zoom factor {0} must be a positive finite number")]
    InvalidZoomFactor(f64),

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

impl From<ProjectionError> for VizError {
    fn from(err: ProjectionError) -> Self {
        match err {
            ProjectionError::Topology(inner) => inner.into(),
            other => VizError::ProjectionError(other.to_string()),
        }
    }
}
