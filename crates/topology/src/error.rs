//! Errors raised while parsing or decoding a topology.

use thiserror::Error;
use viz_common::VizError;

pub type TopologyResult<T> = Result<T, TopologyError>;

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("Failed to parse topology JSON: {0}")]
    Parse(String),

    #[error("Expected type \"Topology\", found {0:?}")]
    InvalidType(String),

    #[error("Topology has no \"arcs\" array")]
    MissingArcs,

    #[error("Topology has no \"objects\" map")]
    MissingObjects,

    #[error("Invalid transform: {0}")]
    InvalidTransform(String),

    #[error("Arc {arc} point {point} has fewer than two coordinates")]
    MalformedPosition { arc: usize, point: usize },

    #[error("Geometry in object '{object}' references arc {index}, but only {len} arcs exist")]
    ArcIndexOutOfRange {
        object: String,
        index: i64,
        len: usize,
    },

    #[error("Point geometry in object '{0}' has fewer than two coordinates")]
    MalformedPoint(String),
}

impl From<TopologyError> for VizError {
    fn from(err: TopologyError) -> Self {
        VizError::InvalidTopology(err.to_string())
    }
}

impl From<serde_json::Error> for TopologyError {
    fn from(err: serde_json::Error) -> Self {
        TopologyError::Parse(err.to_string())
    }
}
