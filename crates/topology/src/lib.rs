//! TopoJSON topology handling for choropleth rendering.
//!
//! The pipeline is:
//! - [`Topology::from_json`] parses and validates the payload
//! - [`presimplify`] decodes every arc to absolute coordinates and ranks each
//!   point by effective area (its significance)
//! - [`extract_layers`] turns each named object into a feature collection
//! - [`compute_bounds`] measures the full extent of the extracted features

pub mod bounds;
pub mod decode;
pub mod error;
pub mod feature;
pub mod model;
pub mod presimplify;

pub use bounds::{compute_bounds, layer_bounds};
pub use decode::decode_arcs;
pub use error::{TopologyError, TopologyResult};
pub use feature::{extract_layers, Feature, FeatureCollection, FeatureGeometry, Position};
pub use model::{Geometry, GeometryKind, Topology, Transform};
pub use presimplify::{presimplify, triangle_area, SimplifiedTopology};
