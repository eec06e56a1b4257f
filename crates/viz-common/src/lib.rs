//! Common types and utilities shared across the vizkit crates.

pub mod accessor;
pub mod bbox;
pub mod datum;
pub mod error;
pub mod style;

pub use accessor::{display_value, Accessor, FieldPath};
pub use bbox::BoundingBox;
pub use datum::{canonical_key, DataIndex};
pub use error::{VizError, VizResult};
pub use style::{Color, ColorStop, GradientConfig, Interpolation, OutOfRangeBehavior, StyleError};
