//! Extent of extracted features at scale 1 with no translation.

use std::collections::BTreeMap;

use tracing::warn;
use viz_common::BoundingBox;

use crate::feature::{Feature, FeatureCollection};

/// Enclosing box of every position in `features`.
///
/// An empty feature set (or one with no finite positions) has no extent;
/// the unit box is returned instead so downstream fit math stays finite.
pub fn compute_bounds<'a>(features: impl IntoIterator<Item = &'a Feature>) -> BoundingBox {
    let mut bounds = BoundingBox::empty();
    for feature in features {
        feature
            .geometry
            .for_each_position(&mut |p| bounds.extend(p[0], p[1]));
    }

    if bounds.is_empty() {
        warn!("No geometry to measure; falling back to unit bounds");
        return BoundingBox::unit();
    }
    bounds
}

/// Bounds across every layer of an extracted topology.
pub fn layer_bounds(layers: &BTreeMap<String, FeatureCollection>) -> BoundingBox {
    compute_bounds(layers.values().flat_map(|layer| layer.features.iter()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureGeometry;
    use serde_json::Map;

    fn line(points: &[[f64; 2]]) -> Feature {
        Feature {
            id: None,
            properties: Map::new(),
            geometry: FeatureGeometry::LineString(
                points.iter().map(|p| [p[0], p[1], 0.0]).collect(),
            ),
        }
    }

    #[test]
    fn test_bounds_include_low_significance_points() {
        let features = [line(&[[0.0, 0.0], [5.0, -3.0], [10.0, 2.0]])];
        assert_eq!(
            compute_bounds(&features),
            BoundingBox::new(0.0, -3.0, 10.0, 2.0)
        );
    }

    #[test]
    fn test_empty_features_fall_back_to_unit_box() {
        let features: Vec<Feature> = Vec::new();
        assert_eq!(compute_bounds(&features), BoundingBox::unit());
    }
}
