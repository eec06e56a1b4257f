//! Layer extraction: stitch arcs into renderable features.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::decode::decode_position;
use crate::error::{TopologyError, TopologyResult};
use crate::model::{Geometry, GeometryKind};
use crate::presimplify::SimplifiedTopology;

/// `[x, y, significance]` in local geometry coordinates.
pub type Position = [f64; 3];

/// Decoded geometry. Every position keeps the significance computed by
/// presimplification; standalone points are always significant.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
    GeometryCollection(Vec<FeatureGeometry>),
}

impl FeatureGeometry {
    /// Visit every position.
    pub fn for_each_position(&self, f: &mut impl FnMut(&Position)) {
        match self {
            FeatureGeometry::Point(p) => f(p),
            FeatureGeometry::MultiPoint(points) | FeatureGeometry::LineString(points) => {
                points.iter().for_each(|p| f(p))
            }
            FeatureGeometry::MultiLineString(lines) | FeatureGeometry::Polygon(lines) => {
                lines.iter().flatten().for_each(|p| f(p))
            }
            FeatureGeometry::MultiPolygon(polygons) => {
                polygons.iter().flatten().flatten().for_each(|p| f(p))
            }
            FeatureGeometry::GeometryCollection(geometries) => {
                geometries.iter().for_each(|g| g.for_each_position(f))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<Value>,
    pub properties: Map<String, Value>,
    pub geometry: FeatureGeometry,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Decode every named object into a feature collection.
///
/// A `GeometryCollection` object yields one feature per member; any other
/// object yields a single-feature collection.
pub fn extract_layers(
    topology: &SimplifiedTopology,
) -> TopologyResult<BTreeMap<String, FeatureCollection>> {
    topology
        .objects
        .iter()
        .map(|(name, object)| -> TopologyResult<(String, FeatureCollection)> {
            let stitcher = Stitcher {
                topology,
                object: name,
            };
            let features = match &object.kind {
                GeometryKind::GeometryCollection { geometries } => geometries
                    .iter()
                    .map(|g| stitcher.feature(g))
                    .collect::<TopologyResult<Vec<_>>>()?,
                _ => vec![stitcher.feature(object)?],
            };
            Ok((name.clone(), FeatureCollection { features }))
        })
        .collect()
}

struct Stitcher<'a> {
    topology: &'a SimplifiedTopology,
    object: &'a str,
}

impl Stitcher<'_> {
    fn feature(&self, geometry: &Geometry) -> TopologyResult<Feature> {
        Ok(Feature {
            id: geometry.id.clone(),
            properties: geometry.properties.clone().unwrap_or_default(),
            geometry: self.geometry(geometry)?,
        })
    }

    fn geometry(&self, geometry: &Geometry) -> TopologyResult<FeatureGeometry> {
        Ok(match &geometry.kind {
            GeometryKind::Point { coordinates } => FeatureGeometry::Point(self.point(coordinates)?),
            GeometryKind::MultiPoint { coordinates } => FeatureGeometry::MultiPoint(
                coordinates
                    .iter()
                    .map(|c| self.point(c))
                    .collect::<TopologyResult<_>>()?,
            ),
            GeometryKind::LineString { arcs } => FeatureGeometry::LineString(self.line(arcs)?),
            GeometryKind::MultiLineString { arcs } => FeatureGeometry::MultiLineString(
                arcs.iter()
                    .map(|a| self.line(a))
                    .collect::<TopologyResult<_>>()?,
            ),
            GeometryKind::Polygon { arcs } => FeatureGeometry::Polygon(self.polygon(arcs)?),
            GeometryKind::MultiPolygon { arcs } => FeatureGeometry::MultiPolygon(
                arcs.iter()
                    .map(|p| self.polygon(p))
                    .collect::<TopologyResult<_>>()?,
            ),
            GeometryKind::GeometryCollection { geometries } => {
                FeatureGeometry::GeometryCollection(
                    geometries
                        .iter()
                        .map(|g| self.geometry(g))
                        .collect::<TopologyResult<_>>()?,
                )
            }
        })
    }

    fn point(&self, coordinates: &[f64]) -> TopologyResult<Position> {
        let [x, y] = decode_position(self.topology.transform.as_ref(), coordinates)
            .ok_or_else(|| TopologyError::MalformedPoint(self.object.to_string()))?;
        Ok([x, y, f64::INFINITY])
    }

    /// Append arc `index` to `points`, dropping the shared junction point.
    fn push_arc(&self, index: i64, points: &mut Vec<Position>) -> TopologyResult<()> {
        let resolved = if index < 0 { !index } else { index };
        let arc = self
            .topology
            .arcs
            .get(resolved as usize)
            .ok_or_else(|| TopologyError::ArcIndexOutOfRange {
                object: self.object.to_string(),
                index,
                len: self.topology.arcs.len(),
            })?;

        points.pop();
        let start = points.len();
        points.extend_from_slice(arc);
        if index < 0 {
            points[start..].reverse();
        }
        Ok(())
    }

    fn line(&self, arcs: &[i64]) -> TopologyResult<Vec<Position>> {
        let mut points = Vec::new();
        for &index in arcs {
            self.push_arc(index, &mut points)?;
        }
        // a line needs two positions even when its arc collapsed to one
        if points.len() == 1 {
            points.push(points[0]);
        }
        Ok(points)
    }

    fn ring(&self, arcs: &[i64]) -> TopologyResult<Vec<Position>> {
        let mut points = self.line(arcs)?;
        // a ring needs four positions
        while !points.is_empty() && points.len() < 4 {
            points.push(points[0]);
        }
        Ok(points)
    }

    fn polygon(&self, rings: &[Vec<i64>]) -> TopologyResult<Vec<Vec<Position>>> {
        rings.iter().map(|r| self.ring(r)).collect()
    }
}
