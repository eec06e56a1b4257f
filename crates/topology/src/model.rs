//! Serde model of a TopoJSON topology.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{TopologyError, TopologyResult};

/// A raw arc: a sequence of positions, delta-encoded when the topology is
/// quantized.
pub type RawArc = Vec<Vec<f64>>;

/// A TopoJSON topology.
///
/// `arcs` and `objects` are optional at the serde level so that a payload
/// missing either produces a descriptive [`TopologyError`] from
/// [`Topology::validate`] rather than a generic parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topology {
    #[serde(rename = "type")]
    pub type_: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,

    #[serde(default)]
    pub arcs: Option<Vec<RawArc>>,

    #[serde(default)]
    pub objects: Option<BTreeMap<String, Geometry>>,
}

/// Quantization transform: `x = qx * scale[0] + translate[0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

impl Transform {
    pub fn apply(&self, qx: f64, qy: f64) -> [f64; 2] {
        [
            qx * self.scale[0] + self.translate[0],
            qy * self.scale[1] + self.translate[1],
        ]
    }
}

/// A TopoJSON geometry object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(flatten)]
    pub kind: GeometryKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
}

/// Geometry variants. Line and polygon geometries reference arcs by index;
/// a negative index `i` means arc `!i` traversed backwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeometryKind {
    Point { coordinates: Vec<f64> },
    MultiPoint { coordinates: Vec<Vec<f64>> },
    LineString { arcs: Vec<i64> },
    MultiLineString { arcs: Vec<Vec<i64>> },
    Polygon { arcs: Vec<Vec<i64>> },
    MultiPolygon { arcs: Vec<Vec<Vec<i64>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Topology {
    /// Parse and validate a topology from a JSON string.
    pub fn from_json(json: &str) -> TopologyResult<Self> {
        let topology: Topology = serde_json::from_str(json)?;
        topology.validate()?;
        Ok(topology)
    }

    /// Parse and validate a topology from an already-parsed JSON value.
    pub fn from_value(value: Value) -> TopologyResult<Self> {
        let topology: Topology = serde_json::from_value(value)?;
        topology.validate()?;
        Ok(topology)
    }

    /// Read, parse and validate a topology file.
    pub fn from_file(path: impl AsRef<Path>) -> TopologyResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            TopologyError::Parse(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_json(&content)
    }

    /// The arcs, or an empty slice when absent.
    pub fn arcs(&self) -> &[RawArc] {
        self.arcs.as_deref().unwrap_or(&[])
    }

    /// Names of the objects (layers) in this topology.
    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.objects
            .iter()
            .flat_map(|objects| objects.keys())
            .map(String::as_str)
    }

    /// Check structural integrity so decoding cannot index out of bounds.
    pub fn validate(&self) -> TopologyResult<()> {
        if self.type_ != "Topology" {
            return Err(TopologyError::InvalidType(self.type_.clone()));
        }

        let arcs = self.arcs.as_ref().ok_or(TopologyError::MissingArcs)?;
        let objects = self.objects.as_ref().ok_or(TopologyError::MissingObjects)?;

        if let Some(transform) = &self.transform {
            let mut values = transform.scale.iter().chain(transform.translate.iter());
            if values.any(|v| !v.is_finite()) {
                return Err(TopologyError::InvalidTransform(
                    "scale and translate must be finite".to_string(),
                ));
            }
            if transform.scale.iter().any(|s| *s == 0.0) {
                return Err(TopologyError::InvalidTransform(
                    "scale must be non-zero".to_string(),
                ));
            }
        }

        for (arc_idx, arc) in arcs.iter().enumerate() {
            if let Some(point) = arc.iter().position(|p| p.len() < 2) {
                return Err(TopologyError::MalformedPosition {
                    arc: arc_idx,
                    point,
                });
            }
        }

        for (name, geometry) in objects {
            geometry.validate(name, arcs.len())?;
        }

        Ok(())
    }
}

impl Geometry {
    fn validate(&self, object: &str, arc_count: usize) -> TopologyResult<()> {
        let check = |index: i64| -> TopologyResult<()> {
            let resolved = if index < 0 { !index } else { index };
            if resolved as usize >= arc_count {
                return Err(TopologyError::ArcIndexOutOfRange {
                    object: object.to_string(),
                    index,
                    len: arc_count,
                });
            }
            Ok(())
        };

        match &self.kind {
            GeometryKind::Point { coordinates } => {
                if coordinates.len() < 2 {
                    return Err(TopologyError::MalformedPoint(object.to_string()));
                }
            }
            GeometryKind::MultiPoint { coordinates } => {
                if coordinates.iter().any(|c| c.len() < 2) {
                    return Err(TopologyError::MalformedPoint(object.to_string()));
                }
            }
            GeometryKind::LineString { arcs } => arcs.iter().try_for_each(|i| check(*i))?,
            GeometryKind::MultiLineString { arcs } | GeometryKind::Polygon { arcs } => arcs
                .iter()
                .flatten()
                .try_for_each(|i| check(*i))?,
            GeometryKind::MultiPolygon { arcs } => arcs
                .iter()
                .flatten()
                .flatten()
                .try_for_each(|i| check(*i))?,
            GeometryKind::GeometryCollection { geometries } => {
                for geometry in geometries {
                    geometry.validate(object, arc_count)?;
                }
            }
        }
        Ok(())
    }
}
