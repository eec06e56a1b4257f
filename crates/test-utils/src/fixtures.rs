//! Topology and container fixtures shared by the workspace tests.

use serde_json::{json, Value};

/// Two adjacent 10x10 squares sharing one vertical border arc, quantized
/// with an identity transform.
///
/// Object `regions` holds both squares (ids 1 and 2, the right one using the
/// shared arc reversed); object `border` is the shared arc alone. Bounds are
/// `[0, 0]` to `[20, 10]`.
pub const TWO_REGIONS: &str = r#"{
  "type": "Topology",
  "transform": { "scale": [1, 1], "translate": [0, 0] },
  "arcs": [
    [[10, 0], [0, 10]],
    [[10, 10], [-10, 0], [0, -10], [10, 0]],
    [[10, 0], [10, 0], [0, 10], [-10, 0]]
  ],
  "objects": {
    "regions": {
      "type": "GeometryCollection",
      "geometries": [
        { "type": "Polygon", "arcs": [[0, 1]], "id": 1, "properties": { "name": "West" } },
        { "type": "Polygon", "arcs": [[2, -1]], "id": 2, "properties": { "name": "East" } }
      ]
    },
    "border": { "type": "LineString", "arcs": [0] }
  }
}"#;

/// A single unquantized polyline whose interior points rank `0.2, 10, 20`.
pub const JAGGED_LINE: &str = r#"{
  "type": "Topology",
  "arcs": [
    [[0, 0], [1, 0.1], [2, 0], [3, 5], [4, 0]]
  ],
  "objects": {
    "line": { "type": "LineString", "arcs": [0] }
  }
}"#;

/// One object per geometry type over a shared pair of arcs.
pub const MIXED_GEOMETRIES: &str = r#"{
  "type": "Topology",
  "transform": { "scale": [0.5, 0.5], "translate": [-10, -10] },
  "arcs": [
    [[0, 0], [4, 0], [0, 4], [-4, 0], [0, -4]],
    [[8, 8], [2, 2]]
  ],
  "objects": {
    "pin": { "type": "Point", "coordinates": [20, 20], "id": "pin" },
    "pins": { "type": "MultiPoint", "coordinates": [[0, 0], [40, 40]] },
    "paths": { "type": "MultiLineString", "arcs": [[0], [1]] },
    "islands": { "type": "MultiPolygon", "arcs": [[[0]]] },
    "bundle": {
      "type": "GeometryCollection",
      "geometries": [
        { "type": "LineString", "arcs": [-2] },
        { "type": "Point", "coordinates": [1, 1] }
      ]
    }
  }
}"#;

/// A `cols` by `rows` grid of square polygons, ids numbered row-major from 1.
///
/// Cells are independent unquantized rings in object `cells`, so the
/// topology bounds are `[0, 0]` to `[cols * size, rows * size]`.
pub fn grid_topology(cols: usize, rows: usize, size: f64) -> Value {
    let mut arcs = Vec::with_capacity(cols * rows);
    let mut geometries = Vec::with_capacity(cols * rows);

    for row in 0..rows {
        for col in 0..cols {
            let x = col as f64 * size;
            let y = row as f64 * size;
            let index = arcs.len();
            arcs.push(json!([
                [x, y],
                [x + size, y],
                [x + size, y + size],
                [x, y + size],
                [x, y]
            ]));
            geometries.push(json!({
                "type": "Polygon",
                "arcs": [[index]],
                "id": index + 1,
                "properties": { "row": row, "col": col }
            }));
        }
    }

    json!({
        "type": "Topology",
        "arcs": arcs,
        "objects": {
            "cells": { "type": "GeometryCollection", "geometries": geometries }
        }
    })
}

/// One record per id with `value_field` set to `id * step`.
pub fn region_records(ids: &[i64], key_field: &str, value_field: &str, step: f64) -> Vec<Value> {
    ids.iter()
        .map(|&id| {
            let mut record = serde_json::Map::new();
            record.insert(key_field.to_string(), json!(id));
            record.insert(value_field.to_string(), json!(id as f64 * step));
            Value::Object(record)
        })
        .collect()
}

/// Common container sizes as `(width, height)`.
pub mod container {
    /// Map default
    pub const DEFAULT: (f64, f64) = (600.0, 400.0);

    pub const SQUARE: (f64, f64) = (500.0, 500.0);

    pub const WIDE: (f64, f64) = (1200.0, 300.0);

    /// Degenerate, rejected by fitting
    pub const ZERO: (f64, f64) = (0.0, 0.0);
}
