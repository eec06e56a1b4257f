//! Visvalingam effective-area ranking of arc points.
//!
//! Every point gets a significance `z`: the area of the triangle it forms
//! with its neighbours at the moment it would be removed. Rendering at zoom
//! `scale` keeps only points with `z >= 1 / scale²`, so the same ranked
//! topology serves every zoom level.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use tracing::debug;

use crate::decode::decode_arcs;
use crate::error::TopologyResult;
use crate::model::{Geometry, Topology, Transform};

/// A topology whose arcs are absolute `[x, y, z]` positions.
#[derive(Debug, Clone)]
pub struct SimplifiedTopology {
    pub arcs: Vec<Vec<[f64; 3]>>,
    pub objects: BTreeMap<String, Geometry>,
    pub transform: Option<Transform>,
}

impl SimplifiedTopology {
    /// Number of arc points whose significance passes the threshold for `scale`.
    pub fn visible_point_count(&self, scale: f64) -> usize {
        let min_area = 1.0 / (scale * scale);
        self.arcs
            .iter()
            .flatten()
            .filter(|p| p[2] >= min_area)
            .count()
    }
}

/// Doubled area of the triangle `abc`.
pub fn triangle_area(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    ((a[0] - c[0]) * (b[1] - a[1]) - (a[0] - b[0]) * (c[1] - a[1])).abs()
}

/// Rank every arc point of `topology`. Pure: the input is left untouched.
pub fn presimplify(topology: &Topology) -> TopologyResult<SimplifiedTopology> {
    topology.validate()?;

    let arcs: Vec<Vec<[f64; 3]>> = decode_arcs(topology)?
        .iter()
        .map(|arc| rank_arc(arc))
        .collect();

    debug!(
        arcs = arcs.len(),
        points = arcs.iter().map(Vec::len).sum::<usize>(),
        "Presimplified topology"
    );

    Ok(SimplifiedTopology {
        arcs,
        objects: topology.objects.clone().unwrap_or_default(),
        transform: topology.transform,
    })
}

/// Heap entry for the point at `index`; `generation` invalidates stale
/// entries left behind when a neighbour's removal changes its area.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    area: f64,
    index: usize,
    generation: u32,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    // Reversed so BinaryHeap pops the smallest area, lowest index first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .area
            .total_cmp(&self.area)
            .then_with(|| other.index.cmp(&self.index))
    }
}

fn rank_arc(points: &[[f64; 2]]) -> Vec<[f64; 3]> {
    let n = points.len();
    let mut z = vec![f64::INFINITY; n];

    if n >= 3 {
        let mut prev: Vec<usize> = (0..n).map(|i| i.saturating_sub(1)).collect();
        let mut next: Vec<usize> = (0..n).map(|i| i + 1).collect();
        let mut generation = vec![0u32; n];
        let mut heap = BinaryHeap::with_capacity(n);

        for i in 1..n - 1 {
            heap.push(Candidate {
                area: triangle_area(points[i - 1], points[i], points[i + 1]),
                index: i,
                generation: 0,
            });
        }

        let mut max_area = 0.0_f64;
        while let Some(candidate) = heap.pop() {
            let i = candidate.index;
            if candidate.generation != generation[i] || z[i].is_finite() {
                continue;
            }

            // A point never ranks below one eliminated before it.
            let area = candidate.area.max(max_area);
            max_area = area;
            z[i] = area;

            let (p, q) = (prev[i], next[i]);
            next[p] = q;
            prev[q] = p;

            for neighbour in [p, q] {
                if neighbour == 0 || neighbour == n - 1 {
                    continue;
                }
                generation[neighbour] += 1;
                heap.push(Candidate {
                    area: triangle_area(
                        points[prev[neighbour]],
                        points[neighbour],
                        points[next[neighbour]],
                    ),
                    index: neighbour,
                    generation: generation[neighbour],
                });
            }
        }
    }

    points
        .iter()
        .zip(z)
        .map(|(p, z)| [p[0], p[1], z])
        .collect()
}
