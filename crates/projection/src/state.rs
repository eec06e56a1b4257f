//! Derived map state and explicit change detection.
//!
//! A map's expensive state (ranked topology, extracted layers, bounds, data
//! index, fitted view) is derived from its props. When props change, only
//! the parts whose inputs changed are rebuilt: topology and data are
//! compared by identity, the container by value.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use topology::{
    extract_layers, layer_bounds, presimplify, FeatureCollection, SimplifiedTopology, Topology,
};
use tracing::debug;
use viz_common::{Accessor, BoundingBox, DataIndex};

use crate::error::ProjectionResult;
use crate::view::{fit_view, Container, ViewState};
use crate::zoom::{zoom, ZoomDirection};

/// Inputs a map derives its state from.
#[derive(Debug, Clone)]
pub struct MapProps {
    pub topology: Arc<Topology>,
    pub data: Arc<Vec<Value>>,
    /// Resolves each record's join key
    pub key_field: Accessor,
    pub container: Container,
}

impl MapProps {
    pub fn new(
        topology: Arc<Topology>,
        data: Arc<Vec<Value>>,
        key_field: impl Into<Accessor>,
        container: Container,
    ) -> Self {
        Self {
            topology,
            data,
            key_field: key_field.into(),
            container,
        }
    }
}

/// Which derived parts are out of date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Staleness {
    pub topology: bool,
    pub data: bool,
    pub size: bool,
}

impl Staleness {
    pub fn any(&self) -> bool {
        self.topology || self.data || self.size
    }
}

/// Compare two prop sets.
pub fn detect_changes(old: &MapProps, new: &MapProps) -> Staleness {
    Staleness {
        topology: !Arc::ptr_eq(&old.topology, &new.topology),
        data: !Arc::ptr_eq(&old.data, &new.data) || old.key_field != new.key_field,
        size: old.container != new.container,
    }
}

#[derive(Debug, Clone)]
pub struct MapState {
    pub simplified: Arc<SimplifiedTopology>,
    pub layers: Arc<BTreeMap<String, FeatureCollection>>,
    pub bounds: BoundingBox,
    pub data: Arc<DataIndex>,
    pub container: Container,
    /// View fitted to the bounds; what `Reset` returns to
    pub initial: ViewState,
    pub view: ViewState,
}

struct DerivedGeometry {
    simplified: Arc<SimplifiedTopology>,
    layers: Arc<BTreeMap<String, FeatureCollection>>,
    bounds: BoundingBox,
}

fn derive_geometry(topology: &Topology) -> ProjectionResult<DerivedGeometry> {
    let simplified = presimplify(topology)?;
    let layers = extract_layers(&simplified)?;
    let bounds = layer_bounds(&layers);
    Ok(DerivedGeometry {
        simplified: Arc::new(simplified),
        layers: Arc::new(layers),
        bounds,
    })
}

impl MapState {
    /// Derive everything from scratch.
    pub fn new(props: &MapProps) -> ProjectionResult<Self> {
        let geometry = derive_geometry(&props.topology)?;
        let initial = fit_view(&geometry.bounds, props.container)?;
        debug!(
            layers = geometry.layers.len(),
            scale = initial.scale,
            "Initialised map state"
        );

        Ok(Self {
            simplified: geometry.simplified,
            layers: geometry.layers,
            bounds: geometry.bounds,
            data: Arc::new(DataIndex::build(&props.data, &props.key_field)),
            container: props.container,
            initial,
            view: initial,
        })
    }

    /// View after one zoom step from the current one.
    pub fn zoomed(&self, direction: ZoomDirection, factor: f64) -> ProjectionResult<ViewState> {
        zoom(direction, &self.view, &self.initial, self.container, factor)
    }
}

/// Next state for `props`, rebuilding only what `staleness` marks.
///
/// A new topology or container re-fits the initial view and moves the
/// current view to it; a data change alone keeps the current zoom.
pub fn recompute(
    state: &MapState,
    props: &MapProps,
    staleness: Staleness,
) -> ProjectionResult<MapState> {
    let mut next = state.clone();

    if staleness.topology {
        let geometry = derive_geometry(&props.topology)?;
        next.simplified = geometry.simplified;
        next.layers = geometry.layers;
        next.bounds = geometry.bounds;
    }

    if staleness.topology || staleness.size {
        next.container = props.container;
        next.initial = fit_view(&next.bounds, props.container)?;
        next.view = next.initial;
    }

    if staleness.data {
        next.data = Arc::new(DataIndex::build(&props.data, &props.key_field));
    }

    debug!(
        topology = staleness.topology,
        data = staleness.data,
        size = staleness.size,
        scale = next.view.scale,
        "Recomputed map state"
    );
    Ok(next)
}
