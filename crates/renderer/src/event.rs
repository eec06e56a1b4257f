//! Interaction events passed to consumer callbacks.

use std::sync::Arc;

use projection::ZoomEvent;
use serde_json::Value;
use topology::Feature;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    Clear,
    MouseOver,
    MouseMove,
    MouseLeave,
}

/// A user interaction. Handlers that consume an event mark it so the host
/// does not also act on it.
#[derive(Debug, Clone, PartialEq)]
pub struct UiEvent {
    pub kind: EventKind,
    /// Pointer position in container pixels, when known
    pub position: Option<[f64; 2]>,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl UiEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            position: None,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some([x, y]);
        self
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Mark as handled.
    pub(crate) fn consume(&mut self) {
        self.prevent_default();
        self.stop_propagation();
    }
}

/// `(event, item)` callback for legend items.
pub type ItemHandler = Arc<dyn Fn(&UiEvent, &Value) + Send + Sync>;

/// `(event, feature, datum)` callback for map features.
pub type FeatureHandler = Arc<dyn Fn(&UiEvent, &Feature, Option<&Value>) + Send + Sync>;

/// `(scale, translate)` zoom listener.
pub type ZoomHandler = Arc<dyn Fn(ZoomEvent) + Send + Sync>;
