//! View transforms for pre-projected geometry.
//!
//! Geometry arrives already in pixel space at scale 1, so the only
//! projection is the affine `p * scale + translate`. This crate fits that
//! transform to a container, filters points by significance for the current
//! zoom, steps zoom in and out around the visual centre, and recomputes
//! derived map state when its inputs change.

pub mod error;
pub mod lod;
pub mod state;
pub mod view;
pub mod zoom;

pub use error::{ProjectionError, ProjectionResult};
pub use lod::{is_significant, project_significant};
pub use state::{detect_changes, recompute, MapProps, MapState, Staleness};
pub use view::{center_point, fit_scale, fit_translate, fit_view, project, Anchor, Container, ViewState};
pub use zoom::{pan, resync, zoom, ZoomDirection, ZoomEvent, DEFAULT_ZOOM_FACTOR};
