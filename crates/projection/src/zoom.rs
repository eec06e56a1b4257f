//! Stepwise zoom around the visual centre.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ProjectionError, ProjectionResult};
use crate::view::{center_point, fit_translate, Anchor, Container, ViewState};

/// Scale multiplier for one zoom step.
pub const DEFAULT_ZOOM_FACTOR: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    In,
    Out,
    Reset,
    /// Keep the current view
    Constant,
}

/// What a zoom listener receives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomEvent {
    pub scale: f64,
    pub translate: [f64; 2],
}

impl From<ViewState> for ZoomEvent {
    fn from(view: ViewState) -> Self {
        Self {
            scale: view.scale,
            translate: view.translate,
        }
    }
}

/// Apply one zoom step.
///
/// `In` and `Out` multiply or divide the scale by `factor`, then translate so
/// the geometry under the container centre stays there. `Reset` returns
/// `initial` exactly.
pub fn zoom(
    direction: ZoomDirection,
    current: &ViewState,
    initial: &ViewState,
    container: Container,
    factor: f64,
) -> ProjectionResult<ViewState> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(ProjectionError::InvalidZoomFactor(factor));
    }

    let scale = match direction {
        ZoomDirection::In => current.scale * factor,
        ZoomDirection::Out => current.scale / factor,
        ZoomDirection::Reset => return Ok(*initial),
        ZoomDirection::Constant => return Ok(*current),
    };
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ProjectionError::NonFiniteScale(scale));
    }

    let center = center_point(container, current);
    let next = ViewState::new(scale, fit_translate(container, scale, Anchor::Center(center)));
    debug!(?direction, scale = next.scale, translate = ?next.translate, "Zoomed");
    Ok(next)
}

/// Shift the view by a screen-space delta, as a drag does.
pub fn pan(view: &ViewState, delta: [f64; 2]) -> ViewState {
    ViewState::new(
        view.scale,
        [view.translate[0] + delta[0], view.translate[1] + delta[1]],
    )
}

/// Re-emit the current view to a zoom listener without changing it.
pub fn resync(view: &ViewState) -> ZoomEvent {
    ZoomEvent::from(*view)
}
