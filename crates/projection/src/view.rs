//! Container fitting and the affine view transform.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use viz_common::BoundingBox;

use crate::error::{ProjectionError, ProjectionResult};

/// Fraction of the container the fitted geometry occupies.
const FIT_MARGIN: f64 = 0.95;

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub width: f64,
    pub height: f64,
}

impl Container {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> ProjectionResult<()> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.width) || !valid(self.height) {
            return Err(ProjectionError::InvalidContainer {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    fn size(&self) -> Vector2<f64> {
        Vector2::new(self.width, self.height)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new(600.0, 400.0)
    }
}

impl From<(f64, f64)> for Container {
    fn from((width, height): (f64, f64)) -> Self {
        Self::new(width, height)
    }
}

/// Current zoom: screen position is `p * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub scale: f64,
    pub translate: [f64; 2],
}

impl ViewState {
    pub fn new(scale: f64, translate: [f64; 2]) -> Self {
        Self { scale, translate }
    }

    /// Scale 1, no translation.
    pub fn identity() -> Self {
        Self::new(1.0, [0.0, 0.0])
    }

    fn offset(&self) -> Vector2<f64> {
        Vector2::new(self.translate[0], self.translate[1])
    }
}

/// Where to centre the geometry when computing a translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// Centre the bounds in the container.
    Bounds(BoundingBox),
    /// Keep a sum-form centre (see [`center_point`]) in the middle.
    Center([f64; 2]),
}

/// Largest scale at which `bounds` fits inside `container` with a 5% margin.
pub fn fit_scale(bounds: &BoundingBox, container: Container) -> ProjectionResult<f64> {
    container.validate()?;

    let aspect_x = bounds.width().abs() / container.width;
    let aspect_y = bounds.height().abs() / container.height;
    let scale = FIT_MARGIN / aspect_x.max(aspect_y);

    if !scale.is_finite() || scale <= 0.0 {
        return Err(ProjectionError::NonFiniteScale(scale));
    }
    Ok(scale)
}

/// Translation that centres `anchor` in `container` at `scale`.
pub fn fit_translate(container: Container, scale: f64, anchor: Anchor) -> [f64; 2] {
    let geometry = match anchor {
        Anchor::Bounds(bounds) => {
            let (x, y) = bounds.center_sum();
            Vector2::new(x, y)
        }
        Anchor::Center(center) => Vector2::new(center[0], center[1]),
    };
    let t = (container.size() - geometry * scale) / 2.0;
    [t.x, t.y]
}

/// Scale and translation that fit `bounds` centred in `container`.
pub fn fit_view(bounds: &BoundingBox, container: Container) -> ProjectionResult<ViewState> {
    let scale = fit_scale(bounds, container)?;
    Ok(ViewState::new(
        scale,
        fit_translate(container, scale, Anchor::Bounds(*bounds)),
    ))
}

/// Map a scale-1 point to screen space.
pub fn project(point: [f64; 2], view: &ViewState) -> [f64; 2] {
    let p = Point2::new(point[0], point[1]) * view.scale + view.offset();
    [p.x, p.y]
}

/// The geometry coordinate currently in the middle of the container, in
/// sum form `(min + max)` so it can be fed back into [`fit_translate`].
pub fn center_point(container: Container, view: &ViewState) -> [f64; 2] {
    let c = (container.size() - view.offset() * 2.0) / view.scale;
    [c.x, c.y]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_scale_limited_by_wider_axis() {
        let bounds = BoundingBox::new(0.0, 0.0, 20.0, 10.0);
        // x: 20/600, y: 10/400 -> x dominates
        let scale = fit_scale(&bounds, Container::new(600.0, 400.0)).unwrap();
        assert!((scale - 0.95 * 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_translate_centres_bounds() {
        let bounds = BoundingBox::new(0.0, 0.0, 20.0, 10.0);
        let container = Container::new(600.0, 400.0);
        let view = fit_view(&bounds, container).unwrap();

        let [left, top] = project([bounds.min_x, bounds.min_y], &view);
        let [right, bottom] = project([bounds.max_x, bounds.max_y], &view);
        assert!((left - (600.0 - right)).abs() < 1e-9);
        assert!((top - (400.0 - bottom)).abs() < 1e-9);
    }

    #[test]
    fn test_center_point_inverts_fit_translate() {
        let container = Container::new(800.0, 300.0);
        let view = ViewState::new(3.0, [12.0, -40.0]);
        let center = center_point(container, &view);
        let [tx, ty] = fit_translate(container, view.scale, Anchor::Center(center));
        assert!((tx - 12.0).abs() < 1e-9);
        assert!((ty + 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_container() {
        let bounds = BoundingBox::unit();
        for (w, h) in [(0.0, 400.0), (600.0, -1.0), (f64::NAN, 10.0)] {
            assert!(matches!(
                fit_scale(&bounds, Container::new(w, h)),
                Err(ProjectionError::InvalidContainer { .. })
            ));
        }
    }

    #[test]
    fn test_degenerate_bounds_rejected() {
        let point = BoundingBox::new(5.0, 5.0, 5.0, 5.0);
        assert!(matches!(
            fit_scale(&point, Container::default()),
            Err(ProjectionError::NonFiniteScale(_))
        ));
    }

    #[test]
    fn test_project_identity() {
        assert_eq!(project([3.5, -2.0], &ViewState::identity()), [3.5, -2.0]);
        assert_eq!(
            project([1.0, 2.0], &ViewState::new(2.0, [10.0, 20.0])),
            [12.0, 24.0]
        );
    }
}
