//! Zoom-dependent level of detail.

use topology::Position;

use crate::view::{project, ViewState};

/// A point is drawn at `scale` when its effective area is at least
/// `1 / scale²`, i.e. when it would span at least one square pixel.
pub fn is_significant(z: f64, scale: f64) -> bool {
    z >= 1.0 / (scale * scale)
}

/// Project the points of `positions` that are significant at `view.scale`.
/// The positions themselves are left untouched.
pub fn project_significant<'a>(
    positions: &'a [Position],
    view: &'a ViewState,
) -> impl Iterator<Item = [f64; 2]> + 'a {
    positions
        .iter()
        .filter(move |p| is_significant(p[2], view.scale))
        .map(move |p| project([p[0], p[1]], view))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold() {
        // scale 2 keeps z >= 0.25
        assert!(is_significant(0.25, 2.0));
        assert!(!is_significant(0.2, 2.0));
        assert!(is_significant(f64::INFINITY, 0.001));
    }

    #[test]
    fn test_higher_scale_keeps_more() {
        let zs = [0.001, 0.01, 0.1, 1.0, 10.0, 100.0];
        let mut previous = 0;
        for scale in [0.05, 0.1, 0.5, 1.0, 5.0, 50.0] {
            let kept = zs.iter().filter(|z| is_significant(**z, scale)).count();
            assert!(kept >= previous);
            previous = kept;
        }
    }

    #[test]
    fn test_project_significant_filters_and_projects() {
        let positions = [
            [0.0, 0.0, f64::INFINITY],
            [1.0, 1.0, 0.2],
            [2.0, 0.0, 10.0],
            [4.0, 0.0, f64::INFINITY],
        ];
        let view = ViewState::new(2.0, [1.0, 1.0]);
        let projected: Vec<[f64; 2]> = project_significant(&positions, &view).collect();
        assert_eq!(projected, vec![[1.0, 1.0], [5.0, 1.0], [9.0, 1.0]]);
        assert_eq!(positions[1][2], 0.2);
    }
}
