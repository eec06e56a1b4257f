//! SVG path data for features at the current view.
//!
//! Only points significant at the view's scale are emitted, so path size
//! tracks zoom level rather than source resolution.

use projection::{project, project_significant, ViewState};
use topology::{FeatureGeometry, Position};

use crate::markup::number;

/// Radius of the circle drawn for point geometries.
pub const POINT_RADIUS: f64 = 4.5;

/// Path data for `geometry`, or an empty string when nothing is visible.
pub fn geometry_path(geometry: &FeatureGeometry, view: &ViewState) -> String {
    let mut d = String::new();
    write_geometry(&mut d, geometry, view);
    d
}

fn write_geometry(d: &mut String, geometry: &FeatureGeometry, view: &ViewState) {
    match geometry {
        FeatureGeometry::Point(p) => write_point(d, p, view),
        FeatureGeometry::MultiPoint(points) => points.iter().for_each(|p| write_point(d, p, view)),
        FeatureGeometry::LineString(line) => write_line(d, line, view, false),
        FeatureGeometry::MultiLineString(lines) => {
            lines.iter().for_each(|l| write_line(d, l, view, false))
        }
        FeatureGeometry::Polygon(rings) => rings.iter().for_each(|r| write_line(d, r, view, true)),
        FeatureGeometry::MultiPolygon(polygons) => polygons
            .iter()
            .flatten()
            .for_each(|r| write_line(d, r, view, true)),
        FeatureGeometry::GeometryCollection(members) => {
            members.iter().for_each(|g| write_geometry(d, g, view))
        }
    }
}

fn write_line(d: &mut String, positions: &[Position], view: &ViewState, closed: bool) {
    let mut first = true;
    for [x, y] in project_significant(positions, view) {
        d.push(if first { 'M' } else { 'L' });
        d.push_str(&number(x));
        d.push(',');
        d.push_str(&number(y));
        first = false;
    }
    if closed && !first {
        d.push('Z');
    }
}

fn write_point(d: &mut String, position: &Position, view: &ViewState) {
    let [x, y] = project([position[0], position[1]], view);
    let r = number(POINT_RADIUS);
    let diameter = number(2.0 * POINT_RADIUS);
    d.push_str(&format!(
        "M{},{}m0,{r}a{r},{r} 0 1,1 0,-{diameter}a{r},{r} 0 1,1 0,{diameter}z",
        number(x),
        number(y),
    ));
}
