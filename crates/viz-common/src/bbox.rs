//! Axis-aligned bounding boxes in projected pixel space.

use serde::{Deserialize, Serialize};

/// An axis-aligned box `[[min_x, min_y], [max_x, max_y]]`.
///
/// Geometry is expected to be pre-projected, so coordinates are pixels at
/// scale 1 with no translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// The inverted box that any call to [`BoundingBox::extend`] replaces.
    pub fn empty() -> Self {
        Self::new(
            f64::INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NEG_INFINITY,
        )
    }

    /// The unit box `[[0, 0], [1, 1]]`.
    pub fn unit() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    /// Build from the `[[min_x, min_y], [max_x, max_y]]` corner form.
    pub fn from_corners(corners: [[f64; 2]; 2]) -> Self {
        Self::new(corners[0][0], corners[0][1], corners[1][0], corners[1][1])
    }

    /// Return the `[[min_x, min_y], [max_x, max_y]]` corner form.
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [[self.min_x, self.min_y], [self.max_x, self.max_y]]
    }

    /// True until at least one point has been added.
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Grow the box to include a point. Non-finite coordinates are ignored.
    pub fn extend(&mut self, x: f64, y: f64) {
        if !x.is_finite() || !y.is_finite() {
            return;
        }
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// `(max_x + min_x, max_y + min_y)`: twice the box center.
    ///
    /// This is the quantity fit-translation works with.
    pub fn center_sum(&self) -> (f64, f64) {
        (self.max_x + self.min_x, self.max_y + self.min_y)
    }

    /// Check if this bbox intersects another.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}
