use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Geometric primitive representing a point, or a position of an item within a container
#[derive(Debug, Clone, PartialEq, Copy, Default, Serialize, Deserialize)]
pub struct Point(pub f32, pub f32);

impl Point {
    /// Returns `self` translated by `(dx, dy)`
    pub fn translate(self, dx: f32, dy: f32) -> Point {
        Point(self.0 + dx, self.1 + dy)
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.0, self.1)
    }
}
