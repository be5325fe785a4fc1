//! Region-of-interest polygons.

use ts_building::Vertex;

/// A closed polygon given by indices into a vertex list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Polygon {
    pub vertices: Vec<usize>,
}

impl Polygon {
    pub fn new(vertices: Vec<usize>) -> Self {
        Self { vertices }
    }

    /// Even-odd point-in-polygon test against `points`.
    ///
    /// Polygons with fewer than three corners contain nothing.  Indices must
    /// be in range for `points`; [`Scenario`][crate::Scenario] checks this at
    /// load time.
    pub fn contains(&self, points: &[Vertex], x: f64, y: f64) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = self.vertices.len() - 1;
        for i in 0..self.vertices.len() {
            let a = &points[self.vertices[i]];
            let b = &points[self.vertices[j]];
            if (a.y > y) != (b.y > y) && x < (b.x - a.x) * (y - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}
