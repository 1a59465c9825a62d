use std::fmt;

/// City identifier. Ids handed out by [`crate::CityGraph::add_city`] start at 1.
pub type CityId = u32;

/// A named point on the canvas.
///
/// Coordinates drive hit-testing and random instance generation only; the
/// solvers work purely from connection distances.
#[derive(Clone, Debug, PartialEq)]
pub struct City {
    pub id: CityId,
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl City {
    pub fn new(id: CityId, name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id,
            name: name.into(),
            x,
            y,
        }
    }

    pub fn dist(&self, rhs: &Self) -> f64 {
        self.dist_to_point(rhs.x, rhs.y)
    }

    pub fn dist_to_point(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }

    pub(crate) fn has_finite_coords(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.name)
    }
}

/// Undirected weighted edge between two cities.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub from: CityId,
    pub to: CityId,
    pub distance: f64,
}

impl Connection {
    pub fn new(from: CityId, to: CityId, distance: f64) -> Self {
        Self { from, to, distance }
    }

    pub fn touches(&self, id: CityId) -> bool {
        self.from == id || self.to == id
    }

    /// Endpoint opposite `id`, or `None` if `id` is not an endpoint.
    pub fn other(&self, id: CityId) -> Option<CityId> {
        if self.from == id {
            Some(self.to)
        } else if self.to == id {
            Some(self.from)
        } else {
            None
        }
    }

    pub(crate) fn key(&self) -> (CityId, CityId) {
        edge_key(self.from, self.to)
    }
}

pub(crate) fn edge_key(a: CityId, b: CityId) -> (CityId, CityId) {
    if a <= b { (a, b) } else { (b, a) }
}
