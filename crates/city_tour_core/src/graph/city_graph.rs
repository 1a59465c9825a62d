use std::collections::BTreeMap;

use super::{City, CityId, Connection, DistanceMatrix, city::edge_key};
use crate::{Error, Result};

/// Click radius used by [`CityGraph::city_at`].
pub const HIT_RADIUS: f64 = 20.0;

const FIRST_CITY_ID: CityId = 1;

/// Cities plus undirected weighted connections.
///
/// Cities keep insertion order, which decides where the heuristic tour starts.
/// Every mutation bumps [`CityGraph::revision`] so callers can tell whether a
/// tour they hold was computed against the current graph.
#[derive(Clone, Debug)]
pub struct CityGraph {
    cities: Vec<City>,
    connections: BTreeMap<(CityId, CityId), f64>,
    next_id: CityId,
    revision: u64,
}

impl Default for CityGraph {
    fn default() -> Self {
        Self {
            cities: Vec::new(),
            connections: BTreeMap::new(),
            next_id: FIRST_CITY_ID,
            revision: 0,
        }
    }
}

impl CityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from plain city and connection lists.
    ///
    /// Duplicate city ids are rejected; a repeated city pair keeps the last
    /// distance, the same as calling [`CityGraph::connect`] twice.
    pub fn from_parts(cities: &[City], connections: &[Connection]) -> Result<Self> {
        let mut graph = Self::new();
        for city in cities {
            graph.insert_city(city.clone())?;
        }
        for conn in connections {
            graph.connect(conn.from, conn.to, conn.distance)?;
        }
        Ok(graph)
    }

    /// Adds a city with the next free id. The name is trimmed and must not be empty.
    pub fn add_city(&mut self, name: &str, x: f64, y: f64) -> Result<CityId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("city name must not be empty"));
        }
        let id = self.next_id;
        self.insert_city(City::new(id, name, x, y))?;
        Ok(id)
    }

    pub fn insert_city(&mut self, city: City) -> Result<()> {
        if self.contains(city.id) {
            return Err(Error::validation(format!("duplicate city id {}", city.id)));
        }
        if !city.has_finite_coords() {
            return Err(Error::validation(format!(
                "city {} has non-finite coordinates",
                city.id
            )));
        }
        self.next_id = self.next_id.max(city.id.saturating_add(1));
        log::trace!("graph: insert city={city}");
        self.cities.push(city);
        self.touch();
        Ok(())
    }

    /// Removes a city together with every connection touching it.
    pub fn remove_city(&mut self, id: CityId) -> Result<City> {
        let pos = self.position(id).ok_or(Error::UnknownCity(id))?;
        let city = self.cities.remove(pos);
        let before = self.connections.len();
        self.connections.retain(|&(a, b), _| a != id && b != id);
        log::debug!(
            "graph: remove city={city} dropped_connections={}",
            before - self.connections.len()
        );
        self.touch();
        Ok(city)
    }

    /// Connects two cities, overwriting the distance of an existing connection.
    /// Returns the previous distance, if any.
    pub fn connect(&mut self, from: CityId, to: CityId, distance: f64) -> Result<Option<f64>> {
        if from == to {
            return Err(Error::validation(format!(
                "cannot connect city {from} to itself"
            )));
        }
        if !distance.is_finite() || distance <= 0.0 {
            return Err(Error::validation(format!(
                "distance between {from} and {to} must be a positive number, got {distance}"
            )));
        }
        for id in [from, to] {
            if !self.contains(id) {
                return Err(Error::UnknownCity(id));
            }
        }

        let previous = self.connections.insert(edge_key(from, to), distance);
        log::trace!("graph: connect {from}<->{to} distance={distance} previous={previous:?}");
        self.touch();
        Ok(previous)
    }

    /// Removes the connection between `a` and `b`, returning its distance.
    pub fn disconnect(&mut self, a: CityId, b: CityId) -> Option<f64> {
        let removed = self.connections.remove(&edge_key(a, b));
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Drops every city and connection and restarts id allocation at 1.
    pub fn clear(&mut self) {
        self.cities.clear();
        self.connections.clear();
        self.next_id = FIRST_CITY_ID;
        self.touch();
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn city(&self, id: CityId) -> Option<&City> {
        self.cities.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: CityId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Connections ordered by `(min id, max id)`, with `from < to`.
    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        self.connections
            .iter()
            .map(|(&(from, to), &distance)| Connection::new(from, to, distance))
    }

    pub fn distance(&self, a: CityId, b: CityId) -> Option<f64> {
        if a == b && self.contains(a) {
            return Some(0.0);
        }
        self.connections.get(&edge_key(a, b)).copied()
    }

    /// First city (in insertion order) within [`HIT_RADIUS`] of the point.
    pub fn city_at(&self, x: f64, y: f64) -> Option<&City> {
        self.cities
            .iter()
            .find(|c| c.dist_to_point(x, y) < HIT_RADIUS)
    }

    pub fn total_connection_distance(&self) -> f64 {
        self.connections.values().sum()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn distance_matrix(&self) -> DistanceMatrix {
        DistanceMatrix::from_graph(self)
    }

    pub(crate) fn position(&self, id: CityId) -> Option<usize> {
        self.cities.iter().position(|c| c.id == id)
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
