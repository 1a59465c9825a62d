use std::collections::HashMap;

use super::{CityGraph, CityId};

/// Dense distance lookup over a graph snapshot.
///
/// Rows and columns follow the graph's city order. The diagonal is 0, missing
/// connections are `f64::INFINITY`, and the matrix is symmetric.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceMatrix {
    ids: Vec<CityId>,
    index: HashMap<CityId, usize>,
    weights: Vec<f64>,
}

impl DistanceMatrix {
    pub fn from_graph(graph: &CityGraph) -> Self {
        let ids: Vec<CityId> = graph.cities().iter().map(|c| c.id).collect();
        let index: HashMap<CityId, usize> =
            ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let n = ids.len();

        let mut weights = vec![f64::INFINITY; n * n];
        for i in 0..n {
            weights[i * n + i] = 0.0;
        }
        for conn in graph.connections() {
            let (Some(&i), Some(&j)) = (index.get(&conn.from), index.get(&conn.to)) else {
                continue;
            };
            weights[i * n + j] = conn.distance;
            weights[j * n + i] = conn.distance;
        }

        Self {
            ids,
            index,
            weights,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// City ids in row order.
    pub fn ids(&self) -> &[CityId] {
        &self.ids
    }

    pub fn index_of(&self, id: CityId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Distance between rows `i` and `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.weights[i * self.len() + j]
    }

    /// Distance between two city ids, `None` if either id is absent.
    pub fn between(&self, a: CityId, b: CityId) -> Option<f64> {
        Some(self.get(self.index_of(a)?, self.index_of(b)?))
    }

    /// First row pair `(i, j)`, `i < j`, with no connection.
    pub fn first_missing_edge(&self) -> Option<(usize, usize)> {
        let n = self.len();
        (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .find(|&(i, j)| self.get(i, j).is_infinite())
    }

    pub fn is_complete(&self) -> bool {
        self.first_missing_edge().is_none()
    }

    pub fn rows(&self) -> Vec<Vec<f64>> {
        let n = self.len();
        if n == 0 {
            return Vec::new();
        }
        self.weights.chunks(n).map(<[f64]>::to_vec).collect()
    }
}
