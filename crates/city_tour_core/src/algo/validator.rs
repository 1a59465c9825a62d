use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::{CityGraph, CityId, Error, Result};

/// Reachability checks over a [`CityGraph`].
pub struct GraphValidator;

impl GraphValidator {
    /// Breadth-first search from `start`; returns every reachable city id,
    /// including `start`. Unknown `start` yields an empty set.
    pub fn reachable_from(graph: &CityGraph, start: CityId) -> BTreeSet<CityId> {
        let mut visited = BTreeSet::new();
        if !graph.contains(start) {
            return visited;
        }

        let adjacency = Self::adjacency(graph);
        let mut queue = VecDeque::from([start]);
        visited.insert(start);

        while let Some(current) = queue.pop_front() {
            for &next in adjacency.get(&current).into_iter().flatten() {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        visited
    }

    /// Reachable set from the first city in list order.
    pub fn reachable(graph: &CityGraph) -> BTreeSet<CityId> {
        graph
            .cities()
            .first()
            .map(|c| Self::reachable_from(graph, c.id))
            .unwrap_or_default()
    }

    pub fn is_connected(graph: &CityGraph) -> bool {
        Self::reachable(graph).len() == graph.len()
    }

    /// Fails with [`Error::DisconnectedGraph`] listing the unreachable cities.
    pub fn ensure_connected(graph: &CityGraph) -> Result<()> {
        let reachable = Self::reachable(graph);
        if reachable.len() == graph.len() {
            return Ok(());
        }

        let unreachable: Vec<CityId> = graph
            .cities()
            .iter()
            .map(|c| c.id)
            .filter(|id| !reachable.contains(id))
            .collect();
        log::debug!(
            "validator: disconnected reachable={} total={} unreachable={unreachable:?}",
            reachable.len(),
            graph.len()
        );
        Err(Error::DisconnectedGraph { unreachable })
    }

    fn adjacency(graph: &CityGraph) -> HashMap<CityId, Vec<CityId>> {
        let mut adjacency: HashMap<CityId, Vec<CityId>> = HashMap::with_capacity(graph.len());
        for conn in graph.connections() {
            adjacency.entry(conn.from).or_default().push(conn.to);
            adjacency.entry(conn.to).or_default().push(conn.from);
        }
        adjacency
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::GraphValidator;
    use crate::{City, CityGraph, Connection, Error};

    fn graph(ids: &[u32], connections: &[(u32, u32)]) -> CityGraph {
        let cities: Vec<City> = ids
            .iter()
            .map(|&id| City::new(id, format!("C{id}"), 0.0, 0.0))
            .collect();
        let connections: Vec<Connection> = connections
            .iter()
            .map(|&(a, b)| Connection::new(a, b, 1.0))
            .collect();
        CityGraph::from_parts(&cities, &connections).expect("graph")
    }

    #[test]
    fn path_graph_is_connected() {
        let g = graph(&[1, 2, 3, 4], &[(1, 2), (2, 3), (3, 4)]);
        assert!(GraphValidator::is_connected(&g));
        assert_eq!(
            GraphValidator::reachable_from(&g, 4),
            BTreeSet::from([1, 2, 3, 4])
        );
        GraphValidator::ensure_connected(&g).expect("connected");
    }

    #[test]
    fn two_partitions_are_reported_as_disconnected() {
        let g = graph(&[1, 2, 3, 4], &[(1, 2), (3, 4)]);
        assert!(!GraphValidator::is_connected(&g));
        assert_eq!(GraphValidator::reachable(&g), BTreeSet::from([1, 2]));

        let err = GraphValidator::ensure_connected(&g).expect_err("disconnected");
        match err {
            Error::DisconnectedGraph { unreachable } => assert_eq!(unreachable, vec![3, 4]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn isolated_city_is_unreachable() {
        let g = graph(&[1, 2, 3], &[(1, 2)]);
        let err = GraphValidator::ensure_connected(&g).expect_err("isolated city");
        assert!(matches!(err, Error::DisconnectedGraph { ref unreachable } if unreachable == &vec![3]));
    }

    #[test]
    fn unknown_start_reaches_nothing() {
        let g = graph(&[1, 2], &[(1, 2)]);
        assert!(GraphValidator::reachable_from(&g, 42).is_empty());
    }

    #[test]
    fn empty_and_single_city_graphs_are_trivially_connected() {
        assert!(GraphValidator::is_connected(&CityGraph::new()));
        assert!(GraphValidator::is_connected(&graph(&[7], &[])));
    }
}
