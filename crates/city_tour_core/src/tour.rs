use std::{collections::HashSet, fmt};

use crate::{CityGraph, CityId, Error, Result};

/// Closed walk over city ids; the first id is repeated at the end.
#[derive(Clone, Debug, PartialEq)]
pub struct Tour {
    pub path: Vec<CityId>,
    pub total_distance: f64,
}

impl Tour {
    pub fn new(path: Vec<CityId>, total_distance: f64) -> Self {
        Self {
            path,
            total_distance,
        }
    }

    pub fn start(&self) -> Option<CityId> {
        self.path.first().copied()
    }

    /// Number of distinct stops (the repeated terminal id is not counted).
    pub fn stops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn is_closed(&self) -> bool {
        self.path.len() >= 2 && self.path.first() == self.path.last()
    }

    /// Consecutive `(from, to)` pairs, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (CityId, CityId)> + '_ {
        self.path.windows(2).map(|w| (w[0], w[1]))
    }

    /// Checks the tour against `graph`: closed, every city exactly once, every
    /// edge present, and `total_distance` equal to the edge sum.
    pub fn verify(&self, graph: &CityGraph) -> Result<()> {
        if !self.is_closed() {
            return Err(Error::validation("tour does not return to its start city"));
        }

        let mut seen = HashSet::with_capacity(self.stops());
        for &id in &self.path[..self.stops()] {
            if !graph.contains(id) {
                return Err(Error::UnknownCity(id));
            }
            if !seen.insert(id) {
                return Err(Error::validation(format!("tour visits city {id} twice")));
            }
        }
        if seen.len() != graph.len() {
            return Err(Error::validation(format!(
                "tour visits {} of {} cities",
                seen.len(),
                graph.len()
            )));
        }

        let mut total = 0.0;
        for (a, b) in self.edges() {
            total += graph.distance(a, b).ok_or_else(|| {
                Error::validation(format!("tour uses missing connection {a}<->{b}"))
            })?;
        }
        if (total - self.total_distance).abs() > 1e-9 * total.max(1.0) {
            return Err(Error::validation(format!(
                "tour total {} does not match edge sum {total}",
                self.total_distance
            )));
        }
        Ok(())
    }

    pub fn tour_metrics(&self, graph: &CityGraph) -> TourMetrics {
        let distances: Vec<f64> = self
            .edges()
            .filter_map(|(a, b)| graph.distance(a, b))
            .collect();

        if distances.is_empty() {
            log::info!("metrics: n < 2 so there's nothing to report");
            return TourMetrics::default();
        }

        let total: f64 = distances.iter().sum();
        let average = total / distances.len() as f64;
        let longest = distances.iter().copied().fold(0.0_f64, f64::max);

        log::info!(
            "metrics: n={} total={total:.1} longest={longest:.1} avg={average:.1}",
            self.stops()
        );

        TourMetrics {
            stops: self.stops(),
            total,
            longest,
            average,
        }
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: Vec<String> = self.path.iter().map(ToString::to_string).collect();
        let mut buf = ryu::Buffer::new();
        write!(
            f,
            "{} (total={})",
            path.join(" -> "),
            buf.format(self.total_distance)
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TourMetrics {
    pub stops: usize,
    pub total: f64,
    pub longest: f64,
    pub average: f64,
}

#[cfg(test)]
mod tests {
    use super::Tour;
    use crate::{City, CityGraph, Connection};

    fn square() -> CityGraph {
        let cities: Vec<City> = (1..=4)
            .map(|id| City::new(id, format!("C{id}"), 0.0, 0.0))
            .collect();
        let connections = vec![
            Connection::new(1, 2, 1.0),
            Connection::new(2, 3, 2.0),
            Connection::new(3, 4, 3.0),
            Connection::new(4, 1, 4.0),
        ];
        CityGraph::from_parts(&cities, &connections).expect("graph")
    }

    #[test]
    fn verify_accepts_a_valid_cycle() {
        let tour = Tour::new(vec![1, 2, 3, 4, 1], 10.0);
        tour.verify(&square()).expect("valid tour");
        assert_eq!(tour.stops(), 4);
        assert_eq!(tour.start(), Some(1));
    }

    #[test]
    fn verify_rejects_open_repeated_incomplete_or_mispriced_tours() {
        let graph = square();
        assert!(Tour::new(vec![1, 2, 3, 4], 6.0).verify(&graph).is_err());
        assert!(Tour::new(vec![1, 2, 1, 4, 1], 10.0).verify(&graph).is_err());
        assert!(Tour::new(vec![1, 2, 3, 1], 6.0).verify(&graph).is_err());
        assert!(Tour::new(vec![1, 2, 3, 4, 1], 11.0).verify(&graph).is_err());
    }

    #[test]
    fn verify_rejects_missing_connections() {
        let err = Tour::new(vec![1, 3, 2, 4, 1], 0.0)
            .verify(&square())
            .expect_err("1-3 is not connected");
        assert!(err.to_string().contains("missing connection 1<->3"));
    }

    #[test]
    fn metrics_cover_every_edge_including_closure() {
        let metrics = Tour::new(vec![1, 2, 3, 4, 1], 10.0).tour_metrics(&square());
        assert_eq!(metrics.stops, 4);
        assert!((metrics.total - 10.0).abs() < 1e-12);
        assert!((metrics.longest - 4.0).abs() < 1e-12);
        assert!((metrics.average - 2.5).abs() < 1e-12);
    }

    #[test]
    fn display_lists_path_and_total() {
        let tour = Tour::new(vec![1, 2, 1], 3.5);
        assert_eq!(tour.to_string(), "1 -> 2 -> 1 (total=3.5)");
    }
}
