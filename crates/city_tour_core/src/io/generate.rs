use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{CityGraph, Error, Result};

/// Canvas the generated cities are scattered over.
pub const CANVAS_WIDTH: f64 = 800.0;
pub const CANVAS_HEIGHT: f64 = 500.0;

const MIN_ROAD: f64 = 0.1;

/// Complete graph of `n` cities named `C<id>`, with Euclidean road lengths
/// rounded to one decimal. The same seed always yields the same graph.
pub fn random_instance(n: usize, seed: u64) -> Result<CityGraph> {
    if n < 2 {
        return Err(Error::invalid_input(format!(
            "random instance needs at least 2 cities, got {n}"
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = CityGraph::new();
    for idx in 1..=n {
        let x = rng.random_range(0.0..CANVAS_WIDTH);
        let y = rng.random_range(0.0..CANVAS_HEIGHT);
        graph.add_city(&format!("C{idx}"), x, y)?;
    }

    let cities = graph.cities().to_vec();
    for (i, a) in cities.iter().enumerate() {
        for b in &cities[i + 1..] {
            let road = ((a.dist(b) * 10.0).round() / 10.0).max(MIN_ROAD);
            graph.connect(a.id, b.id, road)?;
        }
    }

    log::debug!(
        "generate: cities={n} roads={} seed={seed}",
        graph.connection_count()
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::{CANVAS_HEIGHT, CANVAS_WIDTH, random_instance};
    use crate::algo::validator::GraphValidator;

    #[test]
    fn generates_complete_graph_on_canvas() {
        let graph = random_instance(7, 11).expect("generate");
        assert_eq!(graph.len(), 7);
        assert_eq!(graph.connection_count(), 7 * 6 / 2);
        assert!(graph.distance_matrix().is_complete());
        assert!(GraphValidator::is_connected(&graph));
        for city in graph.cities() {
            assert!((0.0..CANVAS_WIDTH).contains(&city.x));
            assert!((0.0..CANVAS_HEIGHT).contains(&city.y));
            assert_eq!(city.name, format!("C{}", city.id));
        }
    }

    #[test]
    fn same_seed_same_graph() {
        let a = random_instance(5, 99).expect("a");
        let b = random_instance(5, 99).expect("b");
        assert_eq!(a.cities(), b.cities());
        assert!(a.connections().eq(b.connections()));

        let c = random_instance(5, 100).expect("c");
        assert_ne!(a.cities(), c.cities());
    }

    #[test]
    fn road_lengths_are_positive_and_rounded() {
        let graph = random_instance(6, 5).expect("generate");
        for conn in graph.connections() {
            assert!(conn.distance >= 0.1);
            let tenths = conn.distance * 10.0;
            assert!((tenths - tenths.round()).abs() < 1e-6);
        }
    }

    #[test]
    fn rejects_fewer_than_two_cities() {
        assert!(random_instance(1, 0).is_err());
        assert!(random_instance(0, 0).is_err());
    }
}
