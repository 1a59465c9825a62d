use crate::{City, CityGraph, Connection, Error, Result, Tour, algo::validator::GraphValidator};

const MIN_HEURISTIC_CITIES: usize = 2;

/// Nearest-neighbor tour construction over a possibly sparse graph.
///
/// Starts at the first city in list order and always moves to the closest
/// unvisited city, lowest id first on ties. There is no backtracking: a walk
/// that strands itself, or whose last city has no connection back to the
/// start, fails with [`Error::CannotCloseTour`] even when some other visit
/// order would have produced a cycle.
pub struct HeuristicSolver<'a> {
    graph: &'a CityGraph,
}

impl<'a> HeuristicSolver<'a> {
    pub fn new(graph: &'a CityGraph) -> Self {
        Self { graph }
    }

    #[city_tour_derive::timer("heuristic")]
    pub fn solve(&self) -> Result<Tour> {
        let n = self.graph.len();
        if n < MIN_HEURISTIC_CITIES {
            return Err(Error::validation(format!(
                "need at least {MIN_HEURISTIC_CITIES} cities, got {n}"
            )));
        }

        let matrix = self.graph.distance_matrix();
        GraphValidator::ensure_connected(self.graph)?;

        let ids = matrix.ids();
        let start = 0;
        let mut visited = vec![false; n];
        visited[start] = true;
        let mut path = Vec::with_capacity(n + 1);
        path.push(ids[start]);
        let mut current = start;
        let mut total_distance = 0.0;

        for step in 1..n {
            let nearest = (0..n)
                .filter(|&j| !visited[j])
                .map(|j| (j, matrix.get(current, j)))
                .filter(|&(_, d)| d.is_finite())
                .min_by(|&(a, da), &(b, db)| da.total_cmp(&db).then(ids[a].cmp(&ids[b])));

            let Some((next, distance)) = nearest else {
                log::debug!(
                    "heuristic: dead end at city={} step={step}",
                    ids[current]
                );
                return Err(Error::CannotCloseTour {
                    last: ids[current],
                    start: ids[start],
                    unvisited: n - step,
                });
            };

            log::trace!(
                "heuristic: step={step} {}->{} distance={distance}",
                ids[current],
                ids[next]
            );
            visited[next] = true;
            path.push(ids[next]);
            total_distance += distance;
            current = next;
        }

        let closing = matrix.get(current, start);
        if !closing.is_finite() {
            return Err(Error::CannotCloseTour {
                last: ids[current],
                start: ids[start],
                unvisited: 0,
            });
        }
        path.push(ids[start]);
        total_distance += closing;

        log::info!("heuristic: complete n={n} total={total_distance:.1}");
        Ok(Tour::new(path, total_distance))
    }
}

/// Builds a snapshot graph from plain lists and runs [`HeuristicSolver`] on it.
pub fn solve_heuristic(cities: &[City], connections: &[Connection]) -> Result<Tour> {
    let graph = CityGraph::from_parts(cities, connections)?;
    HeuristicSolver::new(&graph).solve()
}
