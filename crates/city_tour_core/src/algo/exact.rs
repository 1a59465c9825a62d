//! Held-Karp bitmask dynamic programming over a complete cost matrix.
//!
//! State `(pos, mask)` holds the cheapest way to finish the cycle from `pos`
//! once the cities in `mask` have been visited. Every reachable mask contains
//! city 0, so the table is indexed by `mask >> 1` and holds `n * 2^(n-1)`
//! entries.

use crate::{CancelToken, CityGraph, CityId, DistanceMatrix, Error, Result, Tour};

/// Largest instance the exact solver accepts.
pub const MAX_EXACT_CITIES: usize = 20;
const MIN_EXACT_CITIES: usize = 2;
const CANCEL_CHECK_INTERVAL: usize = 1 << 10;
const NO_NEXT: u8 = u8::MAX;

/// Validated square cost matrix. Off-diagonal entries are finite; the
/// diagonal is never read.
#[derive(Clone, Debug, PartialEq)]
pub struct CostMatrix {
    n: usize,
    weights: Vec<f64>,
}

impl CostMatrix {
    pub fn new(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.len();
        if n < MIN_EXACT_CITIES {
            return Err(Error::validation(format!(
                "cost matrix needs at least {MIN_EXACT_CITIES} cities, got {n}"
            )));
        }

        let mut weights = Vec::with_capacity(n * n);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(Error::validation(format!(
                    "cost matrix row {i} has {} entries, expected {n}",
                    row.len()
                )));
            }
            if let Some((j, w)) = row
                .iter()
                .enumerate()
                .find(|&(j, w)| j != i && !w.is_finite())
            {
                return Err(Error::validation(format!(
                    "cost[{i}][{j}] must be finite, got {w}"
                )));
            }
            weights.extend_from_slice(row);
        }

        Ok(Self { n, weights })
    }

    /// Cost matrix of a graph snapshot; every city pair must be connected.
    pub fn from_distance_matrix(matrix: &DistanceMatrix) -> Result<Self> {
        if let Some((i, j)) = matrix.first_missing_edge() {
            let ids = matrix.ids();
            return Err(Error::validation(format!(
                "exact solver requires a complete graph; cities {} and {} are not connected",
                ids[i], ids[j]
            )));
        }
        Self::new(&matrix.rows())
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.weights[i * self.n + j]
    }
}

/// Optimal cycle found by [`ExactSolver`]. `order` holds matrix indices,
/// starts and ends at 0.
#[derive(Clone, Debug, PartialEq)]
pub struct ExactSolution {
    pub cost: f64,
    pub order: Vec<usize>,
}

impl ExactSolution {
    /// Maps matrix indices to city ids (`ids[i]` names row `i`).
    pub fn to_tour(&self, ids: &[CityId]) -> Tour {
        Tour::new(
            self.order.iter().map(|&idx| ids[idx]).collect(),
            self.cost,
        )
    }
}

pub struct ExactSolver<'a> {
    cost: &'a CostMatrix,
    cancel: CancelToken,
}

impl<'a> ExactSolver<'a> {
    pub fn new(cost: &'a CostMatrix) -> Self {
        Self {
            cost,
            cancel: CancelToken::default(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    #[city_tour_derive::timer("exact")]
    pub fn solve(&self) -> Result<ExactSolution> {
        let n = self.cost.len();
        if n > MAX_EXACT_CITIES {
            return Err(Error::StateSpaceTooLarge {
                cities: n,
                max: MAX_EXACT_CITIES,
            });
        }

        log::info!("exact: start n={n} states={}", n << (n - 1));
        let table = HeldKarpTable::build(self.cost, &self.cancel)?;
        let solution = table.solution()?;
        log::info!(
            "exact: complete n={n} cost={:.1} order={:?}",
            solution.cost,
            solution.order
        );
        Ok(solution)
    }
}

struct HeldKarpTable {
    n: usize,
    full: usize,
    best: Vec<f64>,
    next: Vec<u8>,
}

impl HeldKarpTable {
    fn build(cost: &CostMatrix, cancel: &CancelToken) -> Result<Self> {
        let n = cost.len();
        let full = (1usize << n) - 1;
        let states = n << (n - 1);
        let mut table = Self {
            n,
            full,
            best: vec![f64::INFINITY; states],
            next: vec![NO_NEXT; states],
        };

        // Supersets of a mask are numerically larger, so walking odd masks
        // downward fills every successor state before it is read.
        for (step, mask) in (1..=full).rev().step_by(2).enumerate() {
            if step % CANCEL_CHECK_INTERVAL == 0 {
                cancel.check()?;
            }

            for pos in 0..n {
                if mask & (1 << pos) == 0 || (pos == 0 && mask != 1) {
                    continue;
                }
                let slot = table.slot(mask, pos);

                if mask == full {
                    table.best[slot] = cost.get(pos, 0);
                    continue;
                }

                let mut best = f64::INFINITY;
                let mut next = NO_NEXT;
                for city in (0..n).filter(|&c| mask & (1 << c) == 0) {
                    let candidate =
                        cost.get(pos, city) + table.best[table.slot(mask | (1 << city), city)];
                    if candidate < best {
                        best = candidate;
                        next = city as u8;
                    }
                }
                table.best[slot] = best;
                table.next[slot] = next;
            }
        }

        Ok(table)
    }

    #[inline]
    fn slot(&self, mask: usize, pos: usize) -> usize {
        (mask >> 1) * self.n + pos
    }

    fn solution(&self) -> Result<ExactSolution> {
        let mut order = Vec::with_capacity(self.n + 1);
        order.push(0);

        let (mut mask, mut pos) = (1usize, 0usize);
        while mask != self.full {
            let next = self.next[self.slot(mask, pos)];
            if next == NO_NEXT {
                return Err(Error::validation(
                    "cost matrix sums overflow; no finite cycle exists",
                ));
            }
            pos = next as usize;
            mask |= 1 << pos;
            order.push(pos);
        }
        order.push(0);

        Ok(ExactSolution {
            cost: self.best[self.slot(1, 0)],
            order,
        })
    }
}

/// Minimum Hamiltonian cycle cost starting and ending at city 0.
pub fn solve_exact(cost: &[Vec<f64>]) -> Result<f64> {
    let matrix = CostMatrix::new(cost)?;
    ExactSolver::new(&matrix).solve().map(|s| s.cost)
}

/// Optimal tour over a complete graph, starting at its first city.
pub fn solve_exact_tour(graph: &CityGraph, cancel: CancelToken) -> Result<Tour> {
    let distances = graph.distance_matrix();
    let matrix = CostMatrix::from_distance_matrix(&distances)?;
    let solution = ExactSolver::new(&matrix).with_cancel(cancel).solve()?;
    Ok(solution.to_tour(distances.ids()))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::{CostMatrix, ExactSolver, MAX_EXACT_CITIES, solve_exact, solve_exact_tour};
    use crate::{CancelToken, City, CityGraph, Connection, Error};

    fn sample() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 10.0, 15.0, 20.0],
            vec![10.0, 0.0, 35.0, 25.0],
            vec![15.0, 35.0, 0.0, 30.0],
            vec![20.0, 25.0, 30.0, 0.0],
        ]
    }

    fn random_matrix(rng: &mut StdRng, n: usize, symmetric: bool) -> Vec<Vec<f64>> {
        let mut rows = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                if i == j || (symmetric && j < i) {
                    continue;
                }
                let w = rng.random_range(1..100) as f64;
                rows[i][j] = w;
                if symmetric {
                    rows[j][i] = w;
                }
            }
        }
        rows
    }

    fn brute_force(cost: &[Vec<f64>]) -> f64 {
        fn walk(cost: &[Vec<f64>], pos: usize, visited: &mut [bool], depth: usize) -> f64 {
            if depth == cost.len() {
                return cost[pos][0];
            }
            let mut best = f64::INFINITY;
            for next in 1..cost.len() {
                if visited[next] {
                    continue;
                }
                visited[next] = true;
                best = best.min(cost[pos][next] + walk(cost, next, visited, depth + 1));
                visited[next] = false;
            }
            best
        }

        let mut visited = vec![false; cost.len()];
        visited[0] = true;
        walk(cost, 0, &mut visited, 1)
    }

    fn order_cost(cost: &[Vec<f64>], order: &[usize]) -> f64 {
        order.windows(2).map(|w| cost[w[0]][w[1]]).sum()
    }

    #[test]
    fn four_city_sample_costs_80() {
        assert_eq!(solve_exact(&sample()).expect("solve"), 80.0);
    }

    #[test]
    fn reconstructed_order_is_a_cycle_with_the_optimal_cost() {
        let rows = sample();
        let matrix = CostMatrix::new(&rows).expect("matrix");
        let solution = ExactSolver::new(&matrix).solve().expect("solve");

        assert_eq!(solution.order.len(), 5);
        assert_eq!(solution.order.first(), Some(&0));
        assert_eq!(solution.order.last(), Some(&0));
        let mut inner = solution.order[1..4].to_vec();
        inner.sort_unstable();
        assert_eq!(inner, vec![1, 2, 3]);
        assert_eq!(order_cost(&rows, &solution.order), solution.cost);
    }

    #[test]
    fn matches_brute_force_on_random_complete_graphs() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 2..=8 {
            for round in 0..6 {
                let rows = random_matrix(&mut rng, n, round % 2 == 0);
                let exact = solve_exact(&rows).expect("solve");
                let expected = brute_force(&rows);
                assert_eq!(exact, expected, "n={n} round={round} rows={rows:?}");
            }
        }
    }

    #[test]
    fn repeated_solves_are_identical() {
        let mut rng = StdRng::seed_from_u64(99);
        let rows = random_matrix(&mut rng, 9, true);
        let matrix = CostMatrix::new(&rows).expect("matrix");
        let first = ExactSolver::new(&matrix).solve().expect("first");
        let second = ExactSolver::new(&matrix).solve().expect("second");
        assert_eq!(first, second);
        assert_eq!(first.cost.to_bits(), second.cost.to_bits());
    }

    #[test]
    fn two_cities_go_there_and_back() {
        let rows = vec![vec![0.0, 4.0], vec![6.0, 0.0]];
        assert_eq!(solve_exact(&rows).expect("solve"), 10.0);
    }

    #[test]
    fn degenerate_matrices_are_validation_errors() {
        let empty: Vec<Vec<f64>> = Vec::new();
        assert!(matches!(solve_exact(&empty), Err(Error::Validation(_))));
        assert!(matches!(
            solve_exact(&[vec![0.0]]),
            Err(Error::Validation(_))
        ));

        let ragged = vec![vec![0.0, 1.0, 2.0], vec![1.0, 0.0], vec![2.0, 1.0, 0.0]];
        let err = solve_exact(&ragged).expect_err("ragged");
        assert!(err.to_string().contains("row 1 has 2 entries, expected 3"));

        let missing = vec![vec![0.0, f64::INFINITY], vec![1.0, 0.0]];
        let err = solve_exact(&missing).expect_err("infinite cost");
        assert!(err.to_string().contains("cost[0][1] must be finite"));
    }

    #[test]
    fn diagonal_values_are_ignored() {
        let mut rows = sample();
        for (i, row) in rows.iter_mut().enumerate() {
            row[i] = f64::NAN;
        }
        assert_eq!(solve_exact(&rows).expect("solve"), 80.0);
    }

    #[test]
    fn oversized_instances_are_rejected_before_allocating() {
        let n = MAX_EXACT_CITIES + 1;
        let rows = vec![vec![1.0; n]; n];
        match solve_exact(&rows).expect_err("too large") {
            Error::StateSpaceTooLarge { cities, max } => {
                assert_eq!(cities, n);
                assert_eq!(max, MAX_EXACT_CITIES);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn cancelled_token_aborts_the_search() {
        let matrix = CostMatrix::new(&sample()).expect("matrix");
        let token = CancelToken::new();
        token.cancel();
        let err = ExactSolver::new(&matrix)
            .with_cancel(token)
            .solve()
            .expect_err("cancelled");
        assert!(matches!(err, Error::Cancelled(_)));
    }

    #[test]
    fn deadline_expiring_mid_search_aborts() {
        let mut rng = StdRng::seed_from_u64(18);
        let matrix = CostMatrix::new(&random_matrix(&mut rng, 18, true)).expect("matrix");
        let token = CancelToken::new().with_time_limit(Duration::from_millis(1));
        let err = ExactSolver::new(&matrix)
            .with_cancel(token)
            .solve()
            .expect_err("deadline");
        assert!(matches!(err, Error::Cancelled(ref msg) if msg.contains("deadline exceeded")));
    }

    #[test]
    fn graph_tour_uses_city_ids_and_requires_completeness() {
        let cities: Vec<City> = [4, 8, 15, 16]
            .iter()
            .map(|&id| City::new(id, format!("C{id}"), 0.0, 0.0))
            .collect();
        let ids = [4, 8, 15, 16];
        let rows = sample();
        let mut connections = Vec::new();
        for i in 0..4 {
            for j in (i + 1)..4 {
                connections.push(Connection::new(ids[i], ids[j], rows[i][j]));
            }
        }
        let mut graph = CityGraph::from_parts(&cities, &connections).expect("graph");

        let tour = solve_exact_tour(&graph, CancelToken::default()).expect("tour");
        assert_eq!(tour.total_distance, 80.0);
        assert_eq!(tour.start(), Some(4));
        tour.verify(&graph).expect("valid tour");

        graph.disconnect(8, 15);
        let err = solve_exact_tour(&graph, CancelToken::default()).expect_err("incomplete");
        assert!(err.to_string().contains("cities 8 and 15 are not connected"));
    }
}
