use crate::{
    CancelToken, CityGraph, Error, ExactSolution, ExactSolver, HeuristicSolver, Instance, Result,
    SolverOptions, Tour, algo::exact::solve_exact_tour, io::options::SolveMode,
};

/// What a run produced: a city tour, or a bare index order for matrix input.
#[derive(Clone, Debug)]
pub enum Solved<'a> {
    GraphTour { graph: &'a CityGraph, tour: Tour },
    MatrixOrder(ExactSolution),
}

impl Solved<'_> {
    pub fn total(&self) -> f64 {
        match self {
            Self::GraphTour { tour, .. } => tour.total_distance,
            Self::MatrixOrder(solution) => solution.cost,
        }
    }
}

/// Dispatches `instance` to the solver(s) selected by `options.mode`.
///
/// `cancel` aborts the exact solver; `--exact-time-limit` is layered on top
/// of it as a deadline.
pub fn solve_instance<'a>(
    instance: &'a Instance,
    options: &SolverOptions,
    cancel: CancelToken,
) -> Result<Solved<'a>> {
    let cancel = match options.exact_time_limit() {
        Some(limit) => cancel.with_time_limit(limit),
        None => cancel,
    };
    match (instance, options.mode) {
        (Instance::Graph(graph), SolveMode::Heuristic) => {
            let tour = HeuristicSolver::new(graph).solve()?;
            Ok(graph_tour(graph, tour))
        }
        (Instance::Graph(graph), SolveMode::Exact) => {
            let tour = solve_exact_tour(graph, cancel)?;
            Ok(graph_tour(graph, tour))
        }
        (Instance::Graph(graph), SolveMode::Compare) => {
            let tour = compare(graph, cancel)?;
            Ok(graph_tour(graph, tour))
        }
        (Instance::Matrix(matrix), SolveMode::Exact) => {
            let solution = ExactSolver::new(matrix)
                .with_cancel(cancel)
                .solve()?;
            Ok(Solved::MatrixOrder(solution))
        }
        (Instance::Matrix(_), mode) => Err(Error::invalid_input(format!(
            "--mode {mode} needs a city graph; cost matrix input only supports --mode exact"
        ))),
    }
}

fn graph_tour(graph: &CityGraph, tour: Tour) -> Solved<'_> {
    tour.tour_metrics(graph);
    Solved::GraphTour { graph, tour }
}

/// Runs both solvers on the same snapshot in parallel and keeps the better
/// tour. A failure on one side is logged and the other side's tour is used.
fn compare(graph: &CityGraph, cancel: CancelToken) -> Result<Tour> {
    let (heuristic, exact) = rayon::join(
        || HeuristicSolver::new(graph).solve(),
        || solve_exact_tour(graph, cancel),
    );

    match (heuristic, exact) {
        (Ok(approx), Ok(optimal)) => {
            let gap = if optimal.total_distance > 0.0 {
                (approx.total_distance - optimal.total_distance) / optimal.total_distance * 100.0
            } else {
                0.0
            };
            log::info!(
                "compare: heuristic={:.1} exact={:.1} gap={gap:.2}%",
                approx.total_distance,
                optimal.total_distance
            );
            Ok(optimal)
        }
        (Ok(approx), Err(err)) => {
            log::warn!("compare: exact solver failed, keeping heuristic tour err={err}");
            Ok(approx)
        }
        (Err(err), Ok(optimal)) => {
            log::warn!("compare: heuristic failed, keeping exact tour err={err}");
            Ok(optimal)
        }
        (Err(heuristic_err), Err(exact_err)) => {
            log::warn!("compare: exact solver failed too err={exact_err}");
            Err(heuristic_err)
        }
    }
}
