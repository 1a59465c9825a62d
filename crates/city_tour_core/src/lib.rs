//! Traveling-salesperson tours over user-built city graphs.
//! Exact Held-Karp solving for small complete instances, nearest-neighbor
//! tours for anything connected, and a click-driven editing session.

mod algo;
mod cancel;
mod error;
mod graph;
mod io;
pub mod logging;
mod runner;
mod session;
mod tour;

pub use algo::exact::{
    CostMatrix, ExactSolution, ExactSolver, MAX_EXACT_CITIES, solve_exact, solve_exact_tour,
};
pub use algo::heuristic::{HeuristicSolver, solve_heuristic};
pub use algo::validator::GraphValidator;
pub use cancel::CancelToken;
pub use error::{Error, Result};
pub use graph::{City, CityGraph, CityId, Connection, DistanceMatrix, HIT_RADIUS};
pub use io::generate::random_instance;
pub use io::input::{Instance, parse_instance};
pub use io::options::{LogFormat, LogLevel, SolveMode, SolverOptions};
pub use io::output::{write_order, write_solved, write_tour};
pub use runner::{Solved, solve_instance};
pub use session::{Interaction, MIN_TOUR_CITIES, Session};
pub use tour::{Tour, TourMetrics};
