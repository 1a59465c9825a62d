pub mod exact;
pub mod heuristic;
pub mod validator;
