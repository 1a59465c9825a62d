mod city;
mod city_graph;
mod distance_matrix;

pub use city::{City, CityId, Connection};
pub use city_graph::{CityGraph, HIT_RADIUS};
pub use distance_matrix::DistanceMatrix;
