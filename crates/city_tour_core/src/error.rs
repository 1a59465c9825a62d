use thiserror::Error as ThisError;

use crate::CityId;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unknown city id {0}")]
    UnknownCity(CityId),
    #[error("graph is disconnected: cities {unreachable:?} are unreachable from the start city")]
    DisconnectedGraph { unreachable: Vec<CityId> },
    #[error("cannot close tour: {}", close_reason(.last, .start, .unvisited))]
    CannotCloseTour {
        last: CityId,
        start: CityId,
        unvisited: usize,
    },
    #[error("state space too large: {cities} cities exceeds the exact solver limit of {max}")]
    StateSpaceTooLarge { cities: usize, max: usize },
    #[error("solve cancelled: {0}")]
    Cancelled(String),
    #[error("{0}")]
    Other(String),
}

fn close_reason(last: &CityId, start: &CityId, unvisited: &usize) -> String {
    if *unvisited == 0 {
        format!("no connection from city {last} back to start city {start}")
    } else {
        format!("walk from start city {start} is stuck at city {last} with {unvisited} cities unvisited")
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
