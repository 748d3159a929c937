use std::fmt;

use pathviz_core::Point;

/// Which end of the search an error refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Finish,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Finish => f.write_str("finish"),
        }
    }
}

/// Why an endpoint was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndpointProblem {
    OutOfBounds,
    Blocked,
    /// Start and finish are the same cell.
    Coincident,
}

/// Errors raised when creating a search run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchError {
    InvalidEndpoint {
        endpoint: Endpoint,
        point: Point,
        problem: EndpointProblem,
    },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEndpoint {
                endpoint,
                point,
                problem,
            } => {
                let why = match problem {
                    EndpointProblem::OutOfBounds => "outside the grid",
                    EndpointProblem::Blocked => "on a blocked cell",
                    EndpointProblem::Coincident => "the same cell as the other endpoint",
                };
                write!(f, "invalid {endpoint} {point}: {why}")
            }
        }
    }
}

impl std::error::Error for SearchError {}
