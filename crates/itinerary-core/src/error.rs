use thiserror::Error;

/// A request whose values cannot describe any trip.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("no origin city given")]
    NoOriginCities,
    #[error("an open-jaw trip needs at least one destination city")]
    NoDestinationCities,
    #[error("a round trip needs at least one city to visit besides the origin")]
    NothingToVisit,
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
}

impl RequestError {
    /// Well-formed requests that simply admit no tour. These are reported as
    /// infeasible rather than as errors.
    pub fn is_unsatisfiable(&self) -> bool {
        !matches!(self, RequestError::InvalidWeight { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("model construction failed: {0}")]
    ModelConstruction(String),
    #[error("solver backend failed: {0}")]
    Backend(String),
    #[error("{cities} cities exceed the exact solver limit of {limit}")]
    TooManyCities { cities: usize, limit: usize },
}

/// The reconstruction walk ran past its step bound without reaching the end
/// city. Always a bug in the solution handed over.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("tour reconstruction stopped after {steps} steps (limit {limit}) without reaching the end city")]
pub struct DegenerateTour {
    pub steps: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error(transparent)]
    Degenerate(#[from] DegenerateTour),
}
