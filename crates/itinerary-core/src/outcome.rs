/// How a solver ended, before reconstruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveStatus {
    /// Proven optimal.
    Optimal,
    /// Best incumbent when the wall-clock cap hit.
    TimeLimited,
    /// Best answer of a heuristic search.
    Heuristic,
    Infeasible,
}

/// Raw solver answer, decoded by the reconstructor.
#[derive(Clone, Debug, PartialEq)]
pub enum Solution {
    /// Selected edges as a successor per city, with the chosen endpoints.
    Successors {
        next: Vec<Option<usize>>,
        start: usize,
        end: usize,
    },
    /// Explicit walk `[start, ..., end]`.
    Walk(Vec<usize>),
}

/// One non-dominated trade-off point of a multi-objective search.
#[derive(Clone, Debug, PartialEq)]
pub struct FrontierPoint {
    pub walk: Vec<usize>,
    pub cost: f64,
    pub duration: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub solution: Option<Solution>,
    pub frontier: Vec<FrontierPoint>,
}

impl SolveOutcome {
    pub fn infeasible() -> Self {
        Self {
            status: SolveStatus::Infeasible,
            solution: None,
            frontier: Vec::new(),
        }
    }

    pub fn found(status: SolveStatus, solution: Solution) -> Self {
        Self {
            status,
            solution: Some(solution),
            frontier: Vec::new(),
        }
    }

    pub fn with_frontier(mut self, frontier: Vec<FrontierPoint>) -> Self {
        self.frontier = frontier;
        self
    }
}
