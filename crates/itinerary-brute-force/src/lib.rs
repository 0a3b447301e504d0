#![deny(clippy::all)]

//! Exhaustive search over simple walks. Exponential, only meant for the
//! small instances used to check the other solvers.

use itinerary_core::{CostTimeMatrix, SolveOutcome, SolveStatus, Solution, SolverError, Topology, TripRules};

/// Largest instance the enumerator accepts.
pub const MAX_CITIES: usize = 12;

#[derive(Clone, Debug, PartialEq)]
pub struct BestWalk {
    pub walk: Vec<usize>,
    pub objective: f64,
}

struct Search<'a> {
    matrix: &'a CostTimeMatrix,
    rules: &'a TripRules,
    required_mask: u32,
    start: usize,
    path: Vec<usize>,
    best: Option<BestWalk>,
}

impl Search<'_> {
    fn bound(&self) -> f64 {
        self.best.as_ref().map_or(f64::INFINITY, |b| b.objective)
    }

    fn offer(&mut self, objective: f64, closing: Option<usize>) {
        if objective >= self.bound() {
            return;
        }
        let mut walk = self.path.clone();
        walk.extend(closing);
        self.best = Some(BestWalk { walk, objective });
    }

    fn dfs(&mut self, current: usize, visited: u32, objective: f64) {
        // Every hop adds a non-negative amount
        if objective >= self.bound() {
            return;
        }

        let covered = visited & self.required_mask == self.required_mask;
        if covered && self.path.len() >= 2 {
            match self.rules.topology {
                Topology::OpenJaw if self.rules.is_end(current) => {
                    self.offer(objective, None);
                    return;
                }
                Topology::RoundTrip if self.matrix.is_reachable(current, self.start) => {
                    // home again, no stay to pay
                    let closing = self.matrix.score(
                        self.matrix.cost(current, self.start),
                        self.matrix.time(current, self.start),
                    );
                    self.offer(objective + closing, Some(self.start));
                }
                _ => {}
            }
        }

        for next in 0..self.matrix.len() {
            let bit = 1u32 << next;
            if visited & bit != 0 || !self.matrix.is_reachable(current, next) {
                continue;
            }
            self.path.push(next);
            self.dfs(next, visited | bit, objective + self.matrix.edge_objective(current, next));
            self.path.pop();
        }
    }
}

/// Cheapest admissible walk by scalar objective, `None` if no walk exists.
pub fn best_walk(matrix: &CostTimeMatrix, rules: &TripRules) -> Result<Option<BestWalk>, SolverError> {
    let n = matrix.len();
    if n > MAX_CITIES {
        return Err(SolverError::TooManyCities {
            cities: n,
            limit: MAX_CITIES,
        });
    }
    let required_mask = rules.required().iter().fold(0u32, |mask, &c| mask | (1 << c));

    let mut best: Option<BestWalk> = None;
    for start in rules.origins() {
        let mut search = Search {
            matrix,
            rules,
            required_mask,
            start,
            path: vec![start],
            best: best.take(),
        };
        search.dfs(start, 1 << start, 0.0);
        best = search.best;
    }
    Ok(best)
}

pub fn solve(matrix: &CostTimeMatrix, rules: &TripRules) -> Result<SolveOutcome, SolverError> {
    Ok(match best_walk(matrix, rules)? {
        Some(best) => SolveOutcome::found(SolveStatus::Optimal, Solution::Walk(best.walk)),
        None => SolveOutcome::infeasible(),
    })
}
