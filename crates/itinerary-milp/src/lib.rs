#![deny(clippy::all)]

mod config;
mod model;

pub use config::MilpConfig;

use highs::{HighsModelStatus, Sense};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use itinerary_core::{
    CostTimeMatrix, SolveOutcome, SolveStatus, Solution, SolverError, Tour, TravelRequest, TripRules,
};

/// Exact solver for the constrained path. Proves optimality or, when the
/// time cap hits first, hands back a validated incumbent.
#[derive(Clone, Debug, Default)]
pub struct ConstraintSolver {
    config: MilpConfig,
}

impl ConstraintSolver {
    pub fn new(config: MilpConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MilpConfig {
        &self.config
    }

    pub fn solve(&self, matrix: &CostTimeMatrix, request: &TravelRequest) -> Result<SolveOutcome, SolverError> {
        let rules = TripRules::new(request, matrix);
        self.solve_with_rules(matrix, &rules)
    }

    pub fn solve_with_rules(&self, matrix: &CostTimeMatrix, rules: &TripRules) -> Result<SolveOutcome, SolverError> {
        let n = matrix.len();
        if n > self.config.max_cities {
            return Err(SolverError::TooManyCities {
                cities: n,
                limit: self.config.max_cities,
            });
        }
        if !self.config.time_limit_secs.is_finite() || self.config.time_limit_secs <= 0.0 {
            return Err(SolverError::ModelConstruction(format!(
                "time limit must be positive, got {}",
                self.config.time_limit_secs
            )));
        }
        if rules.origins().is_empty() || rules.ends().is_empty() || matrix.reachable_pairs().next().is_none() {
            debug!("no admissible start, end or arc, skipping the model");
            return Ok(SolveOutcome::infeasible());
        }

        let (problem, layout) = model::build(matrix, rules);
        debug!(cities = n, arcs = layout.arcs.len(), columns = layout.columns(), "built TSP/MTZ model");

        let started = Instant::now();
        let mut mip = problem.optimise(Sense::Minimise);
        mip.set_option("output_flag", false);
        mip.set_option("time_limit", self.config.time_limit_secs);
        mip.set_option("mip_rel_gap", self.config.mip_rel_gap);

        let solved = mip.try_solve().map_err(|status| {
            error!(?status, "HiGHS run failed");
            SolverError::Backend(format!("HiGHS run failed with {status:?}"))
        })?;
        let status = solved.status();
        let solution = solved.get_solution();
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let outcome = match status {
            HighsModelStatus::Optimal => match layout.decode(solution.columns()) {
                Some(decoded) => SolveOutcome::found(SolveStatus::Optimal, decoded),
                None => {
                    return Err(SolverError::Backend(
                        "optimal status without a readable solution".to_string(),
                    ))
                }
            },
            HighsModelStatus::ReachedTimeLimit | HighsModelStatus::ReachedIterationLimit => {
                let incumbent = layout
                    .decode(solution.columns())
                    .filter(|decoded| admissible(decoded, matrix, rules));
                warn!(
                    time_limit_secs = self.config.time_limit_secs,
                    incumbent = incumbent.is_some(),
                    "MILP stopped at its limit"
                );
                match incumbent {
                    Some(decoded) => SolveOutcome::found(SolveStatus::TimeLimited, decoded),
                    None => SolveOutcome::infeasible(),
                }
            }
            HighsModelStatus::Infeasible | HighsModelStatus::UnboundedOrInfeasible => SolveOutcome::infeasible(),
            other => {
                error!(status = ?other, "unexpected HiGHS model status");
                return Err(SolverError::Backend(format!("unexpected model status {other:?}")));
            }
        };

        info!(status = ?outcome.status, elapsed_ms, "MILP solve finished");
        Ok(outcome)
    }
}

/// Follows successors from the start, bounded by the city count, and checks
/// the resulting walk against the trip rules.
fn admissible(solution: &Solution, matrix: &CostTimeMatrix, rules: &TripRules) -> bool {
    let Solution::Successors { next, start, end } = solution else {
        return false;
    };
    let mut walk = vec![*start];
    let mut current = *start;
    for _ in 0..next.len() {
        match next[current] {
            Some(hop) => {
                walk.push(hop);
                current = hop;
                if current == *end {
                    return Tour::new(walk, rules, matrix).is_some();
                }
            }
            None => return false,
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use itinerary_core::{Gazetteer, GraphBuilder, GraphConfig, Offer};

    fn matrix(request: &TravelRequest, offers: &[Offer]) -> CostTimeMatrix {
        let config = GraphConfig {
            synthesize_ground_edges: false,
            ..GraphConfig::default()
        };
        GraphBuilder::new(&config, &Gazetteer::new()).build(offers, request, &[])
    }

    #[test]
    fn incumbent_check_rejects_subtours() {
        let request = TravelRequest::new(&["A"], &["D"]).with_mandatory(&["C"]);
        let offers = vec![
            Offer::new("A", "D", 1.0, 1),
            Offer::new("B", "C", 1.0, 1),
            Offer::new("C", "B", 1.0, 1),
        ];
        let matrix = matrix(&request, &offers);
        let rules = TripRules::new(&request, &matrix);
        let (a, b, c, d) = (0, 1, 2, 3);

        let mut next = vec![None; 4];
        next[a] = Some(d);
        next[b] = Some(c);
        next[c] = Some(b);
        let split = Solution::Successors { next, start: a, end: d };
        assert!(!admissible(&split, &matrix, &rules));
    }

    #[test]
    fn refuses_oversized_models() {
        let request = TravelRequest::new(&["A"], &["C"]);
        let offers = vec![Offer::new("A", "B", 1.0, 1), Offer::new("B", "C", 1.0, 1)];
        let matrix = matrix(&request, &offers);
        let solver = ConstraintSolver::new(MilpConfig {
            max_cities: 2,
            ..MilpConfig::default()
        });
        assert_eq!(
            solver.solve(&matrix, &request),
            Err(SolverError::TooManyCities { cities: 3, limit: 2 })
        );
    }

    #[test]
    fn no_arcs_is_infeasible_without_a_model() {
        let request = TravelRequest::new(&["A"], &["B"]);
        let matrix = matrix(&request, &[]);
        let outcome = ConstraintSolver::default().solve(&matrix, &request).unwrap();
        assert_eq!(outcome.status, SolveStatus::Infeasible);
    }
}
