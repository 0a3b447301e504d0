use itinerary_core::{CostTimeMatrix, SolveOutcome, SolverError, TravelRequest};
use itinerary_milp::ConstraintSolver;
use itinerary_nsga::ParetoSearch;

use crate::config::{PlannerConfig, StrategyKind};

/// The two interchangeable ways of solving one request.
#[derive(Clone, Debug)]
pub enum Strategy {
    Exact(ConstraintSolver),
    Pareto(ParetoSearch),
}

impl Strategy {
    /// Resolves `Auto` by instance size.
    pub fn for_instance(config: &PlannerConfig, cities: usize) -> Self {
        let exact = match config.strategy {
            StrategyKind::Exact => true,
            StrategyKind::Pareto => false,
            StrategyKind::Auto => cities <= config.auto_exact_max_cities,
        };
        if exact {
            Strategy::Exact(ConstraintSolver::new(config.milp.clone()))
        } else {
            Strategy::Pareto(ParetoSearch::new(config.nsga.clone()))
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Exact(_) => "exact",
            Strategy::Pareto(_) => "pareto",
        }
    }

    pub fn solve(&self, matrix: &CostTimeMatrix, request: &TravelRequest) -> Result<SolveOutcome, SolverError> {
        match self {
            Strategy::Exact(solver) => solver.solve(matrix, request),
            Strategy::Pareto(search) => search.solve(matrix, request),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_switches_on_city_count() {
        let config = PlannerConfig::default();
        assert_eq!(Strategy::for_instance(&config, 12).name(), "exact");
        assert_eq!(Strategy::for_instance(&config, 13).name(), "pareto");

        let forced = PlannerConfig {
            strategy: StrategyKind::Exact,
            ..PlannerConfig::default()
        };
        assert_eq!(Strategy::for_instance(&forced, 30).name(), "exact");
    }
}
