use serde::{Deserialize, Serialize};

use itinerary_core::GraphConfig;
use itinerary_milp::MilpConfig;
use itinerary_nsga::NsgaConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// TSP + MTZ model.
    Exact,
    /// NSGA-II search with a Pareto front.
    Pareto,
    /// Exact up to `auto_exact_max_cities`, Pareto beyond.
    #[default]
    Auto,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub strategy: StrategyKind,
    pub auto_exact_max_cities: usize,
    pub graph: GraphConfig,
    pub milp: MilpConfig,
    pub nsga: NsgaConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Auto,
            auto_exact_max_cities: 12,
            graph: GraphConfig::default(),
            milp: MilpConfig::default(),
            nsga: NsgaConfig::default(),
        }
    }
}
