use serde::{Deserialize, Serialize};

/// NSGA-II tunables. Probabilities are in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NsgaConfig {
    pub population_size: usize,
    pub generations: usize,
    pub crossover_prob: f64,
    /// Chance that an offspring is mutated at all.
    pub mutation_prob: f64,
    /// Per-gene swap chance once an offspring is mutated.
    pub swap_gene_prob: f64,
    /// Chance of an additional relocate-one-gene move.
    pub insert_prob: f64,
    /// Share of the initial population drawn by shuffle-and-validate; the
    /// rest comes from the constructive heuristic.
    pub random_init_share: f64,
    pub init_retries: usize,
    /// Fitness worker threads, 0 for one per available core.
    pub workers: usize,
    pub seed: Option<u64>,
    /// Stops after the generation during which the budget ran out.
    pub time_budget_secs: Option<f64>,
}

impl Default for NsgaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 50,
            crossover_prob: 0.8,
            mutation_prob: 0.2,
            swap_gene_prob: 0.3,
            insert_prob: 0.2,
            random_init_share: 0.2,
            init_retries: 100,
            workers: 0,
            seed: None,
            time_budget_secs: None,
        }
    }
}

impl NsgaConfig {
    pub(crate) fn worker_count(&self) -> usize {
        match self.workers {
            0 => std::thread::available_parallelism().map_or(1, |n| n.get()),
            n => n,
        }
    }

    pub(crate) fn check(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err(format!("population_size must be at least 2, got {}", self.population_size));
        }
        let probabilities = [
            ("crossover_prob", self.crossover_prob),
            ("mutation_prob", self.mutation_prob),
            ("swap_gene_prob", self.swap_gene_prob),
            ("insert_prob", self.insert_prob),
            ("random_init_share", self.random_init_share),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(format!("{name} must lie in [0, 1], got {p}"));
            }
        }
        Ok(())
    }
}
