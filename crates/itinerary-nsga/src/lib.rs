#![deny(clippy::all)]

mod config;
mod evaluate;
pub mod frontier;
pub mod genome;
pub mod init;
pub mod operators;

pub use config::NsgaConfig;
pub use genome::{Decoder, Fitness};

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::time::Instant;
use tracing::{debug, info};

use itinerary_core::{
    CostTimeMatrix, FrontierPoint, SolveOutcome, SolveStatus, Solution, SolverError, TravelRequest, TripRules,
};

use frontier::{crowding_distance, non_dominated_sort};

struct Individual {
    genome: Vec<usize>,
    fitness: Fitness,
    rank: usize,
    crowding: f64,
}

/// NSGA-II over permutation genomes. Each call to [`ParetoSearch::solve`]
/// owns its population and RNG.
#[derive(Clone, Debug, Default)]
pub struct ParetoSearch {
    config: NsgaConfig,
}

impl ParetoSearch {
    pub fn new(config: NsgaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NsgaConfig {
        &self.config
    }

    pub fn solve(&self, matrix: &CostTimeMatrix, request: &TravelRequest) -> Result<SolveOutcome, SolverError> {
        let rules = TripRules::new(request, matrix);
        self.solve_with_rules(matrix, &rules)
    }

    pub fn solve_with_rules(&self, matrix: &CostTimeMatrix, rules: &TripRules) -> Result<SolveOutcome, SolverError> {
        self.config.check().map_err(SolverError::ModelConstruction)?;
        if matrix.len() < 2 || rules.origins().is_empty() {
            return Ok(SolveOutcome::infeasible());
        }

        let seed = self.config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let decoder = Decoder::new(matrix, rules);
        let workers = self.config.worker_count();
        let started = Instant::now();

        let mut population = self.initial_population(&decoder, workers, &mut rng);
        assign_ranks(&mut population);

        let mut generations = 0;
        for generation in 0..self.config.generations {
            let offspring = self.offspring(&population, &mut rng);
            let fitness = evaluate::evaluate_all(&decoder, &offspring, workers);
            population.extend(offspring.into_iter().zip(fitness).map(|(genome, fitness)| Individual {
                genome,
                fitness,
                rank: 0,
                crowding: 0.0,
            }));
            population = survive(population, self.config.population_size);
            generations = generation + 1;

            debug!(
                generation,
                front = population.iter().filter(|ind| ind.rank == 0).count(),
                "generation done"
            );
            if let Some(budget) = self.config.time_budget_secs {
                if started.elapsed().as_secs_f64() >= budget {
                    debug!(generation, budget, "time budget spent");
                    break;
                }
            }
        }

        let frontier = first_front(&decoder, &population);
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let Some(chosen) = select(&frontier, matrix.weight_cost(), matrix.weight_time()) else {
            info!(seed, generations, elapsed_ms, "NSGA-II found no valid walk");
            return Ok(SolveOutcome::infeasible());
        };
        info!(
            seed,
            generations,
            front = frontier.len(),
            cost = chosen.cost,
            duration = chosen.duration,
            elapsed_ms,
            "NSGA-II search finished"
        );

        let walk = chosen.walk.clone();
        Ok(SolveOutcome::found(SolveStatus::Heuristic, Solution::Walk(walk)).with_frontier(frontier))
    }

    fn initial_population(&self, decoder: &Decoder<'_>, workers: usize, rng: &mut Xoshiro256PlusPlus) -> Vec<Individual> {
        let size = self.config.population_size;
        let random = (size as f64 * self.config.random_init_share).round() as usize;

        let genomes: Vec<Vec<usize>> = (0..size)
            .map(|i| {
                if i < size - random {
                    init::construct(decoder, rng)
                } else {
                    init::random_valid(decoder, self.config.init_retries, rng)
                }
            })
            .collect();
        let fitness = evaluate::evaluate_all(decoder, &genomes, workers);

        genomes
            .into_iter()
            .zip(fitness)
            .map(|(genome, fitness)| Individual {
                genome,
                fitness,
                rank: 0,
                crowding: 0.0,
            })
            .collect()
    }

    fn offspring(&self, population: &[Individual], rng: &mut Xoshiro256PlusPlus) -> Vec<Vec<usize>> {
        let mut children = Vec::with_capacity(population.len());
        while children.len() < population.len() {
            let first = tournament(population, rng);
            let second = tournament(population, rng);

            let (mut a, mut b) = if rng.gen_bool(self.config.crossover_prob) {
                (
                    operators::order_crossover(&first.genome, &second.genome, rng),
                    operators::order_crossover(&second.genome, &first.genome, rng),
                )
            } else {
                (first.genome.clone(), second.genome.clone())
            };
            self.mutate(&mut a, rng);
            self.mutate(&mut b, rng);

            children.push(a);
            if children.len() < population.len() {
                children.push(b);
            }
        }
        children
    }

    fn mutate(&self, genome: &mut Vec<usize>, rng: &mut Xoshiro256PlusPlus) {
        if !rng.gen_bool(self.config.mutation_prob) {
            return;
        }
        operators::swap_mutation(genome, self.config.swap_gene_prob, rng);
        if rng.gen_bool(self.config.insert_prob) {
            operators::insert_mutation(genome, rng);
        }
    }
}

/// Binary tournament on rank, then crowding.
fn tournament<'p, R: Rng>(population: &'p [Individual], rng: &mut R) -> &'p Individual {
    let a = &population[rng.gen_range(0..population.len())];
    let b = &population[rng.gen_range(0..population.len())];
    if a.rank != b.rank {
        return if a.rank < b.rank { a } else { b };
    }
    if b.crowding > a.crowding {
        b
    } else {
        a
    }
}

fn assign_ranks(population: &mut [Individual]) {
    let points: Vec<Fitness> = population.iter().map(|ind| ind.fitness).collect();
    for (rank, front) in non_dominated_sort(&points).into_iter().enumerate() {
        let distance = crowding_distance(&points, &front);
        for (&i, d) in front.iter().zip(distance) {
            population[i].rank = rank;
            population[i].crowding = d;
        }
    }
}

/// (mu + lambda) survival: whole fronts while they fit, then the most
/// spread-out members of the front that overflows.
fn survive(mut pool: Vec<Individual>, size: usize) -> Vec<Individual> {
    assign_ranks(&mut pool);
    pool.sort_by(|a, b| a.rank.cmp(&b.rank).then(b.crowding.total_cmp(&a.crowding)));
    pool.truncate(size);
    pool
}

/// Distinct valid walks of the best front, cheapest first.
fn first_front(decoder: &Decoder<'_>, population: &[Individual]) -> Vec<FrontierPoint> {
    let mut points: Vec<FrontierPoint> = Vec::new();
    for ind in population.iter().filter(|ind| ind.rank == 0 && !ind.fitness.is_penalty()) {
        let Some(walk) = decoder.walk(&ind.genome) else {
            continue;
        };
        if points.iter().any(|p| p.walk == walk) {
            continue;
        }
        points.push(FrontierPoint {
            walk,
            cost: ind.fitness.cost,
            duration: ind.fitness.duration,
        });
    }
    points.sort_by(|a, b| a.cost.total_cmp(&b.cost).then(a.duration.total_cmp(&b.duration)));
    points
}

/// Cheapest point when money weighs more than time, otherwise the fastest.
/// Ties go to the other objective.
pub fn select(front: &[FrontierPoint], weight_cost: f64, weight_time: f64) -> Option<&FrontierPoint> {
    if weight_cost > weight_time {
        front
            .iter()
            .min_by(|a, b| a.cost.total_cmp(&b.cost).then(a.duration.total_cmp(&b.duration)))
    } else {
        front
            .iter()
            .min_by(|a, b| a.duration.total_cmp(&b.duration).then(a.cost.total_cmp(&b.cost)))
    }
}
