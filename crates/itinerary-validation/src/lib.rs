#![deny(clippy::all)]

//! Random small instances solved twice, once by the MILP and once by
//! exhaustive search, so the round-trip MTZ relaxation can be checked
//! against ground truth.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::fmt;

use itinerary_core::{
    CostTimeMatrix, Gazetteer, GraphBuilder, GraphConfig, HotelRate, Offer, SolveStatus, SolverError, Topology,
    TourReconstructor, TravelRequest, TripRules,
};
use itinerary_milp::{ConstraintSolver, MilpConfig};

pub const MIN_CITIES: usize = 3;
pub const MAX_CITIES: usize = 7;

/// Relative tolerance when comparing the two objectives.
const TOLERANCE: f64 = 1e-6;

#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    pub seed: u64,
    pub request: TravelRequest,
    pub offers: Vec<Offer>,
    pub hotels: Vec<HotelRate>,
}

impl Instance {
    /// Same seed, same instance. City count, arc density, topology and the
    /// mandatory subset are all drawn from the seed.
    pub fn generate(seed: u64) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let n = rng.gen_range(MIN_CITIES..=MAX_CITIES);
        let names: Vec<String> = (0..n).map(|i| format!("C{i}")).collect();
        let density = rng.gen_range(0.45..=1.0);

        let mut offers = Vec::new();
        for from in &names {
            for to in &names {
                if from == to || !rng.gen_bool(density) {
                    continue;
                }
                let price = rng.gen_range(40..=600) as f64;
                let minutes = rng.gen_range(30..=400);
                offers.push(Offer::new(from, to, price, minutes));
            }
        }

        let round_trip = rng.gen_bool(0.5);
        let origins: Vec<&str> = if !round_trip && n > 3 && rng.gen_bool(0.3) {
            vec![names[0].as_str(), names[1].as_str()]
        } else {
            vec![names[0].as_str()]
        };
        let destinations: Vec<&str> = if round_trip { Vec::new() } else { vec![names[n - 1].as_str()] };

        let mut candidates: Vec<&str> = names
            .iter()
            .map(String::as_str)
            .filter(|c| !origins.contains(c) && !destinations.contains(c))
            .collect();
        candidates.shuffle(&mut rng);
        let take = rng.gen_range(0..=candidates.len());
        let mut mandatory: Vec<&str> = candidates[..take].to_vec();
        if round_trip && mandatory.is_empty() {
            mandatory.push(candidates[0]);
        }

        let weight_time = (rng.gen_range(0.0..1.0f64) * 100.0).round() / 100.0;
        let request = TravelRequest::new(&origins, &destinations)
            .with_mandatory(&mandatory)
            .with_weights(1.0, weight_time)
            .round_trip(round_trip);

        let mut hotels = Vec::new();
        for city in &names {
            if rng.gen_bool(0.5) {
                hotels.push(HotelRate {
                    city: city.clone(),
                    name: String::new(),
                    price_per_night: rng.gen_range(0..=150) as f64,
                });
            }
        }

        Self {
            seed,
            request,
            offers,
            hotels,
        }
    }

    pub fn cities(&self) -> usize {
        let mut names: Vec<&str> = self
            .offers
            .iter()
            .flat_map(|o| [o.origin.as_str(), o.destination.as_str()])
            .chain(self.request.origin_cities.iter().map(String::as_str))
            .chain(self.request.required_cities())
            .collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Optimal,
    /// A walk without an optimality proof.
    Feasible,
    Infeasible,
    Error,
}

impl Verdict {
    fn from_status(status: SolveStatus) -> Self {
        match status {
            SolveStatus::Optimal => Verdict::Optimal,
            SolveStatus::TimeLimited | SolveStatus::Heuristic => Verdict::Feasible,
            SolveStatus::Infeasible => Verdict::Infeasible,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Optimal => "optimal",
            Verdict::Feasible => "feasible",
            Verdict::Infeasible => "infeasible",
            Verdict::Error => "error",
        }
    }
}

/// One CSV row of the sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub seed: u64,
    pub cities: usize,
    pub topology: Topology,
    pub milp: Verdict,
    pub brute: Verdict,
    pub milp_objective: Option<f64>,
    pub brute_objective: Option<f64>,
}

impl Comparison {
    pub const CSV_HEADER: &'static str =
        "seed,n,topology,milp_status,brute_status,milp_objective,brute_objective,agree";

    /// Same feasibility verdict and, when both found a walk, the same
    /// objective up to a relative tolerance.
    pub fn agree(&self) -> bool {
        match (self.milp_objective, self.brute_objective) {
            (Some(m), Some(b)) => (m - b).abs() <= TOLERANCE * b.abs().max(1.0),
            (None, None) => self.milp == Verdict::Infeasible && self.brute == Verdict::Infeasible,
            _ => false,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let objective = |o: Option<f64>| o.map(|v| format!("{v:.4}")).unwrap_or_default();
        let topology = match self.topology {
            Topology::OpenJaw => "open_jaw",
            Topology::RoundTrip => "round_trip",
        };
        write!(
            f,
            "{},{},{},{},{},{},{},{}",
            self.seed,
            self.cities,
            topology,
            self.milp.as_str(),
            self.brute.as_str(),
            objective(self.milp_objective),
            objective(self.brute_objective),
            self.agree()
        )
    }
}

/// Solves `instance` with both solvers on the same matrix.
pub fn compare(instance: &Instance, milp: &ConstraintSolver) -> Comparison {
    let mut request = instance.request.clone();
    request.apply_hotel_rates(&instance.hotels);
    let gazetteer = Gazetteer::new();
    let config = GraphConfig {
        synthesize_ground_edges: false,
        ..GraphConfig::default()
    };
    let matrix = GraphBuilder::new(&config, &gazetteer).build(&instance.offers, &request, &[]);
    let rules = TripRules::new(&request, &matrix);

    let (milp_verdict, milp_objective) = match milp.solve_with_rules(&matrix, &rules) {
        Ok(outcome) => {
            let objective = outcome.solution.as_ref().and_then(|solution| {
                let trace = TourReconstructor::new(&matrix, &instance.offers, &gazetteer).trace(solution);
                if trace.degenerate.is_some() {
                    return None;
                }
                priced(&matrix, &trace.walk)
            });
            (Verdict::from_status(outcome.status), objective)
        }
        Err(err) => (failed(instance.seed, "milp", &err), None),
    };

    let (brute_verdict, brute_objective) = match itinerary_brute_force::best_walk(&matrix, &rules) {
        Ok(Some(best)) => (Verdict::Optimal, Some(best.objective)),
        Ok(None) => (Verdict::Infeasible, None),
        Err(err) => (failed(instance.seed, "brute-force", &err), None),
    };

    Comparison {
        seed: instance.seed,
        cities: matrix.len(),
        topology: request.topology(),
        milp: milp_verdict,
        brute: brute_verdict,
        milp_objective,
        brute_objective,
    }
}

fn priced(matrix: &CostTimeMatrix, walk: &[usize]) -> Option<f64> {
    matrix.walk_totals(walk).map(|totals| matrix.objective(&totals))
}

fn failed(seed: u64, solver: &str, err: &SolverError) -> Verdict {
    tracing::warn!(seed, solver, %err, "solver failed on instance");
    Verdict::Error
}

/// `count` instances seeded `first_seed, first_seed + 1, ...`.
pub fn sweep(count: u64, first_seed: u64, config: MilpConfig) -> Vec<Comparison> {
    let milp = ConstraintSolver::new(config);
    (0..count)
        .map(|k| compare(&Instance::generate(first_seed.wrapping_add(k)), &milp))
        .collect()
}
