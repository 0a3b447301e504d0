use itinerary_core::{
    CostTimeMatrix, FrontierPoint, Gazetteer, GraphBuilder, GraphConfig, Offer, SolveStatus, Solution, TravelRequest,
    TripRules,
};
use itinerary_nsga::frontier::{pareto_compare, ParetoCompare};
use itinerary_nsga::{Fitness, NsgaConfig, ParetoSearch};

const CITIES: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

/// Cheap route A-B-C-D-E-F (100, 120 min per leg) takes twice as long as the
/// fast route A-E-D-C-B-F (300, 60 min per leg); every other pair is 500, 200 min.
fn trade_off_offers() -> Vec<Offer> {
    let cheap = [("A", "B"), ("B", "C"), ("C", "D"), ("D", "E"), ("E", "F")];
    let fast = [("A", "E"), ("E", "D"), ("D", "C"), ("C", "B"), ("B", "F")];
    let mut offers = Vec::new();
    for from in CITIES {
        for to in CITIES {
            if from == to {
                continue;
            }
            let offer = if cheap.contains(&(from, to)) {
                Offer::new(from, to, 100.0, 120)
            } else if fast.contains(&(from, to)) {
                Offer::new(from, to, 300.0, 60)
            } else {
                Offer::new(from, to, 500.0, 200)
            };
            offers.push(offer);
        }
    }
    offers
}

fn trade_off(weight_cost: f64, weight_time: f64) -> (TravelRequest, CostTimeMatrix) {
    let request = TravelRequest::new(&["A"], &["F"])
        .with_mandatory(&["B", "C", "D", "E"])
        .with_weights(weight_cost, weight_time);
    let config = GraphConfig {
        synthesize_ground_edges: false,
        ..GraphConfig::default()
    };
    let matrix = GraphBuilder::new(&config, &Gazetteer::new()).build(&trade_off_offers(), &request, &[]);
    (request, matrix)
}

fn seeded(seed: u64) -> ParetoSearch {
    ParetoSearch::new(NsgaConfig {
        seed: Some(seed),
        workers: 2,
        ..NsgaConfig::default()
    })
}

fn names(matrix: &CostTimeMatrix, walk: &[usize]) -> String {
    walk.iter().map(|&c| matrix.city(c)).collect::<Vec<_>>().join("-")
}

#[test]
fn front_holds_mutually_non_dominated_trade_offs() {
    let (request, matrix) = trade_off(1.0, 0.0);
    let outcome = seeded(42).solve(&matrix, &request).unwrap();

    assert_eq!(outcome.status, SolveStatus::Heuristic);
    let front = &outcome.frontier;
    assert!(front.len() >= 2, "front: {front:?}");
    for (i, a) in front.iter().enumerate() {
        for b in &front[i + 1..] {
            let fa = Fitness { cost: a.cost, duration: a.duration };
            let fb = Fitness { cost: b.cost, duration: b.duration };
            assert_eq!(pareto_compare(&fa, &fb), ParetoCompare::Equal);
            assert_ne!(a.walk, b.walk);
        }
    }
}

#[test]
fn cost_weight_selects_the_cheap_route() {
    let (request, matrix) = trade_off(1.0, 0.0);
    let outcome = seeded(7).solve(&matrix, &request).unwrap();

    let Some(Solution::Walk(walk)) = outcome.solution else {
        panic!("expected a walk");
    };
    assert_eq!(names(&matrix, &walk), "A-B-C-D-E-F");
    let cheapest: &FrontierPoint = &outcome.frontier[0];
    assert_eq!(cheapest.cost, 500.0);
    assert_eq!(cheapest.duration, 600.0);
}

#[test]
fn time_weight_selects_the_fastest_point_of_the_front() {
    let (request, matrix) = trade_off(0.1, 1.0);
    let outcome = seeded(7).solve(&matrix, &request).unwrap();

    let Some(Solution::Walk(walk)) = &outcome.solution else {
        panic!("expected a walk");
    };
    let chosen = matrix.walk_totals(walk).unwrap();
    let fastest = outcome.frontier.iter().map(|p| p.duration).fold(f64::INFINITY, f64::min);
    assert_eq!(chosen.minutes, fastest);
}

#[test]
fn same_seed_same_answer() {
    let (request, matrix) = trade_off(1.0, 0.5);
    let first = seeded(1234).solve(&matrix, &request).unwrap();
    let second = seeded(1234).solve(&matrix, &request).unwrap();
    assert_eq!(first, second);

    // worker count must not leak into the result
    let single = ParetoSearch::new(NsgaConfig {
        seed: Some(1234),
        workers: 1,
        ..NsgaConfig::default()
    })
    .solve(&matrix, &request)
    .unwrap();
    assert_eq!(first, single);
}

#[test]
fn unreachable_mandatory_city_is_infeasible() {
    let request = TravelRequest::new(&["A"], &["F"]).with_mandatory(&["Z"]);
    let config = GraphConfig {
        synthesize_ground_edges: false,
        ..GraphConfig::default()
    };
    let matrix = GraphBuilder::new(&config, &Gazetteer::new()).build(&trade_off_offers(), &request, &[]);
    let outcome = seeded(3).solve(&matrix, &request).unwrap();
    assert_eq!(outcome.status, SolveStatus::Infeasible);
    assert!(outcome.frontier.is_empty());
}

#[test]
fn reaches_the_brute_force_optimum_on_a_small_round_trip() {
    // every city is required, so no walk depends on a hub
    let request = TravelRequest::new(&["C"], &[]).with_mandatory(&["A", "B", "D", "E", "F"]).round_trip(true);
    let config = GraphConfig {
        synthesize_ground_edges: false,
        ..GraphConfig::default()
    };
    let matrix = GraphBuilder::new(&config, &Gazetteer::new()).build(&trade_off_offers(), &request, &[]);
    let rules = TripRules::new(&request, &matrix);
    let best = itinerary_brute_force::best_walk(&matrix, &rules).unwrap().unwrap();

    let outcome = seeded(99).solve(&matrix, &request).unwrap();
    let Some(Solution::Walk(walk)) = &outcome.solution else {
        panic!("expected a walk");
    };
    assert_eq!(walk.first(), walk.last());
    let totals = matrix.walk_totals(walk).unwrap();
    assert!((matrix.objective(&totals) - best.objective).abs() < 1e-9);
}

#[test]
fn rejects_nonsense_configuration() {
    let (request, matrix) = trade_off(1.0, 0.0);
    let search = ParetoSearch::new(NsgaConfig {
        crossover_prob: 1.5,
        ..NsgaConfig::default()
    });
    assert!(search.solve(&matrix, &request).is_err());
}
