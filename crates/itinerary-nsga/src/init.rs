//! Initial population: a randomized nearest-neighbour construction for most
//! individuals, shuffle-and-validate for diversity.

use rand::seq::SliceRandom;
use rand::Rng;

use itinerary_core::Topology;

use crate::genome::Decoder;

/// Builds a genome whose walk starts at a random origin, visits the
/// required cities by nearest weighted edge, and (open-jaw) finishes at a
/// destination reserved up front. Optional cities trail the walk.
pub fn construct<R: Rng>(decoder: &Decoder<'_>, rng: &mut R) -> Vec<usize> {
    let matrix = decoder.matrix;
    let rules = decoder.rules;
    let n = matrix.len();

    let origins = rules.origins();
    let Some(&start) = origins.choose(rng) else {
        return shuffled(n, rng);
    };

    let end = match rules.topology {
        Topology::OpenJaw => {
            let ends: Vec<usize> = rules.ends().into_iter().filter(|&c| c != start).collect();
            ends.choose(rng).copied()
        }
        Topology::RoundTrip => None,
    };

    let mut placed = vec![false; n];
    placed[start] = true;
    if let Some(end) = end {
        placed[end] = true;
    }
    let mut remaining: Vec<usize> = rules.required().into_iter().filter(|&c| !placed[c]).collect();

    let mut genome = vec![start];
    let mut current = start;
    while !remaining.is_empty() {
        let mut ranked: Vec<(f64, usize)> = remaining
            .iter()
            .enumerate()
            .filter(|&(_, &c)| matrix.is_reachable(current, c))
            .map(|(slot, &c)| (matrix.edge_objective(current, c), slot))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        let slot = match ranked.len() {
            0 => rng.gen_range(0..remaining.len()),
            1 => ranked[0].1,
            _ => ranked[rng.gen_range(0..2)].1,
        };
        current = remaining.swap_remove(slot);
        placed[current] = true;
        genome.push(current);
    }
    if let Some(end) = end {
        genome.push(end);
    }

    let mut optional: Vec<usize> = (0..n).filter(|&c| !placed[c]).collect();
    optional.shuffle(rng);
    genome.extend(optional);
    genome
}

pub fn shuffled<R: Rng>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut genome: Vec<usize> = (0..n).collect();
    genome.shuffle(rng);
    genome
}

/// Random permutations until one decodes to a valid walk, falling back to
/// [`construct`] once `retries` are spent.
pub fn random_valid<R: Rng>(decoder: &Decoder<'_>, retries: usize, rng: &mut R) -> Vec<usize> {
    for _ in 0..retries {
        let genome = shuffled(decoder.matrix.len(), rng);
        if decoder.walk(&genome).is_some() {
            return genome;
        }
    }
    construct(decoder, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itinerary_core::{CostTimeMatrix, Gazetteer, GraphBuilder, GraphConfig, Offer, TravelRequest, TripRules};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn chain() -> (TravelRequest, CostTimeMatrix) {
        let request = TravelRequest::new(&["A"], &["E"]).with_mandatory(&["B", "C", "D"]);
        let mut offers = Vec::new();
        for (from, to) in [("A", "B"), ("B", "C"), ("C", "D"), ("D", "E"), ("A", "X"), ("X", "E")] {
            offers.push(Offer::new(from, to, 10.0, 10));
        }
        let config = GraphConfig {
            synthesize_ground_edges: false,
            ..GraphConfig::default()
        };
        let matrix = GraphBuilder::new(&config, &Gazetteer::new()).build(&offers, &request, &[]);
        (request, matrix)
    }

    #[test]
    fn construction_yields_a_permutation_with_a_valid_walk() {
        let (request, matrix) = chain();
        let rules = TripRules::new(&request, &matrix);
        let decoder = Decoder::new(&matrix, &rules);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);

        for _ in 0..20 {
            let genome = construct(&decoder, &mut rng);
            let mut sorted = genome.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..matrix.len()).collect::<Vec<_>>());
            // the chain leaves a single reachable choice at every step
            assert_eq!(decoder.walk(&genome), Some(vec![0, 1, 2, 3, 4]));
        }
    }

    #[test]
    fn random_init_falls_back_to_construction() {
        let (request, matrix) = chain();
        let rules = TripRules::new(&request, &matrix);
        let decoder = Decoder::new(&matrix, &rules);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);

        let genome = random_valid(&decoder, 0, &mut rng);
        assert!(decoder.walk(&genome).is_some());
    }
}
