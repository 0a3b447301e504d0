use crossbeam_channel::{bounded, unbounded};
use std::thread;

use crate::genome::{Decoder, Fitness};

/// Below this many genomes the thread fan-out costs more than it saves.
const PARALLEL_THRESHOLD: usize = 32;

/// Scores every genome. Workers only read the decoder and the genomes, and
/// results land at their genome's index, so the output does not depend on
/// scheduling.
pub fn evaluate_all(decoder: &Decoder<'_>, genomes: &[Vec<usize>], workers: usize) -> Vec<Fitness> {
    if workers <= 1 || genomes.len() < PARALLEL_THRESHOLD {
        return genomes.iter().map(|g| decoder.fitness(g)).collect();
    }

    let (job_tx, job_rx) = bounded::<usize>(genomes.len());
    let (result_tx, result_rx) = unbounded::<(usize, Fitness)>();
    for i in 0..genomes.len() {
        if job_tx.send(i).is_err() {
            break;
        }
    }
    drop(job_tx);

    thread::scope(|scope| {
        for _ in 0..workers.min(genomes.len()) {
            let jobs = job_rx.clone();
            let results = result_tx.clone();
            scope.spawn(move || {
                for i in jobs.iter() {
                    if results.send((i, decoder.fitness(&genomes[i]))).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(result_tx);

    let mut fitness = vec![Fitness::PENALTY; genomes.len()];
    for (i, f) in result_rx.iter() {
        fitness[i] = f;
    }
    fitness
}

#[cfg(test)]
mod tests {
    use super::*;
    use itinerary_core::{Gazetteer, GraphBuilder, GraphConfig, Offer, TravelRequest, TripRules};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn parallel_matches_sequential() {
        let request = TravelRequest::new(&["A"], &["D"]).with_mandatory(&["B"]);
        let mut offers = Vec::new();
        for from in ["A", "B", "C", "D"] {
            for to in ["A", "B", "C", "D"] {
                offers.push(Offer::new(from, to, (from.len() * 7 + to.as_bytes()[0] as usize) as f64, 60));
            }
        }
        let config = GraphConfig {
            synthesize_ground_edges: false,
            ..GraphConfig::default()
        };
        let matrix = GraphBuilder::new(&config, &Gazetteer::new()).build(&offers, &request, &[]);
        let rules = TripRules::new(&request, &matrix);
        let decoder = Decoder::new(&matrix, &rules);

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(9);
        let genomes: Vec<Vec<usize>> = (0..200).map(|_| crate::init::shuffled(4, &mut rng)).collect();

        let sequential = evaluate_all(&decoder, &genomes, 1);
        let parallel = evaluate_all(&decoder, &genomes, 4);
        assert_eq!(sequential, parallel);
        assert!(sequential.iter().any(|f| !f.is_penalty()));
    }
}
