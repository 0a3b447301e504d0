use itinerary_core::{CostTimeMatrix, Topology, Tour, TripRules};

/// The two minimised objectives of one individual.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fitness {
    pub cost: f64,
    pub duration: f64,
}

impl Fitness {
    /// Dominated by every valid walk.
    pub const PENALTY: Fitness = Fitness {
        cost: 1e15,
        duration: 1e15,
    };

    pub fn is_penalty(&self) -> bool {
        self.cost >= Self::PENALTY.cost || self.duration >= Self::PENALTY.duration
    }
}

/// Turns permutations of all cities into walks and scores them. Holds only
/// shared references, so one decoder serves every worker thread.
#[derive(Clone, Copy)]
pub struct Decoder<'a> {
    pub matrix: &'a CostTimeMatrix,
    pub rules: &'a TripRules,
}

impl<'a> Decoder<'a> {
    pub fn new(matrix: &'a CostTimeMatrix, rules: &'a TripRules) -> Self {
        Self { matrix, rules }
    }

    /// The genome prefix up to the last required city after the start,
    /// closed back to the start in a round trip. Cities before that point
    /// act as hubs; the ones after it are dropped. `None` when the prefix
    /// breaks a trip rule or uses an unreachable hop.
    pub fn walk(&self, genome: &[usize]) -> Option<Vec<usize>> {
        let last = genome
            .iter()
            .enumerate()
            .skip(1)
            .filter(|&(_, &city)| self.rules.is_required(city))
            .map(|(pos, _)| pos)
            .last()?;

        let mut walk = genome[..=last].to_vec();
        if self.rules.topology == Topology::RoundTrip {
            walk.push(genome[0]);
        }
        Tour::new(walk, self.rules, self.matrix).map(Tour::into_walk)
    }

    pub fn fitness(&self, genome: &[usize]) -> Fitness {
        self.walk(genome)
            .and_then(|walk| self.matrix.walk_totals(&walk))
            .map_or(Fitness::PENALTY, |totals| Fitness {
                cost: totals.money(),
                duration: totals.minutes,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itinerary_core::{Gazetteer, GraphBuilder, GraphConfig, Offer, TravelRequest};

    fn build(request: &TravelRequest) -> CostTimeMatrix {
        let offers = vec![
            Offer::new("A", "B", 10.0, 100),
            Offer::new("B", "C", 20.0, 100),
            Offer::new("C", "A", 30.0, 100),
            Offer::new("A", "HUB", 1.0, 10),
            Offer::new("HUB", "C", 1.0, 10),
        ];
        let config = GraphConfig {
            synthesize_ground_edges: false,
            ..GraphConfig::default()
        };
        GraphBuilder::new(&config, &Gazetteer::new()).build(&offers, request, &[])
    }

    // universe: A=0, B=1, C=2, HUB=3

    #[test]
    fn trailing_optional_cities_are_dropped() {
        let request = TravelRequest::new(&["A"], &["C"]).with_mandatory(&["B"]);
        let matrix = build(&request);
        let rules = TripRules::new(&request, &matrix);
        let decoder = Decoder::new(&matrix, &rules);

        assert_eq!(decoder.walk(&[0, 1, 2, 3]), Some(vec![0, 1, 2]));
        assert_eq!(decoder.fitness(&[0, 1, 2, 3]), Fitness { cost: 30.0, duration: 200.0 });
    }

    #[test]
    fn optional_city_before_the_last_required_one_is_a_hub() {
        let request = TravelRequest::new(&["A"], &["C"]);
        let matrix = build(&request);
        let rules = TripRules::new(&request, &matrix);
        let decoder = Decoder::new(&matrix, &rules);

        assert_eq!(decoder.walk(&[0, 3, 2, 1]), Some(vec![0, 3, 2]));
    }

    #[test]
    fn round_trip_closes_on_first_gene() {
        let request = TravelRequest::new(&["A"], &[]).with_mandatory(&["B", "C"]).round_trip(true);
        let matrix = build(&request);
        let rules = TripRules::new(&request, &matrix);
        let decoder = Decoder::new(&matrix, &rules);

        assert_eq!(decoder.walk(&[0, 1, 2, 3]), Some(vec![0, 1, 2, 0]));
        assert_eq!(decoder.fitness(&[0, 1, 2, 3]).cost, 60.0);
    }

    #[test]
    fn invalid_genomes_get_the_penalty() {
        let request = TravelRequest::new(&["A"], &["C"]).with_mandatory(&["B"]);
        let matrix = build(&request);
        let rules = TripRules::new(&request, &matrix);
        let decoder = Decoder::new(&matrix, &rules);

        // wrong start
        assert!(decoder.fitness(&[1, 0, 2, 3]).is_penalty());
        // C before B ends at B, not a destination
        assert!(decoder.fitness(&[0, 2, 1, 3]).is_penalty());
        // HUB -> B has no offer
        assert_eq!(decoder.fitness(&[0, 3, 1, 2]), Fitness::PENALTY);
    }
}
