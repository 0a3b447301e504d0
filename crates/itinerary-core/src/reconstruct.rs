//! Decodes solver answers into legs with totals.

use std::collections::HashMap;
use tracing::warn;

use crate::error::DegenerateTour;
use crate::geo::Gazetteer;
use crate::itinerary::{CostBreakdown, Itinerary, ItineraryStatus, Leg, ParetoEntry};
use crate::matrix::{CostTimeMatrix, EdgeSource, WalkTotals};
use crate::model::{Offer, TransportMode};
use crate::outcome::{FrontierPoint, Solution};

const MAX_ALTERNATIVES: usize = 3;

/// Slack added to the city count when following successors.
const STEP_SLACK: usize = 2;

/// A decoded walk. `degenerate` is set when decoding gave up early, in which
/// case `walk` holds the hops followed so far.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    pub walk: Vec<usize>,
    pub degenerate: Option<DegenerateTour>,
}

pub struct TourReconstructor<'a> {
    matrix: &'a CostTimeMatrix,
    offers: &'a [Offer],
    gazetteer: &'a Gazetteer,
    by_pair: HashMap<(&'a str, &'a str), Vec<usize>>,
}

impl<'a> TourReconstructor<'a> {
    /// `offers` must be the slice the matrix was built from.
    pub fn new(matrix: &'a CostTimeMatrix, offers: &'a [Offer], gazetteer: &'a Gazetteer) -> Self {
        let mut by_pair: HashMap<(&str, &str), Vec<usize>> = HashMap::new();
        for (k, offer) in offers.iter().enumerate().filter(|(_, o)| o.is_usable()) {
            by_pair
                .entry((offer.origin.as_str(), offer.destination.as_str()))
                .or_default()
                .push(k);
        }
        Self {
            matrix,
            offers,
            gazetteer,
            by_pair,
        }
    }

    pub fn step_limit(&self) -> usize {
        self.matrix.len() + STEP_SLACK
    }

    /// Follows the solution from its start city. Successor chains stop at the
    /// end city or after [`Self::step_limit`] hops; a dead end, an
    /// out-of-range city or an unreachable hop also ends the trace as
    /// degenerate.
    pub fn trace(&self, solution: &Solution) -> Trace {
        let limit = self.step_limit();
        match solution {
            Solution::Successors { next, start, end } => {
                let mut walk = vec![*start];
                let mut current = *start;
                for step in 0..limit {
                    let hop = next.get(current).copied().flatten();
                    let Some(hop) = hop.filter(|&j| j < self.matrix.len() && self.matrix.is_reachable(current, j))
                    else {
                        return self.degenerate(walk, step, limit);
                    };
                    walk.push(hop);
                    current = hop;
                    if current == *end {
                        return Trace { walk, degenerate: None };
                    }
                }
                self.degenerate(walk, limit, limit)
            }
            Solution::Walk(cities) => {
                let mut walk = Vec::with_capacity(cities.len());
                for (step, &city) in cities.iter().enumerate() {
                    let linked = walk
                        .last()
                        .map_or(city < self.matrix.len(), |&prev| {
                            city < self.matrix.len() && self.matrix.is_reachable(prev, city)
                        });
                    if !linked || step > limit {
                        return self.degenerate(walk, step, limit);
                    }
                    walk.push(city);
                }
                Trace { walk, degenerate: None }
            }
        }
    }

    fn degenerate(&self, walk: Vec<usize>, steps: usize, limit: usize) -> Trace {
        let err = DegenerateTour { steps, limit };
        warn!(steps, limit, partial = walk.len(), "{err}");
        Trace {
            walk,
            degenerate: Some(err),
        }
    }

    /// Builds the itinerary for `solution`. A degenerate trace yields status
    /// `Error` with the partial legs and a warning message.
    pub fn itinerary(&self, solution: &Solution, status: ItineraryStatus) -> Itinerary {
        let trace = self.trace(solution);
        let mut itinerary = self.itinerary_for_walk(&trace.walk, status);
        if let Some(err) = trace.degenerate {
            itinerary.status = ItineraryStatus::Error;
            itinerary.message = Some(err.to_string());
        }
        itinerary
    }

    pub fn itinerary_for_walk(&self, walk: &[usize], status: ItineraryStatus) -> Itinerary {
        let legs: Vec<Leg> = walk.windows(2).filter_map(|p| self.leg(p[0], p[1])).collect();
        let totals = self.matrix.walk_totals(walk).unwrap_or_default();
        let breakdown = self.breakdown(&legs, &totals);

        Itinerary {
            status,
            legs,
            total_cost: totals.money(),
            total_duration: totals.minutes.round() as u32,
            message: None,
            advisories: Vec::new(),
            cost_breakdown: Some(breakdown),
            pareto_front: Vec::new(),
        }
    }

    fn leg(&self, i: usize, j: usize) -> Option<Leg> {
        let edge = self.matrix.edge(i, j)?;
        let (from, to) = (self.matrix.city(i), self.matrix.city(j));

        let (mode, offer, distance_km) = match edge.source {
            EdgeSource::Offer(k) => {
                let offer = self.offers.get(k).cloned();
                let mode = offer.as_ref().map_or(TransportMode::Flight, |o| o.mode);
                (mode, offer, None)
            }
            EdgeSource::Ground { distance_km } => (TransportMode::Ground, None, Some(distance_km)),
        };
        let chosen = match edge.source {
            EdgeSource::Offer(k) => Some(k),
            EdgeSource::Ground { .. } => None,
        };

        Some(Leg {
            from: from.to_string(),
            to: to.to_string(),
            mode,
            offer,
            price: edge.price,
            duration: edge.duration.round() as u32,
            distance_km,
            from_coords: self.gazetteer.locate(from),
            to_coords: self.gazetteer.locate(to),
            alternatives: self.alternatives(from, to, chosen),
        })
    }

    /// Competing offers for the pair, best score first, ties to the lower price.
    fn alternatives(&self, from: &str, to: &str, chosen: Option<usize>) -> Vec<Offer> {
        let Some(candidates) = self.by_pair.get(&(from, to)) else {
            return Vec::new();
        };
        let mut ranked: Vec<&Offer> = candidates
            .iter()
            .filter(|&&k| Some(k) != chosen)
            .map(|&k| &self.offers[k])
            .collect();
        ranked.sort_by(|a, b| {
            let sa = self.matrix.score(a.price, a.duration_minutes as f64);
            let sb = self.matrix.score(b.price, b.duration_minutes as f64);
            sa.total_cmp(&sb).then(a.price.total_cmp(&b.price))
        });
        ranked.into_iter().take(MAX_ALTERNATIVES).cloned().collect()
    }

    fn breakdown(&self, legs: &[Leg], totals: &WalkTotals) -> CostBreakdown {
        let pax = self.matrix.total_pax();
        let mut breakdown = CostBreakdown {
            hotel: totals.hotel,
            daily: totals.daily,
            ..CostBreakdown::default()
        };
        for leg in legs {
            match leg.mode {
                TransportMode::Flight => breakdown.flight += leg.price * pax,
                TransportMode::Ground => breakdown.ground += leg.price * pax,
            }
        }
        breakdown
    }

    pub fn frontier(&self, points: &[FrontierPoint]) -> Vec<ParetoEntry> {
        points
            .iter()
            .map(|p| ParetoEntry {
                cities: p.walk.iter().map(|&c| self.matrix.city(c).to_string()).collect(),
                cost: p.cost,
                duration: p.duration,
            })
            .collect()
    }
}
