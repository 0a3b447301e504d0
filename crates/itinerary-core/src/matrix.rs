use std::collections::HashMap;

use crate::model::Topology;

/// Cost and time of a pair no offer or ground edge connects.
pub const UNREACHABLE: f64 = f64::INFINITY;

/// Where the retained edge of an ordered pair came from.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeSource {
    /// Index into the offer slice the matrix was built from.
    Offer(usize),
    /// Synthesized drive between two nearby cities.
    Ground { distance_km: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    /// Per person.
    pub price: f64,
    /// Minutes.
    pub duration: f64,
    pub score: f64,
    pub source: EdgeSource,
}

/// Money and time of a walk, split the way the itinerary reports it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WalkTotals {
    /// Fares for the whole party.
    pub transport: f64,
    pub hotel: f64,
    pub daily: f64,
    pub minutes: f64,
}

impl WalkTotals {
    pub fn money(&self) -> f64 {
        self.transport + self.hotel + self.daily
    }
}

/// Dense n x n cost/time view of all offers for one solve. Immutable once
/// built; every solver prices walks through it so they agree on totals.
#[derive(Clone, Debug)]
pub struct CostTimeMatrix {
    cities: Vec<String>,
    index: HashMap<String, usize>,

    // Flattened row-major for cache locality
    cost: Vec<f64>,
    time: Vec<f64>,
    edges: Vec<Option<Edge>>,

    hotel_stay: Vec<f64>,
    daily_stay: Vec<f64>,

    total_pax: f64,
    weight_cost: f64,
    weight_time: f64,
    topology: Topology,
}

pub(crate) struct MatrixParts {
    pub cities: Vec<String>,
    pub edges: Vec<Option<Edge>>,
    pub hotel_stay: Vec<f64>,
    pub daily_stay: Vec<f64>,
    pub total_pax: f64,
    pub weight_cost: f64,
    pub weight_time: f64,
    pub topology: Topology,
}

impl CostTimeMatrix {
    pub(crate) fn from_parts(parts: MatrixParts) -> Self {
        let n = parts.cities.len();
        let mut cost = vec![UNREACHABLE; n * n];
        let mut time = vec![UNREACHABLE; n * n];
        for (slot, edge) in parts.edges.iter().enumerate() {
            if let Some(edge) = edge {
                cost[slot] = edge.price;
                time[slot] = edge.duration;
            }
        }
        let index = parts
            .cities
            .iter()
            .enumerate()
            .map(|(i, city)| (city.clone(), i))
            .collect();

        Self {
            cities: parts.cities,
            index,
            cost,
            time,
            edges: parts.edges,
            hotel_stay: parts.hotel_stay,
            daily_stay: parts.daily_stay,
            total_pax: parts.total_pax,
            weight_cost: parts.weight_cost,
            weight_time: parts.weight_time,
            topology: parts.topology,
        }
    }

    #[inline(always)]
    fn slot(&self, i: usize, j: usize) -> usize {
        i * self.cities.len() + j
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn city(&self, i: usize) -> &str {
        &self.cities[i]
    }

    pub fn index_of(&self, city: &str) -> Option<usize> {
        self.index.get(city).copied()
    }

    /// Per-person price of the retained edge, `UNREACHABLE` if none.
    #[inline]
    pub fn cost(&self, i: usize, j: usize) -> f64 {
        self.cost[self.slot(i, j)]
    }

    /// Minutes of the retained edge, `UNREACHABLE` if none.
    #[inline]
    pub fn time(&self, i: usize, j: usize) -> f64 {
        self.time[self.slot(i, j)]
    }

    pub fn edge(&self, i: usize, j: usize) -> Option<&Edge> {
        self.edges[self.slot(i, j)].as_ref()
    }

    #[inline]
    pub fn is_reachable(&self, i: usize, j: usize) -> bool {
        i != j && self.cost(i, j).is_finite()
    }

    pub fn reachable_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.len();
        (0..n).flat_map(move |i| (0..n).map(move |j| (i, j))).filter(|&(i, j)| self.is_reachable(i, j))
    }

    pub fn total_pax(&self) -> f64 {
        self.total_pax
    }

    pub fn weight_cost(&self) -> f64 {
        self.weight_cost
    }

    pub fn weight_time(&self) -> f64 {
        self.weight_time
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Cost of sojourning at `j` once arrived there.
    pub fn stay_cost(&self, j: usize) -> f64 {
        self.hotel_stay[j] + self.daily_stay[j]
    }

    /// Party fare of `i -> j` plus the stay at `j`.
    pub fn edge_money(&self, i: usize, j: usize) -> f64 {
        self.cost(i, j) * self.total_pax + self.stay_cost(j)
    }

    /// Weighted contribution of using `i -> j`.
    pub fn edge_objective(&self, i: usize, j: usize) -> f64 {
        self.weight_cost * self.edge_money(i, j) + self.weight_time * self.time(i, j)
    }

    /// Weighted score of a per-person fare, the yardstick offers compete on.
    pub fn score(&self, price: f64, minutes: f64) -> f64 {
        self.weight_cost * price * self.total_pax + self.weight_time * minutes
    }

    /// Scalar objective of a priced walk.
    pub fn objective(&self, totals: &WalkTotals) -> f64 {
        self.weight_cost * totals.money() + self.weight_time * totals.minutes
    }

    /// Prices an explicit walk `[start, ..., end]`. In a round trip the
    /// final arrival is home and carries no stay. `None` when the walk has
    /// no hop or uses an unreachable pair.
    pub fn walk_totals(&self, walk: &[usize]) -> Option<WalkTotals> {
        if walk.len() < 2 {
            return None;
        }
        let mut totals = WalkTotals::default();
        let last_hop = walk.len() - 2;
        for (hop, pair) in walk.windows(2).enumerate() {
            let (i, j) = (pair[0], pair[1]);
            if !self.is_reachable(i, j) {
                return None;
            }
            totals.transport += self.cost(i, j) * self.total_pax;
            totals.minutes += self.time(i, j);
            let home_again = hop == last_hop && self.topology == Topology::RoundTrip;
            if !home_again {
                totals.hotel += self.hotel_stay[j];
                totals.daily += self.daily_stay[j];
            }
        }
        Some(totals)
    }
}
