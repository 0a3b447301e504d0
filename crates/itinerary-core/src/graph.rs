//! Compresses competing offers into one cost/time matrix per solve.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

use crate::geo::Gazetteer;
use crate::matrix::{CostTimeMatrix, Edge, EdgeSource, MatrixParts};
use crate::model::{CarRate, Offer, TravelRequest};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Fill offer-less pairs with a drive when the cities are close.
    pub synthesize_ground_edges: bool,
    pub drivable_threshold_km: f64,
    pub avg_speed_kmh: f64,
    pub driving_hours_per_day: f64,
    /// Used when no car-rental record covers the departure city.
    pub default_car_daily_rate: f64,
    pub fuel_cost_per_km: f64,
    /// People sharing one car, so a drive is priced per person like a fare.
    pub car_occupancy: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            synthesize_ground_edges: true,
            drivable_threshold_km: 550.0,
            avg_speed_kmh: 80.0,
            driving_hours_per_day: 8.0,
            default_car_daily_rate: 150.0,
            fuel_cost_per_km: 0.8,
            car_occupancy: 2.0,
        }
    }
}

/// A synthesized drive, priced per person.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundQuote {
    pub price: f64,
    pub minutes: f64,
    pub distance_km: f64,
}

impl GraphConfig {
    pub fn is_drivable(&self, distance_km: f64) -> bool {
        distance_km < self.drivable_threshold_km
    }

    pub fn drive_minutes(&self, distance_km: f64) -> f64 {
        (distance_km / self.avg_speed_kmh * 60.0).round()
    }

    pub fn quote_drive(&self, distance_km: f64, car_daily_rate: f64) -> GroundQuote {
        let hours = distance_km / self.avg_speed_kmh;
        let days = (hours / self.driving_hours_per_day).ceil().max(1.0);
        let price = (car_daily_rate * days + self.fuel_cost_per_km * distance_km) / self.car_occupancy.max(1.0);
        GroundQuote {
            price,
            minutes: self.drive_minutes(distance_km),
            distance_km,
        }
    }
}

/// `weight_cost * price * pax + weight_time * duration`.
pub fn weighted_score(request: &TravelRequest, price: f64, minutes: f64) -> f64 {
    request.weight_cost * price * request.total_pax() as f64 + request.weight_time * minutes
}

/// Request cities and every usable offer endpoint, sorted and de-duplicated.
pub fn city_universe(offers: &[Offer], request: &TravelRequest) -> Vec<String> {
    let mut cities: BTreeSet<&str> = BTreeSet::new();
    for city in request
        .origin_cities
        .iter()
        .chain(&request.destination_cities)
        .chain(&request.mandatory_cities)
    {
        if !city.trim().is_empty() {
            cities.insert(city);
        }
    }
    for offer in offers.iter().filter(|o| o.is_usable()) {
        cities.insert(&offer.origin);
        cities.insert(&offer.destination);
    }
    cities.into_iter().map(str::to_string).collect()
}

pub struct GraphBuilder<'a> {
    config: &'a GraphConfig,
    gazetteer: &'a Gazetteer,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(config: &'a GraphConfig, gazetteer: &'a Gazetteer) -> Self {
        Self { config, gazetteer }
    }

    /// Pure function of its inputs. For every ordered pair the offer with the
    /// lowest weighted score is kept, ties going to the lower price.
    pub fn build(&self, offers: &[Offer], request: &TravelRequest, cars: &[CarRate]) -> CostTimeMatrix {
        let cities = city_universe(offers, request);
        let n = cities.len();
        let index: HashMap<&str, usize> = cities.iter().enumerate().map(|(i, c)| (c.as_str(), i)).collect();

        let mut edges: Vec<Option<Edge>> = vec![None; n * n];
        let mut skipped = 0usize;

        for (offer_idx, offer) in offers.iter().enumerate() {
            if !offer.is_usable() {
                skipped += 1;
                continue;
            }
            let (i, j) = (index[offer.origin.as_str()], index[offer.destination.as_str()]);
            let duration = offer.duration_minutes as f64;
            let score = weighted_score(request, offer.price, duration);

            let slot = &mut edges[i * n + j];
            let better = match slot {
                None => true,
                Some(kept) => score < kept.score || (score == kept.score && offer.price < kept.price),
            };
            if better {
                *slot = Some(Edge {
                    price: offer.price,
                    duration,
                    score,
                    source: EdgeSource::Offer(offer_idx),
                });
            }
        }
        if skipped > 0 {
            warn!(skipped, "ignored offers with unusable price or endpoints");
        }

        let mut synthesized = 0usize;
        if self.config.synthesize_ground_edges {
            let car_rates = cheapest_car_rates(cars);
            for i in 0..n {
                for j in 0..n {
                    if i == j || edges[i * n + j].is_some() {
                        continue;
                    }
                    let Some(distance_km) = self.gazetteer.distance_km(&cities[i], &cities[j]) else {
                        continue;
                    };
                    if !self.config.is_drivable(distance_km) {
                        continue;
                    }
                    let daily = car_rates
                        .get(cities[i].as_str())
                        .copied()
                        .unwrap_or(self.config.default_car_daily_rate);
                    let quote = self.config.quote_drive(distance_km, daily);
                    edges[i * n + j] = Some(Edge {
                        price: quote.price,
                        duration: quote.minutes,
                        score: weighted_score(request, quote.price, quote.minutes),
                        source: EdgeSource::Ground { distance_km },
                    });
                    synthesized += 1;
                }
            }
        }

        let stay_days = request.stay_days_per_city as f64;
        let total_pax = request.total_pax() as f64;
        let hotel_stay = cities
            .iter()
            .map(|city| request.hotel_rate_per_city.get(city).copied().unwrap_or(0.0) * stay_days)
            .collect();
        let daily_stay = vec![request.daily_cost_per_person * stay_days * total_pax; n];

        debug!(
            cities = n,
            offers = offers.len(),
            edges = edges.iter().filter(|e| e.is_some()).count(),
            synthesized,
            "built cost/time matrix"
        );

        CostTimeMatrix::from_parts(MatrixParts {
            cities,
            edges,
            hotel_stay,
            daily_stay,
            total_pax,
            weight_cost: request.weight_cost,
            weight_time: request.weight_time,
            topology: request.topology(),
        })
    }
}

fn cheapest_car_rates(cars: &[CarRate]) -> HashMap<&str, f64> {
    let mut rates: HashMap<&str, f64> = HashMap::new();
    for car in cars {
        if !car.price_per_day.is_finite() || car.price_per_day < 0.0 {
            continue;
        }
        let rate = rates.entry(car.city.as_str()).or_insert(f64::INFINITY);
        if car.price_per_day < *rate {
            *rate = car.price_per_day;
        }
    }
    rates
}
