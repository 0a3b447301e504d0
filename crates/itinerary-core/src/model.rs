use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::RequestError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    #[default]
    Flight,
    Ground,
}

/// Who sells an offer. Carried through to the itinerary untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct ProviderInfo {
    #[serde(default)]
    pub carrier: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub stops: u32,
    #[serde(default)]
    pub details: String,
}

/// An atomic priced point-to-point leg. Price is per person.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub origin: String,
    pub destination: String,
    pub price: f64,
    pub duration_minutes: u32,
    #[serde(default)]
    pub mode: TransportMode,
    #[serde(default)]
    pub provider: ProviderInfo,
}

impl Offer {
    pub fn new(origin: &str, destination: &str, price: f64, duration_minutes: u32) -> Self {
        Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            price,
            duration_minutes,
            mode: TransportMode::Flight,
            provider: ProviderInfo::default(),
        }
    }

    pub fn with_mode(mut self, mode: TransportMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_carrier(mut self, carrier: &str) -> Self {
        self.provider.carrier = carrier.to_string();
        self
    }

    /// Offers that can never take part in a matrix: broken numbers, blank
    /// endpoints or a self loop.
    pub fn is_usable(&self) -> bool {
        self.price.is_finite()
            && self.price >= 0.0
            && !self.origin.trim().is_empty()
            && !self.destination.trim().is_empty()
            && self.origin != self.destination
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HotelRate {
    pub city: String,
    #[serde(default)]
    pub name: String,
    pub price_per_night: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarRate {
    pub city: String,
    #[serde(default)]
    pub company: String,
    pub price_per_day: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CityLocation {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Start at an origin, finish at a destination.
    OpenJaw,
    /// Start and finish at the same origin city.
    RoundTrip,
}

fn one() -> u32 {
    1
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TravelRequest {
    pub origin_cities: Vec<String>,
    #[serde(default)]
    pub destination_cities: Vec<String>,
    #[serde(default)]
    pub mandatory_cities: Vec<String>,
    #[serde(default = "one")]
    pub pax_adults: u32,
    #[serde(default)]
    pub pax_children: u32,
    pub weight_cost: f64,
    pub weight_time: f64,
    #[serde(default)]
    pub round_trip: bool,
    #[serde(default = "one")]
    pub stay_days_per_city: u32,
    #[serde(default)]
    pub hotel_rate_per_city: BTreeMap<String, f64>,
    #[serde(default)]
    pub daily_cost_per_person: f64,
}

impl TravelRequest {
    pub fn new(origins: &[&str], destinations: &[&str]) -> Self {
        Self {
            origin_cities: origins.iter().map(|c| c.to_string()).collect(),
            destination_cities: destinations.iter().map(|c| c.to_string()).collect(),
            mandatory_cities: Vec::new(),
            pax_adults: 1,
            pax_children: 0,
            weight_cost: 1.0,
            weight_time: 0.0,
            round_trip: false,
            stay_days_per_city: 1,
            hotel_rate_per_city: BTreeMap::new(),
            daily_cost_per_person: 0.0,
        }
    }

    pub fn with_mandatory(mut self, cities: &[&str]) -> Self {
        self.mandatory_cities = cities.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_weights(mut self, weight_cost: f64, weight_time: f64) -> Self {
        self.weight_cost = weight_cost;
        self.weight_time = weight_time;
        self
    }

    pub fn round_trip(mut self, round_trip: bool) -> Self {
        self.round_trip = round_trip;
        self
    }

    pub fn with_pax(mut self, adults: u32, children: u32) -> Self {
        self.pax_adults = adults;
        self.pax_children = children;
        self
    }

    pub fn topology(&self) -> Topology {
        if self.round_trip {
            Topology::RoundTrip
        } else {
            Topology::OpenJaw
        }
    }

    /// Travellers priced on every fare. Never below one.
    pub fn total_pax(&self) -> u32 {
        self.pax_adults.saturating_add(self.pax_children).max(1)
    }

    /// Mandatory and destination cities, without duplicates.
    pub fn required_cities(&self) -> Vec<&str> {
        let mut required: Vec<&str> = Vec::new();
        for city in self.mandatory_cities.iter().chain(&self.destination_cities) {
            if !required.contains(&city.as_str()) {
                required.push(city);
            }
        }
        required
    }

    /// Folds hotel records into `hotel_rate_per_city`. The cheapest nightly
    /// rate per city wins; cities the request already prices are left alone.
    pub fn apply_hotel_rates(&mut self, hotels: &[HotelRate]) {
        let mut cheapest: BTreeMap<&str, f64> = BTreeMap::new();
        for hotel in hotels {
            if !hotel.price_per_night.is_finite() || hotel.price_per_night < 0.0 {
                continue;
            }
            let entry = cheapest.entry(hotel.city.as_str()).or_insert(f64::INFINITY);
            if hotel.price_per_night < *entry {
                *entry = hotel.price_per_night;
            }
        }
        for (city, rate) in cheapest {
            self.hotel_rate_per_city.entry(city.to_string()).or_insert(rate);
        }
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        for (name, value) in [("weight_cost", self.weight_cost), ("weight_time", self.weight_time)] {
            if !value.is_finite() || value < 0.0 {
                return Err(RequestError::InvalidWeight { name, value });
            }
        }
        if !self.daily_cost_per_person.is_finite() || self.daily_cost_per_person < 0.0 {
            return Err(RequestError::InvalidWeight {
                name: "daily_cost_per_person",
                value: self.daily_cost_per_person,
            });
        }
        if self.origin_cities.iter().all(|c| c.trim().is_empty()) {
            return Err(RequestError::NoOriginCities);
        }
        match self.topology() {
            Topology::OpenJaw => {
                if self.destination_cities.iter().all(|c| c.trim().is_empty()) {
                    return Err(RequestError::NoDestinationCities);
                }
            }
            Topology::RoundTrip => {
                // a second origin is always somewhere to go
                let mut origins: Vec<&str> = self
                    .origin_cities
                    .iter()
                    .map(String::as_str)
                    .filter(|c| !c.trim().is_empty())
                    .collect();
                origins.sort_unstable();
                origins.dedup();
                if let [home] = origins.as_slice() {
                    if self.required_cities().iter().all(|c| c == home) {
                        return Err(RequestError::NothingToVisit);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Everything a collaborator hands over for one solve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolveInput {
    pub request: TravelRequest,
    #[serde(default)]
    pub offers: Vec<Offer>,
    #[serde(default)]
    pub hotels: Vec<HotelRate>,
    #[serde(default)]
    pub cars: Vec<CarRate>,
    #[serde(default)]
    pub locations: Vec<CityLocation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pax_never_below_one() {
        let request = TravelRequest::new(&["SP"], &["RIO"]).with_pax(0, 0);
        assert_eq!(request.total_pax(), 1);
        assert_eq!(request.clone().with_pax(2, 1).total_pax(), 3);
        assert_eq!(request.with_pax(u32::MAX, 1).total_pax(), u32::MAX);
    }

    #[test]
    fn required_cities_are_deduplicated() {
        let request = TravelRequest::new(&["SP"], &["RIO", "BH"]).with_mandatory(&["BH", "CWB"]);
        assert_eq!(request.required_cities(), vec!["BH", "CWB", "RIO"]);
    }

    #[test]
    fn cheapest_hotel_wins_but_explicit_rate_is_kept() {
        let mut request = TravelRequest::new(&["SP"], &["RIO"]);
        request.hotel_rate_per_city.insert("SP".to_string(), 90.0);
        let hotels = vec![
            HotelRate { city: "RIO".into(), name: "A".into(), price_per_night: 200.0 },
            HotelRate { city: "RIO".into(), name: "B".into(), price_per_night: 150.0 },
            HotelRate { city: "SP".into(), name: "C".into(), price_per_night: 50.0 },
        ];
        request.apply_hotel_rates(&hotels);
        assert_eq!(request.hotel_rate_per_city["RIO"], 150.0);
        assert_eq!(request.hotel_rate_per_city["SP"], 90.0);
    }

    #[test]
    fn validate_rejects_bad_weights_and_empty_sets() {
        let request = TravelRequest::new(&["SP"], &["RIO"]).with_weights(f64::NAN, 1.0);
        assert!(matches!(request.validate(), Err(RequestError::InvalidWeight { .. })));

        let request = TravelRequest::new(&[], &["RIO"]);
        assert!(matches!(request.validate(), Err(RequestError::NoOriginCities)));

        let request = TravelRequest::new(&["SP"], &[]);
        assert!(matches!(request.validate(), Err(RequestError::NoDestinationCities)));

        let request = TravelRequest::new(&["SP"], &["SP"]).round_trip(true);
        assert!(matches!(request.validate(), Err(RequestError::NothingToVisit)));

        let request = TravelRequest::new(&["SP"], &[]).with_mandatory(&["BH"]).round_trip(true);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn round_trip_with_several_origins_may_visit_one_of_them() {
        let request = TravelRequest::new(&["SP", "RIO"], &[]).with_mandatory(&["RIO"]).round_trip(true);
        assert!(request.validate().is_ok());

        let request = TravelRequest::new(&["SP", "SP", " "], &[]).with_mandatory(&["SP"]).round_trip(true);
        assert!(matches!(request.validate(), Err(RequestError::NothingToVisit)));
    }

    #[test]
    fn request_defaults_when_deserialized() {
        let request: TravelRequest = serde_json::from_str(
            r#"{"origin_cities":["SP"],"destination_cities":["RIO"],"weight_cost":1.0,"weight_time":0.5}"#,
        )
        .unwrap();
        assert_eq!(request.pax_adults, 1);
        assert_eq!(request.stay_days_per_city, 1);
        assert!(!request.round_trip);
        assert_eq!(request.topology(), Topology::OpenJaw);
    }
}
