use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::model::{Offer, TransportMode};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItineraryStatus {
    /// A valid itinerary. Heuristic and time-capped answers say so in `message`.
    Optimal,
    Infeasible,
    Error,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub from: String,
    pub to: String,
    pub mode: TransportMode,
    /// `None` for a synthesized ground edge.
    pub offer: Option<Offer>,
    /// Per person.
    pub price: f64,
    /// Minutes.
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_coords: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_coords: Option<GeoPoint>,
    /// Competing offers for the same ordered pair, best score first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<Offer>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub flight: f64,
    pub ground: f64,
    pub hotel: f64,
    pub daily: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.flight + self.ground + self.hotel + self.daily
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParetoEntry {
    pub cities: Vec<String>,
    pub cost: f64,
    pub duration: f64,
}

/// The sole output of a solve. Every failure path still produces one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub status: ItineraryStatus,
    pub legs: Vec<Leg>,
    pub total_cost: f64,
    pub total_duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_breakdown: Option<CostBreakdown>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pareto_front: Vec<ParetoEntry>,
}

impl Itinerary {
    fn empty(status: ItineraryStatus, message: String) -> Self {
        Self {
            status,
            legs: Vec::new(),
            total_cost: 0.0,
            total_duration: 0,
            message: Some(message),
            advisories: Vec::new(),
            cost_breakdown: None,
            pareto_front: Vec::new(),
        }
    }

    pub fn infeasible(message: impl Into<String>) -> Self {
        Self::empty(ItineraryStatus::Infeasible, message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::empty(ItineraryStatus::Error, message.into())
    }

    pub fn is_success(&self) -> bool {
        self.status == ItineraryStatus::Optimal
    }

    pub fn start_city(&self) -> Option<&str> {
        self.legs.first().map(|leg| leg.from.as_str())
    }

    pub fn end_city(&self) -> Option<&str> {
        self.legs.last().map(|leg| leg.to.as_str())
    }

    /// Cities in travel order, start included.
    pub fn cities(&self) -> Vec<&str> {
        let mut cities: Vec<&str> = self.start_city().into_iter().collect();
        cities.extend(self.legs.iter().map(|leg| leg.to.as_str()));
        cities
    }
}
