#![deny(clippy::all)]

pub mod advisor;
pub mod error;
pub mod geo;
pub mod graph;
pub mod itinerary;
pub mod matrix;
pub mod model;
pub mod outcome;
pub mod reconstruct;
pub mod tour;

pub use advisor::{Advisory, InfeasibilityAdvisor};
pub use error::{DegenerateTour, PlanError, RequestError, SolverError};
pub use geo::{Gazetteer, GeoPoint};
pub use graph::{GraphBuilder, GraphConfig};
pub use itinerary::{CostBreakdown, Itinerary, ItineraryStatus, Leg, ParetoEntry};
pub use matrix::{CostTimeMatrix, Edge, EdgeSource, WalkTotals, UNREACHABLE};
pub use model::{CarRate, CityLocation, HotelRate, Offer, SolveInput, Topology, TransportMode, TravelRequest};
pub use outcome::{FrontierPoint, SolveOutcome, SolveStatus, Solution};
pub use reconstruct::{TourReconstructor, Trace};
pub use tour::{TripRules, Tour};
