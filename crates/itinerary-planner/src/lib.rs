#![deny(clippy::all)]

//! One call from request to itinerary. The planner is the error boundary:
//! whatever goes wrong inside a solve comes back as an [`Itinerary`] with a
//! status and a message, never as a panic or a raw error.

mod config;
mod strategy;

pub use config::{PlannerConfig, StrategyKind};
pub use strategy::Strategy;

use tracing::{error, info, warn};

use itinerary_core::{
    CostTimeMatrix, Gazetteer, GraphBuilder, InfeasibilityAdvisor, Itinerary, ItineraryStatus, Offer, PlanError, SolveInput,
    SolveStatus, TourReconstructor, TravelRequest,
};

const TIME_LIMITED_NOTE: &str = "time limit reached, best incumbent returned without an optimality proof";
const HEURISTIC_NOTE: &str = "best trade-off of the Pareto search, optimality not proven";

#[derive(Clone, Debug)]
pub struct Planner {
    config: PlannerConfig,
    gazetteer: Gazetteer,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(PlannerConfig::default())
    }
}

impl Planner {
    /// Uses the built-in gazetteer; input locations are layered on per call.
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            gazetteer: Gazetteer::builtin(),
        }
    }

    pub fn with_gazetteer(mut self, gazetteer: Gazetteer) -> Self {
        self.gazetteer = gazetteer;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    #[tracing::instrument(skip_all, fields(offers = input.offers.len(), round_trip = input.request.round_trip))]
    pub fn plan(&self, input: &SolveInput) -> Itinerary {
        match self.try_plan(input) {
            Ok(itinerary) => itinerary,
            Err(PlanError::Request(err)) if err.is_unsatisfiable() => {
                info!(%err, "request admits no itinerary");
                Itinerary::infeasible(err.to_string())
            }
            Err(err) => {
                error!(%err, "solve failed");
                Itinerary::error(err.to_string())
            }
        }
    }

    fn try_plan(&self, input: &SolveInput) -> Result<Itinerary, PlanError> {
        input.request.validate()?;

        let mut request = input.request.clone();
        request.apply_hotel_rates(&input.hotels);
        let mut gazetteer = self.gazetteer.clone();
        gazetteer.extend_from(&input.locations);

        let matrix = GraphBuilder::new(&self.config.graph, &gazetteer).build(&input.offers, &request, &input.cars);
        if matrix.len() < 2 {
            return Ok(self.infeasible(&request, &input.offers, &matrix, &gazetteer, "insufficient cities"));
        }

        let strategy = Strategy::for_instance(&self.config, matrix.len());
        info!(cities = matrix.len(), strategy = strategy.name(), "solving");
        let outcome = strategy.solve(&matrix, &request)?;

        let message = match outcome.status {
            SolveStatus::Optimal => None,
            SolveStatus::TimeLimited => Some(TIME_LIMITED_NOTE),
            SolveStatus::Heuristic => Some(HEURISTIC_NOTE),
            SolveStatus::Infeasible => {
                return Ok(self.infeasible(&request, &input.offers, &matrix, &gazetteer, "no itinerary satisfies the request"))
            }
        };
        let Some(solution) = outcome.solution.as_ref() else {
            return Ok(self.infeasible(&request, &input.offers, &matrix, &gazetteer, "solver returned no tour"));
        };

        let reconstructor = TourReconstructor::new(&matrix, &input.offers, &gazetteer);
        let mut itinerary = reconstructor.itinerary(solution, ItineraryStatus::Optimal);
        if itinerary.status == ItineraryStatus::Error {
            warn!(legs = itinerary.legs.len(), "returning partial itinerary");
            return Ok(itinerary);
        }
        itinerary.message = message.map(str::to_string);
        itinerary.pareto_front = reconstructor.frontier(&outcome.frontier);

        info!(
            status = ?itinerary.status,
            legs = itinerary.legs.len(),
            total_cost = itinerary.total_cost,
            total_duration = itinerary.total_duration,
            "itinerary ready"
        );
        Ok(itinerary)
    }

    fn infeasible(
        &self,
        request: &TravelRequest,
        offers: &[Offer],
        matrix: &CostTimeMatrix,
        gazetteer: &Gazetteer,
        reason: &str,
    ) -> Itinerary {
        let advisories: Vec<String> = InfeasibilityAdvisor::new(&self.config.graph, gazetteer)
            .advise(request, offers, matrix)
            .iter()
            .map(ToString::to_string)
            .collect();
        info!(reason, advisories = advisories.len(), "infeasible request");

        let mut message = reason.to_string();
        if !advisories.is_empty() {
            message = format!("{message}. {}", advisories.join("; "));
        }
        let mut itinerary = Itinerary::infeasible(message);
        itinerary.advisories = advisories;
        itinerary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planner_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Planner>();
    }

    #[test]
    fn invalid_weight_is_an_error_not_an_infeasibility() {
        let mut input = SolveInput {
            request: TravelRequest::new(&["A"], &["B"]),
            offers: vec![Offer::new("A", "B", 10.0, 10)],
            hotels: Vec::new(),
            cars: Vec::new(),
            locations: Vec::new(),
        };
        input.request.weight_time = -1.0;
        let itinerary = Planner::default().plan(&input);
        assert_eq!(itinerary.status, ItineraryStatus::Error);
        assert!(itinerary.message.unwrap().contains("weight_time"));
    }

    #[test]
    fn missing_destinations_are_infeasible() {
        let input = SolveInput {
            request: TravelRequest::new(&["A"], &[]),
            offers: Vec::new(),
            hotels: Vec::new(),
            cars: Vec::new(),
            locations: Vec::new(),
        };
        let itinerary = Planner::default().plan(&input);
        assert_eq!(itinerary.status, ItineraryStatus::Infeasible);
        assert!(itinerary.legs.is_empty());
    }
}
