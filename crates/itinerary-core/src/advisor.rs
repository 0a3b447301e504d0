use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

use crate::geo::Gazetteer;
use crate::graph::GraphConfig;
use crate::matrix::{CostTimeMatrix, EdgeSource};
use crate::model::{Offer, TravelRequest};

/// Suggested fallback for a required city no offer flies into.
#[derive(Clone, Debug, PartialEq)]
pub struct Advisory {
    pub city: String,
    /// Nearest city with inbound offers.
    pub via: String,
    pub distance_km: f64,
    pub hours: f64,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Fly to {}, then take ground transport for about {:.1} h ({:.0} km) to {}",
            self.via, self.hours, self.distance_km, self.city
        )
    }
}

/// Proposes nearest-airport plus ground transport detours after an
/// infeasible solve. Never touches the solve itself.
pub struct InfeasibilityAdvisor<'a> {
    config: &'a GraphConfig,
    gazetteer: &'a Gazetteer,
}

impl<'a> InfeasibilityAdvisor<'a> {
    pub fn new(config: &'a GraphConfig, gazetteer: &'a Gazetteer) -> Self {
        Self { config, gazetteer }
    }

    /// A required city counts as served when an offer flies into it or the
    /// matrix already reaches it with a synthesized drive. Only flown-into
    /// cities are proposed as the `via` stop.
    pub fn advise(&self, request: &TravelRequest, offers: &[Offer], matrix: &CostTimeMatrix) -> Vec<Advisory> {
        let served: BTreeSet<&str> = offers
            .iter()
            .filter(|o| o.is_usable())
            .map(|o| o.destination.as_str())
            .collect();

        let mut advisories = Vec::new();
        for city in request.required_cities() {
            if served.contains(city) {
                continue;
            }
            if driven_into(matrix, city) {
                debug!(city, "reached by a ground edge, nothing to advise");
                continue;
            }
            let Some(target) = self.gazetteer.locate(city) else {
                debug!(city, "no coordinates for unreachable city, nothing to advise");
                continue;
            };

            let nearest = served
                .iter()
                .filter_map(|&via| {
                    let point = self.gazetteer.locate(via)?;
                    Some((via, crate::geo::great_circle_km(point, target)))
                })
                .min_by(|a, b| a.1.total_cmp(&b.1));

            match nearest {
                Some((via, distance_km)) if self.config.is_drivable(distance_km) => {
                    advisories.push(Advisory {
                        city: city.to_string(),
                        via: via.to_string(),
                        distance_km,
                        hours: distance_km / self.config.avg_speed_kmh,
                    });
                }
                _ => debug!(city, "no served city within driving range"),
            }
        }
        advisories
    }
}

fn driven_into(matrix: &CostTimeMatrix, city: &str) -> bool {
    let Some(j) = matrix.index_of(city) else {
        return false;
    };
    (0..matrix.len()).any(|i| matches!(matrix.edge(i, j), Some(edge) if matches!(edge.source, EdgeSource::Ground { .. })))
}
