use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::CityLocation;

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Great-circle distance in kilometres (haversine).
pub fn great_circle_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let half_dlat = (to.latitude - from.latitude).to_radians() / 2.0;
    let half_dlon = (to.longitude - from.longitude).to_radians() / 2.0;

    let a = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlon.sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// City name to coordinates lookup.
#[derive(Clone, Debug, Default)]
pub struct Gazetteer {
    points: HashMap<String, GeoPoint>,
}

// Airport coordinates of the cities the upstream offer feeds cover.
const BUILTIN_CITIES: &[(&str, f64, f64)] = &[
    ("São Paulo", -23.4356, -46.4731),
    ("Campinas", -23.0069, -47.1344),
    ("Rio de Janeiro", -22.8100, -43.2506),
    ("Brasília", -15.8697, -47.9172),
    ("Belo Horizonte", -19.6244, -43.9719),
    ("Salvador", -12.9086, -38.3225),
    ("Fortaleza", -3.7763, -38.5326),
    ("Recife", -8.1256, -34.9230),
    ("Porto Alegre", -29.9939, -51.1711),
    ("Curitiba", -25.5317, -49.1758),
    ("Belém", -1.3847, -48.4788),
    ("Manaus", -3.0386, -60.0506),
    ("Goiânia", -16.6267, -49.2211),
    ("Campo Grande", -20.4697, -54.6703),
    ("Cuiabá", -15.6528, -56.1167),
    ("Vitória", -20.2581, -40.2864),
    ("Florianópolis", -27.6703, -48.5525),
    ("Maceió", -9.5108, -35.7917),
    ("Natal", -5.7689, -35.3664),
    ("Uberlândia", -18.8836, -48.2253),
    ("Ribeirão Preto", -21.1364, -47.7761),
    ("Londrina", -23.3303, -51.1303),
    ("Joinville", -26.2231, -48.7978),
    ("Miami", 25.7959, -80.2870),
    ("Orlando", 28.4312, -81.3080),
    ("New York", 40.6413, -73.7781),
    ("London", 51.4700, -0.4543),
    ("Paris", 49.0097, 2.5479),
];

impl Gazetteer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut gazetteer = Self::new();
        for &(city, latitude, longitude) in BUILTIN_CITIES {
            gazetteer.insert(city, GeoPoint::new(latitude, longitude));
        }
        gazetteer
    }

    pub fn insert(&mut self, city: &str, point: GeoPoint) {
        self.points.insert(city.to_string(), point);
    }

    /// Adds caller-supplied locations, overriding entries with the same name.
    /// Non-finite coordinates are ignored.
    pub fn extend_from(&mut self, locations: &[CityLocation]) {
        for location in locations {
            if location.latitude.is_finite() && location.longitude.is_finite() {
                self.insert(&location.city, GeoPoint::new(location.latitude, location.longitude));
            }
        }
    }

    pub fn locate(&self, city: &str) -> Option<GeoPoint> {
        self.points.get(city).copied()
    }

    pub fn distance_km(&self, from: &str, to: &str) -> Option<f64> {
        Some(great_circle_km(self.locate(from)?, self.locate(to)?))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
