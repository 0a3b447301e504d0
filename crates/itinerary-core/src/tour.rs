use crate::matrix::CostTimeMatrix;
use crate::model::{Topology, TravelRequest};

/// Index-level view of a request's topology and coverage demands.
#[derive(Clone, Debug, PartialEq)]
pub struct TripRules {
    pub topology: Topology,
    origin: Vec<bool>,
    end: Vec<bool>,
    required: Vec<bool>,
}

impl TripRules {
    pub fn new(request: &TravelRequest, matrix: &CostTimeMatrix) -> Self {
        let origin = mark(matrix, request.origin_cities.iter().map(String::as_str));
        let end = match request.topology() {
            Topology::OpenJaw => mark(matrix, request.destination_cities.iter().map(String::as_str)),
            Topology::RoundTrip => origin.clone(),
        };
        let required = mark(matrix, request.required_cities());

        Self {
            topology: request.topology(),
            origin,
            end,
            required,
        }
    }

    pub fn len(&self) -> usize {
        self.origin.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origin.is_empty()
    }

    pub fn is_origin(&self, city: usize) -> bool {
        self.origin[city]
    }

    /// Whether a tour may finish at `city` under the trip topology.
    pub fn is_end(&self, city: usize) -> bool {
        self.end[city]
    }

    pub fn is_required(&self, city: usize) -> bool {
        self.required[city]
    }

    pub fn origins(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.origin[i]).collect()
    }

    pub fn ends(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.end[i]).collect()
    }

    pub fn required(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.required[i]).collect()
    }

    /// Checks the tour invariants on an explicit walk `[start, ..., end]`:
    /// admissible start and end, every required city present, no city
    /// repeated except a round trip closing on its start.
    pub fn admits(&self, walk: &[usize]) -> bool {
        if walk.len() < 2 || walk.iter().any(|&c| c >= self.len()) {
            return false;
        }
        let start = walk[0];
        let end = walk[walk.len() - 1];
        if !self.is_origin(start) || !self.is_end(end) {
            return false;
        }
        let body = match self.topology {
            Topology::OpenJaw => walk,
            Topology::RoundTrip => {
                if end != start {
                    return false;
                }
                &walk[..walk.len() - 1]
            }
        };

        let mut seen = vec![false; self.len()];
        for &city in body {
            if seen[city] {
                return false;
            }
            seen[city] = true;
        }
        (0..self.len()).all(|c| !self.required[c] || seen[c])
    }
}

fn mark<'a>(matrix: &CostTimeMatrix, names: impl IntoIterator<Item = &'a str>) -> Vec<bool> {
    let mut flags = vec![false; matrix.len()];
    for name in names {
        if let Some(i) = matrix.index_of(name) {
            flags[i] = true;
        }
    }
    flags
}

/// An ordered city walk that satisfies its trip rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tour {
    walk: Vec<usize>,
}

impl Tour {
    /// `None` unless the walk passes [`TripRules::admits`] and every hop is
    /// reachable in the matrix.
    pub fn new(walk: Vec<usize>, rules: &TripRules, matrix: &CostTimeMatrix) -> Option<Self> {
        if !rules.admits(&walk) {
            return None;
        }
        if walk.windows(2).any(|p| !matrix.is_reachable(p[0], p[1])) {
            return None;
        }
        Some(Self { walk })
    }

    pub fn walk(&self) -> &[usize] {
        &self.walk
    }

    pub fn start(&self) -> usize {
        self.walk[0]
    }

    pub fn end(&self) -> usize {
        self.walk[self.walk.len() - 1]
    }

    pub fn into_walk(self) -> Vec<usize> {
        self.walk
    }
}
