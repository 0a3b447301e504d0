use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MilpConfig {
    /// Wall-clock cap handed to HiGHS.
    pub time_limit_secs: f64,
    pub mip_rel_gap: f64,
    /// Larger instances are refused rather than left to time out.
    pub max_cities: usize,
}

impl Default for MilpConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: 30.0,
            mip_rel_gap: 0.0,
            max_cities: 40,
        }
    }
}
