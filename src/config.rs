//! Simulation parameters.
//!
//! Every field has a default matching the single-day, three-truck delivery
//! day the simulator was built for, so a scenario document only needs to
//! spell out what it changes.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::clock::{hhmm, hm};
use crate::models::Address;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Constant vehicle speed in miles per hour.
    pub speed_mph: f64,
    /// Maximum packages a vehicle may carry in one wave.
    pub capacity: usize,
    /// Distance substituted when a leg cannot be resolved.
    pub fallback_distance: f64,
    /// Location index of the depot.
    pub depot: usize,
    /// Drive back to the depot after the last delivery of each wave.
    pub return_to_depot: bool,
    /// Optional fleet mileage target used by the mileage report.
    pub mileage_budget: Option<f64>,
    pub gates: GateConfig,
    pub scoring: ScoringParams,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            speed_mph: 18.0,
            capacity: 16,
            fallback_distance: 7.5,
            depot: 0,
            return_to_depot: false,
            mileage_budget: None,
            gates: GateConfig::default(),
            scoring: ScoringParams::default(),
        }
    }
}

/// Availability thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Flight-delayed packages are unavailable before this time.
    #[serde(with = "hhmm")]
    pub delay_until: NaiveTime,
    /// Case-insensitive substring of a package's notes marking it delayed.
    pub delay_marker: String,
    /// The single package shipped with a wrong address, if any.
    pub correction: Option<AddressCorrection>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            delay_until: hm(9, 5),
            delay_marker: "delayed on flight".to_string(),
            correction: Some(AddressCorrection::default()),
        }
    }
}

/// A mid-day address fix for one package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressCorrection {
    pub package_id: u32,
    /// Time at which `address` becomes authoritative.
    #[serde(with = "hhmm")]
    pub effective: NaiveTime,
    pub address: Address,
}

impl Default for AddressCorrection {
    fn default() -> Self {
        Self {
            package_id: 9,
            effective: hm(10, 20),
            address: Address::new("410 S State St", "Salt Lake City", "UT", "84111"),
        }
    }
}

/// Weights for the on-time candidate score.
///
/// `score = arrival_weight * arrival_hours + distance_weight * miles
///          - early_bonus (when arriving at least early_margin_minutes ahead)
///          - priority_shave (for priority_packages)`
///
/// Lower is better. The defaults reproduce the behaviour the manifests were
/// tuned against; none of the constants are load-bearing elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    pub arrival_weight: f64,
    pub distance_weight: f64,
    pub early_margin_minutes: f64,
    pub early_bonus: f64,
    pub priority_packages: Vec<u32>,
    pub priority_shave: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            arrival_weight: 1.0,
            distance_weight: 1.0,
            early_margin_minutes: 10.0,
            early_bonus: 0.5,
            priority_packages: Vec::new(),
            priority_shave: 0.5,
        }
    }
}
