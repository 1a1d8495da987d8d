//! Availability gates and the point-in-time status of a package.
//!
//! Two thresholds hold packages back: flight-delayed packages are not at the
//! hub before the delay gate, and the package with a wrong label address
//! cannot go out before its correction takes effect.

use std::fmt;

use chrono::NaiveTime;
use serde::Serialize;

use crate::config::GateConfig;
use crate::models::Package;

/// Why a package can or cannot be delivered at a given time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Open,
    Delayed { until: NaiveTime },
    AwaitingCorrection { until: NaiveTime },
}

impl Gate {
    pub fn is_open(&self) -> bool {
        matches!(self, Gate::Open)
    }
}

/// Status of a package as seen at a query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PackageStatus {
    AwaitingCorrection,
    Delayed,
    AtHub,
    EnRoute { vehicle: String },
    Delivered,
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageStatus::AwaitingCorrection => f.write_str("awaiting correction"),
            PackageStatus::Delayed => f.write_str("delayed, unavailable"),
            PackageStatus::AtHub => f.write_str("at hub"),
            PackageStatus::EnRoute { vehicle } => write!(f, "en route on {vehicle}"),
            PackageStatus::Delivered => f.write_str("delivered"),
        }
    }
}

/// Decides eligibility and status from the gate thresholds.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use parcel_routing::config::GateConfig;
/// use parcel_routing::gate::{GateEvaluator, PackageStatus};
/// use parcel_routing::models::{Address, Package};
///
/// let gates = GateEvaluator::new(&GateConfig::default());
/// let p = Package::new(
///     6,
///     Address::new("3060 Lester St", "West Valley City", "UT", "84119"),
///     "10:30 AM",
///     "88",
///     "Delayed on flight---will not arrive to depot until 9:05 am",
/// );
/// let at = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
/// assert!(!gates.is_eligible(&p, at));
/// assert_eq!(gates.status(&p, at), PackageStatus::Delayed);
/// ```
#[derive(Debug, Clone)]
pub struct GateEvaluator {
    delay_until: NaiveTime,
    delay_marker: String,
}

impl GateEvaluator {
    pub fn new(config: &GateConfig) -> Self {
        Self {
            delay_until: config.delay_until,
            delay_marker: config.delay_marker.to_lowercase(),
        }
    }

    /// `true` if the notes mark the package as arriving late at the hub.
    pub fn is_delayed(&self, package: &Package) -> bool {
        !self.delay_marker.is_empty() && package.notes().to_lowercase().contains(&self.delay_marker)
    }

    /// The gate holding `package` at time `at`; the correction gate is
    /// checked before the delay gate.
    pub fn gate(&self, package: &Package, at: NaiveTime) -> Gate {
        if let Some(pending) = package.pending_address() {
            if at < pending.effective {
                return Gate::AwaitingCorrection {
                    until: pending.effective,
                };
            }
        }
        if self.is_delayed(package) && at < self.delay_until {
            return Gate::Delayed {
                until: self.delay_until,
            };
        }
        Gate::Open
    }

    pub fn is_eligible(&self, package: &Package, at: NaiveTime) -> bool {
        self.gate(package, at).is_open()
    }

    /// Earliest time at which every gate on `package` is open.
    pub fn release_time(&self, package: &Package) -> Option<NaiveTime> {
        let correction = package.pending_address().map(|p| p.effective);
        let delay = self.is_delayed(package).then_some(self.delay_until);
        correction.max(delay)
    }

    /// Point-in-time status.
    ///
    /// First match wins: awaiting correction, delayed, at hub (not departed
    /// by `at`), en route (not delivered by `at`), delivered.
    pub fn status(&self, package: &Package, at: NaiveTime) -> PackageStatus {
        match self.gate(package, at) {
            Gate::AwaitingCorrection { .. } => return PackageStatus::AwaitingCorrection,
            Gate::Delayed { .. } => return PackageStatus::Delayed,
            Gate::Open => {}
        }
        match package.departure_time() {
            Some(departed) if at >= departed => {}
            _ => return PackageStatus::AtHub,
        }
        match package.delivery_time() {
            Some(delivered) if at >= delivered => PackageStatus::Delivered,
            _ => PackageStatus::EnRoute {
                vehicle: package.vehicle().unwrap_or("unassigned").to_string(),
            },
        }
    }
}
