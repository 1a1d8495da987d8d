//! The routing engine.
//!
//! - [`RoutingEngine`] — runs one vehicle wave to completion
//! - [`select`] — three-tier next-stop policy (on-time, late, unconstrained)

mod engine;
mod selection;

pub use engine::RoutingEngine;
pub use selection::{on_time_score, select, Candidate, Tier};

use chrono::NaiveTime;
use serde::Serialize;

use crate::clock::hhmm;

/// One delivery made during a wave.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stop {
    pub package_id: u32,
    /// Table index driven to.
    pub location: usize,
    /// Miles driven from the previous stop.
    pub distance: f64,
    #[serde(with = "hhmm")]
    pub delivered_at: NaiveTime,
    #[serde(serialize_with = "hhmm::option::serialize")]
    pub deadline: Option<NaiveTime>,
    pub tier: Tier,
    pub fallback: bool,
}

/// Outcome of one vehicle wave.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveReport {
    pub vehicle: String,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// Clock after the last delivery (or the return leg, if enabled).
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    pub miles: f64,
    pub stops: Vec<Stop>,
    /// Packages that could never become eligible or be reached before midnight.
    pub stranded: Vec<u32>,
    pub fallback_legs: usize,
}

impl WaveReport {
    /// Package ids in delivery order.
    pub fn delivered(&self) -> Vec<u32> {
        self.stops.iter().map(|s| s.package_id).collect()
    }

    /// Stops that arrived after their deadline.
    pub fn late_stops(&self) -> impl Iterator<Item = &Stop> {
        self.stops
            .iter()
            .filter(|s| s.deadline.is_some_and(|due| s.delivered_at > due))
    }
}
