//! Error types.
//!
//! Only structural problems surface as errors. Dirty data (unmatched
//! addresses, holes in the distance table, unparseable deadlines) is absorbed
//! by fallbacks and reported through diagnostics instead.

use std::path::PathBuf;

use thiserror::Error;

/// A time-of-day string that is not `HH:MM`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid time of day '{0}', expected HH:MM")]
pub struct ClockError(pub String);

/// Problems building a simulation from a scenario document.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed scenario document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("location table is empty")]
    NoLocations,

    #[error("location index {0} appears more than once")]
    DuplicateLocation(usize),

    #[error("depot location index {0} is not in the location table")]
    UnknownDepot(usize),

    #[error("package {0} appears more than once in the manifest")]
    DuplicatePackage(u32),

    #[error("vehicle '{0}' is declared more than once")]
    DuplicateVehicle(String),

    #[error("vehicle '{0}' is scheduled for more than one wave")]
    DuplicateWave(String),

    #[error("wave references unknown vehicle '{0}'")]
    UnknownVehicle(String),

    #[error("wave for '{vehicle}' waits on '{awaited}', which has not completed a wave yet")]
    WaveNotCompleted { vehicle: String, awaited: String },

    #[error("wave for '{0}' waits on an empty set of vehicles")]
    EmptyReturnSet(String),
}

/// Problems that prevent a wave from starting.
///
/// Once a wave has started it always runs to completion; see
/// [`WaveReport::stranded`](crate::routing::WaveReport::stranded).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("{vehicle} was given {count} packages, capacity is {capacity}")]
    CapacityExceeded {
        vehicle: String,
        count: usize,
        capacity: usize,
    },

    #[error("package {0} is not in the package store")]
    UnknownPackage(u32),

    #[error("package {0} appears more than once in the cargo")]
    DuplicateCargo(u32),

    #[error("package {id} was already delivered by {vehicle}")]
    AlreadyDelivered { id: u32, vehicle: String },

    #[error("wave names vehicle '{0}', which is not in the fleet")]
    UnknownVehicle(String),
}

/// A status query that cannot be answered.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("package {0} not found")]
    NotFound(u32),
}
