//! Locations and the distances between them.
//!
//! [`LocationIndex`] turns street text into table indices, [`DistanceTable`]
//! holds the (possibly half-filled) matrix, and [`DistanceProvider`] combines
//! them with fallback handling.

mod locations;
mod matrix;
mod provider;

pub use locations::{Location, LocationIndex};
pub use matrix::DistanceTable;
pub use provider::{DistanceProvider, Leg};
