//! Domain model types for the delivery day.
//!
//! Packages carry their label data, constraints and delivery stamps;
//! vehicles carry their clock, position, mileage and manifest.

mod package;
mod vehicle;

pub use package::{Address, Lifecycle, Package, PendingAddress};
pub use vehicle::Vehicle;
