//! # parcel-routing
//!
//! Single-depot parcel delivery simulator: a small fleet delivers one day's
//! packages in waves, choosing each next stop greedily under delivery
//! deadlines and availability gates, and the day can be queried for any
//! package's status at any time of day.
//!
//! ## Modules
//!
//! - [`models`] — Domain types (Address, Package, Vehicle)
//! - [`store`] — Package-id keyed storage backed by a chained hash table
//! - [`distance`] — Location index, distance table, fallback-aware lookups
//! - [`gate`] — Delay and address-correction gates, point-in-time status
//! - [`routing`] — Three-tier deadline-first greedy routing engine
//! - [`simulation`] — Wave plan, driver reuse, and the query surface
//! - [`scenario`] — JSON scenario documents and the embedded demo day
//! - [`report`] — Status, route and mileage reports
//! - [`clock`], [`config`], [`error`] — Time handling, parameters, errors

pub mod clock;
pub mod config;
pub mod distance;
pub mod error;
pub mod gate;
pub mod models;
pub mod report;
pub mod routing;
pub mod scenario;
pub mod simulation;
pub mod store;
