//! Gated deadline-first greedy routing for one vehicle wave.
//!
//! # Algorithm
//!
//! Extension of the time-window-aware nearest-neighbor. At each step the
//! engine keeps only onboard packages whose gates are open at the vehicle's
//! clock, projects the arrival time for each of them from the current
//! position, and hands the candidates to [`select`]. The chosen package is
//! delivered: mileage, clock and position advance and the package is
//! stamped. When every remaining package is gated, the clock jumps to the
//! earliest gate that reopens one of them.
//!
//! Stops that cannot be reached before midnight are never candidates. If
//! nothing else is left, the wave ends and those packages are stranded.
//!
//! # Complexity
//!
//! O(n²) distance lookups for n packages on board.

use chrono::NaiveTime;
use log::{debug, error, info, warn};

use super::selection::{select, Candidate};
use super::{Stop, WaveReport};
use crate::config::ScoringParams;
use crate::distance::DistanceProvider;
use crate::error::RoutingError;
use crate::gate::GateEvaluator;
use crate::models::{Lifecycle, Package, Vehicle};
use crate::store::PackageStore;

/// Runs delivery waves against shared simulation context.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use parcel_routing::config::{GateConfig, ScoringParams};
/// use parcel_routing::distance::{DistanceProvider, DistanceTable, Location, LocationIndex};
/// use parcel_routing::gate::GateEvaluator;
/// use parcel_routing::models::{Address, Package, Vehicle};
/// use parcel_routing::routing::RoutingEngine;
/// use parcel_routing::store::PackageStore;
///
/// let locations = LocationIndex::new(vec![
///     Location::new(0, "Hub", "4001 South 700 East"),
///     Location::new(1, "Park", "1060 Dalton Ave S"),
/// ]);
/// let table = DistanceTable::from_rows(vec![vec![Some(0.0)], vec![Some(9.0), Some(0.0)]]);
/// let distances = DistanceProvider::new(locations, table, 0, 7.5);
/// let gates = GateEvaluator::new(&GateConfig { correction: None, ..GateConfig::default() });
/// let scoring = ScoringParams::default();
///
/// let mut store = PackageStore::new();
/// store.insert(Package::new(
///     1,
///     Address::new("1060 Dalton Ave S", "Salt Lake City", "UT", "84104"),
///     "10:30 AM",
///     "5",
///     "",
/// ));
///
/// let start = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
/// let mut truck = Vehicle::new("Truck 1", 18.0, 0, start).with_cargo(vec![1]);
/// let engine = RoutingEngine::new(&distances, &gates, &scoring, 16);
/// let report = engine.route(&mut truck, &mut store).unwrap();
///
/// assert_eq!(report.delivered(), vec![1]);
/// assert_eq!(report.miles, 9.0);
/// assert_eq!(report.end, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
/// ```
pub struct RoutingEngine<'a> {
    distances: &'a DistanceProvider,
    gates: &'a GateEvaluator,
    scoring: &'a ScoringParams,
    capacity: usize,
    return_to_depot: bool,
}

impl<'a> RoutingEngine<'a> {
    pub fn new(
        distances: &'a DistanceProvider,
        gates: &'a GateEvaluator,
        scoring: &'a ScoringParams,
        capacity: usize,
    ) -> Self {
        Self {
            distances,
            gates,
            scoring,
            capacity,
            return_to_depot: false,
        }
    }

    /// Drive back to the depot after the last delivery.
    pub fn with_return_to_depot(mut self, enabled: bool) -> Self {
        self.return_to_depot = enabled;
        self
    }

    fn validate(&self, vehicle: &Vehicle, store: &PackageStore) -> Result<(), RoutingError> {
        let cargo = vehicle.cargo();
        if cargo.len() > self.capacity {
            return Err(RoutingError::CapacityExceeded {
                vehicle: vehicle.name().to_string(),
                count: cargo.len(),
                capacity: self.capacity,
            });
        }
        for (i, &id) in cargo.iter().enumerate() {
            if cargo[..i].contains(&id) {
                return Err(RoutingError::DuplicateCargo(id));
            }
            let package = store.lookup(id).ok_or(RoutingError::UnknownPackage(id))?;
            if package.lifecycle() == Lifecycle::Delivered {
                return Err(RoutingError::AlreadyDelivered {
                    id,
                    vehicle: package.vehicle().unwrap_or("unknown").to_string(),
                });
            }
        }
        Ok(())
    }

    /// `None` when the stop cannot be reached before midnight.
    fn candidate(&self, package: &Package, vehicle: &Vehicle) -> Option<Candidate> {
        let now = vehicle.clock();
        let street = &package.address_at(now).street;
        let leg = self
            .distances
            .measure(vehicle.location(), self.distances.resolve(street));
        let travel = crate::clock::travel_time(leg.distance, vehicle.speed());
        let Some(arrival) = crate::clock::advance(now, travel) else {
            debug!(
                "{}: package {} is {:.1} mi away, past the end of the day",
                vehicle.name(),
                package.id(),
                leg.distance
            );
            return None;
        };
        Some(Candidate {
            package_id: package.id(),
            leg,
            arrival,
            deadline: package.deadline(),
        })
    }

    fn next_release(&self, onboard: &[u32], store: &PackageStore, now: NaiveTime) -> Option<NaiveTime> {
        onboard
            .iter()
            .filter_map(|id| store.lookup(*id))
            .filter_map(|p| self.gates.release_time(p))
            .filter(|t| *t > now)
            .min()
    }

    /// Delivers the vehicle's cargo, mutating the vehicle and package records.
    ///
    /// Fails without touching any state if the cargo is over capacity,
    /// repeats a package, names an unknown package or one that has already
    /// been delivered. Once started the wave always completes; packages that
    /// can never become eligible, or cannot be reached before midnight, are
    /// left en route and listed in [`WaveReport::stranded`].
    pub fn route(
        &self,
        vehicle: &mut Vehicle,
        store: &mut PackageStore,
    ) -> Result<WaveReport, RoutingError> {
        self.validate(vehicle, store)?;

        let start = vehicle.clock();
        let miles_before = vehicle.miles();
        let mut onboard = vehicle.take_cargo();
        info!(
            "{} departs at {} with {} packages",
            vehicle.name(),
            crate::clock::format_clock(start),
            onboard.len()
        );

        for &id in &onboard {
            let Some(package) = store.lookup_mut(id) else {
                continue;
            };
            let release = self.gates.release_time(package).map_or(start, |t| t.max(start));
            package.load(vehicle.name(), release);
        }

        let mut stops = Vec::with_capacity(onboard.len());
        let mut stranded = Vec::new();
        let mut fallback_legs = 0;

        while !onboard.is_empty() {
            let now = vehicle.clock();
            let candidates: Vec<Candidate> = onboard
                .iter()
                .filter_map(|id| store.lookup(*id))
                .filter(|p| self.gates.is_eligible(p, now))
                .filter_map(|p| self.candidate(p, vehicle))
                .collect();

            let Some((chosen, tier)) = select(&candidates, self.scoring) else {
                match self.next_release(&onboard, store, now) {
                    Some(t) => {
                        debug!(
                            "{}: nothing eligible at {}, waiting until {}",
                            vehicle.name(),
                            crate::clock::format_clock(now),
                            crate::clock::format_clock(t)
                        );
                        vehicle.wait_until(t);
                        continue;
                    }
                    None => {
                        error!(
                            "{}: packages {:?} cannot be delivered before midnight, ending wave",
                            vehicle.name(),
                            onboard
                        );
                        stranded = std::mem::take(&mut onboard);
                        break;
                    }
                }
            };
            let chosen = chosen.clone();

            if chosen.leg.fallback {
                self.distances.note_fallback();
                fallback_legs += 1;
                warn!(
                    "{}: no distance for leg to package {}, using fallback {:.1} mi",
                    vehicle.name(),
                    chosen.package_id,
                    chosen.leg.distance
                );
            }
            if !vehicle.travel(chosen.leg.distance, chosen.leg.destination) {
                error!("{}: leg to package {} runs past midnight", vehicle.name(), chosen.package_id);
                stranded = std::mem::take(&mut onboard);
                break;
            }
            let delivered_at = vehicle.clock();
            if let Some(package) = store.lookup_mut(chosen.package_id) {
                package.deliver(delivered_at);
            }
            vehicle.record_delivery(chosen.package_id);
            onboard.retain(|&id| id != chosen.package_id);

            debug!(
                "{}: delivered {} at {} ({:?}, {:.1} mi)",
                vehicle.name(),
                chosen.package_id,
                crate::clock::format_clock(delivered_at),
                tier,
                chosen.leg.distance
            );
            stops.push(Stop {
                package_id: chosen.package_id,
                location: chosen.leg.destination,
                distance: chosen.leg.distance,
                delivered_at,
                deadline: chosen.deadline,
                tier,
                fallback: chosen.leg.fallback,
            });
        }

        if self.return_to_depot && vehicle.location() != self.distances.depot() {
            let leg = self
                .distances
                .measure(vehicle.location(), Some(self.distances.depot()));
            if !vehicle.travel(leg.distance, leg.destination) {
                error!("{}: cannot return to the depot before midnight", vehicle.name());
            } else if leg.fallback {
                self.distances.note_fallback();
                fallback_legs += 1;
            }
        }

        let report = WaveReport {
            vehicle: vehicle.name().to_string(),
            start,
            end: vehicle.clock(),
            miles: vehicle.miles() - miles_before,
            stops,
            stranded,
            fallback_legs,
        };
        info!(
            "{} finished at {} after {:.1} mi",
            report.vehicle,
            crate::clock::format_clock(report.end),
            report.miles
        );
        Ok(report)
    }
}
