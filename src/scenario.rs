//! Scenario documents: the day's manifest, map data and wave plan as JSON.
//!
//! A scenario bundles everything a [`Simulation`] needs. The shipped demo
//! (a 40-package, three-truck day around a single hub) is embedded in the
//! binary and available through [`Scenario::demo`].

use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveTime;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::clock::hm;
use crate::config::SimulationConfig;
use crate::distance::{DistanceProvider, DistanceTable, Location, LocationIndex};
use crate::error::ScenarioError;
use crate::models::{Address, Package, Vehicle};
use crate::simulation::{Simulation, WavePlan};
use crate::store::PackageStore;

const DEMO: &str = include_str!("../data/demo_scenario.json");

/// Every vehicle is at the depot from this time on.
const FLEET_READY: (u32, u32) = (8, 0);

/// One manifest line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub id: u32,
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    /// `H:MM AM|PM` or `EOD`.
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub notes: String,
}

impl PackageRecord {
    fn into_package(self) -> Package {
        let address = Address::new(&self.street, &self.city, &self.state, &self.zip);
        Package::new(self.id, address, &self.deadline, &self.weight, &self.notes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub name: String,
    /// Overrides the configured fleet speed.
    #[serde(default)]
    pub speed_mph: Option<f64>,
}

/// A complete delivery day.
///
/// # Examples
///
/// ```
/// use parcel_routing::scenario::Scenario;
///
/// let json = r#"{
///     "locations": [
///         {"index": 0, "name": "Hub", "key": "4001 South 700 East"},
///         {"index": 1, "name": "Park", "key": "1060 Dalton Ave S"}
///     ],
///     "distances": [[0.0], [9.0, 0.0]],
///     "packages": [
///         {"id": 1, "street": "1060 Dalton Ave S", "deadline": "10:30 AM"}
///     ],
///     "vehicles": [{"name": "Truck 1"}],
///     "waves": [{"vehicle": "Truck 1", "start": {"at": "08:00"}, "cargo": [1]}]
/// }"#;
///
/// let mut sim = Scenario::from_json(json).unwrap().into_simulation().unwrap();
/// sim.run().unwrap();
/// assert_eq!(sim.total_mileage(), 9.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: SimulationConfig,
    pub locations: Vec<Location>,
    /// Ragged rows; `null` marks a missing cell.
    #[serde(default)]
    pub distances: Vec<Vec<Option<f64>>>,
    #[serde(default)]
    pub packages: Vec<PackageRecord>,
    #[serde(default)]
    pub vehicles: Vec<VehicleRecord>,
    #[serde(default)]
    pub waves: Vec<WavePlan>,
}

impl Scenario {
    pub fn from_json(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads a scenario document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// The embedded demo day.
    pub fn demo() -> Result<Self, ScenarioError> {
        Self::from_json(DEMO)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if self.locations.is_empty() {
            return Err(ScenarioError::NoLocations);
        }
        let mut seen = HashSet::new();
        for location in &self.locations {
            if !seen.insert(location.index) {
                return Err(ScenarioError::DuplicateLocation(location.index));
            }
        }
        if !seen.contains(&self.config.depot) {
            return Err(ScenarioError::UnknownDepot(self.config.depot));
        }
        let mut ids = HashSet::new();
        for record in &self.packages {
            if !ids.insert(record.id) {
                return Err(ScenarioError::DuplicatePackage(record.id));
            }
        }
        Ok(())
    }

    /// Validates the document and assembles a ready-to-run simulation.
    pub fn into_simulation(self) -> Result<Simulation, ScenarioError> {
        self.validate()?;
        let Scenario {
            config,
            locations,
            distances,
            packages,
            vehicles,
            waves,
        } = self;

        let mut store = PackageStore::new();
        for record in packages {
            store.insert(record.into_package());
        }
        if let Some(fix) = &config.gates.correction {
            match store.lookup(fix.package_id).cloned() {
                Some(package) => {
                    store.insert(package.with_pending_address(fix.effective, fix.address.clone()));
                }
                None => warn!(
                    "address correction names package {}, which is not in the manifest",
                    fix.package_id
                ),
            }
        }

        let index = LocationIndex::new(locations);
        for package in store.packages() {
            if index.resolve(&package.label_address().street).is_none() {
                warn!(
                    "package {}: '{}' matches no known location",
                    package.id(),
                    package.label_address().street
                );
            }
        }
        let table = DistanceTable::from_rows(distances);
        let missing = table.missing_pairs().len();
        if missing > 0 {
            warn!("distance table has {missing} pair(s) with no distance in either direction");
        }
        let provider = DistanceProvider::new(index, table, config.depot, config.fallback_distance);

        let ready: NaiveTime = hm(FLEET_READY.0, FLEET_READY.1);
        let fleet = vehicles
            .into_iter()
            .map(|v| Vehicle::new(&v.name, v.speed_mph.unwrap_or(config.speed_mph), config.depot, ready))
            .collect();

        info!(
            "scenario loaded: {} packages, {} locations, {} waves",
            store.len(),
            provider.locations().len(),
            waves.len()
        );
        Simulation::new(config, store, provider, fleet, waves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::PackageStatus;
    use crate::simulation::WaveStart;

    fn minimal() -> Scenario {
        Scenario::from_json(
            r#"{
                "locations": [
                    {"index": 0, "name": "Hub", "key": "4001 South 700 East"},
                    {"index": 1, "name": "A", "key": "195 W Oakland Ave"}
                ],
                "distances": [[0.0], [1.8, 0.0]],
                "packages": [
                    {"id": 1, "street": "195 W Oakland Ave", "deadline": "EOD"},
                    {"id": 9, "street": "300 State St", "deadline": "EOD"}
                ],
                "vehicles": [{"name": "Truck 1"}],
                "waves": [{"vehicle": "Truck 1", "start": {"at": "08:00"}, "cargo": [1]}]
            }"#,
        )
        .expect("valid json")
    }

    #[test]
    fn test_defaults_fill_config() {
        let s = minimal();
        assert_eq!(s.config, SimulationConfig::default());
        assert_eq!(s.packages[0].notes, "");
    }

    #[test]
    fn test_correction_applied_to_named_package() {
        let sim = minimal().into_simulation().expect("valid scenario");
        let p9 = sim.package(9).expect("present");
        assert_eq!(p9.pending_address().map(|p| p.effective), Some(hm(10, 20)));
        assert_eq!(sim.status(9, hm(9, 0)).expect("known").status, PackageStatus::AwaitingCorrection);
        assert!(sim.package(1).and_then(Package::pending_address).is_none());
    }

    #[test]
    fn test_duplicate_package_rejected() {
        let mut s = minimal();
        s.packages.push(s.packages[0].clone());
        assert!(matches!(s.into_simulation(), Err(ScenarioError::DuplicatePackage(1))));
    }

    #[test]
    fn test_location_checks() {
        let mut s = minimal();
        s.locations.push(Location::new(1, "Again", "somewhere"));
        assert!(matches!(s.into_simulation(), Err(ScenarioError::DuplicateLocation(1))));

        let mut s = minimal();
        s.locations.clear();
        assert!(matches!(s.into_simulation(), Err(ScenarioError::NoLocations)));

        let mut s = minimal();
        s.config.depot = 5;
        assert!(matches!(s.into_simulation(), Err(ScenarioError::UnknownDepot(5))));
    }

    #[test]
    fn test_vehicle_speed_override() {
        let mut s = minimal();
        s.vehicles[0].speed_mph = Some(36.0);
        let mut sim = s.into_simulation().expect("valid scenario");
        let reports = sim.run().expect("runs");
        assert_eq!(reports[0].end, hm(8, 3));
    }

    #[test]
    fn test_late_wave_strands_instead_of_wrapping() {
        let mut s = minimal();
        s.distances = vec![vec![Some(0.0)], vec![Some(36.0), Some(0.0)]];
        s.waves[0].start = WaveStart::At(hm(23, 0));
        let mut sim = s.into_simulation().expect("valid scenario");
        let stranded = sim.run().expect("runs")[0].stranded.clone();
        assert_eq!(stranded, vec![1]);

        let p = sim.package(1).expect("present");
        assert_eq!(p.departure_time(), Some(hm(23, 0)));
        assert_eq!(p.delivery_time(), None);
        assert_eq!(
            sim.status(1, hm(23, 59)).expect("known").status,
            PackageStatus::EnRoute {
                vehicle: "Truck 1".to_string()
            }
        );
        assert_eq!(sim.total_mileage(), 0.0);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Scenario::from_json("{"), Err(ScenarioError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = Scenario::load("/definitely/not/here.json").expect_err("missing");
        assert!(matches!(err, ScenarioError::Io { .. }));
    }

    #[test]
    fn test_demo_parses() {
        let demo = Scenario::demo().expect("embedded demo");
        assert_eq!(demo.packages.len(), 40);
        assert_eq!(demo.vehicles.len(), 3);
        assert_eq!(demo.config.mileage_budget, Some(140.0));
    }
}
