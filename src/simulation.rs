//! The delivery day: shared context, wave plan, and the query surface.

use chrono::NaiveTime;
use log::info;
use serde::{Deserialize, Serialize};

use crate::clock::hhmm;
use crate::config::SimulationConfig;
use crate::distance::DistanceProvider;
use crate::error::{QueryError, RoutingError, ScenarioError};
use crate::gate::GateEvaluator;
use crate::models::{Package, Vehicle};
use crate::report::{MileageReport, StatusReport};
use crate::routing::{RoutingEngine, WaveReport};
use crate::store::PackageStore;

/// When a wave leaves the depot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveStart {
    /// A fixed time of day.
    At(#[serde(with = "hhmm")] NaiveTime),
    /// As soon as the first of the named vehicles finishes its wave (its
    /// driver takes over), but not before `not_before`.
    AfterFirstReturn {
        of: Vec<String>,
        #[serde(with = "hhmm")]
        not_before: NaiveTime,
    },
}

/// One scheduled vehicle dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WavePlan {
    pub vehicle: String,
    pub start: WaveStart,
    pub cargo: Vec<u32>,
}

/// All state for one simulated day.
///
/// Waves run strictly one after another in plan order. Package records are
/// only mutated by the routing engine; everything else reads them.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    store: PackageStore,
    distances: DistanceProvider,
    gates: GateEvaluator,
    fleet: Vec<Vehicle>,
    plan: Vec<WavePlan>,
    reports: Vec<WaveReport>,
    /// Waves routed through [`Simulation::route`], outside the plan.
    ad_hoc: Vec<WaveReport>,
}

impl Simulation {
    /// Assembles a simulation, checking that the wave plan is runnable.
    pub fn new(
        config: SimulationConfig,
        store: PackageStore,
        distances: DistanceProvider,
        fleet: Vec<Vehicle>,
        plan: Vec<WavePlan>,
    ) -> Result<Self, ScenarioError> {
        for (i, v) in fleet.iter().enumerate() {
            if fleet[..i].iter().any(|o| o.name() == v.name()) {
                return Err(ScenarioError::DuplicateVehicle(v.name().to_string()));
            }
        }

        let mut scheduled: Vec<&str> = Vec::new();
        for wave in &plan {
            if !fleet.iter().any(|v| v.name() == wave.vehicle) {
                return Err(ScenarioError::UnknownVehicle(wave.vehicle.clone()));
            }
            if scheduled.contains(&wave.vehicle.as_str()) {
                return Err(ScenarioError::DuplicateWave(wave.vehicle.clone()));
            }
            if let WaveStart::AfterFirstReturn { of, .. } = &wave.start {
                if of.is_empty() {
                    return Err(ScenarioError::EmptyReturnSet(wave.vehicle.clone()));
                }
                if let Some(awaited) = of.iter().find(|name| !scheduled.contains(&name.as_str())) {
                    return Err(ScenarioError::WaveNotCompleted {
                        vehicle: wave.vehicle.clone(),
                        awaited: awaited.clone(),
                    });
                }
            }
            scheduled.push(&wave.vehicle);
        }

        let gates = GateEvaluator::new(&config.gates);
        Ok(Self {
            config,
            store,
            distances,
            gates,
            fleet,
            plan,
            reports: Vec::new(),
            ad_hoc: Vec::new(),
        })
    }

    fn start_time(&self, start: &WaveStart) -> NaiveTime {
        match start {
            WaveStart::At(t) => *t,
            WaveStart::AfterFirstReturn { of, not_before } => self
                .reports
                .iter()
                .filter(|r| of.contains(&r.vehicle))
                .map(|r| r.end)
                .min()
                .map_or(*not_before, |t| t.max(*not_before)),
        }
    }

    /// Runs every wave that has not run yet, in plan order.
    pub fn run(&mut self) -> Result<&[WaveReport], RoutingError> {
        for i in self.reports.len()..self.plan.len() {
            let wave = self.plan[i].clone();
            let start = self.start_time(&wave.start);
            let Some(vehicle) = self.fleet.iter_mut().find(|v| v.name() == wave.vehicle) else {
                return Err(RoutingError::UnknownVehicle(wave.vehicle));
            };
            let mut loaded = vehicle.clone().with_cargo(wave.cargo);
            loaded.set_start(start);

            let engine = RoutingEngine::new(
                &self.distances,
                &self.gates,
                &self.config.scoring,
                self.config.capacity,
            )
            .with_return_to_depot(self.config.return_to_depot);
            let report = engine.route(&mut loaded, &mut self.store)?;
            *vehicle = loaded;
            self.reports.push(report);
        }
        info!(
            "all waves complete: {:.1} mi, {} fallback lookups",
            self.total_mileage(),
            self.fallback_count()
        );
        Ok(&self.reports)
    }

    /// Routes an ad-hoc vehicle outside the wave plan.
    ///
    /// The wave counts towards [`total_mileage`](Self::total_mileage) and
    /// the mileage report.
    pub fn route(&mut self, vehicle: &mut Vehicle) -> Result<WaveReport, RoutingError> {
        let report = RoutingEngine::new(
            &self.distances,
            &self.gates,
            &self.config.scoring,
            self.config.capacity,
        )
        .with_return_to_depot(self.config.return_to_depot)
        .route(vehicle, &mut self.store)?;
        self.ad_hoc.push(report.clone());
        Ok(report)
    }

    /// Status of one package at `at`.
    pub fn status(&self, id: u32, at: NaiveTime) -> Result<StatusReport, QueryError> {
        let package = self.store.lookup(id).ok_or(QueryError::NotFound(id))?;
        Ok(StatusReport::new(package, &self.gates, at))
    }

    /// Status of every package at `at`, in id order.
    pub fn statuses(&self, at: NaiveTime) -> Vec<StatusReport> {
        self.store
            .packages()
            .map(|p| StatusReport::new(p, &self.gates, at))
            .collect()
    }

    /// Miles driven by the whole fleet so far, ad-hoc waves included.
    pub fn total_mileage(&self) -> f64 {
        self.fleet.iter().map(Vehicle::miles).sum::<f64>()
            + self.ad_hoc.iter().map(|r| r.miles).sum::<f64>()
    }

    pub fn mileage_report(&self) -> MileageReport {
        MileageReport {
            total_miles: self.total_mileage(),
            per_vehicle: self
                .fleet
                .iter()
                .map(|v| (v.name().to_string(), v.miles()))
                .chain(self.ad_hoc.iter().map(|r| (r.vehicle.clone(), r.miles)))
                .collect(),
            budget: self.config.mileage_budget,
            fallback_lookups: self.fallback_count(),
        }
    }

    /// Lookups that used the fallback distance.
    pub fn fallback_count(&self) -> usize {
        self.distances.fallback_count()
    }

    pub fn package(&self, id: u32) -> Option<&Package> {
        self.store.lookup(id)
    }

    pub fn packages(&self) -> &PackageStore {
        &self.store
    }

    pub fn vehicle(&self, name: &str) -> Option<&Vehicle> {
        self.fleet.iter().find(|v| v.name() == name)
    }

    pub fn fleet(&self) -> &[Vehicle] {
        &self.fleet
    }

    pub fn plan(&self) -> &[WavePlan] {
        &self.plan
    }

    pub fn reports(&self) -> &[WaveReport] {
        &self.reports
    }

    pub fn ad_hoc_reports(&self) -> &[WaveReport] {
        &self.ad_hoc
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn distances(&self) -> &DistanceProvider {
        &self.distances
    }

    pub fn gates(&self) -> &GateEvaluator {
        &self.gates
    }
}
