//! Point-in-time package views and their text rendering.

use std::fmt::Write as _;

use chrono::NaiveTime;
use serde::Serialize;

use crate::clock::{format_clock, hhmm};
use crate::gate::{GateEvaluator, PackageStatus};
use crate::models::{Address, Package};
use crate::routing::WaveReport;

/// What a package looked like at a query time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub id: u32,
    #[serde(with = "hhmm")]
    pub at: NaiveTime,
    pub status: PackageStatus,
    /// The address authoritative at `at`.
    pub address: Address,
    pub deadline: String,
    pub weight: String,
    pub vehicle: Option<String>,
    /// Set once the package has left the hub by `at`.
    #[serde(serialize_with = "hhmm::option::serialize")]
    pub departed_at: Option<NaiveTime>,
    /// Set once the package has been delivered by `at`.
    #[serde(serialize_with = "hhmm::option::serialize")]
    pub delivered_at: Option<NaiveTime>,
}

impl StatusReport {
    pub fn new(package: &Package, gates: &GateEvaluator, at: NaiveTime) -> Self {
        let status = gates.status(package, at);
        let departed_at = match status {
            PackageStatus::EnRoute { .. } | PackageStatus::Delivered => package.departure_time(),
            _ => None,
        };
        let delivered_at = match status {
            PackageStatus::Delivered => package.delivery_time(),
            _ => None,
        };
        Self {
            id: package.id(),
            at,
            status,
            address: package.address_at(at).clone(),
            deadline: package.deadline_text().to_string(),
            weight: package.weight().to_string(),
            vehicle: package.vehicle().map(str::to_string),
            departed_at,
            delivered_at,
        }
    }
}

/// Fleet mileage with data-quality diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MileageReport {
    pub total_miles: f64,
    pub per_vehicle: Vec<(String, f64)>,
    pub budget: Option<f64>,
    pub fallback_lookups: usize,
}

impl MileageReport {
    pub fn within_budget(&self) -> Option<bool> {
        self.budget.map(|b| self.total_miles <= b)
    }
}

fn clock_or_blank(t: Option<NaiveTime>) -> String {
    t.map(format_clock).unwrap_or_default()
}

/// One line per package: id, status, deadline, timestamps, address.
pub fn format_status(report: &StatusReport) -> String {
    let mut line = format!(
        "{:>3} | {:<24} | {:<8} | dep {:>5} | del {:>5} | {}",
        report.id,
        report.status.to_string(),
        report.deadline,
        clock_or_blank(report.departed_at),
        clock_or_blank(report.delivered_at),
        report.address
    );
    if let Some(vehicle) = &report.vehicle {
        let _ = write!(line, " | {vehicle}");
    }
    line
}

/// Table of every package at one query time.
pub fn format_status_table(at: NaiveTime, reports: &[StatusReport]) -> String {
    let mut out = format!("Package status at {}\n", format_clock(at));
    for r in reports {
        out.push_str(&format_status(r));
        out.push('\n');
    }
    out
}

/// Per-wave route summary.
pub fn format_wave(report: &WaveReport) -> String {
    let mut out = format!(
        "{}: {} -> {}, {:.1} mi, {} stops\n",
        report.vehicle,
        format_clock(report.start),
        format_clock(report.end),
        report.miles,
        report.stops.len()
    );
    for stop in &report.stops {
        let _ = write!(
            out,
            "  {:>3} @ {} ({:.1} mi",
            stop.package_id,
            format_clock(stop.delivered_at),
            stop.distance
        );
        if let Some(due) = stop.deadline {
            let _ = write!(out, ", due {}", format_clock(due));
        }
        if stop.fallback {
            out.push_str(", fallback distance");
        }
        out.push_str(")\n");
    }
    if !report.stranded.is_empty() {
        let _ = writeln!(out, "  stranded: {:?}", report.stranded);
    }
    out
}

/// Total mileage with optional budget verdict and fallback warning.
pub fn format_mileage(report: &MileageReport) -> String {
    let mut out = format!("Total mileage (all vehicles): {:.1} miles\n", report.total_miles);
    for (name, miles) in &report.per_vehicle {
        let _ = writeln!(out, "  {name}: {miles:.1} miles");
    }
    if let (Some(budget), Some(ok)) = (report.budget, report.within_budget()) {
        let verdict = if ok { "within" } else { "over" };
        let _ = writeln!(out, "Result: {verdict} the {budget:.0} mile budget");
    }
    if report.fallback_lookups > 0 {
        let _ = writeln!(
            out,
            "Note: {} distance lookup(s) used a fallback value (check address mapping).",
            report.fallback_lookups
        );
    }
    out
}
