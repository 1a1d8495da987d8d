//! Property tests over randomly generated delivery days.

use std::collections::BTreeSet;

use chrono::NaiveTime;
use proptest::prelude::*;

use parcel_routing::config::SimulationConfig;
use parcel_routing::distance::Location;
use parcel_routing::scenario::{PackageRecord, Scenario, VehicleRecord};
use parcel_routing::simulation::{WavePlan, WaveStart};

const DEADLINES: [&str; 4] = ["EOD", "9:00 AM", "10:30 AM", "2:00 PM"];

#[derive(Debug, Clone)]
struct Parcel {
    /// `None` for an address missing from the location table.
    location: Option<usize>,
    deadline: usize,
    delayed: bool,
    wave: usize,
}

fn parcel(locations: usize) -> impl Strategy<Value = Parcel> {
    (
        prop::option::weighted(0.9, 0..locations),
        0..DEADLINES.len(),
        prop::bool::weighted(0.2),
        0..2usize,
    )
        .prop_map(|(location, deadline, delayed, wave)| Parcel {
            location,
            deadline,
            delayed,
            wave,
        })
}

fn day() -> impl Strategy<Value = (Vec<Vec<Option<f64>>>, Vec<Parcel>)> {
    (2..7usize).prop_flat_map(|n| {
        let rows = (0..n)
            .map(|i| {
                prop::collection::vec(prop::option::weighted(0.9, 1..60u32), i)
                    .prop_map(|row| {
                        let mut row: Vec<Option<f64>> =
                            row.into_iter().map(|d| d.map(|d| f64::from(d) / 10.0)).collect();
                        row.push(Some(0.0));
                        row
                    })
                    .boxed()
            })
            .collect::<Vec<_>>();
        (rows, prop::collection::vec(parcel(n), 0..16))
    })
}

fn street(location: Option<usize>) -> String {
    match location {
        Some(i) => format!("{} Test Ave", 100 + i),
        None => "1 Nowhere Rd".to_string(),
    }
}

fn scenario(distances: Vec<Vec<Option<f64>>>, parcels: &[Parcel]) -> Scenario {
    let mut config = SimulationConfig::default();
    config.gates.correction = None;
    let locations = (0..distances.len())
        .map(|i| Location::new(i, &format!("Stop {i}"), &street(Some(i))))
        .collect();
    let packages = parcels
        .iter()
        .enumerate()
        .map(|(i, p)| PackageRecord {
            id: i as u32 + 1,
            street: street(p.location),
            city: "Salt Lake City".to_string(),
            state: "UT".to_string(),
            zip: "84115".to_string(),
            deadline: DEADLINES[p.deadline].to_string(),
            weight: "1".to_string(),
            notes: if p.delayed { "Delayed on flight".to_string() } else { String::new() },
        })
        .collect();
    let cargo = |wave: usize| -> Vec<u32> {
        parcels
            .iter()
            .enumerate()
            .filter(|(_, p)| p.wave == wave)
            .map(|(i, _)| i as u32 + 1)
            .collect()
    };
    Scenario {
        config,
        locations,
        distances,
        packages,
        vehicles: vec![
            VehicleRecord { name: "Truck 1".to_string(), speed_mph: None },
            VehicleRecord { name: "Truck 2".to_string(), speed_mph: None },
        ],
        waves: vec![
            WavePlan {
                vehicle: "Truck 1".to_string(),
                start: WaveStart::At(NaiveTime::from_hms_opt(8, 0, 0).expect("valid time")),
                cargo: cargo(0),
            },
            WavePlan {
                vehicle: "Truck 2".to_string(),
                start: WaveStart::AfterFirstReturn {
                    of: vec!["Truck 1".to_string()],
                    not_before: NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
                },
                cargo: cargo(1),
            },
        ],
    }
}

proptest! {
    #[test]
    fn prop_every_package_delivered_once((distances, parcels) in day()) {
        let mut sim = scenario(distances, &parcels).into_simulation().expect("valid scenario");
        sim.run().expect("waves start");

        let delivered: Vec<u32> = sim.reports().iter().flat_map(|r| r.delivered()).collect();
        let unique: BTreeSet<u32> = delivered.iter().copied().collect();
        prop_assert_eq!(unique.len(), delivered.len());
        prop_assert_eq!(unique, (1..=parcels.len() as u32).collect::<BTreeSet<_>>());

        let unresolved = parcels.iter().filter(|p| p.location.is_none()).count();
        prop_assert!(sim.fallback_count() >= unresolved);
    }

    #[test]
    fn prop_timestamps_ordered((distances, parcels) in day()) {
        let mut sim = scenario(distances, &parcels).into_simulation().expect("valid scenario");
        sim.run().expect("waves start");

        let gate = NaiveTime::from_hms_opt(9, 5, 0).expect("valid time");
        for report in sim.reports() {
            let mut last = report.start;
            for stop in &report.stops {
                let p = sim.package(stop.package_id).expect("stored");
                let departed = p.departure_time().expect("departed");
                prop_assert!(departed >= report.start);
                prop_assert!(p.delivery_time() >= Some(departed));
                prop_assert!(stop.delivered_at >= last);
                if parcels[stop.package_id as usize - 1].delayed {
                    prop_assert!(departed >= gate);
                }
                last = stop.delivered_at;
            }
        }
        let first = &sim.reports()[0];
        let second = &sim.reports()[1];
        prop_assert_eq!(second.start, first.end.max(NaiveTime::from_hms_opt(9, 0, 0).expect("valid time")));
    }

    #[test]
    fn prop_deterministic((distances, parcels) in day()) {
        let mut a = scenario(distances.clone(), &parcels).into_simulation().expect("valid scenario");
        let mut b = scenario(distances, &parcels).into_simulation().expect("valid scenario");
        a.run().expect("waves start");
        b.run().expect("waves start");
        prop_assert_eq!(a.reports(), b.reports());
        prop_assert_eq!(a.fallback_count(), b.fallback_count());
        prop_assert_eq!(a.total_mileage(), b.total_mileage());
    }
}
