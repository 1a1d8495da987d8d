//! Distance lookups with fallback diagnostics.

use std::cell::Cell;

use super::{DistanceTable, LocationIndex};

/// The result of measuring one leg before it is driven.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    /// Miles to drive.
    pub distance: f64,
    /// Table index the vehicle ends up at.
    pub destination: usize,
    /// `true` when `distance` is the configured fallback.
    pub fallback: bool,
}

/// Resolves addresses and measures distances between them.
///
/// Lookups never fail. An address that matches no location, or a pair
/// whose cell is empty in both directions, costs the fixed fallback
/// distance and is tallied in [`fallback_count`](Self::fallback_count) so
/// mapping gaps show up in the mileage report.
///
/// # Examples
///
/// ```
/// use parcel_routing::distance::{DistanceProvider, DistanceTable, Location, LocationIndex};
///
/// let locations = LocationIndex::new(vec![
///     Location::new(0, "Hub", "4001 South 700 East"),
///     Location::new(1, "Park", "1060 Dalton Ave S"),
/// ]);
/// let table = DistanceTable::from_rows(vec![vec![Some(0.0)], vec![Some(7.2), Some(0.0)]]);
/// let provider = DistanceProvider::new(locations, table, 0, 7.5);
///
/// assert_eq!(provider.distance("4001 South 700 East", "1060 Dalton Ave S"), 7.2);
/// assert_eq!(provider.distance("4001 South 700 East", "Somewhere else"), 7.5);
/// assert_eq!(provider.fallback_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceProvider {
    locations: LocationIndex,
    table: DistanceTable,
    depot: usize,
    fallback_distance: f64,
    fallbacks: Cell<usize>,
}

impl DistanceProvider {
    pub fn new(
        locations: LocationIndex,
        table: DistanceTable,
        depot: usize,
        fallback_distance: f64,
    ) -> Self {
        Self {
            locations,
            table,
            depot,
            fallback_distance,
            fallbacks: Cell::new(0),
        }
    }

    /// Table index of the depot.
    pub fn depot(&self) -> usize {
        self.depot
    }

    pub fn locations(&self) -> &LocationIndex {
        &self.locations
    }

    pub fn table(&self) -> &DistanceTable {
        &self.table
    }

    /// Resolves street text to a table index, if any location matches.
    pub fn resolve(&self, address: &str) -> Option<usize> {
        self.locations.resolve(address)
    }

    /// Resolves street text, substituting the depot when nothing matches.
    pub fn resolve_or_depot(&self, address: &str) -> usize {
        self.resolve(address).unwrap_or(self.depot)
    }

    /// Measures a leg without recording diagnostics.
    ///
    /// An unresolved destination costs the fallback distance and leaves the
    /// vehicle at the depot coordinate.
    pub fn measure(&self, from: usize, to: Option<usize>) -> Leg {
        let Some(to) = to else {
            return Leg {
                distance: self.fallback_distance,
                destination: self.depot,
                fallback: true,
            };
        };
        if from == to {
            return Leg {
                distance: self.table.symmetric(from, to).unwrap_or(0.0),
                destination: to,
                fallback: false,
            };
        }
        match self.table.symmetric(from, to) {
            Some(distance) => Leg {
                distance,
                destination: to,
                fallback: false,
            },
            None => Leg {
                distance: self.fallback_distance,
                destination: to,
                fallback: true,
            },
        }
    }

    /// Distance between two addresses, counting any fallback used.
    pub fn distance(&self, from: &str, to: &str) -> f64 {
        let leg = match self.resolve(from) {
            Some(a) => self.measure(a, self.resolve(to)),
            None => self.measure(self.depot, None),
        };
        if leg.fallback {
            self.note_fallback();
        }
        leg.distance
    }

    /// Records that a fallback distance was used.
    pub fn note_fallback(&self) {
        self.fallbacks.set(self.fallbacks.get() + 1);
    }

    /// How many lookups have used the fallback distance.
    pub fn fallback_count(&self) -> usize {
        self.fallbacks.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::Location;

    fn provider() -> DistanceProvider {
        let locations = LocationIndex::new(vec![
            Location::new(0, "Hub", "4001 South 700 East"),
            Location::new(1, "A", "195 W Oakland Ave"),
            Location::new(2, "B", "2530 S 500 E"),
        ]);
        let table = DistanceTable::from_rows(vec![
            vec![Some(0.0)],
            vec![Some(3.5), Some(0.0)],
            vec![Some(4.8), None, Some(0.0)],
        ]);
        DistanceProvider::new(locations, table, 0, 7.5)
    }

    #[test]
    fn test_forward_and_mirrored() {
        let p = provider();
        assert_eq!(p.distance("195 W Oakland Ave", "4001 South 700 East"), 3.5);
        assert_eq!(p.distance("4001 South 700 East", "195 W Oakland Ave"), 3.5);
        assert_eq!(p.fallback_count(), 0);
    }

    #[test]
    fn test_missing_cell_falls_back() {
        let p = provider();
        assert_eq!(p.distance("195 W Oakland Ave", "2530 S 500 E"), 7.5);
        assert_eq!(p.fallback_count(), 1);
    }

    #[test]
    fn test_unresolved_address_falls_back() {
        let p = provider();
        assert_eq!(p.distance("4001 South 700 East", "1 Nowhere Rd"), 7.5);
        assert_eq!(p.distance("1 Nowhere Rd", "2530 S 500 E"), 7.5);
        assert_eq!(p.fallback_count(), 2);
    }

    #[test]
    fn test_measure_does_not_count() {
        let p = provider();
        let leg = p.measure(0, None);
        assert!(leg.fallback);
        assert_eq!(leg.destination, 0);
        let leg = p.measure(1, Some(2));
        assert!(leg.fallback);
        assert_eq!(leg.destination, 2);
        assert_eq!(p.fallback_count(), 0);
    }

    #[test]
    fn test_same_location_is_zero() {
        let p = provider();
        let leg = p.measure(2, Some(2));
        assert_eq!(leg.distance, 0.0);
        assert!(!leg.fallback);
    }

    #[test]
    fn test_resolve_or_depot() {
        let p = provider();
        assert_eq!(p.resolve_or_depot("2530 S 500 E"), 2);
        assert_eq!(p.resolve_or_depot("1 Nowhere Rd"), 0);
    }
}
