//! Package and address types.

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A street address as printed on a package label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Address {
    pub fn new(street: &str, city: &str, state: &str, zip: &str) -> Self {
        Self {
            street: street.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            zip: zip.to_string(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {} {}", self.street, self.city, self.state, self.zip)
    }
}

/// Where a package sits in its delivery lifecycle.
///
/// This is the engine's record of what happened. The point-in-time view
/// shown to users is derived by [`GateEvaluator::status`](crate::gate::GateEvaluator::status).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Lifecycle {
    AtHub,
    EnRoute,
    Delivered,
}

/// An address that replaces the label address from a given time on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAddress {
    pub effective: NaiveTime,
    pub address: Address,
}

/// A single shipment.
///
/// # Examples
///
/// ```
/// use parcel_routing::models::{Address, Lifecycle, Package};
///
/// let p = Package::new(
///     1,
///     Address::new("195 W Oakland Ave", "Salt Lake City", "UT", "84115"),
///     "10:30 AM",
///     "21",
///     "",
/// );
/// assert_eq!(p.id(), 1);
/// assert!(p.deadline().is_some());
/// assert_eq!(p.lifecycle(), Lifecycle::AtHub);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    id: u32,
    address: Address,
    pending_address: Option<PendingAddress>,
    deadline_text: String,
    deadline: Option<NaiveTime>,
    weight: String,
    notes: String,
    lifecycle: Lifecycle,
    departure_time: Option<NaiveTime>,
    delivery_time: Option<NaiveTime>,
    vehicle: Option<String>,
}

impl Package {
    /// Creates a package waiting at the hub.
    ///
    /// `deadline` is manifest text; see [`parse_deadline`](crate::clock::parse_deadline).
    pub fn new(id: u32, address: Address, deadline: &str, weight: &str, notes: &str) -> Self {
        Self {
            id,
            address,
            pending_address: None,
            deadline_text: deadline.trim().to_string(),
            deadline: crate::clock::parse_deadline(deadline),
            weight: weight.trim().to_string(),
            notes: notes.trim().to_string(),
            lifecycle: Lifecycle::AtHub,
            departure_time: None,
            delivery_time: None,
            vehicle: None,
        }
    }

    /// Schedules an address correction.
    pub fn with_pending_address(mut self, effective: NaiveTime, address: Address) -> Self {
        self.pending_address = Some(PendingAddress { effective, address });
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Address on the label, before any correction.
    pub fn label_address(&self) -> &Address {
        &self.address
    }

    pub fn pending_address(&self) -> Option<&PendingAddress> {
        self.pending_address.as_ref()
    }

    /// The authoritative address at time `t`.
    pub fn address_at(&self, t: NaiveTime) -> &Address {
        match &self.pending_address {
            Some(p) if t >= p.effective => &p.address,
            _ => &self.address,
        }
    }

    /// Hard deadline; `None` means end of day.
    pub fn deadline(&self) -> Option<NaiveTime> {
        self.deadline
    }

    /// Deadline as written in the manifest.
    pub fn deadline_text(&self) -> &str {
        &self.deadline_text
    }

    pub fn weight(&self) -> &str {
        &self.weight
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn departure_time(&self) -> Option<NaiveTime> {
        self.departure_time
    }

    pub fn delivery_time(&self) -> Option<NaiveTime> {
        self.delivery_time
    }

    /// Name of the vehicle that carried this package.
    pub fn vehicle(&self) -> Option<&str> {
        self.vehicle.as_deref()
    }

    pub(crate) fn load(&mut self, vehicle: &str, departure: NaiveTime) {
        if self.vehicle.is_none() {
            self.vehicle = Some(vehicle.to_string());
        }
        if self.departure_time.is_none() {
            self.departure_time = Some(departure);
        }
        self.lifecycle = Lifecycle::EnRoute;
    }

    pub(crate) fn deliver(&mut self, at: NaiveTime) {
        self.delivery_time = Some(at);
        self.lifecycle = Lifecycle::Delivered;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::hm;

    fn sample() -> Package {
        Package::new(
            9,
            Address::new("300 State St", "Salt Lake City", "UT", "84103"),
            "EOD",
            "2",
            "Wrong address listed",
        )
    }

    #[test]
    fn test_new_package_at_hub() {
        let p = sample();
        assert_eq!(p.lifecycle(), Lifecycle::AtHub);
        assert!(p.deadline().is_none());
        assert_eq!(p.deadline_text(), "EOD");
        assert!(p.departure_time().is_none());
        assert!(p.delivery_time().is_none());
        assert!(p.vehicle().is_none());
    }

    #[test]
    fn test_address_at_switches_on_effective_time() {
        let fixed = Address::new("410 S State St", "Salt Lake City", "UT", "84111");
        let p = sample().with_pending_address(hm(10, 20), fixed.clone());
        assert_eq!(p.address_at(hm(10, 19)).street, "300 State St");
        assert_eq!(p.address_at(hm(10, 20)), &fixed);
        assert_eq!(p.label_address().street, "300 State St");
    }

    #[test]
    fn test_load_and_deliver_stamp_once() {
        let mut p = sample();
        p.load("Truck 1", hm(8, 0));
        p.load("Truck 2", hm(9, 0));
        assert_eq!(p.vehicle(), Some("Truck 1"));
        assert_eq!(p.departure_time(), Some(hm(8, 0)));
        assert_eq!(p.lifecycle(), Lifecycle::EnRoute);

        p.deliver(hm(8, 42));
        assert_eq!(p.delivery_time(), Some(hm(8, 42)));
        assert_eq!(p.lifecycle(), Lifecycle::Delivered);
    }

    #[test]
    fn test_address_display() {
        let a = Address::new("1 Main St", "Murray", "UT", "84107");
        assert_eq!(a.to_string(), "1 Main St, Murray, UT 84107");
    }
}
