//! Delivery vehicle state.

use chrono::NaiveTime;

/// A delivery truck and its position on the simulated clock.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use parcel_routing::models::Vehicle;
///
/// let start = NaiveTime::from_hms_opt(8, 0, 0).unwrap();
/// let v = Vehicle::new("Truck 1", 18.0, 0, start).with_cargo(vec![1, 13, 14]);
/// assert_eq!(v.name(), "Truck 1");
/// assert_eq!(v.cargo(), &[1, 13, 14]);
/// assert_eq!(v.clock(), start);
/// assert_eq!(v.miles(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Vehicle {
    name: String,
    speed: f64,
    location: usize,
    start: NaiveTime,
    clock: NaiveTime,
    miles: f64,
    cargo: Vec<u32>,
    delivered: Vec<u32>,
}

impl Vehicle {
    /// Creates an empty vehicle parked at `depot`, ready to leave at `start`.
    pub fn new(name: &str, speed: f64, depot: usize, start: NaiveTime) -> Self {
        Self {
            name: name.to_string(),
            speed,
            location: depot,
            start,
            clock: start,
            miles: 0.0,
            cargo: Vec::new(),
            delivered: Vec::new(),
        }
    }

    /// Sets the package ids loaded for the next wave.
    pub fn with_cargo(mut self, cargo: Vec<u32>) -> Self {
        self.cargo = cargo;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Speed in miles per hour.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Location index of the vehicle's current position.
    pub fn location(&self) -> usize {
        self.location
    }

    /// Wave start time.
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    /// Current simulated time.
    pub fn clock(&self) -> NaiveTime {
        self.clock
    }

    /// Cumulative distance traveled.
    pub fn miles(&self) -> f64 {
        self.miles
    }

    /// Package ids still on board.
    pub fn cargo(&self) -> &[u32] {
        &self.cargo
    }

    /// Package ids in delivery order.
    pub fn delivered(&self) -> &[u32] {
        &self.delivered
    }

    /// Moves the wave start (and the clock with it) before the wave runs.
    pub(crate) fn set_start(&mut self, start: NaiveTime) {
        self.start = start;
        self.clock = start;
    }

    pub(crate) fn take_cargo(&mut self) -> Vec<u32> {
        std::mem::take(&mut self.cargo)
    }

    pub(crate) fn wait_until(&mut self, t: NaiveTime) {
        if t > self.clock {
            self.clock = t;
        }
    }

    /// Drives one leg, advancing mileage, clock and position.
    ///
    /// Returns `false` and leaves the vehicle untouched if the leg would
    /// end after midnight.
    pub(crate) fn travel(&mut self, distance: f64, to: usize) -> bool {
        let duration = crate::clock::travel_time(distance, self.speed);
        let Some(arrival) = crate::clock::advance(self.clock, duration) else {
            return false;
        };
        self.miles += distance;
        self.clock = arrival;
        self.location = to;
        true
    }

    pub(crate) fn record_delivery(&mut self, id: u32) {
        self.delivered.push(id);
    }
}
