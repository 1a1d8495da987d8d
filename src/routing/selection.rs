//! Next-stop selection policy.
//!
//! Eligible candidates fall into three tiers by deadline feasibility:
//!
//! - **On-time**: hard deadline, projected arrival at or before it. Ranked by
//!   a composite of arrival time and distance, with a bonus for comfortable
//!   slack (see [`ScoringParams`]).
//! - **Late**: hard deadline that will be missed. Ranked by lateness, then
//!   distance.
//! - **Unconstrained**: no deadline. Ranked by distance.
//!
//! Any on-time candidate beats every late or unconstrained one, and a late
//! candidate beats every unconstrained one. Remaining ties go to the lower
//! package id, which keeps selection deterministic.

use std::cmp::Ordering;

use chrono::NaiveTime;
use serde::Serialize;

use crate::clock::{hours_of_day, minutes_between};
use crate::config::ScoringParams;
use crate::distance::Leg;

/// Deadline feasibility class of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    OnTime,
    Late,
    Unconstrained,
}

/// An eligible package scored from the vehicle's current position.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub package_id: u32,
    pub leg: Leg,
    pub arrival: NaiveTime,
    pub deadline: Option<NaiveTime>,
}

impl Candidate {
    pub fn tier(&self) -> Tier {
        match self.deadline {
            Some(due) if self.arrival <= due => Tier::OnTime,
            Some(_) => Tier::Late,
            None => Tier::Unconstrained,
        }
    }

    /// Minutes between arrival and deadline (negative when late).
    pub fn slack_minutes(&self) -> Option<f64> {
        self.deadline.map(|due| minutes_between(self.arrival, due))
    }
}

/// Composite on-time score; lower is better.
pub fn on_time_score(candidate: &Candidate, params: &ScoringParams) -> f64 {
    let mut score = params.arrival_weight * hours_of_day(candidate.arrival)
        + params.distance_weight * candidate.leg.distance;
    if candidate
        .slack_minutes()
        .is_some_and(|slack| slack >= params.early_margin_minutes)
    {
        score -= params.early_bonus;
    }
    if params.priority_packages.contains(&candidate.package_id) {
        score -= params.priority_shave;
    }
    score
}

fn by_id(a: &Candidate, b: &Candidate) -> Ordering {
    a.package_id.cmp(&b.package_id)
}

fn compare(tier: Tier, a: &Candidate, b: &Candidate, params: &ScoringParams) -> Ordering {
    match tier {
        Tier::OnTime => on_time_score(a, params)
            .total_cmp(&on_time_score(b, params))
            .then_with(|| by_id(a, b)),
        Tier::Late => {
            let lateness = |c: &Candidate| -c.slack_minutes().unwrap_or(0.0);
            lateness(a)
                .total_cmp(&lateness(b))
                .then_with(|| a.leg.distance.total_cmp(&b.leg.distance))
                .then_with(|| by_id(a, b))
        }
        Tier::Unconstrained => a
            .leg
            .distance
            .total_cmp(&b.leg.distance)
            .then_with(|| by_id(a, b)),
    }
}

/// Picks the next stop among eligible candidates.
///
/// Returns `None` only for an empty slice.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use parcel_routing::config::ScoringParams;
/// use parcel_routing::distance::Leg;
/// use parcel_routing::routing::{select, Candidate, Tier};
///
/// let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
/// let near = Candidate {
///     package_id: 2,
///     leg: Leg { distance: 1.0, destination: 1, fallback: false },
///     arrival: at(8, 3),
///     deadline: None,
/// };
/// let urgent = Candidate {
///     package_id: 7,
///     leg: Leg { distance: 6.0, destination: 2, fallback: false },
///     arrival: at(8, 20),
///     deadline: Some(at(9, 0)),
/// };
/// let pool = [near, urgent];
/// let (chosen, tier) = select(&pool, &ScoringParams::default()).unwrap();
/// assert_eq!(chosen.package_id, 7);
/// assert_eq!(tier, Tier::OnTime);
/// ```
pub fn select<'c>(
    candidates: &'c [Candidate],
    params: &ScoringParams,
) -> Option<(&'c Candidate, Tier)> {
    let tier = candidates.iter().map(Candidate::tier).min()?;
    candidates
        .iter()
        .filter(|c| c.tier() == tier)
        .min_by(|a, b| compare(tier, a, b, params))
        .map(|c| (c, tier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::hm;

    fn cand(id: u32, distance: f64, arrival: NaiveTime, deadline: Option<NaiveTime>) -> Candidate {
        Candidate {
            package_id: id,
            leg: Leg {
                distance,
                destination: id as usize,
                fallback: false,
            },
            arrival,
            deadline,
        }
    }

    #[test]
    fn test_tiers() {
        assert_eq!(cand(1, 1.0, hm(9, 0), Some(hm(9, 0))).tier(), Tier::OnTime);
        assert_eq!(cand(1, 1.0, hm(9, 1), Some(hm(9, 0))).tier(), Tier::Late);
        assert_eq!(cand(1, 1.0, hm(9, 1), None).tier(), Tier::Unconstrained);
    }

    #[test]
    fn test_empty() {
        assert!(select(&[], &ScoringParams::default()).is_none());
    }

    #[test]
    fn test_on_time_beats_nearer_unconstrained() {
        let cs = [
            cand(1, 0.5, hm(8, 2), None),
            cand(2, 9.0, hm(8, 30), Some(hm(10, 30))),
        ];
        let (c, tier) = select(&cs, &ScoringParams::default()).expect("non-empty");
        assert_eq!((c.package_id, tier), (2, Tier::OnTime));
    }

    #[test]
    fn test_late_beats_unconstrained() {
        let cs = [
            cand(1, 0.5, hm(11, 2), None),
            cand(2, 9.0, hm(11, 30), Some(hm(10, 30))),
        ];
        let (c, tier) = select(&cs, &ScoringParams::default()).expect("non-empty");
        assert_eq!((c.package_id, tier), (2, Tier::Late));
    }

    #[test]
    fn test_late_tier_minimizes_lateness_then_distance() {
        let cs = [
            cand(4, 3.0, hm(11, 0), Some(hm(10, 30))),
            cand(5, 5.0, hm(11, 10), Some(hm(10, 50))),
            cand(6, 2.0, hm(10, 50), Some(hm(10, 20))),
        ];
        let (c, _) = select(&cs, &ScoringParams::default()).expect("non-empty");
        assert_eq!(c.package_id, 5);

        // 4 and 6 are both 30 minutes late; 6 is closer.
        let cs = [cs[0].clone(), cs[2].clone()];
        let (c, _) = select(&cs, &ScoringParams::default()).expect("non-empty");
        assert_eq!(c.package_id, 6);
    }

    #[test]
    fn test_unconstrained_nearest_then_lowest_id() {
        let cs = [
            cand(8, 2.0, hm(9, 0), None),
            cand(3, 2.0, hm(9, 0), None),
            cand(5, 4.0, hm(9, 0), None),
        ];
        let (c, _) = select(&cs, &ScoringParams::default()).expect("non-empty");
        assert_eq!(c.package_id, 3);
    }

    #[test]
    fn test_early_bonus_can_prefer_farther_stop() {
        // 12: 2.0 mi, arrives 08:06:40 with plenty of slack -> bonus.
        // 13: 1.9 mi, arrives 08:06:20 five minutes before its deadline -> no bonus.
        let far = cand(12, 2.0, hm(8, 0) + chrono::TimeDelta::seconds(400), Some(hm(10, 30)));
        let near = cand(13, 1.9, hm(8, 0) + chrono::TimeDelta::seconds(380), Some(hm(8, 11)));
        let params = ScoringParams::default();
        assert!(on_time_score(&far, &params) < on_time_score(&near, &params));
        let pool = [near, far];
        let (c, tier) = select(&pool, &params).expect("non-empty");
        assert_eq!((c.package_id, tier), (12, Tier::OnTime));
    }

    #[test]
    fn test_early_bonus_decides_between_same_stop() {
        // Same address, same leg and arrival; only the deadlines differ.
        let tight = cand(29, 2.0, hm(9, 0), Some(hm(9, 5)));
        let roomy = cand(30, 2.0, hm(9, 0), Some(hm(10, 30)));
        let cs = [tight, roomy];

        let (c, tier) = select(&cs, &ScoringParams::default()).expect("non-empty");
        assert_eq!((c.package_id, tier), (30, Tier::OnTime));

        let no_bonus = ScoringParams {
            early_bonus: 0.0,
            ..ScoringParams::default()
        };
        let (c, _) = select(&cs, &no_bonus).expect("non-empty");
        assert_eq!(c.package_id, 29);
    }

    #[test]
    fn test_on_time_tie_breaks_on_id() {
        let cs = [
            cand(21, 1.0, hm(9, 0), Some(hm(9, 5))),
            cand(20, 1.0, hm(9, 0), Some(hm(9, 5))),
        ];
        let (c, _) = select(&cs, &ScoringParams::default()).expect("non-empty");
        assert_eq!(c.package_id, 20);
    }

    #[test]
    fn test_priority_shave() {
        let params = ScoringParams {
            priority_packages: vec![25],
            ..ScoringParams::default()
        };
        let cs = [
            cand(24, 1.0, hm(9, 10), Some(hm(9, 15))),
            cand(25, 1.3, hm(9, 11), Some(hm(9, 15))),
        ];
        let (c, _) = select(&cs, &params).expect("non-empty");
        assert_eq!(c.package_id, 25);
        let (c, _) = select(&cs, &ScoringParams::default()).expect("non-empty");
        assert_eq!(c.package_id, 24);
    }
}
