//! Cabin selection heuristics for pending passenger requests.
//!
//! Both strategies first restrict the candidates to eligible cabins (in
//! service, with spare committed capacity) and then prefer cabins that are
//! already travelling toward the caller in the caller's direction.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cabin::Cabin;
use super::request::PassengerRequest;
use super::types::{CabinId, Direction};

/// Dispatch heuristic used for every request in a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStrategy {
    /// Nearest eligible cabin by floor distance.
    ClosestCabin,
    /// Fewest queued stops, then lowest onboard load.
    LeastStops,
}

impl DispatchStrategy {
    /// Names accepted by [`parse`](Self::parse), in declaration order.
    pub const NAMES: [&'static str; 2] = ["closest_cabin", "least_stops"];

    pub fn as_str(self) -> &'static str {
        match self {
            DispatchStrategy::ClosestCabin => "closest_cabin",
            DispatchStrategy::LeastStops => "least_stops",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "closest_cabin" => Some(DispatchStrategy::ClosestCabin),
            "least_stops" => Some(DispatchStrategy::LeastStops),
            _ => None,
        }
    }

    /// Picks the cabin that should serve `request`, or `None` when no cabin
    /// is eligible right now.
    ///
    /// Ties are broken by the lower cabin id, so selection is deterministic.
    pub fn select_cabin(&self, cabins: &[Cabin], request: &PassengerRequest) -> Option<CabinId> {
        let eligible = cabins.iter().filter(|c| is_eligible(c));
        match self {
            DispatchStrategy::ClosestCabin => eligible
                .min_by_key(|c| {
                    (
                        !is_en_route(c, request),
                        distance(c, request.source),
                        c.id(),
                    )
                })
                .map(Cabin::id),
            DispatchStrategy::LeastStops => eligible
                .min_by(|a, b| {
                    (!is_en_route(a, request))
                        .cmp(&!is_en_route(b, request))
                        .then_with(|| a.queued_stops().cmp(&b.queued_stops()))
                        .then_with(|| a.load_factor().total_cmp(&b.load_factor()))
                        .then_with(|| a.id().cmp(&b.id()))
                })
                .map(Cabin::id),
        }
    }
}

impl fmt::Display for DispatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In service and not yet committed to a full load.
pub fn is_eligible(cabin: &Cabin) -> bool {
    !cabin.is_suspended() && cabin.committed_load() < cabin.capacity()
}

/// `true` when the cabin already travels in the trip's direction and has not
/// passed the pickup floor.
pub fn is_en_route(cabin: &Cabin, request: &PassengerRequest) -> bool {
    let heading = cabin.direction();
    if heading == Direction::Idle || heading != request.direction() {
        return false;
    }
    match heading {
        Direction::Up => cabin.floor() <= request.source,
        Direction::Down => cabin.floor() >= request.source,
        Direction::Idle => false,
    }
}

fn distance(cabin: &Cabin, floor: i32) -> u32 {
    (cabin.floor() - floor).unsigned_abs()
}
