//! Seeded random passenger traffic.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// One hall call to submit at a given simulated time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledCall {
    pub at_ms: u64,
    pub source: i32,
    pub destination: i32,
    pub priority: u8,
}

/// Poisson-like call arrivals with a bias toward trips leaving the lobby.
///
/// Inter-arrival gaps are exponentially distributed around
/// `mean_interval_ms`. With probability `lobby_bias` a call starts at the
/// lobby; otherwise source and destination are drawn uniformly. A fraction
/// `priority_call_ratio` of calls carries priority 1.
///
/// The same seed always yields the same call sequence.
#[derive(Debug, Clone)]
pub struct TrafficGenerator {
    floor_count: i32,
    lobby: i32,
    mean_interval_ms: f64,
    lobby_bias: f64,
    priority_call_ratio: f64,
    clock_ms: u64,
    rng: StdRng,
}

impl TrafficGenerator {
    /// Creates a generator whose first call arrives after one random gap.
    ///
    /// # Arguments
    ///
    /// * `floor_count` - Floors in the building (must be >= 2)
    /// * `lobby` - Floor that biased calls start from
    /// * `mean_interval_ms` - Mean time between calls (must be > 0)
    /// * `lobby_bias` - Probability in `[0, 1]` of a lobby departure
    /// * `priority_call_ratio` - Probability in `[0, 1]` of a priority call
    /// * `seed` - Random seed for reproducible traffic
    ///
    /// # Panics
    ///
    /// Panics if the building has fewer than two floors, the lobby is not one
    /// of them, the mean interval is zero, or a probability is out of range.
    pub fn new(
        floor_count: i32,
        lobby: i32,
        mean_interval_ms: u64,
        lobby_bias: f64,
        priority_call_ratio: f64,
        seed: u64,
    ) -> Self {
        assert!(floor_count >= 2);
        assert!((0..floor_count).contains(&lobby));
        assert!(mean_interval_ms > 0);
        assert!((0.0..=1.0).contains(&lobby_bias));
        assert!((0.0..=1.0).contains(&priority_call_ratio));

        Self {
            floor_count,
            lobby,
            mean_interval_ms: mean_interval_ms as f64,
            lobby_bias,
            priority_call_ratio,
            clock_ms: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Samples the next call, strictly later than the previous one.
    pub fn next_call(&mut self) -> ScheduledCall {
        // 1 - u lies in (0, 1], so the logarithm is finite
        let u: f64 = self.rng.random();
        let gap = (-(1.0 - u).ln() * self.mean_interval_ms).round() as u64;
        self.clock_ms += gap.max(1);

        let source = if self.rng.random::<f64>() < self.lobby_bias {
            self.lobby
        } else {
            self.rng.random_range(0..self.floor_count)
        };
        let destination = self.other_floor(source);
        let priority = u8::from(self.rng.random::<f64>() < self.priority_call_ratio);

        ScheduledCall {
            at_ms: self.clock_ms,
            source,
            destination,
            priority,
        }
    }

    /// All calls arriving at or before `duration_ms`, in time order.
    pub fn generate(&mut self, duration_ms: u64) -> Vec<ScheduledCall> {
        let mut calls = Vec::new();
        loop {
            let call = self.next_call();
            if call.at_ms > duration_ms {
                break;
            }
            calls.push(call);
        }
        calls
    }

    fn other_floor(&mut self, floor: i32) -> i32 {
        let pick = self.rng.random_range(0..self.floor_count - 1);
        if pick >= floor { pick + 1 } else { pick }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_traffic() {
        let a = TrafficGenerator::new(10, 0, 5_000, 0.5, 0.1, 42).generate(600_000);
        let b = TrafficGenerator::new(10, 0, 5_000, 0.5, 0.1, 42).generate(600_000);
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn calls_are_valid_and_time_ordered() {
        let calls = TrafficGenerator::new(7, 0, 2_000, 0.3, 0.2, 9).generate(300_000);
        assert!(calls.windows(2).all(|w| w[0].at_ms < w[1].at_ms));
        for call in &calls {
            assert!((0..7).contains(&call.source));
            assert!((0..7).contains(&call.destination));
            assert_ne!(call.source, call.destination);
            assert!(call.priority <= 1);
            assert!(call.at_ms <= 300_000);
        }
    }

    #[test]
    fn full_lobby_bias_starts_every_call_at_lobby() {
        let calls = TrafficGenerator::new(12, 0, 1_000, 1.0, 0.0, 3).generate(60_000);
        assert!(calls.iter().all(|c| c.source == 0 && c.priority == 0));
    }

    #[test]
    fn mean_interval_roughly_holds() {
        let calls = TrafficGenerator::new(10, 0, 1_000, 0.0, 0.0, 1).generate(2_000_000);
        // about 2000 arrivals expected
        assert!((1_500..2_500).contains(&calls.len()), "got {}", calls.len());
    }

    #[test]
    #[should_panic]
    fn rejects_lobby_outside_building() {
        TrafficGenerator::new(5, 5, 1_000, 0.5, 0.0, 0);
    }
}
