/// A simulated clock yielding monotone tick times up to a horizon.
///
/// The `Clock` is the tick source that drives
/// [`SchedulingEngine::tick`](super::engine::SchedulingEngine::tick): it
/// starts at 0 ms and advances by a fixed `tick_ms` until the horizon is
/// passed.
///
/// # Examples
///
/// ```
/// use elevator_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(100, 300);
/// let mut times = Vec::new();
///
/// clock.run(|now| times.push(now));
/// assert_eq!(times, vec![0, 100, 200, 300]);
/// ```
#[derive(Debug, Clone)]
pub struct Clock {
    /// Next time to hand out, in milliseconds
    next: u64,
    /// Granularity of each tick
    tick_ms: u64,
    /// Last time (inclusive) the clock will yield
    horizon_ms: u64,
}

impl Clock {
    /// Creates a clock starting at 0 ms.
    ///
    /// # Arguments
    ///
    /// * `tick_ms` - Milliseconds between ticks, clamped to at least 1
    /// * `horizon_ms` - Last simulated time (inclusive) to yield
    pub fn new(tick_ms: u64, horizon_ms: u64) -> Self {
        Self {
            next: 0,
            tick_ms: tick_ms.max(1),
            horizon_ms,
        }
    }

    pub fn tick_ms(&self) -> u64 {
        self.tick_ms
    }

    /// Advances the clock by one tick.
    ///
    /// # Returns
    ///
    /// * `Some(now)` - The simulated time of this tick
    /// * `None` - If the horizon has been passed
    pub fn tick(&mut self) -> Option<u64> {
        if self.next <= self.horizon_ms {
            let now = self.next;
            self.next += self.tick_ms;
            Some(now)
        } else {
            None
        }
    }

    /// Runs a function for each remaining tick.
    ///
    /// # Arguments
    ///
    /// * `f` - A function that takes the simulated time of each tick
    pub fn run(&mut self, mut f: impl FnMut(u64)) {
        while let Some(now) = self.tick() {
            f(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clock() {
        let clock = Clock::new(250, 1_000);
        assert_eq!(clock.next, 0);
        assert_eq!(clock.tick_ms(), 250);
        assert_eq!(clock.horizon_ms, 1_000);
    }

    #[test]
    fn test_tick() {
        let mut clock = Clock::new(500, 1_000);
        assert_eq!(clock.tick(), Some(0));
        assert_eq!(clock.tick(), Some(500));
        assert_eq!(clock.tick(), Some(1_000));
        assert_eq!(clock.tick(), None);
    }

    #[test]
    fn test_horizon_between_ticks() {
        let mut clock = Clock::new(400, 1_000);
        let mut times = Vec::new();
        clock.run(|now| times.push(now));
        assert_eq!(times, vec![0, 400, 800]);
    }

    #[test]
    fn test_zero_tick_is_clamped() {
        let mut clock = Clock::new(0, 2);
        assert_eq!(clock.tick(), Some(0));
        assert_eq!(clock.tick(), Some(1));
    }

    #[test]
    fn test_zero_horizon() {
        let mut clock = Clock::new(100, 0);
        let mut calls = 0;
        clock.run(|_| calls += 1);
        assert_eq!(calls, 1);
    }
}
