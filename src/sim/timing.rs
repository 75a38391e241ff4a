//! Overlapping deadlines for one cabin, expressed in simulated milliseconds.

/// Tracks the door-open, passenger-activity and composite action deadlines
/// of a single cabin.
///
/// The composite ("next action") deadline is what the FSM waits on. While
/// the doors are open it is kept at `max(door_open_until, activity_until)`,
/// so a single check gates the close transition.
///
/// Time never advances on its own: every method takes `now` from the caller.
///
/// # Examples
///
/// ```
/// use elevator_sim::sim::timing::TimingManager;
///
/// let mut timing = TimingManager::new();
/// timing.open_doors(1_000, 2_000);
/// timing.extend_activity(1_000, 1_500);
/// timing.extend_activity(1_000, 1_500);
/// // two boarders stack sequentially past the base door-open window
/// assert_eq!(timing.action_until(), Some(4_000));
/// assert!(!timing.door_window_elapsed(3_500));
/// assert!(timing.door_window_elapsed(4_000));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimingManager {
    door_open_until: Option<u64>,
    activity_until: Option<u64>,
    action_until: Option<u64>,
    paused_at: Option<u64>,
}

impl TimingManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn door_open_until(&self) -> Option<u64> {
        self.door_open_until
    }

    pub fn activity_until(&self) -> Option<u64> {
        self.activity_until
    }

    pub fn action_until(&self) -> Option<u64> {
        self.action_until
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Arms the composite deadline for a single micro-action (travel, door
    /// movement).
    pub fn arm_action(&mut self, deadline: u64) {
        self.action_until = Some(deadline);
    }

    /// Returns `true` while the current micro-action is still running.
    pub fn is_busy(&self, now: u64) -> bool {
        if self.paused_at.is_some() {
            return true;
        }
        self.action_until.is_some_and(|until| now < until)
    }

    /// Clears the composite deadline once it has elapsed.
    pub fn clear_elapsed_action(&mut self, now: u64) {
        if self.paused_at.is_none() && self.action_until.is_some_and(|until| now >= until) {
            self.action_until = None;
        }
    }

    /// Milliseconds left on the composite deadline, zero when none is armed.
    pub fn remaining_action(&self, now: u64) -> u64 {
        let reference = self.paused_at.unwrap_or(now);
        self.action_until
            .map_or(0, |until| until.saturating_sub(reference))
    }

    /// Starts the base door-open window.
    pub fn open_doors(&mut self, now: u64, door_open_ms: u64) {
        self.door_open_until = Some(now + door_open_ms);
        self.recompose();
    }

    /// Adds one passenger's boarding or alighting time.
    ///
    /// Durations stack sequentially: each starts at the later of `now` and
    /// the current activity deadline. Time is frozen while paused, so an
    /// extension added during a pause starts at the pause instant and is
    /// shifted by [`resume`](Self::resume) like every other deadline.
    pub fn extend_activity(&mut self, now: u64, per_person_ms: u64) -> u64 {
        let reference = self.paused_at.unwrap_or(now);
        let start = self
            .activity_until
            .map_or(reference, |until| until.max(reference));
        let until = start + per_person_ms;
        self.activity_until = Some(until);
        self.recompose();
        until
    }

    /// `true` once both the base door window and passenger activity elapsed.
    pub fn door_window_elapsed(&self, now: u64) -> bool {
        if self.paused_at.is_some() {
            return false;
        }
        let door_done = self.door_open_until.is_none_or(|until| now >= until);
        let activity_done = self.activity_until.is_none_or(|until| now >= until);
        door_done && activity_done
    }

    /// Drops the door and activity deadlines once the doors start closing.
    pub fn close_doors(&mut self) {
        self.door_open_until = None;
        self.activity_until = None;
    }

    /// Freezes every deadline at `now`.
    pub fn pause(&mut self, now: u64) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    /// Shifts every armed deadline forward by the paused duration.
    pub fn resume(&mut self, now: u64) {
        let Some(paused_at) = self.paused_at.take() else {
            return;
        };
        let shift = now.saturating_sub(paused_at);
        for deadline in [
            &mut self.door_open_until,
            &mut self.activity_until,
            &mut self.action_until,
        ] {
            if let Some(until) = deadline.as_mut() {
                *until += shift;
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn recompose(&mut self) {
        let composite = match (self.door_open_until, self.activity_until) {
            (Some(door), Some(activity)) => Some(door.max(activity)),
            (door, activity) => door.or(activity),
        };
        if let Some(until) = composite {
            self.action_until = Some(self.action_until.map_or(until, |a| a.max(until)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_deadline_gates_busy() {
        let mut t = TimingManager::new();
        assert!(!t.is_busy(0));
        t.arm_action(1_000);
        assert!(t.is_busy(999));
        assert!(!t.is_busy(1_000));
        t.clear_elapsed_action(500);
        assert_eq!(t.action_until(), Some(1_000));
        t.clear_elapsed_action(1_000);
        assert_eq!(t.action_until(), None);
    }

    #[test]
    fn activity_stacks_from_now_when_idle() {
        let mut t = TimingManager::new();
        assert_eq!(t.extend_activity(5_000, 1_000), 6_000);
        // later boarder after the first finished starts from now
        assert_eq!(t.extend_activity(7_000, 1_000), 8_000);
    }

    #[test]
    fn composite_never_below_component_deadlines() {
        let mut t = TimingManager::new();
        t.open_doors(0, 2_000);
        assert_eq!(t.action_until(), Some(2_000));
        t.extend_activity(0, 500);
        assert_eq!(t.action_until(), Some(2_000));
        t.extend_activity(0, 2_000);
        let composite = t.action_until().unwrap_or(0);
        assert!(composite >= t.door_open_until().unwrap_or(0));
        assert!(composite >= t.activity_until().unwrap_or(0));
        assert_eq!(composite, 2_500);
    }

    #[test]
    fn late_boarder_keeps_doors_open() {
        let mut t = TimingManager::new();
        t.open_doors(0, 2_000);
        t.extend_activity(1_900, 1_000);
        assert!(!t.door_window_elapsed(2_000));
        assert!(t.door_window_elapsed(2_900));
    }

    #[test]
    fn pause_and_resume_shift_deadlines() {
        let mut t = TimingManager::new();
        t.open_doors(0, 2_000);
        t.pause(1_000);
        assert!(t.is_paused());
        assert!(!t.door_window_elapsed(5_000));
        assert_eq!(t.remaining_action(5_000), 1_000);
        t.resume(4_000);
        assert_eq!(t.door_open_until(), Some(5_000));
        assert_eq!(t.action_until(), Some(5_000));
        assert!(t.door_window_elapsed(5_000));
    }

    #[test]
    fn activity_added_while_paused_starts_at_pause() {
        let mut t = TimingManager::new();
        t.open_doors(0, 2_000);
        t.pause(0);
        assert_eq!(t.extend_activity(5_000, 1_000), 1_000);
        t.resume(10_000);
        assert_eq!(t.activity_until(), Some(11_000));
        assert_eq!(t.door_open_until(), Some(12_000));
        assert_eq!(t.action_until(), Some(12_000));
        assert!(!t.door_window_elapsed(11_999));
        assert!(t.door_window_elapsed(12_000));
    }

    #[test]
    fn clear_resets_everything() {
        let mut t = TimingManager::new();
        t.open_doors(0, 2_000);
        t.pause(10);
        t.clear();
        assert_eq!(t, TimingManager::new());
    }
}
