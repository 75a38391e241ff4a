//! Per-cabin finite-state machine: motion, doors, and passengers.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::request::{PassengerRequest, RequestId, RequestStatus};
use super::stop_queue::StopPlan;
use super::timing::TimingManager;
use super::types::{
    BuildingConfig, CabinId, CabinSnapshot, CabinState, Direction, DoorState, Timing,
};

/// Something a cabin reports back to its engine during [`Cabin::update`].
///
/// Requests travel inside the event when their ownership moves back to the
/// engine (completed, or bounced for re-dispatch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CabinEvent {
    /// The cabin stopped at `floor` to serve a queued stop.
    StopServed { cabin: CabinId, floor: i32, at: u64 },
    /// A waiting passenger stepped aboard.
    Boarded {
        cabin: CabinId,
        request: RequestId,
        at: u64,
    },
    /// A passenger reached their destination.
    Alighted(PassengerRequest),
    /// Boarding failed; the request is pending again.
    Rejected(PassengerRequest),
}

/// One elevator car.
///
/// All mutation goes through the FSM operations below. The cabin owns its
/// onboard passengers and the requests assigned to it that have not boarded
/// yet.
#[derive(Debug, Clone)]
pub struct Cabin {
    id: CabinId,
    initial_floor: i32,
    floor_count: i32,
    capacity: usize,
    timing_config: Timing,

    floor: i32,
    direction: Direction,
    state: CabinState,
    door: DoorState,
    passengers: Vec<PassengerRequest>,
    assigned: Vec<PassengerRequest>,
    stops: StopPlan,
    /// Floors pressed on the in-cabin panel and not served yet.
    panel_stops: BTreeSet<i32>,
    segment_target: Option<i32>,
    timing: TimingManager,
}

impl Cabin {
    /// Creates an idle cabin with closed doors on the building's initial floor.
    pub fn new(id: CabinId, config: &BuildingConfig) -> Self {
        Self {
            id,
            initial_floor: config.initial_floor,
            floor_count: config.floor_count,
            capacity: config.capacity,
            timing_config: config.timing,
            floor: config.initial_floor,
            direction: Direction::Idle,
            state: CabinState::Idle,
            door: DoorState::Closed,
            passengers: Vec::new(),
            assigned: Vec::new(),
            stops: StopPlan::new(),
            panel_stops: BTreeSet::new(),
            segment_target: None,
            timing: TimingManager::new(),
        }
    }

    pub fn id(&self) -> CabinId {
        self.id
    }

    pub fn floor(&self) -> i32 {
        self.floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn state(&self) -> CabinState {
        self.state
    }

    pub fn door(&self) -> DoorState {
        self.door
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn timing_config(&self) -> &Timing {
        &self.timing_config
    }

    pub fn timing(&self) -> &TimingManager {
        &self.timing
    }

    pub fn stops(&self) -> &StopPlan {
        &self.stops
    }

    pub fn segment_target(&self) -> Option<i32> {
        self.segment_target
    }

    /// Onboard passengers, in boarding order.
    pub fn passengers(&self) -> &[PassengerRequest] {
        &self.passengers
    }

    /// Requests assigned to this cabin that are still waiting for pickup.
    pub fn assigned(&self) -> &[PassengerRequest] {
        &self.assigned
    }

    pub fn queued_stops(&self) -> usize {
        self.stops.len()
    }

    /// Onboard passengers plus assigned pickups.
    pub fn committed_load(&self) -> usize {
        self.passengers.len() + self.assigned.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.passengers.len() as f64 / self.capacity as f64
    }

    pub fn is_suspended(&self) -> bool {
        self.state.is_suspended()
    }

    /// `true` when nothing is aboard, assigned, queued or in progress.
    pub fn is_at_rest(&self) -> bool {
        self.state == CabinState::Idle
            && self.passengers.is_empty()
            && self.assigned.is_empty()
            && self.stops.is_empty()
    }

    pub fn snapshot(&self) -> CabinSnapshot {
        CabinSnapshot {
            id: self.id,
            floor: self.floor,
            direction: self.direction,
            state: self.state,
            door: self.door,
            passenger_count: self.passengers.len(),
            capacity: self.capacity,
            queued_stops: self.stops.len(),
        }
    }

    /// Direction the cabin is physically travelling in right now.
    fn heading(&self) -> Direction {
        if self.state.is_moving() {
            self.direction
        } else {
            Direction::Idle
        }
    }

    fn doors_serving_here(&self) -> bool {
        matches!(
            self.state,
            CabinState::StoppedAtFloor | CabinState::DoorOpening | CabinState::DoorOpen
        )
    }

    /// Queues a stop at `floor`.
    ///
    /// Returns `false` when the floor is already queued, when the cabin is
    /// already stopped there with its doors opening or open, or when the
    /// cabin is suspended.
    pub fn add_stop(&mut self, floor: i32) -> bool {
        if self.is_suspended() {
            debug!(cabin = self.id, floor, "stop ignored, cabin suspended");
            return false;
        }
        if floor == self.floor && self.doors_serving_here() {
            return false;
        }
        debug_assert!((0..self.floor_count).contains(&floor));
        self.stops.insert(floor, self.floor, self.heading())
    }

    /// In-cabin panel press. The floor stays needed until the cabin serves
    /// it, even if every request for that floor is withdrawn.
    pub fn press_panel(&mut self, floor: i32) -> bool {
        let queued = self.add_stop(floor);
        if self.stops.contains(floor) {
            self.panel_stops.insert(floor);
        }
        queued
    }

    /// Takes ownership of a dispatched request and queues its pickup floor.
    pub fn assign(&mut self, mut request: PassengerRequest, now: u64) {
        request.assign(self.id, now);
        self.add_stop(request.source);
        self.assigned.push(request);
    }

    /// Boards `request` while the doors are open.
    ///
    /// # Errors
    ///
    /// Hands the request back, reverted to `PendingAssignment` with its
    /// assignment cleared, when the doors are not open, the cabin is not at
    /// the request's source floor, or the cabin is full.
    pub fn board(
        &mut self,
        mut request: PassengerRequest,
        now: u64,
    ) -> Result<(), Box<PassengerRequest>> {
        if self.door != DoorState::Open
            || request.source != self.floor
            || self.passengers.len() >= self.capacity
        {
            request.revert_to_pending();
            return Err(Box::new(request));
        }
        if request.status == RequestStatus::PendingAssignment {
            request.assign(self.id, now);
        }
        request.board(now);
        self.timing
            .extend_activity(now, self.timing_config.boarding_ms);
        self.add_destination(request.destination);
        self.passengers.push(request);
        Ok(())
    }

    fn add_destination(&mut self, floor: i32) {
        if floor != self.floor {
            self.stops.insert(floor, self.floor, self.heading());
        }
    }

    /// Withdraws an assigned, not yet boarded request.
    ///
    /// Its pickup stop is dropped unless another passenger still needs that
    /// floor.
    pub fn withdraw(&mut self, id: RequestId) -> Option<PassengerRequest> {
        let index = self.assigned.iter().position(|r| r.id == id)?;
        let request = self.assigned.remove(index);
        if !self.floor_needed(request.source) {
            self.stops.consume(request.source);
        }
        Some(request)
    }

    fn floor_needed(&self, floor: i32) -> bool {
        self.panel_stops.contains(&floor)
            || self.assigned.iter().any(|r| r.source == floor)
            || self.passengers.iter().any(|p| p.destination == floor)
    }

    /// Advances the FSM to `now`.
    pub fn update(&mut self, now: u64) -> Vec<CabinEvent> {
        let mut events = Vec::new();
        if self.is_suspended() {
            return events;
        }
        self.timing.clear_elapsed_action(now);
        let before = self.state;

        match self.state {
            CabinState::Idle => self.resolve_and_depart(now, &mut events),
            CabinState::MovingUp | CabinState::MovingDown => {
                if !self.timing.is_busy(now) {
                    self.arrive_at_next_floor(now, &mut events);
                }
            }
            CabinState::StoppedAtFloor => self.begin_door_opening(now),
            CabinState::DoorOpening => {
                if !self.timing.is_busy(now) {
                    self.finish_door_opening(now, &mut events);
                }
            }
            CabinState::DoorOpen => {
                self.board_waiting(now, &mut events);
                if self.timing.door_window_elapsed(now) {
                    self.begin_door_closing(now);
                }
            }
            CabinState::DoorClosing => {
                if !self.timing.is_busy(now) {
                    self.door = DoorState::Closed;
                    self.resolve_and_depart(now, &mut events);
                }
            }
            CabinState::Maintenance | CabinState::OutOfService | CabinState::EmergencyStop => {}
        }

        if self.state != before {
            debug!(
                cabin = self.id,
                floor = self.floor,
                from = %before,
                to = %self.state,
                "cabin transition"
            );
        }
        events
    }

    fn resolve_and_depart(&mut self, now: u64, events: &mut Vec<CabinEvent>) {
        let mut direction = self.direction;
        match self.stops.next_target(self.floor, &mut direction) {
            None => {
                self.state = CabinState::Idle;
                self.direction = Direction::Idle;
                self.segment_target = None;
            }
            Some(target) if target == self.floor => {
                self.direction = direction;
                self.serve_here(now, events);
            }
            Some(target) => {
                let direction = Direction::between(self.floor, target);
                self.direction = direction;
                self.state = match direction {
                    Direction::Up => CabinState::MovingUp,
                    _ => CabinState::MovingDown,
                };
                self.segment_target = Some(target);
                self.timing
                    .arm_action(now + self.timing_config.floor_travel_ms);
            }
        }
    }

    fn arrive_at_next_floor(&mut self, now: u64, events: &mut Vec<CabinEvent>) {
        let next = self.floor + self.direction.step();
        let in_shaft = self.direction != Direction::Idle && (0..self.floor_count).contains(&next);
        debug_assert!(in_shaft, "cabin {} travelled off the shaft", self.id);
        if !in_shaft {
            self.degrade_to_idle();
            return;
        }
        self.floor = next;

        let queued_here = self
            .stops
            .queue_for(self.direction)
            .and_then(|q| q.peek_nearest())
            == Some(self.floor);
        let destination_here = self.passengers.iter().any(|p| p.destination == self.floor);

        if queued_here || destination_here {
            self.serve_here(now, events);
        } else {
            self.resolve_and_depart(now, events);
        }
    }

    fn serve_here(&mut self, now: u64, events: &mut Vec<CabinEvent>) {
        self.stops.consume(self.floor);
        self.panel_stops.remove(&self.floor);
        self.state = CabinState::StoppedAtFloor;
        events.push(CabinEvent::StopServed {
            cabin: self.id,
            floor: self.floor,
            at: now,
        });
    }

    fn begin_door_opening(&mut self, now: u64) {
        self.state = CabinState::DoorOpening;
        self.door = DoorState::Opening;
        self.segment_target = None;
        self.timing
            .arm_action(now + self.timing_config.door_transition_ms);
    }

    fn finish_door_opening(&mut self, now: u64, events: &mut Vec<CabinEvent>) {
        self.state = CabinState::DoorOpen;
        self.door = DoorState::Open;

        let floor = self.floor;
        let (leaving, staying): (Vec<_>, Vec<_>) = std::mem::take(&mut self.passengers)
            .into_iter()
            .partition(|p| p.destination == floor);
        self.passengers = staying;
        for mut passenger in leaving {
            self.timing
                .extend_activity(now, self.timing_config.boarding_ms);
            passenger.alight(now);
            events.push(CabinEvent::Alighted(passenger));
        }

        self.timing.open_doors(now, self.timing_config.door_open_ms);
        self.board_waiting(now, events);
    }

    fn board_waiting(&mut self, now: u64, events: &mut Vec<CabinEvent>) {
        let floor = self.floor;
        if !self.assigned.iter().any(|r| r.source == floor) {
            return;
        }
        let (boarding, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.assigned)
            .into_iter()
            .partition(|r| r.source == floor);
        self.assigned = waiting;

        for request in boarding {
            let id = request.id;
            match self.board(request, now) {
                Ok(()) => events.push(CabinEvent::Boarded {
                    cabin: self.id,
                    request: id,
                    at: now,
                }),
                Err(request) => {
                    warn!(cabin = self.id, request = id, "cabin full, request back to pending");
                    events.push(CabinEvent::Rejected(*request));
                }
            }
        }
    }

    fn begin_door_closing(&mut self, now: u64) {
        self.state = CabinState::DoorClosing;
        self.door = DoorState::Closing;
        self.timing.close_doors();
        self.timing
            .arm_action(now + self.timing_config.door_transition_ms);
    }

    fn degrade_to_idle(&mut self) {
        self.state = CabinState::Idle;
        self.direction = Direction::Idle;
        self.door = DoorState::Closed;
        self.segment_target = None;
        self.timing.clear();
    }

    /// Puts the cabin into an externally controlled suspended state.
    ///
    /// Both stop queues and all timers are cleared. Assigned pickups go back
    /// to pending. Maintenance and out-of-service also empty the cabin:
    /// passengers step out at the current floor and their trips restart from
    /// there (or complete, if this already was their floor). An emergency stop
    /// keeps passengers aboard until service is restored.
    ///
    /// Returns every request whose ownership moves back to the engine.
    pub fn suspend(&mut self, state: CabinState, now: u64) -> Vec<PassengerRequest> {
        debug_assert!(state.is_suspended());
        let mut released: Vec<PassengerRequest> = self
            .assigned
            .drain(..)
            .map(|mut r| {
                r.revert_to_pending();
                r
            })
            .collect();

        if state != CabinState::EmergencyStop {
            let floor = self.floor;
            for mut passenger in self.passengers.drain(..) {
                if passenger.destination == floor {
                    passenger.alight(now);
                } else {
                    passenger.evict_at(floor);
                }
                released.push(passenger);
            }
        }

        self.degrade_to_idle();
        self.stops.clear();
        self.panel_stops.clear();
        self.state = state;
        released
    }

    /// Leaves a suspended state; onboard passengers' destinations are queued
    /// again. Returns `false` if the cabin was not suspended.
    pub fn restore(&mut self) -> bool {
        if !self.is_suspended() {
            return false;
        }
        self.degrade_to_idle();
        for passenger in &self.passengers {
            self.stops
                .insert(passenger.destination, self.floor, Direction::Idle);
        }
        true
    }

    /// Holds the doors open (door-open button). Only valid while `DoorOpen`.
    pub fn hold_doors(&mut self, now: u64) -> bool {
        if self.state != CabinState::DoorOpen {
            return false;
        }
        self.timing.pause(now);
        true
    }

    /// Releases a door hold; the door timers resume where they stopped.
    pub fn release_doors(&mut self, now: u64) -> bool {
        if !self.timing.is_paused() {
            return false;
        }
        self.timing.resume(now);
        true
    }

    /// Returns the cabin to its initial floor and state, dropping everything
    /// it carried.
    pub fn reset(&mut self) {
        self.floor = self.initial_floor;
        self.degrade_to_idle();
        self.passengers.clear();
        self.assigned.clear();
        self.stops.clear();
        self.panel_stops.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::dispatch::DispatchStrategy;

    fn config(capacity: usize) -> BuildingConfig {
        let timing = Timing {
            floor_travel_ms: 1000,
            door_transition_ms: 500,
            door_open_ms: 2000,
            boarding_ms: 1000,
            tick_ms: 100,
        };
        BuildingConfig::new(10, 1, capacity, 0, timing, DispatchStrategy::ClosestCabin)
            .expect("valid config")
    }

    /// Ticks every 100 ms until `done` holds, returning the time reached.
    fn run_until(cabin: &mut Cabin, start: u64, done: impl Fn(&Cabin) -> bool) -> u64 {
        let mut now = start;
        for _ in 0..10_000 {
            if done(cabin) {
                return now;
            }
            now += 100;
            cabin.update(now);
        }
        panic!("cabin never reached the expected state");
    }

    fn open_doors_here(cabin: &mut Cabin) -> u64 {
        let floor = cabin.floor();
        cabin.add_stop(floor);
        run_until(cabin, 0, |c| c.state() == CabinState::DoorOpen)
    }

    #[test]
    fn new_cabin_is_idle_with_closed_doors() {
        let cabin = Cabin::new(0, &config(4));
        assert_eq!(cabin.state(), CabinState::Idle);
        assert_eq!(cabin.door(), DoorState::Closed);
        assert_eq!(cabin.direction(), Direction::Idle);
        assert!(cabin.is_at_rest());
    }

    #[test]
    fn idle_cabin_departs_and_stops_at_target() {
        let mut cabin = Cabin::new(0, &config(4));
        cabin.add_stop(2);
        let events = cabin.update(0);
        assert!(events.is_empty());
        assert_eq!(cabin.state(), CabinState::MovingUp);
        assert_eq!(cabin.segment_target(), Some(2));

        cabin.update(1000);
        assert_eq!(cabin.floor(), 1);
        assert_eq!(cabin.state(), CabinState::MovingUp);

        let events = cabin.update(2000);
        assert_eq!(cabin.floor(), 2);
        assert_eq!(cabin.state(), CabinState::StoppedAtFloor);
        assert_eq!(
            events,
            vec![CabinEvent::StopServed {
                cabin: 0,
                floor: 2,
                at: 2000
            }]
        );

        cabin.update(2100);
        assert_eq!(cabin.state(), CabinState::DoorOpening);
        assert_eq!(cabin.segment_target(), None);
        cabin.update(2600);
        assert_eq!(cabin.state(), CabinState::DoorOpen);
        assert_eq!(cabin.door(), DoorState::Open);
        cabin.update(4600);
        assert_eq!(cabin.state(), CabinState::DoorClosing);
        cabin.update(5100);
        assert_eq!(cabin.state(), CabinState::Idle);
        assert_eq!(cabin.door(), DoorState::Closed);
    }

    #[test]
    fn stop_at_current_floor_opens_doors_without_moving() {
        let mut cabin = Cabin::new(0, &config(4));
        cabin.add_stop(0);
        cabin.update(0);
        assert_eq!(cabin.state(), CabinState::StoppedAtFloor);
        assert_eq!(cabin.floor(), 0);
    }

    #[test]
    fn scan_services_current_direction_before_reversing() {
        let mut cabin = Cabin::new(0, &config(4));
        cabin.add_stop(5);
        cabin.update(0);
        cabin.update(1000);
        cabin.update(2000);
        assert_eq!(cabin.floor(), 2);
        // a call behind and a call ahead arrive mid-travel
        cabin.add_stop(1);
        cabin.add_stop(7);

        let mut served = Vec::new();
        let mut now = 2000;
        while served.len() < 3 && now < 60_000 {
            now += 100;
            for event in cabin.update(now) {
                if let CabinEvent::StopServed { floor, .. } = event {
                    served.push(floor);
                }
            }
        }
        assert_eq!(served, vec![5, 7, 1]);
    }

    #[test]
    fn passenger_boards_and_alights() {
        let mut cabin = Cabin::new(0, &config(4));
        let request = PassengerRequest::new(1, 0, 3, 0, 0);
        cabin.assign(request, 0);
        assert_eq!(cabin.assigned().len(), 1);

        let mut boarded = false;
        let mut completed = None;
        let mut now = 0;
        while completed.is_none() && now < 60_000 {
            for event in cabin.update(now) {
                match event {
                    CabinEvent::Boarded { request, .. } => {
                        assert_eq!(request, 1);
                        boarded = true;
                    }
                    CabinEvent::Alighted(r) => completed = Some(r),
                    _ => {}
                }
            }
            now += 100;
        }
        assert!(boarded);
        let completed = completed.expect("passenger should arrive");
        assert_eq!(completed.status, RequestStatus::Completed);
        assert_eq!(completed.cabin, Some(0));
        assert!(cabin.passengers().is_empty());
    }

    #[test]
    fn full_cabin_rejects_boarding_and_reverts_request() {
        let mut cabin = Cabin::new(0, &config(1));
        open_doors_here(&mut cabin);

        let mut first = PassengerRequest::new(1, 0, 5, 0, 0);
        first.assign(0, 0);
        assert!(cabin.board(first, 3000).is_ok());
        assert_eq!(cabin.passengers().len(), 1);

        let mut second = PassengerRequest::new(2, 0, 6, 0, 0);
        second.assign(0, 0);
        let rejected = cabin.board(second, 3000).expect_err("cabin is full");
        assert_eq!(rejected.status, RequestStatus::PendingAssignment);
        assert_eq!(rejected.cabin, None);
        assert_eq!(cabin.passengers().len(), 1);
    }

    #[test]
    fn boarding_with_doors_closed_is_rejected() {
        let mut cabin = Cabin::new(0, &config(4));
        let mut r = PassengerRequest::new(1, 0, 5, 0, 0);
        r.assign(0, 0);
        assert!(cabin.board(r, 0).is_err());
    }

    #[test]
    fn boarders_extend_door_window() {
        let mut cabin = Cabin::new(0, &config(8));
        let opened_at = open_doors_here(&mut cabin);
        for id in 1..=3 {
            let mut r = PassengerRequest::new(id, 0, 4, 0, 0);
            r.assign(0, 0);
            assert!(cabin.board(r, opened_at).is_ok());
        }
        // three boarders at 1000 ms each outlast the 2000 ms door window
        cabin.update(opened_at + 2000);
        assert_eq!(cabin.state(), CabinState::DoorOpen);
        cabin.update(opened_at + 3000);
        assert_eq!(cabin.state(), CabinState::DoorClosing);
    }

    #[test]
    fn new_call_during_door_closing_reopens_at_same_floor() {
        let mut cabin = Cabin::new(0, &config(4));
        let opened_at = open_doors_here(&mut cabin);
        cabin.update(opened_at + 2000);
        assert_eq!(cabin.state(), CabinState::DoorClosing);
        assert!(cabin.add_stop(0));
        cabin.update(opened_at + 2500);
        assert_eq!(cabin.state(), CabinState::StoppedAtFloor);
    }

    #[test]
    fn add_stop_is_ignored_while_doors_open_here() {
        let mut cabin = Cabin::new(0, &config(4));
        open_doors_here(&mut cabin);
        assert!(!cabin.add_stop(0));
        assert!(cabin.add_stop(4));
    }

    #[test]
    fn maintenance_empties_cabin_and_clears_queues() {
        let mut cabin = Cabin::new(0, &config(4));
        let opened_at = open_doors_here(&mut cabin);
        let mut r = PassengerRequest::new(1, 0, 6, 0, 0);
        r.assign(0, 0);
        assert!(cabin.board(r, opened_at).is_ok());
        cabin.assign(PassengerRequest::new(2, 3, 1, 0, 0), opened_at);

        let released = cabin.suspend(CabinState::Maintenance, opened_at + 100);
        assert_eq!(released.len(), 2);
        assert!(
            released
                .iter()
                .all(|r| r.status == RequestStatus::PendingAssignment && r.cabin.is_none())
        );
        assert!(cabin.passengers().is_empty());
        assert_eq!(cabin.queued_stops(), 0);
        assert_eq!(cabin.state(), CabinState::Maintenance);
        assert_eq!(cabin.timing(), &TimingManager::new());

        // suspended cabins ignore ticks and stops
        assert!(cabin.update(opened_at + 10_000).is_empty());
        assert!(!cabin.add_stop(5));
        assert_eq!(cabin.state(), CabinState::Maintenance);
    }

    #[test]
    fn emergency_stop_keeps_passengers_and_requeues_on_restore() {
        let mut cabin = Cabin::new(0, &config(4));
        let opened_at = open_doors_here(&mut cabin);
        let mut r = PassengerRequest::new(1, 0, 6, 0, 0);
        r.assign(0, 0);
        assert!(cabin.board(r, opened_at).is_ok());

        let released = cabin.suspend(CabinState::EmergencyStop, opened_at);
        assert!(released.is_empty());
        assert_eq!(cabin.passengers().len(), 1);
        assert_eq!(cabin.queued_stops(), 0);

        assert!(cabin.restore());
        assert_eq!(cabin.state(), CabinState::Idle);
        assert!(cabin.stops().contains(6));
        assert!(!cabin.restore());
    }

    #[test]
    fn held_doors_stay_open_until_released() {
        let mut cabin = Cabin::new(0, &config(4));
        let opened_at = open_doors_here(&mut cabin);
        assert!(cabin.hold_doors(opened_at + 1000));
        cabin.update(opened_at + 10_000);
        assert_eq!(cabin.state(), CabinState::DoorOpen);
        assert!(cabin.release_doors(opened_at + 10_000));
        cabin.update(opened_at + 10_999);
        assert_eq!(cabin.state(), CabinState::DoorOpen);
        cabin.update(opened_at + 11_000);
        assert_eq!(cabin.state(), CabinState::DoorClosing);
    }

    #[test]
    fn withdraw_drops_unneeded_pickup_stop() {
        let mut cabin = Cabin::new(0, &config(4));
        cabin.assign(PassengerRequest::new(1, 4, 0, 0, 0), 0);
        assert!(cabin.stops().contains(4));
        let withdrawn = cabin.withdraw(1).expect("request is assigned");
        assert_eq!(withdrawn.id, 1);
        assert!(!cabin.stops().contains(4));
        assert!(cabin.withdraw(1).is_none());
    }

    #[test]
    fn withdraw_keeps_panel_pressed_floor() {
        let mut cabin = Cabin::new(0, &config(4));
        assert!(cabin.press_panel(4));
        cabin.assign(PassengerRequest::new(1, 4, 0, 0, 0), 0);
        assert!(cabin.withdraw(1).is_some());
        assert!(cabin.stops().contains(4));

        // serving the floor clears the panel press
        let opened = run_until(&mut cabin, 0, |c| c.state() == CabinState::DoorOpen);
        assert_eq!(cabin.floor(), 4);
        let idle = run_until(&mut cabin, opened, |c| c.state() == CabinState::Idle);
        cabin.assign(PassengerRequest::new(2, 4, 0, 0, 0), idle);
        assert!(cabin.stops().contains(4));
        assert!(cabin.withdraw(2).is_some());
        assert!(!cabin.stops().contains(4));
    }

    #[test]
    fn boarding_away_from_source_floor_is_rejected() {
        let mut cabin = Cabin::new(0, &config(4));
        let opened_at = open_doors_here(&mut cabin);
        let mut r = PassengerRequest::new(1, 3, 5, 0, 0);
        r.assign(0, 0);
        let rejected = cabin.board(r, opened_at).expect_err("cabin is at floor 0");
        assert_eq!(rejected.status, RequestStatus::PendingAssignment);
        assert_eq!(rejected.cabin, None);
        assert!(cabin.passengers().is_empty());
    }

    #[test]
    fn boarding_during_hold_does_not_stretch_dwell() {
        let mut cabin = Cabin::new(0, &config(4));
        let opened_at = open_doors_here(&mut cabin);
        assert!(cabin.hold_doors(opened_at));

        let mut r = PassengerRequest::new(1, 0, 5, 0, 0);
        r.assign(0, 0);
        assert!(cabin.board(r, opened_at + 5_000).is_ok());
        assert!(cabin.release_doors(opened_at + 10_000));

        // door window resumes with 2000 ms left; boarding fits inside it
        cabin.update(opened_at + 11_900);
        assert_eq!(cabin.state(), CabinState::DoorOpen);
        cabin.update(opened_at + 12_000);
        assert_eq!(cabin.state(), CabinState::DoorClosing);
    }

    #[test]
    fn reset_returns_to_initial_floor() {
        let mut cabin = Cabin::new(0, &config(4));
        cabin.add_stop(3);
        run_until(&mut cabin, 0, |c| c.floor() == 3);
        cabin.reset();
        assert_eq!(cabin.floor(), 0);
        assert!(cabin.is_at_rest());
        assert_eq!(cabin.door(), DoorState::Closed);
    }
}
