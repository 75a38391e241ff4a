//! Scheduling engine that owns the cabins and the pending-request collection.

use std::collections::BinaryHeap;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::cabin::{Cabin, CabinEvent};
use super::dispatch::is_eligible;
use super::error::EngineError;
use super::request::{PassengerRequest, Pending, RequestId, RequestStatus};
use super::types::{BuildingConfig, CabinId, CabinSnapshot, CabinState};

/// What happened during one [`SchedulingEngine::tick`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// Simulated time of the tick.
    pub now: u64,
    /// `(cabin, floor)` for every stop served this tick.
    pub served_stops: Vec<(CabinId, i32)>,
    pub boarded: Vec<RequestId>,
    pub completed: Vec<RequestId>,
    /// Requests that failed to board and went back to pending.
    pub reverted: Vec<RequestId>,
    /// Requests assigned to a cabin this tick.
    pub dispatched: Vec<RequestId>,
}

/// Read-only view of one passenger request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestSnapshot {
    pub id: RequestId,
    pub source: i32,
    pub destination: i32,
    pub status: RequestStatus,
    pub priority: u8,
    pub cabin: Option<CabinId>,
    /// Estimated milliseconds until pickup (pending or waiting) or until
    /// dropoff (in transit). `None` once finished or when unreachable.
    pub eta_ms: Option<u64>,
}

/// Scheduling engine for one building.
///
/// Owns every cabin, the pending-request collection (ordered by priority,
/// then creation time) and the archive of finished requests. Time is never
/// read from a clock: the caller drives the engine through [`tick`](Self::tick).
///
/// A request lives in exactly one place at a time: the pending collection,
/// one cabin (assigned or aboard), or the archive once completed or
/// cancelled.
///
/// # Examples
///
/// ```
/// use elevator_sim::sim::dispatch::DispatchStrategy;
/// use elevator_sim::sim::engine::SchedulingEngine;
/// use elevator_sim::sim::request::RequestStatus;
/// use elevator_sim::sim::types::{BuildingConfig, Timing};
///
/// let timing = Timing {
///     floor_travel_ms: 1000,
///     door_transition_ms: 500,
///     door_open_ms: 2000,
///     boarding_ms: 1000,
///     tick_ms: 100,
/// };
/// let config = BuildingConfig::new(6, 1, 4, 0, timing, DispatchStrategy::ClosestCabin).unwrap();
/// let mut engine = SchedulingEngine::new(config).unwrap();
/// let id = engine.submit_request(3, 5).unwrap();
///
/// let mut now = 0;
/// while engine.request(id).unwrap().status != RequestStatus::Completed {
///     engine.tick(now).unwrap();
///     now += 100;
/// }
/// assert!(engine.is_quiescent());
/// ```
#[derive(Debug, Clone)]
pub struct SchedulingEngine {
    config: BuildingConfig,
    cabins: Vec<Cabin>,
    pending: BinaryHeap<Pending>,
    archive: Vec<PassengerRequest>,
    next_id: RequestId,
    last_tick: Option<u64>,
}

impl SchedulingEngine {
    /// Builds an engine with every cabin idle on the initial floor.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if `config` fails the same
    /// checks as [`BuildingConfig::new`]. Public fields can be edited after
    /// validation, so they are checked again here.
    pub fn new(config: BuildingConfig) -> Result<Self, EngineError> {
        let config = BuildingConfig::new(
            config.floor_count,
            config.cabin_count,
            config.capacity,
            config.initial_floor,
            config.timing,
            config.strategy,
        )?;
        let cabins = (0..config.cabin_count)
            .map(|id| Cabin::new(id, &config))
            .collect();
        info!(
            floors = config.floor_count,
            cabins = config.cabin_count,
            strategy = %config.strategy,
            "scheduling engine ready"
        );
        Ok(Self {
            config,
            cabins,
            pending: BinaryHeap::new(),
            archive: Vec::new(),
            next_id: 1,
            last_tick: None,
        })
    }

    pub fn config(&self) -> &BuildingConfig {
        &self.config
    }

    /// Time of the most recent accepted tick, zero before the first one.
    pub fn now(&self) -> u64 {
        self.last_tick.unwrap_or(0)
    }

    /// Places a hall call from `source` to `destination` with priority 0.
    ///
    /// # Errors
    ///
    /// See [`submit_request_with_priority`](Self::submit_request_with_priority).
    pub fn submit_request(&mut self, source: i32, destination: i32) -> Result<RequestId, EngineError> {
        self.submit_request_with_priority(source, destination, 0)
    }

    /// Places a hall call. The request stays pending until the next tick
    /// dispatches it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFloor`] if either floor is outside the
    /// building and [`EngineError::SameFloor`] if both are equal.
    pub fn submit_request_with_priority(
        &mut self,
        source: i32,
        destination: i32,
        priority: u8,
    ) -> Result<RequestId, EngineError> {
        self.check_floor(source)?;
        self.check_floor(destination)?;
        if source == destination {
            return Err(EngineError::SameFloor(source));
        }

        let id = self.next_id;
        self.next_id += 1;
        let request = PassengerRequest::new(id, source, destination, priority, self.now());
        info!(request = id, source, destination, priority, "request submitted");
        self.pending.push(Pending(request));
        Ok(id)
    }

    /// In-cabin panel press: queues `floor` on `cabin` without dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownCabin`] or [`EngineError::InvalidFloor`].
    pub fn submit_panel_request(&mut self, cabin: CabinId, floor: i32) -> Result<(), EngineError> {
        self.check_floor(floor)?;
        let target = self
            .cabins
            .get_mut(cabin)
            .ok_or(EngineError::UnknownCabin(cabin))?;
        let queued = target.press_panel(floor);
        debug!(cabin, floor, queued, "panel request");
        Ok(())
    }

    /// Cancels a request that has not boarded yet.
    ///
    /// A waiting request is withdrawn from its cabin, whose pickup stop is
    /// dropped unless another passenger still needs that floor.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotCancellable`] once the passenger is aboard
    /// or the request is finished, and [`EngineError::UnknownRequest`] for
    /// ids the engine never issued.
    pub fn cancel_request(&mut self, id: RequestId) -> Result<(), EngineError> {
        let request = self
            .take_pending(id)
            .or_else(|| self.cabins.iter_mut().find_map(|c| c.withdraw(id)));
        if let Some(mut request) = request {
            request.cancel();
            info!(request = id, "request cancelled");
            self.archive.push(request);
            return Ok(());
        }

        let status = self
            .cabins
            .iter()
            .flat_map(|c| c.passengers())
            .chain(&self.archive)
            .find(|r| r.id == id)
            .map(|r| r.status);
        match status {
            Some(status) => Err(EngineError::NotCancellable { id, status }),
            None => Err(EngineError::UnknownRequest(id)),
        }
    }

    fn take_pending(&mut self, id: RequestId) -> Option<PassengerRequest> {
        let request = self.pending.iter().find(|p| p.0.id == id)?.0.clone();
        self.pending.retain(|p| p.0.id != id);
        Some(request)
    }

    /// Advances every cabin to `now`, then dispatches pending requests.
    ///
    /// Cabins are updated before dispatch, so a cabin that becomes free
    /// during this tick can take a new assignment in the same tick.
    ///
    /// Dispatch does not stop after the head of the pending collection: it
    /// keeps assigning heads in priority order until one finds no eligible
    /// cabin, which leaves that request and everything behind it pending.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NonMonotonicTime`] without touching any state
    /// when `now` is earlier than the previous tick.
    pub fn tick(&mut self, now: u64) -> Result<TickReport, EngineError> {
        if let Some(previous) = self.last_tick {
            if now < previous {
                warn!(previous, now, "non-monotonic tick ignored");
                return Err(EngineError::NonMonotonicTime { previous, now });
            }
        }
        self.last_tick = Some(now);

        let mut report = TickReport {
            now,
            ..TickReport::default()
        };
        let mut events = Vec::new();
        for cabin in &mut self.cabins {
            events.extend(cabin.update(now));
        }
        for event in events {
            self.apply_event(event, &mut report);
        }
        self.dispatch_pending(now, &mut report);
        Ok(report)
    }

    fn apply_event(&mut self, event: CabinEvent, report: &mut TickReport) {
        match event {
            CabinEvent::StopServed { cabin, floor, .. } => report.served_stops.push((cabin, floor)),
            CabinEvent::Boarded { request, .. } => report.boarded.push(request),
            CabinEvent::Alighted(request) => {
                info!(
                    request = request.id,
                    cabin = ?request.cabin,
                    wait_ms = ?request.wait_ms(),
                    ride_ms = ?request.ride_ms(),
                    "request completed"
                );
                report.completed.push(request.id);
                self.archive.push(request);
            }
            CabinEvent::Rejected(request) => {
                report.reverted.push(request.id);
                self.pending.push(Pending(request));
            }
        }
    }

    /// Assigns pending requests head-first until one cannot be placed.
    ///
    /// Eligibility does not depend on the request, so once the head finds no
    /// cabin nothing behind it would either.
    fn dispatch_pending(&mut self, now: u64, report: &mut TickReport) {
        while let Some(head) = self.pending.peek() {
            let Some(cabin) = self.config.strategy.select_cabin(&self.cabins, &head.0) else {
                debug!(request = head.0.id, "no cabin available, request stays pending");
                break;
            };
            let Some(Pending(request)) = self.pending.pop() else {
                break;
            };
            debug!(
                request = request.id,
                cabin,
                strategy = %self.config.strategy,
                "request dispatched"
            );
            report.dispatched.push(request.id);
            self.cabins[cabin].assign(request, now);
        }
    }

    /// Returns every cabin to its initial floor and state and forgets all
    /// requests. Request ids keep counting up across resets.
    pub fn reset(&mut self) {
        for cabin in &mut self.cabins {
            cabin.reset();
        }
        self.pending.clear();
        self.archive.clear();
        self.last_tick = None;
        info!("engine reset");
    }

    /// Stops `cabin` in place; passengers stay aboard.
    pub fn emergency_stop(&mut self, cabin: CabinId) -> Result<(), EngineError> {
        self.suspend(cabin, CabinState::EmergencyStop)
    }

    /// Takes `cabin` out for maintenance; passengers step out at the current
    /// floor and are re-dispatched from there.
    pub fn set_maintenance(&mut self, cabin: CabinId) -> Result<(), EngineError> {
        self.suspend(cabin, CabinState::Maintenance)
    }

    /// Like [`set_maintenance`](Self::set_maintenance), for a fault.
    pub fn set_out_of_service(&mut self, cabin: CabinId) -> Result<(), EngineError> {
        self.suspend(cabin, CabinState::OutOfService)
    }

    fn suspend(&mut self, id: CabinId, state: CabinState) -> Result<(), EngineError> {
        let now = self.now();
        let cabin = self
            .cabins
            .get_mut(id)
            .ok_or(EngineError::UnknownCabin(id))?;
        let released = cabin.suspend(state, now);
        info!(cabin = id, %state, released = released.len(), "cabin suspended");
        for request in released {
            if request.status.is_finished() {
                self.archive.push(request);
            } else {
                self.pending.push(Pending(request));
            }
        }
        Ok(())
    }

    /// Returns a suspended cabin to service. Returns `false` if it was not
    /// suspended.
    pub fn restore_service(&mut self, cabin: CabinId) -> Result<bool, EngineError> {
        let restored = self.cabin_mut(cabin)?.restore();
        if restored {
            info!(cabin, "cabin back in service");
        }
        Ok(restored)
    }

    /// Holds the doors of `cabin` open. Returns `false` unless the doors are
    /// fully open.
    pub fn hold_doors(&mut self, cabin: CabinId, now: u64) -> Result<bool, EngineError> {
        Ok(self.cabin_mut(cabin)?.hold_doors(now))
    }

    /// Releases a door hold. Returns `false` if no hold was active.
    pub fn release_doors(&mut self, cabin: CabinId, now: u64) -> Result<bool, EngineError> {
        Ok(self.cabin_mut(cabin)?.release_doors(now))
    }

    fn cabin_mut(&mut self, id: CabinId) -> Result<&mut Cabin, EngineError> {
        self.cabins.get_mut(id).ok_or(EngineError::UnknownCabin(id))
    }

    fn check_floor(&self, floor: i32) -> Result<(), EngineError> {
        if self.config.contains_floor(floor) {
            Ok(())
        } else {
            Err(EngineError::InvalidFloor {
                floor,
                floor_count: self.config.floor_count,
            })
        }
    }

    /// Direct access to a cabin's FSM, for inspection.
    pub fn cabin_fsm(&self, id: CabinId) -> Result<&Cabin, EngineError> {
        self.cabins.get(id).ok_or(EngineError::UnknownCabin(id))
    }

    pub fn cabins(&self) -> Vec<CabinSnapshot> {
        self.cabins.iter().map(Cabin::snapshot).collect()
    }

    pub fn cabin(&self, id: CabinId) -> Result<CabinSnapshot, EngineError> {
        self.cabin_fsm(id).map(Cabin::snapshot)
    }

    /// Estimated milliseconds until `cabin` reaches `floor`.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnknownCabin`], [`EngineError::InvalidFloor`] or
    /// [`EngineError::EtaUnreachable`].
    pub fn eta(&self, cabin: CabinId, floor: i32) -> Result<u64, EngineError> {
        self.check_floor(floor)?;
        self.cabin_fsm(cabin)?.eta_to(floor, self.now())
    }

    /// Pending requests in dispatch order.
    pub fn pending(&self) -> Vec<RequestSnapshot> {
        let mut queue: Vec<&Pending> = self.pending.iter().collect();
        queue.sort_by(|a, b| b.cmp(a));
        queue.into_iter().map(|p| self.snapshot_of(&p.0)).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Every known request, ordered by id.
    pub fn requests(&self) -> Vec<RequestSnapshot> {
        self.request_log()
            .iter()
            .map(|r| self.snapshot_of(r))
            .collect()
    }

    pub fn request(&self, id: RequestId) -> Result<RequestSnapshot, EngineError> {
        self.iter_requests()
            .find(|r| r.id == id)
            .map(|r| self.snapshot_of(r))
            .ok_or(EngineError::UnknownRequest(id))
    }

    /// Full records of every known request, ordered by id.
    pub fn request_log(&self) -> Vec<PassengerRequest> {
        let mut log: Vec<PassengerRequest> = self.iter_requests().cloned().collect();
        log.sort_by_key(|r| r.id);
        log
    }

    fn iter_requests(&self) -> impl Iterator<Item = &PassengerRequest> {
        self.pending
            .iter()
            .map(|p| &p.0)
            .chain(
                self.cabins
                    .iter()
                    .flat_map(|c| c.assigned().iter().chain(c.passengers())),
            )
            .chain(&self.archive)
    }

    fn snapshot_of(&self, request: &PassengerRequest) -> RequestSnapshot {
        RequestSnapshot {
            id: request.id,
            source: request.source,
            destination: request.destination,
            status: request.status,
            priority: request.priority,
            cabin: request.cabin,
            eta_ms: self.request_eta(request),
        }
    }

    fn request_eta(&self, request: &PassengerRequest) -> Option<u64> {
        let now = self.now();
        match request.status {
            RequestStatus::PendingAssignment => self
                .cabins
                .iter()
                .filter(|c| is_eligible(c))
                .filter_map(|c| c.eta_to(request.source, now).ok())
                .min(),
            RequestStatus::WaitingForPickup => {
                let cabin = self.cabins.get(request.cabin?)?;
                cabin.eta_to(request.source, now).ok()
            }
            RequestStatus::InTransit => {
                let cabin = self.cabins.get(request.cabin?)?;
                cabin.eta_to(request.destination, now).ok()
            }
            RequestStatus::Completed | RequestStatus::Cancelled => None,
        }
    }

    /// `true` when nothing is pending and every cabin is idle and empty.
    pub fn is_quiescent(&self) -> bool {
        self.pending.is_empty() && self.cabins.iter().all(Cabin::is_at_rest)
    }
}
