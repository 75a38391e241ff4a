//! Multi-cabin elevator scheduling simulator.
//!
//! The [`sim`] module holds the scheduling engine: per-cabin state machines,
//! SCAN stop planning, dispatch heuristics, and arrival estimates, all driven
//! by an explicit millisecond clock. [`runner`] feeds it generated traffic
//! from a [`config::ScenarioConfig`] and [`io`] exports the request log.

/// REST API over a finished run (requires the `api` feature).
#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod io;
pub mod logging;
pub mod runner;
/// Scheduling engine, cabin state machines, dispatch, and traffic.
pub mod sim;
