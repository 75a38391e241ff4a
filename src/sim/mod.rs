/// Per-cabin finite-state machine.
pub mod cabin;
/// Simulated tick source.
pub mod clock;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod eta;
pub mod kpi;
pub mod request;
/// SCAN/LOOK stop queues.
pub mod stop_queue;
pub mod timing;
/// Seeded traffic generation for demo runs.
pub mod traffic;
pub mod types;

pub use engine::{RequestSnapshot, SchedulingEngine, TickReport};
pub use error::EngineError;
