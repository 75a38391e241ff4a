//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::sim::dispatch::DispatchStrategy;
use crate::sim::error::EngineError;
use crate::sim::types::{BuildingConfig, Timing};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Building shape and cabin parameters.
    #[serde(default)]
    pub building: BuildingSection,
    /// Motion and door timings.
    #[serde(default)]
    pub timing: TimingSection,
    /// Dispatch heuristic selection.
    #[serde(default)]
    pub dispatch: DispatchSection,
    /// Random passenger traffic.
    #[serde(default)]
    pub traffic: TrafficSection,
    /// Run length limits.
    #[serde(default)]
    pub simulation: SimulationSection,
}

/// Building shape and cabin parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildingSection {
    /// Number of floors, numbered from 0 (must be >= 2).
    pub floor_count: i32,
    /// Number of cabins (must be > 0).
    pub cabin_count: usize,
    /// Passengers per cabin (must be > 0).
    pub capacity: usize,
    /// Starting floor of every cabin; also the lobby for generated traffic.
    pub initial_floor: i32,
}

impl Default for BuildingSection {
    fn default() -> Self {
        Self {
            floor_count: 10,
            cabin_count: 2,
            capacity: 8,
            initial_floor: 0,
        }
    }
}

/// Motion and door timings, in milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingSection {
    pub floor_travel_ms: u64,
    pub door_transition_ms: u64,
    pub door_open_ms: u64,
    /// Per-passenger boarding or alighting time.
    pub boarding_ms: u64,
    /// Tick granularity of the simulation clock.
    pub tick_ms: u64,
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            floor_travel_ms: 1_000,
            door_transition_ms: 500,
            door_open_ms: 2_000,
            boarding_ms: 1_000,
            tick_ms: 100,
        }
    }
}

/// Dispatch heuristic selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchSection {
    /// Strategy: `"closest_cabin"` or `"least_stops"`.
    pub strategy: String,
}

impl Default for DispatchSection {
    fn default() -> Self {
        Self {
            strategy: "closest_cabin".to_string(),
        }
    }
}

/// Random passenger traffic.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrafficSection {
    /// Master random seed.
    pub seed: u64,
    /// Calls are generated during `[0, duration_ms]`.
    pub duration_ms: u64,
    /// Mean time between calls (must be > 0).
    pub mean_interval_ms: u64,
    /// Probability of a call starting at the lobby (0.0–1.0).
    pub lobby_bias: f64,
    /// Probability of a priority call (0.0–1.0).
    pub priority_call_ratio: f64,
}

impl Default for TrafficSection {
    fn default() -> Self {
        Self {
            seed: 42,
            duration_ms: 600_000,
            mean_interval_ms: 8_000,
            lobby_bias: 0.3,
            priority_call_ratio: 0.05,
        }
    }
}

/// Run length limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSection {
    /// Hard stop for the run, including the drain after traffic ends
    /// (must be >= traffic.duration_ms).
    pub max_duration_ms: u64,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            max_duration_ms: 1_200_000,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"building.floor_count"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: a ten-floor office with two cabins.
    pub fn baseline() -> Self {
        Self {
            building: BuildingSection::default(),
            timing: TimingSection::default(),
            dispatch: DispatchSection::default(),
            traffic: TrafficSection::default(),
            simulation: SimulationSection::default(),
        }
    }

    /// Returns the morning-rush preset: dense up-peak traffic from the lobby.
    pub fn morning_rush() -> Self {
        Self {
            building: BuildingSection {
                floor_count: 15,
                cabin_count: 3,
                capacity: 10,
                ..BuildingSection::default()
            },
            timing: TimingSection::default(),
            dispatch: DispatchSection {
                strategy: "least_stops".to_string(),
            },
            traffic: TrafficSection {
                duration_ms: 900_000,
                mean_interval_ms: 3_000,
                lobby_bias: 0.85,
                priority_call_ratio: 0.02,
                ..TrafficSection::default()
            },
            simulation: SimulationSection {
                max_duration_ms: 1_800_000,
            },
        }
    }

    /// Returns the high-rise preset: forty floors, six fast cabins.
    pub fn high_rise() -> Self {
        Self {
            building: BuildingSection {
                floor_count: 40,
                cabin_count: 6,
                capacity: 12,
                ..BuildingSection::default()
            },
            timing: TimingSection {
                floor_travel_ms: 600,
                door_transition_ms: 400,
                ..TimingSection::default()
            },
            dispatch: DispatchSection {
                strategy: "least_stops".to_string(),
            },
            traffic: TrafficSection {
                duration_ms: 1_200_000,
                mean_interval_ms: 4_000,
                lobby_bias: 0.5,
                ..TrafficSection::default()
            },
            simulation: SimulationSection {
                max_duration_ms: 2_400_000,
            },
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "morning_rush", "high_rise"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "morning_rush" => Ok(Self::morning_rush()),
            "high_rise" => Ok(Self::high_rise()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut check = |ok: bool, field: &str, message: String| {
            if !ok {
                errors.push(ConfigError {
                    field: field.into(),
                    message,
                });
            }
        };

        let b = &self.building;
        check(b.floor_count >= 2, "building.floor_count", "must be >= 2".into());
        check(b.cabin_count > 0, "building.cabin_count", "must be > 0".into());
        check(b.capacity > 0, "building.capacity", "must be > 0".into());
        check(
            (0..b.floor_count).contains(&b.initial_floor),
            "building.initial_floor",
            "must be in [0, building.floor_count)".into(),
        );

        let t = &self.timing;
        for (field, value) in [
            ("timing.floor_travel_ms", t.floor_travel_ms),
            ("timing.door_transition_ms", t.door_transition_ms),
            ("timing.door_open_ms", t.door_open_ms),
            ("timing.boarding_ms", t.boarding_ms),
            ("timing.tick_ms", t.tick_ms),
        ] {
            check(value > 0, field, "must be > 0".into());
        }

        let strategy = &self.dispatch.strategy;
        check(
            DispatchStrategy::parse(strategy).is_some(),
            "dispatch.strategy",
            format!(
                "must be one of {}, got \"{strategy}\"",
                DispatchStrategy::NAMES.join(", ")
            ),
        );

        let tr = &self.traffic;
        check(
            tr.mean_interval_ms > 0,
            "traffic.mean_interval_ms",
            "must be > 0".into(),
        );
        check(
            (0.0..=1.0).contains(&tr.lobby_bias),
            "traffic.lobby_bias",
            "must be in [0.0, 1.0]".into(),
        );
        check(
            (0.0..=1.0).contains(&tr.priority_call_ratio),
            "traffic.priority_call_ratio",
            "must be in [0.0, 1.0]".into(),
        );

        check(
            self.simulation.max_duration_ms >= tr.duration_ms,
            "simulation.max_duration_ms",
            "must be >= traffic.duration_ms".into(),
        );

        errors
    }

    /// Parsed dispatch strategy, if the name is known.
    pub fn strategy(&self) -> Option<DispatchStrategy> {
        DispatchStrategy::parse(&self.dispatch.strategy)
    }

    /// Builds the engine's building configuration from this scenario.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] for an unknown strategy or any
    /// value [`BuildingConfig::new`] refuses.
    pub fn building_config(&self) -> Result<BuildingConfig, EngineError> {
        let strategy = self.strategy().ok_or_else(|| EngineError::InvalidConfig {
            field: "strategy",
            message: format!("unknown strategy \"{}\"", self.dispatch.strategy),
        })?;
        let t = &self.timing;
        BuildingConfig::new(
            self.building.floor_count,
            self.building.cabin_count,
            self.building.capacity,
            self.building.initial_floor,
            Timing {
                floor_travel_ms: t.floor_travel_ms,
                door_transition_ms: t.door_transition_ms,
                door_open_ms: t.door_open_ms,
                boarding_ms: t.boarding_ms,
                tick_ms: t.tick_ms,
            },
            strategy,
        )
    }
}
