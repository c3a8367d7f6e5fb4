//! Configuration loading and typed config structures for the swarm
//! architecture engine.
//!
//! The canonical configuration lives in `swarm-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure and a loader that reads the file. Motion and layout sections
//! reuse the config types of `swarm-agents` and `swarm-layout` directly.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use swarm_agents::{AgentConfig, FlockingConfig, NavigationConfig};
use swarm_layout::LayoutConfig;
use swarm_types::Canvas;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `swarm-config.yaml`. Every field has a default,
/// so an empty document is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Seed, pacing, and run bounds.
    #[serde(default)]
    pub world: WorldConfig,

    /// Canvas the swarm moves on. Authoritative over `layout.canvas`.
    #[serde(default)]
    pub canvas: Canvas,

    /// Population size and commit trigger.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Agent lifecycle: spawning, integration, anchoring.
    #[serde(default)]
    pub agents: AgentConfig,

    /// Pre-commit flocking weights.
    #[serde(default)]
    pub flocking: FlockingConfig,

    /// Post-commit navigation force field.
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Layout synthesis and maintenance parameters.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Maintenance pass cadence.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Trajectory export.
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string. An empty string yields the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// The layout parameters with the top-level canvas applied.
    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            canvas: self.canvas,
            ..self.layout.clone()
        }
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds per tick (16 is roughly 60 Hz). Zero runs
    /// unpaced.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Stop after this many ticks (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks: 0,
        }
    }
}

/// Population configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// Number of agents spawned at simulation start.
    #[serde(default = "default_agent_count")]
    pub agent_count: usize,

    /// Anchor count that triggers the layout commit.
    #[serde(default = "default_anchor_threshold")]
    pub anchor_threshold: usize,

    /// Commit with whatever anchors exist after this many ticks
    /// (0 = wait for the threshold forever).
    #[serde(default = "default_commit_deadline_ticks")]
    pub commit_deadline_ticks: u64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            agent_count: default_agent_count(),
            anchor_threshold: default_anchor_threshold(),
            commit_deadline_ticks: default_commit_deadline_ticks(),
        }
    }
}

/// Maintenance cadence, in ticks after commit. An interval of 0 disables
/// the pass.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScheduleConfig {
    /// Ticks between evolution passes.
    #[serde(default = "default_evolution_interval")]
    pub evolution_interval: u64,

    /// Ticks between hit-counter decay passes.
    #[serde(default = "default_decay_interval")]
    pub decay_interval: u64,

    /// Ticks between smart prune passes.
    #[serde(default = "default_prune_interval")]
    pub prune_interval: u64,

    /// Ticks after commit before the first smart prune.
    #[serde(default = "default_prune_cooldown")]
    pub prune_cooldown: u64,

    /// Ticks between door refresh passes.
    #[serde(default = "default_door_refresh_interval")]
    pub door_refresh_interval: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            evolution_interval: default_evolution_interval(),
            decay_interval: default_decay_interval(),
            prune_interval: default_prune_interval(),
            prune_cooldown: default_prune_cooldown(),
            door_refresh_interval: default_door_refresh_interval(),
        }
    }
}

/// Trajectory export configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExportConfig {
    /// Write the trajectory document when the run ends.
    #[serde(default = "default_true")]
    pub on_shutdown: bool,

    /// Where the document is written.
    #[serde(default = "default_export_path")]
    pub path: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            on_shutdown: true,
            path: default_export_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit a progress line every N ticks (0 = never).
    #[serde(default = "default_progress_interval_ticks")]
    pub progress_interval_ticks: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            progress_interval_ticks: default_progress_interval_ticks(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    16
}

const fn default_agent_count() -> usize {
    50
}

const fn default_anchor_threshold() -> usize {
    12
}

const fn default_commit_deadline_ticks() -> u64 {
    3600
}

const fn default_evolution_interval() -> u64 {
    240
}

const fn default_decay_interval() -> u64 {
    240
}

const fn default_prune_interval() -> u64 {
    180
}

const fn default_prune_cooldown() -> u64 {
    600
}

const fn default_door_refresh_interval() -> u64 {
    600
}

fn default_export_path() -> PathBuf {
    PathBuf::from("architecture_paths.json")
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_progress_interval_ticks() -> u64 {
    600
}

const fn default_true() -> bool {
    true
}
