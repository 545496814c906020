//! Simulation parameters.
//!
//! All values are fixed for the duration of a run. Changing them on a live
//! [`super::ecosystem::Ecosystem`] is not supported.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// How a policy's 2D output is turned into a velocity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ActionMode {
    /// `v += a * action_scale`. Outputs are in `[0, 1]`, so this always pushes
    /// towards positive x and y.
    #[default]
    Nudge,
    /// `v += (2a - 1) * action_scale`, i.e. the output range re-centred on zero.
    Centered,
}

/// What perception does when a live collection is larger than its capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CapacityPolicy {
    /// Abort the tick with `CapacityExceeded`.
    #[default]
    Reject,
    /// Encode only the first `capacity` entries of the collection.
    Truncate,
}

/// How the elite pools are filled before a population reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EliteSelection {
    /// Pools are never filled by the simulation; every reseed is fresh random.
    #[default]
    Disabled,
    /// Keep the `k` fittest agents of each kind that died during the
    /// generation and promote them right before the reset.
    TopK {
        /// Pool size per kind.
        k: usize,
    },
}

/// Simulation parameters that control ecosystem behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Predators created at start and on every reset.
    pub num_predators: usize,
    /// Prey created at start and on every reset.
    pub num_prey: usize,
    /// Food items; constant for the whole run.
    pub num_food: usize,
    /// World width in pixels.
    pub world_width: f32,
    /// World height in pixels.
    pub world_height: f32,
    /// Mapping from policy output to velocity change.
    pub action_mode: ActionMode,
    /// Multiplier applied to the policy output.
    pub action_scale: f32,
    /// Whether colliding same-kind agents breed.
    pub breeding_enabled: bool,
    /// Elite pool selection strategy.
    pub elite_selection: EliteSelection,
    /// Behaviour when a population outgrows its capacity.
    pub capacity_policy: CapacityPolicy,
    /// Units in the single hidden layer of each brain.
    pub hidden_size: usize,
    /// Half-width of the uniform weight initialisation range.
    pub weight_scale: f32,
    /// Number of death records kept for diagnostics.
    pub death_log_capacity: usize,
    /// Seed for reproducible runs; drawn from entropy when absent.
    pub rng_seed: Option<u64>,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            num_predators: 4,
            num_prey: 16,
            num_food: 64,
            world_width: 1280.0,
            world_height: 720.0,
            action_mode: ActionMode::Nudge,
            action_scale: 0.1,
            breeding_enabled: false,
            elite_selection: EliteSelection::Disabled,
            capacity_policy: CapacityPolicy::Reject,
            hidden_size: 8,
            weight_scale: 0.5,
            death_log_capacity: 256,
            rng_seed: None,
        }
    }
}

impl Params {
    /// Length of every observation vector produced for this configuration.
    pub fn observation_size(&self) -> usize {
        12 + 2 * (self.num_food + self.num_predators + self.num_prey)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.world_width.is_finite() && self.world_width > 0.0) {
            return Err(ConfigError::Invalid("world_width must be positive"));
        }
        if !(self.world_height.is_finite() && self.world_height > 0.0) {
            return Err(ConfigError::Invalid("world_height must be positive"));
        }
        if !self.action_scale.is_finite() {
            return Err(ConfigError::Invalid("action_scale must be finite"));
        }
        if self.hidden_size == 0 {
            return Err(ConfigError::Invalid("hidden_size must be non-zero"));
        }
        if !(self.weight_scale.is_finite() && self.weight_scale > 0.0) {
            return Err(ConfigError::Invalid("weight_scale must be positive"));
        }
        if self.elite_selection == (EliteSelection::TopK { k: 0 }) {
            return Err(ConfigError::Invalid("elite pool size must be non-zero"));
        }
        Ok(())
    }

    /// Loads parameters from a JSON file. Missing fields take their defaults.
    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let params: Params = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }

    /// Saves the parameters as pretty-printed JSON.
    pub fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
