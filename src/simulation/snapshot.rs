//! Read-only views of the ecosystem for renderers and telemetry consumers.

use serde::{Deserialize, Serialize};

/// Display colors used by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityColor {
    /// Predators.
    Red,
    /// Prey.
    Green,
    /// Food.
    Yellow,
}

/// A circle to draw: world position, radius and color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    /// Centre x in world units.
    pub x: f32,
    /// Centre y in world units.
    pub y: f32,
    /// Radius in world units.
    pub radius: f32,
    /// Fill color.
    pub color: EntityColor,
}

/// Population counters for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    /// Ticks executed since the ecosystem was created.
    pub tick: u64,
    /// Current generation, starting at 1.
    pub generation: u32,
    /// Live predators.
    pub predators: usize,
    /// Live prey.
    pub prey: usize,
    /// Food items.
    pub food: usize,
    /// Longest lifetime seen since the last reset.
    pub max_time_alive: u32,
    /// Agents killed since the ecosystem was created.
    pub deaths: u64,
}

/// Summary of a finished generation, suitable for external persistence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Generation that ended.
    pub generation: u32,
    /// Ticks the generation lasted.
    pub ticks: u64,
    /// Best fitness among agents that died during the generation.
    pub best_fitness: Option<f32>,
}
