//! # Predprey - Predator/Prey Neuro-Evolution
//!
//! A 2D world of predators, prey and food. Every agent is steered by its own
//! small neural network; when both populations die out the world resets and
//! the next generation is seeded from elite policies or from scratch.
//!
//! ## Features
//!
//! - Feed-forward brains behind a pluggable [`simulation::brain::Policy`] trait
//! - Fixed-length observation vectors independent of live population counts
//! - Predation, foraging, optional breeding and per-tick health decay
//! - Elite pools with optional top-k selection on reset
//! - Deterministic runs from a seed
//! - Real-time visualization with macroquad and a headless runner
//!
//! ## Core Modules
//!
//! - [`simulation::ecosystem`] - Aggregate state and the tick
//! - [`simulation::agent`] - Agent state and kinematics
//! - [`simulation::perception`] - Observation encoding
//! - [`simulation::interactions`] - Predation, foraging, breeding, aging
//! - [`simulation::population`] - Spawning, killing and resets
//! - [`simulation::evolution`] - Fitness and elite pools

/// Core simulation logic and data structures.
pub mod simulation {
    /// Predator and prey agents.
    pub mod agent;
    /// Neural network implementation for agent brains.
    pub mod brain;
    /// Main ecosystem simulation.
    pub mod ecosystem;
    /// Error types.
    pub mod error;
    /// Bounded log of recent deaths.
    pub mod event_log;
    /// Fitness and elite pools.
    pub mod evolution;
    /// Food items that prey can consume.
    pub mod food;
    /// Geometric utility functions for distance and collision checks.
    pub mod geometric_utils;
    /// Collision-driven interactions and aging.
    pub mod interactions;
    /// Simulation parameters.
    pub mod params;
    /// Observation vectors fed to policies.
    pub mod perception;
    /// Spawning, killing and population resets.
    pub mod population;
    /// Render and telemetry views.
    pub mod snapshot;
    /// Nearest-neighbour queries.
    pub mod spatial;
}
