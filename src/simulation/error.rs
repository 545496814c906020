//! Error types raised by the simulation core.

use thiserror::Error;

use super::agent::{AgentId, AgentKind};

/// Entity collections that carry a configured capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Predator agents.
    Predators,
    /// Prey agents.
    Prey,
    /// Food items.
    Food,
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Collection::Predators => "predator",
            Collection::Prey => "prey",
            Collection::Food => "food",
        };
        f.write_str(name)
    }
}

impl From<AgentKind> for Collection {
    fn from(kind: AgentKind) -> Self {
        match kind {
            AgentKind::Predator => Collection::Predators,
            AgentKind::Prey => Collection::Prey,
        }
    }
}

/// Failures that abort a tick.
///
/// None of these occur in a correctly configured run. Once a step fails the
/// ecosystem latches the error and refuses to advance.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Policy parameter or input shapes disagree.
    #[error("policy shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        /// Layer sizes (or input length) the operation required.
        expected: Vec<usize>,
        /// Layer sizes (or input length) actually supplied.
        found: Vec<usize>,
    },
    /// A live collection outgrew the capacity the observation vector was sized for.
    #[error("{collection} count {live} exceeds configured capacity {capacity}")]
    CapacityExceeded {
        /// Offending collection.
        collection: Collection,
        /// Live entries at encoding time.
        live: usize,
        /// Configured capacity.
        capacity: usize,
    },
    /// An interaction targeted an agent that is no longer alive.
    #[error("agent {0} was already removed")]
    DoubleKill(AgentId),
    /// The nearest-neighbour index rejected a position.
    #[error("spatial index: {0}")]
    SpatialIndex(String),
}

/// Errors raised while loading or validating [`super::params::Params`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing a parameter file failed.
    #[error("parameter file: {0}")]
    Io(#[from] std::io::Error),
    /// The parameter file is not valid JSON for `Params`.
    #[error("parameter file format: {0}")]
    Json(#[from] serde_json::Error),
    /// A value is outside its allowed range.
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}
