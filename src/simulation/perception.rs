//! Observation vectors fed to agent policies.
//!
//! The vector length depends only on the configured capacities, never on live
//! counts: `12 + 2 * (num_food + num_predators + num_prey)`. Layout:
//!
//! | slots | content |
//! |---|---|
//! | 2 | own position / world size |
//! | 2 | own velocity |
//! | 2 | nearest same-kind neighbour position / world size, `(0, 0)` if none |
//! | 1 | health / 500 |
//! | 1 | time alive / longest time alive, `0` before anyone has aged |
//! | 2 | raw world width and height |
//! | 2 | kind one-hot, prey `(1, 0)`, predator `(0, 1)` |
//! | 2 each | every food item, predator and prey position / world size |
//!
//! followed by zero padding.

use ndarray::Array1;
use tracing::warn;

use super::agent::{AgentKind, HEALTH_NORMALIZATION};
use super::ecosystem::Ecosystem;
use super::error::{Collection, SimulationError};
use super::params::CapacityPolicy;
use super::spatial::SpatialIndex;

/// Encoder bound to one snapshot of the ecosystem.
///
/// Builds the neighbour index once so every agent of the snapshot can be
/// encoded without rebuilding it.
pub struct Perception {
    index: SpatialIndex,
}

impl Perception {
    /// Prepares an encoder for the current ecosystem state.
    pub fn new<P>(ecosystem: &Ecosystem<P>) -> Result<Self, SimulationError> {
        Ok(Self {
            index: SpatialIndex::build(&ecosystem.predators, &ecosystem.prey)?,
        })
    }

    /// Encodes the observation of the agent stored at `index` in `kind`'s collection.
    pub fn encode<P>(
        &self,
        ecosystem: &Ecosystem<P>,
        kind: AgentKind,
        index: usize,
    ) -> Result<Array1<f32>, SimulationError> {
        let params = &ecosystem.params;
        let width = params.world_width;
        let height = params.world_height;
        let expected_len = params.observation_size();

        let food_count = admitted(
            Collection::Food,
            ecosystem.food.len(),
            params.num_food,
            params.capacity_policy,
        )?;
        let predator_count = admitted(
            AgentKind::Predator.into(),
            ecosystem.predators.len(),
            params.num_predators,
            params.capacity_policy,
        )?;
        let prey_count = admitted(
            AgentKind::Prey.into(),
            ecosystem.prey.len(),
            params.num_prey,
            params.capacity_policy,
        )?;

        let agent = &ecosystem.agents(kind)[index];
        let mut values = Vec::with_capacity(expected_len);

        values.push(agent.pos[0] / width);
        values.push(agent.pos[1] / height);
        values.push(agent.vel[0]);
        values.push(agent.vel[1]);

        match self.index.nearest_same_kind(kind, index, &agent.pos)? {
            Some(neighbor) => {
                let other = &ecosystem.agents(kind)[neighbor.index];
                values.push(other.pos[0] / width);
                values.push(other.pos[1] / height);
            }
            None => values.extend([0.0, 0.0]),
        }

        values.push(agent.health as f32 / HEALTH_NORMALIZATION);
        values.push(if ecosystem.max_time_alive > 0 {
            agent.time_alive as f32 / ecosystem.max_time_alive as f32
        } else {
            0.0
        });
        values.push(width);
        values.push(height);
        values.extend(kind.one_hot());

        for food in ecosystem.food.iter().take(food_count) {
            values.push(food.pos[0] / width);
            values.push(food.pos[1] / height);
        }
        for other in ecosystem.predators.iter().take(predator_count) {
            values.push(other.pos[0] / width);
            values.push(other.pos[1] / height);
        }
        for other in ecosystem.prey.iter().take(prey_count) {
            values.push(other.pos[0] / width);
            values.push(other.pos[1] / height);
        }

        values.resize(expected_len, 0.0);
        Ok(Array1::from_vec(values))
    }
}

/// Encodes a single agent, building a throwaway neighbour index.
pub fn encode<P>(
    ecosystem: &Ecosystem<P>,
    kind: AgentKind,
    index: usize,
) -> Result<Array1<f32>, SimulationError> {
    Perception::new(ecosystem)?.encode(ecosystem, kind, index)
}

/// Number of entries of a collection that fit in the observation.
fn admitted(
    collection: Collection,
    live: usize,
    capacity: usize,
    policy: CapacityPolicy,
) -> Result<usize, SimulationError> {
    if live <= capacity {
        return Ok(live);
    }

    match policy {
        CapacityPolicy::Reject => Err(SimulationError::CapacityExceeded {
            collection,
            live,
            capacity,
        }),
        CapacityPolicy::Truncate => {
            warn!(%collection, live, capacity, "truncating observation to configured capacity");
            Ok(capacity)
        }
    }
}
