//! Agent lifecycle: spawning, killing and generation resets.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::agent::{Agent, AgentId, AgentKind};
use super::brain::{Policy, PolicyShape};
use super::ecosystem::Ecosystem;
use super::error::SimulationError;
use super::event_log::{DeathCause, DeathRecord};
use super::evolution::{self, Elite};
use super::food::Food;
use super::params::EliteSelection;
use super::snapshot::GenerationRecord;

/// Counts of policies handed to agents and released with them.
///
/// Elite snapshots are not counted; only policies owned by agents are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyLedger {
    /// Policies given to newly spawned agents.
    pub created: u64,
    /// Policies released when their agent was removed.
    pub released: u64,
}

impl PolicyLedger {
    /// Policies currently owned by live agents.
    pub fn live(&self) -> u64 {
        self.created - self.released
    }
}

/// Outcome of a population reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetReport {
    /// Generation that just started.
    pub generation: u32,
    /// New predators whose policy was copied from an elite.
    pub predators_from_elites: usize,
    /// New prey whose policy was copied from an elite.
    pub prey_from_elites: usize,
}

impl<P: Policy> Ecosystem<P> {
    /// Shape used for fresh random policies.
    pub fn policy_shape(&self) -> PolicyShape {
        PolicyShape {
            inputs: self.params.observation_size(),
            hidden: self.params.hidden_size,
            weight_scale: self.params.weight_scale,
        }
    }

    fn next_agent_id(&mut self) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Adds an agent owning `policy`. Without a position it is placed
    /// uniformly at random.
    pub fn spawn_agent(&mut self, kind: AgentKind, pos: Option<Array1<f32>>, policy: P) -> AgentId {
        let id = self.next_agent_id();
        let (width, height) = (self.params.world_width, self.params.world_height);
        let agent = match pos {
            Some(pos) => Agent::new(id, kind, pos, policy, &mut self.rng),
            None => Agent::new_random(id, kind, width, height, policy, &mut self.rng),
        };

        self.ledger.created += 1;
        self.agents_mut(kind).push(agent);
        id
    }

    /// Adds an agent with a fresh random policy at a random position.
    pub fn spawn_random(&mut self, kind: AgentKind) -> AgentId {
        let policy = P::random(&self.policy_shape(), &mut self.rng);
        self.spawn_agent(kind, None, policy)
    }

    /// Removes the agent `id` and records its death.
    ///
    /// Returns the reset report when this kill emptied both collections; the
    /// caller must then stop processing the current tick.
    pub fn kill(
        &mut self,
        kind: AgentKind,
        id: AgentId,
        cause: DeathCause,
    ) -> Result<Option<ResetReport>, SimulationError> {
        let index = self
            .agents(kind)
            .iter()
            .position(|agent| agent.id == id)
            .ok_or(SimulationError::DoubleKill(id))?;

        let fitness = evolution::fitness(self.agents(kind), index);
        let agent = self.agents_mut(kind).remove(index);
        self.evolution.record_death(kind, fitness, &agent.policy);
        self.death_log.log(DeathRecord {
            tick: self.tick,
            generation: self.generation,
            id,
            kind,
            time_alive: agent.time_alive,
            fitness,
            cause,
        });
        debug!(%id, %kind, ?cause, time_alive = agent.time_alive, fitness, "agent died");
        self.release(agent);

        if self.is_extinct() {
            return Ok(Some(self.reset_population()));
        }
        Ok(None)
    }

    fn release(&mut self, agent: Agent<P>) {
        self.ledger.released += 1;
        drop(agent);
    }

    /// Starts a new generation: refills both populations from the elite pools
    /// (or fresh policies), regenerates food and clears the pools.
    pub fn reset_population(&mut self) -> ResetReport {
        if matches!(self.params.elite_selection, EliteSelection::TopK { .. }) {
            self.evolution.select_elites();
        }

        for agent in std::mem::take(&mut self.predators) {
            self.release(agent);
        }
        for agent in std::mem::take(&mut self.prey) {
            self.release(agent);
        }

        self.history.push(GenerationRecord {
            generation: self.generation,
            ticks: self.tick - self.generation_started_at,
            best_fitness: self.evolution.best_fitness(),
        });

        let predators_from_elites = self.reseed(AgentKind::Predator, self.params.num_predators);
        let prey_from_elites = self.reseed(AgentKind::Prey, self.params.num_prey);
        self.regenerate_food();

        self.max_time_alive = 0;
        self.generation += 1;
        self.generation_started_at = self.tick;
        self.evolution.clear();

        info!(
            generation = self.generation,
            tick = self.tick,
            predators_from_elites,
            prey_from_elites,
            "population reset"
        );

        ResetReport {
            generation: self.generation,
            predators_from_elites,
            prey_from_elites,
        }
    }

    /// Spawns `count` agents of `kind`, each inheriting a random elite's policy
    /// when the pool is non-empty. Returns how many inherited.
    fn reseed(&mut self, kind: AgentKind, count: usize) -> usize {
        let mut inherited = 0;
        for _ in 0..count {
            match self.evolution.pick_parent(kind, &mut self.rng).cloned() {
                Some(policy) => {
                    inherited += 1;
                    self.spawn_agent(kind, None, policy);
                }
                None => {
                    self.spawn_random(kind);
                }
            }
        }
        inherited
    }

    pub(crate) fn regenerate_food(&mut self) {
        let (width, height) = (self.params.world_width, self.params.world_height);
        self.food = (0..self.params.num_food)
            .map(|_| Food::new_random(width, height, &mut self.rng))
            .collect();
    }

    /// Installs externally chosen elites for `kind`; they seed the next reset.
    pub fn promote_elites(&mut self, kind: AgentKind, elites: impl IntoIterator<Item = Elite<P>>) {
        self.evolution.promote(kind, elites);
    }

    /// Current elite pool of `kind`.
    pub fn elites(&self, kind: AgentKind) -> &[Elite<P>] {
        self.evolution.elites(kind)
    }

    /// Releases every live agent. Afterwards `ledger().live()` is zero.
    pub fn shutdown(&mut self) -> PolicyLedger {
        for agent in std::mem::take(&mut self.predators) {
            self.release(agent);
        }
        for agent in std::mem::take(&mut self.prey) {
            self.release(agent);
        }
        info!(
            created = self.ledger.created,
            released = self.ledger.released,
            "ecosystem shut down"
        );
        self.ledger
    }
}
