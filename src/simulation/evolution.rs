//! Fitness, elite pools and elite selection.
//!
//! Elite pools hold policy snapshots that seed the next generation after a
//! full extinction. With [`EliteSelection::TopK`] every death is offered to a
//! bounded graveyard of candidates that is promoted into the pools right
//! before the reset; with [`EliteSelection::Disabled`] the pools only change
//! through [`EvolutionEngine::promote`].

use rand::RngCore;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::agent::{Agent, AgentKind};
use super::params::EliteSelection;
use super::spatial::nearest_in;

/// Fitness of the agent at `index`: time alive plus the inverse distance to the
/// nearest same-kind neighbour. A missing neighbour or a distance of zero
/// counts as distance 1.
pub fn fitness<P>(agents: &[Agent<P>], index: usize) -> f32 {
    let bonus = match nearest_in(agents, index) {
        Some(neighbor) if neighbor.distance > 0.0 => 1.0 / neighbor.distance,
        _ => 1.0,
    };
    agents[index].time_alive as f32 + bonus
}

/// A policy snapshot together with the fitness it earned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Elite<P> {
    /// Fitness at selection time.
    pub fitness: f32,
    /// Snapshot of the agent's policy.
    pub policy: P,
}

#[derive(Debug, Clone)]
struct KindPools<P> {
    /// Current elite pool.
    elites: Vec<Elite<P>>,
    /// Fittest deaths of the running generation, highest first.
    graveyard: Vec<Elite<P>>,
}

impl<P> Default for KindPools<P> {
    fn default() -> Self {
        Self {
            elites: Vec::new(),
            graveyard: Vec::new(),
        }
    }
}

/// Manages the elite pools of both kinds.
#[derive(Debug, Clone)]
pub struct EvolutionEngine<P> {
    selection: EliteSelection,
    predators: KindPools<P>,
    prey: KindPools<P>,
    /// Best fitness among deaths of the running generation.
    best_fitness: Option<f32>,
}

impl<P: Clone> EvolutionEngine<P> {
    /// Creates an engine with empty pools.
    pub fn new(selection: EliteSelection) -> Self {
        Self {
            selection,
            predators: KindPools::default(),
            prey: KindPools::default(),
            best_fitness: None,
        }
    }

    fn pools(&self, kind: AgentKind) -> &KindPools<P> {
        match kind {
            AgentKind::Predator => &self.predators,
            AgentKind::Prey => &self.prey,
        }
    }

    fn pools_mut(&mut self, kind: AgentKind) -> &mut KindPools<P> {
        match kind {
            AgentKind::Predator => &mut self.predators,
            AgentKind::Prey => &mut self.prey,
        }
    }

    /// Records a death. Under top-k selection the policy is snapshotted into
    /// the graveyard when it ranks among the `k` fittest of its kind.
    pub fn record_death(&mut self, kind: AgentKind, fitness: f32, policy: &P) {
        self.best_fitness = Some(self.best_fitness.map_or(fitness, |best| best.max(fitness)));

        let EliteSelection::TopK { k } = self.selection else {
            return;
        };

        let graveyard = &mut self.pools_mut(kind).graveyard;
        if graveyard.len() >= k && graveyard.last().is_some_and(|worst| worst.fitness >= fitness) {
            return;
        }

        graveyard.push(Elite {
            fitness,
            policy: policy.clone(),
        });
        graveyard.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
        graveyard.truncate(k);
    }

    /// Moves the graveyard candidates of both kinds into the elite pools.
    pub fn select_elites(&mut self) {
        for kind in [AgentKind::Predator, AgentKind::Prey] {
            let pools = self.pools_mut(kind);
            let candidates = std::mem::take(&mut pools.graveyard);
            pools.elites.extend(candidates);
        }
    }

    /// Installs externally chosen elites for `kind`.
    pub fn promote(&mut self, kind: AgentKind, elites: impl IntoIterator<Item = Elite<P>>) {
        self.pools_mut(kind).elites.extend(elites);
    }

    /// Current elite pool of `kind`.
    pub fn elites(&self, kind: AgentKind) -> &[Elite<P>] {
        &self.pools(kind).elites
    }

    /// Pending top-k candidates of `kind`, fittest first.
    pub fn candidates(&self, kind: AgentKind) -> &[Elite<P>] {
        &self.pools(kind).graveyard
    }

    /// Uniformly random elite policy of `kind`, if the pool is non-empty.
    pub fn pick_parent(&self, kind: AgentKind, rng: &mut dyn RngCore) -> Option<&P> {
        self.pools(kind)
            .elites
            .choose(rng)
            .map(|elite| &elite.policy)
    }

    /// Best fitness recorded since the last [`Self::clear`].
    pub fn best_fitness(&self) -> Option<f32> {
        self.best_fitness
    }

    /// Empties pools, candidates and the best-fitness tracker.
    pub fn clear(&mut self) {
        self.predators = KindPools::default();
        self.prey = KindPools::default();
        self.best_fitness = None;
    }
}
