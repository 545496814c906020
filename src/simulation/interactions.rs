//! Collision-driven interactions and aging.
//!
//! Every phase may kill agents. When a kill empties both collections the
//! population is reset immediately and the phase returns the reset report so
//! the tick can stop.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::agent::{Agent, AgentId, AgentKind};
use super::brain::Policy;
use super::ecosystem::Ecosystem;
use super::error::SimulationError;
use super::event_log::DeathCause;
use super::geometric_utils::colliding;
use super::population::ResetReport;

/// Health a predator gains per prey eaten.
pub const PREDATION_GAIN: i32 = 1000;
/// Health a prey gains on contact with food, before the item moves.
pub const FORAGING_CONTACT_GAIN: i32 = 500;
/// Health a prey gains once the eaten item has moved.
pub const FORAGING_MEAL_GAIN: i32 = 1000;

/// Post-movement phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Predators eat colliding prey.
    Predation,
    /// Prey eat colliding food.
    Foraging,
    /// Colliding same-kind pairs breed.
    Breeding,
    /// Age and health decay.
    Aging,
}

impl Phase {
    /// All phases in the order a tick runs them.
    pub const ORDER: [Phase; 4] = [
        Phase::Predation,
        Phase::Foraging,
        Phase::Breeding,
        Phase::Aging,
    ];
}

/// Result of one phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseOutcome {
    /// Interactions resolved (kills, meals or births).
    pub events: usize,
    /// Present when the phase emptied the world and reset it.
    pub reset: Option<ResetReport>,
}

impl PhaseOutcome {
    fn done(events: usize) -> Self {
        Self { events, reset: None }
    }

    fn interrupted(events: usize, reset: ResetReport) -> Self {
        Self {
            events,
            reset: Some(reset),
        }
    }
}

/// An offspring waiting to be born and the two parents it replaces.
struct Birth<P> {
    kind: AgentKind,
    parents: [AgentId; 2],
    pos: Array1<f32>,
    policy: P,
}

impl<P: Policy> Ecosystem<P> {
    /// Every predator eats every prey it collides with, gaining
    /// [`PREDATION_GAIN`] per kill.
    pub fn resolve_predation(&mut self) -> Result<PhaseOutcome, SimulationError> {
        let mut eaten = 0;

        for p in 0..self.predators.len() {
            let mut j = 0;
            while j < self.prey.len() {
                let predator = &self.predators[p];
                let prey = &self.prey[j];
                if !colliding(&predator.pos, predator.size(), &prey.pos, prey.size()) {
                    j += 1;
                    continue;
                }

                let id = prey.id;
                self.predators[p].gain_health(PREDATION_GAIN);
                eaten += 1;
                // the next prey shifted into slot j
                if let Some(reset) = self.kill(AgentKind::Prey, id, DeathCause::Predation)? {
                    return Ok(PhaseOutcome::interrupted(eaten, reset));
                }
            }
        }

        Ok(PhaseOutcome::done(eaten))
    }

    /// Every prey eats every food item it collides with. The item jumps to a
    /// new random position between the two health gains.
    pub fn resolve_foraging(&mut self) -> PhaseOutcome {
        let (width, height) = (self.params.world_width, self.params.world_height);
        let mut meals = 0;

        for prey in &mut self.prey {
            for food in &mut self.food {
                if colliding(&prey.pos, prey.size(), &food.pos, food.size()) {
                    prey.gain_health(FORAGING_CONTACT_GAIN);
                    food.relocate(width, height, &mut self.rng);
                    prey.gain_health(FORAGING_MEAL_GAIN);
                    meals += 1;
                }
            }
        }

        PhaseOutcome::done(meals)
    }

    /// Pairs colliding same-kind agents, prey first. Each pair produces one
    /// offspring at the first parent's position carrying the averaged policy,
    /// and both parents are removed. Every offspring policy is computed before
    /// anything is modified.
    pub fn resolve_breeding(&mut self) -> Result<PhaseOutcome, SimulationError> {
        if !self.params.breeding_enabled {
            return Ok(PhaseOutcome::default());
        }

        let mut births = Vec::new();
        for kind in [AgentKind::Prey, AgentKind::Predator] {
            let agents = self.agents(kind);
            for (a, b) in mating_pairs(agents) {
                let (first, second) = (&agents[a], &agents[b]);
                births.push(Birth {
                    kind,
                    parents: [first.id, second.id],
                    pos: first.pos.clone(),
                    policy: first.policy.average(&second.policy)?,
                });
            }
        }

        let born = births.len();
        for birth in births {
            self.spawn_agent(birth.kind, Some(birth.pos), birth.policy);
            for parent in birth.parents {
                if let Some(reset) = self.kill(birth.kind, parent, DeathCause::Breeding)? {
                    return Ok(PhaseOutcome::interrupted(born, reset));
                }
            }
        }

        Ok(PhaseOutcome::done(born))
    }

    /// Ages every agent by one tick, charges one health point and removes
    /// those that ran out.
    pub fn age_and_decay(&mut self) -> Result<PhaseOutcome, SimulationError> {
        let mut starved = Vec::new();

        for agent in self.prey.iter_mut().chain(self.predators.iter_mut()) {
            agent.age_one_tick();
            self.max_time_alive = self.max_time_alive.max(agent.time_alive);
            if !agent.is_alive() {
                starved.push((agent.kind, agent.id));
            }
        }

        let mut deaths = 0;
        for (kind, id) in starved {
            deaths += 1;
            if let Some(reset) = self.kill(kind, id, DeathCause::Starvation)? {
                return Ok(PhaseOutcome::interrupted(deaths, reset));
            }
        }

        Ok(PhaseOutcome::done(deaths))
    }
}

/// Greedy pairing in collection order: each agent is matched with the first
/// later, still unmatched agent it collides with.
pub fn mating_pairs<P>(agents: &[Agent<P>]) -> Vec<(usize, usize)> {
    let mut matched = vec![false; agents.len()];
    let mut pairs = Vec::new();

    for a in 0..agents.len() {
        if matched[a] {
            continue;
        }
        let first = &agents[a];
        let partner = (a + 1..agents.len()).find(|&b| {
            !matched[b] && colliding(&first.pos, first.size(), &agents[b].pos, agents[b].size())
        });
        if let Some(b) = partner {
            matched[a] = true;
            matched[b] = true;
            pairs.push((a, b));
        }
    }

    pairs
}
