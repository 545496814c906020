//! The ecosystem aggregate and its tick.
//!
//! One [`Ecosystem`] owns every entity, counter and the random number
//! generator. [`Ecosystem::step`] runs one tick as a strict sequence of
//! phases:
//!
//! 1. liveness check (a fully extinct world resets and the tick ends)
//! 2. perceive: encode every agent from the same snapshot
//! 3. decide: evaluate every policy
//! 4. move: steer, then advance
//! 5. interactions: predation, foraging, breeding
//! 6. aging and per-tick health decay
//!
//! A kill that leaves both agent collections empty resets the population on
//! the spot and ends the tick. Errors abort the tick before it mutates
//! anything it cannot finish, and halt the ecosystem for good.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use tracing::error;

use super::agent::{Agent, AgentKind};
use super::brain::{Brain, Policy};
use super::error::{ConfigError, SimulationError};
use super::event_log::DeathLog;
use super::evolution::EvolutionEngine;
use super::food::Food;
use super::interactions::Phase;
use super::params::Params;
use super::perception::Perception;
use super::population::{PolicyLedger, ResetReport};
use super::snapshot::{Census, EntityColor, GenerationRecord, Sprite};

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Tick number, starting at 1.
    pub tick: u64,
    /// Prey eaten.
    pub predations: usize,
    /// Food items eaten.
    pub meals: usize,
    /// Offspring born.
    pub births: usize,
    /// Agents that ran out of health.
    pub starvations: usize,
    /// Set when the population was reset during this tick.
    pub reset: Option<ResetReport>,
}

impl TickReport {
    fn record(&mut self, phase: Phase, events: usize) {
        match phase {
            Phase::Predation => self.predations = events,
            Phase::Foraging => self.meals = events,
            Phase::Breeding => self.births = events,
            Phase::Aging => self.starvations = events,
        }
    }
}

/// The main ecosystem containing all simulation state.
#[derive(Debug, Clone)]
pub struct Ecosystem<P = Brain> {
    /// Run configuration.
    pub params: Params,
    /// Living predators, in creation order.
    pub predators: Vec<Agent<P>>,
    /// Living prey, in creation order.
    pub prey: Vec<Agent<P>>,
    /// Food items.
    pub food: Vec<Food>,
    /// Generation counter, starting at 1.
    pub generation: u32,
    /// Ticks executed.
    pub tick: u64,
    /// Longest time alive since the last reset.
    pub max_time_alive: u32,
    pub(crate) generation_started_at: u64,
    pub(crate) evolution: EvolutionEngine<P>,
    pub(crate) death_log: DeathLog,
    pub(crate) history: Vec<GenerationRecord>,
    pub(crate) ledger: PolicyLedger,
    pub(crate) next_id: u64,
    pub(crate) fault: Option<SimulationError>,
    pub(crate) rng: SmallRng,
}

impl<P: Policy> Ecosystem<P> {
    /// Creates a new ecosystem with random agents and food.
    pub fn new(params: Params) -> Result<Self, ConfigError> {
        params.validate()?;

        let rng = match params.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::seed_from_u64(rand::random()),
        };

        let mut ecosystem = Self {
            predators: Vec::with_capacity(params.num_predators),
            prey: Vec::with_capacity(params.num_prey),
            food: Vec::with_capacity(params.num_food),
            generation: 1,
            tick: 0,
            max_time_alive: 0,
            generation_started_at: 0,
            evolution: EvolutionEngine::new(params.elite_selection),
            death_log: DeathLog::new(params.death_log_capacity),
            history: Vec::new(),
            ledger: PolicyLedger::default(),
            next_id: 0,
            fault: None,
            rng,
            params,
        };

        for _ in 0..ecosystem.params.num_predators {
            ecosystem.spawn_random(AgentKind::Predator);
        }
        for _ in 0..ecosystem.params.num_prey {
            ecosystem.spawn_random(AgentKind::Prey);
        }
        ecosystem.regenerate_food();

        Ok(ecosystem)
    }

    /// Advances the simulation by one tick.
    ///
    /// After a failed tick every further call returns the same error.
    pub fn step(&mut self) -> Result<TickReport, SimulationError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }

        self.run_tick().inspect_err(|err| {
            error!(tick = self.tick, generation = self.generation, %err, "simulation halted");
            self.fault = Some(err.clone());
        })
    }

    fn run_tick(&mut self) -> Result<TickReport, SimulationError> {
        let mut report = TickReport {
            tick: self.tick + 1,
            ..TickReport::default()
        };

        if self.is_extinct() {
            self.tick += 1;
            report.reset = Some(self.reset_population());
            return Ok(report);
        }

        // perceive
        let perception = Perception::new(self)?;
        let predator_observations = (0..self.predators.len())
            .map(|i| perception.encode(self, AgentKind::Predator, i))
            .collect::<Result<Vec<_>, _>>()?;
        let prey_observations = (0..self.prey.len())
            .map(|i| perception.encode(self, AgentKind::Prey, i))
            .collect::<Result<Vec<_>, _>>()?;

        // decide
        let predator_actions = self
            .predators
            .iter()
            .zip(&predator_observations)
            .map(|(agent, observation)| agent.policy.infer(observation))
            .collect::<Result<Vec<_>, _>>()?;
        let prey_actions = self
            .prey
            .iter()
            .zip(&prey_observations)
            .map(|(agent, observation)| agent.policy.infer(observation))
            .collect::<Result<Vec<_>, _>>()?;

        self.tick += 1;

        // move
        let Params {
            action_mode,
            action_scale,
            world_width,
            world_height,
            ..
        } = self.params;
        let moves = self
            .prey
            .iter_mut()
            .zip(prey_actions)
            .chain(self.predators.iter_mut().zip(predator_actions));
        for (agent, action) in moves {
            agent.steer(action, action_mode, action_scale);
            agent.advance(world_width, world_height);
        }

        for phase in Phase::ORDER {
            let outcome = match phase {
                Phase::Predation => self.resolve_predation()?,
                Phase::Foraging => self.resolve_foraging(),
                Phase::Breeding => self.resolve_breeding()?,
                Phase::Aging => self.age_and_decay()?,
            };
            report.record(phase, outcome.events);
            if outcome.reset.is_some() {
                report.reset = outcome.reset;
                break;
            }
        }

        Ok(report)
    }

    /// Runs `ticks` steps, stopping at the first error.
    pub fn run(&mut self, ticks: u64) -> Result<Vec<TickReport>, SimulationError> {
        (0..ticks).map(|_| self.step()).collect()
    }
}

impl<P> Ecosystem<P> {
    /// Agents of `kind`, in collection order.
    pub fn agents(&self, kind: AgentKind) -> &[Agent<P>] {
        match kind {
            AgentKind::Predator => &self.predators,
            AgentKind::Prey => &self.prey,
        }
    }

    /// Mutable access to the collection of `kind`.
    pub fn agents_mut(&mut self, kind: AgentKind) -> &mut Vec<Agent<P>> {
        match kind {
            AgentKind::Predator => &mut self.predators,
            AgentKind::Prey => &mut self.prey,
        }
    }

    /// Both agent collections are empty.
    pub fn is_extinct(&self) -> bool {
        self.predators.is_empty() && self.prey.is_empty()
    }

    /// Population counters for display.
    pub fn census(&self) -> Census {
        Census {
            tick: self.tick,
            generation: self.generation,
            predators: self.predators.len(),
            prey: self.prey.len(),
            food: self.food.len(),
            max_time_alive: self.max_time_alive,
            deaths: self.death_log.total(),
        }
    }

    /// Circles to draw this frame: prey, then predators, then food.
    pub fn sprites(&self) -> Vec<Sprite> {
        let agents = self.prey.iter().chain(&self.predators).map(|agent| Sprite {
            x: agent.pos[0],
            y: agent.pos[1],
            radius: agent.size(),
            color: agent.kind.color(),
        });
        let food = self.food.iter().map(|food| Sprite {
            x: food.pos[0],
            y: food.pos[1],
            radius: food.size(),
            color: EntityColor::Yellow,
        });
        agents.chain(food).collect()
    }

    /// Finished generations, oldest first.
    pub fn history(&self) -> &[GenerationRecord] {
        &self.history
    }

    /// Recent deaths, newest first.
    pub fn death_log(&self) -> &DeathLog {
        &self.death_log
    }

    /// Policy creation and release counters.
    pub fn ledger(&self) -> PolicyLedger {
        self.ledger
    }

    /// Elite pools and pending candidates.
    pub fn evolution(&self) -> &EvolutionEngine<P> {
        &self.evolution
    }

    /// The error that halted the simulation, if any.
    pub fn fault(&self) -> Option<&SimulationError> {
        self.fault.as_ref()
    }
}
