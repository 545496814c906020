//! Predator and prey agents: identity, kinematics and vital state.

use ndarray::Array1;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::brain::{ACTION_SIZE, Brain};
use super::params::ActionMode;
use super::snapshot::EntityColor;

/// Divisor used to normalise health in observations, for both kinds.
pub const HEALTH_NORMALIZATION: f32 = 500.0;

/// Sequence number assigned when an agent is created. Never reused within an
/// ecosystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The two agent populations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    /// Eats prey.
    Predator,
    /// Eats food.
    Prey,
}

impl AgentKind {
    /// Collision radius.
    pub fn size(self) -> f32 {
        match self {
            AgentKind::Predator => 15.0,
            AgentKind::Prey => 10.0,
        }
    }

    /// Health at birth.
    pub fn initial_health(self) -> i32 {
        match self {
            AgentKind::Predator => 500,
            AgentKind::Prey => 1000,
        }
    }

    /// Display color.
    pub fn color(self) -> EntityColor {
        match self {
            AgentKind::Predator => EntityColor::Red,
            AgentKind::Prey => EntityColor::Green,
        }
    }

    /// One-hot encoding used in observations: prey `(1, 0)`, predator `(0, 1)`.
    pub fn one_hot(self) -> [f32; 2] {
        match self {
            AgentKind::Prey => [1.0, 0.0],
            AgentKind::Predator => [0.0, 1.0],
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentKind::Predator => f.write_str("predator"),
            AgentKind::Prey => f.write_str("prey"),
        }
    }
}

/// A mobile agent steered by its own policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent<P = Brain> {
    /// Unique identifier for this agent.
    pub id: AgentId,
    /// Predator or prey.
    pub kind: AgentKind,
    /// Position in 2D space.
    pub pos: Array1<f32>,
    /// Velocity added to the position every tick.
    pub vel: Array1<f32>,
    /// Remaining health; the agent dies when it reaches 0.
    pub health: i32,
    /// Ticks survived.
    pub time_alive: u32,
    /// Decision function owned by this agent.
    pub policy: P,
}

impl<P> Agent<P> {
    /// Creates an agent at `pos` with a random velocity in `[-1, 1)²`.
    pub fn new(
        id: AgentId,
        kind: AgentKind,
        pos: Array1<f32>,
        policy: P,
        rng: &mut dyn RngCore,
    ) -> Self {
        let vel = Array1::from_shape_simple_fn(2, || rng.random_range(-1.0..1.0));
        Self {
            id,
            kind,
            pos,
            vel,
            health: kind.initial_health(),
            time_alive: 0,
            policy,
        }
    }

    /// Creates an agent at a uniformly random position inside the world.
    pub fn new_random(
        id: AgentId,
        kind: AgentKind,
        world_width: f32,
        world_height: f32,
        policy: P,
        rng: &mut dyn RngCore,
    ) -> Self {
        let pos = random_position(world_width, world_height, rng);
        Self::new(id, kind, pos, policy, rng)
    }

    /// Collision radius.
    pub fn size(&self) -> f32 {
        self.kind.size()
    }

    /// Checks if the agent still has health left.
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Applies a policy action to the velocity.
    pub fn steer(&mut self, action: [f32; ACTION_SIZE], mode: ActionMode, scale: f32) {
        for (v, a) in self.vel.iter_mut().zip(action) {
            let delta = match mode {
                ActionMode::Nudge => a,
                ActionMode::Centered => 2.0 * a - 1.0,
            };
            *v += delta * scale;
        }
    }

    /// Moves by one velocity step. Crossing a wall reverses the velocity
    /// component for the next step; the position itself is not clamped.
    pub fn advance(&mut self, world_width: f32, world_height: f32) {
        self.pos += &self.vel;

        if self.pos[0] < 0.0 || self.pos[0] > world_width {
            self.vel[0] = -self.vel[0];
        }
        if self.pos[1] < 0.0 || self.pos[1] > world_height {
            self.vel[1] = -self.vel[1];
        }
    }

    /// Adds `amount` health.
    pub fn gain_health(&mut self, amount: i32) {
        self.health += amount;
    }

    /// Advances the age by one tick and pays the per-tick health cost.
    pub fn age_one_tick(&mut self) {
        self.time_alive += 1;
        self.health -= 1;
    }
}

/// Uniform position in `[0, width) × [0, height)`.
pub fn random_position(world_width: f32, world_height: f32, rng: &mut dyn RngCore) -> Array1<f32> {
    Array1::from_vec(vec![
        rng.random_range(0.0..world_width),
        rng.random_range(0.0..world_height),
    ])
}
