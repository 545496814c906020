//! Food items that prey consume for health.
//!
//! Food is never destroyed: an eaten item jumps to a new random position, so
//! the food count stays constant for the whole run.

use ndarray::Array1;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::agent::random_position;

/// Collision radius shared by all food items.
pub const FOOD_SIZE: f32 = 10.0;

/// A food item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    /// Position in 2D space.
    pub pos: Array1<f32>,
}

impl Food {
    /// Creates a new food item at a random position.
    pub fn new_random(world_width: f32, world_height: f32, rng: &mut dyn RngCore) -> Self {
        Self {
            pos: random_position(world_width, world_height, rng),
        }
    }

    /// Collision radius.
    pub fn size(&self) -> f32 {
        FOOD_SIZE
    }

    /// Moves the item to a fresh uniform position inside the world.
    pub fn relocate(&mut self, world_width: f32, world_height: f32, rng: &mut dyn RngCore) {
        self.pos = random_position(world_width, world_height, rng);
    }
}
