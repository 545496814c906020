//! Spatial indexing for nearest-neighbour queries.
//!
//! One KD-tree per agent kind, rebuilt from the current positions whenever a
//! phase needs neighbour lookups.

use kdtree::distance::squared_euclidean;
use kdtree::{ErrorKind as KdTreeError, KdTree};
use ndarray::Array1;

use super::agent::{Agent, AgentKind};
use super::error::SimulationError;

/// Type alias for 2D spatial KD-tree used for efficient neighbor queries.
pub type Tree2D = KdTree<f32, usize, Vec<f32>>;

/// Nearest neighbour of an agent within its own collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index in the collection.
    pub index: usize,
    /// Euclidean distance.
    pub distance: f32,
}

/// KD-trees for both agent collections.
pub struct SpatialIndex {
    predators: Tree2D,
    prey: Tree2D,
}

impl SpatialIndex {
    /// Builds the index from both agent collections.
    pub fn build<P>(predators: &[Agent<P>], prey: &[Agent<P>]) -> Result<Self, SimulationError> {
        Ok(Self {
            predators: build_tree(predators).map_err(spatial_error)?,
            prey: build_tree(prey).map_err(spatial_error)?,
        })
    }

    /// Nearest other member of `kind`'s collection to the agent stored at `index`.
    ///
    /// Fails when the tree rejects the query point, e.g. a non-finite position.
    pub fn nearest_same_kind(
        &self,
        kind: AgentKind,
        index: usize,
        pos: &Array1<f32>,
    ) -> Result<Option<Neighbor>, SimulationError> {
        let tree = match kind {
            AgentKind::Predator => &self.predators,
            AgentKind::Prey => &self.prey,
        };

        // Self is always one of the two closest points.
        let nearest = tree
            .nearest(&pos.to_vec(), 2, &squared_euclidean)
            .map_err(spatial_error)?;
        Ok(nearest
            .into_iter()
            .find(|(_, other)| **other != index)
            .map(|(dist_sq, &other)| Neighbor {
                index: other,
                distance: dist_sq.sqrt(),
            }))
    }
}

/// Nearest other agent of the same collection by linear scan.
///
/// Used for one-off lookups (fitness at death) where building a tree is not
/// worth it.
pub fn nearest_in<P>(agents: &[Agent<P>], index: usize) -> Option<Neighbor> {
    let pos = &agents.get(index)?.pos;
    let mut best: Option<Neighbor> = None;
    for (i, other) in agents.iter().enumerate() {
        if i == index {
            continue;
        }
        let distance = super::geometric_utils::distance(pos, &other.pos);
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(Neighbor { index: i, distance });
        }
    }
    best
}

/// Helper function to build a KD-tree from a collection of agents.
fn build_tree<P>(agents: &[Agent<P>]) -> Result<Tree2D, KdTreeError> {
    let mut tree = KdTree::with_capacity(2, agents.len().max(1));
    for (i, agent) in agents.iter().enumerate() {
        tree.add(agent.pos.to_vec(), i)?;
    }
    Ok(tree)
}

fn spatial_error(err: KdTreeError) -> SimulationError {
    SimulationError::SpatialIndex(format!("{err:?}"))
}
