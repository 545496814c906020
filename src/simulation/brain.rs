//! Neural network implementation for agent brains.
//!
//! Agents only see a brain through the [`Policy`] capability: random creation,
//! inference, parameter averaging and cloning. Releasing a policy is dropping
//! it. [`Brain`] is the feed-forward implementation used by default.

use ndarray::{Array1, Array2};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::error::SimulationError;

/// Number of policy outputs (a 2D steering action).
pub const ACTION_SIZE: usize = 2;

/// Architecture requested when creating a fresh policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyShape {
    /// Observation vector length.
    pub inputs: usize,
    /// Units in the hidden layer.
    pub hidden: usize,
    /// Weights and biases are drawn from `[-weight_scale, weight_scale)`.
    pub weight_scale: f32,
}

/// Decision function mapping an observation to a 2D action.
pub trait Policy: Clone {
    /// Creates a policy with freshly randomised parameters.
    fn random(shape: &PolicyShape, rng: &mut dyn RngCore) -> Self;

    /// Observation length the policy was built for.
    fn observation_size(&self) -> usize;

    /// Evaluates the policy. Must not consume randomness.
    fn infer(&self, observation: &Array1<f32>) -> Result<[f32; ACTION_SIZE], SimulationError>;

    /// Element-wise mean of both parameter sets.
    fn average(&self, other: &Self) -> Result<Self, SimulationError>;
}

/// Layer non-linearity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    /// Hyperbolic tangent, range `(-1, 1)`.
    Tanh,
    /// Logistic function, range `(0, 1)`.
    Sigmoid,
}

impl Activation {
    #[inline]
    fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Tanh => x.tanh(),
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
        }
    }
}

/// A single dense layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mlp {
    /// Weight matrix (`output_size` × `input_size`).
    pub weights: Array2<f32>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f32>,
    /// Non-linearity applied to the layer output.
    pub activation: Activation,
}

impl Mlp {
    /// Creates a new layer with random weights and biases.
    pub fn new_random(
        input_size: usize,
        output_size: usize,
        scale: f32,
        activation: Activation,
        rng: &mut dyn RngCore,
    ) -> Self {
        Self {
            weights: Array2::from_shape_simple_fn((output_size, input_size), || {
                rng.random_range(-scale..scale)
            }),
            biases: Array1::from_shape_simple_fn(output_size, || rng.random_range(-scale..scale)),
            activation,
        }
    }

    /// Performs forward pass.
    #[inline]
    pub fn forward(&self, inputs: &Array1<f32>) -> Array1<f32> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;

        let activation = self.activation;
        output.mapv_inplace(|x| activation.apply(x));
        output
    }

    /// Creates a new layer by averaging two parent layers.
    pub fn crossover(parent1: &Mlp, parent2: &Mlp) -> Result<Self, SimulationError> {
        if parent1.weights.dim() != parent2.weights.dim() || parent1.activation != parent2.activation
        {
            let (out1, in1) = parent1.weights.dim();
            let (out2, in2) = parent2.weights.dim();
            return Err(SimulationError::ShapeMismatch {
                expected: vec![in1, out1],
                found: vec![in2, out2],
            });
        }

        Ok(Self {
            weights: &parent1.weights * 0.5 + &parent2.weights * 0.5,
            biases: &parent1.biases * 0.5 + &parent2.biases * 0.5,
            activation: parent1.activation,
        })
    }
}

/// Feed-forward brain: one tanh hidden layer and a sigmoid output layer of
/// [`ACTION_SIZE`] units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    /// Ordered layers from input to output.
    pub layers: Vec<Mlp>,
}

impl Brain {
    /// Layer sizes from input to output, e.g. `[inputs, hidden, 2]`.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.layers.len() + 1);
        if let Some(first) = self.layers.first() {
            sizes.push(first.weights.ncols());
        }
        sizes.extend(self.layers.iter().map(|layer| layer.weights.nrows()));
        sizes
    }

    /// Flattens all weights and biases into a single vector.
    pub fn to_flat_vector(&self) -> Vec<f32> {
        let mut flat = Vec::new();

        for layer in &self.layers {
            flat.extend(layer.weights.iter().copied());
            flat.extend(layer.biases.iter().copied());
        }

        flat
    }
}

impl Policy for Brain {
    fn random(shape: &PolicyShape, rng: &mut dyn RngCore) -> Self {
        let hidden = Mlp::new_random(
            shape.inputs,
            shape.hidden,
            shape.weight_scale,
            Activation::Tanh,
            rng,
        );
        let output = Mlp::new_random(
            shape.hidden,
            ACTION_SIZE,
            shape.weight_scale,
            Activation::Sigmoid,
            rng,
        );

        Self {
            layers: vec![hidden, output],
        }
    }

    fn observation_size(&self) -> usize {
        self.layers.first().map_or(0, |layer| layer.weights.ncols())
    }

    fn infer(&self, observation: &Array1<f32>) -> Result<[f32; ACTION_SIZE], SimulationError> {
        let expected = self.observation_size();
        if observation.len() != expected {
            return Err(SimulationError::ShapeMismatch {
                expected: vec![expected],
                found: vec![observation.len()],
            });
        }

        let mut output = observation.clone();
        for layer in &self.layers {
            output = layer.forward(&output);
        }

        Ok([output[0], output[1]])
    }

    fn average(&self, other: &Self) -> Result<Self, SimulationError> {
        if self.layers.len() != other.layers.len() {
            return Err(SimulationError::ShapeMismatch {
                expected: self.layer_sizes(),
                found: other.layer_sizes(),
            });
        }

        let layers = self
            .layers
            .iter()
            .zip(&other.layers)
            .map(|(layer1, layer2)| Mlp::crossover(layer1, layer2))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| SimulationError::ShapeMismatch {
                expected: self.layer_sizes(),
                found: other.layer_sizes(),
            })?;

        Ok(Self { layers })
    }
}
