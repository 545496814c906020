//! Geometric utility functions for distance calculations and collisions.

use geo::algorithm::Distance;
use geo::{Euclidean, Point};
use ndarray::Array1;

/// Euclidean distance between two positions.
pub fn distance(a: &Array1<f32>, b: &Array1<f32>) -> f32 {
    Euclidean.distance(Point::new(a[0], a[1]), Point::new(b[0], b[1]))
}

/// Two circles collide when their centres are closer than the sum of their radii.
///
/// # Arguments
///
/// * `a`, `b` - Circle centres
/// * `size_a`, `size_b` - Circle radii
pub fn colliding(a: &Array1<f32>, size_a: f32, b: &Array1<f32>, size_b: f32) -> bool {
    distance(a, b) < size_a + size_b
}
