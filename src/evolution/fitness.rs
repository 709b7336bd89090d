//! Fitness function for beat search.
//!
//! Fitness is the Euclidean distance between feature vectors: lower is
//! better and 0 is a perfect match. Sentinel feature values (no duration,
//! default pitch) take part in the distance like any other number.

use crate::schema::{Beat, FeatureVector};

use super::features::features;

/// Fitness of a chromosome that has not been evaluated yet.
pub const UNEVALUATED_FITNESS: f64 = 9999.0;

/// Euclidean distance between two feature vectors.
pub fn feature_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let dp = f64::from(a.pitch_center) - f64::from(b.pitch_center);
    let dd = f64::from(a.duration_average) - f64::from(b.duration_average);
    let dc = f64::from(a.note_count) - f64::from(b.note_count);
    (dp * dp + dd * dd + dc * dc).sqrt()
}

/// Distance of a candidate beat from the target features.
pub fn fitness(target: &FeatureVector, candidate: &Beat) -> f64 {
    feature_distance(target, &features(candidate))
}

/// Scores candidates against a fixed target.
#[derive(Debug, Clone, Copy)]
pub struct FitnessEvaluator {
    target: FeatureVector,
}

impl FitnessEvaluator {
    /// Create an evaluator targeting the features of a seed beat.
    pub fn for_seed(seed: &Beat) -> Self {
        Self {
            target: features(seed),
        }
    }

    pub fn evaluate(&self, candidate: &Beat) -> f64 {
        fitness(&self.target, candidate)
    }
}
