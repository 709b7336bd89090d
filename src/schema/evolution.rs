//! Search progress and result types.

use serde::{Deserialize, Serialize};

use super::Beat;

/// Features a beat is compared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Median linear pitch value.
    pub pitch_center: i32,
    /// Truncated mean note duration, or -1 when no note has a duration.
    pub duration_average: i32,
    /// Number of notes (rests included).
    pub note_count: i32,
}

impl FeatureVector {
    pub fn new(pitch_center: i32, duration_average: i32, note_count: i32) -> Self {
        Self {
            pitch_center,
            duration_average,
            note_count,
        }
    }
}

/// Current phase of a search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SearchPhase {
    /// Population built from the gene pool.
    #[default]
    Initializing,
    /// Fitness computed for the generation.
    Evaluating,
    /// Search finished.
    Complete,
}

/// Progress update emitted at generation boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchProgress {
    /// Current generation number (1-based).
    pub generation: usize,
    /// Generation cap.
    pub max_generations: usize,
    /// Chromosomes in the current population.
    pub population_size: usize,
    /// Sum of fitness over the evaluated population.
    pub total_fitness: f64,
    /// Lowest (best) fitness this generation.
    pub generation_best: f64,
    /// Mean fitness this generation.
    pub avg_fitness: f64,
    pub phase: SearchPhase,
}

/// Why a search stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// A beat under the fitness threshold that was not recently returned.
    MatchFound,
    /// Generation cap hit; best available beat returned.
    MaxGenerations,
}

/// Result of one `get_beat` search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub beat: Beat,
    pub fitness: f64,
    /// Generation the beat was found in, or the generation cap when the
    /// search fell back to the closest beat.
    pub generation: usize,
    pub stop_reason: StopReason,
}
