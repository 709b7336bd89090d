//! Configuration types for the beat search and piece assembly.

use serde::{Deserialize, Serialize};

/// Genetic search parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Crossover probability (0.0-1.0).
    #[serde(default = "default_crossover_rate")]
    pub crossover_rate: f64,
    /// Mutation probability per offspring (0.0-1.0).
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// A beat closer than this to the target is returned immediately.
    #[serde(default = "default_min_fitness")]
    pub min_fitness: f64,
    /// Generation cap; the search always stops after this many generations.
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
    /// Number of recently returned beats that may not be returned again.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Minimum number of eligible pool beats required to search.
    #[serde(default = "default_min_pool_size")]
    pub min_pool_size: usize,
    /// Parent-draw rounds per generation, as a multiple of population size.
    #[serde(default = "default_reproduction_attempts")]
    pub reproduction_attempts: usize,
    /// Require a match to share the seed's chord root.
    #[serde(default)]
    pub match_chord: bool,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            crossover_rate: default_crossover_rate(),
            mutation_rate: default_mutation_rate(),
            min_fitness: default_min_fitness(),
            max_generations: default_max_generations(),
            history_capacity: default_history_capacity(),
            min_pool_size: default_min_pool_size(),
            reproduction_attempts: default_reproduction_attempts(),
            match_chord: false,
            random_seed: None,
        }
    }
}

fn default_crossover_rate() -> f64 {
    0.7
}
fn default_mutation_rate() -> f64 {
    0.02
}
fn default_min_fitness() -> f64 {
    0.9
}
fn default_max_generations() -> usize {
    10
}
fn default_history_capacity() -> usize {
    24
}
fn default_min_pool_size() -> usize {
    2
}
fn default_reproduction_attempts() -> usize {
    4
}

/// Piece generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieceConfig {
    /// Number of beats to generate.
    #[serde(default = "default_beats")]
    pub beats: usize,
    /// Beats grouped into one measure.
    #[serde(default = "default_beats_per_measure")]
    pub beats_per_measure: usize,
    /// Number given to the first generated measure.
    #[serde(default = "default_first_measure")]
    pub first_measure: u32,
    /// SPEAC bucket to search. `None` searches every bucket.
    #[serde(default)]
    pub bucket: Option<String>,
}

impl Default for PieceConfig {
    fn default() -> Self {
        Self {
            beats: default_beats(),
            beats_per_measure: default_beats_per_measure(),
            first_measure: default_first_measure(),
            bucket: None,
        }
    }
}

fn default_beats() -> usize {
    120
}
fn default_beats_per_measure() -> usize {
    4
}
fn default_first_measure() -> u32 {
    2
}

/// Top-level configuration for the composer binary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComposerConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub piece: PieceConfig,
}

impl SearchConfig {
    /// Validate search parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_rate(self.crossover_rate, "crossover_rate")?;
        check_rate(self.mutation_rate, "mutation_rate")?;
        if !self.min_fitness.is_finite() {
            return Err(ConfigError::InvalidMinFitness(self.min_fitness));
        }
        if self.max_generations == 0 {
            return Err(ConfigError::InvalidGenerationCap);
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::InvalidHistoryCapacity);
        }
        if self.min_pool_size == 0 {
            return Err(ConfigError::InvalidPoolSize);
        }
        if self.reproduction_attempts == 0 {
            return Err(ConfigError::InvalidReproductionAttempts);
        }
        Ok(())
    }
}

impl PieceConfig {
    /// Validate piece parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.beats_per_measure == 0 {
            return Err(ConfigError::InvalidBeatsPerMeasure);
        }
        Ok(())
    }
}

impl ComposerConfig {
    /// Validate the whole configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search.validate()?;
        self.piece.validate()
    }
}

fn check_rate(rate: f64, name: &'static str) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&rate) {
        Ok(())
    } else {
        Err(ConfigError::InvalidRate { name, rate })
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be within [0, 1], got {rate}")]
    InvalidRate { name: &'static str, rate: f64 },
    #[error("min_fitness must be finite, got {0}")]
    InvalidMinFitness(f64),
    #[error("Generation cap must be at least 1")]
    InvalidGenerationCap,
    #[error("History capacity must be at least 1")]
    InvalidHistoryCapacity,
    #[error("Minimum pool size must be at least 1")]
    InvalidPoolSize,
    #[error("Reproduction attempts must be at least 1")]
    InvalidReproductionAttempts,
    #[error("Beats per measure must be at least 1")]
    InvalidBeatsPerMeasure,
}
