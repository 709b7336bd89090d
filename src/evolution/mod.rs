//! Genetic search over a gene pool of classified beats.
//!
//! # Overview
//!
//! - **Features** (`features`): pitch center, duration average, note count
//! - **Fitness** (`fitness`): Euclidean distance to the target features
//! - **Genome Operations** (`genome`): treble/bass crossover and third-shift mutation
//! - **Selection** (`selection`): roulette wheel over raw fitness
//! - **History** (`history`): bounded buffer of recently returned beats
//! - **Search** (`search`): the generation loop
//!
//! # Example
//!
//! ```rust,no_run
//! use speac_ga::corpus::{GenePool, JsonCorpus};
//! use speac_ga::evolution::SearchEngine;
//! use speac_ga::schema::SearchConfig;
//!
//! let corpus = JsonCorpus::new("data/SPEAC");
//! let pool = GenePool::load(&corpus, "S1").unwrap();
//! let mut engine = SearchEngine::new(pool, SearchConfig::default()).unwrap();
//!
//! let seed = engine.random_pool_beat();
//! let outcome = engine.get_beat_with_callback(&seed, 0.9, |progress| {
//!     println!("Generation {}: closest match = {:.3}",
//!         progress.generation, progress.generation_best);
//! });
//! println!("Fitness: {:.3} ({:?})", outcome.fitness, outcome.stop_reason);
//! ```

mod features;
mod fitness;
mod genome;
mod history;
mod search;
mod selection;

pub use features::{
    DEFAULT_PITCH_CENTER, NO_DURATION, duration_average, features, median, pitch_center,
    same_chord,
};
pub use fitness::{FitnessEvaluator, UNEVALUATED_FITNESS, feature_distance, fitness};
pub use genome::{BeatRng, recombine, shift_third};
pub use history::{DEFAULT_HISTORY_CAPACITY, HistoryBuffer};
pub use search::{Chromosome, SearchEngine, SearchError};
pub use selection::{roulette, spin};
