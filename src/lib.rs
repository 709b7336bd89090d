//! SPEAC GA - Genetic search for beats over a classified beat corpus.
//!
//! This crate evolves short musical fragments ("beats") toward the features
//! of a seed beat, using a corpus of beats filed under SPEAC categories as
//! the gene pool.
//!
//! # Architecture
//!
//! - `schema`: Beat, configuration and search result types
//! - `evolution`: Features, fitness, genetic operators and the search loop
//! - `corpus`: Gene pools and the bucket files they are loaded from
//! - `assembly` / `compose`: Turning successive search results into a score
//!
//! # Example
//!
//! ```rust,no_run
//! use speac_ga::{
//!     corpus::JsonCorpus,
//!     compose::Composer,
//!     evolution::SearchEngine,
//!     schema::ComposerConfig,
//! };
//!
//! let config = ComposerConfig::default();
//! let corpus = JsonCorpus::new("data/SPEAC");
//! let engine = SearchEngine::from_source(&corpus, None, config.search.clone()).unwrap();
//!
//! let mut composer = Composer::new(engine, config.piece);
//! let (score, stats) = composer.compose_random();
//!
//! println!("{} measures, {} matched beats", score.measures.len(), stats.matched);
//! ```

pub mod assembly;
pub mod compose;
pub mod corpus;
pub mod evolution;
pub mod schema;

// Re-export commonly used types
pub use corpus::{GenePool, JsonCorpus};
pub use evolution::{SearchEngine, SearchError};
pub use schema::{Beat, ComposerConfig, SearchConfig};
