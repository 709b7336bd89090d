//! Generation loop for beat search.
//!
//! Each `get_beat` call rebuilds the population from the gene pool and runs
//! evaluate / select / recombine / mutate until a beat is close enough to
//! the seed and not recently returned, or the generation cap is reached.

use log::{debug, info, warn};

use crate::corpus::{CorpusError, GenePool, GenePoolSource};
use crate::schema::{
    Beat, ConfigError, SearchConfig, SearchOutcome, SearchPhase, SearchProgress, StopReason,
};

use super::features::same_chord;
use super::fitness::{FitnessEvaluator, UNEVALUATED_FITNESS};
use super::genome::BeatRng;
use super::history::HistoryBuffer;
use super::selection::roulette;

/// A candidate beat and its distance from the target.
#[derive(Debug, Clone)]
pub struct Chromosome {
    pub beat: Beat,
    pub fitness: f64,
}

impl Chromosome {
    /// Wrap a beat with unevaluated fitness.
    pub fn new(beat: Beat) -> Self {
        Self {
            beat,
            fitness: UNEVALUATED_FITNESS,
        }
    }
}

/// Result of scoring one generation.
enum Evaluation {
    /// Index of an accepted chromosome; scoring stopped there.
    Match(usize),
    /// Whole population scored without an acceptable match.
    Scored { total_fitness: f64 },
}

/// Bookkeeping from breeding one generation.
#[derive(Debug, Clone, Copy, Default)]
struct Reproduction {
    rounds: usize,
    skipped_draws: usize,
    discarded: usize,
    /// Whether the offspring replaced the population.
    replaced: bool,
}

/// Search engine bound to one gene pool.
///
/// The history buffer persists across `get_beat` calls; the population is
/// rebuilt on every call.
pub struct SearchEngine {
    config: SearchConfig,
    rng: BeatRng,
    pool: GenePool,
    history: HistoryBuffer,
    population: Vec<Chromosome>,
    next_generation: Vec<Chromosome>,
    generation: usize,
}

impl SearchEngine {
    /// Create an engine over `pool`.
    ///
    /// Fails if the configuration is invalid or the pool holds fewer than
    /// `min_pool_size` eligible beats.
    pub fn new(pool: GenePool, config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        if pool.len() < config.min_pool_size {
            return Err(SearchError::CorpusExhausted {
                pool: pool.name().to_string(),
                eligible: pool.len(),
                required: config.min_pool_size,
            });
        }

        let rng = match config.random_seed {
            Some(seed) => BeatRng::new(seed),
            None => BeatRng::random(),
        };
        let history = HistoryBuffer::new(config.history_capacity);

        Ok(Self {
            config,
            rng,
            pool,
            history,
            population: Vec::new(),
            next_generation: Vec::new(),
            generation: 0,
        })
    }

    /// Load a pool from `source` and create an engine over it.
    ///
    /// `bucket = None` loads every bucket.
    pub fn from_source<S: GenePoolSource + ?Sized>(
        source: &S,
        bucket: Option<&str>,
        config: SearchConfig,
    ) -> Result<Self, SearchError> {
        let pool = match bucket {
            Some(bucket) => GenePool::load(source, bucket)?,
            None => GenePool::load_all(source)?,
        };
        Self::new(pool, config)
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn pool(&self) -> &GenePool {
        &self.pool
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn population(&self) -> &[Chromosome] {
        &self.population
    }

    /// Generation counter of the last search (1-based).
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Copy of a uniformly chosen pool beat, for seeding a piece.
    pub fn random_pool_beat(&mut self) -> Beat {
        let idx = self.rng.index(self.pool.len());
        self.pool.beats()[idx].clone()
    }

    /// Find a beat whose features are within `min_fitness` of `seed`.
    pub fn get_beat(&mut self, seed: &Beat, min_fitness: f64) -> Beat {
        self.get_beat_with_callback(seed, min_fitness, |_| {}).beat
    }

    /// Run the search, reporting progress at each generation boundary.
    ///
    /// When the cap is hit, the outcome and the final callback report
    /// `max_generations`: the number of generations bred, not the index of
    /// the offspring population the fallback beat is picked from.
    pub fn get_beat_with_callback<F>(
        &mut self,
        seed: &Beat,
        min_fitness: f64,
        callback: F,
    ) -> SearchOutcome
    where
        F: Fn(&SearchProgress),
    {
        let evaluator = FitnessEvaluator::for_seed(seed);
        self.initialize();
        callback(&self.progress(SearchPhase::Initializing, 0.0));

        loop {
            let total_fitness = match self.evaluate_population(&evaluator, seed, min_fitness) {
                Evaluation::Match(idx) => {
                    let chromosome = &self.population[idx];
                    info!(
                        "Match found in generation {}! Fitness: {:.3}",
                        self.generation, chromosome.fitness
                    );
                    let outcome = SearchOutcome {
                        beat: chromosome.beat.clone(),
                        fitness: chromosome.fitness,
                        generation: self.generation,
                        stop_reason: StopReason::MatchFound,
                    };
                    self.history.push(outcome.beat.clone());
                    callback(&self.progress(SearchPhase::Complete, 0.0));
                    return outcome;
                }
                Evaluation::Scored { total_fitness } => {
                    let progress = self.progress(SearchPhase::Evaluating, total_fitness);
                    debug!(
                        "Generation {}, closest match: {:.3}",
                        progress.generation, progress.generation_best
                    );
                    callback(&progress);
                    total_fitness
                }
            };

            if !self.reproduce(total_fitness).replaced {
                warn!(
                    "Generation {} produced no valid offspring, keeping current population",
                    self.generation
                );
            }
            self.generation += 1;
            if self.generation > self.config.max_generations {
                break;
            }
        }

        info!(
            "No beat under {} within {} generations, returning closest",
            min_fitness, self.config.max_generations
        );
        let total_fitness = self.score_population(&evaluator);
        let best = self
            .population
            .iter()
            .min_by(|a, b| a.fitness.total_cmp(&b.fitness))
            .cloned()
            .unwrap_or_else(|| Chromosome {
                beat: seed.clone(),
                fitness: evaluator.evaluate(seed),
            });
        let mut progress = self.progress(SearchPhase::Complete, total_fitness);
        progress.generation = self.config.max_generations;
        callback(&progress);

        SearchOutcome {
            beat: best.beat,
            fitness: best.fitness,
            generation: self.config.max_generations,
            stop_reason: StopReason::MaxGenerations,
        }
    }

    /// Fill the population with copies of the gene pool.
    fn initialize(&mut self) {
        self.population.clear();
        self.population
            .extend(self.pool.beats().iter().cloned().map(Chromosome::new));
        self.generation = 1;
    }

    /// Score chromosomes in order, stopping at the first acceptable match.
    fn evaluate_population(
        &mut self,
        evaluator: &FitnessEvaluator,
        seed: &Beat,
        min_fitness: f64,
    ) -> Evaluation {
        let mut total_fitness = 0.0;
        for (idx, chromosome) in self.population.iter_mut().enumerate() {
            chromosome.fitness = evaluator.evaluate(&chromosome.beat);
            total_fitness += chromosome.fitness;

            if chromosome.fitness < min_fitness
                && (!self.config.match_chord || same_chord(seed, &chromosome.beat))
                && !self.history.contains(&chromosome.beat)
            {
                return Evaluation::Match(idx);
            }
        }
        Evaluation::Scored { total_fitness }
    }

    /// Score every chromosome and return the total.
    fn score_population(&mut self, evaluator: &FitnessEvaluator) -> f64 {
        self.population
            .iter_mut()
            .map(|c| {
                c.fitness = evaluator.evaluate(&c.beat);
                c.fitness
            })
            .sum()
    }

    /// Breed the next generation and swap it in.
    ///
    /// The current population is kept if no offspring is eligible.
    fn reproduce(&mut self, total_fitness: f64) -> Reproduction {
        let target = self.population.len();
        let max_rounds = target.saturating_mul(self.config.reproduction_attempts);
        let mut stats = Reproduction::default();

        self.next_generation.clear();
        while self.next_generation.len() < target && stats.rounds < max_rounds {
            stats.rounds += 1;

            let first = roulette(&self.population, total_fitness, &mut self.rng);
            let second = roulette(&self.population, total_fitness, &mut self.rng);
            let (Some(i1), Some(i2)) = (first, second) else {
                stats.skipped_draws += 1;
                continue;
            };

            let (mut offspring1, mut offspring2) = self.rng.crossover(
                &self.population[i1].beat,
                &self.population[i2].beat,
                self.config.crossover_rate,
            );
            self.rng.mutate(&mut offspring1, self.config.mutation_rate);
            self.rng.mutate(&mut offspring2, self.config.mutation_rate);

            for offspring in [offspring1, offspring2] {
                if offspring.is_eligible() {
                    self.next_generation.push(Chromosome::new(offspring));
                } else {
                    stats.discarded += 1;
                }
            }
        }

        if stats.skipped_draws > 0 || stats.discarded > 0 {
            debug!(
                "Generation {}: {} empty draws, {} offspring discarded",
                self.generation, stats.skipped_draws, stats.discarded
            );
        }

        if self.next_generation.is_empty() {
            return stats;
        }
        std::mem::swap(&mut self.population, &mut self.next_generation);
        stats.replaced = true;
        stats
    }

    /// Snapshot of the current generation.
    fn progress(&self, phase: SearchPhase, total_fitness: f64) -> SearchProgress {
        let generation_best = self
            .population
            .iter()
            .map(|c| c.fitness)
            .fold(f64::INFINITY, f64::min);
        let avg_fitness = if self.population.is_empty() {
            0.0
        } else {
            total_fitness / self.population.len() as f64
        };

        SearchProgress {
            generation: self.generation,
            max_generations: self.config.max_generations,
            population_size: self.population.len(),
            total_fitness,
            generation_best,
            avg_fitness,
            phase,
        }
    }
}

/// Errors that prevent a search from starting.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Gene pool {pool} has {eligible} eligible beats, at least {required} required")]
    CorpusExhausted {
        pool: String,
        eligible: usize,
        required: usize,
    },
    #[error("Invalid search configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to load gene pool: {0}")]
    Corpus(#[from] CorpusError),
}
