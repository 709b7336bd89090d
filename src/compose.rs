//! Composition driver: one search per beat slot, each result seeding the next.

use log::info;

use crate::assembly::{PieceAssembly, Score};
use crate::evolution::SearchEngine;
use crate::schema::{Beat, PieceConfig, SearchProgress, StopReason};

/// Summary of a composed piece.
#[derive(Debug, Clone, Default)]
pub struct CompositionStats {
    /// Beats returned as matches under the fitness threshold.
    pub matched: usize,
    /// Beats returned as best-effort after the generation cap.
    pub fallbacks: usize,
}

/// Drives a search engine across all beat slots of a piece.
pub struct Composer {
    engine: SearchEngine,
    piece: PieceConfig,
}

impl Composer {
    pub fn new(engine: SearchEngine, piece: PieceConfig) -> Self {
        Self { engine, piece }
    }

    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    /// Compose from a random pool beat.
    pub fn compose_random(&mut self) -> (Score, CompositionStats) {
        let seed = self.engine.random_pool_beat();
        self.compose(seed)
    }

    /// Compose a piece starting from `seed`.
    pub fn compose(&mut self, seed: Beat) -> (Score, CompositionStats) {
        self.compose_with_callback(seed, |_, _| {})
    }

    /// Compose a piece, reporting `(beat index, progress)` from every search.
    pub fn compose_with_callback<F>(
        &mut self,
        mut seed: Beat,
        callback: F,
    ) -> (Score, CompositionStats)
    where
        F: Fn(usize, &SearchProgress),
    {
        let mut assembly = PieceAssembly::new(&self.piece);
        let mut stats = CompositionStats::default();
        let min_fitness = self.engine.config().min_fitness;

        for slot in 0..self.piece.beats {
            info!("Generating beat number: {}", slot);
            let outcome = self
                .engine
                .get_beat_with_callback(&seed, min_fitness, |p| callback(slot, p));
            match outcome.stop_reason {
                StopReason::MatchFound => stats.matched += 1,
                StopReason::MaxGenerations => stats.fallbacks += 1,
            }
            seed = outcome.beat.clone();
            assembly.push_beat(outcome.beat);
        }

        (assembly.finish(), stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::GenePool;
    use crate::schema::{Note, SearchConfig, SearchPhase, Step};
    use std::cell::Cell;

    fn pool() -> GenePool {
        let beats = [Step::A, Step::C, Step::E, Step::G, Step::B, Step::D]
            .iter()
            .enumerate()
            .map(|(i, &step)| {
                Beat::two_part(
                    vec![Note::new(step, 4, 24), Note::new(step.shifted(1), 4, 24)],
                    48,
                    vec![Note::new(step, 2, 24 + i as u32)],
                )
            })
            .collect();
        GenePool::from_beats("P1", beats)
    }

    #[test]
    fn test_compose_fills_measures() {
        let engine = SearchEngine::new(
            pool(),
            SearchConfig {
                random_seed: Some(9),
                max_generations: 3,
                ..Default::default()
            },
        )
        .unwrap();
        let piece = PieceConfig {
            beats: 10,
            beats_per_measure: 4,
            ..Default::default()
        };
        let mut composer = Composer::new(engine, piece);

        let searches = Cell::new(0);
        let (score, stats) = composer.compose_with_callback(pool().beats()[0].clone(), |_, p| {
            if p.phase == SearchPhase::Initializing {
                searches.set(searches.get() + 1);
            }
        });

        assert_eq!(searches.get(), 10);
        assert_eq!(stats.matched + stats.fallbacks, 10);
        assert_eq!(score.measures.len(), 2);
        assert_eq!(score.measures[0].number, 2);
        assert_eq!(score.measures[1].number, 3);
        assert_eq!(composer.engine().history().len(), stats.matched);
    }

    #[test]
    fn test_compose_random_seed() {
        let engine = SearchEngine::new(
            pool(),
            SearchConfig {
                random_seed: Some(1),
                max_generations: 2,
                ..Default::default()
            },
        )
        .unwrap();
        let mut composer = Composer::new(
            engine,
            PieceConfig {
                beats: 4,
                ..Default::default()
            },
        );
        let (score, _) = composer.compose_random();
        assert_eq!(score.measures.len(), 1);
    }
}
