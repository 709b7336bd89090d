//! Roulette-wheel parent selection.
//!
//! Selection is proportional to the raw fitness value. Because fitness here
//! is a distance, chromosomes farther from the target are the likelier
//! parents. This matches the composer this engine reproduces and is kept
//! as-is.

use super::genome::BeatRng;
use super::search::Chromosome;

/// Spin the wheel: draw a slice in [0, total_fitness) and return the index
/// of the chosen chromosome, or `None` if no cumulative sum reaches it.
pub fn roulette(population: &[Chromosome], total_fitness: f64, rng: &mut BeatRng) -> Option<usize> {
    let slice = rng.unit() * total_fitness;
    spin(population, slice)
}

/// Index of the first chromosome whose cumulative fitness reaches `slice`.
pub fn spin(population: &[Chromosome], slice: f64) -> Option<usize> {
    let mut fitness_so_far = 0.0;
    for (i, chromosome) in population.iter().enumerate() {
        fitness_so_far += chromosome.fitness;
        if fitness_so_far >= slice {
            return Some(i);
        }
    }
    None
}
