//! Genetic operators on beats: crossover and mutation.
//!
//! Operators only ever see copies of gene-pool beats, so they are free to
//! rebuild or edit them in place.

use rand::prelude::*;

use crate::schema::{Beat, Element, Note};

/// Random number generator wrapper for beat operations.
pub struct BeatRng {
    rng: StdRng,
}

impl BeatRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Uniform draw in [0, 1).
    pub fn unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    /// Uniform index in [0, len). `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    /// Recombine two parents with probability `rate`.
    ///
    /// Returns copies of the parents whenever the draw fails, either parent
    /// has one note or fewer, or recombination is not possible.
    pub fn crossover(&mut self, parent1: &Beat, parent2: &Beat, rate: f64) -> (Beat, Beat) {
        if self.unit() < rate && parent1.note_count() > 1 && parent2.note_count() > 1 {
            let rng = &mut self.rng;
            if let Some(children) = recombine(parent1, parent2, |len| rng.gen_range(0..len)) {
                return children;
            }
        }
        (parent1.clone(), parent2.clone())
    }

    /// With probability `rate`, move one random note a third up or down.
    pub fn mutate<'a>(&mut self, beat: &'a mut Beat, rate: f64) -> &'a mut Beat {
        if self.unit() >= rate {
            return beat;
        }
        let count = beat.notes().count();
        if count == 0 {
            return beat;
        }
        let idx = self.index(count);
        let raise = self.rng.gen_bool(0.5);
        if let Some(note) = beat.notes_mut().nth(idx) {
            shift_third(note, raise);
        }
        beat
    }
}

/// Move a note's step by a third, wrapping within A-G. Octave is untouched.
pub fn shift_third(note: &mut Note, raise: bool) {
    note.pitch.step = if raise {
        note.pitch.step.raised_third()
    } else {
        note.pitch.step.lowered_third()
    };
}

/// Splice treble and bass parts of two beats.
///
/// `cut` receives the length of the shorter part and returns the cut index
/// (clamped to that length). Returns `None` when either treble part is
/// empty or a child would be empty. Backup markers are not carried over.
pub fn recombine<F>(parent1: &Beat, parent2: &Beat, mut cut: F) -> Option<(Beat, Beat)>
where
    F: FnMut(usize) -> usize,
{
    let p1 = parent1.parts();
    let p2 = parent2.parts();
    if p1.treble.is_empty() || p2.treble.is_empty() {
        return None;
    }

    let mut child1 = Vec::new();
    let mut child2 = Vec::new();
    for (a, b) in [(&p1.treble, &p2.treble), (&p1.bass, &p2.bass)] {
        let (c1, c2) = splice_part(a, b, &mut cut);
        child1.extend(c1);
        child2.extend(c2);
    }

    if child1.is_empty() || child2.is_empty() {
        return None;
    }
    Some((Beat::new(child1), Beat::new(child2)))
}

/// One-point splice: shorter prefix + longer suffix, and the reverse.
fn splice_part<F>(a: &[Element], b: &[Element], cut: &mut F) -> (Vec<Element>, Vec<Element>)
where
    F: FnMut(usize) -> usize,
{
    // Ties treat the second parent as the shorter one.
    let (shorter, longer) = if b.len() > a.len() { (a, b) } else { (b, a) };
    let slicer = if shorter.is_empty() {
        0
    } else {
        cut(shorter.len()).min(shorter.len())
    };

    let child1 = shorter[..slicer]
        .iter()
        .chain(&longer[slicer..])
        .cloned()
        .collect();
    let child2 = longer[..slicer]
        .iter()
        .chain(&shorter[slicer..])
        .cloned()
        .collect();
    (child1, child2)
}
