//! Piece assembly: grouping evolved beats into measures.
//!
//! The measure counter lives in the assembly, so several pieces can be
//! built side by side.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::schema::{Backup, Beat, Element, PieceConfig};

/// One measure of the assembled score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    pub number: u32,
    pub elements: Vec<Element>,
}

/// Assembled piece.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub measures: Vec<Measure>,
}

impl Score {
    /// Total notes across all measures.
    pub fn note_count(&self) -> usize {
        self.measures
            .iter()
            .flat_map(|m| &m.elements)
            .filter(|e| e.is_note_like())
            .count()
    }
}

/// Accumulates beats and emits a measure every `beats_per_measure` beats.
#[derive(Debug, Clone)]
pub struct PieceAssembly {
    beats_per_measure: usize,
    next_measure: u32,
    pending: Vec<Beat>,
    score: Score,
}

impl PieceAssembly {
    pub fn new(config: &PieceConfig) -> Self {
        Self {
            beats_per_measure: config.beats_per_measure.max(1),
            next_measure: config.first_measure,
            pending: Vec::with_capacity(config.beats_per_measure),
            score: Score::default(),
        }
    }

    /// Add a beat. Returns the finished measure when this beat completes one.
    pub fn push_beat(&mut self, beat: Beat) -> Option<&Measure> {
        self.pending.push(beat);
        if self.pending.len() < self.beats_per_measure {
            return None;
        }

        let beats = std::mem::take(&mut self.pending);
        let measure = build_measure(self.next_measure, &beats);
        self.next_measure += 1;
        self.score.measures.push(measure);
        self.score.measures.last()
    }

    /// Number the next measure will get.
    pub fn next_measure(&self) -> u32 {
        self.next_measure
    }

    /// Beats waiting for their measure to fill.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Finish the piece. Beats of an incomplete trailing measure are dropped.
    pub fn finish(self) -> Score {
        if !self.pending.is_empty() {
            warn!(
                "Dropping {} beats that do not fill measure {}",
                self.pending.len(),
                self.next_measure
            );
        }
        self.score
    }
}

/// Lay out beats as all treble notes, one backup spanning the beats' backup
/// durations, then all bass notes.
pub fn build_measure(number: u32, beats: &[Beat]) -> Measure {
    let mut treble = Vec::new();
    let mut bass = Vec::new();
    let mut backup = 0;

    for beat in beats {
        let mut in_bass = false;
        for element in &beat.elements {
            match element {
                Element::Backup(b) => {
                    backup = b.duration.saturating_add(backup);
                    in_bass = true;
                }
                other if in_bass => bass.push(other.clone()),
                other => treble.push(other.clone()),
            }
        }
    }

    let mut elements = treble;
    elements.push(Element::Backup(Backup { duration: backup }));
    elements.extend(bass);
    Measure { number, elements }
}
