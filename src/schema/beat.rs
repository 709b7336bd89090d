//! Beat and note types: the musical material the engine evolves.
//!
//! A beat is an ordered list of elements. Notes before the (optional) backup
//! marker belong to the treble part, notes after it to the bass part.

use serde::{Deserialize, Serialize};

/// Pitch letter in the A-G alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Step {
    /// All letters in alphabet order.
    pub const ALL: [Step; 7] = [
        Step::A,
        Step::B,
        Step::C,
        Step::D,
        Step::E,
        Step::F,
        Step::G,
    ];

    /// Zero-based position in the alphabet.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Linear pitch contribution of the letter. 'A' maps to 1, never 0.
    pub fn value(self) -> i32 {
        self.index() as i32 + 1
    }

    /// Letter `offset` positions away, wrapping around the alphabet.
    pub fn shifted(self, offset: i32) -> Step {
        let idx = (self.index() as i32 + offset).rem_euclid(Self::ALL.len() as i32);
        Self::ALL[idx as usize]
    }

    /// Raise by a diatonic third (F wraps to A, G to B).
    pub fn raised_third(self) -> Step {
        self.shifted(2)
    }

    /// Lower by a diatonic third (A wraps to F, B to G).
    pub fn lowered_third(self) -> Step {
        self.shifted(-2)
    }

}

/// Pitch of a sounding note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pitch {
    pub step: Step,
    /// Chromatic alteration in semitones (ignored by feature extraction).
    #[serde(default)]
    pub alter: i8,
    pub octave: i32,
}

impl Pitch {
    pub fn new(step: Step, octave: i32) -> Self {
        Self {
            step,
            alter: 0,
            octave,
        }
    }

    /// Linear pitch value used by the pitch-center feature. Saturates for
    /// octaves outside the i32 range.
    pub fn linear_value(&self) -> i32 {
        self.step.value().saturating_add(self.octave.saturating_mul(12))
    }
}

/// A sounding note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub pitch: Pitch,
    /// Duration in ticks. Grace notes carry none.
    #[serde(default)]
    pub duration: Option<u32>,
    /// Chord identifier, e.g. "C maj".
    #[serde(default)]
    pub chord_id: Option<String>,
    #[serde(default)]
    pub voice: Option<u8>,
    #[serde(default)]
    pub staff: Option<u8>,
}

impl Note {
    pub fn new(step: Step, octave: i32, duration: u32) -> Self {
        Self {
            pitch: Pitch::new(step, octave),
            duration: Some(duration),
            chord_id: None,
            voice: None,
            staff: None,
        }
    }

    pub fn with_chord(mut self, chord_id: impl Into<String>) -> Self {
        self.chord_id = Some(chord_id.into());
        self
    }

    pub fn with_staff(mut self, staff: u8) -> Self {
        self.staff = Some(staff);
        self
    }
}

/// A silent note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rest {
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub voice: Option<u8>,
    #[serde(default)]
    pub staff: Option<u8>,
}

/// Marker rewinding time so the bass part can start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backup {
    pub duration: u32,
}

/// One entry of a beat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Element {
    Note(Note),
    Rest(Rest),
    Backup(Backup),
}

impl Element {
    /// True for notes and rests (anything a score would call a `note`).
    pub fn is_note_like(&self) -> bool {
        matches!(self, Element::Note(_) | Element::Rest(_))
    }

    /// Duration of a note or rest, if recorded.
    pub fn note_duration(&self) -> Option<u32> {
        match self {
            Element::Note(n) => n.duration,
            Element::Rest(r) => r.duration,
            Element::Backup(_) => None,
        }
    }
}

/// Treble and bass elements of a beat, split at the backup marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parts {
    pub treble: Vec<Element>,
    pub bass: Vec<Element>,
}

/// A beat: the unit of material the search evolves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beat {
    pub elements: Vec<Element>,
}

impl Beat {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Build a two-part beat with a backup marker between treble and bass.
    pub fn two_part(treble: Vec<Note>, backup: u32, bass: Vec<Note>) -> Self {
        let mut elements: Vec<Element> = treble.into_iter().map(Element::Note).collect();
        elements.push(Element::Backup(Backup { duration: backup }));
        elements.extend(bass.into_iter().map(Element::Note));
        Self { elements }
    }

    /// Build a single-part beat from notes.
    pub fn from_notes(notes: Vec<Note>) -> Self {
        Self {
            elements: notes.into_iter().map(Element::Note).collect(),
        }
    }

    /// Number of elements, backup markers included.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of notes and rests.
    pub fn note_count(&self) -> usize {
        self.elements.iter().filter(|e| e.is_note_like()).count()
    }

    /// Sounding notes in document order.
    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.elements.iter().filter_map(|e| match e {
            Element::Note(n) => Some(n),
            _ => None,
        })
    }

    pub fn notes_mut(&mut self) -> impl Iterator<Item = &mut Note> {
        self.elements.iter_mut().filter_map(|e| match e {
            Element::Note(n) => Some(n),
            _ => None,
        })
    }

    pub fn has_rest(&self) -> bool {
        self.elements.iter().any(|e| matches!(e, Element::Rest(_)))
    }

    /// Backup marker duration, if the beat has one.
    pub fn backup_duration(&self) -> Option<u32> {
        self.elements.iter().find_map(|e| match e {
            Element::Backup(b) => Some(b.duration),
            _ => None,
        })
    }

    /// A beat may enter a population only if it has notes and no rests.
    pub fn is_valid(&self) -> bool {
        !self.is_empty() && self.note_count() > 0 && !self.has_rest()
    }

    /// Valid and long enough to be recombined.
    pub fn is_eligible(&self) -> bool {
        self.is_valid() && self.note_count() > 1
    }

    /// Split at the first backup marker. Further backups are dropped.
    pub fn parts(&self) -> Parts {
        let mut parts = Parts::default();
        let mut in_bass = false;
        for element in &self.elements {
            match element {
                Element::Backup(_) => in_bass = true,
                other if in_bass => parts.bass.push(other.clone()),
                other => parts.treble.push(other.clone()),
            }
        }
        parts
    }

    /// Root token of the first note's chord id, e.g. "C" for "C maj".
    pub fn chord_root(&self) -> Option<&str> {
        self.notes()
            .next()
            .and_then(|n| n.chord_id.as_deref())
            .and_then(|id| id.split_whitespace().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_values_never_zero() {
        assert_eq!(Step::A.value(), 1);
        assert_eq!(Step::G.value(), 7);
        assert!(Step::ALL.iter().all(|s| s.value() > 0));
    }

    #[test]
    fn test_step_wraparound() {
        assert_eq!(Step::F.raised_third(), Step::A);
        assert_eq!(Step::G.raised_third(), Step::B);
        assert_eq!(Step::A.lowered_third(), Step::F);
        assert_eq!(Step::B.lowered_third(), Step::G);
        assert_eq!(Step::C.raised_third(), Step::E);
        assert_eq!(Step::E.lowered_third(), Step::C);
    }

    #[test]
    fn test_linear_value_saturates() {
        assert_eq!(Pitch::new(Step::C, 4).linear_value(), 51);
        assert_eq!(Pitch::new(Step::G, i32::MAX).linear_value(), i32::MAX);
        assert_eq!(Pitch::new(Step::A, i32::MIN).linear_value(), i32::MIN + 1);
    }

    #[test]
    fn test_parts_split_at_backup() {
        let beat = Beat::two_part(
            vec![Note::new(Step::C, 5, 12), Note::new(Step::E, 5, 12)],
            24,
            vec![Note::new(Step::C, 3, 24)],
        );
        let parts = beat.parts();
        assert_eq!(parts.treble.len(), 2);
        assert_eq!(parts.bass.len(), 1);
        assert_eq!(beat.len(), 4);
        assert_eq!(beat.note_count(), 3);
        assert_eq!(beat.backup_duration(), Some(24));
    }

    #[test]
    fn test_validity() {
        assert!(!Beat::default().is_valid());

        let single = Beat::from_notes(vec![Note::new(Step::A, 4, 48)]);
        assert!(single.is_valid());
        assert!(!single.is_eligible());

        let mut with_rest = Beat::from_notes(vec![
            Note::new(Step::A, 4, 24),
            Note::new(Step::B, 4, 24),
        ]);
        assert!(with_rest.is_eligible());
        with_rest.elements.push(Element::Rest(Rest {
            duration: Some(24),
            voice: None,
            staff: None,
        }));
        assert!(!with_rest.is_valid());
        assert!(!with_rest.is_eligible());
    }

    #[test]
    fn test_chord_root() {
        let beat = Beat::from_notes(vec![
            Note::new(Step::C, 4, 12).with_chord("C maj"),
            Note::new(Step::E, 4, 12),
        ]);
        assert_eq!(beat.chord_root(), Some("C"));
        assert_eq!(Beat::from_notes(vec![Note::new(Step::C, 4, 12)]).chord_root(), None);
    }

    #[test]
    fn test_serialization() {
        let beat = Beat::two_part(
            vec![Note::new(Step::D, 4, 24).with_staff(1)],
            24,
            vec![Note::new(Step::G, 2, 24).with_staff(2)],
        );
        let json = serde_json::to_string(&beat).unwrap();
        assert!(json.contains("\"kind\":\"backup\""));
        let parsed: Beat = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, beat);
    }
}
