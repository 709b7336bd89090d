//! Feature extraction for beats.
//!
//! Every beat is summarised by three integers: pitch center, average note
//! duration and note count. All functions here are pure.

use crate::schema::{Beat, FeatureVector};

/// Pitch center returned for beats without sounding notes.
pub const DEFAULT_PITCH_CENTER: i32 = 1;

/// Duration average returned when no note records a duration.
pub const NO_DURATION: i32 = -1;

/// Compute the feature vector of a beat.
pub fn features(beat: &Beat) -> FeatureVector {
    FeatureVector {
        pitch_center: pitch_center(beat),
        duration_average: duration_average(beat),
        note_count: i32::try_from(beat.note_count()).unwrap_or(i32::MAX),
    }
}

/// Median linear pitch of the beat's notes, ignoring accidentals.
pub fn pitch_center(beat: &Beat) -> i32 {
    let values: Vec<i32> = beat.notes().map(|n| n.pitch.linear_value()).collect();
    median(values).unwrap_or(DEFAULT_PITCH_CENTER)
}

/// Truncated mean duration over notes and rests that carry a duration,
/// clamped to `i32::MAX`.
pub fn duration_average(beat: &Beat) -> i32 {
    let durations: Vec<i64> = beat
        .elements
        .iter()
        .filter_map(|e| e.note_duration())
        .map(i64::from)
        .collect();
    if durations.is_empty() {
        return NO_DURATION;
    }
    let mean = durations.iter().sum::<i64>() / durations.len() as i64;
    i32::try_from(mean).unwrap_or(i32::MAX)
}

/// Median of integer values; the two central values are averaged
/// (truncating) for even counts.
pub fn median(mut values: Vec<i32>) -> Option<i32> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some(((values[mid - 1] as i64 + values[mid] as i64) / 2) as i32)
    } else {
        Some(values[mid])
    }
}

/// Whether two beats open on the same chord root.
///
/// Beats without a chord id never match.
pub fn same_chord(a: &Beat, b: &Beat) -> bool {
    match (a.chord_root(), b.chord_root()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Element, Note, Rest, Step};
    use proptest::prelude::*;

    #[test]
    fn test_empty_beat_defaults() {
        let v = features(&Beat::default());
        assert_eq!(v, FeatureVector::new(DEFAULT_PITCH_CENTER, NO_DURATION, 0));
    }

    #[test]
    fn test_pitch_center_odd() {
        // C4 = 3 + 48, E4 = 5 + 48, G4 = 7 + 48
        let beat = Beat::from_notes(vec![
            Note::new(Step::G, 4, 12),
            Note::new(Step::C, 4, 12),
            Note::new(Step::E, 4, 12),
        ]);
        assert_eq!(pitch_center(&beat), 53);
    }

    #[test]
    fn test_pitch_center_even_averages_middle() {
        let beat = Beat::from_notes(vec![
            Note::new(Step::A, 4, 12), // 49
            Note::new(Step::B, 4, 12), // 50
            Note::new(Step::D, 4, 12), // 52
            Note::new(Step::G, 4, 12), // 55
        ]);
        assert_eq!(pitch_center(&beat), 51);
    }

    #[test]
    fn test_accidentals_ignored() {
        let mut sharp = Note::new(Step::F, 4, 12);
        sharp.pitch.alter = 1;
        let beat = Beat::from_notes(vec![sharp, Note::new(Step::F, 4, 12)]);
        assert_eq!(pitch_center(&beat), 6 + 48);
    }

    #[test]
    fn test_duration_average_truncates() {
        let beat = Beat::from_notes(vec![
            Note::new(Step::C, 4, 10),
            Note::new(Step::D, 4, 11),
        ]);
        assert_eq!(duration_average(&beat), 10);
    }

    #[test]
    fn test_duration_average_clamps() {
        let beat = Beat::from_notes(vec![
            Note::new(Step::C, 4, 3_000_000_000),
            Note::new(Step::D, 4, 3_000_000_000),
        ]);
        assert_eq!(duration_average(&beat), i32::MAX);

        let beat = Beat::from_notes(vec![
            Note::new(Step::C, 4, u32::MAX),
            Note::new(Step::D, 4, 0),
        ]);
        assert_eq!(duration_average(&beat), i32::MAX);
    }

    #[test]
    fn test_extreme_octaves_do_not_overflow() {
        let beat = Beat::from_notes(vec![
            Note::new(Step::C, i32::MAX, 12),
            Note::new(Step::C, i32::MIN, 12),
        ]);
        let v = features(&beat);
        assert_eq!(v.note_count, 2);
        assert_eq!(v.duration_average, 12);
    }

    #[test]
    fn test_duration_sentinel() {
        let mut grace = Note::new(Step::C, 4, 0);
        grace.duration = None;
        let beat = Beat::from_notes(vec![grace]);
        assert_eq!(duration_average(&beat), NO_DURATION);
    }

    #[test]
    fn test_note_count_includes_rests_not_backup() {
        let mut beat = Beat::two_part(
            vec![Note::new(Step::C, 5, 24)],
            24,
            vec![Note::new(Step::C, 3, 24)],
        );
        beat.elements.push(Element::Rest(Rest {
            duration: Some(24),
            voice: None,
            staff: None,
        }));
        assert_eq!(features(&beat).note_count, 3);
        assert_eq!(features(&beat).duration_average, 24);
    }

    #[test]
    fn test_same_chord() {
        let a = Beat::from_notes(vec![Note::new(Step::C, 4, 12).with_chord("C maj")]);
        let b = Beat::from_notes(vec![Note::new(Step::E, 4, 12).with_chord("C maj7")]);
        let c = Beat::from_notes(vec![Note::new(Step::G, 4, 12).with_chord("G dom")]);
        let bare = Beat::from_notes(vec![Note::new(Step::G, 4, 12)]);

        assert!(same_chord(&a, &b));
        assert!(!same_chord(&a, &c));
        assert!(!same_chord(&a, &bare));
        assert!(!same_chord(&bare, &bare));
    }

    fn arb_note() -> impl Strategy<Value = Note> {
        (0usize..7, 1i32..7, 1u32..96).prop_map(|(s, o, d)| Note::new(Step::ALL[s], o, d))
    }

    proptest! {
        #[test]
        fn prop_features_deterministic(notes in prop::collection::vec(arb_note(), 0..12)) {
            let beat = Beat::from_notes(notes);
            prop_assert_eq!(features(&beat), features(&beat.clone()));
        }

        #[test]
        fn prop_median_law(values in prop::collection::vec(0i32..200, 1..20)) {
            let mut sorted = values.clone();
            sorted.sort();
            let n = sorted.len();
            let expected = if n % 2 == 1 {
                sorted[n / 2]
            } else {
                (sorted[n / 2 - 1] + sorted[n / 2]) / 2
            };
            prop_assert_eq!(median(values), Some(expected));
        }

        #[test]
        fn prop_pitch_center_order_independent(notes in prop::collection::vec(arb_note(), 1..12)) {
            let forward = Beat::from_notes(notes.clone());
            let mut reversed = notes;
            reversed.reverse();
            prop_assert_eq!(pitch_center(&forward), pitch_center(&Beat::from_notes(reversed)));
        }
    }
}
