//! Personal record detection.
//!
//! Records are strictly forward: an entry is a record iff its value is positive and
//! exceeds every value logged strictly before it for the same exercise. Removing a
//! logged entry is the only operation that requires recomputing flags of later entries.

use chrono::{DateTime, Utc};

use crate::{ExerciseType, LoggedEntry, Performance};

/// The scalar compared between entries of one exercise. RPE never participates.
#[must_use]
pub fn pr_value(performance: &Performance, exercise_type: ExerciseType) -> f64 {
    let performance = performance.masked(exercise_type);
    let reps = performance.reps.map(|r| f64::from(u32::from(r)));
    let weight = performance.weight.map(|w| f64::from(f32::from(w)));
    let duration = performance.duration.map(|t| f64::from(u32::from(t)));
    let distance = performance.distance.map(|d| f64::from(f32::from(d)));
    let value = match exercise_type {
        ExerciseType::WeightReps
        | ExerciseType::WeightedBodyweight
        | ExerciseType::AssistedBodyweight => weight.zip(reps).map(|(w, r)| w * r),
        ExerciseType::Reps => reps,
        ExerciseType::Duration => duration,
        ExerciseType::WeightDuration => weight.zip(duration).map(|(w, t)| w * t),
        ExerciseType::DistanceDuration => distance.zip(duration).map(|(d, t)| d * t),
        ExerciseType::WeightDistance => weight.zip(distance).map(|(w, d)| w * d),
    };
    value.unwrap_or(0.0)
}

#[must_use]
pub fn beats(value: f64, best: f64) -> bool {
    value > 0.0 && value > best
}

/// Highest value among `entries`, or zero if there are none.
#[must_use]
pub fn best(entries: &[LoggedEntry], exercise_type: ExerciseType) -> f64 {
    entries
        .iter()
        .map(|e| pr_value(&e.performance, exercise_type))
        .fold(0.0, f64::max)
}

/// Whether `candidate` is a record given the entries logged before it.
#[must_use]
pub fn is_pr(
    candidate: &Performance,
    exercise_type: ExerciseType,
    historical: &[LoggedEntry],
) -> bool {
    beats(
        pr_value(candidate, exercise_type),
        best(historical, exercise_type),
    )
}

/// Flags newly appended entries against the existing history and against each other.
pub fn flag_appended(
    history: &[LoggedEntry],
    appended: &mut [LoggedEntry],
    exercise_type: ExerciseType,
) {
    flag_against(best(history, exercise_type), appended, exercise_type);
}

/// Flags entries in chronological order, starting from an already known best value.
pub fn flag_against(previous_best: f64, entries: &mut [LoggedEntry], exercise_type: ExerciseType) {
    let mut running_best = previous_best;
    for idx in chronological_order(entries) {
        let entry = &mut entries[idx];
        entry.pr_value = pr_value(&entry.performance, exercise_type);
        entry.is_pr = beats(entry.pr_value, running_best);
        running_best = running_best.max(entry.pr_value);
    }
}

/// Recomputes the flags of every entry logged after `removed_timestamp`.
///
/// `entries` are the remaining entries of one exercise. Entries at or before the
/// removed timestamp keep their flags; all later ones are cleared and re-evaluated in
/// chronological order against everything strictly before them.
pub fn recompute_after_removal(
    removed_timestamp: DateTime<Utc>,
    entries: &mut [LoggedEntry],
    exercise_type: ExerciseType,
) {
    let order = chronological_order(entries);
    let mut running_best = 0.0_f64;
    for idx in order {
        let entry = &mut entries[idx];
        let value = pr_value(&entry.performance, exercise_type);
        if entry.timestamp > removed_timestamp {
            entry.pr_value = value;
            entry.is_pr = beats(value, running_best);
        }
        running_best = running_best.max(value);
    }
}

/// Recomputes all flags of one exercise's entries from scratch.
pub fn recompute_all(entries: &mut [LoggedEntry], exercise_type: ExerciseType) {
    recompute_after_removal(DateTime::<Utc>::MIN_UTC, entries, exercise_type);
}

/// Whether the flags of one exercise's entries are consistent with their values.
#[must_use]
pub fn is_consistent(entries: &[LoggedEntry], exercise_type: ExerciseType) -> bool {
    let mut running_best = 0.0_f64;
    for idx in chronological_order(entries) {
        let value = pr_value(&entries[idx].performance, exercise_type);
        if entries[idx].is_pr != beats(value, running_best) {
            return false;
        }
        running_best = running_best.max(value);
    }
    true
}

/// Indices of `entries` sorted by timestamp. Ties keep their slice order.
fn chronological_order(entries: &[LoggedEntry]) -> Vec<usize> {
    let mut order = (0..entries.len()).collect::<Vec<_>>();
    order.sort_by_key(|idx| entries[*idx].timestamp);
    order
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{Distance, RPE, Reps, Time, Weight};

    use super::*;

    static START: std::sync::LazyLock<DateTime<Utc>> =
        std::sync::LazyLock::new(|| Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());

    fn lift(weight: f32, reps: u32) -> Performance {
        Performance {
            weight: Some(Weight::new(weight).unwrap()),
            reps: Some(Reps::new(reps).unwrap()),
            ..Performance::default()
        }
    }

    fn logged(id: u128, day: i64, performance: Performance, is_pr: bool) -> LoggedEntry {
        let timestamp = *START + Duration::days(day);
        LoggedEntry {
            id: id.into(),
            exercise_id: 1.into(),
            session_id: id.into(),
            date: timestamp.date_naive(),
            timestamp,
            performance,
            rpe: RPE::EIGHT,
            is_pr,
            pr_value: pr_value(&performance, ExerciseType::WeightReps),
        }
    }

    fn flags(entries: &[LoggedEntry]) -> Vec<bool> {
        entries.iter().map(|e| e.is_pr).collect()
    }

    #[rstest]
    #[case(ExerciseType::WeightReps, 1000.0)]
    #[case(ExerciseType::WeightedBodyweight, 1000.0)]
    #[case(ExerciseType::AssistedBodyweight, 1000.0)]
    #[case(ExerciseType::Reps, 10.0)]
    #[case(ExerciseType::Duration, 30.0)]
    #[case(ExerciseType::WeightDuration, 3000.0)]
    #[case(ExerciseType::DistanceDuration, 6000.0)]
    #[case(ExerciseType::WeightDistance, 20000.0)]
    fn test_pr_value(#[case] exercise_type: ExerciseType, #[case] expected: f64) {
        let performance = Performance {
            reps: Some(Reps::new(10).unwrap()),
            weight: Some(Weight::new(100.0).unwrap()),
            duration: Some(Time::new(30).unwrap()),
            distance: Some(Distance::new(200.0).unwrap()),
        };
        assert_approx_eq!(pr_value(&performance, exercise_type), expected);
    }

    #[test]
    fn test_pr_value_missing_required_field() {
        let performance = Performance {
            reps: Some(Reps::new(10).unwrap()),
            ..Performance::default()
        };
        assert_approx_eq!(pr_value(&performance, ExerciseType::WeightReps), 0.0);
    }

    #[test]
    fn test_is_pr_requires_positive_value() {
        assert!(!is_pr(&lift(0.0, 10), ExerciseType::WeightReps, &[]));
        assert!(is_pr(&lift(20.0, 1), ExerciseType::WeightReps, &[]));
    }

    #[rstest]
    #[case(lift(40.0, 3), true)]
    #[case(lift(50.0, 2), false)]
    #[case(lift(45.0, 2), false)]
    fn test_is_pr(#[case] candidate: Performance, #[case] expected: bool) {
        let history = [logged(1, 0, lift(50.0, 2), true)];
        assert_eq!(
            is_pr(&candidate, ExerciseType::WeightReps, &history),
            expected
        );
    }

    #[test]
    fn test_flag_appended() {
        let history = [logged(1, 0, lift(50.0, 2), true)];
        let mut appended = [
            logged(2, 1, lift(40.0, 3), false),
            logged(3, 2, lift(45.0, 2), false),
            logged(4, 3, lift(45.0, 3), false),
        ];
        flag_appended(&history, &mut appended, ExerciseType::WeightReps);
        assert_eq!(flags(&appended), vec![true, false, true]);
        assert_approx_eq!(appended[0].pr_value, 120.0);
    }

    #[test]
    fn test_flag_appended_uses_timestamps() {
        let mut appended = [
            logged(2, 2, lift(40.0, 3), false),
            logged(3, 1, lift(45.0, 3), false),
        ];
        flag_appended(&[], &mut appended, ExerciseType::WeightReps);
        assert_eq!(flags(&appended), vec![false, true]);
    }

    #[rstest]
    #[case(0.0, vec![true, false])]
    #[case(120.0, vec![false, false])]
    #[case(100.0, vec![true, false])]
    fn test_flag_against(#[case] previous_best: f64, #[case] expected: Vec<bool>) {
        let mut entries = [
            logged(2, 1, lift(40.0, 3), true),
            logged(3, 2, lift(20.0, 5), true),
        ];
        flag_against(previous_best, &mut entries, ExerciseType::WeightReps);
        assert_eq!(flags(&entries), expected);
    }

    #[test]
    fn test_recompute_after_removal_of_record() {
        let removed = logged(2, 1, lift(40.0, 3), true);
        let mut entries = vec![
            logged(1, 0, lift(50.0, 2), true),
            removed.clone(),
            logged(3, 2, lift(45.0, 2), false),
        ];
        entries.retain(|e| e.id != removed.id);
        recompute_after_removal(removed.timestamp, &mut entries, ExerciseType::WeightReps);
        assert_eq!(flags(&entries), vec![true, false]);
        assert!(is_consistent(&entries, ExerciseType::WeightReps));
    }

    #[test]
    fn test_recompute_after_removal_promotes_later_entry() {
        let removed = logged(2, 1, lift(60.0, 2), true);
        let mut entries = vec![
            logged(1, 0, lift(50.0, 2), true),
            logged(3, 2, lift(55.0, 2), false),
            logged(4, 3, lift(52.5, 2), false),
        ];
        recompute_after_removal(removed.timestamp, &mut entries, ExerciseType::WeightReps);
        assert_eq!(flags(&entries), vec![true, true, false]);
    }

    #[test]
    fn test_recompute_after_removal_of_earliest_entry() {
        let removed = logged(1, 0, lift(50.0, 2), true);
        let mut entries = vec![
            logged(2, 1, lift(40.0, 2), false),
            logged(3, 2, lift(45.0, 2), false),
        ];
        recompute_after_removal(removed.timestamp, &mut entries, ExerciseType::WeightReps);
        assert_eq!(flags(&entries), vec![true, true]);
    }

    #[test]
    fn test_recompute_after_removal_keeps_earlier_flags() {
        let removed = logged(3, 2, lift(45.0, 2), false);
        let mut entries = vec![
            logged(1, 0, lift(50.0, 2), true),
            logged(2, 1, lift(40.0, 3), true),
        ];
        recompute_after_removal(removed.timestamp, &mut entries, ExerciseType::WeightReps);
        assert_eq!(flags(&entries), vec![true, true]);
    }

    #[test]
    fn test_recompute_all() {
        let mut entries = vec![
            logged(1, 0, lift(50.0, 2), false),
            logged(2, 1, lift(50.0, 2), true),
            logged(3, 2, lift(0.0, 2), true),
            logged(4, 3, lift(51.0, 2), false),
        ];
        assert!(!is_consistent(&entries, ExerciseType::WeightReps));
        recompute_all(&mut entries, ExerciseType::WeightReps);
        assert_eq!(flags(&entries), vec![true, false, false, true]);
        assert!(is_consistent(&entries, ExerciseType::WeightReps));
    }

    #[test]
    fn test_monotonicity_after_each_removal() {
        let all = vec![
            logged(1, 0, lift(40.0, 5), true),
            logged(2, 1, lift(50.0, 5), true),
            logged(3, 2, lift(45.0, 5), false),
            logged(4, 3, lift(55.0, 5), true),
            logged(5, 4, lift(52.5, 5), false),
        ];
        for removed in &all {
            let mut remaining = all
                .iter()
                .filter(|e| e.id != removed.id)
                .cloned()
                .collect::<Vec<_>>();
            recompute_after_removal(removed.timestamp, &mut remaining, ExerciseType::WeightReps);
            assert!(
                is_consistent(&remaining, ExerciseType::WeightReps),
                "inconsistent after removing {}",
                removed.id
            );
        }
    }
}
