//! Local edits to the entries of one workout exercise.

use chrono::{DateTime, Utc};
use log::debug;

use crate::{
    Distance, EntryID, Entity, Performance, RPE, Reps, SessionError, Time, Weight, WorkingEntry,
    WorkoutExercise,
};

/// Initial values of a newly added entry.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum EntrySeed {
    #[default]
    Empty,
    /// Copy the numeric values of the last entry of the exercise.
    CopyLast,
    Values(Performance),
}

/// Values to merge into an entry. Absent values leave the entry unchanged.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct EntryUpdate {
    pub performance: Performance,
    pub rpe: Option<RPE>,
    pub completed: Option<bool>,
}

impl EntryUpdate {
    #[must_use]
    pub fn reps(mut self, reps: Reps) -> Self {
        self.performance.reps = Some(reps);
        self
    }

    #[must_use]
    pub fn weight(mut self, weight: Weight) -> Self {
        self.performance.weight = Some(weight);
        self
    }

    #[must_use]
    pub fn duration(mut self, duration: Time) -> Self {
        self.performance.duration = Some(duration);
        self
    }

    #[must_use]
    pub fn distance(mut self, distance: Distance) -> Self {
        self.performance.distance = Some(distance);
        self
    }

    #[must_use]
    pub fn rpe(mut self, rpe: RPE) -> Self {
        self.rpe = Some(rpe);
        self
    }

    #[must_use]
    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }
}

pub fn add_entry(
    exercise: &mut WorkoutExercise,
    seed: EntrySeed,
    timestamp: DateTime<Utc>,
) -> EntryID {
    let performance = match seed {
        EntrySeed::Empty => Performance::default(),
        EntrySeed::CopyLast => exercise
            .entries
            .last()
            .map(|e| e.performance)
            .unwrap_or_default(),
        EntrySeed::Values(performance) => performance,
    };
    let id = exercise.allocate_entry_id();
    exercise.entries.push(WorkingEntry {
        performance: performance.masked(exercise.exercise_type),
        ..WorkingEntry::new(id, timestamp)
    });
    id
}

/// Merges `update` into the entry and propagates touched values to later sets.
pub fn update_entry(
    exercise: &mut WorkoutExercise,
    entry_id: EntryID,
    update: EntryUpdate,
) -> Result<(), SessionError> {
    let idx = exercise
        .entries
        .iter()
        .position(|e| e.id == entry_id)
        .ok_or(SessionError::NotFound(Entity::Entry(entry_id)))?;

    let values = update.performance.masked(exercise.exercise_type);
    if values != update.performance {
        debug!(
            "ignoring fields not used by {} in update of entry {entry_id}",
            exercise.name
        );
    }

    let entry = &mut exercise.entries[idx];
    for field in values.fields() {
        entry.performance.copy_field(&values, field);
    }
    if let Some(rpe) = update.rpe {
        entry.rpe = Some(rpe);
    }
    if let Some(completed) = update.completed {
        entry.completed = completed;
    }

    if !values.is_empty() && update.completed != Some(true) {
        propagate(&mut exercise.entries, idx, &values);
    }

    Ok(())
}

/// Copies the values held by `values` into every later entry that is not completed and
/// has no value of its own for the field.
pub fn propagate(entries: &mut [WorkingEntry], from_idx: usize, values: &Performance) {
    let fields = values.fields();
    for entry in entries.iter_mut().skip(from_idx + 1) {
        if entry.completed {
            continue;
        }
        for field in &fields {
            if !entry.performance.has(*field) {
                entry.performance.copy_field(values, *field);
            }
        }
    }
}

/// Removes the entry in place. Remaining ids are kept as they are.
pub fn remove_entry(
    exercise: &mut WorkoutExercise,
    entry_id: EntryID,
) -> Result<WorkingEntry, SessionError> {
    let idx = exercise
        .entries
        .iter()
        .position(|e| e.id == entry_id)
        .ok_or(SessionError::NotFound(Entity::Entry(entry_id)))?;
    Ok(exercise.entries.remove(idx))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{ExerciseDetails, ExerciseType};

    use super::*;

    static NOW: std::sync::LazyLock<DateTime<Utc>> =
        std::sync::LazyLock::new(|| Utc.with_ymd_and_hms(2024, 5, 4, 9, 0, 0).unwrap());

    fn exercise(exercise_type: ExerciseType, num_entries: usize) -> WorkoutExercise {
        let mut exercise = WorkoutExercise::new(
            &ExerciseDetails {
                id: 1.into(),
                name: String::from("Bench Press"),
                exercise_type,
                muscles: vec![],
                equipment: vec![],
            },
            0,
        );
        for _ in 0..num_entries {
            add_entry(&mut exercise, EntrySeed::Empty, *NOW);
        }
        exercise
    }

    fn weight(value: f32) -> Weight {
        Weight::new(value).unwrap()
    }

    fn reps(value: u32) -> Reps {
        Reps::new(value).unwrap()
    }

    fn weights(exercise: &WorkoutExercise) -> Vec<Option<Weight>> {
        exercise
            .entries
            .iter()
            .map(|e| e.performance.weight)
            .collect()
    }

    #[test]
    fn test_add_entry() {
        let mut exercise = exercise(ExerciseType::WeightReps, 0);
        let id = add_entry(&mut exercise, EntrySeed::Empty, *NOW);
        assert_eq!(id, EntryID::from(0));
        assert_eq!(exercise.entries.len(), 1);
        assert!(exercise.entries[0].performance.is_empty());
        assert!(!exercise.entries[0].completed);
        assert_eq!(exercise.entries[0].rpe, None);
    }

    #[test]
    fn test_add_entry_copy_last() {
        let mut exercise = exercise(ExerciseType::WeightReps, 1);
        update_entry(
            &mut exercise,
            0.into(),
            EntryUpdate::default()
                .weight(weight(80.0))
                .reps(reps(5))
                .rpe(RPE::EIGHT)
                .completed(true),
        )
        .unwrap();
        let id = add_entry(&mut exercise, EntrySeed::CopyLast, *NOW);
        let entry = exercise.entry(id).unwrap();
        assert_eq!(entry.performance.weight, Some(weight(80.0)));
        assert_eq!(entry.performance.reps, Some(reps(5)));
        assert!(!entry.completed);
        assert_eq!(entry.rpe, None);
    }

    #[test]
    fn test_add_entry_copy_last_without_entries() {
        let mut exercise = exercise(ExerciseType::WeightReps, 0);
        let id = add_entry(&mut exercise, EntrySeed::CopyLast, *NOW);
        assert!(exercise.entry(id).unwrap().performance.is_empty());
    }

    #[test]
    fn test_add_entry_values_are_masked() {
        let mut exercise = exercise(ExerciseType::Reps, 0);
        let id = add_entry(
            &mut exercise,
            EntrySeed::Values(Performance {
                reps: Some(reps(12)),
                weight: Some(weight(20.0)),
                ..Performance::default()
            }),
            *NOW,
        );
        let entry = exercise.entry(id).unwrap();
        assert_eq!(entry.performance.reps, Some(reps(12)));
        assert_eq!(entry.performance.weight, None);
    }

    #[test]
    fn test_update_entry_propagates_forward() {
        let mut exercise = exercise(ExerciseType::WeightReps, 4);
        update_entry(
            &mut exercise,
            1.into(),
            EntryUpdate::default().weight(weight(60.0)),
        )
        .unwrap();
        assert_eq!(
            weights(&exercise),
            vec![None, Some(weight(60.0)), Some(weight(60.0)), Some(weight(60.0))]
        );
    }

    #[test]
    fn test_update_entry_does_not_overwrite_existing_values() {
        let mut exercise = exercise(ExerciseType::WeightReps, 3);
        update_entry(
            &mut exercise,
            2.into(),
            EntryUpdate::default().weight(weight(70.0)),
        )
        .unwrap();
        update_entry(
            &mut exercise,
            0.into(),
            EntryUpdate::default().weight(weight(60.0)),
        )
        .unwrap();
        assert_eq!(
            weights(&exercise),
            vec![Some(weight(60.0)), Some(weight(60.0)), Some(weight(70.0))]
        );
    }

    #[test]
    fn test_update_entry_skips_completed_entries() {
        let mut exercise = exercise(ExerciseType::WeightReps, 3);
        update_entry(&mut exercise, 1.into(), EntryUpdate::default().completed(true)).unwrap();
        update_entry(
            &mut exercise,
            0.into(),
            EntryUpdate::default().weight(weight(60.0)),
        )
        .unwrap();
        assert_eq!(
            weights(&exercise),
            vec![Some(weight(60.0)), None, Some(weight(60.0))]
        );
    }

    #[test]
    fn test_update_entry_completing_does_not_propagate() {
        let mut exercise = exercise(ExerciseType::WeightReps, 3);
        update_entry(
            &mut exercise,
            0.into(),
            EntryUpdate::default()
                .weight(weight(60.0))
                .reps(reps(8))
                .completed(true),
        )
        .unwrap();
        assert_eq!(weights(&exercise), vec![Some(weight(60.0)), None, None]);
    }

    #[test]
    fn test_update_entry_ignores_unused_fields() {
        let mut exercise = exercise(ExerciseType::Duration, 2);
        update_entry(
            &mut exercise,
            0.into(),
            EntryUpdate::default()
                .weight(weight(60.0))
                .duration(Time::new(30).unwrap()),
        )
        .unwrap();
        assert_eq!(weights(&exercise), vec![None, None]);
        assert_eq!(
            exercise.entries[1].performance.duration,
            Some(Time::new(30).unwrap())
        );
    }

    #[test]
    fn test_update_entry_rpe_only_does_not_propagate() {
        let mut exercise = exercise(ExerciseType::WeightReps, 2);
        update_entry(&mut exercise, 0.into(), EntryUpdate::default().rpe(RPE::NINE)).unwrap();
        assert_eq!(exercise.entries[0].rpe, Some(RPE::NINE));
        assert_eq!(exercise.entries[1].rpe, None);
    }

    #[test]
    fn test_update_entry_not_found() {
        let mut exercise = exercise(ExerciseType::WeightReps, 1);
        assert_eq!(
            update_entry(&mut exercise, 5.into(), EntryUpdate::default()),
            Err(SessionError::NotFound(Entity::Entry(5.into())))
        );
    }

    #[test]
    fn test_remove_entry_keeps_ids() {
        let mut exercise = exercise(ExerciseType::WeightReps, 3);
        remove_entry(&mut exercise, 1.into()).unwrap();
        let id = add_entry(&mut exercise, EntrySeed::Empty, *NOW);
        assert_eq!(
            exercise.entries.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![0.into(), 2.into(), id]
        );
        assert_eq!(id, EntryID::from(3));
    }

    #[test]
    fn test_remove_entry_not_found() {
        let mut exercise = exercise(ExerciseType::WeightReps, 1);
        assert_eq!(
            remove_entry(&mut exercise, 1.into()),
            Err(SessionError::NotFound(Entity::Entry(1.into())))
        );
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(4)]
    fn test_propagation_property(#[case] updated: usize) {
        // entry 1 is completed and entry 3 already has a value
        let mut exercise = exercise(ExerciseType::WeightReps, 5);
        exercise.entries[1].completed = true;
        exercise.entries[3].performance.weight = Some(weight(90.0));
        let before = exercise.entries.clone();

        let id = exercise.entries[updated].id;
        update_entry(&mut exercise, id, EntryUpdate::default().weight(weight(50.0))).unwrap();

        for (j, (old, new)) in before.iter().zip(&exercise.entries).enumerate() {
            if j == updated {
                assert_eq!(new.performance.weight, Some(weight(50.0)));
            } else if j > updated && !old.completed && old.performance.weight.is_none() {
                assert_eq!(new.performance.weight, Some(weight(50.0)), "entry {j}");
            } else {
                assert_eq!(new, old, "entry {j}");
            }
        }
    }
}
