use chrono::{DateTime, Utc};
use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EntryID, ExerciseDetails, ExerciseID, ExerciseType, RoutineID, WorkingEntry};

#[derive(
    Deref,
    Debug,
    Display,
    Default,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub struct WorkoutSessionID(Uuid);

impl WorkoutSessionID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutSessionID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutSessionID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(
    Deref,
    Debug,
    Display,
    Default,
    Clone,
    Copy,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub struct WorkoutExerciseID(Uuid);

impl From<Uuid> for WorkoutExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartMethod {
    Manual,
    QuickStart,
    Routines(Vec<RoutineID>),
}

impl StartMethod {
    #[must_use]
    pub fn routine_ids(&self) -> &[RoutineID] {
        match self {
            StartMethod::Routines(ids) => ids,
            StartMethod::Manual | StartMethod::QuickStart => &[],
        }
    }
}

/// One exercise inside a workout. The same catalog exercise may appear more than once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub id: WorkoutExerciseID,
    pub exercise_id: ExerciseID,
    pub name: String,
    pub exercise_type: ExerciseType,
    pub entries: Vec<WorkingEntry>,
    pub notes: String,
    pub order: usize,
    pub source_routine_id: Option<RoutineID>,
    /// Best PR value in the history when the exercise was added.
    pub previous_best: f64,
    next_entry_id: EntryID,
}

impl WorkoutExercise {
    #[must_use]
    pub fn new(details: &ExerciseDetails, order: usize) -> Self {
        Self::with_exercise(
            details.id,
            details.name.clone(),
            details.exercise_type,
            order,
        )
    }

    #[must_use]
    pub fn with_exercise(
        exercise_id: ExerciseID,
        name: String,
        exercise_type: ExerciseType,
        order: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4().into(),
            exercise_id,
            name,
            exercise_type,
            entries: vec![],
            notes: String::new(),
            order,
            source_routine_id: None,
            previous_best: 0.0,
            next_entry_id: EntryID::default(),
        }
    }

    /// Hands out entry ids. Ids are never reused within the exercise.
    pub fn allocate_entry_id(&mut self) -> EntryID {
        let id = self.next_entry_id;
        self.next_entry_id = id.next();
        id
    }

    #[must_use]
    pub fn entry(&self, id: EntryID) -> Option<&WorkingEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn completed_entries(&self) -> impl Iterator<Item = &WorkingEntry> {
        self.entries.iter().filter(|e| e.completed)
    }

    #[must_use]
    pub fn has_completed_entries(&self) -> bool {
        self.entries.iter().any(|e| e.completed)
    }
}

/// The aggregate root of a workout in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: WorkoutSessionID,
    pub name: String,
    pub exercises: Vec<WorkoutExercise>,
    pub start_time: DateTime<Utc>,
    pub active: bool,
    pub start_method: StartMethod,
}

impl WorkoutSession {
    #[must_use]
    pub fn new(name: String, start_method: StartMethod, start_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().into(),
            name,
            exercises: vec![],
            start_time,
            active: false,
            start_method,
        }
    }

    #[must_use]
    pub fn exercise(&self, id: WorkoutExerciseID) -> Option<&WorkoutExercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn exercise_mut(&mut self, id: WorkoutExerciseID) -> Option<&mut WorkoutExercise> {
        self.exercises.iter_mut().find(|e| e.id == id)
    }

    #[must_use]
    pub fn num_completed_entries(&self) -> usize {
        self.exercises
            .iter()
            .map(|e| e.completed_entries().count())
            .sum()
    }

    /// Restores continuous order positions after insertions or removals.
    pub fn renumber(&mut self) {
        for (order, exercise) in self.exercises.iter_mut().enumerate() {
            exercise.order = order;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn details() -> ExerciseDetails {
        ExerciseDetails {
            id: 1.into(),
            name: String::from("Squat"),
            exercise_type: ExerciseType::WeightReps,
            muscles: vec![],
            equipment: vec![],
        }
    }

    #[test]
    fn test_workout_exercise_allocate_entry_id() {
        let mut exercise = WorkoutExercise::new(&details(), 0);
        assert_eq!(exercise.allocate_entry_id(), EntryID::from(0));
        assert_eq!(exercise.allocate_entry_id(), EntryID::from(1));
        assert_eq!(exercise.allocate_entry_id(), EntryID::from(2));
    }

    #[test]
    fn test_workout_exercise_has_distinct_identity() {
        let a = WorkoutExercise::new(&details(), 0);
        let b = WorkoutExercise::new(&details(), 1);
        assert_eq!(a.exercise_id, b.exercise_id);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_workout_session_renumber() {
        let mut session = WorkoutSession::new(
            String::from("Legs"),
            StartMethod::Manual,
            Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap(),
        );
        session.exercises = vec![
            WorkoutExercise::new(&details(), 4),
            WorkoutExercise::new(&details(), 7),
        ];
        session.renumber();
        assert_eq!(
            session.exercises.iter().map(|e| e.order).collect::<Vec<_>>(),
            vec![0, 1]
        );
    }

    #[test]
    fn test_start_method_routine_ids() {
        assert_eq!(
            StartMethod::Routines(vec![1.into(), 2.into()]).routine_ids(),
            &[RoutineID::from(1), RoutineID::from(2)]
        );
        assert!(StartMethod::QuickStart.routine_ids().is_empty());
    }
}
