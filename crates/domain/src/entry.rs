use chrono::{DateTime, NaiveDate, Utc};
use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    ConversionError, Distance, ExerciseID, ExerciseType, Field, RPE, Reps, Time, Weight,
    WorkoutSessionID, record,
};

/// The numeric values of one set, in canonical units.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub reps: Option<Reps>,
    pub weight: Option<Weight>,
    pub duration: Option<Time>,
    pub distance: Option<Distance>,
}

impl Performance {
    /// Drops every value the exercise type does not require.
    #[must_use]
    pub fn masked(self, exercise_type: ExerciseType) -> Self {
        Self {
            reps: self.reps.filter(|_| exercise_type.requires(Field::Reps)),
            weight: self.weight.filter(|_| exercise_type.requires(Field::Weight)),
            duration: self
                .duration
                .filter(|_| exercise_type.requires(Field::Duration)),
            distance: self
                .distance
                .filter(|_| exercise_type.requires(Field::Distance)),
        }
    }

    #[must_use]
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::Reps => self.reps.is_some(),
            Field::Weight => self.weight.is_some(),
            Field::Duration => self.duration.is_some(),
            Field::Distance => self.distance.is_some(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        [Field::Reps, Field::Weight, Field::Duration, Field::Distance]
            .iter()
            .all(|f| !self.has(*f))
    }

    /// The fields holding a value.
    #[must_use]
    pub fn fields(&self) -> Vec<Field> {
        [Field::Reps, Field::Weight, Field::Duration, Field::Distance]
            .into_iter()
            .filter(|f| self.has(*f))
            .collect()
    }

    /// Overwrites `field` with the value `other` holds for it.
    pub fn copy_field(&mut self, other: &Performance, field: Field) {
        match field {
            Field::Reps => self.reps = other.reps,
            Field::Weight => self.weight = other.weight,
            Field::Duration => self.duration = other.duration,
            Field::Distance => self.distance = other.distance,
        }
    }

    /// Weight × reps, if both are present.
    #[must_use]
    pub fn volume(&self) -> Option<f64> {
        match (self.weight, self.reps) {
            (Some(weight), Some(reps)) => {
                Some(f64::from(f32::from(weight)) * f64::from(u32::from(reps)))
            }
            _ => None,
        }
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
pub struct EntryID(u32);

impl EntryID {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u32> for EntryID {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// A set inside an active workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingEntry {
    pub id: EntryID,
    pub performance: Performance,
    pub rpe: Option<RPE>,
    pub timestamp: DateTime<Utc>,
    pub completed: bool,
    pub is_pr: bool,
    pub pr_value: Option<f64>,
    /// Values of the same set in the most recent earlier workout, shown as a hint.
    pub previous: Option<Performance>,
}

impl WorkingEntry {
    #[must_use]
    pub fn new(id: EntryID, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            performance: Performance::default(),
            rpe: None,
            timestamp,
            completed: false,
            is_pr: false,
            pr_value: None,
            previous: None,
        }
    }

    pub fn clear_record(&mut self) {
        self.is_pr = false;
        self.pr_value = None;
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
pub struct LoggedEntryID(Uuid);

impl LoggedEntryID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for LoggedEntryID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for LoggedEntryID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// A completed set that became part of the training history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEntry {
    pub id: LoggedEntryID,
    pub exercise_id: ExerciseID,
    pub session_id: WorkoutSessionID,
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub performance: Performance,
    pub rpe: RPE,
    pub is_pr: bool,
    pub pr_value: f64,
}

impl LoggedEntry {
    pub fn from_working(
        entry: &WorkingEntry,
        exercise_id: ExerciseID,
        exercise_type: ExerciseType,
        session_id: WorkoutSessionID,
    ) -> Result<Self, ConversionError> {
        if !entry.completed {
            return Err(ConversionError::NotCompleted(entry.id));
        }
        let Some(rpe) = entry.rpe else {
            return Err(ConversionError::MissingRpe(entry.id));
        };
        let performance = entry.performance.masked(exercise_type);
        Ok(Self {
            id: Uuid::new_v4().into(),
            exercise_id,
            session_id,
            date: entry.timestamp.date_naive(),
            timestamp: entry.timestamp,
            performance,
            rpe,
            is_pr: entry.is_pr,
            pr_value: record::pr_value(&performance, exercise_type),
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    static PERFORMANCE: std::sync::LazyLock<Performance> =
        std::sync::LazyLock::new(|| Performance {
            reps: Some(Reps::new(8).unwrap()),
            weight: Some(Weight::new(60.0).unwrap()),
            duration: Some(Time::new(45).unwrap()),
            distance: Some(Distance::new(100.0).unwrap()),
        });

    fn completed_entry(rpe: Option<RPE>) -> WorkingEntry {
        WorkingEntry {
            performance: *PERFORMANCE,
            rpe,
            completed: true,
            ..WorkingEntry::new(
                1.into(),
                Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap(),
            )
        }
    }

    #[rstest]
    #[case(ExerciseType::WeightReps, vec![Field::Reps, Field::Weight])]
    #[case(ExerciseType::Reps, vec![Field::Reps])]
    #[case(ExerciseType::Duration, vec![Field::Duration])]
    #[case(ExerciseType::DistanceDuration, vec![Field::Duration, Field::Distance])]
    fn test_performance_masked(#[case] exercise_type: ExerciseType, #[case] expected: Vec<Field>) {
        assert_eq!(PERFORMANCE.masked(exercise_type).fields(), expected);
    }

    #[test]
    fn test_performance_is_empty() {
        assert!(Performance::default().is_empty());
        assert!(!PERFORMANCE.is_empty());
    }

    #[test]
    fn test_performance_volume() {
        assert_approx_eq!(PERFORMANCE.volume().unwrap(), 480.0);
        assert_eq!(Performance::default().volume(), None);
    }

    #[test]
    fn test_logged_entry_from_working() {
        let entry = completed_entry(Some(RPE::EIGHT));
        let logged =
            LoggedEntry::from_working(&entry, 7.into(), ExerciseType::WeightReps, 9.into())
                .unwrap();
        assert_eq!(logged.exercise_id, 7.into());
        assert_eq!(logged.session_id, 9.into());
        assert_eq!(logged.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(logged.rpe, RPE::EIGHT);
        assert_eq!(logged.performance.duration, None);
        assert_eq!(logged.performance.distance, None);
        assert_approx_eq!(logged.pr_value, 480.0);
    }

    #[test]
    fn test_logged_entry_from_working_without_rpe() {
        assert_eq!(
            LoggedEntry::from_working(
                &completed_entry(None),
                7.into(),
                ExerciseType::WeightReps,
                9.into()
            ),
            Err(ConversionError::MissingRpe(1.into()))
        );
    }

    #[test]
    fn test_logged_entry_from_working_not_completed() {
        let mut entry = completed_entry(Some(RPE::EIGHT));
        entry.completed = false;
        assert_eq!(
            LoggedEntry::from_working(&entry, 7.into(), ExerciseType::WeightReps, 9.into()),
            Err(ConversionError::NotCompleted(1.into()))
        );
    }

    #[test]
    fn test_entry_id_next() {
        assert_eq!(EntryID::from(4).next(), EntryID::from(5));
    }
}
