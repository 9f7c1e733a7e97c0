use std::collections::BTreeSet;

use derive_more::{AsRef, Deref, Display};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    CreateError, DeleteError, ExerciseID, ExerciseType, Performance, ReadError, UpdateError,
    ValidationError,
};

#[allow(async_fn_in_trait)]
pub trait RoutineService {
    async fn get_routines(&self) -> Result<Vec<Routine>, ReadError>;
    async fn create_routine(
        &self,
        title: Title,
        exercises: Vec<RoutineExercise>,
    ) -> Result<Routine, CreateError>;
    async fn modify_routine(
        &self,
        id: RoutineID,
        title: Option<Title>,
        exercises: Option<Vec<RoutineExercise>>,
    ) -> Result<Routine, UpdateError>;
    async fn delete_routine(&self, id: RoutineID) -> Result<RoutineID, DeleteError>;

    async fn validate_routine_title(
        &self,
        title: &str,
        id: RoutineID,
    ) -> Result<Title, ValidationError> {
        let title = Title::new(title)?;
        match self.get_routines().await {
            Ok(routines) => {
                if routines
                    .iter()
                    .all(|r| r.title != title || r.id == id)
                {
                    Ok(title)
                } else {
                    Err(ValidationError::Conflict(String::from("title")))
                }
            }
            Err(err) => Err(ValidationError::Other(err.to_string())),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait RoutineRepository {
    async fn read_routines(&self) -> Result<Vec<Routine>, ReadError>;
    async fn create_routine(
        &self,
        title: Title,
        exercises: Vec<RoutineExercise>,
    ) -> Result<Routine, CreateError>;
    async fn modify_routine(
        &self,
        id: RoutineID,
        title: Option<Title>,
        exercises: Option<Vec<RoutineExercise>>,
    ) -> Result<Routine, UpdateError>;
    async fn delete_routine(&self, id: RoutineID) -> Result<RoutineID, DeleteError>;
}

/// A reusable workout template. Routines have no completion state and no RPE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub id: RoutineID,
    pub title: Title,
    pub source: RoutineSource,
    pub notes: String,
    pub exercises: Vec<RoutineExercise>,
}

impl Routine {
    #[must_use]
    pub fn num_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    #[must_use]
    pub fn exercises(&self) -> BTreeSet<ExerciseID> {
        self.exercises
            .iter()
            .filter_map(|e| e.exercise.exercise_id())
            .collect()
    }

    /// Placeholder keys that still need to be resolved to catalog exercises.
    #[must_use]
    pub fn template_keys(&self) -> BTreeSet<&str> {
        self.exercises
            .iter()
            .filter_map(|e| e.exercise.template_key())
            .collect()
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.exercises
            .iter()
            .all(|e| e.exercise.exercise_id().is_some())
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
pub struct RoutineID(Uuid);

impl RoutineID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for RoutineID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for RoutineID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutineSource {
    User,
    /// Shipped with the application. Exercises are referenced by template key.
    Public,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExerciseRef {
    Catalog(ExerciseID),
    Template(String),
}

impl ExerciseRef {
    #[must_use]
    pub fn exercise_id(&self) -> Option<ExerciseID> {
        match self {
            ExerciseRef::Catalog(id) => Some(*id),
            ExerciseRef::Template(_) => None,
        }
    }

    #[must_use]
    pub fn template_key(&self) -> Option<&str> {
        match self {
            ExerciseRef::Catalog(_) => None,
            ExerciseRef::Template(key) => Some(key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineExercise {
    pub exercise: ExerciseRef,
    pub name: String,
    pub exercise_type: ExerciseType,
    pub sets: Vec<RoutineSet>,
    pub notes: String,
}

/// Planned set with optional default values.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutineSet {
    pub performance: Performance,
}

#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    pub const MAX_LEN: usize = 64;

    pub fn new(title: &str) -> Result<Self, ValidationError> {
        let trimmed_title = title.trim();

        if trimmed_title.is_empty() {
            return Err(ValidationError::TitleRequired);
        }

        let len = trimmed_title.chars().count();

        if len > Self::MAX_LEN {
            return Err(ValidationError::TitleTooLong(len));
        }

        Ok(Title(trimmed_title.to_string()))
    }
}

impl TryFrom<String> for Title {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Title::new(&value)
    }
}

impl From<Title> for String {
    fn from(value: Title) -> Self {
        value.0
    }
}
