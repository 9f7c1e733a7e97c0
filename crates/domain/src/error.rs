use crate::{EntryID, ExerciseID, LoggedEntryID, RoutineID, WorkoutExerciseID};

/// Structural errors of the workout session state machine.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SessionError {
    #[error("no active workout session")]
    NoActiveSession,
    #[error("a workout session is already active")]
    AlreadyActive,
    #[error("{0} not found")]
    NotFound(Entity),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    WorkoutExercise(WorkoutExerciseID),
    Entry(EntryID),
    ExerciseDetails(ExerciseID),
    LoggedEntry(LoggedEntryID),
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::WorkoutExercise(id) => write!(f, "workout exercise {id}"),
            Entity::Entry(id) => write!(f, "entry {id}"),
            Entity::ExerciseDetails(id) => write!(f, "details of exercise {id}"),
            Entity::LoggedEntry(id) => write!(f, "logged entry {id}"),
        }
    }
}

/// Failures of the exercise catalog. These never abort finishing a workout.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("exercise {0} not found in catalog")]
    NotFound(ExerciseID),
    #[error("no catalog exercise for template key \"{0}\"")]
    UnknownKey(String),
    #[error("catalog unavailable")]
    Unavailable,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Caller-level checks that the state machine itself does not enforce.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("workout has no completed sets")]
    NoCompletedSets,
    #[error("title required")]
    TitleRequired,
    #[error("title must be 64 characters or fewer ({0} > 64)")]
    TitleTooLong(usize),
    #[error("{0} already exists")]
    Conflict(String),
    #[error("{0}")]
    Other(String),
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ConversionError {
    #[error("entry {0} is not completed")]
    NotCompleted(EntryID),
    #[error("entry {0} has no RPE")]
    MissingRpe(EntryID),
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum StackError {
    #[error("no routines to stack")]
    Empty,
    #[error("routine {0} not found")]
    RoutineNotFound(RoutineID),
    #[error("routine {0} contains unresolved template exercises")]
    Unresolved(RoutineID),
}

#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum CreateError {
    #[error("conflict")]
    Conflict,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<UpdateError> for CreateError {
    fn from(value: UpdateError) -> Self {
        match value {
            UpdateError::Conflict => CreateError::Conflict,
            UpdateError::Storage(storage) => CreateError::Storage(storage),
            UpdateError::Other(other) => CreateError::Other(other),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum UpdateError {
    #[error("conflict")]
    Conflict,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<ReadError> for UpdateError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::NotFound => UpdateError::Other("not found".into()),
            ReadError::Storage(storage) => UpdateError::Storage(storage),
            ReadError::Other(other) => UpdateError::Other(other),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DeleteError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<UpdateError> for DeleteError {
    fn from(value: UpdateError) -> Self {
        match value {
            UpdateError::Conflict => DeleteError::Other("conflict".into()),
            UpdateError::Storage(storage) => DeleteError::Storage(storage),
            UpdateError::Other(other) => DeleteError::Other(other),
        }
    }
}

impl From<ReadError> for DeleteError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::NotFound => DeleteError::NotFound,
            ReadError::Storage(storage) => DeleteError::Storage(storage),
            ReadError::Other(other) => DeleteError::Other(other),
        }
    }
}

impl From<ReadError> for CreateError {
    fn from(value: ReadError) -> Self {
        UpdateError::from(value).into()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("no connection")]
    NoConnection,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}
