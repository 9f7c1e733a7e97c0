use log::{debug, error};

use crate::{
    BodyProgress, CreateError, DeleteError, Entity, FinishOutcome, HistoryRepository,
    HistoryService, LoggedEntry, LoggedEntryID, ProgressRepository, ProgressService, ReadError,
    Routine, RoutineExercise, RoutineID, RoutineRepository, RoutineService, SessionError, Title,
    UpdateError, WorkoutHistory,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: RoutineRepository> RoutineService for Service<R> {
    async fn get_routines(&self) -> Result<Vec<Routine>, ReadError> {
        log_on_error!(
            self.repository.read_routines(),
            ReadError,
            "get",
            "routines"
        )
    }

    async fn create_routine(
        &self,
        title: Title,
        exercises: Vec<RoutineExercise>,
    ) -> Result<Routine, CreateError> {
        log_on_error!(
            self.repository.create_routine(title, exercises),
            CreateError,
            "create",
            "routine"
        )
    }

    async fn modify_routine(
        &self,
        id: RoutineID,
        title: Option<Title>,
        exercises: Option<Vec<RoutineExercise>>,
    ) -> Result<Routine, UpdateError> {
        log_on_error!(
            self.repository.modify_routine(id, title, exercises),
            UpdateError,
            "modify",
            "routine"
        )
    }

    async fn delete_routine(&self, id: RoutineID) -> Result<RoutineID, DeleteError> {
        log_on_error!(
            self.repository.delete_routine(id),
            DeleteError,
            "delete",
            "routine"
        )
    }
}

impl<R: HistoryRepository> HistoryService for Service<R> {
    async fn get_history(&self) -> Result<WorkoutHistory, ReadError> {
        log_on_error!(
            self.repository.read_history(),
            ReadError,
            "get",
            "history"
        )
    }

    async fn record_session(
        &self,
        outcome: FinishOutcome,
    ) -> Result<Vec<LoggedEntry>, CreateError> {
        log_on_error!(
            async {
                let mut history = self.repository.read_history().await?;
                let entries = history.record(outcome);
                self.repository.replace_history(history).await?;
                Ok::<_, CreateError>(entries)
            },
            CreateError,
            "record",
            "session"
        )
    }

    async fn delete_entry(&self, id: LoggedEntryID) -> Result<LoggedEntry, DeleteError> {
        log_on_error!(
            async {
                let mut history = self.repository.read_history().await?;
                let removed = history.remove_entry(id).map_err(|err| match err {
                    SessionError::NotFound(Entity::LoggedEntry(_)) => DeleteError::NotFound,
                    _ => DeleteError::Other(err.into()),
                })?;
                self.repository.replace_history(history).await?;
                Ok::<_, DeleteError>(removed)
            },
            DeleteError,
            "delete",
            "entry"
        )
    }
}

impl<R: ProgressRepository> ProgressService for Service<R> {
    async fn get_progress(&self) -> Result<BodyProgress, ReadError> {
        log_on_error!(
            self.repository.read_progress(),
            ReadError,
            "get",
            "progress"
        )
    }

    async fn replace_progress(&self, progress: BodyProgress) -> Result<BodyProgress, UpdateError> {
        log_on_error!(
            self.repository.replace_progress(progress),
            UpdateError,
            "replace",
            "progress"
        )
    }
}
