use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    CreateError, DeleteError, Entity, ExerciseID, ExerciseType, FinishOutcome, FinishSummary,
    LoggedEntry, LoggedEntryID, ReadError, SessionError, StartMethod, UpdateError,
    WorkoutSessionID, record,
};

#[allow(async_fn_in_trait)]
pub trait HistoryService {
    async fn get_history(&self) -> Result<WorkoutHistory, ReadError>;
    async fn record_session(&self, outcome: FinishOutcome)
    -> Result<Vec<LoggedEntry>, CreateError>;
    async fn delete_entry(&self, id: LoggedEntryID) -> Result<LoggedEntry, DeleteError>;
}

#[allow(async_fn_in_trait)]
pub trait HistoryRepository {
    async fn read_history(&self) -> Result<WorkoutHistory, ReadError>;
    async fn replace_history(&self, history: WorkoutHistory)
    -> Result<WorkoutHistory, UpdateError>;
}

/// A finished workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: WorkoutSessionID,
    pub name: String,
    pub start_method: StartMethod,
    pub start_time: DateTime<Utc>,
    pub finish_time: DateTime<Utc>,
    pub summary: FinishSummary,
}

/// All finished workouts and their logged entries.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutHistory {
    pub sessions: Vec<SessionRecord>,
    pub entries: Vec<LoggedEntry>,
    pub exercise_types: BTreeMap<ExerciseID, ExerciseType>,
}

impl WorkoutHistory {
    /// Entries of one exercise in chronological order.
    #[must_use]
    pub fn entries_for(&self, exercise_id: ExerciseID) -> Vec<&LoggedEntry> {
        let mut entries = self
            .entries
            .iter()
            .filter(|e| e.exercise_id == exercise_id)
            .collect::<Vec<_>>();
        entries.sort_by_key(|e| e.timestamp);
        entries
    }

    /// Entries of the exercise from the most recent session in which it was performed.
    #[must_use]
    pub fn most_recent_entries(&self, exercise_id: ExerciseID) -> Vec<&LoggedEntry> {
        let entries = self.entries_for(exercise_id);
        let Some(last) = entries.last() else {
            return vec![];
        };
        let session_id = last.session_id;
        entries
            .into_iter()
            .filter(|e| e.session_id == session_id)
            .collect()
    }

    #[must_use]
    pub fn last_set_count(&self, exercise_id: ExerciseID) -> usize {
        self.most_recent_entries(exercise_id).len()
    }

    #[must_use]
    pub fn best_pr_value(&self, exercise_id: ExerciseID, exercise_type: ExerciseType) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.exercise_id == exercise_id)
            .map(|e| record::pr_value(&e.performance, exercise_type))
            .fold(0.0, f64::max)
    }

    /// Appends a finished workout. Record flags of the new entries are re-evaluated
    /// against the existing history. Returns the entries as stored.
    pub fn record(&mut self, outcome: FinishOutcome) -> Vec<LoggedEntry> {
        let FinishOutcome {
            mut entries,
            record,
            exercise_types,
            ..
        } = outcome;

        for (exercise_id, exercise_type) in &exercise_types {
            let existing = self
                .entries
                .iter()
                .filter(|e| e.exercise_id == *exercise_id)
                .cloned()
                .collect::<Vec<_>>();
            let mut appended = entries
                .iter()
                .filter(|e| e.exercise_id == *exercise_id)
                .cloned()
                .collect::<Vec<_>>();
            record::flag_appended(&existing, &mut appended, *exercise_type);
            for flagged in appended {
                if let Some(entry) = entries.iter_mut().find(|e| e.id == flagged.id) {
                    *entry = flagged;
                }
            }
        }

        debug!(
            "recorded workout session {} with {} entries",
            record.id,
            entries.len()
        );
        self.exercise_types.extend(exercise_types);
        self.sessions.push(record);
        self.entries.extend(entries.iter().cloned());
        entries
    }

    /// Deletes a logged entry and recomputes the record flags of all later entries of
    /// the same exercise.
    pub fn remove_entry(&mut self, id: LoggedEntryID) -> Result<LoggedEntry, SessionError> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(SessionError::NotFound(Entity::LoggedEntry(id)))?;
        let removed = self.entries.remove(idx);
        if let Some(exercise_type) = self.exercise_types.get(&removed.exercise_id).copied() {
            self.update_exercise_entries(removed.exercise_id, |entries| {
                record::recompute_after_removal(removed.timestamp, entries, exercise_type);
            });
        }
        Ok(removed)
    }

    /// Re-inserts a previously removed entry and recomputes all flags of its exercise.
    pub fn restore_entry(&mut self, entry: LoggedEntry) {
        let exercise_id = entry.exercise_id;
        self.entries.push(entry);
        if let Some(exercise_type) = self.exercise_types.get(&exercise_id).copied() {
            self.update_exercise_entries(exercise_id, |entries| {
                record::recompute_all(entries, exercise_type);
            });
        }
    }

    fn update_exercise_entries(
        &mut self,
        exercise_id: ExerciseID,
        update: impl FnOnce(&mut [LoggedEntry]),
    ) {
        let indices = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.exercise_id == exercise_id)
            .map(|(idx, _)| idx)
            .collect::<Vec<_>>();
        let mut entries = indices
            .iter()
            .map(|idx| self.entries[*idx].clone())
            .collect::<Vec<_>>();
        update(&mut entries);
        for (idx, entry) in indices.into_iter().zip(entries) {
            self.entries[idx] = entry;
        }
    }
}
