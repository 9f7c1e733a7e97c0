use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    ConversionError, EntryID, EntrySeed, EntryUpdate, Entity, ExerciseDetails, ExerciseID,
    ExerciseType, LoggedEntry, SessionError, SessionRecord, StartMethod, ValidationError,
    WorkingEntry, WorkoutExercise, WorkoutExerciseID, WorkoutHistory, WorkoutSession,
    WorkoutSessionID, record, set,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOptions {
    pub name: Option<String>,
    pub method: StartMethod,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self {
            name: None,
            method: StartMethod::Manual,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FinishOptions {
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishSummary {
    pub session_id: WorkoutSessionID,
    pub num_entries: usize,
    pub volume: f64,
    pub exercise_ids: Vec<ExerciseID>,
}

/// Everything produced by freezing a workout.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishOutcome {
    pub summary: FinishSummary,
    pub entries: Vec<LoggedEntry>,
    pub record: SessionRecord,
    pub exercise_types: BTreeMap<ExerciseID, ExerciseType>,
}

/// Owns the single active workout and exposes every operation allowed on it.
pub struct WorkoutSessionStore {
    session: Option<WorkoutSession>,
    clock: fn() -> DateTime<Utc>,
}

impl Default for WorkoutSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkoutSessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    #[must_use]
    pub fn with_clock(clock: fn() -> DateTime<Utc>) -> Self {
        Self {
            session: None,
            clock,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn session(&self) -> Option<&WorkoutSession> {
        self.session.as_ref()
    }

    pub fn start(&mut self, options: StartOptions) -> Result<WorkoutSessionID, SessionError> {
        if self.is_active() {
            return Err(SessionError::AlreadyActive);
        }
        let now = (self.clock)();
        let name = options
            .name
            .unwrap_or_else(|| default_name(&options.method, now));
        let mut session = WorkoutSession::new(name, options.method, now);
        session.active = true;
        let id = session.id;
        debug!("started workout session {id}");
        self.session = Some(session);
        Ok(id)
    }

    /// Activates a prepared session, e.g. one produced by stacking routines.
    ///
    /// Previous values and personal bests of every exercise are taken from the history.
    pub fn install(
        &mut self,
        mut session: WorkoutSession,
        history: &WorkoutHistory,
    ) -> Result<WorkoutSessionID, SessionError> {
        if self.is_active() {
            return Err(SessionError::AlreadyActive);
        }
        session.active = true;
        session.start_time = (self.clock)();
        session.renumber();
        for exercise in &mut session.exercises {
            apply_history(exercise, history);
        }
        let exercise_ids = session
            .exercises
            .iter()
            .map(|e| e.exercise_id)
            .collect::<BTreeSet<_>>();
        for exercise_id in exercise_ids {
            refresh_records(&mut session, exercise_id);
        }
        let id = session.id;
        debug!(
            "installed workout session {id} with {} exercises",
            session.exercises.len()
        );
        self.session = Some(session);
        Ok(id)
    }

    /// Appends one workout exercise per id, seeded from the exercise's history.
    pub fn add_exercises(
        &mut self,
        ids: &[ExerciseID],
        details: &BTreeMap<ExerciseID, ExerciseDetails>,
        history: &WorkoutHistory,
    ) -> Result<Vec<WorkoutExerciseID>, SessionError> {
        let now = (self.clock)();
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        let details = ids
            .iter()
            .map(|id| {
                details
                    .get(id)
                    .ok_or(SessionError::NotFound(Entity::ExerciseDetails(*id)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut added = vec![];
        for d in details {
            let mut exercise = WorkoutExercise::new(d, session.exercises.len());
            seed_entries(&mut exercise, history, now);
            added.push(exercise.id);
            session.exercises.push(exercise);
        }
        Ok(added)
    }

    pub fn remove_exercise(
        &mut self,
        id: WorkoutExerciseID,
    ) -> Result<WorkoutExercise, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        let idx = exercise_index(session, id)?;
        let removed = session.exercises.remove(idx);
        session.renumber();
        refresh_records(session, removed.exercise_id);
        Ok(removed)
    }

    /// Swaps the exercise for another one at the same position. Entries and notes of the
    /// old exercise are discarded.
    pub fn replace_exercise(
        &mut self,
        old_id: WorkoutExerciseID,
        details: &ExerciseDetails,
        history: &WorkoutHistory,
    ) -> Result<WorkoutExerciseID, SessionError> {
        let now = (self.clock)();
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        let idx = exercise_index(session, old_id)?;
        let mut exercise = WorkoutExercise::new(details, idx);
        exercise.source_routine_id = session.exercises[idx].source_routine_id;
        seed_entries(&mut exercise, history, now);
        let new_id = exercise.id;
        let old = std::mem::replace(&mut session.exercises[idx], exercise);
        refresh_records(session, old.exercise_id);
        Ok(new_id)
    }

    pub fn move_exercise(
        &mut self,
        id: WorkoutExerciseID,
        position: usize,
    ) -> Result<(), SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        let idx = exercise_index(session, id)?;
        let exercise = session.exercises.remove(idx);
        let position = position.min(session.exercises.len());
        session.exercises.insert(position, exercise);
        session.renumber();
        Ok(())
    }

    pub fn set_notes(&mut self, id: WorkoutExerciseID, notes: String) -> Result<(), SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        session
            .exercise_mut(id)
            .ok_or(SessionError::NotFound(Entity::WorkoutExercise(id)))?
            .notes = notes;
        Ok(())
    }

    pub fn rename(&mut self, name: String) -> Result<(), SessionError> {
        self.session
            .as_mut()
            .ok_or(SessionError::NoActiveSession)?
            .name = name;
        Ok(())
    }

    pub fn add_entry(
        &mut self,
        exercise_id: WorkoutExerciseID,
        seed: EntrySeed,
    ) -> Result<EntryID, SessionError> {
        let now = (self.clock)();
        let exercise = self.exercise_mut(exercise_id)?;
        Ok(set::add_entry(exercise, seed, now))
    }

    /// Applies an update through the set rules. Completing an entry stamps it with the
    /// current time and re-evaluates the personal records of the exercise.
    pub fn update_entry(
        &mut self,
        exercise_id: WorkoutExerciseID,
        entry_id: EntryID,
        update: EntryUpdate,
    ) -> Result<(), SessionError> {
        let now = (self.clock)();
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        let exercise = session
            .exercise_mut(exercise_id)
            .ok_or(SessionError::NotFound(Entity::WorkoutExercise(exercise_id)))?;
        let was_completed = exercise
            .entry(entry_id)
            .ok_or(SessionError::NotFound(Entity::Entry(entry_id)))?
            .completed;

        set::update_entry(exercise, entry_id, update)?;

        let catalog_id = exercise.exercise_id;
        if let Some(entry) = exercise.entries.iter_mut().find(|e| e.id == entry_id) {
            if entry.completed && !was_completed {
                entry.timestamp = now;
            }
            if entry.completed || was_completed {
                refresh_records(session, catalog_id);
            }
        }
        Ok(())
    }

    pub fn remove_entry(
        &mut self,
        exercise_id: WorkoutExerciseID,
        entry_id: EntryID,
    ) -> Result<WorkingEntry, SessionError> {
        let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
        let exercise = session
            .exercise_mut(exercise_id)
            .ok_or(SessionError::NotFound(Entity::WorkoutExercise(exercise_id)))?;
        let catalog_id = exercise.exercise_id;
        let removed = set::remove_entry(exercise, entry_id)?;
        if removed.completed {
            refresh_records(session, catalog_id);
        }
        Ok(removed)
    }

    /// Freezes the active workout into logged entries and a session record.
    ///
    /// Only completed entries with an RPE are logged. Entries without one are dropped
    /// without failing the operation.
    pub fn finish(&mut self, options: FinishOptions) -> Result<FinishOutcome, SessionError> {
        let mut session = self.session.take().ok_or(SessionError::NoActiveSession)?;
        let finish_time = (self.clock)();
        session.active = false;
        if let Some(name) = options.name {
            session.name = name;
        }

        let mut entries = vec![];
        let mut exercise_ids: Vec<ExerciseID> = vec![];
        let mut exercise_types = BTreeMap::new();
        let mut volume = 0.0;

        for exercise in &session.exercises {
            let mut logged = 0;
            for entry in exercise.completed_entries() {
                match LoggedEntry::from_working(
                    entry,
                    exercise.exercise_id,
                    exercise.exercise_type,
                    session.id,
                ) {
                    Ok(logged_entry) => {
                        if exercise.exercise_type.has_volume() {
                            volume += logged_entry.performance.volume().unwrap_or_default();
                        }
                        entries.push(logged_entry);
                        logged += 1;
                    }
                    Err(ConversionError::MissingRpe(id)) => {
                        debug!("skipping entry {id} of {} without RPE", exercise.name);
                    }
                    Err(ConversionError::NotCompleted(_)) => {}
                }
            }
            if logged > 0 {
                exercise_types.insert(exercise.exercise_id, exercise.exercise_type);
                if !exercise_ids.contains(&exercise.exercise_id) {
                    exercise_ids.push(exercise.exercise_id);
                }
            }
        }

        for (exercise_id, exercise_type) in &exercise_types {
            let previous_best = session
                .exercises
                .iter()
                .filter(|e| e.exercise_id == *exercise_id)
                .map(|e| e.previous_best)
                .fold(0.0, f64::max);
            let mut flagged = entries
                .iter()
                .filter(|e| e.exercise_id == *exercise_id)
                .cloned()
                .collect::<Vec<_>>();
            record::flag_against(previous_best, &mut flagged, *exercise_type);
            for flagged_entry in flagged {
                if let Some(entry) = entries.iter_mut().find(|e| e.id == flagged_entry.id) {
                    *entry = flagged_entry;
                }
            }
        }

        let summary = FinishSummary {
            session_id: session.id,
            num_entries: entries.len(),
            volume,
            exercise_ids,
        };
        debug!(
            "finished workout session {} with {} entries",
            session.id, summary.num_entries
        );

        Ok(FinishOutcome {
            record: SessionRecord {
                id: session.id,
                name: session.name,
                start_method: session.start_method,
                start_time: session.start_time,
                finish_time,
                summary: summary.clone(),
            },
            summary,
            entries,
            exercise_types,
        })
    }

    /// Drops the active workout, if any, without logging anything.
    pub fn discard(&mut self) -> Option<WorkoutSession> {
        let session = self.session.take();
        if let Some(ref session) = session {
            debug!("discarded workout session {}", session.id);
        }
        session
    }

    fn exercise_mut(
        &mut self,
        id: WorkoutExerciseID,
    ) -> Result<&mut WorkoutExercise, SessionError> {
        self.session
            .as_mut()
            .ok_or(SessionError::NoActiveSession)?
            .exercise_mut(id)
            .ok_or(SessionError::NotFound(Entity::WorkoutExercise(id)))
    }
}

/// Rejects finishing a workout without any completed set.
pub fn validate_finish(session: &WorkoutSession) -> Result<(), ValidationError> {
    if session.num_completed_entries() == 0 {
        return Err(ValidationError::NoCompletedSets);
    }
    Ok(())
}

fn default_name(method: &StartMethod, start_time: DateTime<Utc>) -> String {
    match method {
        StartMethod::QuickStart => String::from("Quick Workout"),
        StartMethod::Manual | StartMethod::Routines(_) => {
            format!("Workout {}", start_time.format("%Y-%m-%d"))
        }
    }
}

fn exercise_index(session: &WorkoutSession, id: WorkoutExerciseID) -> Result<usize, SessionError> {
    session
        .exercises
        .iter()
        .position(|e| e.id == id)
        .ok_or(SessionError::NotFound(Entity::WorkoutExercise(id)))
}

/// Gives the exercise as many empty entries as were logged the last time it was
/// performed, or a single one if it never was.
fn seed_entries(exercise: &mut WorkoutExercise, history: &WorkoutHistory, now: DateTime<Utc>) {
    for _ in 0..history.last_set_count(exercise.exercise_id).max(1) {
        set::add_entry(exercise, EntrySeed::Empty, now);
    }
    apply_history(exercise, history);
}

/// Sets the previous-value hints and the historical best of the exercise.
fn apply_history(exercise: &mut WorkoutExercise, history: &WorkoutHistory) {
    let exercise_type = exercise.exercise_type;
    let previous = history.most_recent_entries(exercise.exercise_id);
    for (entry, prev) in exercise.entries.iter_mut().zip(previous) {
        entry.previous = Some(prev.performance.masked(exercise_type));
    }
    exercise.previous_best = history.best_pr_value(exercise.exercise_id, exercise_type);
}

/// Re-evaluates the record flags of all completed entries of one catalog exercise
/// within the session, in completion order. Entries without RPE are never logged and
/// therefore never rank.
fn refresh_records(session: &mut WorkoutSession, exercise_id: ExerciseID) {
    let mut completed = vec![];
    let mut running_best = 0.0_f64;
    for (x, exercise) in session.exercises.iter().enumerate() {
        if exercise.exercise_id != exercise_id {
            continue;
        }
        running_best = running_best.max(exercise.previous_best);
        for (e, entry) in exercise.entries.iter().enumerate() {
            if entry.completed {
                completed.push((entry.timestamp, x, e));
            }
        }
    }
    completed.sort_by_key(|(timestamp, _, _)| *timestamp);

    for exercise in &mut session.exercises {
        if exercise.exercise_id == exercise_id {
            for entry in &mut exercise.entries {
                entry.clear_record();
            }
        }
    }
    for (_, x, e) in completed {
        let exercise = &mut session.exercises[x];
        let exercise_type = exercise.exercise_type;
        let entry = &mut exercise.entries[e];
        let value = record::pr_value(&entry.performance, exercise_type);
        entry.pr_value = Some(value);
        if entry.rpe.is_none() {
            continue;
        }
        entry.is_pr = record::beats(value, running_best);
        running_best = running_best.max(value);
    }
}
