use chrono::Utc;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    EntrySeed, Routine, RoutineID, StackError, StartMethod, WorkoutExercise, WorkoutSession, set,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackOptions {
    /// Start with empty entries. The routine's values remain visible as hints.
    pub clear_values: bool,
    /// Length from which the derived name is shortened.
    pub max_name_len: usize,
    pub name: Option<String>,
}

impl Default for StackOptions {
    fn default() -> Self {
        Self {
            clear_values: false,
            max_name_len: 40,
            name: None,
        }
    }
}

/// Combines the routines into one workout that still has to be installed.
pub fn stack(
    routine_ids: &[RoutineID],
    routines: &[Routine],
    options: &StackOptions,
) -> Result<WorkoutSession, StackError> {
    if routine_ids.is_empty() {
        return Err(StackError::Empty);
    }

    let selected = routine_ids
        .iter()
        .map(|id| {
            let routine = routines
                .iter()
                .find(|r| r.id == *id)
                .ok_or(StackError::RoutineNotFound(*id))?;
            if routine.is_resolved() {
                Ok(routine)
            } else {
                Err(StackError::Unresolved(*id))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    let now = Utc::now();
    let name = options.name.clone().unwrap_or_else(|| {
        stacked_name(
            &selected
                .iter()
                .map(|r| r.title.to_string())
                .collect::<Vec<_>>(),
            options.max_name_len,
        )
    });
    let mut session = WorkoutSession::new(name, StartMethod::Routines(routine_ids.to_vec()), now);

    for routine in selected {
        for routine_exercise in &routine.exercises {
            let Some(exercise_id) = routine_exercise.exercise.exercise_id() else {
                continue;
            };
            let mut exercise = WorkoutExercise::with_exercise(
                exercise_id,
                routine_exercise.name.clone(),
                routine_exercise.exercise_type,
                session.exercises.len(),
            );
            exercise.source_routine_id = Some(routine.id);
            exercise.notes.clone_from(&routine_exercise.notes);
            for routine_set in &routine_exercise.sets {
                let performance = routine_set.performance.masked(exercise.exercise_type);
                let seed = if options.clear_values {
                    EntrySeed::Empty
                } else {
                    EntrySeed::Values(performance)
                };
                let id = set::add_entry(&mut exercise, seed, now);
                if let Some(entry) = exercise.entries.iter_mut().find(|e| e.id == id) {
                    entry.previous = Some(performance).filter(|p| !p.is_empty());
                }
            }
            if exercise.entries.is_empty() {
                set::add_entry(&mut exercise, EntrySeed::Empty, now);
            }
            session.exercises.push(exercise);
        }
    }

    debug!(
        "stacked {} routines into {} exercises",
        routine_ids.len(),
        session.exercises.len()
    );

    Ok(session)
}

/// Joins the titles with " + ". Titles that do not fit are summarized as " +N more".
#[must_use]
pub fn stacked_name(titles: &[String], max_len: usize) -> String {
    let Some((first, rest)) = titles.split_first() else {
        return String::new();
    };
    let mut name = first.clone();
    let mut used = 1;
    for title in rest {
        let candidate = format!("{name} + {title}");
        if candidate.chars().count() > max_len {
            break;
        }
        name = candidate;
        used += 1;
    }
    if used < titles.len() {
        name.push_str(&format!(" +{} more", titles.len() - used));
    }
    name
}
