//! Second phase of finishing a workout.
//!
//! After the session has been frozen, the logged entries are turned into XP. The catalog
//! lookups happen concurrently, one per distinct exercise. A failed lookup only removes
//! the XP of that exercise.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use futures_util::future::join_all;
use log::{debug, warn};

use crate::{
    BodyProgress, ExerciseCatalog, ExerciseDetails, ExerciseID, LoggedEntry, LoggedEntryID,
    XpAward, XpConfig,
};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Enrichment {
    pub awards: Vec<(LoggedEntryID, XpAward)>,
    pub skipped: Vec<ExerciseID>,
}

impl Enrichment {
    #[must_use]
    pub fn total_xp(&self) -> u64 {
        self.awards.iter().map(|(_, a)| u64::from(a.total)).sum()
    }
}

/// Computes the XP of every entry and adds it to `progress`.
pub async fn enrich_progress<C: ExerciseCatalog>(
    catalog: &C,
    entries: &[LoggedEntry],
    config: &XpConfig,
    progress: &mut BodyProgress,
    date: NaiveDate,
) -> Enrichment {
    let mut exercise_ids = entries.iter().map(|e| e.exercise_id).collect::<Vec<_>>();
    exercise_ids.sort();
    exercise_ids.dedup();

    let results = join_all(exercise_ids.iter().map(|id| catalog.exercise(*id))).await;

    let mut details: BTreeMap<ExerciseID, ExerciseDetails> = BTreeMap::new();
    let mut skipped = vec![];
    for (id, result) in exercise_ids.into_iter().zip(results) {
        match result {
            Ok(d) => {
                details.insert(id, d);
            }
            Err(err) => {
                warn!("skipping XP of exercise {id}: {err}");
                skipped.push(id);
            }
        }
    }

    let awards = entries
        .iter()
        .filter_map(|entry| {
            details.get(&entry.exercise_id).map(|d| {
                (
                    entry.id,
                    config.distribute(&d.muscles, entry.rpe, entry.is_pr),
                )
            })
        })
        .collect::<Vec<_>>();

    progress.apply(
        &awards.iter().map(|(_, a)| a.clone()).collect::<Vec<_>>(),
        date,
    );

    let enrichment = Enrichment { awards, skipped };
    debug!(
        "distributed {} XP over {} entries",
        enrichment.total_xp(),
        enrichment.awards.len()
    );
    enrichment
}
