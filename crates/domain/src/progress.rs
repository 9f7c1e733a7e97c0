use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate};
use derive_more::Deref;
use serde::{Deserialize, Serialize};

use crate::{MuscleGroup, MuscleID, Property, ReadError, UpdateError, XpAward};

#[allow(async_fn_in_trait)]
pub trait ProgressRepository {
    async fn read_progress(&self) -> Result<BodyProgress, ReadError>;
    async fn replace_progress(&self, progress: BodyProgress) -> Result<BodyProgress, UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait ProgressService {
    async fn get_progress(&self) -> Result<BodyProgress, ReadError>;
    async fn replace_progress(&self, progress: BodyProgress) -> Result<BodyProgress, UpdateError>;
}

/// Target percentage of a major group.
pub const GROUP_TARGET: u64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// XP a muscle needs to reach 100 %.
    pub muscle_goal: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self { muscle_goal: 10_000 }
    }
}

/// Long-lived training progress of one muscle or muscle group.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub xp: u64,
    pub goal: u64,
    /// Not capped at 100.
    pub percentage: u64,
    /// Number of consecutive calendar weeks with training.
    pub weekly_streak: u32,
    pub total_sets: u32,
    pub has_exercises: bool,
    pub last_trained: Option<NaiveDate>,
}

impl Progress {
    #[must_use]
    pub fn new(goal: u64, has_exercises: bool) -> Self {
        Self {
            goal,
            has_exercises,
            ..Self::default()
        }
    }

    /// Percentage as shown to the user.
    #[must_use]
    pub fn display_percentage(&self) -> u64 {
        self.percentage.min(100)
    }

    fn record_training(&mut self, date: NaiveDate) {
        self.weekly_streak = match self.last_trained {
            None => 1,
            Some(last) if date < last => self.weekly_streak.max(1),
            Some(last) => match (week_start(date) - week_start(last)).num_days() {
                0 => self.weekly_streak.max(1),
                7 => self.weekly_streak + 1,
                _ => 1,
            },
        };
        self.last_trained = Some(self.last_trained.map_or(date, |last| last.max(date)));
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn percentage(xp: u64, goal: u64) -> u64 {
    if goal == 0 {
        return 0;
    }
    (xp as f64 / goal as f64 * 100.0).round() as u64
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

#[derive(Deref, Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuscleProgressMap(BTreeMap<MuscleID, Progress>);

impl MuscleProgressMap {
    /// Fresh progress for every muscle. `trained_muscles` are the muscles that at least
    /// one catalog exercise involves.
    #[must_use]
    pub fn new(config: &ProgressConfig, trained_muscles: &BTreeSet<MuscleID>) -> Self {
        Self(
            MuscleID::iter()
                .map(|m| {
                    (
                        *m,
                        Progress::new(config.muscle_goal, trained_muscles.contains(m)),
                    )
                })
                .collect(),
        )
    }

    /// Progress of muscles that can be trained by some exercise.
    pub fn visible(&self) -> impl Iterator<Item = (&MuscleID, &Progress)> {
        self.0.iter().filter(|(_, p)| p.has_exercises)
    }

    pub fn set_has_exercises(&mut self, muscle_id: MuscleID, has_exercises: bool) {
        if let Some(progress) = self.0.get_mut(&muscle_id) {
            progress.has_exercises = has_exercises;
        }
    }
}

impl From<BTreeMap<MuscleID, Progress>> for MuscleProgressMap {
    fn from(value: BTreeMap<MuscleID, Progress>) -> Self {
        Self(value)
    }
}

/// Adds the XP of each award to the receiving muscles. Every award counts as one set
/// for each of its muscles. Muscles without exercises are skipped.
pub fn apply_xp(progress: &mut MuscleProgressMap, awards: &[XpAward], date: NaiveDate) {
    for award in awards {
        for muscle_xp in &award.muscles {
            let Some(muscle) = progress.0.get_mut(&muscle_xp.muscle_id) else {
                continue;
            };
            if !muscle.has_exercises {
                continue;
            }
            muscle.xp += u64::from(muscle_xp.xp);
            muscle.total_sets += 1;
            muscle.percentage = percentage(muscle.xp, muscle.goal);
            muscle.record_training(date);
        }
    }
}

/// Group progress follows the best-trained muscle of the group.
#[must_use]
pub fn rollup_major_groups(progress: &MuscleProgressMap) -> BTreeMap<MuscleGroup, Progress> {
    MuscleGroup::iter()
        .map(|group| {
            let muscles = group
                .muscles()
                .filter_map(|m| progress.get(&m))
                .filter(|p| p.has_exercises)
                .collect::<Vec<_>>();
            let best = muscles.iter().map(|p| p.percentage).max().unwrap_or(0);
            (
                *group,
                Progress {
                    xp: best,
                    goal: GROUP_TARGET,
                    percentage: best,
                    weekly_streak: muscles.iter().map(|p| p.weekly_streak).max().unwrap_or(0),
                    total_sets: muscles.iter().map(|p| p.total_sets).sum(),
                    has_exercises: !muscles.is_empty(),
                    last_trained: muscles.iter().filter_map(|p| p.last_trained).max(),
                },
            )
        })
        .collect()
}

/// Persisted progress state.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyProgress {
    pub muscles: MuscleProgressMap,
    pub groups: BTreeMap<MuscleGroup, Progress>,
}

impl BodyProgress {
    #[must_use]
    pub fn new(config: &ProgressConfig, trained_muscles: &BTreeSet<MuscleID>) -> Self {
        let muscles = MuscleProgressMap::new(config, trained_muscles);
        let groups = rollup_major_groups(&muscles);
        Self { muscles, groups }
    }

    pub fn apply(&mut self, awards: &[XpAward], date: NaiveDate) {
        apply_xp(&mut self.muscles, awards, date);
        self.groups = rollup_major_groups(&self.muscles);
    }
}
