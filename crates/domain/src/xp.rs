use serde::{Deserialize, Serialize};

use crate::{ExerciseMuscle, MuscleID, RPE, Role};

/// Relative share of a set's XP a muscle receives for its role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleWeights {
    pub target: f64,
    pub synergist: f64,
    pub stabilizer: f64,
    pub lengthening: f64,
}

impl Default for RoleWeights {
    fn default() -> Self {
        Self {
            target: 1.0,
            synergist: 0.5,
            stabilizer: 0.25,
            lengthening: 0.35,
        }
    }
}

impl RoleWeights {
    #[must_use]
    pub fn weight(&self, role: Role) -> f64 {
        match role {
            Role::Target => self.target,
            Role::Synergist => self.synergist,
            Role::Stabilizer => self.stabilizer,
            Role::Lengthening => self.lengthening,
        }
    }
}

/// Constants of the XP computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XpConfig {
    /// XP of a target muscle for one set at the lowest RPE without a record.
    pub base_xp: f64,
    pub role_weights: RoleWeights,
    /// Multiplier at the lowest RPE.
    pub rpe_floor: f64,
    /// Multiplier at the highest RPE.
    pub rpe_ceiling: f64,
    pub pr_multiplier: f64,
}

impl Default for XpConfig {
    fn default() -> Self {
        Self {
            base_xp: 100.0,
            role_weights: RoleWeights::default(),
            rpe_floor: 0.5,
            rpe_ceiling: 1.5,
            pr_multiplier: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuscleXp {
    pub muscle_id: MuscleID,
    pub role: Role,
    pub xp: u32,
}

/// XP earned by one completed entry.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpAward {
    pub muscles: Vec<MuscleXp>,
    pub total: u32,
}

impl XpAward {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.muscles.is_empty()
    }
}

impl XpConfig {
    /// Scales linearly from `rpe_floor` at the lowest to `rpe_ceiling` at the highest RPE.
    #[must_use]
    pub fn rpe_multiplier(&self, rpe: RPE) -> f64 {
        self.rpe_floor + (self.rpe_ceiling - self.rpe_floor) * rpe.fraction()
    }

    /// Splits the XP of one completed entry among the muscles of its exercise.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn distribute(&self, muscles: &[ExerciseMuscle], rpe: RPE, is_pr: bool) -> XpAward {
        let pr = if is_pr { self.pr_multiplier } else { 1.0 };
        let magnitude = self.base_xp * self.rpe_multiplier(rpe) * pr;
        let muscles = muscles
            .iter()
            .map(|m| MuscleXp {
                muscle_id: m.muscle_id,
                role: m.role,
                xp: (magnitude * self.role_weights.weight(m.role))
                    .round()
                    .max(0.0) as u32,
            })
            .collect::<Vec<_>>();
        let total = muscles.iter().map(|m| m.xp).sum();
        XpAward { muscles, total }
    }
}
