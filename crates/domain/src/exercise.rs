use std::{collections::BTreeMap, slice::Iter};

use derive_more::{Deref, Display};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseDetails {
    pub id: ExerciseID,
    pub name: String,
    pub exercise_type: ExerciseType,
    pub muscles: Vec<ExerciseMuscle>,
    pub equipment: Vec<String>,
}

impl ExerciseDetails {
    #[must_use]
    pub fn muscle_roles(&self) -> BTreeMap<MuscleID, Role> {
        self.muscles.iter().map(|m| (m.muscle_id, m.role)).collect()
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
pub struct ExerciseID(Uuid);

impl ExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// The numeric fields a performance entry may carry.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    Reps,
    Weight,
    Duration,
    Distance,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExerciseType {
    WeightReps,
    Reps,
    WeightedBodyweight,
    AssistedBodyweight,
    Duration,
    WeightDuration,
    DistanceDuration,
    WeightDistance,
}

impl ExerciseType {
    #[must_use]
    pub fn fields(self) -> &'static [Field] {
        match self {
            ExerciseType::WeightReps
            | ExerciseType::WeightedBodyweight
            | ExerciseType::AssistedBodyweight => &[Field::Weight, Field::Reps],
            ExerciseType::Reps => &[Field::Reps],
            ExerciseType::Duration => &[Field::Duration],
            ExerciseType::WeightDuration => &[Field::Weight, Field::Duration],
            ExerciseType::DistanceDuration => &[Field::Distance, Field::Duration],
            ExerciseType::WeightDistance => &[Field::Weight, Field::Distance],
        }
    }

    #[must_use]
    pub fn requires(self, field: Field) -> bool {
        self.fields().contains(&field)
    }

    /// Whether entries of this type contribute weight × reps volume.
    #[must_use]
    pub fn has_volume(self) -> bool {
        self.requires(Field::Weight) && self.requires(Field::Reps)
    }
}

impl Property for ExerciseType {
    fn iter() -> Iter<'static, ExerciseType> {
        static TYPES: [ExerciseType; 8] = [
            ExerciseType::WeightReps,
            ExerciseType::Reps,
            ExerciseType::WeightedBodyweight,
            ExerciseType::AssistedBodyweight,
            ExerciseType::Duration,
            ExerciseType::WeightDuration,
            ExerciseType::DistanceDuration,
            ExerciseType::WeightDistance,
        ];
        TYPES.iter()
    }

    fn name(self) -> &'static str {
        match self {
            ExerciseType::WeightReps => "Weight & Reps",
            ExerciseType::Reps => "Reps Only",
            ExerciseType::WeightedBodyweight => "Weighted Bodyweight",
            ExerciseType::AssistedBodyweight => "Assisted Bodyweight",
            ExerciseType::Duration => "Duration",
            ExerciseType::WeightDuration => "Weight & Duration",
            ExerciseType::DistanceDuration => "Distance & Duration",
            ExerciseType::WeightDistance => "Weight & Distance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseMuscle {
    pub muscle_id: MuscleID,
    pub role: Role,
}

/// How a muscle participates in an exercise.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Target,
    Synergist,
    Stabilizer,
    Lengthening,
}

impl Property for Role {
    fn iter() -> Iter<'static, Role> {
        static ROLES: [Role; 4] = [
            Role::Target,
            Role::Synergist,
            Role::Stabilizer,
            Role::Lengthening,
        ];
        ROLES.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Role::Target => "Target",
            Role::Synergist => "Synergist",
            Role::Stabilizer => "Stabilizer",
            Role::Lengthening => "Lengthening",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MuscleID {
    // Neck
    Neck = 1,
    // Chest
    Pecs = 11,
    // Back
    Traps = 21,
    Lats = 22,
    // Shoulders
    FrontDelts = 31,
    SideDelts = 32,
    RearDelts = 33,
    // Upper arms
    Biceps = 41,
    Triceps = 42,
    // Forearms
    Forearms = 51,
    // Waist
    Abs = 61,
    ErectorSpinae = 62,
    Obliques = 63,
    // Hips
    Glutes = 71,
    Abductors = 72,
    // Thighs
    Quads = 81,
    Hamstrings = 82,
    Adductors = 83,
    // Calves
    Calves = 91,
}

impl Property for MuscleID {
    fn iter() -> Iter<'static, MuscleID> {
        static MUSCLES: [MuscleID; 19] = [
            MuscleID::Neck,
            MuscleID::Pecs,
            MuscleID::Traps,
            MuscleID::Lats,
            MuscleID::FrontDelts,
            MuscleID::SideDelts,
            MuscleID::RearDelts,
            MuscleID::Biceps,
            MuscleID::Triceps,
            MuscleID::Forearms,
            MuscleID::Abs,
            MuscleID::ErectorSpinae,
            MuscleID::Obliques,
            MuscleID::Glutes,
            MuscleID::Abductors,
            MuscleID::Quads,
            MuscleID::Hamstrings,
            MuscleID::Adductors,
            MuscleID::Calves,
        ];
        MUSCLES.iter()
    }

    fn name(self) -> &'static str {
        match self {
            MuscleID::Neck => "Neck",
            MuscleID::Pecs => "Pecs",
            MuscleID::Traps => "Traps",
            MuscleID::Lats => "Lats",
            MuscleID::FrontDelts => "Front Delts",
            MuscleID::SideDelts => "Side Delts",
            MuscleID::RearDelts => "Rear Delts",
            MuscleID::Biceps => "Biceps",
            MuscleID::Triceps => "Triceps",
            MuscleID::Forearms => "Forearms",
            MuscleID::Abs => "Abs",
            MuscleID::ErectorSpinae => "Erector Spinae",
            MuscleID::Obliques => "Obliques",
            MuscleID::Glutes => "Glutes",
            MuscleID::Abductors => "Abductors",
            MuscleID::Quads => "Quads",
            MuscleID::Hamstrings => "Hamstrings",
            MuscleID::Adductors => "Adductors",
            MuscleID::Calves => "Calves",
        }
    }
}

impl MuscleID {
    #[must_use]
    pub fn group(self) -> MuscleGroup {
        match self {
            MuscleID::Neck | MuscleID::Traps | MuscleID::Lats | MuscleID::ErectorSpinae => {
                MuscleGroup::Back
            }
            MuscleID::Pecs => MuscleGroup::Chest,
            MuscleID::FrontDelts | MuscleID::SideDelts | MuscleID::RearDelts => {
                MuscleGroup::Shoulders
            }
            MuscleID::Biceps | MuscleID::Triceps | MuscleID::Forearms => MuscleGroup::Arms,
            MuscleID::Abs | MuscleID::Obliques => MuscleGroup::Core,
            MuscleID::Glutes
            | MuscleID::Abductors
            | MuscleID::Quads
            | MuscleID::Hamstrings
            | MuscleID::Adductors
            | MuscleID::Calves => MuscleGroup::Legs,
        }
    }
}

impl TryFrom<u8> for MuscleID {
    type Error = MuscleIDError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        MuscleID::iter()
            .find(|m| **m as u8 == value)
            .copied()
            .ok_or(MuscleIDError::Invalid(value))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MuscleIDError {
    #[error("Invalid muscle ID ({0})")]
    Invalid(u8),
}

/// Coarse muscle grouping used for rolled-up progress.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Arms,
    Core,
    Legs,
}

impl Property for MuscleGroup {
    fn iter() -> Iter<'static, MuscleGroup> {
        static GROUPS: [MuscleGroup; 6] = [
            MuscleGroup::Chest,
            MuscleGroup::Back,
            MuscleGroup::Shoulders,
            MuscleGroup::Arms,
            MuscleGroup::Core,
            MuscleGroup::Legs,
        ];
        GROUPS.iter()
    }

    fn name(self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Arms => "Arms",
            MuscleGroup::Core => "Core",
            MuscleGroup::Legs => "Legs",
        }
    }
}

impl MuscleGroup {
    pub fn muscles(self) -> impl Iterator<Item = MuscleID> {
        MuscleID::iter().copied().filter(move |m| m.group() == self)
    }
}

pub trait Property: Clone + Copy + Sized {
    fn iter() -> Iter<'static, Self>;
    fn name(self) -> &'static str;
}
