use std::fmt;

use derive_more::{Display, Into};
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Default,
    Display,
    Clone,
    Copy,
    Into,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub struct Reps(u32);

impl Reps {
    pub fn new(value: u32) -> Result<Self, RepsError> {
        if !(0..1000).contains(&value) {
            return Err(RepsError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Reps {
    type Error = RepsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u32>() {
            Ok(parsed_value) => Reps::new(parsed_value),
            Err(_) => Err(RepsError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RepsError {
    #[error("Reps must be in the range 0 to 999")]
    OutOfRange,
    #[error("Reps must be an integer")]
    ParseError,
}

/// Weight in kilograms.
#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Weight(f32);

impl Weight {
    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !(0.0..1000.0).contains(&value) {
            return Err(WeightError::OutOfRange);
        }

        Ok(Self(value))
    }

    /// Converts pounds into the canonical unit.
    pub fn from_lb(value: f32) -> Result<Self, WeightError> {
        Self::new((value * 0.453_592_37 * 100.0).round() / 100.0)
    }
}

impl TryFrom<&str> for Weight {
    type Error = WeightError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<f32>() {
            Ok(parsed_value) => Weight::new(parsed_value),
            Err(_) => Err(WeightError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("Weight must be in the range 0.0 to 999.9 kg")]
    OutOfRange,
    #[error("Weight must be a decimal")]
    ParseError,
}

/// Duration in seconds.
#[derive(
    Debug,
    Default,
    Display,
    Clone,
    Copy,
    Into,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub struct Time(u32);

impl Time {
    pub fn new(value: u32) -> Result<Self, TimeError> {
        if value > 86_400 {
            return Err(TimeError::OutOfRange);
        }

        Ok(Self(value))
    }
}

impl TryFrom<&str> for Time {
    type Error = TimeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u32>() {
            Ok(parsed_value) => Time::new(parsed_value),
            Err(_) => Err(TimeError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum TimeError {
    #[error("Time must be in the range 0 to 86400 s")]
    OutOfRange,
    #[error("Time must be an integer")]
    ParseError,
}

/// Distance in meters.
#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Distance(f32);

impl Distance {
    pub fn new(value: f32) -> Result<Self, DistanceError> {
        if !(0.0..1_000_000.0).contains(&value) {
            return Err(DistanceError::OutOfRange);
        }

        Ok(Self(value))
    }

    pub fn from_km(value: f32) -> Result<Self, DistanceError> {
        Self::new(value * 1000.0)
    }
}

impl TryFrom<&str> for Distance {
    type Error = DistanceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<f32>() {
            Ok(parsed_value) => Distance::new(parsed_value),
            Err(_) => Err(DistanceError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum DistanceError {
    #[error("Distance must be in the range 0 to 999999 m")]
    OutOfRange,
    #[error("Distance must be a decimal")]
    ParseError,
}

/// Rate of perceived exertion on an integer scale from 1 to 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RPE(u8);

impl RPE {
    pub const MIN: RPE = RPE(1);
    pub const MAX: RPE = RPE(10);

    pub const ONE: RPE = RPE(1);
    pub const TWO: RPE = RPE(2);
    pub const THREE: RPE = RPE(3);
    pub const FOUR: RPE = RPE(4);
    pub const FIVE: RPE = RPE(5);
    pub const SIX: RPE = RPE(6);
    pub const SEVEN: RPE = RPE(7);
    pub const EIGHT: RPE = RPE(8);
    pub const NINE: RPE = RPE(9);
    pub const TEN: RPE = RPE(10);

    pub fn new(value: u8) -> Result<Self, RPEError> {
        if !(Self::MIN.0..=Self::MAX.0).contains(&value) {
            return Err(RPEError::OutOfRange);
        }

        Ok(Self(value))
    }

    /// Position of the value within the scale, 0.0 for the minimum and 1.0 for the maximum.
    #[must_use]
    pub fn fraction(self) -> f64 {
        f64::from(self.0 - Self::MIN.0) / f64::from(Self::MAX.0 - Self::MIN.0)
    }
}

impl From<RPE> for u8 {
    fn from(value: RPE) -> Self {
        value.0
    }
}

impl TryFrom<u8> for RPE {
    type Error = RPEError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        RPE::new(value)
    }
}

impl TryFrom<&str> for RPE {
    type Error = RPEError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u8>() {
            Ok(parsed_value) => RPE::new(parsed_value),
            Err(_) => Err(RPEError::ParseError),
        }
    }
}

impl fmt::Display for RPE {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RPEError {
    #[error("RPE must be in the range 1 to 10")]
    OutOfRange,
    #[error("RPE must be an integer")]
    ParseError,
}
