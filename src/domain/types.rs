/// Core types and enums used throughout the domain layer
///
/// This module defines the identifier wrappers and the small enums (Stage,
/// Period, MealType) shared by profiles, meal entries and analytics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a user profile
///
/// Wraps a UUID so a user ID can't be mixed up with a meal ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from its string form (as received in requests)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a logged meal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MealId(pub Uuid);

impl MealId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for MealId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Phase of the user's maternal journey
///
/// The stage selects which row of the nutrient target table applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    TryingToConceive,
    FirstTrimester,
    SecondTrimester,
    ThirdTrimester,
    Postpartum,
}

impl Stage {
    /// Canonical storage / wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::TryingToConceive => "trying_to_conceive",
            Stage::FirstTrimester => "first_trimester",
            Stage::SecondTrimester => "second_trimester",
            Stage::ThirdTrimester => "third_trimester",
            Stage::Postpartum => "postpartum",
        }
    }

    /// Human readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::TryingToConceive => "Trying to conceive",
            Stage::FirstTrimester => "First trimester",
            Stage::SecondTrimester => "Second trimester",
            Stage::ThirdTrimester => "Third trimester",
            Stage::Postpartum => "Postpartum",
        }
    }
}

impl FromStr for Stage {
    type Err = DomainError;

    /// Accepts both snake_case and kebab-case spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "trying_to_conceive" | "ttc" => Ok(Stage::TryingToConceive),
            "first_trimester" => Ok(Stage::FirstTrimester),
            "second_trimester" => Ok(Stage::SecondTrimester),
            "third_trimester" => Ok(Stage::ThirdTrimester),
            "postpartum" => Ok(Stage::Postpartum),
            other => Err(DomainError::InvalidStage(other.to_string())),
        }
    }
}

/// Reporting window for analytics requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "3m")]
    Quarter,
}

impl Period {
    /// Number of calendar days covered by the window
    pub fn days(&self) -> u32 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
            Period::Quarter => 90,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Week => "7d",
            Period::Month => "30d",
            Period::Quarter => "3m",
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Period::Month
    }
}

impl FromStr for Period {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7d" => Ok(Period::Week),
            "30d" => Ok(Period::Month),
            "3m" => Ok(Period::Quarter),
            other => Err(DomainError::InvalidPeriod(other.to_string())),
        }
    }
}

/// Which meal of the day an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl FromStr for MealType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" | "snacks" => Ok(MealType::Snack),
            other => Err(DomainError::Validation {
                message: format!("Unknown meal type: {}", other),
            }),
        }
    }
}
