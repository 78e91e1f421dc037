/// Domain module containing core business logic and data types
///
/// This module defines the core entities (UserProfile, MealEntry,
/// DailyNutrientRecord) together with the stage-based nutrient targets and
/// their validation rules.

pub mod profile;
pub mod meal;
pub mod record;
pub mod targets;
pub mod types;

// Re-export public types for easy access
pub use profile::*;
pub use meal::*;
pub use record::*;
pub use targets::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid stage: {0}")]
    InvalidStage(String),

    #[error("Invalid period: {0} (expected 7d, 30d or 3m)")]
    InvalidPeriod(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}
