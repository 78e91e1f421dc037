/// Storage layer for persisting nutrition data
///
/// This module handles all database operations using SQLite. It provides
/// a clean interface for storing and retrieving profiles, meals and the
/// per-day nutrient totals the analytics path reads.

pub mod sqlite;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;

use chrono::NaiveDate;
use thiserror::Error;
use crate::domain::{DailyNutrientRecord, DomainError, MealEntry, UserId, UserProfile};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: String },

    #[error("Malformed record for user {user_id}: {reason}")]
    MalformedRecord { user_id: String, reason: String },

    #[error("Rejected write: {0}")]
    Rejected(#[from] DomainError),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface
///
/// Analytics only needs `get_user` and `get_recent_daily_records`; the
/// remaining methods back onboarding and meal logging.
pub trait NutritionStorage {
    /// Create a new user profile
    fn create_user(&self, profile: &UserProfile) -> Result<(), StorageError>;

    /// Get a user profile by ID
    fn get_user(&self, user_id: &UserId) -> Result<UserProfile, StorageError>;

    /// Store a meal and add its nutrients into that day's totals.
    /// Returns the updated daily record.
    fn create_meal(&self, meal: &MealEntry) -> Result<DailyNutrientRecord, StorageError>;

    /// Get the meals a user logged on a given day, oldest first
    fn get_meals_for_day(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<Vec<MealEntry>, StorageError>;

    /// Insert or replace a whole daily record (imports and seeding)
    fn put_daily_record(
        &self,
        user_id: &UserId,
        record: &DailyNutrientRecord,
    ) -> Result<(), StorageError>;

    /// Get the record for one day, if anything was logged
    fn get_daily_record(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<Option<DailyNutrientRecord>, StorageError>;

    /// Get up to `limit` most recent daily records, newest first
    fn get_recent_daily_records(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<DailyNutrientRecord>, StorageError>;

    /// Cheap connectivity probe used by the health endpoint
    fn ping(&self) -> Result<(), StorageError>;
}
