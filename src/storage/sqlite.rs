/// SQLite implementation of the nutrition storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving profiles, meals and daily totals. It handles all SQL
/// queries and data conversion.

use std::collections::BTreeMap;
use std::path::PathBuf;
use rusqlite::{params, Connection, OptionalExtension};
use chrono::{NaiveDate, Utc};

use crate::domain::{
    DailyNutrientRecord, MealEntry, MealId, MealType, Stage, UserId, UserProfile,
};
use crate::storage::{migrations, NutritionStorage, StorageError};

/// SQLite-based storage implementation
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open (or create) the database file and bring the schema up to date
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Throwaway in-memory database
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open in-memory database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }

    /// Decode a stored daily row, rejecting totals that can't be real intake
    fn decode_daily_record(
        user_id: &UserId,
        date_str: &str,
        totals_json: &str,
    ) -> Result<DailyNutrientRecord, StorageError> {
        let malformed = |reason: String| StorageError::MalformedRecord {
            user_id: user_id.to_string(),
            reason,
        };

        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
            .map_err(|_| malformed(format!("invalid date '{}'", date_str)))?;

        let totals: BTreeMap<String, f64> = serde_json::from_str(totals_json)
            .map_err(|e| malformed(format!("unreadable totals for {}: {}", date, e)))?;

        let record = DailyNutrientRecord::new(date, totals);
        if let Some((name, amount)) = record.first_invalid_total() {
            return Err(malformed(format!("{} total for {} is {}", name, date, amount)));
        }

        Ok(record)
    }

    fn upsert_daily(
        conn: &Connection,
        user_id: &UserId,
        record: &DailyNutrientRecord,
    ) -> Result<(), StorageError> {
        let totals_json = serde_json::to_string(&record.total_nutrients)?;

        conn.execute(
            "INSERT INTO daily_nutrients (user_id, date, total_nutrients, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (user_id, date) DO UPDATE SET
                total_nutrients = excluded.total_nutrients,
                updated_at = excluded.updated_at",
            params![
                user_id.to_string(),
                record.date.to_string(),
                totals_json,
                Utc::now().to_rfc3339()
            ],
        )?;

        Ok(())
    }

    fn read_daily(
        conn: &Connection,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<Option<DailyNutrientRecord>, StorageError> {
        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT date, total_nutrients FROM daily_nutrients
                 WHERE user_id = ?1 AND date = ?2",
                params![user_id.to_string(), date.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        row.map(|(date_str, totals)| Self::decode_daily_record(user_id, &date_str, &totals))
            .transpose()
    }
}

impl NutritionStorage for SqliteStorage {
    fn create_user(&self, profile: &UserProfile) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO users (id, name, stage, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                profile.id.to_string(),
                profile.name,
                profile.stage.as_str(),
                profile.created_at.to_rfc3339()
            ],
        )?;

        tracing::debug!("Created user: {} ({})", profile.name, profile.id);
        Ok(())
    }

    fn get_user(&self, user_id: &UserId) -> Result<UserProfile, StorageError> {
        let row: Option<(String, String, String)> = self
            .conn
            .query_row(
                "SELECT name, stage, created_at FROM users WHERE id = ?1",
                params![user_id.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let (name, stage_str, created_at_str) = row.ok_or_else(|| StorageError::UserNotFound {
            user_id: user_id.to_string(),
        })?;

        let stage: Stage = stage_str.parse().map_err(|_| StorageError::MalformedRecord {
            user_id: user_id.to_string(),
            reason: format!("unknown stage '{}'", stage_str),
        })?;

        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|_| StorageError::MalformedRecord {
                user_id: user_id.to_string(),
                reason: format!("invalid created_at '{}'", created_at_str),
            })?
            .with_timezone(&Utc);

        Ok(UserProfile::from_existing(user_id.clone(), name, stage, created_at))
    }

    fn create_meal(&self, meal: &MealEntry) -> Result<DailyNutrientRecord, StorageError> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO meal_entries (
                id, user_id, logged_at, consumed_on, meal_type, description, nutrients
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                meal.id.to_string(),
                meal.user_id.to_string(),
                meal.logged_at.to_rfc3339(),
                meal.consumed_on.to_string(),
                meal.meal_type.as_str(),
                meal.description,
                serde_json::to_string(&meal.nutrients)?
            ],
        )?;

        let mut daily = Self::read_daily(&tx, &meal.user_id, meal.consumed_on)?
            .unwrap_or_else(|| DailyNutrientRecord::empty(meal.consumed_on));
        // Dropping `tx` on error rolls back the meal insert
        daily.add_nutrients(&meal.nutrients)?;
        Self::upsert_daily(&tx, &meal.user_id, &daily)?;

        tx.commit()?;

        tracing::debug!(
            "Logged {} for user {} on {}",
            meal.meal_type.as_str(),
            meal.user_id,
            meal.consumed_on
        );
        Ok(daily)
    }

    fn get_meals_for_day(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<Vec<MealEntry>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, logged_at, meal_type, description, nutrients
             FROM meal_entries
             WHERE user_id = ?1 AND consumed_on = ?2
             ORDER BY logged_at ASC",
        )?;

        let rows = stmt
            .query_map(params![user_id.to_string(), date.to_string()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let malformed = |reason: String| StorageError::MalformedRecord {
            user_id: user_id.to_string(),
            reason,
        };

        let mut meals = Vec::with_capacity(rows.len());
        for (id_str, logged_at_str, meal_type_str, description, nutrients_json) in rows {
            let id = MealId::from_string(&id_str)
                .map_err(|_| malformed(format!("invalid meal id '{}'", id_str)))?;
            let logged_at = chrono::DateTime::parse_from_rfc3339(&logged_at_str)
                .map_err(|_| malformed(format!("invalid logged_at '{}'", logged_at_str)))?
                .with_timezone(&Utc);
            let meal_type: MealType = meal_type_str
                .parse()
                .map_err(|_| malformed(format!("unknown meal type '{}'", meal_type_str)))?;
            let nutrients: BTreeMap<String, f64> = serde_json::from_str(&nutrients_json)
                .map_err(|e| malformed(format!("unreadable meal nutrients: {}", e)))?;

            meals.push(MealEntry::from_existing(
                id,
                user_id.clone(),
                logged_at,
                date,
                meal_type,
                description,
                nutrients,
            ));
        }

        Ok(meals)
    }

    fn put_daily_record(
        &self,
        user_id: &UserId,
        record: &DailyNutrientRecord,
    ) -> Result<(), StorageError> {
        Self::upsert_daily(&self.conn, user_id, record)?;
        tracing::debug!("Stored daily totals for user {} on {}", user_id, record.date);
        Ok(())
    }

    fn get_daily_record(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<Option<DailyNutrientRecord>, StorageError> {
        Self::read_daily(&self.conn, user_id, date)
    }

    fn get_recent_daily_records(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<DailyNutrientRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT date, total_nutrients FROM daily_nutrients
             WHERE user_id = ?1
             ORDER BY date DESC
             LIMIT ?2",
        )?;

        let rows = stmt
            .query_map(params![user_id.to_string(), limit], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.iter()
            .map(|(date_str, totals)| Self::decode_daily_record(user_id, date_str, totals))
            .collect()
    }

    fn ping(&self) -> Result<(), StorageError> {
        self.conn.query_row("SELECT 1", [], |row| row.get::<_, i32>(0))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn record(d: u32, iron: f64) -> DailyNutrientRecord {
        let mut totals = BTreeMap::new();
        totals.insert("iron".to_string(), iron);
        DailyNutrientRecord::new(day(d), totals)
    }

    fn storage_with_user() -> (SqliteStorage, UserProfile) {
        let storage = SqliteStorage::in_memory().unwrap();
        let profile = UserProfile::new("Test".to_string(), Stage::FirstTrimester).unwrap();
        storage.create_user(&profile).unwrap();
        (storage, profile)
    }

    #[test]
    fn test_get_missing_user() {
        let storage = SqliteStorage::in_memory().unwrap();
        let result = storage.get_user(&UserId::new());
        assert!(matches!(result, Err(StorageError::UserNotFound { .. })));
    }

    #[test]
    fn test_user_round_trip() {
        let (storage, profile) = storage_with_user();
        let loaded = storage.get_user(&profile.id).unwrap();
        assert_eq!(loaded.name, "Test");
        assert_eq!(loaded.stage, Stage::FirstTrimester);
    }

    #[test]
    fn test_recent_records_newest_first_and_limited() {
        let (storage, profile) = storage_with_user();
        for d in [3, 1, 5, 2, 4] {
            storage.put_daily_record(&profile.id, &record(d, d as f64)).unwrap();
        }

        let recent = storage.get_recent_daily_records(&profile.id, 3).unwrap();
        let dates: Vec<NaiveDate> = recent.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(5), day(4), day(3)]);
    }

    #[test]
    fn test_meals_accumulate_into_daily_totals() {
        let (storage, profile) = storage_with_user();
        let mut nutrients = BTreeMap::new();
        nutrients.insert("iron".to_string(), 3.0);

        let first = MealEntry::new(profile.id.clone(), MealType::Breakfast, None, nutrients.clone()).unwrap();
        let second = MealEntry::new(profile.id.clone(), MealType::Dinner, None, nutrients).unwrap();
        storage.create_meal(&first).unwrap();
        let daily = storage.create_meal(&second).unwrap();

        assert_eq!(daily.amount("iron"), 6.0);
        let meals = storage.get_meals_for_day(&profile.id, first.consumed_on).unwrap();
        assert_eq!(meals.len(), 2);
    }

    #[test]
    fn test_overflowing_daily_total_is_rejected_and_rolled_back() {
        let (storage, profile) = storage_with_user();
        let mut huge = BTreeMap::new();
        huge.insert("calories".to_string(), 1e308);

        let first = MealEntry::new(profile.id.clone(), MealType::Lunch, None, huge.clone()).unwrap();
        storage.create_meal(&first).unwrap();

        let second = MealEntry::new(profile.id.clone(), MealType::Dinner, None, huge).unwrap();
        let result = storage.create_meal(&second);
        assert!(matches!(result, Err(StorageError::Rejected(_))));

        // Only the first meal was kept and the day still decodes
        let meals = storage.get_meals_for_day(&profile.id, first.consumed_on).unwrap();
        assert_eq!(meals.len(), 1);
        let daily = storage.get_daily_record(&profile.id, first.consumed_on).unwrap().unwrap();
        assert_eq!(daily.amount("calories"), 1e308);

        let mut iron = BTreeMap::new();
        iron.insert("iron".to_string(), 5.0);
        let third = MealEntry::new(profile.id.clone(), MealType::Snack, None, iron).unwrap();
        assert_eq!(storage.create_meal(&third).unwrap().amount("iron"), 5.0);
    }

    #[test]
    fn test_negative_stored_total_is_malformed() {
        let (storage, profile) = storage_with_user();
        storage.put_daily_record(&profile.id, &record(1, -4.0)).unwrap();

        let result = storage.get_recent_daily_records(&profile.id, 7);
        assert!(matches!(result, Err(StorageError::MalformedRecord { .. })));
    }
}
