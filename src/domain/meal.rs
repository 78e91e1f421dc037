/// MealEntry entity for logged meals
///
/// Each logged meal carries its own nutrient breakdown. Meals are folded
/// into the day's DailyNutrientRecord when they are stored.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use crate::domain::{DomainError, MealId, MealType, UserId};

const MAX_NUTRIENT_NAME_LEN: usize = 50;
const MAX_DESCRIPTION_LEN: usize = 500;

/// A single meal logged by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealEntry {
    pub id: MealId,
    pub user_id: UserId,
    /// When the meal was logged
    pub logged_at: DateTime<Utc>,
    /// Which day the meal counts towards
    pub consumed_on: NaiveDate,
    pub meal_type: MealType,
    pub description: Option<String>,
    /// Nutrient name -> amount in that nutrient's unit
    pub nutrients: BTreeMap<String, f64>,
}

impl MealEntry {
    /// Create a meal for today with validation
    ///
    /// Meals are always logged against the current UTC day; past days are
    /// closed once they end.
    pub fn new(
        user_id: UserId,
        meal_type: MealType,
        description: Option<String>,
        nutrients: BTreeMap<String, f64>,
    ) -> Result<Self, DomainError> {
        Self::validate_description(&description)?;
        let nutrients = normalize_nutrients(nutrients);
        validate_nutrients(&nutrients)?;

        let logged_at = Utc::now();

        Ok(Self {
            id: MealId::new(),
            user_id,
            logged_at,
            consumed_on: logged_at.date_naive(),
            meal_type,
            description: description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            nutrients,
        })
    }

    /// Create a meal from existing data (used when loading from database)
    pub fn from_existing(
        id: MealId,
        user_id: UserId,
        logged_at: DateTime<Utc>,
        consumed_on: NaiveDate,
        meal_type: MealType,
        description: Option<String>,
        nutrients: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            id,
            user_id,
            logged_at,
            consumed_on,
            meal_type,
            description,
            nutrients,
        }
    }

    fn validate_description(description: &Option<String>) -> Result<(), DomainError> {
        if let Some(desc) = description {
            if desc.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(DomainError::Validation {
                    message: "Description cannot be longer than 500 characters".to_string()
                });
            }
        }
        Ok(())
    }
}

/// Trim nutrient names so " iron " and "iron" land on the same key,
/// summing amounts that collapse together
pub fn normalize_nutrients(nutrients: BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    let mut normalized = BTreeMap::new();
    for (name, amount) in nutrients {
        *normalized.entry(name.trim().to_string()).or_insert(0.0) += amount;
    }
    normalized
}

/// Validate a nutrient breakdown: at least one entry, sane names, finite
/// non-negative amounts
pub fn validate_nutrients(nutrients: &BTreeMap<String, f64>) -> Result<(), DomainError> {
    if nutrients.is_empty() {
        return Err(DomainError::InvalidValue {
            message: "At least one nutrient amount is required".to_string()
        });
    }

    for (name, amount) in nutrients {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_NUTRIENT_NAME_LEN {
            return Err(DomainError::InvalidValue {
                message: format!("Invalid nutrient name: '{}'", name)
            });
        }
        if !amount.is_finite() || *amount < 0.0 {
            return Err(DomainError::InvalidValue {
                message: format!("Amount for '{}' must be a non-negative number", name)
            });
        }
    }

    Ok(())
}
