/// Meal logging operation
///
/// Stores a meal for today and folds its nutrients into today's totals.

use std::collections::BTreeMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{DailyNutrientRecord, MealEntry, MealType};
use crate::storage::NutritionStorage;
use crate::tools::{require_user_id, ToolError};

/// Parameters for logging a meal
#[derive(Debug, Default, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogMealParams {
    /// ID of the user logging the meal
    pub user_id: Option<String>,
    /// breakfast, lunch, dinner or snack
    pub meal_type: Option<String>,
    /// Free text description of what was eaten
    pub description: Option<String>,
    /// Nutrient amounts in this meal, e.g. {"iron": 4.2, "protein": 18}
    pub nutrients: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMealResponse {
    pub meal: MealEntry,
    /// Today's totals after adding this meal
    pub daily: DailyNutrientRecord,
}

/// Log a meal using the provided storage
pub fn log_meal<S: NutritionStorage>(
    storage: &S,
    params: LogMealParams,
) -> Result<LogMealResponse, ToolError> {
    let user_id = require_user_id(params.user_id.as_deref())?;

    let meal_type: MealType = params
        .meal_type
        .as_deref()
        .ok_or_else(|| ToolError::BadRequest("mealType is required".to_string()))?
        .parse()?;

    let nutrients = params
        .nutrients
        .ok_or_else(|| ToolError::BadRequest("nutrients is required".to_string()))?;

    // Verify the user exists before touching meal rows
    storage.get_user(&user_id)?;

    let meal = MealEntry::new(user_id, meal_type, params.description, nutrients)?;
    let daily = storage.create_meal(&meal)?;

    tracing::info!(
        "Logged {} for user {} ({} nutrients)",
        meal.meal_type.as_str(),
        meal.user_id,
        meal.nutrients.len()
    );

    Ok(LogMealResponse { meal, daily })
}
