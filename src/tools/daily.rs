/// Daily totals lookup

use chrono::{NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{DailyNutrientRecord, DomainError, MealEntry};
use crate::storage::NutritionStorage;
use crate::tools::{require_user_id, ToolError};

#[derive(Debug, Default, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotalsParams {
    pub user_id: Option<String>,
    /// YYYY-MM-DD, defaults to today (UTC)
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotalsResponse {
    #[serde(flatten)]
    pub record: DailyNutrientRecord,
    pub meals: Vec<MealEntry>,
}

/// Totals and meals for one day; empty totals when nothing was logged
pub fn get_daily_totals<S: NutritionStorage>(
    storage: &S,
    params: DailyTotalsParams,
) -> Result<DailyTotalsResponse, ToolError> {
    let user_id = require_user_id(params.user_id.as_deref())?;

    let date = match params.date.as_deref().map(str::trim) {
        None | Some("") => Utc::now().date_naive(),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| DomainError::InvalidDate(format!("'{}', expected YYYY-MM-DD", raw)))?,
    };

    storage.get_user(&user_id)?;

    let record = storage
        .get_daily_record(&user_id, date)?
        .unwrap_or_else(|| DailyNutrientRecord::empty(date));
    let meals = storage.get_meals_for_day(&user_id, date)?;

    Ok(DailyTotalsResponse { record, meals })
}
