/// Nutrient analytics operation
///
/// Validates the query, loads the user's profile and recent daily totals,
/// and hands them to the analytics engine.

use schemars::JsonSchema;
use serde::Deserialize;

use crate::analytics::{AnalyticsEngine, AnalyticsResult, DEFAULT_NUTRIENT};
use crate::domain::{DailyNutrientRecord, Period, UserId, UserProfile};
use crate::storage::NutritionStorage;
use crate::tools::{require_user_id, ToolError};

/// Raw analytics query (HTTP query string or MCP tool arguments)
#[derive(Debug, Default, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsParams {
    /// ID of the user to analyse
    pub user_id: Option<String>,
    /// Reporting window: 7d, 30d or 3m (defaults to 30d)
    pub period: Option<String>,
    /// Nutrient key such as iron, folate or calcium (defaults to iron)
    pub nutrient: Option<String>,
}

/// Validated analytics query
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsRequest {
    pub user_id: UserId,
    pub period: Period,
    pub nutrient: String,
}

impl AnalyticsParams {
    pub fn validate(self) -> Result<AnalyticsRequest, ToolError> {
        let user_id = require_user_id(self.user_id.as_deref())?;

        let period = match self.period.as_deref().map(str::trim) {
            None | Some("") => Period::default(),
            Some(raw) => raw.parse()?,
        };

        let nutrient = self
            .nutrient
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_NUTRIENT.to_string());

        Ok(AnalyticsRequest {
            user_id,
            period,
            nutrient,
        })
    }
}

/// Fetch the profile and up to `period` most recent daily records (newest first)
pub fn load_analytics_input<S: NutritionStorage>(
    storage: &S,
    request: &AnalyticsRequest,
) -> Result<(UserProfile, Vec<DailyNutrientRecord>), ToolError> {
    let user = storage.get_user(&request.user_id)?;
    let records = storage.get_recent_daily_records(&request.user_id, request.period.days())?;
    Ok((user, records))
}

/// Validate, load and analyse in one call
pub fn get_nutrition_analytics<S: NutritionStorage>(
    storage: &S,
    engine: &AnalyticsEngine,
    params: AnalyticsParams,
) -> Result<AnalyticsResult, ToolError> {
    let request = params.validate()?;
    let (user, records) = load_analytics_input(storage, &request)?;
    Ok(engine.analyze(&user, request.period, &request.nutrient, &records))
}
