/// Profile creation (the data side of onboarding)

use schemars::JsonSchema;
use serde::Deserialize;

use crate::domain::{Stage, UserProfile};
use crate::storage::NutritionStorage;
use crate::tools::ToolError;

/// Parameters for creating a profile
#[derive(Debug, Default, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileParams {
    /// Display name
    pub name: Option<String>,
    /// trying_to_conceive, first_trimester, second_trimester, third_trimester or postpartum
    pub stage: Option<String>,
}

pub fn create_profile<S: NutritionStorage>(
    storage: &S,
    params: CreateProfileParams,
) -> Result<UserProfile, ToolError> {
    let name = params
        .name
        .ok_or_else(|| ToolError::BadRequest("name is required".to_string()))?;
    let stage: Stage = params
        .stage
        .as_deref()
        .ok_or_else(|| ToolError::BadRequest("stage is required".to_string()))?
        .parse()?;

    let profile = UserProfile::new(name, stage)?;
    storage.create_user(&profile)?;

    tracing::info!("Created profile {} ({})", profile.id, stage.display_name());
    Ok(profile)
}
