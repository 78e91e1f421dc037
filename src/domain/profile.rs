/// UserProfile entity created during onboarding
///
/// A profile is the minimum the analytics path needs to know about a user:
/// who they are and which stage of pregnancy or postpartum they are in.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::domain::{DomainError, Stage, UserId};

/// A registered user of the tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    /// Display name chosen during onboarding
    pub name: String,
    /// Current stage, drives nutrient targets
    pub stage: Stage,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a new profile with validation
    pub fn new(name: String, stage: Stage) -> Result<Self, DomainError> {
        Self::validate_name(&name)?;

        Ok(Self {
            id: UserId::new(),
            name: name.trim().to_string(),
            stage,
            created_at: Utc::now(),
        })
    }

    /// Create a profile from existing data (used when loading from database)
    pub fn from_existing(
        id: UserId,
        name: String,
        stage: Stage,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            stage,
            created_at,
        }
    }

    fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidName(
                "Name cannot be empty".to_string()
            ));
        }

        if trimmed.chars().count() > 100 {
            return Err(DomainError::InvalidName(
                "Name cannot be longer than 100 characters".to_string()
            ));
        }

        Ok(())
    }
}
