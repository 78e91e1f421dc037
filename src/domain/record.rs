/// Per-day nutrient totals
///
/// One DailyNutrientRecord exists per user per day that has at least one
/// logged meal. The analytics path reads these; it never writes them.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::domain::DomainError;

/// Summed nutrient amounts for one user on one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyNutrientRecord {
    /// Serialized as YYYY-MM-DD
    pub date: NaiveDate,
    pub total_nutrients: BTreeMap<String, f64>,
}

impl DailyNutrientRecord {
    /// A day with nothing logged yet
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_nutrients: BTreeMap::new(),
        }
    }

    pub fn new(date: NaiveDate, total_nutrients: BTreeMap<String, f64>) -> Self {
        Self {
            date,
            total_nutrients,
        }
    }

    /// Amount of a nutrient on this day; a nutrient that was never logged counts as 0
    pub fn amount(&self, nutrient: &str) -> f64 {
        self.total_nutrients.get(nutrient).copied().unwrap_or(0.0)
    }

    /// Add a meal's nutrients into the day's totals
    ///
    /// Leaves the record untouched and fails if any merged total would stop
    /// being a finite number.
    pub fn add_nutrients(&mut self, nutrients: &BTreeMap<String, f64>) -> Result<(), DomainError> {
        let mut merged = self.total_nutrients.clone();
        for (name, amount) in nutrients {
            let total = merged.entry(name.clone()).or_insert(0.0);
            *total += amount;
            if !total.is_finite() {
                return Err(DomainError::InvalidValue {
                    message: format!("Daily total for '{}' on {} is out of range", name, self.date),
                });
            }
        }

        self.total_nutrients = merged;
        Ok(())
    }

    /// Returns the first nutrient whose total is negative or not finite
    pub fn first_invalid_total(&self) -> Option<(&str, f64)> {
        self.total_nutrients
            .iter()
            .find(|(_, amount)| !amount.is_finite() || **amount < 0.0)
            .map(|(name, amount)| (name.as_str(), *amount))
    }
}
