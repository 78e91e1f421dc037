/// Analytics engine for nutrient trends
///
/// This module turns a user's daily nutrient totals into the dashboard
/// summary: chronological series, trailing average, week-over-week change,
/// target attainment, the current streak and insights.

pub mod insights;

pub use insights::{generate_insights, nutrient_label, Insight, InsightKind};

use serde::{Deserialize, Serialize};
use crate::domain::{target_or_default, DailyNutrientRecord, Period, UserProfile};

/// Number of most recent entries in the "current" comparison window
pub const TREND_WINDOW: usize = 7;

/// Nutrient analysed when the request doesn't name one
pub const DEFAULT_NUTRIENT: &str = "iron";

/// One point of the series shown on the chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// YYYY-MM-DD
    pub date: String,
    pub value: f64,
}

/// Full analytics response payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResult {
    pub user_id: String,
    pub period: Period,
    pub nutrient: String,
    /// Ascending by date
    pub data: Vec<DataPoint>,
    /// Mean of the current window, 2 decimals
    pub average: f64,
    pub target: f64,
    pub target_percentage: u32,
    pub streak: u32,
    /// Percent change vs the previous window, 1 decimal
    pub change: f64,
    pub insights: Vec<Insight>,
}

/// Averages of the current window and the one before it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowAverages {
    pub current: f64,
    pub previous: f64,
}

/// Analytics engine for processing nutrient data
///
/// Stateless: every call computes from the records it is handed.
#[derive(Debug, Default, Clone)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    /// Create a new analytics engine
    pub fn new() -> Self {
        Self {}
    }

    /// Compute the analytics summary for `user`
    ///
    /// `records` may arrive in any order (storage returns newest first);
    /// the series is always emitted oldest first.
    pub fn analyze(
        &self,
        user: &UserProfile,
        period: Period,
        nutrient: &str,
        records: &[DailyNutrientRecord],
    ) -> AnalyticsResult {
        let data = Self::chronological_series(records, nutrient);
        let values: Vec<f64> = data.iter().map(|p| p.value).collect();

        let averages = Self::window_averages(&values);
        let change = Self::percent_change(averages.current, averages.previous);
        let target = target_or_default(user.stage, nutrient);
        let target_percentage = Self::target_percentage(averages.current, target);
        let streak = Self::trailing_streak(&values, target);

        tracing::debug!(
            "Analytics for {} ({}): {} days, avg {:.2}, target {}, streak {}",
            user.id,
            nutrient,
            data.len(),
            averages.current,
            target,
            streak
        );

        AnalyticsResult {
            user_id: user.id.to_string(),
            period,
            nutrient: nutrient.to_string(),
            data,
            average: round_to(averages.current, 2),
            target,
            target_percentage,
            streak,
            change,
            insights: generate_insights(nutrient, streak, change, target_percentage),
        }
    }

    /// Extract `{date, value}` pairs sorted ascending by date
    pub fn chronological_series(records: &[DailyNutrientRecord], nutrient: &str) -> Vec<DataPoint> {
        let mut sorted: Vec<&DailyNutrientRecord> = records.iter().collect();
        sorted.sort_by_key(|r| r.date);

        sorted
            .into_iter()
            .map(|r| DataPoint {
                date: r.date.format("%Y-%m-%d").to_string(),
                value: r.amount(nutrient),
            })
            .collect()
    }

    /// Mean of the last `TREND_WINDOW` values and of the window before it
    ///
    /// Without earlier history the previous average equals the current one,
    /// so a brand-new user reports no change instead of a huge swing.
    pub fn window_averages(values: &[f64]) -> WindowAverages {
        let split = values.len().saturating_sub(TREND_WINDOW);
        let current_window = &values[split..];
        let previous_window = &values[split.saturating_sub(TREND_WINDOW)..split];

        let current = mean(current_window).unwrap_or(0.0);
        let previous = mean(previous_window).unwrap_or(current);

        WindowAverages { current, previous }
    }

    /// Percent change from `previous` to `current`, 1 decimal; 0 when
    /// there is no positive baseline
    pub fn percent_change(current: f64, previous: f64) -> f64 {
        if previous > 0.0 {
            round_to((current - previous) / previous * 100.0, 1)
        } else {
            0.0
        }
    }

    /// Average as a whole-number percentage of target
    pub fn target_percentage(average: f64, target: f64) -> u32 {
        if target <= 0.0 || !average.is_finite() {
            return 0;
        }
        (average / target * 100.0).round().max(0.0) as u32
    }

    /// Consecutive days at or above target, counted back from the latest day
    pub fn trailing_streak(values: &[f64], target: f64) -> u32 {
        values.iter().rev().take_while(|v| **v >= target).count() as u32
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
