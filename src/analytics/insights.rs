/// Insight generation
///
/// Turns the computed streak, week-over-week change and target attainment
/// into short messages for the dashboard.

use serde::{Deserialize, Serialize};

/// Upper bound on insights returned per request
pub const MAX_INSIGHTS: usize = 3;

/// Streak length that earns a success insight
pub const STREAK_THRESHOLD: u32 = 3;

/// Week-over-week change (percent) beyond which a trend is reported
pub const CHANGE_THRESHOLD: f64 = 10.0;

/// Attainment (percent of target) below which a recommendation is made
pub const LOW_ATTAINMENT_THRESHOLD: u32 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Success,
    Improvement,
    Attention,
    Recommendation,
}

impl InsightKind {
    /// Accent color the app renders the insight card with
    pub fn color(&self) -> &'static str {
        match self {
            InsightKind::Success => "#10B981",
            InsightKind::Improvement => "#3B82F6",
            InsightKind::Attention => "#F59E0B",
            InsightKind::Recommendation => "#8B5CF6",
        }
    }
}

/// A derived message about the user's recent intake. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub color: String,
}

impl Insight {
    fn new(kind: InsightKind, title: String, description: String) -> Self {
        Self {
            kind,
            title,
            description,
            color: kind.color().to_string(),
        }
    }
}

/// Display label for a nutrient key ("vitaminD" -> "Vitamin D")
pub fn nutrient_label(nutrient: &str) -> String {
    match nutrient {
        "vitaminD" => "Vitamin D".to_string(),
        "vitaminB12" => "Vitamin B12".to_string(),
        "dha" => "DHA".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

fn food_suggestions(nutrient: &str) -> &'static str {
    match nutrient {
        "iron" => "lean red meat, lentils, spinach or iron-fortified cereal",
        "folate" => "leafy greens, beans, citrus fruit or fortified grains",
        "calcium" => "yogurt, cheese, fortified plant milk or tofu",
        "protein" => "eggs, poultry, beans, Greek yogurt or nuts",
        "vitaminD" => "fortified milk, eggs or low-mercury fatty fish",
        "dha" => "salmon, sardines or an algae-based supplement",
        "fiber" => "whole grains, berries, beans or vegetables",
        "choline" => "eggs, chicken, soybeans or broccoli",
        "iodine" => "dairy, eggs or iodized salt",
        "vitaminB12" => "dairy, eggs, fish or fortified nutritional yeast",
        "calories" => "an extra balanced snack between meals",
        _ => "foods rich in this nutrient",
    }
}

/// Build the insight list in priority order: streak, trend up, trend
/// down, low attainment. Truncated to `MAX_INSIGHTS`.
pub fn generate_insights(
    nutrient: &str,
    streak: u32,
    change: f64,
    target_percentage: u32,
) -> Vec<Insight> {
    let label = nutrient_label(nutrient);
    let mut insights = Vec::new();

    if streak >= STREAK_THRESHOLD {
        insights.push(Insight::new(
            InsightKind::Success,
            format!("{}-Day Streak!", streak),
            format!(
                "You've met your {} target {} days in a row. Keep it going!",
                label, streak
            ),
        ));
    }

    if change > CHANGE_THRESHOLD {
        insights.push(Insight::new(
            InsightKind::Improvement,
            format!("{} Trending Up", label),
            format!(
                "Your average {} intake is up {}% compared with the previous week.",
                label,
                change.round()
            ),
        ));
    } else if change < -CHANGE_THRESHOLD {
        insights.push(Insight::new(
            InsightKind::Attention,
            format!("{} Dropping", label),
            format!(
                "Your average {} intake is down {}% compared with the previous week.",
                label,
                change.abs().round()
            ),
        ));
    }

    if target_percentage < LOW_ATTAINMENT_THRESHOLD {
        insights.push(Insight::new(
            InsightKind::Recommendation,
            format!("Boost Your {}", label),
            format!(
                "You're averaging {}% of your daily {} target. Try adding {}.",
                target_percentage,
                label,
                food_suggestions(nutrient)
            ),
        ));
    }

    insights.truncate(MAX_INSIGHTS);
    insights
}
