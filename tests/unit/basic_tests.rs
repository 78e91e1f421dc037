/// Basic unit tests for the public API
use nutrition_tracker::*;
use std::collections::BTreeMap;

fn iron_days(values: &[f64]) -> Vec<DailyNutrientRecord> {
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let mut totals = BTreeMap::new();
            totals.insert("iron".to_string(), *v);
            DailyNutrientRecord::new(start + chrono::Duration::days(i as i64), totals)
        })
        .collect()
}

#[test]
fn test_profile_creation() {
    let profile = UserProfile::new("Ada".to_string(), Stage::FirstTrimester).unwrap();
    assert_eq!(profile.name, "Ada");
    assert_eq!(profile.stage, Stage::FirstTrimester);

    assert!(UserProfile::new("   ".to_string(), Stage::Postpartum).is_err());
}

#[test]
fn test_meal_creation_validates_nutrients() {
    let user_id = UserId::new();

    let mut nutrients = BTreeMap::new();
    nutrients.insert("iron".to_string(), 3.5);
    let meal = MealEntry::new(user_id.clone(), MealType::Dinner, None, nutrients).unwrap();
    assert_eq!(meal.user_id, user_id);
    assert_eq!(meal.consumed_on, chrono::Utc::now().date_naive());

    let mut bad = BTreeMap::new();
    bad.insert("iron".to_string(), f64::NAN);
    assert!(MealEntry::new(user_id, MealType::Snack, None, bad).is_err());
}

#[test]
fn test_period_parsing() {
    assert_eq!("7d".parse::<Period>().unwrap(), Period::Week);
    assert_eq!("3m".parse::<Period>().unwrap(), Period::Quarter);
    assert_eq!(Period::default(), Period::Month);
    assert!("2w".parse::<Period>().is_err());
}

#[test]
fn test_targets_depend_on_stage() {
    assert_eq!(nutrient_target(Stage::TryingToConceive, "iron"), Some(18.0));
    assert_eq!(nutrient_target(Stage::SecondTrimester, "iron"), Some(27.0));
    assert_eq!(nutrient_target(Stage::Postpartum, "iron"), Some(9.0));
    assert_eq!(nutrient_target(Stage::Postpartum, "unobtainium"), None);
}

#[test]
fn test_engine_summary_properties() {
    let engine = AnalyticsEngine::new();
    let user = UserProfile::new("Props".to_string(), Stage::ThirdTrimester).unwrap();

    let history = [10.0, 40.0, 12.0, 30.0, 28.0, 27.0, 5.0, 27.0, 29.0, 31.0];
    let result = engine.analyze(&user, Period::Month, "iron", &iron_days(&history));

    assert_eq!(result.data.len(), history.len());
    assert!(result.data.windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(result.streak, 3);
    assert!(result.insights.len() <= 3);
    assert_eq!(result.insights[0].kind, InsightKind::Success);
}

#[test]
fn test_insight_cap() {
    // Every rule fires, only three survive
    let insights = generate_insights("iron", 5, -40.0, 20);
    assert_eq!(insights.len(), 3);
    assert_eq!(insights[0].kind, InsightKind::Success);
    assert_eq!(insights[1].kind, InsightKind::Attention);
    assert_eq!(insights[2].kind, InsightKind::Recommendation);
}

#[test]
fn test_empty_history() {
    let engine = AnalyticsEngine::new();
    let user = UserProfile::new("New".to_string(), Stage::FirstTrimester).unwrap();
    let result = engine.analyze(&user, Period::Week, "iron", &[]);

    assert!(result.data.is_empty());
    assert_eq!(result.average, 0.0);
    assert_eq!(result.change, 0.0);
    assert_eq!(result.streak, 0);
    assert_eq!(result.target_percentage, 0);
}

#[test]
fn test_server_opens_database() {
    let temp_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let server = tokio_test::block_on(NutritionTrackerServer::new(temp_file.path().to_path_buf()))
        .expect("Failed to create server");
    assert!(server.storage().ping().is_ok());
}
