/// Basic integration tests against a file-backed database
use nutrition_tracker::tools::{self, AnalyticsParams};
use nutrition_tracker::*;
use std::collections::BTreeMap;
use tempfile::NamedTempFile;

fn daily(date: &str, iron: f64) -> DailyNutrientRecord {
    let mut totals = BTreeMap::new();
    totals.insert("iron".to_string(), iron);
    DailyNutrientRecord::new(date.parse().unwrap(), totals)
}

#[tokio::test]
async fn test_database_persistence() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_file.path().to_path_buf();

    let profile = UserProfile::new("Persisted".to_string(), Stage::ThirdTrimester).unwrap();
    {
        let server = NutritionTrackerServer::new(db_path.clone())
            .await
            .expect("Failed to create first server");
        server.storage().create_user(&profile).unwrap();
        server
            .storage()
            .put_daily_record(&profile.id, &daily("2024-06-01", 30.0))
            .unwrap();
    }

    // Reopen the same file
    let server = NutritionTrackerServer::new(db_path)
        .await
        .expect("Failed to create second server");
    let loaded = server.storage().get_user(&profile.id).unwrap();
    assert_eq!(loaded.stage, Stage::ThirdTrimester);

    let records = server.storage().get_recent_daily_records(&profile.id, 7).unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_analytics_over_stored_history() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let server = NutritionTrackerServer::new(temp_file.path().to_path_buf())
        .await
        .expect("Failed to create server");

    // Third trimester iron target is 27
    let profile = UserProfile::new("History".to_string(), Stage::ThirdTrimester).unwrap();
    server.storage().create_user(&profile).unwrap();
    for day in 1..=20 {
        let amount = if day > 16 { 30.0 } else { 20.0 };
        let date = format!("2024-04-{:02}", day);
        server.storage().put_daily_record(&profile.id, &daily(&date, amount)).unwrap();
    }

    let result = tools::get_nutrition_analytics(
        server.storage(),
        server.analytics(),
        AnalyticsParams {
            user_id: Some(profile.id.to_string()),
            period: Some("7d".to_string()),
            nutrient: None,
        },
    )
    .unwrap();

    // Only the 7 most recent days are fetched for a 7d window
    assert_eq!(result.data.len(), 7);
    assert_eq!(result.data.first().unwrap().date, "2024-04-14");
    assert_eq!(result.data.last().unwrap().date, "2024-04-20");
    assert_eq!(result.streak, 4);
    assert_eq!(result.target, 27.0);
    // 3 x 20 + 4 x 30 = 180 / 7
    assert_eq!(result.average, 25.71);
    assert_eq!(result.target_percentage, 95);
    // No earlier window inside the fetched period
    assert_eq!(result.change, 0.0);
}

#[test]
fn test_storage_interface() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let storage = SqliteStorage::new(temp_file.path().to_path_buf())
        .expect("Failed to create storage");

    let _: &dyn NutritionStorage = &storage;
    assert!(storage.ping().is_ok());
}
