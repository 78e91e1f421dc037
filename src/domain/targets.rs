/// Recommended daily nutrient amounts by stage
///
/// Static lookup table. Columns follow `Stage` order: trying to conceive,
/// first, second and third trimester, postpartum.

use crate::domain::Stage;

/// (nutrient key, [ttc, t1, t2, t3, postpartum])
const TARGETS: &[(&str, [f64; 5])] = &[
    ("iron", [18.0, 27.0, 27.0, 27.0, 9.0]),
    ("folate", [400.0, 600.0, 600.0, 600.0, 500.0]),
    ("calcium", [1000.0, 1000.0, 1000.0, 1000.0, 1000.0]),
    ("protein", [46.0, 71.0, 71.0, 71.0, 71.0]),
    ("vitaminD", [600.0, 600.0, 600.0, 600.0, 600.0]),
    ("dha", [200.0, 300.0, 300.0, 300.0, 300.0]),
    ("fiber", [25.0, 28.0, 28.0, 28.0, 29.0]),
    ("choline", [425.0, 450.0, 450.0, 450.0, 550.0]),
    ("iodine", [150.0, 220.0, 220.0, 220.0, 290.0]),
    ("vitaminB12", [2.4, 2.6, 2.6, 2.6, 2.8]),
    ("calories", [2000.0, 2000.0, 2340.0, 2450.0, 2330.0]),
];

/// Target used when a nutrient has no table entry, keeps percentages finite
pub const FALLBACK_TARGET: f64 = 1.0;

fn column(stage: Stage) -> usize {
    match stage {
        Stage::TryingToConceive => 0,
        Stage::FirstTrimester => 1,
        Stage::SecondTrimester => 2,
        Stage::ThirdTrimester => 3,
        Stage::Postpartum => 4,
    }
}

/// Look up the recommended daily amount of `nutrient` for `stage`
pub fn nutrient_target(stage: Stage, nutrient: &str) -> Option<f64> {
    TARGETS
        .iter()
        .find(|(key, _)| *key == nutrient)
        .map(|(_, row)| row[column(stage)])
}

/// Like `nutrient_target` but falls back to `FALLBACK_TARGET`
pub fn target_or_default(stage: Stage, nutrient: &str) -> f64 {
    nutrient_target(stage, nutrient).unwrap_or(FALLBACK_TARGET)
}

/// All nutrient keys that have targets
pub fn known_nutrients() -> impl Iterator<Item = &'static str> {
    TARGETS.iter().map(|(key, _)| *key)
}
