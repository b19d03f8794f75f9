//! Basal metabolic rate and maintenance calorie estimates.
//!
//! BMR follows Mifflin-St Jeor:
//! - Men: `10·kg + 6.25·cm − 5·age + 5`
//! - Women: `10·kg + 6.25·cm − 5·age − 161`
//!
//! TDEE applies a single sedentary multiplier; no other activity levels exist.

use crate::config::PresetConfig;
use crate::Sex;
use serde::Serialize;

/// Sedentary activity multiplier applied to BMR
pub const SEDENTARY_MULTIPLIER: f64 = 1.2;

/// Basal metabolic rate in kcal/day. Inputs are not validated.
pub fn compute_bmr(weight_kg: f64, height_cm: f64, age: u32, sex: Sex) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age as f64;
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// Total daily energy expenditure in whole kcal/day
pub fn compute_tdee(weight_kg: f64, height_cm: f64, age: u32, sex: Sex) -> i32 {
    (compute_bmr(weight_kg, height_cm, age, sex) * SEDENTARY_MULTIPLIER).round() as i32
}

/// A suggested daily calorie target
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CaloriePreset {
    pub label: &'static str,
    pub calories: i32,
    pub deficit: i32,
}

/// Suggested calorie targets below `tdee`, most aggressive first
pub fn calorie_presets(tdee: i32, presets: &PresetConfig) -> Vec<CaloriePreset> {
    [
        ("Aggressive", presets.aggressive_deficit),
        ("Moderate", presets.moderate_deficit),
        ("Slow & Steady", presets.slow_deficit),
    ]
    .into_iter()
    .map(|(label, deficit)| CaloriePreset {
        label,
        calories: tdee - deficit,
        deficit,
    })
    .collect()
}
