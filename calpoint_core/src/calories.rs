//! Calorie-balance summary in kcal.

use crate::points::{KCAL_PER_KG, KCAL_PER_POINT};
use serde::{Deserialize, Serialize};

/// Inputs to [`compute_calorie_summary`]
#[derive(Clone, Copy, Debug)]
pub struct CalorieInputs {
    pub tdee: i32,
    pub target_calories: i32,
    pub starting_weight: f64,
    pub goal_weight: f64,
    pub points_collected: f64,
    pub days_logged: usize,
}

/// Energy balance totals; kcal totals are whole numbers
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CalorieSummary {
    pub total_deficit_needed: f64,
    /// Signed like the points collected
    pub deficit_created: f64,
    pub deficit_remaining: f64,
    /// Negative when the plan is a surplus
    pub planned_daily_deficit: i32,
    pub avg_daily_deficit: f64,
    pub tdee: i32,
    pub target_calories: i32,
}

pub fn compute_calorie_summary(inputs: &CalorieInputs) -> CalorieSummary {
    let total_deficit_needed = (inputs.starting_weight - inputs.goal_weight).abs() * KCAL_PER_KG;
    let deficit_created = inputs.points_collected * KCAL_PER_POINT;
    let deficit_remaining = total_deficit_needed - deficit_created;

    let avg_daily_deficit = if inputs.days_logged > 0 {
        (deficit_created / inputs.days_logged as f64).round()
    } else {
        0.0
    };

    CalorieSummary {
        total_deficit_needed: total_deficit_needed.round(),
        deficit_created: deficit_created.round(),
        deficit_remaining: deficit_remaining.round(),
        planned_daily_deficit: inputs.tdee - inputs.target_calories,
        avg_daily_deficit,
        tdee: inputs.tdee,
        target_calories: inputs.target_calories,
    }
}
