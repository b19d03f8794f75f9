//! Points calculation and goal conversion.
//!
//! One point is 1000 kcal of energy balance. Positive diet points mean a
//! deficit, negative mean a surplus. Workout points are never negative for
//! valid input.

use crate::DailyPoints;

/// Kilocalories per point
pub const KCAL_PER_POINT: f64 = 1000.0;

/// Approximate kilocalories per kilogram of body mass
pub const KCAL_PER_KG: f64 = 7700.0;

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let rounded = (value * factor).round() / factor;
    // Avoid surfacing -0.0 in reports
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Unrounded diet points for one day
pub fn diet_points(tdee: i32, calories_consumed: i32) -> f64 {
    (tdee - calories_consumed) as f64 / KCAL_PER_POINT
}

/// Unrounded workout points for one day
pub fn workout_points(workout_calories: i32) -> f64 {
    workout_calories as f64 / KCAL_PER_POINT
}

/// Points for one day, rounded to 3 places only at the output boundary
///
/// The total is rounded from the unrounded components, not summed from the
/// rounded ones.
pub fn compute_daily_points(tdee: i32, calories_consumed: i32, workout_calories: i32) -> DailyPoints {
    let diet = diet_points(tdee, calories_consumed);
    let workout = workout_points(workout_calories);

    DailyPoints {
        diet_points: round_to(diet, 3),
        workout_points: round_to(workout, 3),
        total_points: round_to(diet + workout, 3),
    }
}

/// Points needed to move from `starting_weight` to `goal_weight` (either direction)
pub fn total_points_needed(starting_weight: f64, goal_weight: f64) -> f64 {
    (starting_weight - goal_weight).abs() * KCAL_PER_KG / KCAL_PER_POINT
}

/// Kilograms of body mass represented by `points`
///
/// Positive points map to weight lost under the deficit convention; gain-mode
/// callers pass points already oriented by `GoalMode::directed`.
pub fn weight_change_from_points(points: f64) -> f64 {
    points * KCAL_PER_POINT / KCAL_PER_KG
}
