//! Input checks applied before anything reaches the engine.
//!
//! The calculators themselves trust their inputs.

use crate::{Error, LogInput, ProfileInput, Result, UserProfile};

fn check(ok: bool, message: impl FnOnce() -> String) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::Validation(message()))
    }
}

fn check_weight(field: &str, kg: f64) -> Result<()> {
    check(kg.is_finite() && kg > 0.0, || {
        format!("{} must be a positive weight in kg, got {}", field, kg)
    })
}

/// Bounds for the physical stats and goal of a profile
pub fn validate_profile(profile: &UserProfile) -> Result<()> {
    check((100.0..=250.0).contains(&profile.height_cm), || {
        format!("height must be 100-250 cm, got {}", profile.height_cm)
    })?;
    check((16..=100).contains(&profile.age), || {
        format!("age must be 16-100, got {}", profile.age)
    })?;
    check_weight("starting weight", profile.starting_weight)?;
    check_weight("goal weight", profile.goal_weight)?;
    check_weight("current weight", profile.current_weight)?;
    check(profile.target_calories > 0, || {
        format!("target calories must be positive, got {}", profile.target_calories)
    })?;
    check(profile.tdee > 0, || format!("TDEE must be positive, got {}", profile.tdee))
}

/// Bounds for onboarding answers
pub fn validate_profile_input(input: &ProfileInput) -> Result<()> {
    validate_profile(&UserProfile::from_input(input.clone()))
}

/// Bounds for a day's log input
pub fn validate_log_input(input: &LogInput) -> Result<()> {
    check(input.calories_consumed >= 0, || {
        format!("calories consumed cannot be negative, got {}", input.calories_consumed)
    })?;
    check(input.workout_calories >= 0, || {
        format!("workout calories cannot be negative, got {}", input.workout_calories)
    })?;
    if let Some(weight) = input.weight {
        check_weight("weight", weight)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::tests::sample_input;

    #[test]
    fn test_valid_profile_input() {
        assert!(validate_profile_input(&sample_input()).is_ok());
    }

    #[test]
    fn test_out_of_range_height_and_age() {
        let mut input = sample_input();
        input.height_cm = 90.0;
        assert!(matches!(validate_profile_input(&input), Err(Error::Validation(_))));

        let mut input = sample_input();
        input.age = 15;
        assert!(validate_profile_input(&input).is_err());

        let mut input = sample_input();
        input.age = 100;
        assert!(validate_profile_input(&input).is_ok());
    }

    #[test]
    fn test_gain_goal_is_allowed() {
        let mut input = sample_input();
        input.goal_weight = 90.0;
        assert!(validate_profile_input(&input).is_ok());
    }

    #[test]
    fn test_log_input_bounds() {
        let mut input = LogInput {
            date: "2024-01-01".parse().unwrap(),
            calories_consumed: 1800,
            workout_calories: 0,
            weight: None,
            notes: None,
        };
        assert!(validate_log_input(&input).is_ok());

        input.workout_calories = -5;
        assert!(validate_log_input(&input).is_err());

        input.workout_calories = 0;
        input.weight = Some(0.0);
        assert!(validate_log_input(&input).is_err());
    }
}
