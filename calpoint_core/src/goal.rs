//! Goal direction handling.
//!
//! Every sign-dependent calculation goes through [`GoalMode`] so loss and
//! gain share one code path.

use crate::{GoalMode, UserProfile};

impl GoalMode {
    /// Select the mode from starting and goal weight
    pub fn from_weights(starting_weight: f64, goal_weight: f64) -> Self {
        if starting_weight > goal_weight {
            GoalMode::Loss
        } else if goal_weight > starting_weight {
            GoalMode::Gain
        } else {
            GoalMode::Maintenance
        }
    }

    /// Select the mode for a profile
    pub fn for_profile(profile: &UserProfile) -> Self {
        Self::from_weights(profile.starting_weight, profile.goal_weight)
    }

    /// +1 when deficits count as progress, -1 when surpluses do, 0 otherwise
    pub fn sign(self) -> f64 {
        match self {
            GoalMode::Loss => 1.0,
            GoalMode::Gain => -1.0,
            GoalMode::Maintenance => 0.0,
        }
    }

    /// Reorient signed points so that positive always means toward the goal
    pub fn directed(self, points: f64) -> f64 {
        points * self.sign()
    }

    /// Compare an actual pace with the planned pace
    ///
    /// Returns `None` in maintenance, where there is no plan to beat.
    pub fn meets_target(self, actual: f64, target: f64) -> Option<bool> {
        match self {
            GoalMode::Loss => Some(actual >= target),
            GoalMode::Gain => Some(actual <= target),
            GoalMode::Maintenance => None,
        }
    }
}
