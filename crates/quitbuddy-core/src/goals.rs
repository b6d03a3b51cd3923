//! Savings goals.
//!
//! Goals are not funded separately: the amount shown against a goal is the
//! total money saved, capped at the goal's target.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    /// Stored as written at creation; display uses [`SavingsGoal::progress`].
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default)]
    pub icon: String,
}

impl SavingsGoal {
    pub fn new(name: &str, target_amount: f64, icon: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::invalid("name", "must not be empty"));
        }
        if !(target_amount.is_finite() && target_amount > 0.0) {
            return Err(ValidationError::invalid("targetAmount", "must be greater than 0"));
        }
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            target_amount,
            current_amount: 0.0,
            icon: icon.to_string(),
        })
    }

    pub fn progress(&self, total_money_saved: f64) -> GoalProgress {
        let current = total_money_saved.max(0.0).min(self.target_amount);
        GoalProgress {
            id: self.id.clone(),
            name: self.name.clone(),
            icon: self.icon.clone(),
            target_amount: self.target_amount,
            current_amount: current,
            percent: if self.target_amount > 0.0 {
                current / self.target_amount * 100.0
            } else {
                0.0
            },
            reached: current >= self.target_amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub percent: f64,
    pub reached: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_caps_at_target() {
        let goal = SavingsGoal::new("Headphones", 150.0, "🎧").unwrap();
        let p = goal.progress(60.0);
        assert_eq!(p.current_amount, 60.0);
        assert!((p.percent - 40.0).abs() < 1e-9);
        assert!(!p.reached);

        let p = goal.progress(400.0);
        assert_eq!(p.current_amount, 150.0);
        assert!(p.reached);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(SavingsGoal::new("  ", 10.0, "").is_err());
        assert!(SavingsGoal::new("Trip", 0.0, "").is_err());
        assert!(SavingsGoal::new("Trip", f64::INFINITY, "").is_err());
    }

    #[test]
    fn ids_are_unique() {
        let a = SavingsGoal::new("A", 1.0, "").unwrap();
        let b = SavingsGoal::new("A", 1.0, "").unwrap();
        assert_ne!(a.id, b.id);
    }
}
