use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::{deserialize_day, RecordId};

/// What a savings goal is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GoalCategory {
    Electronics,
    Travel,
    Education,
    Entertainment,
    Clothing,
    Emergency,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "Low"),
            Priority::Medium => write!(f, "Medium"),
            Priority::High => write!(f, "High"),
        }
    }
}

/// A savings goal with progress towards a target amount.
///
/// `current_amount` never exceeds `target_amount`: contributions are clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    #[serde(alias = "_id")]
    pub id: RecordId,
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(deserialize_with = "deserialize_day")]
    pub deadline: NaiveDate,
    #[serde(default)]
    pub category: GoalCategory,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub notes: Option<String>,
}

impl SavingsGoal {
    pub fn new(name: impl Into<String>, target_amount: f64, deadline: NaiveDate) -> Self {
        Self {
            id: RecordId::new(),
            name: name.into(),
            target_amount,
            current_amount: 0.0,
            deadline,
            category: GoalCategory::default(),
            priority: Priority::default(),
            notes: None,
        }
    }

    /// Progress in whole percent, capped at 100.
    #[must_use]
    pub fn progress_pct(&self) -> u32 {
        if self.target_amount <= 0.0 {
            return 0;
        }
        let pct = (self.current_amount / self.target_amount * 100.0).round();
        pct.clamp(0.0, 100.0) as u32
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Amount still missing to reach the target.
    #[must_use]
    pub fn remaining(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }
}

/// Aggregate view over all goals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsOverview {
    pub total_saved: f64,
    pub total_target: f64,
    /// round(saved / target × 100); 0 with no target
    pub overall_progress_pct: u32,
    pub completed_goals: usize,
}
