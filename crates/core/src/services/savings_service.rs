use chrono::NaiveDate;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::record::RecordId;
use crate::models::savings::{GoalCategory, Priority, SavingsGoal, SavingsOverview};

/// Fields of a new or edited savings goal.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalDraft {
    pub name: String,
    pub target_amount: f64,
    pub deadline: Option<NaiveDate>,
    pub category: GoalCategory,
    pub priority: Priority,
    pub notes: Option<String>,
}

impl GoalDraft {
    pub fn new(name: impl Into<String>, target_amount: f64, deadline: NaiveDate) -> Self {
        Self {
            name: name.into(),
            target_amount,
            deadline: Some(deadline),
            category: GoalCategory::default(),
            priority: Priority::default(),
            notes: None,
        }
    }
}

/// Savings goals logic: create, edit, delete, contribute, aggregate.
pub struct SavingsService;

impl SavingsService {
    pub fn new() -> Self {
        Self
    }

    /// Create a goal. Name, a positive target and a deadline are required.
    pub fn create(
        &self,
        goals: &mut Vec<SavingsGoal>,
        draft: GoalDraft,
    ) -> Result<SavingsGoal, CoreError> {
        let deadline = validate_draft(&draft)?;
        let mut goal = SavingsGoal::new(draft.name.trim(), draft.target_amount, deadline);
        goal.category = draft.category;
        goal.priority = draft.priority;
        goal.notes = draft.notes;
        goals.push(goal.clone());
        Ok(goal)
    }

    /// Replace a goal's editable fields. Saved progress is kept but clamped
    /// to the new target.
    pub fn update(
        &self,
        goals: &mut [SavingsGoal],
        id: &RecordId,
        draft: GoalDraft,
    ) -> Result<SavingsGoal, CoreError> {
        let deadline = validate_draft(&draft)?;
        let goal = find_mut(goals, id)?;
        goal.name = draft.name.trim().to_string();
        goal.target_amount = draft.target_amount;
        goal.current_amount = goal.current_amount.min(draft.target_amount);
        goal.deadline = deadline;
        goal.category = draft.category;
        goal.priority = draft.priority;
        goal.notes = draft.notes;
        Ok(goal.clone())
    }

    pub fn delete(&self, goals: &mut Vec<SavingsGoal>, id: &RecordId) -> Result<SavingsGoal, CoreError> {
        let idx = goals
            .iter()
            .position(|g| g.id == *id)
            .ok_or_else(|| CoreError::not_found("Savings goal", id))?;
        Ok(goals.remove(idx))
    }

    /// Add money to a goal; the saved amount never exceeds the target.
    pub fn contribute(
        &self,
        goals: &mut [SavingsGoal],
        id: &RecordId,
        amount: f64,
    ) -> Result<SavingsGoal, CoreError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "contribution must be positive, got {amount}"
            )));
        }
        let goal = find_mut(goals, id)?;
        goal.current_amount = (goal.current_amount + amount).min(goal.target_amount);
        debug!(goal = %goal.name, saved = goal.current_amount, progress = goal.progress_pct(), "contribution added");
        Ok(goal.clone())
    }

    #[must_use]
    pub fn overview(&self, goals: &[SavingsGoal]) -> SavingsOverview {
        let total_saved: f64 = goals.iter().map(|g| g.current_amount).sum();
        let total_target: f64 = goals.iter().map(|g| g.target_amount).sum();
        let overall_progress_pct = if total_target > 0.0 {
            (total_saved / total_target * 100.0).round().clamp(0.0, 100.0) as u32
        } else {
            0
        };
        SavingsOverview {
            total_saved,
            total_target,
            overall_progress_pct,
            completed_goals: goals.iter().filter(|g| g.is_complete()).count(),
        }
    }

    /// Goals ordered by priority (high first), then by deadline.
    pub fn by_priority<'a>(&self, goals: &'a [SavingsGoal]) -> Vec<&'a SavingsGoal> {
        let mut sorted: Vec<&SavingsGoal> = goals.iter().collect();
        sorted.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.deadline.cmp(&b.deadline)));
        sorted
    }
}

impl Default for SavingsService {
    fn default() -> Self {
        Self::new()
    }
}

fn find_mut<'a>(goals: &'a mut [SavingsGoal], id: &RecordId) -> Result<&'a mut SavingsGoal, CoreError> {
    goals
        .iter_mut()
        .find(|g| g.id == *id)
        .ok_or_else(|| CoreError::not_found("Savings goal", id))
}

fn validate_draft(draft: &GoalDraft) -> Result<NaiveDate, CoreError> {
    if draft.name.trim().is_empty() {
        return Err(CoreError::ValidationError("goal name is required".into()));
    }
    if !draft.target_amount.is_finite() || draft.target_amount <= 0.0 {
        return Err(CoreError::ValidationError(format!(
            "target amount must be positive, got {}",
            draft.target_amount
        )));
    }
    draft
        .deadline
        .ok_or_else(|| CoreError::ValidationError("deadline is required".into()))
}
