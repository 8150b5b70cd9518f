use std::collections::BTreeMap;

use crate::errors::CoreError;
use crate::models::budget::{Budget, BudgetItem, BudgetSummary, IncomeItem};
use crate::models::expense::{CategoryTotal, ExpenseCategory};
use crate::models::record::RecordId;

/// Budget planner logic: edit income/expense lines, derive totals.
pub struct BudgetService;

impl BudgetService {
    pub fn new() -> Self {
        Self
    }

    pub fn add_income(
        &self,
        budget: &mut Budget,
        name: &str,
        amount: f64,
    ) -> Result<IncomeItem, CoreError> {
        validate_line(name, amount)?;
        let item = IncomeItem::new(name.trim(), amount);
        budget.incomes.push(item.clone());
        Ok(item)
    }

    pub fn remove_income(&self, budget: &mut Budget, id: &RecordId) -> Result<IncomeItem, CoreError> {
        let idx = budget
            .incomes
            .iter()
            .position(|i| i.id == *id)
            .ok_or_else(|| CoreError::not_found("Income", id))?;
        Ok(budget.incomes.remove(idx))
    }

    pub fn add_expense(
        &self,
        budget: &mut Budget,
        name: &str,
        amount: f64,
        category: ExpenseCategory,
    ) -> Result<BudgetItem, CoreError> {
        validate_line(name, amount)?;
        let item = BudgetItem::new(name.trim(), amount, category);
        budget.expenses.push(item.clone());
        Ok(item)
    }

    pub fn remove_expense(&self, budget: &mut Budget, id: &RecordId) -> Result<BudgetItem, CoreError> {
        let idx = budget
            .expenses
            .iter()
            .position(|e| e.id == *id)
            .ok_or_else(|| CoreError::not_found("Budget expense", id))?;
        Ok(budget.expenses.remove(idx))
    }

    /// Totals, balance, spending ratio and per-category breakdown.
    #[must_use]
    pub fn summary(&self, budget: &Budget) -> BudgetSummary {
        let total_income: f64 = budget.incomes.iter().map(|i| i.amount).sum();
        let total_expenses: f64 = budget.expenses.iter().map(|e| e.amount).sum();

        let mut by_category: BTreeMap<ExpenseCategory, f64> = BTreeMap::new();
        for item in &budget.expenses {
            *by_category.entry(item.category).or_insert(0.0) += item.amount;
        }
        let mut categories: Vec<CategoryTotal> = by_category
            .into_iter()
            .map(|(category, total)| CategoryTotal {
                category,
                total,
                pct: if total_expenses > 0.0 {
                    total / total_expenses * 100.0
                } else {
                    0.0
                },
            })
            .collect();
        categories.sort_by(|a, b| {
            b.total
                .partial_cmp(&a.total)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        BudgetSummary {
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
            spending_ratio_pct: (total_income > 0.0).then(|| total_expenses / total_income * 100.0),
            categories,
        }
    }
}

impl Default for BudgetService {
    fn default() -> Self {
        Self::new()
    }
}

/// A budget line needs a name and a positive amount.
fn validate_line(name: &str, amount: f64) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::ValidationError("name is required".into()));
    }
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CoreError::ValidationError(format!(
            "amount must be positive, got {amount}"
        )));
    }
    Ok(())
}
