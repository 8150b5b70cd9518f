use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::expense::{CategoryTotal, Expense, ExpenseCategory, ExpenseFilter};
use crate::models::record::RecordId;

/// Header row of the CSV export.
pub const CSV_HEADER: &str = "Date,Description,Category,Amount";

/// Expense tracker logic: record, delete, filter, total and export expenses.
pub struct ExpenseService;

impl ExpenseService {
    pub fn new() -> Self {
        Self
    }

    /// Record a new expense. Description and a positive amount are required.
    pub fn add(
        &self,
        expenses: &mut Vec<Expense>,
        description: &str,
        amount: f64,
        category: ExpenseCategory,
        date: NaiveDate,
    ) -> Result<Expense, CoreError> {
        if description.trim().is_empty() {
            return Err(CoreError::ValidationError("description is required".into()));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "amount must be positive, got {amount}"
            )));
        }
        let expense = Expense::new(description.trim(), amount, category, date);
        expenses.push(expense.clone());
        Ok(expense)
    }

    pub fn remove(&self, expenses: &mut Vec<Expense>, id: &RecordId) -> Result<Expense, CoreError> {
        let idx = expenses
            .iter()
            .position(|e| e.id == *id)
            .ok_or_else(|| CoreError::not_found("Expense", id))?;
        Ok(expenses.remove(idx))
    }

    /// Expenses matching the filter, newest first.
    pub fn filtered<'a>(&self, expenses: &'a [Expense], filter: &ExpenseFilter) -> Vec<&'a Expense> {
        let mut matching: Vec<&Expense> = expenses.iter().filter(|e| filter.matches(e)).collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date));
        matching
    }

    #[must_use]
    pub fn total(&self, expenses: &[Expense], filter: &ExpenseFilter) -> f64 {
        expenses
            .iter()
            .filter(|e| filter.matches(e))
            .map(|e| e.amount)
            .sum()
    }

    /// Per-category totals of the filtered view, in category order.
    /// Categories without spending are omitted.
    #[must_use]
    pub fn category_totals(&self, expenses: &[Expense], filter: &ExpenseFilter) -> Vec<CategoryTotal> {
        let mut by_category: BTreeMap<ExpenseCategory, f64> = BTreeMap::new();
        for expense in expenses.iter().filter(|e| filter.matches(e)) {
            *by_category.entry(expense.category).or_insert(0.0) += expense.amount;
        }
        let total: f64 = by_category.values().sum();

        by_category
            .into_iter()
            .filter(|(_, sum)| *sum > 0.0)
            .map(|(category, sum)| CategoryTotal {
                category,
                total: sum,
                pct: if total > 0.0 { sum / total * 100.0 } else { 0.0 },
            })
            .collect()
    }

    /// CSV report of the filtered view: `Date,Description,Category,Amount`.
    ///
    /// Descriptions containing commas, quotes or newlines are quoted.
    #[must_use]
    pub fn export_csv(&self, expenses: &[Expense], filter: &ExpenseFilter) -> String {
        let mut lines = vec![CSV_HEADER.to_string()];
        for expense in self.filtered(expenses, filter) {
            lines.push(format!(
                "{},{},{},{:.2}",
                expense.date.format("%Y-%m-%d"),
                csv_field(&expense.description),
                expense.category,
                expense.amount
            ));
        }
        lines.join("\n")
    }
}

impl Default for ExpenseService {
    fn default() -> Self {
        Self::new()
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
