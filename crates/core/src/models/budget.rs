use serde::{Deserialize, Serialize};

use super::expense::{CategoryTotal, ExpenseCategory};
use super::record::RecordId;

/// A source of income in the budget planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeItem {
    #[serde(alias = "_id")]
    pub id: RecordId,
    pub name: String,
    pub amount: f64,
}

impl IncomeItem {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            id: RecordId::new(),
            name: name.into(),
            amount,
        }
    }
}

/// A planned expense line in the budget planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    #[serde(alias = "_id")]
    pub id: RecordId,
    pub name: String,
    pub amount: f64,
    pub category: ExpenseCategory,
}

impl BudgetItem {
    pub fn new(name: impl Into<String>, amount: f64, category: ExpenseCategory) -> Self {
        Self {
            id: RecordId::new(),
            name: name.into(),
            amount,
            category,
        }
    }
}

/// Body of `GET/POST /student/budget`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    #[serde(default)]
    pub incomes: Vec<IncomeItem>,
    #[serde(default)]
    pub expenses: Vec<BudgetItem>,
}

/// Derived budget statistics, recomputed on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    /// income − expenses; negative means a deficit
    pub balance: f64,
    /// expenses / income × 100, `None` without income
    pub spending_ratio_pct: Option<f64>,
    /// Per-category totals, largest first
    pub categories: Vec<CategoryTotal>,
}

impl BudgetSummary {
    #[must_use]
    pub fn has_surplus(&self) -> bool {
        self.balance > 0.0
    }
}
