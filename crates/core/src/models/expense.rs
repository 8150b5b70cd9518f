use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record::{deserialize_day, RecordId};

/// Spending category shared by the budget planner and the expense tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ExpenseCategory {
    #[default]
    Food,
    Entertainment,
    Transportation,
    Education,
    Clothing,
    Savings,
    Utilities,
    Housing,
    Healthcare,
    Shopping,
    Personal,
    Other,
}

impl ExpenseCategory {
    /// All categories in display order.
    pub const ALL: [ExpenseCategory; 12] = [
        ExpenseCategory::Food,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Transportation,
        ExpenseCategory::Education,
        ExpenseCategory::Clothing,
        ExpenseCategory::Savings,
        ExpenseCategory::Utilities,
        ExpenseCategory::Housing,
        ExpenseCategory::Healthcare,
        ExpenseCategory::Shopping,
        ExpenseCategory::Personal,
        ExpenseCategory::Other,
    ];
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Transportation => "Transportation",
            ExpenseCategory::Education => "Education",
            ExpenseCategory::Clothing => "Clothing",
            ExpenseCategory::Savings => "Savings",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Housing => "Housing",
            ExpenseCategory::Healthcare => "Healthcare",
            ExpenseCategory::Shopping => "Shopping",
            ExpenseCategory::Personal => "Personal",
            ExpenseCategory::Other => "Other",
        };
        write!(f, "{s}")
    }
}

/// A single tracked expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(alias = "_id")]
    pub id: RecordId,
    pub description: String,
    /// Always positive
    pub amount: f64,
    pub category: ExpenseCategory,
    #[serde(deserialize_with = "deserialize_day")]
    pub date: NaiveDate,
}

impl Expense {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        category: ExpenseCategory,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: RecordId::new(),
            description: description.into(),
            amount,
            category,
            date,
        }
    }
}

/// Which expenses to include in totals and exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// `None` means all categories
    pub category: Option<ExpenseCategory>,
    /// Inclusive
    pub from: NaiveDate,
    /// Inclusive
    pub to: NaiveDate,
}

impl ExpenseFilter {
    /// The tracker's default view: the 30 days ending on `today`, all categories.
    pub fn last_30_days(today: NaiveDate) -> Self {
        Self {
            category: None,
            from: today - chrono::Duration::days(30),
            to: today,
        }
    }

    #[must_use]
    pub fn matches(&self, expense: &Expense) -> bool {
        let in_range = expense.date >= self.from && expense.date <= self.to;
        in_range && self.category.map_or(true, |c| c == expense.category)
    }
}

/// Sum of expenses for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    pub total: f64,
    /// Share of all expenses in the same view, 0–100.
    pub pct: f64,
}
