use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::budget::Budget;
use crate::models::content::{Achievement, Feature};
use crate::models::expense::Expense;
use crate::models::portfolio::Portfolio;
use crate::models::quiz::QuizResult;
use crate::models::record::RecordId;
use crate::models::savings::SavingsGoal;

/// The learning platform's student REST API.
///
/// `HttpStudentApi` talks to the real backend; tests and offline builds
/// plug in their own implementation. Callers never see a transport type,
/// only `CoreError::Api` / `CoreError::Network` on failure.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait StudentApi: Send + Sync {
    /// Name of this backend, for logs.
    fn name(&self) -> &str;

    // ── Budget ──────────────────────────────────────────────────────

    /// `GET /student/budget`
    async fn fetch_budget(&self) -> Result<Budget, CoreError>;

    /// `POST /student/budget`
    async fn save_budget(&self, budget: &Budget) -> Result<(), CoreError>;

    // ── Expenses ────────────────────────────────────────────────────

    /// `GET /student/expenses`
    async fn fetch_expenses(&self) -> Result<Vec<Expense>, CoreError>;

    /// `POST /student/expenses`; returns the stored record.
    async fn save_expense(&self, expense: &Expense) -> Result<Expense, CoreError>;

    /// `DELETE /student/expenses/:id`
    async fn delete_expense(&self, id: &RecordId) -> Result<(), CoreError>;

    // ── Savings goals ───────────────────────────────────────────────

    /// `GET /student/savings`
    async fn fetch_savings_goals(&self) -> Result<Vec<SavingsGoal>, CoreError>;

    /// `POST /student/savings` with the full goal list.
    async fn save_savings_goals(&self, goals: &[SavingsGoal]) -> Result<(), CoreError>;

    /// `POST /student/savings/:id/contribute`; returns the updated goal.
    async fn contribute(&self, id: &RecordId, amount: f64) -> Result<SavingsGoal, CoreError>;

    /// `DELETE /student/savings/:id`
    async fn delete_savings_goal(&self, id: &RecordId) -> Result<(), CoreError>;

    // ── Investment simulator ────────────────────────────────────────

    /// `GET /student/investment`
    async fn fetch_investment(&self) -> Result<Portfolio, CoreError>;

    /// `POST /student/investment`
    async fn save_investment(&self, portfolio: &Portfolio) -> Result<(), CoreError>;

    // ── Quiz ────────────────────────────────────────────────────────

    /// `GET /student/quiz`
    async fn fetch_quiz_results(&self) -> Result<Vec<QuizResult>, CoreError>;

    /// `POST /student/quiz`
    async fn save_quiz_result(&self, result: &QuizResult) -> Result<(), CoreError>;

    // ── Static content ──────────────────────────────────────────────

    /// `GET /student/features`
    async fn fetch_features(&self) -> Result<Vec<Feature>, CoreError>;

    /// `GET /student/achievements`
    async fn fetch_achievements(&self) -> Result<Vec<Achievement>, CoreError>;
}
