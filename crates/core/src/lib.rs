pub mod api;
pub mod errors;
pub mod games;
pub mod models;
pub mod services;
pub mod storage;
#[cfg(not(target_arch = "wasm32"))]
pub mod sync;

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, info};

use api::fallback::{self, Fetched, LocalFallback, WriteOutcome};
use api::traits::StudentApi;
use errors::CoreError;
use games::{
    catalog::GameCatalog,
    engine::GameSession,
    feedback::{FeedbackEvent, RewardGrant, RewardLedger},
};
use models::{
    analytics::{PortfolioSummary, SectorAllocation},
    budget::{Budget, BudgetItem, BudgetSummary, IncomeItem},
    content::{default_achievements, default_features, Achievement, Feature},
    expense::{CategoryTotal, Expense, ExpenseCategory, ExpenseFilter},
    game::{GameCategory, GameConfig, NavigationState},
    page::{DataSource, Page, PageStatus},
    portfolio::{HistoryEntry, Portfolio, SaleReceipt, SimulationPhase, Transaction},
    quiz::QuizResult,
    record::RecordId,
    savings::{SavingsGoal, SavingsOverview},
    session::{AnswerOutcome, GamePhase, GameSummary, ShellView},
    settings::Settings,
    stock::Stock,
    student::StudentData,
};
use services::{
    analytics_service::AnalyticsService,
    budget_service::BudgetService,
    expense_service::ExpenseService,
    investment_service::InvestmentService,
    market::Market,
    savings_service::{GoalDraft, SavingsService},
};
use storage::manager::StorageManager;

/// Main entry point of the FinPlay core library.
///
/// Holds the student's data, the simulator market, the game catalog and the
/// active game session, plus the services operating on them. A UI renders
/// what this struct computes and forwards user actions to it.
#[must_use]
pub struct FinanceLab {
    data: StudentData,
    market: Market,
    catalog: GameCatalog,
    session: Option<GameSession>,
    budget_service: BudgetService,
    expense_service: ExpenseService,
    savings_service: SavingsService,
    investment_service: InvestmentService,
    analytics_service: AnalyticsService,
    pages: HashMap<Page, PageStatus>,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for FinanceLab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceLab")
            .field("expenses", &self.data.expenses.len())
            .field("savings_goals", &self.data.savings_goals.len())
            .field("day", &self.data.portfolio.current_day)
            .field("games", &self.catalog.len())
            .field("active_game", &self.session.as_ref().map(|s| s.config().id.as_str()))
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl FinanceLab {
    /// Fresh student data with default settings and the built-in games.
    pub fn create_new() -> Result<Self, CoreError> {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        Self::build(StudentData::with_settings(settings))
    }

    /// Replace the simulator market, e.g. with a seeded one.
    pub fn with_market(mut self, market: Market) -> Self {
        self.market = market;
        self
    }

    /// Replace the game catalog.
    pub fn with_catalog(mut self, catalog: GameCatalog) -> Self {
        self.catalog = catalog;
        self.session = None;
        self
    }

    /// Decrypt student data saved with `save_to_bytes`.
    pub fn load_from_bytes(encrypted: &[u8], passphrase: &str) -> Result<Self, CoreError> {
        let data = StorageManager::load_from_bytes(encrypted, passphrase)?;
        Self::build(data)
    }

    /// Encrypt the student data. Clears the unsaved-changes flag.
    pub fn save_to_bytes(&mut self, passphrase: &str) -> Result<Vec<u8>, CoreError> {
        let bytes = StorageManager::save_to_bytes(&self.data, passphrase)?;
        self.dirty = false;
        Ok(bytes)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str, passphrase: &str) -> Result<Self, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes, passphrase)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self, path: &str, passphrase: &str) -> Result<(), CoreError> {
        let bytes = StorageManager::save_to_bytes(&self.data, passphrase)?;
        std::fs::write(path, bytes)?;
        self.dirty = false;
        Ok(())
    }

    /// Re-encrypt with a new passphrase after verifying the current one
    /// against the last saved bytes.
    pub fn change_passphrase(
        &mut self,
        last_saved_bytes: &[u8],
        current: &str,
        new: &str,
    ) -> Result<Vec<u8>, CoreError> {
        StorageManager::load_from_bytes(last_saved_bytes, current)?;
        self.save_to_bytes(new)
    }

    fn build(data: StudentData) -> Result<Self, CoreError> {
        Ok(Self {
            data,
            market: Market::new(),
            catalog: GameCatalog::builtin()?,
            session: None,
            budget_service: BudgetService::new(),
            expense_service: ExpenseService::new(),
            savings_service: SavingsService::new(),
            investment_service: InvestmentService::new(),
            analytics_service: AnalyticsService::new(),
            pages: HashMap::new(),
            dirty: false,
        })
    }

    // ── State ───────────────────────────────────────────────────────

    #[must_use]
    pub fn data(&self) -> &StudentData {
        &self.data
    }

    /// Copy of the current data, for the autosave queue.
    #[must_use]
    pub fn snapshot(&self) -> StudentData {
        self.data.clone()
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.data.settings
    }

    pub fn set_settings(&mut self, settings: Settings) -> Result<(), CoreError> {
        settings.validate()?;
        self.data.settings = settings;
        self.dirty = true;
        Ok(())
    }

    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Record that the current data has been persisted elsewhere
    /// (for example by the autosave worker).
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    #[must_use]
    pub fn page_status(&self, page: Page) -> PageStatus {
        self.pages.get(&page).cloned().unwrap_or_default()
    }

    // ── Budget ──────────────────────────────────────────────────────

    pub fn add_income(&mut self, name: &str, amount: f64) -> Result<IncomeItem, CoreError> {
        let item = self.budget_service.add_income(&mut self.data.budget, name, amount)?;
        self.dirty = true;
        Ok(item)
    }

    pub fn remove_income(&mut self, id: &RecordId) -> Result<IncomeItem, CoreError> {
        let item = self.budget_service.remove_income(&mut self.data.budget, id)?;
        self.dirty = true;
        Ok(item)
    }

    pub fn add_budget_expense(
        &mut self,
        name: &str,
        amount: f64,
        category: ExpenseCategory,
    ) -> Result<BudgetItem, CoreError> {
        let item = self
            .budget_service
            .add_expense(&mut self.data.budget, name, amount, category)?;
        self.dirty = true;
        Ok(item)
    }

    pub fn remove_budget_expense(&mut self, id: &RecordId) -> Result<BudgetItem, CoreError> {
        let item = self.budget_service.remove_expense(&mut self.data.budget, id)?;
        self.dirty = true;
        Ok(item)
    }

    #[must_use]
    pub fn budget(&self) -> &Budget {
        &self.data.budget
    }

    #[must_use]
    pub fn budget_summary(&self) -> BudgetSummary {
        self.budget_service.summary(&self.data.budget)
    }

    // ── Expenses ────────────────────────────────────────────────────

    pub fn add_expense(
        &mut self,
        description: &str,
        amount: f64,
        category: ExpenseCategory,
        date: NaiveDate,
    ) -> Result<Expense, CoreError> {
        let expense = self.expense_service.add(
            &mut self.data.expenses,
            description,
            amount,
            category,
            date,
        )?;
        self.dirty = true;
        Ok(expense)
    }

    pub fn delete_expense(&mut self, id: &RecordId) -> Result<Expense, CoreError> {
        let expense = self.expense_service.remove(&mut self.data.expenses, id)?;
        self.dirty = true;
        Ok(expense)
    }

    #[must_use]
    pub fn expenses(&self, filter: &ExpenseFilter) -> Vec<&Expense> {
        self.expense_service.filtered(&self.data.expenses, filter)
    }

    #[must_use]
    pub fn expense_total(&self, filter: &ExpenseFilter) -> f64 {
        self.expense_service.total(&self.data.expenses, filter)
    }

    #[must_use]
    pub fn expense_categories(&self, filter: &ExpenseFilter) -> Vec<CategoryTotal> {
        self.expense_service.category_totals(&self.data.expenses, filter)
    }

    #[must_use]
    pub fn export_expenses_csv(&self, filter: &ExpenseFilter) -> String {
        self.expense_service.export_csv(&self.data.expenses, filter)
    }

    // ── Savings goals ───────────────────────────────────────────────

    pub fn create_goal(&mut self, draft: GoalDraft) -> Result<SavingsGoal, CoreError> {
        let goal = self.savings_service.create(&mut self.data.savings_goals, draft)?;
        self.dirty = true;
        Ok(goal)
    }

    pub fn update_goal(&mut self, id: &RecordId, draft: GoalDraft) -> Result<SavingsGoal, CoreError> {
        let goal = self
            .savings_service
            .update(&mut self.data.savings_goals, id, draft)?;
        self.dirty = true;
        Ok(goal)
    }

    pub fn delete_goal(&mut self, id: &RecordId) -> Result<SavingsGoal, CoreError> {
        let goal = self.savings_service.delete(&mut self.data.savings_goals, id)?;
        self.dirty = true;
        Ok(goal)
    }

    pub fn contribute(&mut self, id: &RecordId, amount: f64) -> Result<SavingsGoal, CoreError> {
        let goal = self
            .savings_service
            .contribute(&mut self.data.savings_goals, id, amount)?;
        self.dirty = true;
        Ok(goal)
    }

    #[must_use]
    pub fn savings_goals(&self) -> &[SavingsGoal] {
        &self.data.savings_goals
    }

    #[must_use]
    pub fn goals_by_priority(&self) -> Vec<&SavingsGoal> {
        self.savings_service.by_priority(&self.data.savings_goals)
    }

    #[must_use]
    pub fn savings_overview(&self) -> SavingsOverview {
        self.savings_service.overview(&self.data.savings_goals)
    }

    // ── Investment simulator ────────────────────────────────────────

    #[must_use]
    pub fn market(&self) -> &Market {
        &self.market
    }

    #[must_use]
    pub fn stocks(&self) -> &[Stock] {
        self.market.stocks()
    }

    #[must_use]
    pub fn portfolio(&self) -> &Portfolio {
        &self.data.portfolio
    }

    pub fn buy(&mut self, stock_id: u32, quantity: u32) -> Result<Transaction, CoreError> {
        let tx = self
            .investment_service
            .buy(&mut self.data.portfolio, &self.market, stock_id, quantity)?;
        self.dirty = true;
        Ok(tx)
    }

    pub fn sell(&mut self, stock_id: u32, quantity: u32) -> Result<SaleReceipt, CoreError> {
        let receipt = self
            .investment_service
            .sell(&mut self.data.portfolio, &self.market, stock_id, quantity)?;
        self.dirty = true;
        Ok(receipt)
    }

    pub fn sell_all(&mut self, stock_id: u32) -> Result<SaleReceipt, CoreError> {
        let receipt = self
            .investment_service
            .sell_all(&mut self.data.portfolio, &self.market, stock_id)?;
        self.dirty = true;
        Ok(receipt)
    }

    /// Advance the market by one day. Fails with `SimulationComplete` once
    /// the configured day limit is reached.
    pub fn simulate_day(&mut self) -> Result<HistoryEntry, CoreError> {
        let entry = self.investment_service.simulate_day(
            &mut self.data.portfolio,
            &mut self.market,
            self.data.settings.max_days,
        )?;
        self.dirty = true;
        Ok(entry)
    }

    #[must_use]
    pub fn simulation_phase(&self) -> SimulationPhase {
        self.data.portfolio.phase(self.data.settings.max_days)
    }

    /// Start the simulation over with the configured starting cash.
    /// The watchlist survives.
    pub fn reset_simulation(&mut self) {
        let watchlist = std::mem::take(&mut self.data.portfolio.watchlist);
        self.data.portfolio = Portfolio::with_cash(self.data.settings.starting_cash);
        self.data.portfolio.watchlist = watchlist;
        self.dirty = true;
    }

    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.investment_service
            .total_value(&self.data.portfolio, &self.market)
    }

    #[must_use]
    pub fn portfolio_summary(&self) -> PortfolioSummary {
        self.analytics_service.summary(
            &self.data.portfolio,
            &self.market,
            self.data.settings.starting_cash,
        )
    }

    #[must_use]
    pub fn sector_allocation(&self) -> Vec<SectorAllocation> {
        self.analytics_service
            .sector_allocation(&self.data.portfolio, &self.market)
    }

    /// Newest first.
    #[must_use]
    pub fn transactions(&self) -> Vec<&Transaction> {
        self.investment_service.transactions(&self.data.portfolio)
    }

    pub fn watch(&mut self, stock_id: u32) -> Result<bool, CoreError> {
        let added = self
            .investment_service
            .watch(&mut self.data.portfolio, &self.market, stock_id)?;
        self.dirty |= added;
        Ok(added)
    }

    pub fn unwatch(&mut self, stock_id: u32) -> bool {
        let removed = self.investment_service.unwatch(&mut self.data.portfolio, stock_id);
        self.dirty |= removed;
        removed
    }

    // ── Mini-games ──────────────────────────────────────────────────

    #[must_use]
    pub fn catalog(&self) -> &GameCatalog {
        &self.catalog
    }

    /// Start a game, replacing any active session.
    ///
    /// `nav` is the reward state handed over by the previous game; catalog
    /// values take precedence over it.
    pub fn start_game(
        &mut self,
        game_id: &str,
        nav: Option<&NavigationState>,
    ) -> Result<&GameSession, CoreError> {
        let config = self.catalog.require(game_id)?.clone();
        let rewards = self.catalog.resolve_rewards(game_id, nav);
        let mut session = GameSession::new(config, rewards)?;
        session.start()?;
        debug!(game = game_id, ?rewards, "game session started");
        Ok(self.session.insert(session))
    }

    #[must_use]
    pub fn game(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn select_choice(&mut self, choice_id: &str) -> Result<(), CoreError> {
        self.active_game()?.select(choice_id)
    }

    pub fn confirm_answer(&mut self) -> Result<AnswerOutcome, CoreError> {
        self.active_game()?.confirm()
    }

    pub fn answer(&mut self, choice_id: &str) -> Result<AnswerOutcome, CoreError> {
        self.active_game()?.answer(choice_id)
    }

    pub fn tick_game(&mut self, elapsed_secs: u32) -> Result<Option<AnswerOutcome>, CoreError> {
        self.active_game()?.tick(elapsed_secs)
    }

    pub fn advance_game(&mut self) -> Result<GamePhase, CoreError> {
        self.active_game()?.advance()
    }

    /// "Try again" on the active game.
    pub fn restart_game(&mut self) -> Result<(), CoreError> {
        self.active_game()?.reset();
        Ok(())
    }

    pub fn drain_game_feedback(&mut self) -> Vec<FeedbackEvent> {
        self.session
            .as_mut()
            .map(GameSession::drain_feedback)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn shell_view(&self) -> Option<ShellView> {
        self.session.as_ref().map(GameSession::shell_view)
    }

    /// Close a finished game and credit the reward ledger. Quiz games also
    /// log the attempt as a quiz result.
    pub fn finish_game(&mut self) -> Result<(GameSummary, RewardGrant), CoreError> {
        let session = self.session.as_ref().ok_or(CoreError::NoActiveGame)?;
        let summary = session.summary().ok_or_else(|| CoreError::InvalidTransition {
            action: "finish",
            phase: session.phase().to_string(),
        })?;

        let is_quiz = session.config().category == GameCategory::Quiz;

        let grant = self.data.rewards.record(&summary);
        if is_quiz {
            self.data
                .quiz_results
                .push(QuizResult::new(&summary.game_id, summary.correct, summary.total));
        }
        self.session = None;
        self.dirty = true;
        info!(game = %summary.game_id, correct = summary.correct, total = summary.total, "game closed");
        Ok((summary, grant))
    }

    /// Leave the active game without crediting anything.
    pub fn quit_game(&mut self) {
        self.session = None;
    }

    /// The game to offer after `game_id`, with the navigation state to
    /// hand over.
    ///
    /// The handed-over rewards are the ones `game_id` ran with: the active
    /// session's if it is still open, otherwise resolved from the catalog
    /// and `nav`, the state `game_id` itself was started with.
    #[must_use]
    pub fn next_game(
        &self,
        game_id: &str,
        nav: Option<&NavigationState>,
    ) -> Option<(&GameConfig, NavigationState)> {
        let next = self.catalog.next_after(game_id)?;
        let rewards = match &self.session {
            Some(session) if session.config().id == game_id => session.rewards(),
            _ => self.catalog.resolve_rewards(game_id, nav),
        };
        Some((next, NavigationState::from(rewards)))
    }

    #[must_use]
    pub fn rewards(&self) -> &RewardLedger {
        &self.data.rewards
    }

    fn active_game(&mut self) -> Result<&mut GameSession, CoreError> {
        self.session.as_mut().ok_or(CoreError::NoActiveGame)
    }

    // ── Quiz ────────────────────────────────────────────────────────

    /// Record a completed quiz outside the game engine.
    pub fn record_quiz_result(
        &mut self,
        game_id: &str,
        score: usize,
        total_questions: usize,
    ) -> Result<QuizResult, CoreError> {
        if score > total_questions {
            return Err(CoreError::ValidationError(format!(
                "score {score} exceeds {total_questions} questions"
            )));
        }
        let result = QuizResult::new(game_id, score, total_questions);
        self.data.quiz_results.push(result.clone());
        self.dirty = true;
        Ok(result)
    }

    /// Past quiz results, newest first.
    #[must_use]
    pub fn quiz_results(&self) -> Vec<&QuizResult> {
        let mut results: Vec<&QuizResult> = self.data.quiz_results.iter().collect();
        results.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        results
    }

    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.data.features
    }

    #[must_use]
    pub fn achievements(&self) -> &[Achievement] {
        &self.data.achievements
    }

    // ── Remote: reads ───────────────────────────────────────────────

    /// Load one page from the API, applying the configured read policy on
    /// failure. Returns where the data came from.
    pub async fn load_page(&mut self, api: &dyn StudentApi, page: Page) -> Result<DataSource, CoreError> {
        self.pages.insert(page, PageStatus::Loading);
        let policy = self.data.settings.read_policy;

        let outcome = match page {
            Page::Budget => {
                let cached = Some(self.data.budget.clone());
                fallback::resolve(api.fetch_budget().await, cached, policy, Budget::default)
                    .map(|f| self.apply(f, false, |d, v| d.budget = v))
            }
            Page::Expenses => {
                let cached = Some(self.data.expenses.clone());
                fallback::resolve(api.fetch_expenses().await, cached, policy, Vec::new)
                    .map(|f| self.apply(f, false, |d, v| d.expenses = v))
            }
            Page::Savings => {
                let cached = Some(self.data.savings_goals.clone());
                fallback::resolve(api.fetch_savings_goals().await, cached, policy, Vec::new)
                    .map(|f| self.apply(f, false, |d, v| d.savings_goals = v))
            }
            Page::Investment => {
                let cached = Some(self.data.portfolio.clone());
                let starting_cash = self.data.settings.starting_cash;
                fallback::resolve(api.fetch_investment().await, cached, policy, || {
                    Portfolio::with_cash(starting_cash)
                })
                .map(|f| self.apply(f, false, |d, v| d.portfolio = v))
            }
            Page::Quiz => {
                let cached = Some(self.data.quiz_results.clone());
                fallback::resolve(api.fetch_quiz_results().await, cached, policy, Vec::new)
                    .map(|f| self.apply(f, false, |d, v| d.quiz_results = v))
            }
            Page::Features => {
                let cached = Some(self.data.features.clone()).filter(|f| !f.is_empty());
                fallback::resolve(api.fetch_features().await, cached, policy, default_features)
                    .map(|f| self.apply(f, true, |d, v| d.features = v))
            }
            Page::Achievements => {
                let cached = Some(self.data.achievements.clone()).filter(|a| !a.is_empty());
                fallback::resolve(api.fetch_achievements().await, cached, policy, default_achievements)
                    .map(|f| self.apply(f, true, |d, v| d.achievements = v))
            }
        };

        match outcome {
            Ok(source) => {
                self.pages.insert(page, PageStatus::Ready { source });
                debug!(%page, ?source, "page loaded");
                Ok(source)
            }
            Err(e) => {
                self.pages.insert(page, PageStatus::Error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Load every page. Failures are reported per page and do not stop
    /// the others.
    pub async fn load_all(&mut self, api: &dyn StudentApi) -> Vec<(Page, Result<DataSource, CoreError>)> {
        let pages = [
            Page::Budget,
            Page::Expenses,
            Page::Savings,
            Page::Investment,
            Page::Quiz,
            Page::Features,
            Page::Achievements,
        ];
        let mut results = Vec::with_capacity(pages.len());
        for page in pages {
            let result = self.load_page(api, page).await;
            results.push((page, result));
        }
        results
    }

    /// Store fetched data. Remote data replaces local state. Fallback data
    /// never overwrites local records; only static content (features,
    /// achievements) takes its built-in default.
    fn apply<T>(
        &mut self,
        fetched: Fetched<T>,
        keep_default: bool,
        store: impl FnOnce(&mut StudentData, T),
    ) -> DataSource {
        let source = fetched.source;
        let take = match source {
            DataSource::Remote => true,
            DataSource::Default => keep_default,
            DataSource::Cache => false,
        };
        if take {
            store(&mut self.data, fetched.data);
        }
        source
    }

    // ── Remote: writes ──────────────────────────────────────────────
    //
    // Each write goes to the API first. On a remote failure the whole data
    // set is written to `local` instead and the outcome says so.

    pub async fn push_budget(
        &mut self,
        api: &dyn StudentApi,
        local: Option<&dyn LocalFallback>,
    ) -> Result<WriteOutcome, CoreError> {
        let result = api.save_budget(&self.data.budget).await;
        self.settle(result, local)
    }

    /// Send one expense. The API's stored record replaces the local one.
    pub async fn push_expense(
        &mut self,
        api: &dyn StudentApi,
        local: Option<&dyn LocalFallback>,
        id: &RecordId,
    ) -> Result<WriteOutcome, CoreError> {
        let expense = self
            .data
            .expenses
            .iter()
            .find(|e| e.id == *id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("Expense", id))?;
        let result = match api.save_expense(&expense).await {
            Ok(stored) => {
                if let Some(slot) = self.data.expenses.iter_mut().find(|e| e.id == *id) {
                    *slot = stored;
                }
                Ok(())
            }
            Err(e) => Err(e),
        };
        self.settle(result, local)
    }

    /// Delete an expense locally and on the API.
    pub async fn push_expense_delete(
        &mut self,
        api: &dyn StudentApi,
        local: Option<&dyn LocalFallback>,
        id: &RecordId,
    ) -> Result<WriteOutcome, CoreError> {
        self.delete_expense(id)?;
        let result = api.delete_expense(id).await;
        self.settle(result, local)
    }

    pub async fn push_savings_goals(
        &mut self,
        api: &dyn StudentApi,
        local: Option<&dyn LocalFallback>,
    ) -> Result<WriteOutcome, CoreError> {
        let result = api.save_savings_goals(&self.data.savings_goals).await;
        self.settle(result, local)
    }

    /// Contribute locally, then on the API. The API's answer replaces the
    /// local goal.
    pub async fn push_contribution(
        &mut self,
        api: &dyn StudentApi,
        local: Option<&dyn LocalFallback>,
        id: &RecordId,
        amount: f64,
    ) -> Result<WriteOutcome, CoreError> {
        self.contribute(id, amount)?;
        let result = match api.contribute(id, amount).await {
            Ok(stored) => {
                if let Some(slot) = self.data.savings_goals.iter_mut().find(|g| g.id == *id) {
                    *slot = stored;
                }
                Ok(())
            }
            Err(e) => Err(e),
        };
        self.settle(result, local)
    }

    pub async fn push_goal_delete(
        &mut self,
        api: &dyn StudentApi,
        local: Option<&dyn LocalFallback>,
        id: &RecordId,
    ) -> Result<WriteOutcome, CoreError> {
        self.delete_goal(id)?;
        let result = api.delete_savings_goal(id).await;
        self.settle(result, local)
    }

    pub async fn push_investment(
        &mut self,
        api: &dyn StudentApi,
        local: Option<&dyn LocalFallback>,
    ) -> Result<WriteOutcome, CoreError> {
        let result = api.save_investment(&self.data.portfolio).await;
        self.settle(result, local)
    }

    /// Send the most recent quiz result.
    pub async fn push_latest_quiz_result(
        &mut self,
        api: &dyn StudentApi,
        local: Option<&dyn LocalFallback>,
    ) -> Result<WriteOutcome, CoreError> {
        let latest = self
            .data
            .quiz_results
            .last()
            .cloned()
            .ok_or_else(|| CoreError::not_found("Quiz result", "latest"))?;
        let result = api.save_quiz_result(&latest).await;
        self.settle(result, local)
    }

    fn settle(
        &self,
        result: Result<(), CoreError>,
        local: Option<&dyn LocalFallback>,
    ) -> Result<WriteOutcome, CoreError> {
        let data = &self.data;
        fallback::settle_write(result, local.map(|store| move || store.store(data)))
    }
}
