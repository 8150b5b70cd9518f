use serde::{Deserialize, Serialize};

use crate::games::feedback::RewardLedger;

use super::budget::Budget;
use super::content::{Achievement, Feature};
use super::expense::Expense;
use super::portfolio::Portfolio;
use super::quiz::QuizResult;
use super::savings::SavingsGoal;
use super::settings::Settings;

/// Everything the student owns on this device. This is what gets
/// serialized, encrypted and written to the local fallback store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentData {
    pub settings: Settings,

    pub budget: Budget,

    pub expenses: Vec<Expense>,

    pub savings_goals: Vec<SavingsGoal>,

    /// Investment simulator portfolio
    pub portfolio: Portfolio,

    pub quiz_results: Vec<QuizResult>,

    /// Coins and XP earned across games
    pub rewards: RewardLedger,

    /// Last feature cards seen from the API
    #[serde(default)]
    pub features: Vec<Feature>,

    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

impl Default for StudentData {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

impl StudentData {
    /// Empty data set; the simulator starts with the configured cash.
    pub fn with_settings(settings: Settings) -> Self {
        let portfolio = Portfolio::with_cash(settings.starting_cash);
        Self {
            settings,
            budget: Budget::default(),
            expenses: Vec::new(),
            savings_goals: Vec::new(),
            portfolio,
            quiz_results: Vec::new(),
            rewards: RewardLedger::default(),
            features: Vec::new(),
            achievements: Vec::new(),
        }
    }
}
