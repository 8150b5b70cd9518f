use serde::{Deserialize, Serialize};

/// Coins credited per level when neither the catalog nor the navigation state says otherwise.
pub const DEFAULT_COINS_PER_LEVEL: u32 = 5;
/// Total coins for a game when nothing else is configured.
pub const DEFAULT_TOTAL_COINS: u32 = 5;
/// Total XP for a game when nothing else is configured.
pub const DEFAULT_TOTAL_XP: u32 = 10;

/// Subject area a mini-game belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameCategory {
    Finance,
    /// Graded quizzes; finishing one logs a `QuizResult`
    Quiz,
    AiForAll,
    DigitalCitizenship,
    Sustainability,
    Wellbeing,
}

impl GameCategory {
    pub const ALL: [GameCategory; 6] = [
        GameCategory::Finance,
        GameCategory::Quiz,
        GameCategory::AiForAll,
        GameCategory::DigitalCitizenship,
        GameCategory::Sustainability,
        GameCategory::Wellbeing,
    ];
}

impl std::fmt::Display for GameCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameCategory::Finance => write!(f, "Finance"),
            GameCategory::Quiz => write!(f, "Quiz"),
            GameCategory::AiForAll => write!(f, "AI for All"),
            GameCategory::DigitalCitizenship => write!(f, "Digital Citizenship"),
            GameCategory::Sustainability => write!(f, "Sustainability"),
            GameCategory::Wellbeing => write!(f, "Wellbeing"),
        }
    }
}

/// One selectable answer of a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub id: String,
    pub text: String,
    pub is_correct: bool,
}

impl Choice {
    pub fn new(id: impl Into<String>, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            is_correct,
        }
    }
}

/// A single question of a mini-game. Immutable once the game is registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: u32,
    pub text: String,
    pub choices: Vec<Choice>,
    /// Shown after the prompt is answered (quiz-style games).
    #[serde(default)]
    pub explanation: Option<String>,
}

impl Prompt {
    pub fn new(id: u32, text: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            id,
            text: text.into(),
            choices,
            explanation: None,
        }
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Look up a choice by id.
    #[must_use]
    pub fn choice(&self, choice_id: &str) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == choice_id)
    }

    /// The first choice flagged as correct.
    #[must_use]
    pub fn correct_choice(&self) -> Option<&Choice> {
        self.choices.iter().find(|c| c.is_correct)
    }
}

/// Declarative configuration of one mini-game.
///
/// Every mini-game in the catalog is just data: the single engine in
/// `games::engine` plays any of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    /// Stable identifier, e.g. `finance-teens-12`.
    pub id: String,
    pub title: String,
    pub category: GameCategory,
    /// Coins awarded per correct answer. Falls back to navigation state, then defaults.
    #[serde(default)]
    pub coins: Option<u32>,
    /// Most coins one completion pays out. Defaults to `coins` when unset.
    #[serde(default)]
    pub total_coins: Option<u32>,
    #[serde(default)]
    pub xp: Option<u32>,
    pub prompts: Vec<Prompt>,
    /// Minimum number of correct answers for the game to count as passed.
    pub pass_threshold: usize,
    /// Per-prompt countdown for reflex-style games.
    #[serde(default)]
    pub time_limit_secs: Option<u32>,
    /// Game to offer after this one finishes.
    #[serde(default)]
    pub next: Option<String>,
}

/// Reward values handed from one game to the next on navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub coins_per_level: u32,
    pub total_coins: u32,
    pub total_xp: u32,
}

/// Reward values a running game actually uses.
///
/// `coins_per_level` is added to the session score for each correct
/// answer; `total_coins` caps what a completion pays into the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRewards {
    pub coins_per_level: u32,
    pub total_coins: u32,
    pub total_xp: u32,
}

impl Default for GameRewards {
    fn default() -> Self {
        Self {
            coins_per_level: DEFAULT_COINS_PER_LEVEL,
            total_coins: DEFAULT_TOTAL_COINS,
            total_xp: DEFAULT_TOTAL_XP,
        }
    }
}

impl From<GameRewards> for NavigationState {
    fn from(r: GameRewards) -> Self {
        Self {
            coins_per_level: r.coins_per_level,
            total_coins: r.total_coins,
            total_xp: r.total_xp,
        }
    }
}
