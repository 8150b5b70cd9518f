use serde::{Deserialize, Serialize};

/// Lifecycle of a single game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created but not started yet
    Idle,
    /// Waiting for the player to pick and confirm a choice
    Playing,
    /// Current prompt answered; waiting for `advance`
    Answered,
    /// All prompts exhausted; summary available
    Finished,
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GamePhase::Idle => write!(f, "idle"),
            GamePhase::Playing => write!(f, "playing"),
            GamePhase::Answered => write!(f, "answered"),
            GamePhase::Finished => write!(f, "finished"),
        }
    }
}

/// What happened on one prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub prompt_id: u32,
    /// `None` when the countdown ran out before a choice was confirmed.
    pub choice_id: Option<String>,
    pub correct: bool,
    pub coins_awarded: u32,
}

/// Result of confirming (or timing out on) a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub coins_awarded: u32,
    pub timed_out: bool,
    /// Id of the correct choice, so the shell can highlight it.
    pub correct_choice_id: Option<String>,
    pub explanation: Option<String>,
    /// True when this was the last prompt.
    pub last_prompt: bool,
}

/// End-of-game summary shown by the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: String,
    pub correct: usize,
    pub total: usize,
    /// Coins won in the session, capped at the game's `total_coins`
    pub coins: u32,
    pub xp: u32,
    pub passed: bool,
}

impl GameSummary {
    /// Share of correct answers, 0–100.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64 * 100.0
    }
}

/// Header data for the game shell: title, progress, score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellView {
    pub title: String,
    /// 1-based number of the prompt being shown
    pub current_level: usize,
    pub total_levels: usize,
    pub score: usize,
    pub coins: u32,
    pub time_left: Option<u32>,
    pub phase: GamePhase,
    /// Whether the "next" control is enabled
    pub can_advance: bool,
    /// Whether the confirm control is enabled
    pub can_confirm: bool,
}
