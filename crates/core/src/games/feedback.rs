use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

use crate::models::session::GameSummary;

/// A transient celebration the UI should play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackEvent {
    /// "+N" flash over the board
    ScoreFlash { points: u32 },
    /// Confetti burst for a correct answer
    AnswerConfetti,
    /// Red highlight on a wrong or timed-out answer
    WrongAnswer,
    /// End-of-game confetti for a passed game
    GameConfetti,
}

/// Collects feedback for the current prompt until the shell drains it.
#[derive(Debug, Clone, Default)]
pub struct FeedbackHook {
    pending: Vec<FeedbackEvent>,
}

impl FeedbackHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a coin delta for a correct answer, optionally with confetti.
    pub fn show_correct_answer(&mut self, points: u32, confetti: bool) {
        self.pending.push(FeedbackEvent::ScoreFlash { points });
        if confetti {
            self.pending.push(FeedbackEvent::AnswerConfetti);
        }
    }

    pub fn show_wrong_answer(&mut self) {
        self.pending.push(FeedbackEvent::WrongAnswer);
    }

    pub fn show_game_confetti(&mut self) {
        self.pending.push(FeedbackEvent::GameConfetti);
    }

    /// Drop anything not yet shown.
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Take all pending events, oldest first.
    pub fn drain(&mut self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Per-game completion record kept in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameCompletion {
    pub game_id: String,
    pub plays: u32,
    pub best_correct: usize,
    pub total: usize,
    /// Coins credited for this game (only the first completion pays out)
    pub coins_earned: u32,
    pub xp_earned: u32,
    pub last_played: DateTime<Utc>,
}

/// What the ledger credited for one finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardGrant {
    pub coins: u32,
    pub xp: u32,
    pub first_completion: bool,
}

/// Coins and XP the student has earned across all games.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardLedger {
    pub total_coins: u64,
    pub total_xp: u64,
    pub completions: HashMap<String, GameCompletion>,
}

impl RewardLedger {
    /// Record a finished game. Coins and XP are credited on the first
    /// completion only; replays update the play count and best score.
    pub fn record(&mut self, summary: &GameSummary) -> RewardGrant {
        let now = Utc::now();
        match self.completions.get_mut(&summary.game_id) {
            Some(existing) => {
                existing.plays += 1;
                existing.best_correct = existing.best_correct.max(summary.correct);
                existing.last_played = now;
                info!(game = %summary.game_id, plays = existing.plays, "game replayed, no coins credited");
                RewardGrant {
                    coins: 0,
                    xp: 0,
                    first_completion: false,
                }
            }
            None => {
                self.total_coins += u64::from(summary.coins);
                self.total_xp += u64::from(summary.xp);
                self.completions.insert(
                    summary.game_id.clone(),
                    GameCompletion {
                        game_id: summary.game_id.clone(),
                        plays: 1,
                        best_correct: summary.correct,
                        total: summary.total,
                        coins_earned: summary.coins,
                        xp_earned: summary.xp,
                        last_played: now,
                    },
                );
                info!(game = %summary.game_id, coins = summary.coins, xp = summary.xp, "game completed");
                RewardGrant {
                    coins: summary.coins,
                    xp: summary.xp,
                    first_completion: true,
                }
            }
        }
    }

    #[must_use]
    pub fn has_completed(&self, game_id: &str) -> bool {
        self.completions.contains_key(game_id)
    }

    #[must_use]
    pub fn completion(&self, game_id: &str) -> Option<&GameCompletion> {
        self.completions.get(game_id)
    }
}
