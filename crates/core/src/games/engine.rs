use tracing::debug;

use crate::errors::CoreError;
use crate::models::game::{GameConfig, GameRewards, Prompt};
use crate::models::session::{
    AnswerOutcome, AnswerRecord, GamePhase, GameSummary, ShellView,
};

use super::catalog::validate_config;
use super::feedback::{FeedbackEvent, FeedbackHook};

/// One play-through of a mini-game.
///
/// State machine:
/// ```text
/// Idle --start--> Playing --confirm/timeout--> Answered --advance--> Playing
///                                                       \--advance (last)--> Finished
/// any --reset--> Playing (prompt 0, score 0)
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    rewards: GameRewards,
    phase: GamePhase,
    current_index: usize,
    selected: Option<String>,
    coins: u32,
    correct: usize,
    answers: Vec<AnswerRecord>,
    time_left: Option<u32>,
    feedback: FeedbackHook,
}

impl GameSession {
    /// Create an idle session for a game.
    pub fn new(config: GameConfig, rewards: GameRewards) -> Result<Self, CoreError> {
        validate_config(&config)?;
        Ok(Self {
            config,
            rewards,
            phase: GamePhase::Idle,
            current_index: 0,
            selected: None,
            coins: 0,
            correct: 0,
            answers: Vec::new(),
            time_left: None,
            feedback: FeedbackHook::new(),
        })
    }

    /// Show the first prompt.
    pub fn start(&mut self) -> Result<(), CoreError> {
        self.expect_phase(GamePhase::Idle, "start")?;
        self.phase = GamePhase::Playing;
        self.time_left = self.config.time_limit_secs;
        debug!(game = %self.config.id, "game started");
        Ok(())
    }

    /// Pick (or change) the choice for the current prompt.
    pub fn select(&mut self, choice_id: &str) -> Result<(), CoreError> {
        self.expect_phase(GamePhase::Playing, "select")?;
        let prompt = self.prompt_at_cursor();
        if prompt.choice(choice_id).is_none() {
            return Err(CoreError::ValidationError(format!(
                "prompt {} has no choice '{choice_id}'",
                prompt.id
            )));
        }
        self.selected = Some(choice_id.to_string());
        Ok(())
    }

    /// Confirm the selected choice. Rejected until a choice is selected.
    pub fn confirm(&mut self) -> Result<AnswerOutcome, CoreError> {
        self.expect_phase(GamePhase::Playing, "confirm")?;
        let choice_id = self.selected.clone().ok_or(CoreError::NoChoiceSelected)?;
        Ok(self.settle(Some(choice_id)))
    }

    /// Select and confirm in one step.
    pub fn answer(&mut self, choice_id: &str) -> Result<AnswerOutcome, CoreError> {
        self.select(choice_id)?;
        self.confirm()
    }

    /// Advance the countdown. When it hits zero the current prompt is
    /// answered as incorrect and the outcome is returned.
    /// Games without a time limit ignore ticks.
    pub fn tick(&mut self, elapsed_secs: u32) -> Result<Option<AnswerOutcome>, CoreError> {
        if self.phase != GamePhase::Playing {
            return Ok(None);
        }
        let Some(left) = self.time_left else {
            return Ok(None);
        };
        let left = left.saturating_sub(elapsed_secs);
        self.time_left = Some(left);
        if left > 0 {
            return Ok(None);
        }
        debug!(game = %self.config.id, prompt = self.current_index, "countdown expired");
        Ok(Some(self.settle(None)))
    }

    /// Move on after an answer: next prompt, or the end-of-game summary.
    pub fn advance(&mut self) -> Result<GamePhase, CoreError> {
        self.expect_phase(GamePhase::Answered, "advance")?;
        self.feedback.reset();
        if self.current_index + 1 >= self.config.prompts.len() {
            self.phase = GamePhase::Finished;
            self.time_left = None;
            if self.passed() {
                self.feedback.show_game_confetti();
            }
            debug!(game = %self.config.id, correct = self.correct, coins = self.coins, "game finished");
        } else {
            self.current_index += 1;
            self.selected = None;
            self.time_left = self.config.time_limit_secs;
            self.phase = GamePhase::Playing;
        }
        Ok(self.phase)
    }

    /// "Try again": back to the first prompt with a clean score.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Playing;
        self.current_index = 0;
        self.selected = None;
        self.coins = 0;
        self.correct = 0;
        self.answers.clear();
        self.time_left = self.config.time_limit_secs;
        self.feedback.reset();
    }

    /// End-of-game summary; only available once finished.
    #[must_use]
    pub fn summary(&self) -> Option<GameSummary> {
        if self.phase != GamePhase::Finished {
            return None;
        }
        let passed = self.passed();
        Some(GameSummary {
            game_id: self.config.id.clone(),
            correct: self.correct,
            total: self.config.prompts.len(),
            coins: self.coins.min(self.rewards.total_coins),
            xp: if passed { self.rewards.total_xp } else { 0 },
            passed,
        })
    }

    /// Title, progress and score for the game shell.
    #[must_use]
    pub fn shell_view(&self) -> ShellView {
        ShellView {
            title: self.config.title.clone(),
            current_level: (self.current_index + 1).min(self.config.prompts.len()),
            total_levels: self.config.prompts.len(),
            score: self.correct,
            coins: self.coins,
            time_left: self.time_left,
            phase: self.phase,
            can_advance: self.phase == GamePhase::Answered,
            can_confirm: self.phase == GamePhase::Playing && self.selected.is_some(),
        }
    }

    /// Prompt currently on screen; `None` before start and after the end.
    #[must_use]
    pub fn current_prompt(&self) -> Option<&Prompt> {
        match self.phase {
            GamePhase::Playing | GamePhase::Answered => self.config.prompts.get(self.current_index),
            GamePhase::Idle | GamePhase::Finished => None,
        }
    }

    /// Take the feedback events produced since the last drain.
    pub fn drain_feedback(&mut self) -> Vec<FeedbackEvent> {
        self.feedback.drain()
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn coins(&self) -> u32 {
        self.coins
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[must_use]
    pub fn time_left(&self) -> Option<u32> {
        self.time_left
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn rewards(&self) -> GameRewards {
        self.rewards
    }

    // ── Internal ────────────────────────────────────────────────────

    fn prompt_at_cursor(&self) -> &Prompt {
        // current_index is bounded by advance(); validate_config guarantees prompts
        &self.config.prompts[self.current_index]
    }

    fn passed(&self) -> bool {
        self.correct >= self.config.pass_threshold
    }

    /// Score the current prompt. `None` means the countdown ran out.
    fn settle(&mut self, choice_id: Option<String>) -> AnswerOutcome {
        let prompt = self.prompt_at_cursor();
        let correct = choice_id
            .as_deref()
            .and_then(|id| prompt.choice(id))
            .is_some_and(|c| c.is_correct);
        let prompt_id = prompt.id;
        let correct_choice_id = prompt.correct_choice().map(|c| c.id.clone());
        let explanation = prompt.explanation.clone();

        let coins_awarded = if correct { self.rewards.coins_per_level } else { 0 };
        self.feedback.reset();
        if correct {
            self.correct += 1;
            self.coins += coins_awarded;
            self.feedback.show_correct_answer(coins_awarded, true);
        } else {
            self.feedback.show_wrong_answer();
        }

        let timed_out = choice_id.is_none();
        self.answers.push(AnswerRecord {
            prompt_id,
            choice_id,
            correct,
            coins_awarded,
        });
        self.phase = GamePhase::Answered;

        AnswerOutcome {
            correct,
            coins_awarded,
            timed_out,
            correct_choice_id,
            explanation,
            last_prompt: self.current_index + 1 == self.config.prompts.len(),
        }
    }

    fn expect_phase(&self, expected: GamePhase, action: &'static str) -> Result<(), CoreError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                action,
                phase: self.phase.to_string(),
            })
        }
    }
}
