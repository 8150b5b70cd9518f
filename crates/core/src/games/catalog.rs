use std::collections::HashSet;

use tracing::debug;

use crate::errors::CoreError;
use crate::models::game::{
    GameCategory, GameConfig, GameRewards, NavigationState, DEFAULT_COINS_PER_LEVEL,
    DEFAULT_TOTAL_COINS, DEFAULT_TOTAL_XP,
};

/// Built-in game definitions, compiled into the library.
const BUILTIN_GAMES: &str = include_str!("../../data/games.json");

/// Registry mapping game id → declarative game configuration.
///
/// Games are kept in registration order; that order defines which game
/// comes next when a config has no explicit `next`.
#[derive(Debug, Clone, Default)]
pub struct GameCatalog {
    games: Vec<GameConfig>,
}

impl GameCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self { games: Vec::new() }
    }

    /// Catalog with all built-in games.
    pub fn builtin() -> Result<Self, CoreError> {
        Self::from_json(BUILTIN_GAMES)
    }

    /// Build a catalog from a JSON array of game configs.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let configs: Vec<GameConfig> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for config in configs {
            catalog.register(config)?;
        }
        debug!(games = catalog.len(), "game catalog loaded");
        Ok(catalog)
    }

    /// Validate and add a game. Ids must be unique.
    pub fn register(&mut self, config: GameConfig) -> Result<(), CoreError> {
        validate_config(&config)?;
        if self.get(&config.id).is_some() {
            return Err(CoreError::InvalidGameConfig {
                game_id: config.id,
                reason: "a game with this id is already registered".into(),
            });
        }
        self.games.push(config);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, game_id: &str) -> Option<&GameConfig> {
        self.games.iter().find(|g| g.id == game_id)
    }

    /// Like `get`, but a missing game is an error.
    pub fn require(&self, game_id: &str) -> Result<&GameConfig, CoreError> {
        self.get(game_id)
            .ok_or_else(|| CoreError::not_found("Game", game_id))
    }

    /// All games of a category, in registration order.
    #[must_use]
    pub fn games_in(&self, category: GameCategory) -> Vec<&GameConfig> {
        self.games.iter().filter(|g| g.category == category).collect()
    }

    /// All game ids, in registration order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.games.iter().map(|g| g.id.as_str()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// The game to offer after `game_id`: its explicit `next`, otherwise
    /// the following game of the same category.
    #[must_use]
    pub fn next_after(&self, game_id: &str) -> Option<&GameConfig> {
        let idx = self.games.iter().position(|g| g.id == game_id)?;
        let current = &self.games[idx];
        if let Some(next_id) = &current.next {
            return self.get(next_id);
        }
        self.games[idx + 1..]
            .iter()
            .find(|g| g.category == current.category)
    }

    /// Rewards a game runs with: the catalog's value wins, then the value
    /// handed over in navigation state, then the defaults. Zero counts as unset.
    /// A catalog `coins` without `totalCoins` sets both.
    #[must_use]
    pub fn resolve_rewards(&self, game_id: &str, nav: Option<&NavigationState>) -> GameRewards {
        let config = self.get(game_id);
        let nonzero = |v: Option<u32>| v.filter(|v| *v > 0);
        let coins = nonzero(config.and_then(|c| c.coins));
        let total = nonzero(config.and_then(|c| c.total_coins)).or(coins);
        let xp = nonzero(config.and_then(|c| c.xp));

        GameRewards {
            coins_per_level: coins
                .or_else(|| nav.and_then(|n| nonzero(Some(n.coins_per_level))))
                .unwrap_or(DEFAULT_COINS_PER_LEVEL),
            total_coins: total
                .or_else(|| nav.and_then(|n| nonzero(Some(n.total_coins))))
                .unwrap_or(DEFAULT_TOTAL_COINS),
            total_xp: xp
                .or_else(|| nav.and_then(|n| nonzero(Some(n.total_xp))))
                .unwrap_or(DEFAULT_TOTAL_XP),
        }
    }
}

/// Structural checks every game must pass before it can be played.
///
/// Rules:
/// - At least one prompt, with unique prompt ids
/// - Every prompt has at least two choices with unique ids
/// - Every prompt has at least one correct choice
/// - The pass threshold does not exceed the number of prompts
/// - A countdown, if any, is at least one second
pub fn validate_config(config: &GameConfig) -> Result<(), CoreError> {
    let invalid = |reason: String| CoreError::InvalidGameConfig {
        game_id: config.id.clone(),
        reason,
    };

    if config.id.trim().is_empty() {
        return Err(invalid("game id must not be empty".into()));
    }
    if config.prompts.is_empty() {
        return Err(invalid("game has no prompts".into()));
    }

    let mut prompt_ids = HashSet::new();
    for prompt in &config.prompts {
        if !prompt_ids.insert(prompt.id) {
            return Err(invalid(format!("duplicate prompt id {}", prompt.id)));
        }
        if prompt.choices.len() < 2 {
            return Err(invalid(format!("prompt {} needs at least two choices", prompt.id)));
        }
        let mut choice_ids = HashSet::new();
        for choice in &prompt.choices {
            if !choice_ids.insert(choice.id.as_str()) {
                return Err(invalid(format!(
                    "prompt {} has duplicate choice id '{}'",
                    prompt.id, choice.id
                )));
            }
        }
        if prompt.correct_choice().is_none() {
            return Err(invalid(format!("prompt {} has no correct choice", prompt.id)));
        }
    }

    if config.pass_threshold > config.prompts.len() {
        return Err(invalid(format!(
            "pass threshold {} exceeds the {} prompts",
            config.pass_threshold,
            config.prompts.len()
        )));
    }
    if config.time_limit_secs == Some(0) {
        return Err(invalid("time limit must be at least one second".into()));
    }

    Ok(())
}
