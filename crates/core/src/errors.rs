use thiserror::Error;

/// Unified error type for the entire finplay-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Local Store / File ──────────────────────────────────────────
    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Unsupported file version: {0}")]
    UnsupportedVersion(u16),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed: wrong passphrase or corrupted file")]
    Decryption,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({endpoint}): {message}")]
    Api {
        endpoint: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("{kind} not found: {id}")]
    NotFound {
        kind: &'static str,
        id: String,
    },

    #[error("Insufficient cash: order costs {cost:.2} but only {available:.2} is available")]
    InsufficientCash {
        cost: f64,
        available: f64,
    },

    #[error("Insufficient shares of {symbol}: requested {requested}, held {held}")]
    InsufficientShares {
        symbol: String,
        requested: u32,
        held: u32,
    },

    #[error("Simulation complete: day limit of {0} reached")]
    SimulationComplete(u32),

    // ── Game Engine ─────────────────────────────────────────────────
    #[error("Invalid game configuration '{game_id}': {reason}")]
    InvalidGameConfig {
        game_id: String,
        reason: String,
    },

    #[error("Action '{action}' is not allowed while the game is {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: String,
    },

    #[error("No choice selected")]
    NoChoiceSelected,

    #[error("No active game session")]
    NoActiveGame,

    // ── Autosave ────────────────────────────────────────────────────
    #[error("Autosave worker stopped")]
    AutosaveClosed,

    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<bincode::Error> for CoreError {
    fn from(e: bincode::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; drop the query string so tokens
        // passed as parameters never end up in logs.
        let msg = e.to_string();
        let sanitized = match msg.find('?') {
            Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
            None => msg,
        };
        CoreError::Network(sanitized)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<tokio::task::JoinError> for CoreError {
    fn from(e: tokio::task::JoinError) -> Self {
        CoreError::TaskFailed(e.to_string())
    }
}

impl From<aes_gcm::Error> for CoreError {
    fn from(_: aes_gcm::Error) -> Self {
        CoreError::Decryption
    }
}

impl CoreError {
    /// Shorthand for a missing record of the given kind.
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// True for failures caused by the transport or the remote side,
    /// i.e. the ones a local fallback can paper over.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, CoreError::Api { .. } | CoreError::Network(_))
    }
}
