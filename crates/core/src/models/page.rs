use serde::{Deserialize, Serialize};

/// The finance pages backed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Page {
    Budget,
    Expenses,
    Savings,
    Investment,
    Quiz,
    Features,
    Achievements,
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Page::Budget => write!(f, "budget"),
            Page::Expenses => write!(f, "expenses"),
            Page::Savings => write!(f, "savings"),
            Page::Investment => write!(f, "investment"),
            Page::Quiz => write!(f, "quiz"),
            Page::Features => write!(f, "features"),
            Page::Achievements => write!(f, "achievements"),
        }
    }
}

/// Where a page's data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    /// Fresh from the API
    Remote,
    /// Last locally known data
    Cache,
    /// Built-in default
    Default,
}

/// Load state of one page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageStatus {
    #[default]
    Idle,
    Loading,
    Ready {
        source: DataSource,
    },
    Error(String),
}

impl PageStatus {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, PageStatus::Ready { .. })
    }
}
