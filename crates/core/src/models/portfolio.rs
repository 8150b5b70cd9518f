use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Virtual cash a new simulator portfolio starts with.
pub const DEFAULT_STARTING_CASH: f64 = 10_000.0;

/// Number of simulated days in one session.
pub const DEFAULT_MAX_DAYS: u32 = 30;

/// A held stock position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub stock_id: u32,
    pub symbol: String,
    pub shares: u32,
    /// Weighted average cost per share
    pub average_price: f64,
    /// Price paid on the first purchase
    pub purchase_price: f64,
}

/// End-of-day portfolio valuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub day: u32,
    pub cash: f64,
    pub investments: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeKind {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeKind::Buy => write!(f, "Buy"),
            TradeKind::Sell => write!(f, "Sell"),
        }
    }
}

/// An executed buy or sell order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub day: u32,
    pub kind: TradeKind,
    pub stock_id: u32,
    pub symbol: String,
    pub shares: u32,
    pub price: f64,
    /// price × shares
    pub total: f64,
    /// Realized profit; only set for sells
    #[serde(default)]
    pub profit: Option<f64>,
}

/// Phase of the 30-day simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationPhase {
    /// Nothing simulated or traded yet
    Ready,
    Playing { day: u32 },
    /// Day limit reached; no more market days
    Done,
}

/// The student's simulator portfolio. Body of `GET/POST /student/investment`.
///
/// Invariant: total value = cash + Σ(shares × current price).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub cash: f64,
    #[serde(default)]
    pub investments: Vec<Position>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Stock ids the student is watching
    #[serde(default)]
    pub watchlist: Vec<u32>,
    pub current_day: u32,
}

impl Default for Portfolio {
    fn default() -> Self {
        Self::with_cash(DEFAULT_STARTING_CASH)
    }
}

impl Portfolio {
    /// Fresh portfolio on day 1 with the given cash.
    pub fn with_cash(cash: f64) -> Self {
        Self {
            cash,
            investments: Vec::new(),
            history: Vec::new(),
            transactions: Vec::new(),
            watchlist: Vec::new(),
            current_day: 1,
        }
    }

    #[must_use]
    pub fn position(&self, stock_id: u32) -> Option<&Position> {
        self.investments.iter().find(|p| p.stock_id == stock_id)
    }

    /// Shares held of a stock (0 when there is no position).
    #[must_use]
    pub fn shares_of(&self, stock_id: u32) -> u32 {
        self.position(stock_id).map_or(0, |p| p.shares)
    }

    /// Sum of realized profit across all sells.
    #[must_use]
    pub fn realized_profit(&self) -> f64 {
        self.transactions.iter().filter_map(|t| t.profit).sum()
    }

    /// Current phase given the session's day limit.
    #[must_use]
    pub fn phase(&self, max_days: u32) -> SimulationPhase {
        if self.current_day >= max_days {
            SimulationPhase::Done
        } else if self.history.is_empty() && self.transactions.is_empty() {
            SimulationPhase::Ready
        } else {
            SimulationPhase::Playing {
                day: self.current_day,
            }
        }
    }
}

/// What a sell returned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaleReceipt {
    pub proceeds: f64,
    pub profit: f64,
    /// True when the sale liquidated the whole position
    pub position_closed: bool,
}
