use serde::{Deserialize, Serialize};

use super::stock::Sector;

/// Summary of the simulator portfolio at the current market prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Simulated day this summary was computed for
    pub day: u32,

    pub cash: f64,

    /// Σ(shares × current price)
    pub investments_value: f64,

    /// cash + investments_value
    pub total_value: f64,

    /// Σ(shares × average price) over open positions
    pub cost_basis: f64,

    /// investments_value − cost_basis
    pub unrealized_gain: f64,

    /// unrealized_gain / cost_basis × 100
    pub unrealized_gain_pct: f64,

    /// Profit locked in by past sells
    pub realized_profit: f64,

    /// (total_value − starting cash) / starting cash × 100
    pub total_return_pct: f64,

    /// Per-position breakdown, largest allocation first
    pub positions: Vec<PositionSummary>,

    /// Value by sector, largest first
    pub sectors: Vec<SectorAllocation>,

    /// Toy risk ratio over the recent history; `None` with too little data.
    /// Cosmetic only, not a real risk metric.
    pub sharpe_ratio: Option<f64>,
}

/// Valuation of a single open position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSummary {
    pub stock_id: u32,
    pub symbol: String,
    pub sector: Sector,
    pub shares: u32,
    pub average_price: f64,
    pub current_price: f64,

    /// shares × current_price
    pub current_value: f64,

    /// current_value − shares × average_price
    pub gain: f64,

    /// gain / (shares × average_price) × 100
    pub gain_pct: f64,

    /// Share of invested value (not total value), 0–100
    pub allocation_pct: f64,
}

/// Current value held in one sector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorAllocation {
    pub sector: Sector,
    pub value: f64,
    /// Share of invested value, 0–100
    pub pct: f64,
}
