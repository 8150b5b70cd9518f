use std::collections::HashMap;

use crate::models::analytics::{PortfolioSummary, PositionSummary, SectorAllocation};
use crate::models::portfolio::{HistoryEntry, Portfolio};
use crate::models::stock::Sector;
use crate::services::investment_service::InvestmentService;
use crate::services::market::Market;

/// Number of recent history entries the risk ratio looks at.
pub const SHARPE_WINDOW: usize = 30;

/// Computes simulator analytics: gain/loss, allocation breakdown, risk ratio.
///
/// All values use the market's current prices.
pub struct AnalyticsService {
    investment_service: InvestmentService,
}

impl AnalyticsService {
    pub fn new() -> Self {
        Self {
            investment_service: InvestmentService::new(),
        }
    }

    /// Full portfolio summary at the current market prices.
    ///
    /// `starting_cash` is the cash the session began with; it anchors the
    /// total return.
    pub fn summary(
        &self,
        portfolio: &Portfolio,
        market: &Market,
        starting_cash: f64,
    ) -> PortfolioSummary {
        let investments_value = self.investment_service.investments_value(portfolio, market);
        let total_value = portfolio.cash + investments_value;

        // 1. Per-position valuation
        let mut positions: Vec<PositionSummary> = portfolio
            .investments
            .iter()
            .filter_map(|p| {
                let stock = market.stock(p.stock_id)?;
                let shares = f64::from(p.shares);
                let current_value = stock.price * shares;
                let cost = p.average_price * shares;
                let gain = current_value - cost;
                Some(PositionSummary {
                    stock_id: p.stock_id,
                    symbol: p.symbol.clone(),
                    sector: stock.sector,
                    shares: p.shares,
                    average_price: p.average_price,
                    current_price: stock.price,
                    current_value,
                    gain,
                    gain_pct: percent(gain, cost),
                    allocation_pct: percent(current_value, investments_value),
                })
            })
            .collect();

        // Largest allocation first
        positions.sort_by(|a, b| {
            b.allocation_pct
                .partial_cmp(&a.allocation_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // 2. Totals
        let cost_basis: f64 = positions
            .iter()
            .map(|p| p.average_price * f64::from(p.shares))
            .sum();
        let unrealized_gain = investments_value - cost_basis;

        PortfolioSummary {
            day: portfolio.current_day,
            cash: portfolio.cash,
            investments_value,
            total_value,
            cost_basis,
            unrealized_gain,
            unrealized_gain_pct: percent(unrealized_gain, cost_basis),
            realized_profit: portfolio.realized_profit(),
            total_return_pct: percent(total_value - starting_cash, starting_cash),
            sectors: self.sector_allocation(portfolio, market),
            positions,
            sharpe_ratio: self.sharpe_ratio(&portfolio.history),
        }
    }

    /// Current value per sector, largest first. Percentages are shares of
    /// the invested value, not of total value.
    #[must_use]
    pub fn sector_allocation(&self, portfolio: &Portfolio, market: &Market) -> Vec<SectorAllocation> {
        let mut by_sector: HashMap<Sector, f64> = HashMap::new();
        for position in &portfolio.investments {
            if let Some(stock) = market.stock(position.stock_id) {
                *by_sector.entry(stock.sector).or_insert(0.0) +=
                    stock.price * f64::from(position.shares);
            }
        }
        let invested: f64 = by_sector.values().sum();

        let mut sectors: Vec<SectorAllocation> = by_sector
            .into_iter()
            .map(|(sector, value)| SectorAllocation {
                sector,
                value,
                pct: percent(value, invested),
            })
            .collect();
        sectors.sort_by(|a, b| {
            b.value
                .partial_cmp(&a.value)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.sector.cmp(&b.sector))
        });
        sectors
    }

    /// Toy risk ratio: mean / standard deviation of the daily percentage
    /// returns of total value over the last `SHARPE_WINDOW` history entries.
    ///
    /// Returns `None` with fewer than two returns or when returns never vary.
    /// Cosmetic only: no risk-free rate, no annualization.
    #[must_use]
    pub fn sharpe_ratio(&self, history: &[HistoryEntry]) -> Option<f64> {
        let window = &history[history.len().saturating_sub(SHARPE_WINDOW)..];
        let returns: Vec<f64> = window
            .windows(2)
            .filter(|w| w[0].total > 0.0)
            .map(|w| (w[1].total - w[0].total) / w[0].total * 100.0)
            .collect();
        if returns.len() < 2 {
            return None;
        }

        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
        let stdev = variance.sqrt();
        if stdev <= f64::EPSILON {
            return None;
        }
        Some(mean / stdev)
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}

/// `part / whole × 100`, or 0 when `whole` is not positive.
fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}
