use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::portfolio::{
    HistoryEntry, Portfolio, Position, SaleReceipt, TradeKind, Transaction,
};
use crate::services::market::Market;

/// Trades and day steps of the investment simulator.
///
/// Pure business logic: operates on a `Portfolio` against the prices of a
/// `Market`. Every successful trade appends a `Transaction`.
pub struct InvestmentService;

impl InvestmentService {
    pub fn new() -> Self {
        Self
    }

    /// Buy `quantity` shares at the stock's current price.
    ///
    /// Rejects zero quantities and orders costing more than the available cash.
    /// The position's average price becomes the weighted average of the old
    /// cost basis and this purchase.
    pub fn buy(
        &self,
        portfolio: &mut Portfolio,
        market: &Market,
        stock_id: u32,
        quantity: u32,
    ) -> Result<Transaction, CoreError> {
        if quantity == 0 {
            return Err(CoreError::ValidationError(
                "quantity must be greater than zero".into(),
            ));
        }
        let stock = market.require(stock_id)?;
        let price = stock.price;
        let cost = price * f64::from(quantity);
        if cost > portfolio.cash {
            return Err(CoreError::InsufficientCash {
                cost,
                available: portfolio.cash,
            });
        }

        match portfolio.investments.iter_mut().find(|p| p.stock_id == stock_id) {
            Some(position) => {
                let old_shares = f64::from(position.shares);
                position.average_price =
                    (position.average_price * old_shares + cost) / (old_shares + f64::from(quantity));
                position.shares += quantity;
            }
            None => portfolio.investments.push(Position {
                stock_id,
                symbol: stock.symbol.clone(),
                shares: quantity,
                average_price: price,
                purchase_price: price,
            }),
        }
        portfolio.cash -= cost;

        let tx = Transaction {
            id: Uuid::new_v4(),
            day: portfolio.current_day,
            kind: TradeKind::Buy,
            stock_id,
            symbol: stock.symbol.clone(),
            shares: quantity,
            price,
            total: cost,
            profit: None,
        };
        info!(symbol = %tx.symbol, shares = quantity, price, cash = portfolio.cash, "bought shares");
        portfolio.transactions.push(tx.clone());
        Ok(tx)
    }

    /// Sell `quantity` shares at the stock's current price.
    ///
    /// Realizes `(price − average price) × quantity` and removes the
    /// position once no shares remain.
    pub fn sell(
        &self,
        portfolio: &mut Portfolio,
        market: &Market,
        stock_id: u32,
        quantity: u32,
    ) -> Result<SaleReceipt, CoreError> {
        if quantity == 0 {
            return Err(CoreError::ValidationError(
                "quantity must be greater than zero".into(),
            ));
        }
        let idx = portfolio
            .investments
            .iter()
            .position(|p| p.stock_id == stock_id)
            .ok_or_else(|| CoreError::not_found("Position", stock_id))?;
        let price = market.price_of(stock_id)?;

        let position = &mut portfolio.investments[idx];
        if quantity > position.shares {
            return Err(CoreError::InsufficientShares {
                symbol: position.symbol.clone(),
                requested: quantity,
                held: position.shares,
            });
        }

        let proceeds = price * f64::from(quantity);
        let profit = (price - position.average_price) * f64::from(quantity);
        let symbol = position.symbol.clone();
        position.shares -= quantity;
        let position_closed = position.shares == 0;
        if position_closed {
            portfolio.investments.remove(idx);
        }
        portfolio.cash += proceeds;

        portfolio.transactions.push(Transaction {
            id: Uuid::new_v4(),
            day: portfolio.current_day,
            kind: TradeKind::Sell,
            stock_id,
            symbol: symbol.clone(),
            shares: quantity,
            price,
            total: proceeds,
            profit: Some(profit),
        });
        info!(%symbol, shares = quantity, price, profit, position_closed, "sold shares");

        Ok(SaleReceipt {
            proceeds,
            profit,
            position_closed,
        })
    }

    /// Liquidate a whole position.
    pub fn sell_all(
        &self,
        portfolio: &mut Portfolio,
        market: &Market,
        stock_id: u32,
    ) -> Result<SaleReceipt, CoreError> {
        let shares = portfolio
            .position(stock_id)
            .map(|p| p.shares)
            .ok_or_else(|| CoreError::not_found("Position", stock_id))?;
        self.sell(portfolio, market, stock_id, shares)
    }

    /// Simulate one market day.
    ///
    /// Moves every stock's price, records the end-of-day valuation for the
    /// current day and then advances the day counter. Fails once the day
    /// limit is reached.
    pub fn simulate_day(
        &self,
        portfolio: &mut Portfolio,
        market: &mut Market,
        max_days: u32,
    ) -> Result<HistoryEntry, CoreError> {
        if portfolio.current_day >= max_days {
            return Err(CoreError::SimulationComplete(max_days));
        }

        let day = portfolio.current_day;
        market.advance(day);

        let investments = self.investments_value(portfolio, market);
        let entry = HistoryEntry {
            day,
            cash: portfolio.cash,
            investments,
            total: portfolio.cash + investments,
        };
        portfolio.history.push(entry);
        portfolio.current_day += 1;

        debug!(day, total = entry.total, "market day simulated");
        Ok(entry)
    }

    /// Σ(shares × current price). Positions on stocks unknown to the market
    /// count as zero.
    #[must_use]
    pub fn investments_value(&self, portfolio: &Portfolio, market: &Market) -> f64 {
        portfolio
            .investments
            .iter()
            .filter_map(|p| market.stock(p.stock_id).map(|s| s.price * f64::from(p.shares)))
            .sum()
    }

    /// cash + Σ(shares × current price).
    #[must_use]
    pub fn total_value(&self, portfolio: &Portfolio, market: &Market) -> f64 {
        portfolio.cash + self.investments_value(portfolio, market)
    }

    /// Add a stock to the watchlist. Returns false if it was already there.
    pub fn watch(
        &self,
        portfolio: &mut Portfolio,
        market: &Market,
        stock_id: u32,
    ) -> Result<bool, CoreError> {
        market.require(stock_id)?;
        if portfolio.watchlist.contains(&stock_id) {
            return Ok(false);
        }
        portfolio.watchlist.push(stock_id);
        Ok(true)
    }

    /// Remove a stock from the watchlist. Returns false if it was not watched.
    pub fn unwatch(&self, portfolio: &mut Portfolio, stock_id: u32) -> bool {
        let before = portfolio.watchlist.len();
        portfolio.watchlist.retain(|id| *id != stock_id);
        portfolio.watchlist.len() != before
    }

    /// Transactions, newest first.
    pub fn transactions<'a>(&self, portfolio: &'a Portfolio) -> Vec<&'a Transaction> {
        portfolio.transactions.iter().rev().collect()
    }
}

impl Default for InvestmentService {
    fn default() -> Self {
        Self::new()
    }
}
