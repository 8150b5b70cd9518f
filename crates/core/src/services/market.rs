use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::errors::CoreError;
use crate::models::stock::{DayPrice, Sector, Stock};

/// Prices never fall below one cent.
pub const PRICE_FLOOR: f64 = 0.01;

/// Amplitude of the sinusoidal market trend per day.
const TREND_AMPLITUDE: f64 = 0.02;

/// Initial prices are drawn from `[MIN_START_PRICE, MAX_START_PRICE)`.
const MIN_START_PRICE: f64 = 20.0;
const MAX_START_PRICE: f64 = 120.0;

/// (symbol, name, sector, volatility) of the default universe.
const DEFAULT_UNIVERSE: [(&str, &str, Sector, f64); 8] = [
    ("TECH", "TechCorp", Sector::Technology, 0.05),
    ("FNCE", "FinanceHub", Sector::Finance, 0.03),
    ("HLTH", "HealthPlus", Sector::Healthcare, 0.04),
    ("ENRG", "EnergyNow", Sector::Energy, 0.06),
    ("CONS", "ConsumerGoods", Sector::Consumer, 0.02),
    ("MANF", "Manufacturing Inc", Sector::Industrial, 0.04),
    ("RETL", "RetailGiant", Sector::Retail, 0.03),
    ("FOOD", "FoodServices", Sector::Food, 0.02),
];

/// Round a price to whole cents.
#[must_use]
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Trend component of the daily move: `sin(day / 10) × 0.02`.
#[must_use]
pub fn trend(day: u32) -> f64 {
    (f64::from(day) / 10.0).sin() * TREND_AMPLITUDE
}

/// Next price from the current one:
/// `max(0.01, price + price × (trend + noise))`, rounded to cents.
///
/// `noise_unit` is a draw from `[-1, 1]` and is scaled by `volatility`.
#[must_use]
pub fn next_price(price: f64, day: u32, volatility: f64, noise_unit: f64) -> f64 {
    let change = trend(day) + volatility * noise_unit;
    round_cents((price + price * change).max(PRICE_FLOOR)).max(PRICE_FLOOR)
}

/// The simulator's synthetic stock market.
///
/// Owns the stock universe and the random source driving the price walk.
/// Seeding the market makes a whole simulation reproducible.
#[derive(Debug, Clone)]
pub struct Market {
    stocks: Vec<Stock>,
    rng: StdRng,
}

impl Market {
    /// The default 8-stock universe with random starting prices.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic default universe.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut rng: StdRng) -> Self {
        let stocks = DEFAULT_UNIVERSE
            .iter()
            .zip(1u32..)
            .map(|(&(symbol, name, sector, volatility), id)| {
                let price = round_cents(rng.gen_range(MIN_START_PRICE..MAX_START_PRICE));
                Stock::new(id, symbol, name, sector, price, volatility)
            })
            .collect();
        Self { stocks, rng }
    }

    /// A market over caller-supplied stocks. Ids must be unique.
    pub fn from_stocks(stocks: Vec<Stock>, seed: u64) -> Result<Self, CoreError> {
        for (i, stock) in stocks.iter().enumerate() {
            if stocks[..i].iter().any(|s| s.id == stock.id) {
                return Err(CoreError::ValidationError(format!(
                    "duplicate stock id {}",
                    stock.id
                )));
            }
            if !stock.price.is_finite() || stock.price < PRICE_FLOOR {
                return Err(CoreError::ValidationError(format!(
                    "stock {} has an invalid price {}",
                    stock.symbol, stock.price
                )));
            }
        }
        Ok(Self {
            stocks,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    #[must_use]
    pub fn stocks(&self) -> &[Stock] {
        &self.stocks
    }

    #[must_use]
    pub fn stock(&self, stock_id: u32) -> Option<&Stock> {
        self.stocks.iter().find(|s| s.id == stock_id)
    }

    pub fn require(&self, stock_id: u32) -> Result<&Stock, CoreError> {
        self.stock(stock_id)
            .ok_or_else(|| CoreError::not_found("Stock", stock_id))
    }

    /// Current price of a stock.
    pub fn price_of(&self, stock_id: u32) -> Result<f64, CoreError> {
        self.require(stock_id).map(|s| s.price)
    }

    /// Pin a stock's price, e.g. to replay a scenario.
    pub fn set_price(&mut self, stock_id: u32, price: f64) -> Result<(), CoreError> {
        if !price.is_finite() || price < PRICE_FLOOR {
            return Err(CoreError::ValidationError(format!(
                "price must be at least {PRICE_FLOOR}, got {price}"
            )));
        }
        let stock = self
            .stocks
            .iter_mut()
            .find(|s| s.id == stock_id)
            .ok_or_else(|| CoreError::not_found("Stock", stock_id))?;
        stock.price = price;
        Ok(())
    }

    /// Move every stock one simulated day forward.
    ///
    /// Records the closing price in each stock's history and updates the
    /// day-over-day change.
    pub fn advance(&mut self, day: u32) {
        for stock in &mut self.stocks {
            let noise = self.rng.gen_range(-1.0..=1.0);
            let previous = stock.price;
            let price = next_price(previous, day, stock.volatility, noise);

            stock.previous_price = Some(previous);
            stock.percent_change = (price - previous) / previous * 100.0;
            stock.price = price;
            stock.history.push(DayPrice { day, price });
        }
        debug!(day, stocks = self.stocks.len(), "market advanced");
    }
}

impl Default for Market {
    fn default() -> Self {
        Self::new()
    }
}
