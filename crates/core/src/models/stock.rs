use serde::{Deserialize, Serialize};

/// Industry sector, used for allocation breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sector {
    Technology,
    Finance,
    Healthcare,
    Energy,
    Consumer,
    Industrial,
    Retail,
    Food,
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sector::Technology => write!(f, "Technology"),
            Sector::Finance => write!(f, "Finance"),
            Sector::Healthcare => write!(f, "Healthcare"),
            Sector::Energy => write!(f, "Energy"),
            Sector::Consumer => write!(f, "Consumer"),
            Sector::Industrial => write!(f, "Industrial"),
            Sector::Retail => write!(f, "Retail"),
            Sector::Food => write!(f, "Food"),
        }
    }
}

/// Closing price of a stock on a simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayPrice {
    pub day: u32,
    pub price: f64,
}

/// A synthetic stock in the simulator's market.
///
/// Stocks are regenerated at session start and are not persisted;
/// positions refer to them by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub id: u32,
    pub symbol: String,
    pub name: String,
    pub sector: Sector,
    pub price: f64,
    /// Maximum relative daily noise, e.g. 0.05 = ±5 %
    pub volatility: f64,
    #[serde(default)]
    pub previous_price: Option<f64>,
    /// Change from the previous day in percent
    #[serde(default)]
    pub percent_change: f64,
    #[serde(default)]
    pub history: Vec<DayPrice>,
}

impl Stock {
    pub fn new(
        id: u32,
        symbol: impl Into<String>,
        name: impl Into<String>,
        sector: Sector,
        price: f64,
        volatility: f64,
    ) -> Self {
        Self {
            id,
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            sector,
            price,
            volatility,
            previous_price: None,
            percent_change: 0.0,
            history: Vec::new(),
        }
    }
}
