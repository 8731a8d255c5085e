//! Booked trades and the trading books they land in.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::product::Bond;

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for TradeSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            other => Err(format!("unknown trade side {other:?}")),
        }
    }
}

/// Logical trading account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TradeBook {
    Trsy1,
    Trsy2,
    Trsy3,
}

impl TradeBook {
    /// All books, in rotation order.
    pub const ALL: [TradeBook; 3] = [TradeBook::Trsy1, TradeBook::Trsy2, TradeBook::Trsy3];
}

impl std::fmt::Display for TradeBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trsy1 => write!(f, "TRSY1"),
            Self::Trsy2 => write!(f, "TRSY2"),
            Self::Trsy3 => write!(f, "TRSY3"),
        }
    }
}

impl FromStr for TradeBook {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TRSY1" => Ok(Self::Trsy1),
            "TRSY2" => Ok(Self::Trsy2),
            "TRSY3" => Ok(Self::Trsy3),
            other => Err(format!("unknown trade book {other:?}")),
        }
    }
}

/// A trade with price, side and quantity on a particular book.
///
/// Invariant: `trade_id` unique across all trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub product: Bond,
    pub trade_id: String,
    pub price: f64,
    pub book: TradeBook,
    pub quantity: i64,
    pub side: TradeSide,
}

impl Trade {
    pub fn new(
        product: Bond,
        trade_id: String,
        price: f64,
        book: TradeBook,
        quantity: i64,
        side: TradeSide,
    ) -> Self {
        Self {
            product,
            trade_id,
            price,
            book,
            quantity,
            side,
        }
    }

    /// Quantity signed by direction: positive for BUY, negative for SELL.
    pub fn signed_quantity(&self) -> i64 {
        match self.side {
            TradeSide::Buy => self.quantity,
            TradeSide::Sell => -self.quantity,
        }
    }
}
