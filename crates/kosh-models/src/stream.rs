//! Two-way price streams published to the street.

use serde::{Deserialize, Serialize};

use crate::book::PricingSide;
use crate::product::Bond;
use crate::tick::format_price;

/// One side of a published stream.
///
/// Invariant: `hidden_quantity = 2 * visible_quantity`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceStreamOrder {
    pub price: f64,
    pub visible_quantity: i64,
    pub hidden_quantity: i64,
    pub side: PricingSide,
}

impl PriceStreamOrder {
    pub fn new(price: f64, visible_quantity: i64, hidden_quantity: i64, side: PricingSide) -> Self {
        Self {
            price,
            visible_quantity,
            hidden_quantity,
            side,
        }
    }
}

impl std::fmt::Display for PriceStreamOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            format_price(self.price),
            self.visible_quantity,
            self.hidden_quantity,
            self.side
        )
    }
}

/// Two-way market for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceStream {
    pub product: Bond,
    pub bid: PriceStreamOrder,
    pub offer: PriceStreamOrder,
}

impl PriceStream {
    pub fn new(product: Bond, bid: PriceStreamOrder, offer: PriceStreamOrder) -> Self {
        Self {
            product,
            bid,
            offer,
        }
    }
}

impl std::fmt::Display for PriceStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.product.cusip, self.bid, self.offer)
    }
}

/// Algo-generated stream, as handed from the quoting stage to the
/// publishing stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgoStream {
    pub price_stream: PriceStream,
}

impl AlgoStream {
    pub fn new(price_stream: PriceStream) -> Self {
        Self { price_stream }
    }
}
