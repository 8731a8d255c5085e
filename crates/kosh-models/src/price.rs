//! Internal two-sided price: a mid and the bid/offer spread around it.

use serde::{Deserialize, Serialize};

use crate::product::Bond;
use crate::tick::format_price;

/// Latest internal price for one product.
///
/// Invariant: `bid_offer_spread >= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub product: Bond,
    pub mid: f64,
    pub bid_offer_spread: f64,
}

impl Price {
    pub fn new(product: Bond, mid: f64, bid_offer_spread: f64) -> Self {
        Self {
            product,
            mid,
            bid_offer_spread,
        }
    }

    /// Mid minus half the spread.
    pub fn bid(&self) -> f64 {
        self.mid - self.bid_offer_spread / 2.0
    }

    /// Mid plus half the spread.
    pub fn offer(&self) -> f64 {
        self.mid + self.bid_offer_spread / 2.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{}",
            self.product.cusip,
            format_price(self.mid),
            self.bid_offer_spread
        )
    }
}
