//! # Order Book Model
//!
//! Depth-5 two-sided book for one product. Stacks are stored best-first
//! after aggregation: bids descending by price, offers ascending. The
//! aggregated form holds each price at most once per side.

use serde::{Deserialize, Serialize};

use crate::product::Bond;

/// Side of a market data order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingSide {
    Bid,
    Offer,
}

impl std::fmt::Display for PricingSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bid => write!(f, "BID"),
            Self::Offer => write!(f, "OFFER"),
        }
    }
}

/// One resting level: price, quantity, side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub price: f64,
    pub quantity: i64,
    pub side: PricingSide,
}

impl Order {
    pub fn new(price: f64, quantity: i64, side: PricingSide) -> Self {
        Self {
            price,
            quantity,
            side,
        }
    }
}

/// Snapshot of the top of book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BidOffer {
    pub bid: Order,
    pub offer: Order,
}

impl BidOffer {
    /// Offer price minus bid price.
    pub fn spread(&self) -> f64 {
        self.offer.price - self.bid.price
    }
}

/// Two-sided book for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    pub product: Bond,
    pub bid_stack: Vec<Order>,
    pub offer_stack: Vec<Order>,
}

impl OrderBook {
    pub fn new(product: Bond, bid_stack: Vec<Order>, offer_stack: Vec<Order>) -> Self {
        Self {
            product,
            bid_stack,
            offer_stack,
        }
    }

    /// Best bid (max price) and best offer (min price), ties broken by
    /// first occurrence. `None` if either side is empty.
    pub fn best_bid_offer(&self) -> Option<BidOffer> {
        let bid = self
            .bid_stack
            .iter()
            .copied()
            .reduce(|best, o| if o.price > best.price { o } else { best })?;
        let offer = self
            .offer_stack
            .iter()
            .copied()
            .reduce(|best, o| if o.price < best.price { o } else { best })?;
        Some(BidOffer { bid, offer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refdata_fixture::bond_fixture;

    #[test]
    fn best_bid_offer_scans_unsorted_stacks() {
        let book = OrderBook::new(
            bond_fixture(),
            vec![
                Order::new(99.50, 1_000_000, PricingSide::Bid),
                Order::new(99.75, 2_000_000, PricingSide::Bid),
            ],
            vec![
                Order::new(100.25, 3_000_000, PricingSide::Offer),
                Order::new(100.00, 4_000_000, PricingSide::Offer),
            ],
        );
        let bbo = book.best_bid_offer().unwrap();
        assert_eq!(bbo.bid.price, 99.75);
        assert_eq!(bbo.offer.price, 100.00);
        assert!(bbo.bid.price <= bbo.offer.price);
    }

    #[test]
    fn ties_keep_first_occurrence() {
        let book = OrderBook::new(
            bond_fixture(),
            vec![
                Order::new(99.75, 1_000_000, PricingSide::Bid),
                Order::new(99.75, 9_000_000, PricingSide::Bid),
            ],
            vec![Order::new(100.00, 1_000_000, PricingSide::Offer)],
        );
        assert_eq!(book.best_bid_offer().unwrap().bid.quantity, 1_000_000);
    }

    #[test]
    fn empty_side_yields_none() {
        let book = OrderBook::new(bond_fixture(), vec![], vec![]);
        assert!(book.best_bid_offer().is_none());
    }
}
