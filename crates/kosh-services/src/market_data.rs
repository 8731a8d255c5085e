//! # Market Data Service
//!
//! Keyed store of the latest aggregated depth-5 order book per product.
//!
//! ## Description
//! The market data connector parses five raw levels per side from each feed
//! record, aggregates them through [`MarketDataService::aggregate_depth`]
//! (duplicate price levels collapse by summing quantity, bids sorted
//! descending, offers ascending), and hands the aggregated book to
//! `on_message`, which replaces the stored book and fans out. Re-delivery of
//! the same record leaves the store unchanged.

use std::collections::HashMap;
use std::sync::Arc;

use kosh_core::{ListenerSet, Service, ServiceListener};
use kosh_models::{BidOffer, Order, OrderBook};

/// Fixed book depth of the feed.
pub const BOOK_DEPTH: usize = 5;

/// Latest aggregated `OrderBook` per CUSIP.
pub struct MarketDataService {
    store: HashMap<String, OrderBook>,
    listeners: ListenerSet<OrderBook>,
}

impl MarketDataService {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            listeners: ListenerSet::new(),
        }
    }

    /// Collapse duplicate price levels per side and sort each stack
    /// best-first. After aggregation each price appears at most once per
    /// side, so `best_bid_offer` tie-breaks never fire on aggregated books.
    pub fn aggregate_depth(book: OrderBook) -> OrderBook {
        let mut bids = collapse_levels(&book.bid_stack);
        let mut offers = collapse_levels(&book.offer_stack);
        bids.sort_by(|a, b| b.price.total_cmp(&a.price));
        offers.sort_by(|a, b| a.price.total_cmp(&b.price));
        OrderBook::new(book.product, bids, offers)
    }

    /// Top of the stored book for a product.
    pub fn best_bid_offer(&self, product_id: &str) -> Option<BidOffer> {
        self.store.get(product_id)?.best_bid_offer()
    }
}

impl Default for MarketDataService {
    fn default() -> Self {
        Self::new()
    }
}

/// Sum quantities into the first occurrence of each price level.
fn collapse_levels(orders: &[Order]) -> Vec<Order> {
    let mut collapsed: Vec<Order> = Vec::with_capacity(orders.len());
    for order in orders {
        match collapsed.iter_mut().find(|o| o.price == order.price) {
            Some(level) => level.quantity += order.quantity,
            None => collapsed.push(*order),
        }
    }
    collapsed
}

impl Service<str, OrderBook> for MarketDataService {
    fn get(&self, key: &str) -> Option<&OrderBook> {
        self.store.get(key)
    }

    fn on_message(&mut self, book: OrderBook) {
        self.store.insert(book.product.cusip.clone(), book.clone());
        self.listeners.notify_add(&book);
    }

    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<OrderBook>>) {
        self.listeners.add(listener);
    }

    fn listeners(&self) -> &[Arc<dyn ServiceListener<OrderBook>>] {
        self.listeners.all()
    }
}
