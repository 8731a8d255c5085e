//! # Trade Booking Service
//!
//! Books trades keyed by trade id. Trades arrive two ways: from the trade
//! feed connector, and synthesized from execution orders by a listener that
//! rotates fills across the three treasury books.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use kosh_core::{ListenerSet, Service, ServiceListener};
use kosh_models::{ExecutionOrder, PricingSide, Trade, TradeBook, TradeSide};

/// Keyed store of booked trades.
pub struct TradeBookingService {
    store: HashMap<String, Trade>,
    listeners: ListenerSet<Trade>,
}

impl TradeBookingService {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            listeners: ListenerSet::new(),
        }
    }

    /// Book a trade: store by trade id and fan out.
    pub fn book_trade(&mut self, trade: Trade) {
        self.store.insert(trade.trade_id.clone(), trade.clone());
        self.listeners.notify_add(&trade);
    }
}

impl Default for TradeBookingService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<str, Trade> for TradeBookingService {
    fn get(&self, key: &str) -> Option<&Trade> {
        self.store.get(key)
    }

    fn on_message(&mut self, trade: Trade) {
        self.book_trade(trade);
    }

    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<Trade>>) {
        self.listeners.add(listener);
    }

    fn listeners(&self) -> &[Arc<dyn ServiceListener<Trade>>] {
        self.listeners.all()
    }
}

/// Synthesizes a trade from each execution order.
///
/// Quantity is visible plus hidden, a BID execution books as a BUY, and the
/// receiving book rotates TRSY1 → TRSY2 → TRSY3 on a monotonic counter. The
/// trade id reuses the execution order id.
pub struct TradeBookingExecutionListener {
    service: Arc<Mutex<TradeBookingService>>,
    count: AtomicU64,
}

impl TradeBookingExecutionListener {
    pub fn new(service: Arc<Mutex<TradeBookingService>>) -> Self {
        Self {
            service,
            count: AtomicU64::new(0),
        }
    }
}

impl ServiceListener<ExecutionOrder> for TradeBookingExecutionListener {
    fn process_add(&self, order: &ExecutionOrder) {
        let n = self.count.fetch_add(1, Ordering::Relaxed);
        let book = TradeBook::ALL[(n % 3) as usize];
        let side = match order.side {
            PricingSide::Bid => TradeSide::Buy,
            PricingSide::Offer => TradeSide::Sell,
        };
        let trade = Trade::new(
            order.product.clone(),
            order.order_id.clone(),
            order.price,
            book,
            order.visible_quantity + order.hidden_quantity,
            side,
        );
        self.service.lock().unwrap().book_trade(trade);
    }
}
