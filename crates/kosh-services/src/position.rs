//! Position service: signed per-book positions per product, built from the
//! trade flow.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use kosh_core::{ListenerSet, ServiceListener};
use kosh_models::{Position, Trade};

/// Latest `Position` per CUSIP.
///
/// Each trade adds its signed quantity (positive BUY, negative SELL) to the
/// traded book; the aggregate position is the sum across books. Fed by the
/// trade booking listener alone: `add_trade` is the sole mutation path, so
/// every stored position is the sum of the trades that built it.
pub struct PositionService {
    store: HashMap<String, Position>,
    listeners: ListenerSet<Position>,
}

impl PositionService {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            listeners: ListenerSet::new(),
        }
    }

    /// Apply one trade and fan out the updated position.
    pub fn add_trade(&mut self, trade: &Trade) {
        let position = self
            .store
            .entry(trade.product.cusip.clone())
            .or_insert_with(|| Position::new(trade.product.clone()));
        position.add(trade.book, trade.signed_quantity());
        let snapshot = position.clone();
        self.listeners.notify_add(&snapshot);
    }

    pub fn get(&self, key: &str) -> Option<&Position> {
        self.store.get(key)
    }

    pub fn add_listener(&mut self, listener: Arc<dyn ServiceListener<Position>>) {
        self.listeners.add(listener);
    }

    pub fn listeners(&self) -> &[Arc<dyn ServiceListener<Position>>] {
        self.listeners.all()
    }
}

impl Default for PositionService {
    fn default() -> Self {
        Self::new()
    }
}

/// Chains trade booking into positions.
pub struct PositionListener {
    service: Arc<Mutex<PositionService>>,
}

impl PositionListener {
    pub fn new(service: Arc<Mutex<PositionService>>) -> Self {
        Self { service }
    }
}

impl ServiceListener<Trade> for PositionListener {
    fn process_add(&self, trade: &Trade) {
        self.service.lock().unwrap().add_trade(trade);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::bond;
    use kosh_models::{TradeBook, TradeSide};

    fn trade(id: &str, book: TradeBook, quantity: i64, side: TradeSide) -> Trade {
        Trade::new(bond("912828M80"), id.to_string(), 99.5, book, quantity, side)
    }

    #[test]
    fn aggregate_tracks_signed_trade_flow() {
        let mut service = PositionService::new();
        service.add_trade(&trade("T1", TradeBook::Trsy1, 1_000_000, TradeSide::Buy));
        service.add_trade(&trade("T2", TradeBook::Trsy2, 400_000, TradeSide::Sell));

        let position = service.get("912828M80").unwrap();
        assert_eq!(position.position(TradeBook::Trsy1), 1_000_000);
        assert_eq!(position.position(TradeBook::Trsy2), -400_000);
        assert_eq!(position.aggregate(), 600_000);
    }
}
