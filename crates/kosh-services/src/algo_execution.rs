//! # Algo Execution Service
//!
//! Aggresses the book only when the spread is at its tightest.
//!
//! ## Description
//! Listens on aggregated order books. When the top-of-book spread is at most
//! 1/128 the service crosses it with a market order — alternating side on a
//! monotonic counter, taking the offer with the bid's size on even counts
//! and the bid with the offer's size on odd counts. A wider book emits
//! nothing; the counter still advances on every book update, so alternation
//! is a function of updates seen, not orders sent.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::warn;

use kosh_core::{ListenerSet, ServiceListener};
use kosh_models::{AlgoExecution, ExecutionOrder, Market, OrderBook, OrderType, PricingSide};

use crate::ids::random_id;

/// The tightest spread the feed produces: 1/128, half a tick.
pub const TIGHTEST_SPREAD: f64 = 1.0 / 128.0;

/// Latest `AlgoExecution` per CUSIP, emitted only on tight books.
///
/// This stage is fed by the market data listener alone: `execute_on_book`
/// is the sole mutation path, so nothing can store an execution that
/// skipped the spread gate. There is no connector-facing ingress.
pub struct AlgoExecutionService {
    store: HashMap<String, AlgoExecution>,
    listeners: ListenerSet<AlgoExecution>,
    count: u64,
}

impl AlgoExecutionService {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            listeners: ListenerSet::new(),
            count: 0,
        }
    }

    /// React to one aggregated book update.
    ///
    /// Emits a child market order when `offer - bid <= 1/128`, otherwise
    /// nothing. The alternation counter advances either way.
    pub fn execute_on_book(&mut self, book: &OrderBook) {
        let Some(bbo) = book.best_bid_offer() else {
            warn!(cusip = %book.product.cusip, "book update with an empty side, skipping");
            return;
        };

        let aggress_bid = self.count % 2 == 0;
        self.count += 1;

        if bbo.spread() > TIGHTEST_SPREAD {
            return;
        }

        // Cross the spread: a BID takes the offer price with the bid size,
        // an OFFER takes the bid price with the offer size.
        let (side, price, quantity) = if aggress_bid {
            (PricingSide::Bid, bbo.offer.price, bbo.bid.quantity)
        } else {
            (PricingSide::Offer, bbo.bid.price, bbo.offer.quantity)
        };

        let execution_order = ExecutionOrder {
            product: book.product.clone(),
            side,
            order_id: format!("Algo{}", random_id(11)),
            order_type: OrderType::Market,
            price,
            visible_quantity: quantity,
            hidden_quantity: 0,
            parent_order_id: format!("AlgoParent{}", random_id(5)),
            is_child_order: false,
        };
        let algo = AlgoExecution::new(execution_order, Market::BrokerTec);

        self.store.insert(book.product.cusip.clone(), algo.clone());
        self.listeners.notify_add(&algo);
    }

    /// Latest emission for a product, if any of its books has been tight.
    pub fn get(&self, key: &str) -> Option<&AlgoExecution> {
        self.store.get(key)
    }

    pub fn add_listener(&mut self, listener: Arc<dyn ServiceListener<AlgoExecution>>) {
        self.listeners.add(listener);
    }

    pub fn listeners(&self) -> &[Arc<dyn ServiceListener<AlgoExecution>>] {
        self.listeners.all()
    }
}

impl Default for AlgoExecutionService {
    fn default() -> Self {
        Self::new()
    }
}

/// Chains market data into algo execution.
pub struct AlgoExecutionListener {
    service: Arc<Mutex<AlgoExecutionService>>,
}

impl AlgoExecutionListener {
    pub fn new(service: Arc<Mutex<AlgoExecutionService>>) -> Self {
        Self { service }
    }
}

impl ServiceListener<OrderBook> for AlgoExecutionListener {
    fn process_add(&self, book: &OrderBook) {
        self.service.lock().unwrap().execute_on_book(book);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bond, tight_book, wide_book, CollectingListener};

    #[test]
    fn tight_book_alternates_sides() {
        let mut service = AlgoExecutionService::new();
        let sink = Arc::new(CollectingListener::<AlgoExecution>::new());
        service.add_listener(sink.clone());

        let book = tight_book(bond("912828M80"), 99.99, 1_000_000, 2_000_000);
        service.execute_on_book(&book);
        service.execute_on_book(&book);
        service.execute_on_book(&book);

        let seen = sink.take();
        assert_eq!(seen.len(), 3);

        // even count: BID takes the offer price with the bid size
        let first = &seen[0].execution_order;
        assert_eq!(first.side, PricingSide::Bid);
        assert_eq!(first.price, 99.99 + 1.0 / 128.0);
        assert_eq!(first.visible_quantity, 1_000_000);
        assert_eq!(first.hidden_quantity, 0);
        assert_eq!(first.order_type, OrderType::Market);
        assert!(first.order_id.starts_with("Algo"));
        assert!(first.parent_order_id.starts_with("AlgoParent"));
        assert!(!first.is_child_order);
        assert_eq!(seen[0].market, Market::BrokerTec);

        // odd count: OFFER takes the bid price with the offer size
        let second = &seen[1].execution_order;
        assert_eq!(second.side, PricingSide::Offer);
        assert_eq!(second.price, 99.99);
        assert_eq!(second.visible_quantity, 2_000_000);

        // back to BID
        assert_eq!(seen[2].execution_order.side, PricingSide::Bid);
    }

    #[test]
    fn wide_book_emits_nothing_but_advances_count() {
        let mut service = AlgoExecutionService::new();
        let sink = Arc::new(CollectingListener::<AlgoExecution>::new());
        service.add_listener(sink.clone());

        let wide = wide_book(bond("912828M80"), 99.99, 1.0 / 32.0);
        service.execute_on_book(&wide);
        assert!(sink.take().is_empty());
        assert!(service.get("912828M80").is_none());

        // the wide update consumed the even slot, so the first emission
        // lands on the odd side
        let tight = tight_book(bond("912828M80"), 99.99, 1_000_000, 2_000_000);
        service.execute_on_book(&tight);
        let seen = sink.take();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].execution_order.side, PricingSide::Offer);
    }

    #[test]
    fn order_ids_are_unique() {
        let mut service = AlgoExecutionService::new();
        let sink = Arc::new(CollectingListener::<AlgoExecution>::new());
        service.add_listener(sink.clone());
        let book = tight_book(bond("912828M80"), 99.99, 1_000_000, 1_000_000);
        for _ in 0..50 {
            service.execute_on_book(&book);
        }
        let seen = sink.take();
        let mut ids: Vec<_> = seen.iter().map(|a| a.execution_order.order_id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }
}
