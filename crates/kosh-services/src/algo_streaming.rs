//! # Algo Streaming Service
//!
//! Turns each internal price into a two-sided quote stream: bid and offer
//! half a spread either side of mid, visible size alternating 1M/2M per
//! product, hidden size always twice the visible.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use kosh_core::{ListenerSet, ServiceListener};
use kosh_models::{AlgoStream, Price, PriceStream, PriceStreamOrder, PricingSide};

const VISIBLE_EVEN: i64 = 1_000_000;
const VISIBLE_ODD: i64 = 2_000_000;

/// Latest `AlgoStream` per CUSIP.
///
/// The alternation counter is kept per product so the visible size strictly
/// alternates for each product regardless of how feeds interleave. Fed by
/// the pricing listener alone: `publish_algo_stream` is the sole mutation
/// path, keeping the counter in step with every stored stream.
pub struct AlgoStreamingService {
    store: HashMap<String, AlgoStream>,
    listeners: ListenerSet<AlgoStream>,
    counts: HashMap<String, u64>,
}

impl AlgoStreamingService {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            listeners: ListenerSet::new(),
            counts: HashMap::new(),
        }
    }

    /// Derive and fan out the stream for one price update.
    pub fn publish_algo_stream(&mut self, price: &Price) {
        let key = price.product.cusip.clone();

        let count = self.counts.entry(key.clone()).or_insert(0);
        let visible = if *count % 2 == 0 {
            VISIBLE_EVEN
        } else {
            VISIBLE_ODD
        };
        *count += 1;
        let hidden = 2 * visible;

        let bid = PriceStreamOrder::new(price.bid(), visible, hidden, PricingSide::Bid);
        let offer = PriceStreamOrder::new(price.offer(), visible, hidden, PricingSide::Offer);
        let algo = AlgoStream::new(PriceStream::new(price.product.clone(), bid, offer));

        self.store.insert(key, algo.clone());
        self.listeners.notify_add(&algo);
    }

    pub fn get(&self, key: &str) -> Option<&AlgoStream> {
        self.store.get(key)
    }

    pub fn add_listener(&mut self, listener: Arc<dyn ServiceListener<AlgoStream>>) {
        self.listeners.add(listener);
    }

    pub fn listeners(&self) -> &[Arc<dyn ServiceListener<AlgoStream>>] {
        self.listeners.all()
    }
}

impl Default for AlgoStreamingService {
    fn default() -> Self {
        Self::new()
    }
}

/// Chains pricing into algo streaming.
pub struct AlgoStreamingListener {
    service: Arc<Mutex<AlgoStreamingService>>,
}

impl AlgoStreamingListener {
    pub fn new(service: Arc<Mutex<AlgoStreamingService>>) -> Self {
        Self { service }
    }
}

impl ServiceListener<Price> for AlgoStreamingListener {
    fn process_add(&self, price: &Price) {
        self.service.lock().unwrap().publish_algo_stream(price);
    }
}
