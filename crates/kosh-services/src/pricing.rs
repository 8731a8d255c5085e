//! Keyed store of the latest internal two-sided price per product.

use std::collections::HashMap;
use std::sync::Arc;

use kosh_core::{ListenerSet, Service, ServiceListener};
use kosh_models::Price;

/// Latest `Price` per CUSIP. No internal computation: `on_message`
/// overwrites by key and fans out.
pub struct PricingService {
    store: HashMap<String, Price>,
    listeners: ListenerSet<Price>,
}

impl PricingService {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            listeners: ListenerSet::new(),
        }
    }
}

impl Default for PricingService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<str, Price> for PricingService {
    fn get(&self, key: &str) -> Option<&Price> {
        self.store.get(key)
    }

    fn on_message(&mut self, price: Price) {
        self.store.insert(price.product.cusip.clone(), price.clone());
        self.listeners.notify_add(&price);
    }

    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<Price>>) {
        self.listeners.add(listener);
    }

    fn listeners(&self) -> &[Arc<dyn ServiceListener<Price>>] {
        self.listeners.all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bond, price};

    #[test]
    fn latest_price_wins() {
        let mut service = PricingService::new();
        service.on_message(price(bond("912828M80"), 99.5, 0.0078125));
        service.on_message(price(bond("912828M80"), 100.0, 0.0078125));
        assert_eq!(service.get("912828M80").unwrap().mid, 100.0);
        assert!(service.get("9128283H1").is_none());
    }
}
