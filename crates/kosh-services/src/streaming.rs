//! Streaming service: stores the latest published stream per product and
//! hands it to the outbound connector.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use kosh_core::{Connector, ListenerSet, Service, ServiceListener};
use kosh_models::{AlgoStream, PriceStream};

/// Latest `PriceStream` per CUSIP, published over the streaming socket.
pub struct StreamingService {
    store: HashMap<String, PriceStream>,
    listeners: ListenerSet<PriceStream>,
    connector: Arc<dyn Connector<PriceStream>>,
}

impl StreamingService {
    pub fn new(connector: Arc<dyn Connector<PriceStream>>) -> Self {
        Self {
            store: HashMap::new(),
            listeners: ListenerSet::new(),
            connector,
        }
    }

    /// Unwrap an algo stream, store it, fan out, then publish.
    pub fn add_price_stream(&mut self, algo: &AlgoStream) {
        let stream = algo.price_stream.clone();
        self.store
            .insert(stream.product.cusip.clone(), stream.clone());
        self.listeners.notify_add(&stream);
        self.connector.publish(&stream);
    }
}

impl Service<str, PriceStream> for StreamingService {
    fn get(&self, key: &str) -> Option<&PriceStream> {
        self.store.get(key)
    }

    fn on_message(&mut self, stream: PriceStream) {
        self.store
            .insert(stream.product.cusip.clone(), stream.clone());
        self.listeners.notify_add(&stream);
    }

    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<PriceStream>>) {
        self.listeners.add(listener);
    }

    fn listeners(&self) -> &[Arc<dyn ServiceListener<PriceStream>>] {
        self.listeners.all()
    }
}

/// Chains algo streaming into the publishing stage.
pub struct StreamingListener {
    service: Arc<Mutex<StreamingService>>,
}

impl StreamingListener {
    pub fn new(service: Arc<Mutex<StreamingService>>) -> Self {
        Self { service }
    }
}

impl ServiceListener<AlgoStream> for StreamingListener {
    fn process_add(&self, algo: &AlgoStream) {
        self.service.lock().unwrap().add_price_stream(algo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bond, CollectingConnector, CollectingListener};
    use kosh_models::{PriceStreamOrder, PricingSide};

    #[test]
    fn stores_then_publishes() {
        let connector = Arc::new(CollectingConnector::<PriceStream>::new());
        let mut service = StreamingService::new(connector.clone());

        let stream = PriceStream::new(
            bond("9128283H1"),
            PriceStreamOrder::new(99.99, 1_000_000, 2_000_000, PricingSide::Bid),
            PriceStreamOrder::new(100.01, 1_000_000, 2_000_000, PricingSide::Offer),
        );
        service.add_price_stream(&AlgoStream::new(stream.clone()));

        assert_eq!(service.get("9128283H1"), Some(&stream));
        assert_eq!(connector.take(), vec![stream]);
    }

    #[test]
    fn on_message_stores_and_fans_out_without_publishing() {
        let connector = Arc::new(CollectingConnector::<PriceStream>::new());
        let mut service = StreamingService::new(connector.clone());
        let sink = Arc::new(CollectingListener::<PriceStream>::new());
        service.add_listener(sink.clone());

        let stream = PriceStream::new(
            bond("912810RZ3"),
            PriceStreamOrder::new(99.50, 2_000_000, 4_000_000, PricingSide::Bid),
            PriceStreamOrder::new(99.52, 2_000_000, 4_000_000, PricingSide::Offer),
        );
        service.on_message(stream.clone());

        assert_eq!(service.get("912810RZ3"), Some(&stream));
        assert_eq!(sink.take(), vec![stream]);
        // direct seeding does not reach the publish socket
        assert!(connector.take().is_empty());
    }
}
