//! Execution service: stores the latest execution order by order id and
//! hands it to the outbound connector.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use kosh_core::{Connector, ListenerSet, Service, ServiceListener};
use kosh_models::{AlgoExecution, ExecutionOrder};

/// Execution orders keyed by order id (unique, so the store only ever
/// grows), published over the execution socket.
pub struct ExecutionService {
    store: HashMap<String, ExecutionOrder>,
    listeners: ListenerSet<ExecutionOrder>,
    connector: Arc<dyn Connector<ExecutionOrder>>,
}

impl ExecutionService {
    pub fn new(connector: Arc<dyn Connector<ExecutionOrder>>) -> Self {
        Self {
            store: HashMap::new(),
            listeners: ListenerSet::new(),
            connector,
        }
    }

    /// Unwrap an algo execution, store the order, fan out, then publish.
    pub fn execute_order(&mut self, algo: &AlgoExecution) {
        let order = algo.execution_order.clone();
        self.store.insert(order.order_id.clone(), order.clone());
        self.listeners.notify_add(&order);
        self.connector.publish(&order);
    }
}

impl Service<str, ExecutionOrder> for ExecutionService {
    fn get(&self, key: &str) -> Option<&ExecutionOrder> {
        self.store.get(key)
    }

    fn on_message(&mut self, order: ExecutionOrder) {
        self.store.insert(order.order_id.clone(), order.clone());
        self.listeners.notify_add(&order);
    }

    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<ExecutionOrder>>) {
        self.listeners.add(listener);
    }

    fn listeners(&self) -> &[Arc<dyn ServiceListener<ExecutionOrder>>] {
        self.listeners.all()
    }
}

/// Chains algo execution into the publishing stage.
pub struct ExecutionListener {
    service: Arc<Mutex<ExecutionService>>,
}

impl ExecutionListener {
    pub fn new(service: Arc<Mutex<ExecutionService>>) -> Self {
        Self { service }
    }
}

impl ServiceListener<AlgoExecution> for ExecutionListener {
    fn process_add(&self, algo: &AlgoExecution) {
        self.service.lock().unwrap().execute_order(algo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bond, CollectingConnector, CollectingListener};
    use kosh_models::{Market, OrderType, PricingSide};

    fn order(id: &str) -> ExecutionOrder {
        ExecutionOrder {
            product: bond("912828M80"),
            side: PricingSide::Bid,
            order_id: id.to_string(),
            order_type: OrderType::Market,
            price: 100.0,
            visible_quantity: 1_000_000,
            hidden_quantity: 0,
            parent_order_id: "AlgoParentXYZ01".to_string(),
            is_child_order: false,
        }
    }

    #[test]
    fn stores_by_order_id_then_publishes() {
        let connector = Arc::new(CollectingConnector::<ExecutionOrder>::new());
        let mut service = ExecutionService::new(connector.clone());

        let submitted = order("AlgoABCDEF01234");
        service.execute_order(&AlgoExecution::new(submitted.clone(), Market::BrokerTec));

        assert_eq!(service.get("AlgoABCDEF01234"), Some(&submitted));
        assert_eq!(connector.take().len(), 1);
    }

    #[test]
    fn on_message_stores_and_fans_out_without_publishing() {
        let connector = Arc::new(CollectingConnector::<ExecutionOrder>::new());
        let mut service = ExecutionService::new(connector.clone());
        let sink = Arc::new(CollectingListener::<ExecutionOrder>::new());
        service.add_listener(sink.clone());

        let seeded = order("AlgoSEEDED00001");
        service.on_message(seeded.clone());

        assert_eq!(service.get("AlgoSEEDED00001"), Some(&seeded));
        assert_eq!(sink.take(), vec![seeded]);
        // direct seeding does not reach the publish socket
        assert!(connector.take().is_empty());
    }
}
