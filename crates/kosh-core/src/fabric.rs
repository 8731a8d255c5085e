//! # Service/Listener/Connector Fabric
//!
//! The dataflow contracts every stage of the backbone is built on.
//!
//! ## Description
//! A `Service` owns a keyed store of domain entities. Downstream stages
//! register a `ServiceListener` on it and receive callbacks as entries
//! change; listeners are the only inter-service coupling. A `Connector` sits
//! at the boundary: inbound connectors drive `Service::on_message` from a
//! socket or file, outbound connectors accept an entity from the service and
//! write bytes out. A connector may be either or both.
//!
//! ## Wiring model
//! ```text
//!   socket ──▶ FeedConnector ──▶ Service A ──▶ listener ──▶ Service B ──▶ ...
//!                                   │                          │
//!                                   └── keyed store            └── Connector (outbound)
//! ```
//! Each downstream service constructs a listener object targeting itself
//! (behind `Arc<Mutex<_>>`); the composition root registers it with the
//! upstream service. Fan-out is unbounded and notification order equals
//! registration order. The entire chain for one record runs synchronously on
//! the ingress task that read it.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use async_trait::async_trait;
use std::sync::Arc;

/// Callbacks a downstream stage receives as a service's entries change.
///
/// Only `process_add` carries semantic weight in this fabric; the other two
/// are defaulted no-ops and emitted only where a stage explicitly says so.
pub trait ServiceListener<V>: Send + Sync {
    /// An entry was added or replaced under its key.
    fn process_add(&self, data: &V);

    /// An entry was removed.
    fn process_remove(&self, _data: &V) {}

    /// An entry was updated in place.
    fn process_update(&self, _data: &V) {}
}

/// A keyed store of domain entities with listener fan-out.
///
/// Services are not thread-safe internally; all mutation for one service
/// happens under its mutex on the ingress task that reached it.
pub trait Service<K: ?Sized, V> {
    /// Look up the stored entity for a key.
    fn get(&self, key: &K) -> Option<&V>;

    /// Inbound mutation path: a connector (or loopback) hands the service a
    /// new or updated entity.
    fn on_message(&mut self, data: V);

    /// Register a listener; fan-out order equals registration order.
    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<V>>);

    /// All registered listeners.
    fn listeners(&self) -> &[Arc<dyn ServiceListener<V>>];
}

/// Registration-ordered listener fan-out, shared by every service.
pub struct ListenerSet<V> {
    listeners: Vec<Arc<dyn ServiceListener<V>>>,
}

impl<V> ListenerSet<V> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn add(&mut self, listener: Arc<dyn ServiceListener<V>>) {
        self.listeners.push(listener);
    }

    pub fn all(&self) -> &[Arc<dyn ServiceListener<V>>] {
        &self.listeners
    }

    /// Notify every listener of an add, in registration order.
    pub fn notify_add(&self, data: &V) {
        for listener in &self.listeners {
            listener.process_add(data);
        }
    }

    /// Notify every listener of an in-place update.
    pub fn notify_update(&self, data: &V) {
        for listener in &self.listeners {
            listener.process_update(data);
        }
    }
}

impl<V> Default for ListenerSet<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Outbound half of a connector: accept an entity from its service and
/// write it out. Publication is best-effort; errors are logged, not
/// propagated back into the chain.
pub trait Connector<V>: Send + Sync {
    fn publish(&self, data: &V);
}

/// Inbound half of a connector: a long-running ingress loop that drives
/// `Service::on_message` until the source closes.
#[async_trait]
pub trait FeedConnector: Send + Sync {
    /// Run the ingress loop. Resolves when the source closes or fails.
    async fn run(&self) -> anyhow::Result<()>;

    /// Human-readable feed name for logging.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        seen: Mutex<Vec<i64>>,
        tag: i64,
    }

    impl ServiceListener<i64> for Recorder {
        fn process_add(&self, data: &i64) {
            self.seen.lock().unwrap().push(self.tag * 100 + *data);
        }
    }

    #[test]
    fn fan_out_follows_registration_order() {
        let first = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
            tag: 1,
        });
        let second = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
            tag: 2,
        });
        let mut set = ListenerSet::new();
        set.add(first.clone());
        set.add(second.clone());
        set.notify_add(&7);
        assert_eq!(*first.seen.lock().unwrap(), vec![107]);
        assert_eq!(*second.seen.lock().unwrap(), vec![207]);
        assert_eq!(set.all().len(), 2);
    }
}
