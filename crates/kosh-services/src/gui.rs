//! GUI price surface: persists prices to `gui.txt`, throttled to one record
//! per 300 ms wall-clock per product.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use kosh_core::{ListenerSet, Service, ServiceListener};
use kosh_models::Price;

use crate::historical::HistoricalDataConnector;

/// Minimum wall-clock gap between persisted records for one product.
pub const GUI_THROTTLE: Duration = Duration::from_millis(300);

/// Throttled price surface for the GUI.
pub struct GuiService {
    store: HashMap<String, Price>,
    listeners: ListenerSet<Price>,
    connector: HistoricalDataConnector,
    last_written: HashMap<String, Instant>,
    throttle: Duration,
}

impl GuiService {
    pub fn new(results_dir: &Path) -> Self {
        Self::with_throttle(results_dir, GUI_THROTTLE)
    }

    pub fn with_throttle(results_dir: &Path, throttle: Duration) -> Self {
        Self {
            store: HashMap::new(),
            listeners: ListenerSet::new(),
            connector: HistoricalDataConnector::new(results_dir.join("gui.txt")),
            last_written: HashMap::new(),
            throttle,
        }
    }

    fn throttle_open(&mut self, cusip: &str) -> bool {
        match self.last_written.get(cusip) {
            Some(last) if last.elapsed() < self.throttle => false,
            _ => {
                self.last_written.insert(cusip.to_string(), Instant::now());
                true
            }
        }
    }
}

impl Service<str, Price> for GuiService {
    fn get(&self, key: &str) -> Option<&Price> {
        self.store.get(key)
    }

    fn on_message(&mut self, price: Price) {
        self.store.insert(price.product.cusip.clone(), price.clone());
        self.listeners.notify_add(&price);
        if self.throttle_open(&price.product.cusip) {
            self.connector.append(&price.to_string());
        }
    }

    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<Price>>) {
        self.listeners.add(listener);
    }

    fn listeners(&self) -> &[Arc<dyn ServiceListener<Price>>] {
        self.listeners.all()
    }
}

/// Chains pricing into the GUI surface.
pub struct GuiListener {
    service: Arc<Mutex<GuiService>>,
}

impl GuiListener {
    pub fn new(service: Arc<Mutex<GuiService>>) -> Self {
        Self { service }
    }
}

impl ServiceListener<Price> for GuiListener {
    fn process_add(&self, price: &Price) {
        self.service.lock().unwrap().on_message(price.clone());
    }
}
