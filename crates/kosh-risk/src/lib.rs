//! # Risk Service
//!
//! PV01 exposure per security and across bucketed sectors.
//!
//! ## Description
//! Listens on position updates. For each add it looks up the unit PV01 of
//! the security and stores a `Pv01` whose quantity is the current net
//! aggregate position, replacing any previous entry for the product.
//! Bucketed risk for a sector sums `unit_pv01 * quantity` across the
//! sector's products (a sum, not a weighted average) with quantity the sum
//! of the per-product aggregates.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::warn;

use kosh_core::{pv01_per_unit, ListenerSet, Service, ServiceListener};
use kosh_models::{Bond, BucketedSector, Position, Pv01};

/// Latest `Pv01` per CUSIP.
pub struct RiskService {
    store: HashMap<String, Pv01<Bond>>,
    listeners: ListenerSet<Pv01<Bond>>,
}

impl RiskService {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            listeners: ListenerSet::new(),
        }
    }

    /// Re-risk one position update and fan out the refreshed PV01.
    pub fn add_position(&mut self, position: &Position) {
        let cusip = &position.product.cusip;
        let unit = match pv01_per_unit(cusip) {
            Ok(unit) => unit,
            Err(err) => {
                warn!(%cusip, %err, "position for security outside the reference set");
                return;
            }
        };
        let pv01 = Pv01::new(position.product.clone(), unit, position.aggregate());
        self.store.insert(cusip.clone(), pv01.clone());
        self.listeners.notify_add(&pv01);
    }

    /// Total dollar risk of a sector: `Σ unit_pv01 · qty` over its products,
    /// with quantity `Σ qty`. Products with no position contribute nothing.
    pub fn bucketed_risk(&self, sector: &BucketedSector) -> Pv01<BucketedSector> {
        let mut total_pv01 = 0.0;
        let mut total_quantity = 0;
        for product in &sector.products {
            if let Some(pv01) = self.store.get(&product.cusip) {
                total_pv01 += pv01.pv01 * pv01.quantity as f64;
                total_quantity += pv01.quantity;
            }
        }
        Pv01::new(sector.clone(), total_pv01, total_quantity)
    }
}

impl Default for RiskService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<str, Pv01<Bond>> for RiskService {
    fn get(&self, key: &str) -> Option<&Pv01<Bond>> {
        self.store.get(key)
    }

    fn on_message(&mut self, pv01: Pv01<Bond>) {
        self.store.insert(pv01.product.cusip.clone(), pv01.clone());
        self.listeners.notify_add(&pv01);
    }

    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<Pv01<Bond>>>) {
        self.listeners.add(listener);
    }

    fn listeners(&self) -> &[Arc<dyn ServiceListener<Pv01<Bond>>>] {
        self.listeners.all()
    }
}

/// Chains positions into risk.
pub struct RiskListener {
    service: Arc<Mutex<RiskService>>,
}

impl RiskListener {
    pub fn new(service: Arc<Mutex<RiskService>>) -> Self {
        Self { service }
    }
}

impl ServiceListener<Position> for RiskListener {
    fn process_add(&self, position: &Position) {
        self.service.lock().unwrap().add_position(position);
    }
}
