//! # Historical Data Service
//!
//! Type-parameterized persistence fan-out: one instance per upstream
//! service, each appending timestamped records to its own results file.
//!
//! ## Description
//! The generic store needs a per-type persist key and text render; both come
//! from the [`PersistRecord`] trait rather than overload resolution across a
//! fixed union of types. Files are opened in append mode per record; two
//! historical services never share a file, so no locking is needed.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::error;

use kosh_core::ServiceListener;
use kosh_models::{Bond, ExecutionOrder, Inquiry, Position, PriceStream, Pv01};

/// Which upstream service a historical instance persists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistTarget {
    Positions,
    Risk,
    Executions,
    Streaming,
    Inquiries,
}

impl PersistTarget {
    /// Results file this target appends to.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Positions => "positions.txt",
            Self::Risk => "risk.txt",
            Self::Executions => "executions.txt",
            Self::Streaming => "streaming.txt",
            Self::Inquiries => "allinquiries.txt",
        }
    }
}

/// An entity the historical service can persist: a natural store key plus
/// the CSV render its `Display` already produces.
pub trait PersistRecord: std::fmt::Display + Clone + Send + Sync {
    fn persist_key(&self) -> String;
}

impl PersistRecord for Position {
    fn persist_key(&self) -> String {
        self.product.cusip.clone()
    }
}

impl PersistRecord for Pv01<Bond> {
    fn persist_key(&self) -> String {
        self.product.cusip.clone()
    }
}

impl PersistRecord for ExecutionOrder {
    fn persist_key(&self) -> String {
        self.order_id.clone()
    }
}

impl PersistRecord for PriceStream {
    fn persist_key(&self) -> String {
        self.product.cusip.clone()
    }
}

impl PersistRecord for Inquiry {
    fn persist_key(&self) -> String {
        self.inquiry_id.clone()
    }
}

/// Append-only file connector for one results file.
pub struct HistoricalDataConnector {
    path: PathBuf,
}

impl HistoricalDataConnector {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append one `<timestamp>,<record>` line. IO failures are logged and
    /// the record is dropped.
    pub fn append(&self, record: &str) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let result = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .and_then(|mut file| writeln!(file, "{},{}", timestamp, record));
        if let Err(err) = result {
            error!(path = %self.path.display(), %err, "failed to persist record");
        }
    }
}

/// Keyed store plus file persistence for one entity type.
pub struct HistoricalDataService<V: PersistRecord> {
    store: HashMap<String, V>,
    connector: HistoricalDataConnector,
}

impl<V: PersistRecord> HistoricalDataService<V> {
    pub fn new(target: PersistTarget, results_dir: &Path) -> Self {
        Self {
            store: HashMap::new(),
            connector: HistoricalDataConnector::new(results_dir.join(target.file_name())),
        }
    }

    /// Update the store under the entity's persist key and append one line.
    pub fn persist(&mut self, data: &V) {
        self.store.insert(data.persist_key(), data.clone());
        self.connector.append(&data.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.store.get(key)
    }
}

/// Subscribes a historical instance to its upstream service.
pub struct HistoricalDataListener<V: PersistRecord> {
    service: Arc<Mutex<HistoricalDataService<V>>>,
}

impl<V: PersistRecord> HistoricalDataListener<V> {
    pub fn new(service: Arc<Mutex<HistoricalDataService<V>>>) -> Self {
        Self { service }
    }
}

impl<V: PersistRecord> ServiceListener<V> for HistoricalDataListener<V> {
    fn process_add(&self, data: &V) {
        self.service.lock().unwrap().persist(data);
    }
}
