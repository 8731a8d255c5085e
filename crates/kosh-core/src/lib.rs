//! # Kosh Core
//!
//! The Service/Listener/Connector dataflow fabric, the treasury reference
//! data, and the error policy shared by every crate in the workspace.

pub mod error;
pub mod fabric;
pub mod refdata;

pub use error::KoshError;
pub use fabric::{Connector, FeedConnector, ListenerSet, Service, ServiceListener};
pub use refdata::{bond_for, pv01_per_unit, CUSIPS};
