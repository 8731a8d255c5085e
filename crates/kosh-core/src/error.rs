//! Error kinds for the backbone.
//!
//! Policy per kind: *parse* errors drop the offending record (WARN) and keep
//! reading; *io* errors close the affected connection (ERROR); *logic*
//! errors (invalid state-machine transitions) log WARN and no-op. Nothing
//! propagates across services — a listener failure never aborts the chain
//! for other listeners on the same record.

use kosh_models::TickError;
use thiserror::Error;

/// Failure anywhere in the feed/service fabric.
#[derive(Debug, Error)]
pub enum KoshError {
    /// A record named a CUSIP outside the reference data set.
    #[error("unknown CUSIP {0:?}")]
    UnknownCusip(String),

    /// A feed record did not parse; the record is dropped.
    #[error("malformed {feed} record: {detail}")]
    MalformedRecord {
        feed: &'static str,
        detail: String,
    },

    /// Price text failed tick-notation parsing.
    #[error(transparent)]
    Tick(#[from] TickError),

    /// Socket or file failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A state transition was requested in an invalid state.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
}
