//! # Inquiry Service
//!
//! State machine over customer inquiries.
//!
//! ## Lifecycle
//! ```text
//! RECEIVED ──quoter──▶ QUOTED ──re-entry──▶ DONE (erased after fan-out)
//!                                   │
//!                                   └──▶ REJECTED (stored, terminal)
//! ```
//! The quoting connector of the original system looped QUOTED inquiries
//! back over a socket; here the loopback collapses into direct re-entry
//! through `on_message`. Listeners are notified exactly once per state
//! transition.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use kosh_core::{KoshError, ListenerSet, Service, ServiceListener};
use kosh_models::{Inquiry, InquiryState};

/// Publisher half of the inquiry connector: answers a RECEIVED inquiry by
/// flipping it to QUOTED and handing it straight back for re-entry.
pub struct InquiryQuoter;

impl InquiryQuoter {
    /// Quote a RECEIVED inquiry. Anything else is not quotable.
    pub fn publish(&self, mut inquiry: Inquiry) -> Option<Inquiry> {
        if inquiry.state == InquiryState::Received {
            inquiry.state = InquiryState::Quoted;
            Some(inquiry)
        } else {
            None
        }
    }
}

/// Keyed store of in-flight inquiries. DONE inquiries are erased once
/// fanned out, so a terminal inquiry never produces further add events.
pub struct InquiryService {
    store: HashMap<String, Inquiry>,
    listeners: ListenerSet<Inquiry>,
    quoter: InquiryQuoter,
}

impl InquiryService {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            listeners: ListenerSet::new(),
            quoter: InquiryQuoter,
        }
    }

    /// Re-price a stored inquiry and fan out the update.
    pub fn send_quote(&mut self, inquiry_id: &str, price: f64) {
        match self.store.get_mut(inquiry_id) {
            Some(inquiry) => {
                inquiry.price = price;
                let snapshot = inquiry.clone();
                self.listeners.notify_add(&snapshot);
            }
            None => warn!(inquiry_id, "quote for unknown inquiry"),
        }
    }

    /// Move a stored inquiry to REJECTED (terminal, stays stored).
    pub fn reject_inquiry(&mut self, inquiry_id: &str) {
        match self.store.get_mut(inquiry_id) {
            Some(inquiry) => inquiry.state = InquiryState::Rejected,
            None => warn!(inquiry_id, "reject for unknown inquiry"),
        }
    }
}

impl Default for InquiryService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<str, Inquiry> for InquiryService {
    fn get(&self, key: &str) -> Option<&Inquiry> {
        self.store.get(key)
    }

    fn on_message(&mut self, inquiry: Inquiry) {
        match inquiry.state {
            InquiryState::Received => {
                if let Some(quoted) = self.quoter.publish(inquiry) {
                    self.on_message(quoted);
                }
            }
            InquiryState::Quoted => {
                let mut done = inquiry;
                done.state = InquiryState::Done;
                self.store.remove(&done.inquiry_id);
                self.listeners.notify_add(&done);
            }
            state => {
                // Nothing to progress; keep the record, note the oddity.
                let err = KoshError::InvalidTransition(format!(
                    "inquiry {} cannot progress from {}",
                    inquiry.inquiry_id, state
                ));
                warn!(%err, "ignoring inquiry");
                self.store.insert(inquiry.inquiry_id.clone(), inquiry);
            }
        }
    }

    fn add_listener(&mut self, listener: Arc<dyn ServiceListener<Inquiry>>) {
        self.listeners.add(listener);
    }

    fn listeners(&self) -> &[Arc<dyn ServiceListener<Inquiry>>] {
        self.listeners.all()
    }
}
