//! Customer inquiries and their lifecycle states.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::product::Bond;
use crate::tick::format_price;
use crate::trade::TradeSide;

/// Lifecycle state of a customer inquiry.
///
/// `Done`, `Rejected` and `CustomerRejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InquiryState {
    Received,
    Quoted,
    Done,
    Rejected,
    CustomerRejected,
}

impl InquiryState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Rejected | Self::CustomerRejected)
    }
}

impl std::fmt::Display for InquiryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Received => write!(f, "RECEIVED"),
            Self::Quoted => write!(f, "QUOTED"),
            Self::Done => write!(f, "DONE"),
            Self::Rejected => write!(f, "REJECTED"),
            Self::CustomerRejected => write!(f, "CUSTOMER_REJECTED"),
        }
    }
}

impl FromStr for InquiryState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RECEIVED" => Ok(Self::Received),
            "QUOTED" => Ok(Self::Quoted),
            "DONE" => Ok(Self::Done),
            "REJECTED" => Ok(Self::Rejected),
            "CUSTOMER_REJECTED" => Ok(Self::CustomerRejected),
            other => Err(format!("unknown inquiry state {other:?}")),
        }
    }
}

/// A customer inquiry for a quote.
///
/// Invariant: `inquiry_id` unique across all inquiries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
    pub inquiry_id: String,
    pub product: Bond,
    pub side: TradeSide,
    pub quantity: i64,
    pub price: f64,
    pub state: InquiryState,
}

impl std::fmt::Display for Inquiry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{}",
            self.inquiry_id,
            self.product.cusip,
            self.side,
            self.quantity,
            format_price(self.price),
            self.state
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refdata_fixture::bond_fixture;

    #[test]
    fn states_round_trip_their_labels() {
        for state in [
            InquiryState::Received,
            InquiryState::Quoted,
            InquiryState::Done,
            InquiryState::Rejected,
            InquiryState::CustomerRejected,
        ] {
            let parsed: InquiryState = state.to_string().parse().unwrap();
            assert_eq!(parsed, state);
        }
        assert!("PENDING".parse::<InquiryState>().is_err());
    }

    #[test]
    fn only_done_rejected_and_customer_rejected_are_terminal() {
        assert!(!InquiryState::Received.is_terminal());
        assert!(!InquiryState::Quoted.is_terminal());
        assert!(InquiryState::Done.is_terminal());
        assert!(InquiryState::Rejected.is_terminal());
        assert!(InquiryState::CustomerRejected.is_terminal());
    }

    #[test]
    fn render_ends_with_state() {
        let inquiry = Inquiry {
            inquiry_id: "INQ000000001".to_string(),
            product: bond_fixture(),
            side: TradeSide::Sell,
            quantity: 3_000_000,
            price: 100.0,
            state: InquiryState::Received,
        };
        assert_eq!(
            inquiry.to_string(),
            "INQ000000001,912828M80,SELL,3000000,100-000,RECEIVED"
        );
    }
}
