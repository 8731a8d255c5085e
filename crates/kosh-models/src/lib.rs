//! # Kosh Domain Models
//!
//! Leaf crate holding every keyed entity that flows through the trading
//! backbone, the enums that classify them, and the treasury tick codec used
//! by every wire format and persisted record.
//!
//! ## Design Goals
//! - **Identity**: every entity carries its `Bond` by value; the store key
//!   (CUSIP, trade id, order id, inquiry id) is always recoverable from the
//!   entity itself.
//! - **Immutable-once-stored**: updates replace by key; nothing here holds
//!   interior mutability.
//! - **Render stability**: `Display` impls produce the exact CSV field order
//!   the persisters and publishers append, so a record formats identically
//!   everywhere it is written.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

pub mod book;
pub mod execution;
pub mod inquiry;
pub mod position;
pub mod price;
pub mod product;
pub mod risk;
pub mod stream;
pub mod tick;
pub mod trade;

pub use book::{BidOffer, Order, OrderBook, PricingSide};
pub use execution::{AlgoExecution, ExecutionOrder, Market, OrderType};
pub use inquiry::{Inquiry, InquiryState};
pub use position::Position;
pub use price::Price;
pub use product::Bond;
pub use risk::{BucketedSector, Pv01};
pub use stream::{AlgoStream, PriceStream, PriceStreamOrder};
pub use tick::{format_price, parse_price, TickError};
pub use trade::{Trade, TradeBook, TradeSide};

#[cfg(test)]
pub(crate) mod refdata_fixture {
    use crate::product::Bond;
    use chrono::NaiveDate;

    pub fn bond_fixture() -> Bond {
        Bond::new(
            "912828M80",
            "US5Y",
            0.02,
            NaiveDate::from_ymd_opt(2022, 11, 30).unwrap(),
        )
    }
}
