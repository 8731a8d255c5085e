//! # Kosh Domain Services
//!
//! The stages of the trading backbone, each a keyed store with listener
//! fan-out, chained per the wiring in the runner:
//!
//! ```text
//! prices ──▶ Pricing ──▶ AlgoStreaming ──▶ Streaming ──▶ socket 3004
//!               └──▶ Gui (gui.txt)              └──▶ Historical (streaming.txt)
//! market ──▶ MarketData ──▶ AlgoExecution ──▶ Execution ──▶ socket 3005
//!                                 │               ├──▶ Historical (executions.txt)
//!                                 │               └──▶ TradeBooking (exec fills)
//! trades ──▶ TradeBooking ──▶ Position ──▶ Risk ──▶ Historical (risk.txt)
//!                                 └──▶ Historical (positions.txt)
//! inquiries ──▶ Inquiry ──▶ Historical (allinquiries.txt)
//! ```

pub mod algo_execution;
pub mod algo_streaming;
pub mod execution;
pub mod gui;
pub mod historical;
pub mod ids;
pub mod inquiry;
pub mod market_data;
pub mod position;
pub mod pricing;
pub mod streaming;
pub mod trade_booking;

pub use algo_execution::{AlgoExecutionListener, AlgoExecutionService, TIGHTEST_SPREAD};
pub use algo_streaming::{AlgoStreamingListener, AlgoStreamingService};
pub use execution::{ExecutionListener, ExecutionService};
pub use gui::{GuiListener, GuiService, GUI_THROTTLE};
pub use historical::{
    HistoricalDataConnector, HistoricalDataListener, HistoricalDataService, PersistRecord,
    PersistTarget,
};
pub use inquiry::{InquiryQuoter, InquiryService};
pub use market_data::{MarketDataService, BOOK_DEPTH};
pub use position::{PositionListener, PositionService};
pub use pricing::PricingService;
pub use streaming::{StreamingListener, StreamingService};
pub use trade_booking::{TradeBookingExecutionListener, TradeBookingService};
