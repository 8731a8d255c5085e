//! # Kosh Connectors
//!
//! The boundary layer of the backbone: inbound TCP feed servers that parse
//! wire records into entities and drive the service fabric, the file feeder
//! that replays generated feed files into those ports, and the outbound
//! publishers for streams and executions.
//!
//! ## Port layout
//! ```text
//! 3000 prices     \n-framed   inbound
//! 3001 market     \n-framed   inbound
//! 3002 trades     \n-framed   inbound
//! 3003 inquiries  \n-framed   inbound
//! 3004 streaming  \r-framed   outbound (loopback printer)
//! 3005 execution  \r-framed   outbound (loopback printer)
//! ```
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

pub mod codec;
pub mod feeder;
pub mod feeds;
pub mod publish;
mod server;

pub use codec::drain_frames;
pub use feeder::FileFeeder;
pub use feeds::{
    InquiryFeedConnector, MarketFeedConnector, PriceFeedConnector, TradeFeedConnector,
};
pub use publish::{serve_printer, SocketPublisher};

/// Default localhost port per feed.
pub mod ports {
    pub const PRICES: u16 = 3000;
    pub const MARKET: u16 = 3001;
    pub const TRADES: u16 = 3002;
    pub const INQUIRIES: u16 = 3003;
    pub const STREAMING_OUT: u16 = 3004;
    pub const EXECUTION_OUT: u16 = 3005;
}
