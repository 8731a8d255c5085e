//! # Inbound Feed Connectors
//!
//! One connector per feed port. Each parses CSV records into its typed
//! entity via the reference data and drives its service's `on_message`;
//! the market data connector additionally aggregates the raw depth before
//! handing the book over.
//!
//! ## Record formats
//! ```text
//! prices     timestamp,cusip,bid,ask,spread
//! market     timestamp,cusip,bid1,bidSz1,ask1,askSz1,...,bid5,bidSz5,ask5,askSz5
//! trades     cusip,tradeId,price,book,quantity,side
//! inquiries  inquiryId,cusip,side,quantity,price,state
//! ```
//! Prices are decimal or 32nd-fractional. Unknown CUSIPs, short records and
//! unparseable fields are parse errors: the record is dropped, the
//! connection lives on.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use kosh_core::{bond_for, FeedConnector, KoshError, Service};
use kosh_models::{
    parse_price, Inquiry, Order, OrderBook, Price, PricingSide, Trade,
};
use kosh_services::{
    InquiryService, MarketDataService, PricingService, TradeBookingService, BOOK_DEPTH,
};

use crate::server::serve_records;

fn malformed(feed: &'static str, line: &str) -> KoshError {
    KoshError::MalformedRecord {
        feed,
        detail: line.to_string(),
    }
}

/// Price feed (port 3000) into the pricing service.
pub struct PriceFeedConnector {
    service: Arc<Mutex<PricingService>>,
    port: u16,
}

impl PriceFeedConnector {
    pub fn new(service: Arc<Mutex<PricingService>>, port: u16) -> Self {
        Self { service, port }
    }

    fn parse(line: &str) -> Result<Price, KoshError> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 5 {
            return Err(malformed("prices", line));
        }
        let product = bond_for(fields[1])?;
        let bid = parse_price(fields[2])?;
        let ask = parse_price(fields[3])?;
        let spread: f64 = fields[4]
            .trim()
            .parse()
            .map_err(|_| malformed("prices", line))?;
        Ok(Price::new(product, (bid + ask) / 2.0, spread))
    }
}

#[async_trait]
impl FeedConnector for PriceFeedConnector {
    async fn run(&self) -> anyhow::Result<()> {
        let service = self.service.clone();
        serve_records(
            self.name(),
            self.port,
            b'\n',
            Arc::new(move |line: &str| {
                let price = Self::parse(line)?;
                service.lock().unwrap().on_message(price);
                Ok(())
            }),
        )
        .await
    }

    fn name(&self) -> &'static str {
        "prices"
    }
}

/// Market depth feed (port 3001) into the market data service.
pub struct MarketFeedConnector {
    service: Arc<Mutex<MarketDataService>>,
    port: u16,
}

impl MarketFeedConnector {
    pub fn new(service: Arc<Mutex<MarketDataService>>, port: u16) -> Self {
        Self { service, port }
    }

    /// Parse the five raw levels per side. The raw book is aggregated
    /// before it reaches the service.
    fn parse(line: &str) -> Result<OrderBook, KoshError> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 2 + 4 * BOOK_DEPTH {
            return Err(malformed("market", line));
        }
        let product = bond_for(fields[1])?;

        let mut bid_stack = Vec::with_capacity(BOOK_DEPTH);
        let mut offer_stack = Vec::with_capacity(BOOK_DEPTH);
        for level in 0..BOOK_DEPTH {
            let base = 2 + 4 * level;
            let bid_price = parse_price(fields[base])?;
            let bid_quantity: i64 = fields[base + 1]
                .trim()
                .parse()
                .map_err(|_| malformed("market", line))?;
            let ask_price = parse_price(fields[base + 2])?;
            let ask_quantity: i64 = fields[base + 3]
                .trim()
                .parse()
                .map_err(|_| malformed("market", line))?;
            bid_stack.push(Order::new(bid_price, bid_quantity, PricingSide::Bid));
            offer_stack.push(Order::new(ask_price, ask_quantity, PricingSide::Offer));
        }
        Ok(OrderBook::new(product, bid_stack, offer_stack))
    }
}

#[async_trait]
impl FeedConnector for MarketFeedConnector {
    async fn run(&self) -> anyhow::Result<()> {
        let service = self.service.clone();
        serve_records(
            self.name(),
            self.port,
            b'\n',
            Arc::new(move |line: &str| {
                let raw = Self::parse(line)?;
                let aggregated = MarketDataService::aggregate_depth(raw);
                service.lock().unwrap().on_message(aggregated);
                Ok(())
            }),
        )
        .await
    }

    fn name(&self) -> &'static str {
        "market"
    }
}

/// Trade feed (port 3002) into the trade booking service.
pub struct TradeFeedConnector {
    service: Arc<Mutex<TradeBookingService>>,
    port: u16,
}

impl TradeFeedConnector {
    pub fn new(service: Arc<Mutex<TradeBookingService>>, port: u16) -> Self {
        Self { service, port }
    }

    fn parse(line: &str) -> Result<Trade, KoshError> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 6 {
            return Err(malformed("trades", line));
        }
        let product = bond_for(fields[0])?;
        let price = parse_price(fields[2])?;
        let book = fields[3].parse().map_err(|_| malformed("trades", line))?;
        let quantity: i64 = fields[4]
            .trim()
            .parse()
            .map_err(|_| malformed("trades", line))?;
        let side = fields[5].parse().map_err(|_| malformed("trades", line))?;
        Ok(Trade::new(
            product,
            fields[1].to_string(),
            price,
            book,
            quantity,
            side,
        ))
    }
}

#[async_trait]
impl FeedConnector for TradeFeedConnector {
    async fn run(&self) -> anyhow::Result<()> {
        let service = self.service.clone();
        serve_records(
            self.name(),
            self.port,
            b'\n',
            Arc::new(move |line: &str| {
                let trade = Self::parse(line)?;
                service.lock().unwrap().on_message(trade);
                Ok(())
            }),
        )
        .await
    }

    fn name(&self) -> &'static str {
        "trades"
    }
}

/// Inquiry feed (port 3003) into the inquiry service.
pub struct InquiryFeedConnector {
    service: Arc<Mutex<InquiryService>>,
    port: u16,
}

impl InquiryFeedConnector {
    pub fn new(service: Arc<Mutex<InquiryService>>, port: u16) -> Self {
        Self { service, port }
    }

    fn parse(line: &str) -> Result<Inquiry, KoshError> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 6 {
            return Err(malformed("inquiries", line));
        }
        let product = bond_for(fields[1])?;
        let side = fields[2].parse().map_err(|_| malformed("inquiries", line))?;
        let quantity: i64 = fields[3]
            .trim()
            .parse()
            .map_err(|_| malformed("inquiries", line))?;
        let price = parse_price(fields[4])?;
        let state = fields[5].parse().map_err(|_| malformed("inquiries", line))?;
        Ok(Inquiry {
            inquiry_id: fields[0].to_string(),
            product,
            side,
            quantity,
            price,
            state,
        })
    }
}

#[async_trait]
impl FeedConnector for InquiryFeedConnector {
    async fn run(&self) -> anyhow::Result<()> {
        let service = self.service.clone();
        serve_records(
            self.name(),
            self.port,
            b'\n',
            Arc::new(move |line: &str| {
                let inquiry = Self::parse(line)?;
                service.lock().unwrap().on_message(inquiry);
                Ok(())
            }),
        )
        .await
    }

    fn name(&self) -> &'static str {
        "inquiries"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kosh_models::{InquiryState, TradeBook, TradeSide};

    #[test]
    fn price_record_parses_fractional_sides() {
        let price =
            PriceFeedConnector::parse("2024-01-05 09:30:00.000,9128283H1,99-31+,100-000,0.0078125")
                .unwrap();
        assert_eq!(price.product.cusip, "9128283H1");
        let bid = 99.0 + 31.0 / 32.0 + 4.0 / 256.0;
        assert_eq!(price.mid, (bid + 100.0) / 2.0);
        assert_eq!(price.bid_offer_spread, 0.0078125);
    }

    #[test]
    fn market_record_builds_five_levels_per_side() {
        let line = "2024-01-05 09:30:00.000,912828M80,\
                    99-31+,1000000,100-000,1000000,\
                    99-310,2000000,100-002,2000000,\
                    99-316,3000000,100-006,3000000,\
                    99-312,4000000,100-012,4000000,\
                    99-306,5000000,100-016,5000000";
        let book = MarketFeedConnector::parse(line).unwrap();
        assert_eq!(book.bid_stack.len(), 5);
        assert_eq!(book.offer_stack.len(), 5);
        assert_eq!(book.bid_stack[0].quantity, 1_000_000);
        assert_eq!(book.offer_stack[4].quantity, 5_000_000);
    }

    #[test]
    fn trade_record_parses() {
        let trade =
            TradeFeedConnector::parse("912810RZ3,TRADEID00001,99-255,TRSY2,3000000,SELL").unwrap();
        assert_eq!(trade.book, TradeBook::Trsy2);
        assert_eq!(trade.side, TradeSide::Sell);
        assert_eq!(trade.quantity, 3_000_000);
    }

    #[test]
    fn inquiry_record_parses() {
        let inquiry =
            InquiryFeedConnector::parse("INQ000000001,9128283F5,BUY,2000000,100-001,RECEIVED")
                .unwrap();
        assert_eq!(inquiry.state, InquiryState::Received);
        assert_eq!(inquiry.side, TradeSide::Buy);
    }

    #[test]
    fn malformed_records_are_rejected_not_panicked() {
        assert!(PriceFeedConnector::parse("Timestamp,CUSIP,Bid,Ask,Spread").is_err());
        assert!(PriceFeedConnector::parse("too,short").is_err());
        assert!(TradeFeedConnector::parse("BADCUSIP99,T1,99-000,TRSY1,1000000,BUY").is_err());
        assert!(InquiryFeedConnector::parse("I1,9128283F5,BUY,2000000,100-001,NOT_A_STATE").is_err());
    }
}
