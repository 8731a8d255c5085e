//! End-to-end chain tests: wire the full backbone, push records at the
//! ingress points, and assert what lands in the downstream stores and
//! results files.

use std::fmt::Display;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use kosh_connectors::{FileFeeder, PriceFeedConnector};
use kosh_core::{bond_for, pv01_per_unit, Connector, Service};
use kosh_models::{
    BucketedSector, ExecutionOrder, Inquiry, InquiryState, Order, OrderBook, Price, PriceStream,
    PricingSide, Trade, TradeBook, TradeSide,
};
use kosh_runner::wiring::{self, Backbone};
use kosh_services::MarketDataService;

/// Outbound connector that records rendered records instead of writing to a
/// socket.
struct RecordingConnector<V> {
    records: Mutex<Vec<String>>,
    _entity: PhantomData<fn(&V)>,
}

impl<V> RecordingConnector<V> {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(Vec::new()),
            _entity: PhantomData,
        })
    }

    fn records(&self) -> Vec<String> {
        self.records.lock().unwrap().clone()
    }
}

impl<V: Display + Send + Sync> Connector<V> for RecordingConnector<V> {
    fn publish(&self, data: &V) {
        self.records.lock().unwrap().push(data.to_string());
    }
}

fn backbone(
    results_dir: &Path,
) -> (
    Backbone,
    Arc<RecordingConnector<PriceStream>>,
    Arc<RecordingConnector<ExecutionOrder>>,
) {
    let stream_out = RecordingConnector::<PriceStream>::new();
    let execution_out = RecordingConnector::<ExecutionOrder>::new();
    let wired = wiring::wire(results_dir, stream_out.clone(), execution_out.clone());
    (wired, stream_out, execution_out)
}

fn tight_book(cusip: &str, bid_price: f64, quantity: i64) -> OrderBook {
    let raw = OrderBook::new(
        bond_for(cusip).unwrap(),
        vec![Order::new(bid_price, quantity, PricingSide::Bid)],
        vec![Order::new(
            bid_price + 1.0 / 128.0,
            quantity,
            PricingSide::Offer,
        )],
    );
    MarketDataService::aggregate_depth(raw)
}

fn trade(cusip: &str, id: &str, book: TradeBook, quantity: i64, side: TradeSide) -> Trade {
    Trade::new(
        bond_for(cusip).unwrap(),
        id.to_string(),
        99.5,
        book,
        quantity,
        side,
    )
}

// S1: one price fans out to a stream with alternating visible size
#[test]
fn price_flows_to_stream_gui_and_historical() {
    let dir = tempfile::tempdir().unwrap();
    let (backbone, stream_out, _) = backbone(dir.path());

    let price = Price::new(bond_for("9128283H1").unwrap(), 100.0, 1.0 / 128.0);
    backbone.pricing.lock().unwrap().on_message(price);

    let streaming = backbone.streaming.lock().unwrap();
    let stream = streaming.get("9128283H1").unwrap();
    assert_eq!(stream.bid.price, 100.0 - 1.0 / 256.0);
    assert_eq!(stream.offer.price, 100.0 + 1.0 / 256.0);
    assert_eq!(stream.bid.visible_quantity, 1_000_000);
    assert_eq!(stream.bid.hidden_quantity, 2_000_000);
    assert_eq!(stream.offer.visible_quantity, 1_000_000);

    assert_eq!(stream_out.records().len(), 1);

    let streamed = std::fs::read_to_string(dir.path().join("streaming.txt")).unwrap();
    assert_eq!(streamed.lines().count(), 1);
    assert!(streamed.contains("9128283H1"));

    let gui = std::fs::read_to_string(dir.path().join("gui.txt")).unwrap();
    assert_eq!(gui.lines().count(), 1);
}

// S2: tight books aggress the market with alternating side, and the fills
// flow all the way into positions and risk
#[test]
fn tight_book_executes_books_and_risks() {
    let dir = tempfile::tempdir().unwrap();
    let (backbone, _, execution_out) = backbone(dir.path());

    let bid_price = 100.0 - 1.0 / 128.0;
    let book = tight_book("912828M80", bid_price, 1_000_000);
    for _ in 0..3 {
        backbone.market_data.lock().unwrap().on_message(book.clone());
    }

    // three executions published, BID / OFFER / BID
    let published = execution_out.records();
    assert_eq!(published.len(), 3);

    let executions = std::fs::read_to_string(dir.path().join("executions.txt")).unwrap();
    let lines: Vec<&str> = executions.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains(",BID,MARKET,100-000,1000000,0,"));
    assert!(lines[1].contains(",OFFER,MARKET,"));
    assert!(lines[2].contains(",BID,"));

    // fills rotate books TRSY1 / TRSY2 / TRSY3 and net out to one buy
    let position = backbone.position.lock().unwrap();
    let p = position.get("912828M80").unwrap();
    assert_eq!(p.position(TradeBook::Trsy1), 1_000_000);
    assert_eq!(p.position(TradeBook::Trsy2), -1_000_000);
    assert_eq!(p.position(TradeBook::Trsy3), 1_000_000);
    assert_eq!(p.aggregate(), 1_000_000);
    drop(position);

    let risk = backbone.risk.lock().unwrap();
    assert_eq!(risk.get("912828M80").unwrap().quantity, 1_000_000);
}

// S3: a wide book must not produce an order
#[test]
fn wide_book_emits_no_execution() {
    let dir = tempfile::tempdir().unwrap();
    let (backbone, _, execution_out) = backbone(dir.path());

    let raw = OrderBook::new(
        bond_for("912828M80").unwrap(),
        vec![Order::new(99.99, 1_000_000, PricingSide::Bid)],
        vec![Order::new(99.99 + 1.0 / 32.0, 1_000_000, PricingSide::Offer)],
    );
    backbone
        .market_data
        .lock()
        .unwrap()
        .on_message(MarketDataService::aggregate_depth(raw));

    assert!(execution_out.records().is_empty());
    assert!(backbone
        .algo_execution
        .lock()
        .unwrap()
        .get("912828M80")
        .is_none());
    assert!(!dir.path().join("executions.txt").exists());
}

// S4: trade flow nets positions and re-risks at the current aggregate
#[test]
fn trades_flow_to_position_and_risk() {
    let dir = tempfile::tempdir().unwrap();
    let (backbone, _, _) = backbone(dir.path());

    backbone.trade_booking.lock().unwrap().on_message(trade(
        "912828M80",
        "T1",
        TradeBook::Trsy1,
        1_000_000,
        TradeSide::Buy,
    ));
    backbone.trade_booking.lock().unwrap().on_message(trade(
        "912828M80",
        "T2",
        TradeBook::Trsy2,
        400_000,
        TradeSide::Sell,
    ));

    let position = backbone.position.lock().unwrap();
    assert_eq!(position.get("912828M80").unwrap().aggregate(), 600_000);
    drop(position);

    let risk = backbone.risk.lock().unwrap();
    assert_eq!(risk.get("912828M80").unwrap().quantity, 600_000);
    drop(risk);

    let positions = std::fs::read_to_string(dir.path().join("positions.txt")).unwrap();
    assert_eq!(positions.lines().count(), 2);
    let risks = std::fs::read_to_string(dir.path().join("risk.txt")).unwrap();
    assert_eq!(risks.lines().count(), 2);
}

// S5: an inquiry runs RECEIVED -> QUOTED -> DONE, is erased, and leaves one
// DONE record in the historical file
#[test]
fn inquiry_lifecycle_erases_and_persists_done() {
    let dir = tempfile::tempdir().unwrap();
    let (backbone, _, _) = backbone(dir.path());

    let inquiry = Inquiry {
        inquiry_id: "I1".to_string(),
        product: bond_for("9128283H1").unwrap(),
        side: TradeSide::Buy,
        quantity: 1_000_000,
        price: 100.0,
        state: InquiryState::Received,
    };
    backbone.inquiry.lock().unwrap().on_message(inquiry);

    assert!(backbone.inquiry.lock().unwrap().get("I1").is_none());

    let persisted = std::fs::read_to_string(dir.path().join("allinquiries.txt")).unwrap();
    let lines: Vec<&str> = persisted.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("DONE"));
}

// S6 / invariant 3: bucket quantity is the sum of per-product aggregates,
// bucket pv01 the sum of unit-pv01-weighted quantities
#[test]
fn bucket_rollup_matches_position_aggregates() {
    let dir = tempfile::tempdir().unwrap();
    let (backbone, _, _) = backbone(dir.path());

    backbone.trade_booking.lock().unwrap().on_message(trade(
        "912828M80",
        "T1",
        TradeBook::Trsy1,
        1_000_000,
        TradeSide::Buy,
    ));
    backbone.trade_booking.lock().unwrap().on_message(trade(
        "9128283F5",
        "T2",
        TradeBook::Trsy1,
        2_000_000,
        TradeSide::Buy,
    ));

    let sector = BucketedSector::new(
        "Belly",
        vec![
            bond_for("912828M80").unwrap(),
            bond_for("9128283F5").unwrap(),
        ],
    );
    let bucket = backbone.risk.lock().unwrap().bucketed_risk(&sector);
    assert_eq!(bucket.quantity, 3_000_000);

    let expected = pv01_per_unit("912828M80").unwrap() * 1_000_000.0
        + pv01_per_unit("9128283F5").unwrap() * 2_000_000.0;
    assert!((bucket.pv01 - expected).abs() < 1e-6);
}

// invariant 7: re-delivering the same book changes nothing in the market
// data store
#[test]
fn book_redelivery_is_idempotent_on_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let (backbone, _, _) = backbone(dir.path());

    let book = tight_book("9128283J7", 99.5, 2_000_000);
    backbone.market_data.lock().unwrap().on_message(book.clone());
    let first = backbone
        .market_data
        .lock()
        .unwrap()
        .get("9128283J7")
        .unwrap()
        .clone();
    backbone.market_data.lock().unwrap().on_message(book);
    assert_eq!(
        *backbone
            .market_data
            .lock()
            .unwrap()
            .get("9128283J7")
            .unwrap(),
        first
    );
}

// the socket path: feed server, framing, parse, service store
#[tokio::test]
async fn price_feed_round_trips_over_a_socket() {
    let dir = tempfile::tempdir().unwrap();
    let (backbone, _, _) = backbone(dir.path());

    let connector = PriceFeedConnector::new(backbone.pricing.clone(), 13000);
    tokio::spawn(async move {
        let _ = kosh_core::FeedConnector::run(&connector).await;
    });

    let feed = dir.path().join("prices.txt");
    std::fs::write(
        &feed,
        "2024-01-05 09:30:00.000,9128283H1,99-31+,100-00+,0.0078125\n\
         2024-01-05 09:30:00.010,912810RZ3,not,a,price\n\
         2024-01-05 09:30:00.020,912810RZ3,99-000,99-010,0.03125\n",
    )
    .unwrap();
    FileFeeder::new(feed, 13000).run().await.unwrap();

    // give the server a beat to drain the last frame
    tokio::time::sleep(Duration::from_millis(300)).await;

    let pricing = backbone.pricing.lock().unwrap();
    let two_year = pricing.get("9128283H1").unwrap();
    let bid = 99.0 + 31.0 / 32.0 + 4.0 / 256.0;
    let ask = 100.0 + 4.0 / 256.0;
    assert_eq!(two_year.mid, (bid + ask) / 2.0);

    // the malformed middle record was dropped, the connection survived
    let thirty_year = pricing.get("912810RZ3").unwrap();
    assert_eq!(thirty_year.bid_offer_spread, 0.03125);
}
