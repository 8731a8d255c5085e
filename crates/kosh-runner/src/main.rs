//! # Kosh Trading Runner
//!
//! The single entry point of the treasury trading backbone.
//!
//! ## Description
//! Orchestrates one full run:
//! - **Scaffolding**: create the data and results directories, clear stale
//!   results.
//! - **Feed synthesis**: write deterministic prices, depth, trades and
//!   inquiries files.
//! - **Servers**: one ingress task per inbound port (3000–3003), one
//!   printer per publish port (3004–3005).
//! - **Wiring**: register the full listener graph, then stream every feed
//!   file into its port and let the chains drain.
//!
//! ## References
//! - IEEE Std 1016-2009: Software Design Descriptions

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use kosh_connectors::{
    ports, serve_printer, FileFeeder, InquiryFeedConnector, MarketFeedConnector,
    PriceFeedConnector, SocketPublisher, TradeFeedConnector,
};
use kosh_core::{bond_for, FeedConnector, CUSIPS};
use kosh_models::{BucketedSector, ExecutionOrder, PriceStream};
use kosh_runner::{datagen, wiring};

/// Command line configuration.
#[derive(Debug, Parser)]
#[command(name = "kosh", about = "US Treasury trading backbone")]
struct Args {
    /// Directory the generated feed files are written to.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory the persisted results are written to.
    #[arg(long, default_value = "results")]
    results_dir: PathBuf,

    /// Price/book records generated per bond.
    #[arg(long, default_value_t = 1000)]
    points: usize,

    /// Seed for the feed generators.
    #[arg(long, default_value_t = 20240105)]
    seed: u64,

    /// Seconds to let the chains drain after the feeds finish.
    #[arg(long, default_value_t = 2)]
    drain_secs: u64,
}

const RESULT_FILES: [&str; 6] = [
    "positions.txt",
    "risk.txt",
    "executions.txt",
    "streaming.txt",
    "allinquiries.txt",
    "gui.txt",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    info!(?args, "kosh starting");

    // scaffolding: fresh results, data dir in place
    std::fs::create_dir_all(&args.data_dir)?;
    std::fs::create_dir_all(&args.results_dir)?;
    for file in RESULT_FILES {
        let _ = std::fs::remove_file(args.results_dir.join(file));
    }

    datagen::generate_feeds(&args.data_dir, args.points, args.seed)?;
    info!(dir = %args.data_dir.display(), points = args.points, "feed files generated");

    // publish ports first so the publishers' loopback connects land
    tokio::spawn(async {
        if let Err(err) = serve_printer("streaming", ports::STREAMING_OUT).await {
            error!(%err, "streaming printer failed");
        }
    });
    tokio::spawn(async {
        if let Err(err) = serve_printer("execution", ports::EXECUTION_OUT).await {
            error!(%err, "execution printer failed");
        }
    });

    let (stream_out, _stream_writer) =
        SocketPublisher::<PriceStream>::connect("streaming", ports::STREAMING_OUT);
    let (execution_out, _execution_writer) =
        SocketPublisher::<ExecutionOrder>::connect("execution", ports::EXECUTION_OUT);

    let backbone = wiring::wire(&args.results_dir, stream_out, execution_out);

    // one ingress task per inbound port
    spawn_feed(PriceFeedConnector::new(backbone.pricing.clone(), ports::PRICES));
    spawn_feed(MarketFeedConnector::new(
        backbone.market_data.clone(),
        ports::MARKET,
    ));
    spawn_feed(TradeFeedConnector::new(
        backbone.trade_booking.clone(),
        ports::TRADES,
    ));
    spawn_feed(InquiryFeedConnector::new(
        backbone.inquiry.clone(),
        ports::INQUIRIES,
    ));

    // stream the files in, one feeder per port, all in parallel
    let feeders = [
        ("prices.txt", ports::PRICES),
        ("marketdata.txt", ports::MARKET),
        ("trades.txt", ports::TRADES),
        ("inquiries.txt", ports::INQUIRIES),
    ]
    .map(|(file, port)| {
        let feeder = FileFeeder::new(args.data_dir.join(file), port);
        tokio::spawn(async move { feeder.run().await })
    });
    for feeder in feeders {
        if let Err(err) = feeder.await? {
            error!(%err, "feeder failed");
        }
    }

    // let the tails of the chains land before reporting
    tokio::time::sleep(Duration::from_secs(args.drain_secs)).await;
    report(&backbone);
    Ok(())
}

fn spawn_feed<C: FeedConnector + 'static>(connector: C) {
    tokio::spawn(async move {
        if let Err(err) = connector.run().await {
            error!(feed = connector.name(), %err, "feed server exited");
        }
    });
}

/// End-of-run summary, including the bucketed risk of the three curve
/// sectors.
fn report(backbone: &wiring::Backbone) {
    let position = backbone.position.lock().unwrap();
    for cusip in CUSIPS {
        if let Some(p) = position.get(cusip) {
            info!(cusip, aggregate = p.aggregate(), "final position");
        }
    }
    drop(position);

    let sectors = [
        ("FrontEnd", &CUSIPS[0..2]),
        ("Belly", &CUSIPS[2..5]),
        ("LongEnd", &CUSIPS[5..7]),
    ];
    let risk = backbone.risk.lock().unwrap();
    for (name, cusips) in sectors {
        let products = cusips
            .iter()
            .map(|c| bond_for(c).expect("reference cusip"))
            .collect();
        let bucket = risk.bucketed_risk(&BucketedSector::new(name, products));
        info!(
            sector = name,
            pv01 = bucket.pv01,
            quantity = bucket.quantity,
            "bucketed risk"
        );
    }

    info!("kosh run complete");
}
