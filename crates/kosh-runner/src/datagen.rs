//! # Feed Synthesis
//!
//! Deterministic mock feeds for the four inbound ports, written before the
//! ingress tasks start.
//!
//! ## Description
//! - **Prices**: per bond, a mid oscillating between 99 and 101 in 1/256
//!   steps, with a random bid/offer spread between 1/128 and 1/64.
//! - **Order books**: depth 5 around the same mid with a fixed spread
//!   oscillating between 1/128 and 1/32 in 1/128 steps; level sizes are
//!   `level * 1M`. At the tight end of the oscillation the top-of-book
//!   spread is 1/128, which is what arms the execution algo.
//! - **Trades**: ten per bond, alternating BUY/SELL, sizes cycling 1M–5M,
//!   books rotating TRSY1/2/3.
//! - **Inquiries**: ten per bond, alternating side, all RECEIVED.
//!
//! All prices are written in 32nd fractional notation. The generator is
//! seeded, so one seed produces one byte-identical set of feeds.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Duration, Local};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use kosh_core::CUSIPS;
use kosh_models::format_price;
use kosh_services::ids::random_id;

const MID_LOW: f64 = 99.0;
const MID_HIGH: f64 = 101.0;
const MID_STEP: f64 = 1.0 / 256.0;
const BOOK_SPREAD_TIGHT: f64 = 1.0 / 128.0;
const BOOK_SPREAD_WIDE: f64 = 1.0 / 32.0;

/// Write all four feed files into `data_dir`.
pub fn generate_feeds(data_dir: &Path, points: usize, seed: u64) -> anyhow::Result<()> {
    generate_prices_and_books(
        &data_dir.join("prices.txt"),
        &data_dir.join("marketdata.txt"),
        points,
        seed,
    )?;
    generate_trades(&data_dir.join("trades.txt"), seed)?;
    generate_inquiries(&data_dir.join("inquiries.txt"), seed)?;
    Ok(())
}

fn timestamp(at: DateTime<Local>) -> String {
    at.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/// Prices and order books share one walk of the mid so the two feeds stay
/// coherent per bond.
fn generate_prices_and_books(
    price_file: &Path,
    book_file: &Path,
    points: usize,
    seed: u64,
) -> anyhow::Result<()> {
    let mut prices = BufWriter::new(File::create(price_file)?);
    let mut books = BufWriter::new(File::create(book_file)?);
    let mut rng = Pcg64::seed_from_u64(seed);

    for cusip in CUSIPS {
        let mut mid = MID_LOW;
        let mut mid_up = true;
        let mut book_spread = BOOK_SPREAD_TIGHT;
        let mut spread_up = true;
        let mut at = Local::now();

        for _ in 0..points {
            at = at + Duration::milliseconds(rng.gen_range(1..=20));
            let stamp = timestamp(at);

            // price record: random spread in [1/128, 1/64]
            let spread = rng.gen_range(1.0 / 128.0..=1.0 / 64.0);
            let bid = mid - spread / 2.0;
            let ask = mid + spread / 2.0;
            writeln!(
                prices,
                "{},{},{},{},{}",
                stamp,
                cusip,
                format_price(bid),
                format_price(ask),
                spread
            )?;

            // book record: five levels widening by half the fixed spread each
            write!(books, "{},{}", stamp, cusip)?;
            for level in 1..=5u32 {
                let offset = book_spread * level as f64 / 2.0;
                let size = level as i64 * 1_000_000;
                write!(
                    books,
                    ",{},{},{},{}",
                    format_price(mid - offset),
                    size,
                    format_price(mid + offset),
                    size
                )?;
            }
            writeln!(books)?;

            // oscillate the mid between 99 and 101
            if mid_up {
                mid += MID_STEP;
                if ask >= MID_HIGH {
                    mid_up = false;
                }
            } else {
                mid -= MID_STEP;
                if bid <= MID_LOW {
                    mid_up = true;
                }
            }

            // oscillate the book spread between 1/128 and 1/32
            if spread_up {
                book_spread += BOOK_SPREAD_TIGHT;
                if book_spread >= BOOK_SPREAD_WIDE {
                    spread_up = false;
                }
            } else {
                book_spread -= BOOK_SPREAD_TIGHT;
                if book_spread <= BOOK_SPREAD_TIGHT {
                    spread_up = true;
                }
            }
        }
    }

    prices.flush()?;
    books.flush()?;
    Ok(())
}

fn generate_trades(trade_file: &Path, seed: u64) -> anyhow::Result<()> {
    let mut trades = BufWriter::new(File::create(trade_file)?);
    let mut rng = Pcg64::seed_from_u64(seed);
    let books = ["TRSY1", "TRSY2", "TRSY3"];
    let quantities = [1_000_000i64, 2_000_000, 3_000_000, 4_000_000, 5_000_000];

    for cusip in CUSIPS {
        for i in 0..10 {
            let side = if i % 2 == 0 { "BUY" } else { "SELL" };
            // buys print through the bid range, sells through the offer range
            let price = if side == "BUY" {
                rng.gen_range(99.0..100.0)
            } else {
                rng.gen_range(100.0..101.0)
            };
            writeln!(
                trades,
                "{},{},{},{},{},{}",
                cusip,
                random_id(12),
                format_price(price),
                books[i % books.len()],
                quantities[i % quantities.len()],
                side
            )?;
        }
    }
    trades.flush()?;
    Ok(())
}

fn generate_inquiries(inquiry_file: &Path, seed: u64) -> anyhow::Result<()> {
    let mut inquiries = BufWriter::new(File::create(inquiry_file)?);
    let mut rng = Pcg64::seed_from_u64(seed);
    let quantities = [1_000_000i64, 2_000_000, 3_000_000, 4_000_000, 5_000_000];

    for cusip in CUSIPS {
        for i in 0..10 {
            let side = if i % 2 == 0 { "BUY" } else { "SELL" };
            let price = if side == "BUY" {
                rng.gen_range(99.0..100.0)
            } else {
                rng.gen_range(100.0..101.0)
            };
            writeln!(
                inquiries,
                "{},{},{},{},{},RECEIVED",
                random_id(12),
                cusip,
                side,
                quantities[i % quantities.len()],
                format_price(price)
            )?;
        }
    }
    inquiries.flush()?;
    Ok(())
}
