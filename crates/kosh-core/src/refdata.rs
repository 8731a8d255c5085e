//! # Treasury Reference Data
//!
//! The seven on-the-run treasury bonds the backbone trades, and their unit
//! PV01 values derived from a closed-form 1bp bump of discounted cash flows
//! at fixed per-tenor yields.

use chrono::NaiveDate;
use kosh_models::Bond;

use crate::error::KoshError;

/// Every CUSIP in the reference set, tenor-ordered (2Y..30Y).
pub const CUSIPS: [&str; 7] = [
    "9128283H1",
    "9128283L2",
    "912828M80",
    "9128283J7",
    "9128283F5",
    "912810TW8",
    "912810RZ3",
];

/// Face value the unit PV01 is quoted against.
const FACE: f64 = 1000.0;
/// Semi-annual coupons.
const FREQUENCY: u32 = 2;

// cusip -> (ticker, coupon, maturity y/m/d, tenor years, market yield)
const BONDS: [(&str, &str, f64, (i32, u32, u32), u32, f64); 7] = [
    ("9128283H1", "US2Y", 0.01750, (2019, 11, 30), 2, 0.0464),
    ("9128283L2", "US3Y", 0.01875, (2020, 12, 15), 3, 0.0440),
    ("912828M80", "US5Y", 0.02000, (2022, 11, 30), 5, 0.0412),
    ("9128283J7", "US7Y", 0.02125, (2024, 11, 30), 7, 0.0430),
    ("9128283F5", "US10Y", 0.02250, (2027, 12, 15), 10, 0.0428),
    ("912810TW8", "US20Y", 0.02500, (2037, 12, 15), 20, 0.0461),
    ("912810RZ3", "US30Y", 0.02750, (2047, 12, 15), 30, 0.0443),
];

fn entry(cusip: &str) -> Result<&'static (&'static str, &'static str, f64, (i32, u32, u32), u32, f64), KoshError> {
    BONDS
        .iter()
        .find(|b| b.0 == cusip)
        .ok_or_else(|| KoshError::UnknownCusip(cusip.to_string()))
}

/// Build the `Bond` for a CUSIP, or fail with `UnknownCusip`.
pub fn bond_for(cusip: &str) -> Result<Bond, KoshError> {
    let (cusip, ticker, coupon, (y, m, d), _, _) = entry(cusip)?;
    let maturity = NaiveDate::from_ymd_opt(*y, *m, *d).expect("static maturity date");
    Ok(Bond::new(cusip, ticker, *coupon, maturity))
}

/// Unit PV01 for a CUSIP, or fail with `UnknownCusip`.
pub fn pv01_per_unit(cusip: &str) -> Result<f64, KoshError> {
    let (_, _, coupon, _, years, market_yield) = entry(cusip)?;
    Ok(pv01_closed_form(FACE, *coupon, *market_yield, *years, FREQUENCY))
}

/// Present value of the bond's cash flows at a given yield.
fn present_value(face: f64, coupon_rate: f64, yield_rate: f64, years: u32, frequency: u32) -> f64 {
    let coupon = face * coupon_rate / frequency as f64;
    let periods = years * frequency;
    let per_period = yield_rate / frequency as f64;
    let mut pv = 0.0;
    for t in 1..=periods {
        pv += coupon / (1.0 + per_period).powi(t as i32);
    }
    pv + face / (1.0 + per_period).powi(periods as i32)
}

/// PV01: price change for a 1bp upward parallel shift in yield.
fn pv01_closed_form(face: f64, coupon_rate: f64, yield_rate: f64, years: u32, frequency: u32) -> f64 {
    present_value(face, coupon_rate, yield_rate, years, frequency)
        - present_value(face, coupon_rate, yield_rate + 0.0001, years, frequency)
}
