//! # Product Identity
//!
//! The backbone trades one product class: US Treasury cash bonds, identified
//! by 9-character CUSIP. Every keyed entity carries its `Bond` by value so a
//! record never loses the identity of the security it describes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A US Treasury bond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bond {
    /// 9-character CUSIP, the store key everywhere a product keys a map.
    pub cusip: String,
    /// On-the-run tenor ticker, e.g. "US10Y".
    pub ticker: String,
    /// Annual coupon rate as a decimal (0.0225 = 2.25%).
    pub coupon: f64,
    /// Maturity date.
    pub maturity: NaiveDate,
}

impl Bond {
    pub fn new(cusip: &str, ticker: &str, coupon: f64, maturity: NaiveDate) -> Self {
        Self {
            cusip: cusip.to_string(),
            ticker: ticker.to_string(),
            coupon,
            maturity,
        }
    }
}

impl std::fmt::Display for Bond {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.cusip)
    }
}
