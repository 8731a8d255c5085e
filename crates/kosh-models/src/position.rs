//! Per-book positions for one product.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::product::Bond;
use crate::trade::TradeBook;

/// Signed position per trading book for one product.
///
/// The aggregate position is the sum of the per-book values; BTreeMap keeps
/// the render order deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub product: Bond,
    positions: BTreeMap<TradeBook, i64>,
}

impl Position {
    pub fn new(product: Bond) -> Self {
        Self {
            product,
            positions: BTreeMap::new(),
        }
    }

    /// Add a signed quantity to one book's position.
    pub fn add(&mut self, book: TradeBook, quantity: i64) {
        *self.positions.entry(book).or_insert(0) += quantity;
    }

    /// Position in one book (zero when the book has never traded).
    pub fn position(&self, book: TradeBook) -> i64 {
        self.positions.get(&book).copied().unwrap_or(0)
    }

    /// Net position across all books.
    pub fn aggregate(&self) -> i64 {
        self.positions.values().sum()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.product.cusip)?;
        for (book, quantity) in &self.positions {
            write!(f, ",{},{}", book, quantity)?;
        }
        Ok(())
    }
}
