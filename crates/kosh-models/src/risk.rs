//! # PV01 Risk Types
//!
//! PV01 is the present-value change for a 1bp parallel rate shift, per unit
//! face. A `Pv01<Bond>` carries the unit value together with the net
//! aggregate quantity it applies to; a `Pv01<BucketedSector>` carries the
//! summed dollar risk of a named group of securities.

use serde::{Deserialize, Serialize};

use crate::product::Bond;

/// PV01 risk for a product (or a bucketed sector of products).
///
/// Invariant: `quantity` is the current net aggregate position the risk
/// value is associated with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pv01<P> {
    pub product: P,
    pub pv01: f64,
    pub quantity: i64,
}

impl<P> Pv01<P> {
    pub fn new(product: P, pv01: f64, quantity: i64) -> Self {
        Self {
            product,
            pv01,
            quantity,
        }
    }
}

impl std::fmt::Display for Pv01<Bond> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.product.cusip, self.pv01, self.quantity)
    }
}

impl std::fmt::Display for Pv01<BucketedSector> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.product.name, self.pv01, self.quantity)
    }
}

/// A named group of securities whose risk aggregates into one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketedSector {
    pub name: String,
    pub products: Vec<Bond>,
}

impl BucketedSector {
    pub fn new(name: &str, products: Vec<Bond>) -> Self {
        Self {
            name: name.to_string(),
            products,
        }
    }
}
