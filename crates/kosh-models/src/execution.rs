//! # Execution Orders
//!
//! Orders the algo desk sends to the street, and the algo wrapper that
//! carries the venue they are routed to.

use serde::{Deserialize, Serialize};

use crate::book::PricingSide;
use crate::product::Bond;
use crate::tick::format_price;

/// Exchange order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Fok,
    Ioc,
    Market,
    Limit,
    Stop,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fok => write!(f, "FOK"),
            Self::Ioc => write!(f, "IOC"),
            Self::Market => write!(f, "MARKET"),
            Self::Limit => write!(f, "LIMIT"),
            Self::Stop => write!(f, "STOP"),
        }
    }
}

/// Destination venue label. Markets are labels here, not adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Market {
    BrokerTec,
    Espeed,
    Cme,
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BrokerTec => write!(f, "BROKERTEC"),
            Self::Espeed => write!(f, "ESPEED"),
            Self::Cme => write!(f, "CME"),
        }
    }
}

/// An order placeable on an exchange.
///
/// Invariants: `order_id` unique across all execution orders;
/// quantities non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOrder {
    pub product: Bond,
    pub side: PricingSide,
    pub order_id: String,
    pub order_type: OrderType,
    pub price: f64,
    pub visible_quantity: i64,
    pub hidden_quantity: i64,
    pub parent_order_id: String,
    pub is_child_order: bool,
}

impl std::fmt::Display for ExecutionOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{},{},{}",
            self.product.cusip,
            self.order_id,
            self.side,
            self.order_type,
            format_price(self.price),
            self.visible_quantity,
            self.hidden_quantity,
            self.parent_order_id,
            if self.is_child_order { "True" } else { "False" }
        )
    }
}

/// Execution order plus the venue the algo routes it to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgoExecution {
    pub execution_order: ExecutionOrder,
    pub market: Market,
}

impl AlgoExecution {
    pub fn new(execution_order: ExecutionOrder, market: Market) -> Self {
        Self {
            execution_order,
            market,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refdata_fixture::bond_fixture;

    #[test]
    fn render_field_order_is_stable() {
        let order = ExecutionOrder {
            product: bond_fixture(),
            side: PricingSide::Bid,
            order_id: "AlgoAAAAAAAAAAA".to_string(),
            order_type: OrderType::Market,
            price: 100.0,
            visible_quantity: 1_000_000,
            hidden_quantity: 0,
            parent_order_id: "AlgoParentBBBBB".to_string(),
            is_child_order: false,
        };
        assert_eq!(
            order.to_string(),
            "912828M80,AlgoAAAAAAAAAAA,BID,MARKET,100-000,1000000,0,AlgoParentBBBBB,False"
        );
    }

    #[test]
    fn enum_labels_match_the_wire() {
        assert_eq!(OrderType::Fok.to_string(), "FOK");
        assert_eq!(OrderType::Ioc.to_string(), "IOC");
        assert_eq!(Market::BrokerTec.to_string(), "BROKERTEC");
        assert_eq!(Market::Cme.to_string(), "CME");
    }
}
