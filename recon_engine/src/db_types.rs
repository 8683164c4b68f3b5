use std::fmt::Display;

use recon_common::Money;
use serde::{Deserialize, Serialize};
use sqlx::Type;

use crate::helpers::epoch_string_to_local;

/// The status label the remote system uses for an order that completed successfully.
pub const STATUS_TRADE_SUCCEEDED: &str = "trade succeeded";
/// The status label for an order that was closed without completing.
pub const STATUS_TRADE_CLOSED: &str = "trade closed";

/// Statuses that will never change again. An order in one of these states has reached the end of its lifecycle, so
/// its captured details are final.
pub const TERMINAL_STATUSES: [&str; 2] = [STATUS_TRADE_SUCCEEDED, STATUS_TRADE_CLOSED];

pub fn is_terminal_status(status: &str) -> bool {
    TERMINAL_STATUSES.contains(&status)
}

//--------------------------------------      OrderId        ---------------------------------------------------------
/// An opaque token naming one order in the remote system. Never generated locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderId(pub String);

impl<S: Into<String>> From<S> for OrderId {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------      LineItem       ---------------------------------------------------------
/// One normalized product line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

impl LineItem {
    /// Builds a line item from the raw remote fields. The unit price is truncated toward zero *before* the
    /// multiplication, so `19.99 x 3` yields a unit price of 19 and a line total of 57.
    pub fn new<S: Into<String>>(product_name: S, quantity: i64, raw_price: f64) -> Self {
        let unit_price = Money::truncate(raw_price);
        Self { product_name: product_name.into(), quantity, unit_price, line_total: unit_price * quantity }
    }

    /// The single empty row persisted for an order with no remote line items. Every processed order keeps at least
    /// one row in the store this way.
    pub fn sentinel() -> Self {
        Self { product_name: String::new(), quantity: 0, unit_price: Money::default(), line_total: Money::default() }
    }
}

//--------------------------------------     OrderRecord     ---------------------------------------------------------
/// A fixed-shape order produced from one remote fetch. Records are never mutated in place; a re-fetch replaces the
/// stored rows wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: OrderId,
    /// Local calendar time the order was paid, or the raw remote value when it could not be interpreted as a Unix
    /// epoch. Empty when the remote never reported one.
    pub paid_at: String,
    /// Free-text status label as reported by the remote system.
    pub status: String,
    pub items: Vec<LineItem>,
}

impl OrderRecord {
    pub fn new<S: Into<String>>(order_id: OrderId, paid_at_epoch: &str, status: S, items: Vec<LineItem>) -> Self {
        Self { order_id, paid_at: epoch_string_to_local(paid_at_epoch), status: status.into(), items }
    }

    /// Whether the order's status is terminal, i.e. the tracking entry can be marked complete.
    pub fn is_terminal(&self) -> bool {
        is_terminal_status(&self.status)
    }

    /// The per-row flag stored alongside each line item. Narrower than [`OrderRecord::is_terminal`]: only a
    /// succeeded trade counts, a closed one does not.
    pub fn is_settled(&self) -> bool {
        self.status == STATUS_TRADE_SUCCEEDED
    }
}

#[cfg(test)]
mod test {
    use chrono::{Local, TimeZone};

    use super::*;

    #[test]
    fn terminal_statuses_are_exactly_succeeded_and_closed() {
        assert!(is_terminal_status("trade succeeded"));
        assert!(is_terminal_status("trade closed"));
        assert!(!is_terminal_status("awaiting shipment"));
        assert!(!is_terminal_status("Trade Succeeded"));
        assert!(!is_terminal_status(""));
    }

    #[test]
    fn line_item_truncates_before_multiplying() {
        let item = LineItem::new("widget", 3, 19.99);
        assert_eq!(item.unit_price.value(), 19);
        assert_eq!(item.line_total.value(), 57);
    }

    #[test]
    fn sentinel_is_empty_and_zero() {
        let item = LineItem::sentinel();
        assert_eq!(item.product_name, "");
        assert_eq!(item.quantity, 0);
        assert_eq!(item.unit_price.value(), 0);
        assert_eq!(item.line_total.value(), 0);
    }

    #[test]
    fn paid_at_is_converted_at_construction() {
        let record = OrderRecord::new("123".into(), "1700000000", "trade succeeded", vec![]);
        let expected =
            Local.timestamp_opt(1_700_000_000, 0).unwrap().format("%Y-%m-%d %H:%M:%S").to_string();
        assert_eq!(record.paid_at, expected);
    }

    #[test]
    fn unparseable_paid_at_passes_through() {
        let record = OrderRecord::new("123".into(), "not-an-epoch", "trade closed", vec![]);
        assert_eq!(record.paid_at, "not-an-epoch");
        let record = OrderRecord::new("123".into(), "", "trade closed", vec![]);
        assert_eq!(record.paid_at, "");
    }

    #[test]
    fn settled_is_narrower_than_terminal() {
        let succeeded = OrderRecord::new("1".into(), "", "trade succeeded", vec![]);
        let closed = OrderRecord::new("2".into(), "", "trade closed", vec![]);
        assert!(succeeded.is_terminal() && succeeded.is_settled());
        assert!(closed.is_terminal() && !closed.is_settled());
    }
}
