//! Read-only order reports.

use std::fmt::{self, Write as _};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Contact, Order, OrderHistory, OrderId, OrderRef};

/// One priced line of an [`OrderSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    /// Item name.
    pub name: String,
    /// Unit price at the time of the snapshot.
    pub price: Decimal,
}

/// Snapshot of an order suitable for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    /// Order number.
    pub id: OrderId,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
    /// Restaurant the order was placed with.
    pub restaurant: Contact,
    /// Customer who placed the order.
    pub customer: Contact,
    /// Line items, one per unit.
    pub lines: Vec<OrderLine>,
    /// Sum of the line prices.
    pub total: Decimal,
}

impl OrderSummary {
    /// Capture the current state of `order`.
    pub fn from_order(order: &Order) -> Self {
        Self {
            id: order.id(),
            placed_at: order.placed_at(),
            restaurant: order.restaurant().clone(),
            customer: order.customer().clone(),
            lines: order
                .items()
                .iter()
                .map(|item| OrderLine {
                    name: item.name.clone(),
                    price: item.price,
                })
                .collect(),
            total: order.total_price(),
        }
    }

    /// Render the summary block, prefixing prices with `currency`.
    pub fn render(&self, currency: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Order {} from: {} ({})",
            self.id,
            self.restaurant.name,
            self.placed_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        let _ = writeln!(out, "Restaurant Address: {}", self.restaurant.address);
        let _ = writeln!(out, "Restaurant Contact Info: {}", self.restaurant.contact_info);
        let _ = writeln!(out, "Customer: {}", self.customer.name);
        let _ = writeln!(out, "Customer Address: {}", self.customer.address);
        let _ = writeln!(out, "Customer Contact Info: {}", self.customer.contact_info);
        let _ = writeln!(out, "Items:");
        for line in &self.lines {
            let _ = writeln!(out, "  {} - {}", line.name, format_price(line.price, currency));
        }
        let _ = write!(out, "Total price: {}", format_price(self.total, currency));
        out
    }
}

impl From<&OrderRef> for OrderSummary {
    fn from(order: &OrderRef) -> Self {
        Self::from_order(&order.read())
    }
}

/// Outcome of viewing an order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "orders", rename_all = "snake_case")]
pub enum HistoryReport {
    /// No orders were recorded.
    Empty,
    /// Recorded orders, oldest first.
    Orders(Vec<OrderSummary>),
}

impl HistoryReport {
    /// Summarise every order in `history`.
    pub fn from_history(history: &OrderHistory) -> Self {
        if history.is_empty() {
            return Self::Empty;
        }
        Self::Orders(history.list().iter().map(OrderSummary::from).collect())
    }

    /// Whether the history had no orders.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Summaries in the report, empty for [`HistoryReport::Empty`].
    pub fn orders(&self) -> &[OrderSummary] {
        match self {
            Self::Empty => &[],
            Self::Orders(orders) => orders,
        }
    }

    /// Render every summary separated by blank lines.
    pub fn render(&self, currency: &str) -> String {
        match self {
            Self::Empty => "No order history found.".to_string(),
            Self::Orders(orders) => orders
                .iter()
                .map(|summary| summary.render(currency))
                .collect::<Vec<_>>()
                .join("\n\n"),
        }
    }

    /// Pretty-printed JSON form, tagged by `status`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for HistoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(""))
    }
}

/// Format `price` with `currency` in front, dropping trailing zeros.
pub fn format_price(price: Decimal, currency: &str) -> String {
    format!("{currency}{}", price.normalize())
}
