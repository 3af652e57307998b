#![allow(missing_docs)]

use tracing::debug;

use super::OrderRef;
use crate::error::{Error, Result};

/// Append-mostly log of shared order handles.
///
/// `add` does not deduplicate: appending the same handle twice lists it
/// twice.
#[derive(Debug, Clone, Default)]
pub struct OrderHistory {
    orders: Vec<OrderRef>,
}

impl OrderHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, order: OrderRef) {
        debug!(order = %order.id(), "recording order");
        self.orders.push(order);
    }

    /// Forget `order` (by handle identity). Other histories holding the
    /// same handle are unaffected.
    pub fn remove(&mut self, order: &OrderRef) -> Result<()> {
        let index = self
            .orders
            .iter()
            .position(|candidate| candidate.ptr_eq(order))
            .ok_or_else(|| Error::not_found("order", order.id().to_string()))?;
        self.orders.remove(index);
        Ok(())
    }

    /// Number of line items across every order named `item_name`,
    /// compared case-insensitively.
    ///
    /// This is a full scan over orders and their items; no index is kept.
    pub fn count_item_orders(&self, item_name: &str) -> usize {
        self.orders
            .iter()
            .map(|order| order.read().count_named(item_name))
            .sum()
    }

    /// Orders in the order they were recorded.
    pub fn list(&self) -> &[OrderRef] {
        &self.orders
    }

    pub fn last(&self) -> Option<&OrderRef> {
        self.orders.last()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
