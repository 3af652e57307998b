#![allow(missing_docs)]

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use chrono::{DateTime, Utc};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::{Contact, MenuItem};
use crate::error::{Error, Result};

static NEXT_ORDER_ID: AtomicU64 = AtomicU64::new(1);

/// Upper bound on the line items a single order may hold.
pub const MAX_ORDER_ITEMS: usize = 10_000;

/// Process-unique order number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OrderId(u64);

impl OrderId {
    fn next() -> Self {
        Self(NEXT_ORDER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Line items bought by one customer from one restaurant.
///
/// Quantity is expressed by repeating an item. `total_price` is recomputed
/// by every mutator and always equals [`Order::calculate_total_price`].
/// Mutators refuse any change whose total would not fit in a [`Decimal`].
#[derive(Debug, Clone)]
pub struct Order {
    id: OrderId,
    customer: Contact,
    restaurant: Contact,
    placed_at: DateTime<Utc>,
    items: Vec<MenuItem>,
    total_price: Decimal,
}

impl Order {
    /// Build an order from a non-empty list of valid items.
    pub fn new(customer: Contact, restaurant: Contact, items: Vec<MenuItem>) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::invalid("an order needs at least one item"));
        }
        if items.len() > MAX_ORDER_ITEMS {
            return Err(too_many_items());
        }
        let mut total_price = Decimal::ZERO;
        for item in &items {
            item.validate()?;
            total_price = checked_total(total_price, item)?;
        }

        Ok(Self {
            id: OrderId::next(),
            customer,
            restaurant,
            placed_at: Utc::now(),
            items,
            total_price,
        })
    }

    /// Append one unit of `item`.
    pub fn add_item(&mut self, item: MenuItem) -> Result<()> {
        item.validate()?;
        if self.items.len() >= MAX_ORDER_ITEMS {
            return Err(too_many_items());
        }
        let total_price = checked_total(self.total_price, &item)?;
        debug!(order = %self.id, item = %item.name, "adding order item");
        self.items.push(item);
        self.total_price = total_price;
        Ok(())
    }

    /// Remove the first unit equal to `item`.
    pub fn remove_item(&mut self, item: &MenuItem) -> Result<MenuItem> {
        let index = self
            .items
            .iter()
            .position(|candidate| candidate == item)
            .ok_or_else(|| Error::not_found("order item", item.name.clone()))?;
        debug!(order = %self.id, item = %item.name, "removing order item");
        let removed = self.items.remove(index);
        self.total_price = self.calculate_total_price();
        Ok(removed)
    }

    /// Sum of the current item prices.
    ///
    /// Prices are non-negative and the full sum was checked when the items
    /// were added, so no partial sum can overflow.
    pub fn calculate_total_price(&self) -> Decimal {
        self.items.iter().map(|item| item.price).sum()
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn customer(&self) -> &Contact {
        &self.customer
    }

    pub fn restaurant(&self) -> &Contact {
        &self.restaurant
    }

    pub fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Number of units whose name matches `name` case-insensitively.
    pub fn count_named(&self, name: &str) -> usize {
        self.items
            .iter()
            .filter(|item| item.name_matches(name))
            .count()
    }
}

fn checked_total(total: Decimal, item: &MenuItem) -> Result<Decimal> {
    total
        .checked_add(item.price)
        .ok_or_else(|| Error::invalid("order total overflows"))
}

pub(crate) fn too_many_items() -> Error {
    Error::invalid(format!("an order may hold at most {MAX_ORDER_ITEMS} items"))
}

/// Shared handle to an [`Order`].
///
/// A customer's history and a restaurant's history hold clones of the same
/// handle. Equality is handle identity, not structural equality.
#[derive(Debug, Clone)]
pub struct OrderRef(Arc<RwLock<Order>>);

impl OrderRef {
    pub fn new(order: Order) -> Self {
        Self(Arc::new(RwLock::new(order)))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Order> {
        self.0.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Order> {
        self.0.write()
    }

    pub fn id(&self) -> OrderId {
        self.0.read().id()
    }

    /// Whether both handles point at the same order.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for OrderRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for OrderRef {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn contact(name: &str) -> Contact {
        Contact::new(name, "Main St 1", format!("{name}@example.com")).expect("valid contact")
    }

    fn item(name: &str, cents: i64) -> MenuItem {
        MenuItem::new(name, "", Decimal::new(cents, 2)).expect("valid item")
    }

    fn order(items: Vec<MenuItem>) -> Result<Order> {
        Order::new(contact("ada"), contact("luigi"), items)
    }

    #[test]
    fn empty_order_is_rejected() {
        assert!(order(Vec::new()).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn new_order_computes_total() -> Result<()> {
        let order = order(vec![item("Pizza", 1250), item("Cola", 300)])?;
        assert_eq!(order.total_price(), Decimal::new(1550, 2));
        assert_eq!(order.item_count(), 2);
        Ok(())
    }

    #[test]
    fn order_ids_are_unique() -> Result<()> {
        let first = order(vec![item("Pizza", 100)])?;
        let second = order(vec![item("Pizza", 100)])?;
        assert_ne!(first.id(), second.id());
        Ok(())
    }

    #[test]
    fn add_item_rejects_invalid_item_and_keeps_total() -> Result<()> {
        let mut order = order(vec![item("Pizza", 1000)])?;
        let bad = MenuItem {
            name: "Refund".to_string(),
            description: String::new(),
            price: Decimal::from(-5),
        };
        assert!(order.add_item(bad).unwrap_err().is_invalid_argument());
        assert_eq!(order.item_count(), 1);
        assert_eq!(order.total_price(), Decimal::from(10));
        Ok(())
    }

    #[test]
    fn remove_item_drops_only_first_unit() -> Result<()> {
        let pizza = item("Pizza", 1000);
        let mut order = order(vec![pizza.clone(), item("Cola", 250), pizza.clone()])?;

        order.remove_item(&pizza)?;

        assert_eq!(order.count_named("pizza"), 1);
        assert_eq!(order.total_price(), Decimal::new(1250, 2));
        Ok(())
    }

    #[test]
    fn remove_missing_item_is_not_found() -> Result<()> {
        let mut order = order(vec![item("Pizza", 1000)])?;
        let err = order.remove_item(&item("Sushi", 900)).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(order.total_price(), Decimal::from(10));
        Ok(())
    }

    #[test]
    fn handles_compare_by_identity() -> Result<()> {
        let items = vec![item("Pizza", 1000)];
        let first = OrderRef::new(order(items.clone())?);
        let alias = first.clone();
        let twin = OrderRef::new(order(items)?);

        assert_eq!(first, alias);
        assert_ne!(first, twin);
        Ok(())
    }

    #[test]
    fn writes_through_one_handle_are_seen_by_the_other() -> Result<()> {
        let handle = OrderRef::new(order(vec![item("Pizza", 1000)])?);
        let alias = handle.clone();

        handle.write().add_item(item("Cola", 250))?;

        assert_eq!(alias.read().item_count(), 2);
        assert_eq!(alias.read().total_price(), Decimal::new(1250, 2));
        Ok(())
    }

    #[test]
    fn overflowing_total_is_rejected() -> Result<()> {
        let priciest = MenuItem::new("Caviar", "", Decimal::MAX)?;

        let err = order(vec![priciest.clone(), priciest.clone()]).unwrap_err();
        assert!(err.is_invalid_argument());

        let mut order = order(vec![priciest.clone()])?;
        let err = order.add_item(priciest).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(order.item_count(), 1);
        assert_eq!(order.total_price(), Decimal::MAX);
        Ok(())
    }

    #[test]
    fn item_count_is_capped() -> Result<()> {
        let water = item("Water", 0);
        let err = order(vec![water.clone(); MAX_ORDER_ITEMS + 1]).unwrap_err();
        assert!(err.is_invalid_argument());

        let mut order = order(vec![water.clone(); MAX_ORDER_ITEMS])?;
        assert!(order.add_item(water).unwrap_err().is_invalid_argument());
        assert_eq!(order.item_count(), MAX_ORDER_ITEMS);
        Ok(())
    }

    #[derive(Debug, Clone)]
    enum Step {
        Add(usize),
        Remove(usize),
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            (0usize..4).prop_map(Step::Add),
            (0usize..4).prop_map(Step::Remove),
        ]
    }

    proptest! {
        #[test]
        fn prop_total_tracks_items(
            prices in prop::collection::vec(0i64..100_000, 4),
            steps in prop::collection::vec(step(), 0..40),
        ) {
            let catalogue: Vec<MenuItem> = prices
                .iter()
                .enumerate()
                .map(|(index, cents)| item(&format!("dish-{index}"), *cents))
                .collect();
            let mut order = order(vec![catalogue[0].clone()]).unwrap();

            for step in steps {
                match step {
                    Step::Add(index) => order.add_item(catalogue[index].clone()).unwrap(),
                    Step::Remove(index) => {
                        let _ = order.remove_item(&catalogue[index]);
                    }
                }
                let expected: Decimal = order.items().iter().map(|item| item.price).sum();
                prop_assert_eq!(order.total_price(), expected);
                prop_assert_eq!(order.total_price(), order.calculate_total_price());
            }
        }
    }
}
