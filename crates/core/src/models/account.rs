use tracing::{debug, warn};

use super::{
    order::too_many_items, Contact, Menu, MenuItem, Order, OrderHistory, OrderRef,
    MAX_ORDER_ITEMS,
};
use crate::{
    error::{Error, Result},
    report::HistoryReport,
};

/// A restaurant account: identity, menu and the log of orders placed with it.
#[derive(Debug, Clone)]
pub struct Restaurant {
    contact: Contact,
    menu: Menu,
    order_history: OrderHistory,
}

impl Restaurant {
    /// Open a restaurant with an empty menu and no orders.
    pub fn new(contact: Contact) -> Self {
        Self {
            contact,
            menu: Menu::new(),
            order_history: OrderHistory::new(),
        }
    }

    /// Identity of the restaurant.
    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    /// Display name of the restaurant.
    pub fn name(&self) -> &str {
        &self.contact.name
    }

    /// Replace the menu wholesale.
    pub fn set_menu(&mut self, menu: Menu) {
        debug!(restaurant = %self.contact.name, items = menu.len(), "replacing menu");
        self.menu = menu;
    }

    /// Drop every menu item.
    pub fn clear_menu(&mut self) {
        self.set_menu(Menu::new());
    }

    /// Current menu.
    pub fn get_menu(&self) -> &Menu {
        &self.menu
    }

    /// Mutable access for item-level edits.
    pub fn menu_mut(&mut self) -> &mut Menu {
        &mut self.menu
    }

    /// Orders placed with this restaurant.
    pub fn order_history(&self) -> &OrderHistory {
        &self.order_history
    }

    /// Mutable access to the order log.
    pub fn order_history_mut(&mut self) -> &mut OrderHistory {
        &mut self.order_history
    }

    /// Report over every order placed with this restaurant.
    pub fn view_orders(&self) -> HistoryReport {
        HistoryReport::from_history(&self.order_history)
    }
}

/// A customer account with its personal order list.
#[derive(Debug, Clone)]
pub struct Customer {
    contact: Contact,
    order_history: OrderHistory,
}

impl Customer {
    /// Register a customer with no orders yet.
    pub fn new(contact: Contact) -> Self {
        Self {
            contact,
            order_history: OrderHistory::new(),
        }
    }

    /// Identity of the customer.
    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    /// Display name of the customer.
    pub fn name(&self) -> &str {
        &self.contact.name
    }

    /// Place an order for `item_quantities` with `restaurant`.
    ///
    /// Each `(item, quantity)` pair is expanded into `quantity` line items.
    /// Every item must be on the restaurant's current menu and every
    /// quantity must be positive; nothing is recorded unless all of them
    /// pass. The returned handle is appended to this customer's history and
    /// to the restaurant's history. Holding `&mut` to both for the whole
    /// call means the two appends cannot be observed separately.
    pub fn place_order(
        &mut self,
        restaurant: &mut Restaurant,
        item_quantities: &[(MenuItem, u32)],
    ) -> Result<OrderRef> {
        let items = match expand_items(restaurant, item_quantities) {
            Ok(items) => items,
            Err(err) => {
                warn!(
                    customer = %self.contact.name,
                    restaurant = %restaurant.name(),
                    "rejected order: {err}"
                );
                return Err(err);
            }
        };

        let order = OrderRef::new(Order::new(
            self.contact.clone(),
            restaurant.contact().clone(),
            items,
        )?);
        self.order_history.add(order.clone());
        restaurant.order_history_mut().add(order.clone());
        debug!(
            customer = %self.contact.name,
            restaurant = %restaurant.name(),
            order = %order.id(),
            "order placed"
        );
        Ok(order)
    }

    /// Report over this customer's orders; empty history is
    /// [`HistoryReport::Empty`], not an error.
    pub fn view_order_history(&self) -> HistoryReport {
        HistoryReport::from_history(&self.order_history)
    }

    /// Orders placed by this customer.
    pub fn order_history(&self) -> &OrderHistory {
        &self.order_history
    }

    /// Mutable access to the personal order list.
    pub fn order_history_mut(&mut self) -> &mut OrderHistory {
        &mut self.order_history
    }

    /// Most recently placed order, if any.
    pub fn last_order(&self) -> Option<&OrderRef> {
        self.order_history.last()
    }
}

fn expand_items(
    restaurant: &Restaurant,
    item_quantities: &[(MenuItem, u32)],
) -> Result<Vec<MenuItem>> {
    if item_quantities.is_empty() {
        return Err(Error::invalid("an order needs at least one item"));
    }

    let mut items = Vec::new();
    for (item, quantity) in item_quantities {
        item.validate()?;
        if *quantity == 0 {
            return Err(Error::invalid(format!(
                "quantity for '{}' must be a positive integer",
                item.name
            )));
        }
        match restaurant.get_menu().get(&item.name) {
            Some(offered) if offered == item => {}
            _ => {
                return Err(Error::invalid(format!(
                    "'{}' is not on the menu of {}",
                    item.name,
                    restaurant.name()
                )))
            }
        }
        let quantity = *quantity as usize;
        if quantity > MAX_ORDER_ITEMS - items.len() {
            return Err(too_many_items());
        }
        items.extend(std::iter::repeat(item.clone()).take(quantity));
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn restaurant() -> Restaurant {
        let contact = Contact::new("Luigi's", "Main St 1", "555-0100").expect("valid contact");
        let mut restaurant = Restaurant::new(contact);
        let menu = restaurant.menu_mut();
        menu.add(pizza()).expect("valid item");
        menu.add(cola()).expect("valid item");
        restaurant
    }

    fn customer() -> Customer {
        Customer::new(Contact::new("Ada", "Main St 1", "555-0199").expect("valid contact"))
    }

    fn pizza() -> MenuItem {
        MenuItem::new("Pizza", "Margherita", Decimal::new(1250, 2)).expect("valid item")
    }

    fn cola() -> MenuItem {
        MenuItem::new("Cola", "0.33l", Decimal::new(300, 2)).expect("valid item")
    }

    #[test]
    fn place_order_expands_quantities() -> Result<()> {
        let mut restaurant = restaurant();
        let mut customer = customer();

        let order = customer.place_order(&mut restaurant, &[(pizza(), 2), (cola(), 1)])?;

        let order = order.read();
        assert_eq!(order.item_count(), 3);
        assert_eq!(
            order.total_price(),
            Decimal::from(2) * pizza().price + cola().price
        );
        Ok(())
    }

    #[test]
    fn place_order_records_same_handle_on_both_sides() -> Result<()> {
        let mut restaurant = restaurant();
        let mut customer = customer();

        let order = customer.place_order(&mut restaurant, &[(pizza(), 1)])?;

        assert_eq!(customer.last_order(), Some(&order));
        assert_eq!(restaurant.order_history().last(), Some(&order));

        order.write().add_item(cola())?;
        let seen_by_restaurant = restaurant.order_history().list()[0].read().item_count();
        assert_eq!(seen_by_restaurant, 2);
        Ok(())
    }

    #[test]
    fn zero_quantity_rejects_whole_order() {
        let mut restaurant = restaurant();
        let mut customer = customer();

        let err = customer
            .place_order(&mut restaurant, &[(pizza(), 1), (cola(), 0)])
            .unwrap_err();

        assert!(err.is_invalid_argument());
        assert!(customer.order_history().is_empty());
        assert!(restaurant.order_history().is_empty());
    }

    #[test]
    fn oversized_quantity_is_rejected_without_expanding() {
        let mut restaurant = restaurant();
        let mut customer = customer();

        let err = customer
            .place_order(&mut restaurant, &[(pizza(), u32::MAX)])
            .unwrap_err();
        assert!(err.is_invalid_argument());

        let err = customer
            .place_order(
                &mut restaurant,
                &[(pizza(), MAX_ORDER_ITEMS as u32), (cola(), 1)],
            )
            .unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(customer.order_history().is_empty());
        assert!(restaurant.order_history().is_empty());
    }

    #[test]
    fn overflowing_total_rejects_whole_order() -> Result<()> {
        let mut restaurant = restaurant();
        let mut customer = customer();
        let caviar = MenuItem::new("Caviar", "", Decimal::MAX)?;
        restaurant.menu_mut().add(caviar.clone())?;

        let err = customer
            .place_order(&mut restaurant, &[(caviar, 2)])
            .unwrap_err();

        assert!(err.is_invalid_argument());
        assert!(restaurant.order_history().is_empty());
        Ok(())
    }

    #[test]
    fn items_off_the_menu_are_rejected() {
        let mut restaurant = restaurant();
        let mut customer = customer();
        let sushi = MenuItem::new("Sushi", "Nigiri", Decimal::from(9)).expect("valid item");

        let err = customer
            .place_order(&mut restaurant, &[(sushi, 1)])
            .unwrap_err();

        assert!(err.is_invalid_argument());
        assert!(restaurant.order_history().is_empty());
    }

    #[test]
    fn stale_item_after_price_change_is_rejected() -> Result<()> {
        let mut restaurant = restaurant();
        let mut customer = customer();
        restaurant
            .menu_mut()
            .update("Pizza", "Pizza", "Margherita", Decimal::from(15))?;

        let err = customer
            .place_order(&mut restaurant, &[(pizza(), 1)])
            .unwrap_err();

        assert!(err.is_invalid_argument());
        Ok(())
    }

    #[test]
    fn empty_request_is_rejected() {
        let mut restaurant = restaurant();
        let mut customer = customer();
        assert!(customer
            .place_order(&mut restaurant, &[])
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn cleared_menu_accepts_no_orders() {
        let mut restaurant = restaurant();
        let mut customer = customer();
        restaurant.clear_menu();

        assert!(restaurant.get_menu().is_empty());
        assert!(customer.place_order(&mut restaurant, &[(pizza(), 1)]).is_err());
    }

    #[test]
    fn set_menu_replaces_wholesale() -> Result<()> {
        let mut restaurant = restaurant();
        let mut menu = Menu::new();
        menu.add(MenuItem::new("Soup", "Minestrone", Decimal::from(6))?)?;

        restaurant.set_menu(menu);

        assert_eq!(restaurant.get_menu().len(), 1);
        assert!(restaurant.get_menu().contains("Soup"));
        assert!(!restaurant.get_menu().contains("Pizza"));
        Ok(())
    }

    #[test]
    fn empty_history_is_reported_as_such() {
        assert!(customer().view_order_history().is_empty());
        assert!(restaurant().view_orders().is_empty());
    }
}
