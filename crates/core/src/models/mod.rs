//! Shared domain models.

mod account;
mod history;
mod menu;
mod order;

pub use account::{Customer, Restaurant};
pub use history::OrderHistory;
pub use menu::Menu;
pub use order::{Order, OrderId, OrderRef, MAX_ORDER_ITEMS};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{Error, Result};

/// Identity record for a restaurant or customer account.
///
/// The `contact_info` string is the login key; it is compared trimmed and
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    /// Display name of the account holder.
    pub name: String,
    /// Street address, also used to find nearby restaurants.
    pub address: String,
    /// Phone number or other contact string used as the login key.
    pub contact_info: String,
}

impl Contact {
    /// Build a contact, rejecting blank fields.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        contact_info: impl Into<String>,
    ) -> Result<Self> {
        let contact = Self {
            name: name.into().trim().to_string(),
            address: address.into().trim().to_string(),
            contact_info: contact_info.into().trim().to_string(),
        };
        for (field, value) in [
            ("name", &contact.name),
            ("address", &contact.address),
            ("contact info", &contact.contact_info),
        ] {
            if value.is_empty() {
                return Err(Error::invalid(format!("{field} must not be empty")));
            }
        }
        Ok(contact)
    }

    /// Whether this account is identified by `contact_info`.
    pub fn matches_contact(&self, contact_info: &str) -> bool {
        normalize(&self.contact_info) == normalize(contact_info)
    }

    /// Whether this account is located at `address`.
    pub fn matches_address(&self, address: &str) -> bool {
        normalize(&self.address) == normalize(address)
    }
}

/// A dish offered on a [`Menu`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Unique key within the owning menu.
    pub name: String,
    /// Free-form description shown to customers.
    pub description: String,
    /// Unit price; never negative.
    pub price: Decimal,
}

impl MenuItem {
    /// Build a validated menu item.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
    ) -> Result<Self> {
        let item = Self {
            name: name.into(),
            description: description.into(),
            price,
        };
        item.validate()?;
        Ok(item)
    }

    /// Check the invariants a menu or order relies on.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid("item name must not be empty"));
        }
        if self.price < Decimal::ZERO {
            return Err(Error::invalid(format!(
                "price of '{}' must be a non-negative value, got {}",
                self.name, self.price
            )));
        }
        Ok(())
    }

    /// Case-insensitive name comparison used by order counting.
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_rejects_blank_fields() {
        let err = Contact::new("Luigi's", "  ", "555-0100").unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("address"));
    }

    #[test]
    fn contact_matching_ignores_case_and_padding() -> Result<()> {
        let contact = Contact::new("Luigi's", "Main St 1", "Luigi@Example.com")?;
        assert!(contact.matches_contact("  luigi@example.com "));
        assert!(contact.matches_address("MAIN ST 1"));
        assert!(!contact.matches_contact("mario@example.com"));
        Ok(())
    }

    #[test]
    fn menu_item_rejects_negative_price() {
        let err = MenuItem::new("Pizza", "Margherita", Decimal::new(-1, 0)).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn menu_item_accepts_zero_price() -> Result<()> {
        let item = MenuItem::new("Water", "Tap water", Decimal::ZERO)?;
        assert_eq!(item.price, Decimal::ZERO);
        Ok(())
    }

    #[test]
    fn menu_item_rejects_blank_name() {
        assert!(MenuItem::new(" ", "nothing", Decimal::ONE).is_err());
    }
}
