#![allow(missing_docs)]

use rust_decimal::Decimal;
use tracing::debug;

use super::MenuItem;
use crate::error::{Error, Result};

/// Name-keyed collection of [`MenuItem`]s in insertion order.
///
/// The key of every entry is the entry's own `name`; there is no separate
/// key that could drift from the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `item`, silently replacing any entry with the same name.
    pub fn add(&mut self, item: MenuItem) -> Result<()> {
        item.validate()?;
        match self.position(&item.name) {
            Some(index) => {
                debug!(item = %item.name, "replacing menu item");
                self.items[index] = item;
            }
            None => {
                debug!(item = %item.name, "adding menu item");
                self.items.push(item);
            }
        }
        Ok(())
    }

    /// Remove the entry called `name`, returning it.
    pub fn remove(&mut self, name: &str) -> Result<MenuItem> {
        let index = self
            .position(name)
            .ok_or_else(|| Error::not_found("menu item", name))?;
        debug!(item = %name, "removing menu item");
        Ok(self.items.remove(index))
    }

    /// Replace the fields of the entry called `name` and re-key it to
    /// `new_name`.
    ///
    /// Another entry already using `new_name` is dropped, so the menu never
    /// holds two items with the same key. The updated entry keeps the
    /// position of the original one.
    pub fn update(
        &mut self,
        name: &str,
        new_name: impl Into<String>,
        new_description: impl Into<String>,
        new_price: Decimal,
    ) -> Result<&MenuItem> {
        let mut index = self
            .position(name)
            .ok_or_else(|| Error::not_found("menu item", name))?;
        let replacement = MenuItem::new(new_name, new_description, new_price)?;

        if let Some(clash) = self
            .position(&replacement.name)
            .filter(|&clash| clash != index)
        {
            debug!(item = %replacement.name, "dropping entry shadowed by rename");
            self.items.remove(clash);
            if clash < index {
                index -= 1;
            }
        }

        debug!(from = %name, to = %replacement.name, "updating menu item");
        self.items[index] = replacement;
        Ok(&self.items[index])
    }

    /// Items in insertion order.
    pub fn list(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn get(&self, name: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name == name)
    }
}
