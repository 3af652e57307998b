//! Process-lifetime registry of restaurant and customer accounts.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::{
    error::{Error, Result},
    models::{Contact, Customer, Restaurant},
};

/// Shared handle to a registered restaurant.
pub type SharedRestaurant = Arc<RwLock<Restaurant>>;
/// Shared handle to a registered customer.
pub type SharedCustomer = Arc<RwLock<Customer>>;

/// All accounts known to the running process, in registration order.
#[derive(Debug, Default)]
pub struct Directory {
    restaurants: Vec<SharedRestaurant>,
    customers: Vec<SharedCustomer>,
}

impl Directory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the restaurant identified by `contact_info`.
    pub fn login_restaurant(&self, contact_info: &str) -> Option<SharedRestaurant> {
        self.restaurants
            .iter()
            .find(|restaurant| restaurant.read().contact().matches_contact(contact_info))
            .cloned()
    }

    /// Register a new restaurant; the contact string must not be taken.
    pub fn register_restaurant(&mut self, contact: Contact) -> Result<SharedRestaurant> {
        if self.login_restaurant(&contact.contact_info).is_some() {
            return Err(Error::invalid(format!(
                "a restaurant is already registered for {}",
                contact.contact_info
            )));
        }
        info!(restaurant = %contact.name, "registering restaurant");
        let restaurant = Arc::new(RwLock::new(Restaurant::new(contact)));
        self.restaurants.push(restaurant.clone());
        Ok(restaurant)
    }

    /// Find the customer identified by `contact_info`.
    pub fn login_customer(&self, contact_info: &str) -> Option<SharedCustomer> {
        self.customers
            .iter()
            .find(|customer| customer.read().contact().matches_contact(contact_info))
            .cloned()
    }

    /// Register a new customer; the contact string must not be taken.
    pub fn register_customer(&mut self, contact: Contact) -> Result<SharedCustomer> {
        if self.login_customer(&contact.contact_info).is_some() {
            return Err(Error::invalid(format!(
                "a customer is already registered for {}",
                contact.contact_info
            )));
        }
        info!(customer = %contact.name, "registering customer");
        let customer = Arc::new(RwLock::new(Customer::new(contact)));
        self.customers.push(customer.clone());
        Ok(customer)
    }

    /// Restaurants sharing `address` (case-insensitive).
    pub fn nearby_restaurants(&self, address: &str) -> Vec<SharedRestaurant> {
        self.restaurants
            .iter()
            .filter(|restaurant| restaurant.read().contact().matches_address(address))
            .cloned()
            .collect()
    }

    /// Every registered restaurant.
    pub fn restaurants(&self) -> &[SharedRestaurant] {
        &self.restaurants
    }

    /// Every registered customer.
    pub fn customers(&self) -> &[SharedCustomer] {
        &self.customers
    }
}
