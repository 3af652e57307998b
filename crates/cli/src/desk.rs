//! Command dispatcher holding the directory and the logged-in accounts.

use std::io::{BufRead, Write};

use anyhow::Context;
use orderdesk_core::{
    report::format_price, Contact, Directory, HistoryReport, MenuItem, OrderRef, ReportFormat,
    SharedCustomer, SharedRestaurant,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::command::{parse_line, Command, LineRequest};

/// Reasons a command could not be applied. None of them end the run.
#[derive(Debug, Error)]
pub enum DeskError {
    #[error(transparent)]
    Core(#[from] orderdesk_core::Error),

    #[error("please log in as a {0} first")]
    NotLoggedIn(&'static str),

    #[error("no restaurant registered for {0}")]
    UnknownRestaurant(String),

    #[error("'{item}' is not on the menu of {restaurant}")]
    UnknownMenuItem { item: String, restaurant: String },

    #[error("no order placed yet")]
    NoOrder,

    #[error("{0} is required to create a new account")]
    MissingField(&'static str),

    #[error("failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}

/// Successful result of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Message(String),
    Report(HistoryReport),
}

fn message(text: impl Into<String>) -> Outcome {
    Outcome::Message(text.into())
}

/// Counters reported once a script has been consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub applied: usize,
    pub failed: usize,
}

/// In-memory session: the account directory plus whoever is logged in.
pub struct Desk {
    directory: Directory,
    restaurant: Option<SharedRestaurant>,
    customer: Option<SharedCustomer>,
    currency: String,
    report_format: ReportFormat,
}

impl Desk {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            directory: Directory::new(),
            restaurant: None,
            customer: None,
            currency: currency.into(),
            report_format: ReportFormat::Text,
        }
    }

    pub fn with_report_format(mut self, report_format: ReportFormat) -> Self {
        self.report_format = report_format;
        self
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn apply(&mut self, command: Command) -> Result<Outcome, DeskError> {
        debug!(?command, "applying command");
        match command {
            Command::RestaurantLogin {
                contact,
                name,
                address,
            } => self.restaurant_login(&contact, name, address),
            Command::RestaurantLogout => {
                self.restaurant = None;
                Ok(message("Logged out successfully."))
            }
            Command::AddMenuItem {
                name,
                description,
                price,
            } => {
                let restaurant = self.restaurant()?;
                restaurant
                    .write()
                    .menu_mut()
                    .add(MenuItem::new(name, description, price)?)?;
                Ok(message("Item added to the menu."))
            }
            Command::RemoveMenuItem { name } => {
                self.restaurant()?.write().menu_mut().remove(&name)?;
                Ok(message("Item removed from the menu."))
            }
            Command::UpdateMenuItem {
                name,
                new_name,
                description,
                price,
            } => {
                let new_name = new_name.unwrap_or_else(|| name.clone());
                self.restaurant()?
                    .write()
                    .menu_mut()
                    .update(&name, new_name, description, price)?;
                Ok(message("Item updated."))
            }
            Command::ClearMenu => {
                self.restaurant()?.write().clear_menu();
                Ok(message("Menu cleared."))
            }
            Command::ShowMenu => self.show_menu(),
            Command::CountItemOrders { name } => {
                let count = self
                    .restaurant()?
                    .read()
                    .order_history()
                    .count_item_orders(&name);
                Ok(message(format!(
                    "The item '{name}' has been ordered {count} times."
                )))
            }
            Command::RestaurantOrders => {
                Ok(Outcome::Report(self.restaurant()?.read().view_orders()))
            }
            Command::CustomerLogin {
                contact,
                name,
                address,
            } => self.customer_login(&contact, name, address),
            Command::CustomerLogout => {
                self.customer = None;
                Ok(message("Logged out successfully."))
            }
            Command::NearbyRestaurants => self.nearby_restaurants(),
            Command::PlaceOrder { restaurant, items } => self.place_order(&restaurant, &items),
            Command::AddOrderItem { name } => self.add_order_item(&name),
            Command::RemoveOrderItem { name } => self.remove_order_item(&name),
            Command::OrderTotal => self.order_total(),
            Command::CustomerHistory => Ok(Outcome::Report(
                self.customer()?.read().view_order_history(),
            )),
        }
    }

    pub fn render(&self, outcome: &Outcome) -> Result<String, DeskError> {
        match (outcome, self.report_format) {
            (Outcome::Message(text), _) => Ok(text.clone()),
            (Outcome::Report(report), ReportFormat::Text) => Ok(report.render(&self.currency)),
            (Outcome::Report(report), ReportFormat::Json) => Ok(report.to_json()?),
        }
    }

    fn restaurant(&self) -> Result<SharedRestaurant, DeskError> {
        self.restaurant
            .clone()
            .ok_or(DeskError::NotLoggedIn("restaurant"))
    }

    fn customer(&self) -> Result<SharedCustomer, DeskError> {
        self.customer
            .clone()
            .ok_or(DeskError::NotLoggedIn("customer"))
    }

    fn last_order(&self) -> Result<OrderRef, DeskError> {
        self.customer()?
            .read()
            .last_order()
            .cloned()
            .ok_or(DeskError::NoOrder)
    }

    fn restaurant_login(
        &mut self,
        contact: &str,
        name: Option<String>,
        address: Option<String>,
    ) -> Result<Outcome, DeskError> {
        if let Some(restaurant) = self.directory.login_restaurant(contact) {
            self.restaurant = Some(restaurant);
            return Ok(message("Restaurant login successful."));
        }

        let name = name.ok_or(DeskError::MissingField("name"))?;
        let address = address.ok_or(DeskError::MissingField("address"))?;
        let restaurant = self
            .directory
            .register_restaurant(Contact::new(name, address, contact)?)?;
        self.restaurant = Some(restaurant);
        Ok(message("New restaurant account created and logged in."))
    }

    fn customer_login(
        &mut self,
        contact: &str,
        name: Option<String>,
        address: Option<String>,
    ) -> Result<Outcome, DeskError> {
        if let Some(customer) = self.directory.login_customer(contact) {
            self.customer = Some(customer);
            return Ok(message("Customer login successful."));
        }

        let name = name.ok_or(DeskError::MissingField("name"))?;
        let address = address.ok_or(DeskError::MissingField("address"))?;
        let customer = self
            .directory
            .register_customer(Contact::new(name, address, contact)?)?;
        self.customer = Some(customer);
        Ok(message("New customer registered and logged in."))
    }

    fn show_menu(&self) -> Result<Outcome, DeskError> {
        let restaurant = self.restaurant()?;
        let restaurant = restaurant.read();
        let menu = restaurant.get_menu();
        if menu.is_empty() {
            return Ok(message("No items in the menu."));
        }

        let mut lines = vec!["Menu Items:".to_string()];
        for (index, item) in menu.list().iter().enumerate() {
            let price = format_price(item.price, &self.currency);
            if item.description.is_empty() {
                lines.push(format!("{}. {} - {price}", index + 1, item.name));
            } else {
                lines.push(format!(
                    "{}. {} - {price} ({})",
                    index + 1,
                    item.name,
                    item.description
                ));
            }
        }
        Ok(message(lines.join("\n")))
    }

    fn nearby_restaurants(&self) -> Result<Outcome, DeskError> {
        let customer = self.customer()?;
        let address = customer.read().contact().address.clone();
        let nearby = self.directory.nearby_restaurants(&address);
        if nearby.is_empty() {
            return Ok(message("No restaurants found with the same address."));
        }

        let mut lines = vec!["Available Restaurants:".to_string()];
        for (index, restaurant) in nearby.iter().enumerate() {
            let restaurant = restaurant.read();
            lines.push(format!(
                "{}. {} ({})",
                index + 1,
                restaurant.name(),
                restaurant.contact().contact_info
            ));
        }
        Ok(message(lines.join("\n")))
    }

    fn place_order(
        &mut self,
        restaurant_contact: &str,
        lines: &[LineRequest],
    ) -> Result<Outcome, DeskError> {
        let customer = self.customer()?;
        let handle = self
            .directory
            .login_restaurant(restaurant_contact)
            .ok_or_else(|| DeskError::UnknownRestaurant(restaurant_contact.to_string()))?;
        let mut restaurant = handle.write();

        let mut requested = Vec::with_capacity(lines.len());
        for line in lines {
            let item = restaurant
                .get_menu()
                .get(&line.name)
                .cloned()
                .ok_or_else(|| DeskError::UnknownMenuItem {
                    item: line.name.clone(),
                    restaurant: restaurant.name().to_string(),
                })?;
            requested.push((item, line.quantity));
        }

        let order = customer.write().place_order(&mut restaurant, &requested)?;
        let order = order.read();
        info!(order = %order.id(), restaurant = %restaurant.name(), "order placed");
        Ok(message(format!(
            "Order {} placed successfully with {}. Total price: {}",
            order.id(),
            restaurant.name(),
            format_price(order.total_price(), &self.currency)
        )))
    }

    fn add_order_item(&mut self, name: &str) -> Result<Outcome, DeskError> {
        let order = self.last_order()?;
        let restaurant_contact = order.read().restaurant().contact_info.clone();
        let handle = self
            .directory
            .login_restaurant(&restaurant_contact)
            .ok_or(DeskError::UnknownRestaurant(restaurant_contact))?;
        let restaurant = handle.read();
        let item = restaurant.get_menu().get(name).cloned().ok_or_else(|| {
            DeskError::UnknownMenuItem {
                item: name.to_string(),
                restaurant: restaurant.name().to_string(),
            }
        })?;

        let mut order = order.write();
        order.add_item(item)?;
        Ok(message(format!(
            "Item added to the order. Total price: {}",
            format_price(order.total_price(), &self.currency)
        )))
    }

    fn remove_order_item(&mut self, name: &str) -> Result<Outcome, DeskError> {
        let order = self.last_order()?;
        let mut order = order.write();
        let item = order
            .items()
            .iter()
            .find(|item| item.name_matches(name))
            .cloned()
            .ok_or_else(|| orderdesk_core::Error::not_found("order item", name))?;

        order.remove_item(&item)?;
        Ok(message(format!(
            "Item removed from the order. Total price: {}",
            format_price(order.total_price(), &self.currency)
        )))
    }

    fn order_total(&self) -> Result<Outcome, DeskError> {
        let order = self.last_order()?;
        let order = order.read();
        let customer = order.customer();

        let mut lines = vec![
            format!("Customer Name: {}", customer.name),
            format!("Address: {}", customer.address),
            format!("Contact Info: {}", customer.contact_info),
            "Order Items:".to_string(),
        ];
        for item in order.items() {
            lines.push(format!(
                "{} - {}",
                item.name,
                format_price(item.price, &self.currency)
            ));
        }
        lines.push(format!(
            "Total Price: {}",
            format_price(order.calculate_total_price(), &self.currency)
        ));
        Ok(message(lines.join("\n")))
    }
}

/// Apply every command in `input`, writing outcomes and errors to `out`.
///
/// Malformed lines and failed commands are reported and skipped; only I/O
/// failures abort the run.
pub fn run<R: BufRead, W: Write>(
    desk: &mut Desk,
    input: R,
    out: &mut W,
    echo: bool,
) -> anyhow::Result<RunSummary> {
    let mut summary = RunSummary::default();

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;
        let Some(parsed) = parse_line(&line) else {
            continue;
        };

        if echo {
            writeln!(out, "> {}", line.trim())?;
        }

        let command = match parsed {
            Ok(command) => command,
            Err(err) => {
                warn!(line = line_no, "skipping malformed command: {err}");
                writeln!(out, "Error (line {line_no}): malformed command: {err}")?;
                summary.failed += 1;
                continue;
            }
        };

        let rendered = match desk.apply(command) {
            Ok(outcome) => desk.render(&outcome),
            Err(err) => Err(err),
        };
        match rendered {
            Ok(text) => {
                summary.applied += 1;
                writeln!(out, "{text}")?;
            }
            Err(err) => {
                warn!(line = line_no, "command failed: {err}");
                writeln!(out, "Error (line {line_no}): {err}")?;
                summary.failed += 1;
            }
        }
    }

    info!(
        applied = summary.applied,
        failed = summary.failed,
        "script finished"
    );
    Ok(summary)
}
