#![warn(clippy::all, missing_docs)]

//! Core domain logic for the orderdesk restaurant simulator.
//!
//! This crate hosts the entity layer (menus, orders, order histories,
//! restaurants and customers), the in-memory account directory, the
//! report builders and configuration handling used by the command
//! runner and any future frontends.

pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod report;

pub use crate::config::{AppConfig, ReportFormat};
pub use directory::{Directory, SharedCustomer, SharedRestaurant};
pub use error::{Error, Result};
pub use models::{
    Contact, Customer, Menu, MenuItem, Order, OrderHistory, OrderId, OrderRef, Restaurant,
    MAX_ORDER_ITEMS,
};
pub use report::{HistoryReport, OrderLine, OrderSummary};
