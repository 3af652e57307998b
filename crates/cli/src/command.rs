use rust_decimal::Decimal;
use serde::Deserialize;

/// One line of a command script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    RestaurantLogin {
        contact: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        address: Option<String>,
    },
    RestaurantLogout,
    AddMenuItem {
        name: String,
        #[serde(default)]
        description: String,
        price: Decimal,
    },
    RemoveMenuItem {
        name: String,
    },
    UpdateMenuItem {
        name: String,
        #[serde(default)]
        new_name: Option<String>,
        #[serde(default)]
        description: String,
        price: Decimal,
    },
    ClearMenu,
    ShowMenu,
    CountItemOrders {
        name: String,
    },
    RestaurantOrders,
    CustomerLogin {
        contact: String,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        address: Option<String>,
    },
    CustomerLogout,
    NearbyRestaurants,
    PlaceOrder {
        restaurant: String,
        items: Vec<LineRequest>,
    },
    AddOrderItem {
        name: String,
    },
    RemoveOrderItem {
        name: String,
    },
    OrderTotal,
    CustomerHistory,
}

/// Requested quantity of a menu item, by name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LineRequest {
    pub name: String,
    pub quantity: u32,
}

/// Parse one script line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Option<serde_json::Result<Command>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    Some(serde_json::from_str(trimmed))
}
