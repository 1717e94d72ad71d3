//! Order aggregate: an order and the items it owns.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::patch::{next_updated_at, Patch};
use super::product::Product;
use crate::config::LOCATOR_DIGITS;
use crate::errors::AppError;

/// Order lifecycle state. Any state may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(AppError::validation(format!("Unknown order status: {}", other))),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of an order. `price` is the product price when the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub quantity: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderItem {
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Order domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub status: OrderStatus,
    pub total: Decimal,
    pub locator: String,
    pub notes: Option<String>,
    pub rating: Option<i32>,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Start a new pending order with no items and a random locator.
    pub fn new(notes: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            status: OrderStatus::Pending,
            total: Decimal::ZERO,
            locator: generate_locator(&mut rand::thread_rng()),
            notes,
            rating: None,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a line for `product`, copying its current price, and refresh the total.
    pub fn add_item(&mut self, product: &Product, quantity: i32) {
        self.items.push(OrderItem {
            id: Uuid::new_v4().to_string(),
            order_id: self.id.clone(),
            product_id: product.id.clone(),
            quantity,
            price: product.price,
            created_at: self.created_at,
            updated_at: self.created_at,
        });
        self.total = self.items.iter().map(OrderItem::subtotal).sum();
    }

    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }
}

/// One uppercase letter followed by three digits, e.g. `K042`.
pub fn generate_locator<R: Rng + ?Sized>(rng: &mut R) -> String {
    let letter = char::from(rng.gen_range(b'A'..=b'Z'));
    let digits: String = (0..LOCATOR_DIGITS)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();
    format!("{}{}", letter, digits)
}

/// A requested order line
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderItem {
    #[schema(example = "0f8c2c8e-7a53-4c4e-9d86-0c1d8e8b9a10")]
    pub product_id: String,
    #[validate(range(min = 1, max = 1000, message = "Quantity must be between 1 and 1000"))]
    #[schema(example = 2, minimum = 1, maximum = 1000)]
    pub quantity: i32,
}

/// Order creation data transfer object
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrder {
    #[validate(length(min = 1, message = "Order must have at least one item"), nested)]
    pub items: Vec<CreateOrderItem>,
    #[validate(length(max = 255, message = "Notes must be at most 255 characters"))]
    #[schema(example = "No onions")]
    pub notes: Option<String>,
}

/// Partial order update: status, rating and notes only
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    #[schema(minimum = 1, maximum = 5)]
    pub rating: Option<i32>,
    #[validate(length(max = 255, message = "Notes must be at most 255 characters"))]
    pub notes: Option<String>,
}

impl Patch<Order> for OrderPatch {
    fn apply_at(self, mut order: Order, now: DateTime<Utc>) -> Order {
        if let Some(status) = self.status {
            order.status = status;
        }
        if let Some(rating) = self.rating {
            order.rating = Some(rating);
        }
        if let Some(notes) = self.notes {
            order.notes = Some(notes);
        }
        order.updated_at = next_updated_at(order.updated_at, now);
        order
    }
}

/// Order line response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItemOut {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    #[schema(example = 2)]
    pub quantity: i32,
    #[schema(example = "25.90")]
    pub price: Decimal,
    #[schema(example = "51.80")]
    pub subtotal: Decimal,
}

impl From<OrderItem> for OrderItemOut {
    fn from(item: OrderItem) -> Self {
        Self {
            subtotal: item.subtotal(),
            id: item.id,
            order_id: item.order_id,
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// Order response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderOut {
    pub id: String,
    pub status: OrderStatus,
    #[schema(example = "99.50")]
    pub total: Decimal,
    #[schema(example = "K042")]
    pub locator: String,
    pub notes: Option<String>,
    pub rating: Option<i32>,
    pub items: Vec<OrderItemOut>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderOut {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            status: order.status,
            total: order.total,
            locator: order.locator,
            notes: order.notes,
            rating: order.rating,
            items: order.items.into_iter().map(OrderItemOut::from).collect(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

/// Public popularity feed row: one item of a rated order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PublicRating {
    pub product_id: String,
    pub quantity: i32,
    pub rating: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CreateProduct, ProductCategory};

    fn product(name: &str, cents: i64) -> Product {
        Product::new(CreateProduct {
            name: name.into(),
            description: None,
            price: Decimal::new(cents, 2),
            category: ProductCategory::Food,
        })
    }

    fn is_locator(s: &str) -> bool {
        let bytes = s.as_bytes();
        bytes.len() == 4
            && bytes[0].is_ascii_uppercase()
            && bytes[1..].iter().all(u8::is_ascii_digit)
    }

    #[test]
    fn total_is_sum_of_subtotals() {
        let burger = product("X-Burger", 2590);
        let juice = product("Juice", 1590);

        let mut order = Order::new(None);
        order.add_item(&burger, 2);
        order.add_item(&juice, 3);

        assert_eq!(order.total, Decimal::new(9950, 2));
        assert_eq!(
            order.total,
            order.items.iter().map(OrderItem::subtotal).sum::<Decimal>()
        );
        assert!(order.items.iter().all(|item| item.order_id == order.id));
    }

    #[test]
    fn item_price_is_a_copy() {
        let mut burger = product("X-Burger", 2590);
        let mut order = Order::new(None);
        order.add_item(&burger, 1);

        burger.price = Decimal::new(9990, 2);

        assert_eq!(order.items[0].price, Decimal::new(2590, 2));
    }

    #[test]
    fn new_orders_are_pending_with_locator() {
        let order = Order::new(Some("No onions".into()));

        assert!(order.is_pending());
        assert_eq!(order.total, Decimal::ZERO);
        assert!(is_locator(&order.locator), "bad locator {}", order.locator);
    }

    #[test]
    fn locators_always_match_shape() {
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let locator = generate_locator(&mut rng);
            assert!(is_locator(&locator), "bad locator {}", locator);
        }
    }

    #[test]
    fn patch_allows_any_status_transition() {
        let mut order = Order::new(None);
        order.status = OrderStatus::Completed;

        let reopened = OrderPatch {
            status: Some(OrderStatus::Pending),
            ..Default::default()
        }
        .apply(order);

        assert!(reopened.is_pending());
    }

    #[test]
    fn patch_keeps_absent_fields() {
        let mut order = Order::new(Some("Extra ketchup".into()));
        order.rating = Some(4);
        let created_at = order.created_at;

        let patched = OrderPatch {
            status: Some(OrderStatus::Processing),
            ..Default::default()
        }
        .apply(order);

        assert_eq!(patched.status, OrderStatus::Processing);
        assert_eq!(patched.notes.as_deref(), Some("Extra ketchup"));
        assert_eq!(patched.rating, Some(4));
        assert_eq!(patched.created_at, created_at);
        assert!(patched.updated_at > created_at);
    }

    #[test]
    fn create_order_validation() {
        let empty = CreateOrder {
            items: vec![],
            notes: None,
        };
        assert!(empty.validate().is_err());

        let zero_quantity = CreateOrder {
            items: vec![CreateOrderItem {
                product_id: "p1".into(),
                quantity: 0,
            }],
            notes: None,
        };
        assert!(zero_quantity.validate().is_err());
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        let patch = OrderPatch {
            rating: Some(6),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
