//! Product domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::patch::{next_updated_at, Patch};
use super::validation::{not_blank, positive_price};
use crate::errors::AppError;

/// Menu section a product belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Food,
    Drink,
    Dessert,
    Snack,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Food => "food",
            ProductCategory::Drink => "drink",
            ProductCategory::Dessert => "dessert",
            ProductCategory::Snack => "snack",
        }
    }
}

impl FromStr for ProductCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "food" => Ok(ProductCategory::Food),
            "drink" => Ok(ProductCategory::Drink),
            "dessert" => Ok(ProductCategory::Dessert),
            "snack" => Ok(ProductCategory::Snack),
            other => Err(AppError::validation(format!("Unknown category: {}", other))),
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: ProductCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(dto: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: dto.name,
            description: dto.description,
            price: dto.price,
            category: dto.category,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Product creation data transfer object
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(
        length(min = 1, max = 80, message = "Name must be 1-80 characters"),
        custom(function = "not_blank")
    )]
    #[schema(example = "X-Burger")]
    pub name: String,
    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    #[schema(example = "Beef patty, cheese and house sauce")]
    pub description: Option<String>,
    #[validate(custom(function = "positive_price"))]
    #[schema(example = "25.90")]
    pub price: Decimal,
    pub category: ProductCategory,
}

/// Partial product update; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate, ToSchema)]
pub struct ProductPatch {
    #[validate(
        length(min = 1, max = 80, message = "Name must be 1-80 characters"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,
    #[validate(length(max = 255, message = "Description must be at most 255 characters"))]
    pub description: Option<String>,
    #[validate(custom(function = "positive_price"))]
    pub price: Option<Decimal>,
    pub category: Option<ProductCategory>,
}

impl Patch<Product> for ProductPatch {
    fn apply_at(self, mut product: Product, now: DateTime<Utc>) -> Product {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = Some(description);
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        product.updated_at = next_updated_at(product.updated_at, now);
        product
    }
}

/// Product response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductOut {
    pub id: String,
    #[schema(example = "X-Burger")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "25.90")]
    pub price: Decimal,
    pub category: ProductCategory,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductOut {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            category: product.category,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Catalogue entry shown to unauthenticated clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PublicProduct {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: ProductCategory,
}

impl From<Product> for PublicProduct {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            category: product.category,
        }
    }
}
