//! Order database entity for SeaORM.
//!
//! Items live in their own table; see [`super::order_item`].

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::domain::{Order, OrderItem};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub status: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total: Decimal,
    pub locator: String,
    pub notes: Option<String>,
    pub rating: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_item::Entity")]
    Items,
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Assemble the domain aggregate from the order row and its item rows.
    pub fn into_domain(self, items: Vec<super::order_item::Model>) -> Result<Order, AppError> {
        Ok(Order {
            id: self.id,
            status: self.status.parse()?,
            total: self.total,
            locator: self.locator,
            notes: self.notes,
            rating: self.rating,
            items: items.into_iter().map(OrderItem::from).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<&Order> for ActiveModel {
    fn from(order: &Order) -> Self {
        ActiveModel {
            id: Set(order.id.clone()),
            status: Set(order.status.as_str().to_string()),
            total: Set(order.total),
            locator: Set(order.locator.clone()),
            notes: Set(order.notes.clone()),
            rating: Set(order.rating),
            created_at: Set(order.created_at),
            updated_at: Set(order.updated_at),
        }
    }
}
