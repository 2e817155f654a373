use serde::{Deserialize, Serialize};
use sea_orm::entity::prelude::*;

/// Value of `availability` that blocks a product from being added to a cart.
pub const OUT_OF_STOCK: &str = "Out of Stock";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    #[sea_orm(column_name = "type")]
    pub product_type: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    pub category_key: Option<String>,
    pub stock_quantity: i32,
    pub availability: String, // 'In Stock', 'Out of Stock'
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime,
}

impl Model {
    /// Whether `quantity` units can be put in a cart right now.
    pub fn can_supply(&self, quantity: i32) -> bool {
        self.availability != OUT_OF_STOCK && self.stock_quantity >= quantity
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryKey",
        to = "super::categories::Column::Key"
    )]
    Category,

    #[sea_orm(has_many = "super::cart_items::Entity")]
    CartItems,

    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::cart_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItems.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
