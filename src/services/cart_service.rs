use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::*;

use crate::error::AppError;
use crate::models::dto::{AddToCartRequest, CartLineView, CartView};
use crate::models::{cart_items, products};
use crate::services::pricing::Totals;

pub struct CartService;

impl CartService {
    /// Cart lines joined with their product, newest first, plus totals.
    pub async fn get_cart(db: &DatabaseConnection, user_id: i32, delivery_charge: Decimal) -> Result<CartView, AppError> {
        let rows = cart_items::Entity::find()
            .filter(cart_items::Column::UserId.eq(user_id))
            .order_by_desc(cart_items::Column::CreatedAt)
            .order_by_desc(cart_items::Column::Id)
            .find_also_related(products::Entity)
            .all(db)
            .await?;

        // Inner join: a line whose product vanished is not shown
        let items: Vec<CartLineView> = rows
            .into_iter()
            .filter_map(|(item, product)| {
                product.map(|p| CartLineView {
                    item,
                    name: p.name,
                    price: p.price,
                    image_url: p.image_url,
                    availability: p.availability,
                    stock_quantity: p.stock_quantity,
                })
            })
            .collect();

        let totals = Totals::compute(items.iter().map(|l| (l.price, l.item.quantity)), delivery_charge);

        Ok(CartView {
            items,
            subtotal: totals.subtotal,
            delivery_charge: totals.delivery_charge,
            total: totals.total,
        })
    }

    /// Adds a product; an existing line for the same product gets the quantities summed.
    pub async fn add_to_cart(
        db: &DatabaseConnection,
        user_id: i32,
        req: AddToCartRequest,
    ) -> Result<cart_items::Model, AppError> {
        // 1. The product must exist and cover the requested quantity
        let product = products::Entity::find_by_id(req.product_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("Product"))?;

        if !product.can_supply(req.quantity) {
            return Err(AppError::stock_shortage(
                "Product is out of stock or insufficient quantity available",
                &product.name,
                product.stock_quantity,
                req.quantity,
            ));
        }

        // 2. Merge with an existing line
        let existing = cart_items::Entity::find()
            .filter(cart_items::Column::UserId.eq(user_id))
            .filter(cart_items::Column::ProductId.eq(req.product_id))
            .one(db)
            .await?;

        let line = match existing {
            Some(line) => {
                let quantity = line.quantity + req.quantity;
                if product.stock_quantity < quantity {
                    return Err(AppError::stock_shortage(
                        "Insufficient stock available",
                        &product.name,
                        product.stock_quantity,
                        quantity,
                    ));
                }
                let mut active: cart_items::ActiveModel = line.into();
                active.quantity = Set(quantity);
                active.update(db).await?
            }
            None => {
                cart_items::ActiveModel {
                    user_id: Set(user_id),
                    product_id: Set(req.product_id),
                    quantity: Set(req.quantity),
                    created_at: Set(Utc::now().naive_utc()),
                    ..Default::default()
                }
                .insert(db)
                .await?
            }
        };

        tracing::debug!(user_id, product_id = line.product_id, quantity = line.quantity, "Cart line saved");
        Ok(line)
    }

    /// Replaces the quantity of one of the caller's lines.
    pub async fn update_cart_item(
        db: &DatabaseConnection,
        user_id: i32,
        cart_item_id: i32,
        quantity: i32,
    ) -> Result<cart_items::Model, AppError> {
        let (line, product) = cart_items::Entity::find_by_id(cart_item_id)
            .filter(cart_items::Column::UserId.eq(user_id))
            .find_also_related(products::Entity)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("Cart item"))?;

        let product = product.ok_or_else(|| AppError::not_found("Product"))?;
        if !product.can_supply(quantity) {
            return Err(AppError::stock_shortage(
                "Insufficient stock available",
                &product.name,
                product.stock_quantity,
                quantity,
            ));
        }

        let mut active: cart_items::ActiveModel = line.into();
        active.quantity = Set(quantity);
        Ok(active.update(db).await?)
    }

    pub async fn remove_from_cart(db: &DatabaseConnection, user_id: i32, cart_item_id: i32) -> Result<(), AppError> {
        let result = cart_items::Entity::delete_many()
            .filter(cart_items::Column::Id.eq(cart_item_id))
            .filter(cart_items::Column::UserId.eq(user_id))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Cart item"));
        }
        Ok(())
    }

    /// Empties the cart. Clearing an empty cart is not an error.
    pub async fn clear_cart(db: &DatabaseConnection, user_id: i32) -> Result<u64, AppError> {
        let result = cart_items::Entity::delete_many()
            .filter(cart_items::Column::UserId.eq(user_id))
            .exec(db)
            .await?;
        Ok(result.rows_affected)
    }
}
