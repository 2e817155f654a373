use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::*;

use crate::error::AppError;
use crate::models::dto::{
    AddressSummary, CreateOrderRequest, OrderDetail, OrderItemView, OrderSummary, PlacedOrder,
};
use crate::models::orders::{OrderStatus, PaymentMethod, PaymentStatus};
use crate::models::{addresses, cart_items, order_items, orders, products, users};
use crate::services::notification::{NotificationSender, OrderConfirmation};
use crate::services::pricing::{Totals, line_total};

pub struct OrderService;

impl OrderService {
    /// Turns the caller's cart into an order.
    ///
    /// Everything from the address check to the cart deletion runs in one
    /// transaction. Product rows are locked and every stock decrement is
    /// conditional, so two checkouts racing for the last unit cannot both win.
    /// The confirmation email goes out after commit and never fails the order.
    pub async fn create_order(
        db: &DatabaseConnection,
        notifier: &dyn NotificationSender,
        delivery_charge: Decimal,
        user_id: i32,
        req: CreateOrderRequest,
    ) -> Result<PlacedOrder, AppError> {
        // 1. Validate input before touching the database
        let (Some(address_id), Some(method)) = (req.address_id, req.payment_method.as_deref()) else {
            return Err(AppError::Validation(
                "Address and payment method are required".to_string(),
            ));
        };
        let method = PaymentMethod::parse(method)
            .ok_or_else(|| AppError::Validation("Invalid payment method".to_string()))?;

        // 2. Run the checkout in a transaction
        let txn = db.begin().await?;
        let (order, user) = match Self::checkout(&txn, user_id, address_id, method, &req, delivery_charge).await {
            Ok(placed) => {
                txn.commit().await?;
                placed
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!(user_id, error = %rollback_err, "Rollback failed");
                }
                return Err(e);
            }
        };

        tracing::info!(
            user_id,
            order_id = order.id,
            total = %order.total_amount,
            payment_method = ?order.payment_method,
            "Order placed"
        );

        // 3. Best-effort confirmation
        let confirmation = OrderConfirmation {
            order_id: order.id,
            total_amount: order.total_amount,
            payment_method: payment_method_label(order.payment_method).to_string(),
            payment_status: payment_status_label(order.payment_status).to_string(),
            order_status: order.order_status.as_str().to_string(),
        };
        if let Err(e) = notifier
            .send_order_confirmation(&user.email, &user.name, &confirmation)
            .await
        {
            tracing::warn!(order_id = order.id, error = %e, "Failed to send order confirmation email");
        }

        Ok(PlacedOrder {
            order_id: order.id,
            total_amount: order.total_amount,
            payment_method: order.payment_method,
            payment_status: order.payment_status,
            order_status: order.order_status,
        })
    }

    async fn checkout(
        txn: &DatabaseTransaction,
        user_id: i32,
        address_id: i32,
        method: PaymentMethod,
        req: &CreateOrderRequest,
        delivery_charge: Decimal,
    ) -> Result<(orders::Model, users::Model), AppError> {
        let user = users::Entity::find_by_id(user_id)
            .one(txn)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        addresses::Entity::find_by_id(address_id)
            .filter(addresses::Column::UserId.eq(user_id))
            .one(txn)
            .await?
            .ok_or_else(|| AppError::not_found("Address"))?;

        let lines = cart_items::Entity::find()
            .filter(cart_items::Column::UserId.eq(user_id))
            .order_by_asc(cart_items::Column::ProductId)
            .all(txn)
            .await?;
        if lines.is_empty() {
            return Err(AppError::InvalidState("Cart is empty".to_string()));
        }

        // Lock in id order so concurrent checkouts queue instead of deadlocking
        let product_ids: Vec<i32> = lines.iter().map(|l| l.product_id).collect();
        let products: HashMap<i32, products::Model> = products::Entity::find()
            .filter(products::Column::Id.is_in(product_ids))
            .order_by_asc(products::Column::Id)
            .lock_exclusive()
            .all(txn)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let mut priced = Vec::with_capacity(lines.len());
        for line in &lines {
            let product = products
                .get(&line.product_id)
                .ok_or_else(|| AppError::not_found("Product"))?;
            if product.stock_quantity < line.quantity {
                return Err(AppError::insufficient_stock(
                    &product.name,
                    product.stock_quantity,
                    line.quantity,
                ));
            }
            priced.push((line, product));
        }

        let totals = Totals::compute(
            priced.iter().map(|(line, product)| (product.price, line.quantity)),
            delivery_charge,
        );

        let order = orders::ActiveModel {
            user_id: Set(user_id),
            address_id: Set(address_id),
            subtotal: Set(totals.subtotal),
            delivery_charge: Set(totals.delivery_charge),
            total_amount: Set(totals.total),
            payment_method: Set(method),
            payment_status: Set(PaymentStatus::at_checkout(method, req.razorpay_payment_id.as_deref())),
            order_status: Set(OrderStatus::Placed),
            razorpay_order_id: Set(req.razorpay_order_id.clone()),
            razorpay_payment_id: Set(req.razorpay_payment_id.clone()),
            razorpay_signature: Set(req.razorpay_signature.clone()),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        let items = priced.iter().map(|(line, product)| order_items::ActiveModel {
            order_id: Set(order.id),
            product_id: Set(product.id),
            product_name: Set(product.name.clone()),
            product_price: Set(product.price),
            quantity: Set(line.quantity),
            subtotal: Set(line_total(product.price, line.quantity)),
            ..Default::default()
        });
        order_items::Entity::insert_many(items).exec(txn).await?;

        for (line, product) in &priced {
            Self::decrement_stock(txn, product, line.quantity).await?;
        }

        cart_items::Entity::delete_many()
            .filter(cart_items::Column::UserId.eq(user_id))
            .exec(txn)
            .await?;

        Ok((order, user))
    }

    /// Takes `quantity` units off the product only if they are still there.
    ///
    /// `product` may be stale; the stock guard lives in the UPDATE itself,
    /// and the error reports the quantity actually left.
    async fn decrement_stock<C: ConnectionTrait>(
        conn: &C,
        product: &products::Model,
        quantity: i32,
    ) -> Result<(), AppError> {
        let result = products::Entity::update_many()
            .col_expr(
                products::Column::StockQuantity,
                Expr::col(products::Column::StockQuantity).sub(quantity),
            )
            .filter(products::Column::Id.eq(product.id))
            .filter(products::Column::StockQuantity.gte(quantity))
            .exec(conn)
            .await?;

        if result.rows_affected != 1 {
            let available = products::Entity::find_by_id(product.id)
                .one(conn)
                .await?
                .map_or(0, |p| p.stock_quantity);
            return Err(AppError::insufficient_stock(&product.name, available, quantity));
        }
        Ok(())
    }

    /// Cancels a non-terminal order and puts its quantities back in stock.
    pub async fn cancel_order(db: &DatabaseConnection, user_id: i32, order_id: i32) -> Result<(), AppError> {
        let txn = db.begin().await?;
        match Self::cancel_in(&txn, user_id, order_id).await {
            Ok(()) => {
                txn.commit().await?;
                tracing::info!(user_id, order_id, "Order cancelled");
                Ok(())
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!(order_id, error = %rollback_err, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn cancel_in(txn: &DatabaseTransaction, user_id: i32, order_id: i32) -> Result<(), AppError> {
        let order = orders::Entity::find_by_id(order_id)
            .filter(orders::Column::UserId.eq(user_id))
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_else(|| AppError::not_found("Order"))?;

        if !order.order_status.can_transition_to(OrderStatus::Cancelled) {
            return Err(AppError::InvalidState(format!(
                "Order cannot be cancelled as it is already {}",
                order.order_status.as_str()
            )));
        }

        let mut active: orders::ActiveModel = order.into();
        active.order_status = Set(OrderStatus::Cancelled);
        active.update(txn).await?;

        let items = order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(order_id))
            .all(txn)
            .await?;

        for item in items {
            products::Entity::update_many()
                .col_expr(
                    products::Column::StockQuantity,
                    Expr::col(products::Column::StockQuantity).add(item.quantity),
                )
                .filter(products::Column::Id.eq(item.product_id))
                .exec(txn)
                .await?;
        }

        Ok(())
    }

    /// Caller's orders, newest first, with address and number of lines.
    pub async fn list_orders(db: &DatabaseConnection, user_id: i32) -> Result<Vec<OrderSummary>, AppError> {
        let rows = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .find_also_related(addresses::Entity)
            .all(db)
            .await?;

        let order_ids: Vec<i32> = rows.iter().map(|(o, _)| o.id).collect();
        let counts: HashMap<i32, i64> = order_items::Entity::find()
            .select_only()
            .column(order_items::Column::OrderId)
            .column_as(Expr::col(order_items::Column::Id).count(), "item_count")
            .filter(order_items::Column::OrderId.is_in(order_ids))
            .group_by(order_items::Column::OrderId)
            .into_tuple::<(i32, i64)>()
            .all(db)
            .await?
            .into_iter()
            .collect();

        Ok(rows
            .into_iter()
            .map(|(order, address)| OrderSummary {
                item_count: counts.get(&order.id).copied().unwrap_or(0),
                address: AddressSummary::from(address),
                order,
            })
            .collect())
    }

    pub async fn get_order(db: &DatabaseConnection, user_id: i32, order_id: i32) -> Result<OrderDetail, AppError> {
        let (order, address) = orders::Entity::find_by_id(order_id)
            .filter(orders::Column::UserId.eq(user_id))
            .find_also_related(addresses::Entity)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("Order"))?;

        let items = order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(order.id))
            .order_by_asc(order_items::Column::Id)
            .find_also_related(products::Entity)
            .all(db)
            .await?
            .into_iter()
            .map(|(item, product)| OrderItemView {
                item,
                image_url: product.and_then(|p| p.image_url),
            })
            .collect();

        Ok(OrderDetail {
            order,
            address: AddressSummary::from(address),
            items,
        })
    }
}

fn payment_method_label(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Cod => "COD",
        PaymentMethod::Upi => "UPI",
        PaymentMethod::Razorpay => "Razorpay",
    }
}

fn payment_status_label(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "Pending",
        PaymentStatus::Completed => "Completed",
    }
}
