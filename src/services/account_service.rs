use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::*;

use crate::error::AppError;
use crate::models::dto::{NewAddressRequest, UpdateAddressRequest, UserView};
use crate::models::{addresses, users};

/// Profile and address book of the signed-in user
pub struct AccountService;

impl AccountService {
    pub async fn profile(db: &DatabaseConnection, user_id: i32) -> Result<UserView, AppError> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .map(UserView::from)
            .ok_or_else(|| AppError::not_found("User"))
    }

    /// Only the display name can be changed here
    pub async fn update_profile(db: &DatabaseConnection, user_id: i32, name: &str) -> Result<UserView, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }

        let user = users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let mut active: users::ActiveModel = user.into();
        active.name = Set(name.to_string());
        let user = active.update(db).await?;

        tracing::info!(user_id, "Profile updated");
        Ok(UserView::from(user))
    }

    /// Default address first, then newest first
    pub async fn addresses(db: &DatabaseConnection, user_id: i32) -> Result<Vec<addresses::Model>, AppError> {
        Ok(addresses::Entity::find()
            .filter(addresses::Column::UserId.eq(user_id))
            .order_by_desc(addresses::Column::IsDefault)
            .order_by_desc(addresses::Column::CreatedAt)
            .order_by_desc(addresses::Column::Id)
            .all(db)
            .await?)
    }

    pub async fn address(db: &DatabaseConnection, user_id: i32, address_id: i32) -> Result<addresses::Model, AppError> {
        addresses::Entity::find_by_id(address_id)
            .filter(addresses::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or_else(|| AppError::not_found("Address"))
    }

    pub async fn add_address(
        db: &DatabaseConnection,
        user_id: i32,
        req: NewAddressRequest,
    ) -> Result<addresses::Model, AppError> {
        let txn = db.begin().await?;

        match Self::add_address_in(&txn, user_id, req).await {
            Ok(address) => {
                txn.commit().await?;
                tracing::info!(user_id, address_id = address.id, "Address added");
                Ok(address)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!(user_id, error = %rollback_err, "Rollback failed");
                }
                Err(e.into())
            }
        }
    }

    async fn add_address_in(
        txn: &DatabaseTransaction,
        user_id: i32,
        req: NewAddressRequest,
    ) -> Result<addresses::Model, DbErr> {
        if req.is_default {
            Self::clear_default(txn, user_id, None).await?;
        }

        addresses::ActiveModel {
            user_id: Set(user_id),
            full_name: Set(req.full_name),
            phone: Set(req.phone),
            street: Set(req.street),
            city: Set(req.city),
            state: Set(req.state),
            pincode: Set(req.pincode),
            is_default: Set(req.is_default),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(txn)
        .await
    }

    /// Partial update: absent fields keep their stored value.
    pub async fn update_address(
        db: &DatabaseConnection,
        user_id: i32,
        address_id: i32,
        req: UpdateAddressRequest,
    ) -> Result<addresses::Model, AppError> {
        let txn = db.begin().await?;

        match Self::update_address_in(&txn, user_id, address_id, req).await {
            Ok(address) => {
                txn.commit().await?;
                Ok(address)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!(user_id, error = %rollback_err, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn update_address_in(
        txn: &DatabaseTransaction,
        user_id: i32,
        address_id: i32,
        req: UpdateAddressRequest,
    ) -> Result<addresses::Model, AppError> {
        let address = addresses::Entity::find_by_id(address_id)
            .filter(addresses::Column::UserId.eq(user_id))
            .one(txn)
            .await?
            .ok_or_else(|| AppError::not_found("Address"))?;

        if req.is_default == Some(true) {
            Self::clear_default(txn, user_id, Some(address_id)).await?;
        }

        let mut active: addresses::ActiveModel = address.clone().into();
        if let Some(v) = req.full_name {
            active.full_name = Set(v);
        }
        if let Some(v) = req.phone {
            active.phone = Set(v);
        }
        if let Some(v) = req.street {
            active.street = Set(v);
        }
        if let Some(v) = req.city {
            active.city = Set(v);
        }
        if let Some(v) = req.state {
            active.state = Set(v);
        }
        if let Some(v) = req.pincode {
            active.pincode = Set(v);
        }
        if let Some(v) = req.is_default {
            active.is_default = Set(v);
        }

        if !active.is_changed() {
            return Ok(address);
        }
        Ok(active.update(txn).await?)
    }

    pub async fn delete_address(db: &DatabaseConnection, user_id: i32, address_id: i32) -> Result<(), AppError> {
        let result = addresses::Entity::delete_many()
            .filter(addresses::Column::Id.eq(address_id))
            .filter(addresses::Column::UserId.eq(user_id))
            .exec(db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Address"));
        }
        tracing::info!(user_id, address_id, "Address deleted");
        Ok(())
    }

    // Keeps at most one default per user
    async fn clear_default(txn: &DatabaseTransaction, user_id: i32, except: Option<i32>) -> Result<(), DbErr> {
        let mut query = addresses::Entity::update_many()
            .col_expr(addresses::Column::IsDefault, Expr::value(false))
            .filter(addresses::Column::UserId.eq(user_id))
            .filter(addresses::Column::IsDefault.eq(true));
        if let Some(id) = except {
            query = query.filter(addresses::Column::Id.ne(id));
        }
        query.exec(txn).await?;
        Ok(())
    }
}
