use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::*;

use crate::error::AppError;
use crate::models::dto::ProductView;
use crate::models::{categories, products, search_history};

pub const DEFAULT_HISTORY_LIMIT: u64 = 20;
const MAX_HISTORY_LIMIT: u64 = 100;

pub struct CatalogService;

impl CatalogService {
    /// Every product, newest first
    pub async fn list_products(db: &DatabaseConnection) -> Result<Vec<ProductView>, AppError> {
        let rows = products::Entity::find()
            .find_also_related(categories::Entity)
            .order_by_desc(products::Column::CreatedAt)
            .order_by_desc(products::Column::Id)
            .all(db)
            .await?;

        Ok(rows.into_iter().map(ProductView::from).collect())
    }

    pub async fn get_product(db: &DatabaseConnection, product_id: i32) -> Result<ProductView, AppError> {
        products::Entity::find_by_id(product_id)
            .find_also_related(categories::Entity)
            .one(db)
            .await?
            .map(ProductView::from)
            .ok_or_else(|| AppError::not_found("Product"))
    }

    pub async fn products_by_category(db: &DatabaseConnection, category_key: &str) -> Result<Vec<ProductView>, AppError> {
        let rows = products::Entity::find()
            .filter(products::Column::CategoryKey.eq(category_key))
            .find_also_related(categories::Entity)
            .order_by_asc(products::Column::Name)
            .all(db)
            .await?;

        Ok(rows.into_iter().map(ProductView::from).collect())
    }

    /// Case-insensitive substring match on name, type and description.
    /// The term is logged for `searcher` when given; that write never fails the search.
    pub async fn search(
        db: &DatabaseConnection,
        term: Option<&str>,
        searcher: Option<i32>,
    ) -> Result<Vec<ProductView>, AppError> {
        let term = term.map(str::trim).filter(|t| !t.is_empty()).ok_or_else(|| {
            AppError::Validation("Search query is required".to_string())
        })?;

        let pattern = format!("%{}%", term.to_lowercase());
        let matches_term = |column: products::Column| {
            Expr::expr(Func::lower(Expr::col((products::Entity, column)))).like(pattern.as_str())
        };

        let rows = products::Entity::find()
            .filter(
                Condition::any()
                    .add(matches_term(products::Column::Name))
                    .add(matches_term(products::Column::ProductType))
                    .add(matches_term(products::Column::Description)),
            )
            .find_also_related(categories::Entity)
            .order_by_asc(products::Column::Name)
            .all(db)
            .await?;

        if let Some(user_id) = searcher {
            Self::record_search(db, user_id, term).await;
        }

        Ok(rows.into_iter().map(ProductView::from).collect())
    }

    async fn record_search(db: &DatabaseConnection, user_id: i32, term: &str) {
        let entry = search_history::ActiveModel {
            user_id: Set(user_id),
            search_term: Set(term.to_string()),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        if let Err(e) = entry.insert(db).await {
            tracing::warn!(user_id, error = %e, "Failed to save search history");
        }
    }

    pub async fn categories(db: &DatabaseConnection) -> Result<Vec<categories::Model>, AppError> {
        Ok(categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(db)
            .await?)
    }

    /// Distinct terms of a user, most recently searched first.
    pub async fn search_history(db: &DatabaseConnection, user_id: i32, limit: Option<u64>) -> Result<Vec<String>, AppError> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT).clamp(1, MAX_HISTORY_LIMIT);

        Ok(search_history::Entity::find()
            .select_only()
            .column(search_history::Column::SearchTerm)
            .filter(search_history::Column::UserId.eq(user_id))
            .group_by(search_history::Column::SearchTerm)
            .order_by_desc(Expr::col(search_history::Column::CreatedAt).max())
            .limit(limit)
            .into_tuple::<String>()
            .all(db)
            .await?)
    }
}
