// ============================================================================
// MODEL : USERS
// ============================================================================
//
// Columns of the users table:
//   - id (INTEGER, PRIMARY KEY, SERIAL)
//   - name (VARCHAR, NOT NULL)
//   - email (VARCHAR, UNIQUE, NOT NULL)
//   - password (VARCHAR, NOT NULL) - pbkdf2:sha256:iterations$salt$hash
//   - is_email_verified (BOOLEAN, DEFAULT FALSE)
//   - email_verification_token / email_verification_expires (24 hours)
//   - password_reset_token / password_reset_expires (1 hour)
//   - created_at (TIMESTAMP)
//
// Workflow:
//   1. POST /api/auth/signup creates the user with is_email_verified = false
//      and a random verification token
//   2. GET /api/auth/verify-email?token=xxx flips the flag and clears the token
//   3. POST /api/auth/forgot-password stores a reset token
//   4. POST /api/auth/reset-password replaces the hash and clears the token
//
// Points of attention:
//   - Tokens are single use: they are cleared as soon as they are consumed
//   - Hash and tokens are never serialized
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(unique)]
    pub email: String,

    #[serde(skip_serializing)]
    #[sea_orm(column_name = "password")]
    pub password_hash: String,

    pub is_email_verified: bool,

    #[serde(skip_serializing)]
    pub email_verification_token: Option<String>,

    #[serde(skip_serializing)]
    pub email_verification_expires: Option<DateTime>,

    #[serde(skip_serializing)]
    pub password_reset_token: Option<String>,

    #[serde(skip_serializing)]
    pub password_reset_expires: Option<DateTime>,

    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::addresses::Entity")]
    Addresses,

    #[sea_orm(has_many = "super::cart_items::Entity")]
    CartItems,

    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
}

impl Related<super::addresses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Addresses.def()
    }
}

impl Related<super::cart_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItems.def()
    }
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
