// ============================================================================
// MODELS - MAIN MODULE
// ============================================================================
//
// One SeaORM entity per PostgreSQL table, plus the API DTOs.
//
// Modules:
//   - users : Accounts (password hash, verification / reset tokens)
//   - addresses : Delivery addresses (one default per user)
//   - categories : Product categories, keyed by a short string
//   - products : Catalog with price and stock_quantity
//   - cart_items : Per-user cart lines (table "cart")
//   - orders : Placed orders, payment and lifecycle status
//   - order_items : Order lines with name/price snapshot
//   - search_history : Search terms of signed-in users
//   - dto : Request / response shapes
//   - health : Health check response
//
// ============================================================================

pub mod addresses;
pub mod cart_items;
pub mod categories;
pub mod dto;
pub mod health;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod search_history;
pub mod users;
