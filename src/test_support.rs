//! Shared fixtures for the unit tests: an in-memory SQLite database built
//! from the entities, seeders, and fakes for the external capabilities.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend,
    Schema, Set,
};
use secrecy::SecretString;

use crate::config::AppConfig;
use crate::models::{
    addresses, cart_items, categories, order_items, orders, products, search_history, users,
};
use crate::services::notification::{NotificationError, NotificationSender, OrderConfirmation};
use crate::services::payment_gateway::{
    GatewayError, GatewayOrder, GatewayOrderRequest, PaymentGateway,
};
use crate::services::payment_service::SignatureVerifier;
use crate::state::AppState;
use crate::utils::{jwt, password};

pub const TEST_PAYMENT_SECRET: &str = "test_key_secret";
pub const TEST_PASSWORD: &str = "password123";

pub async fn setup_db() -> DatabaseConnection {
    // A single connection: every pooled connection to :memory: is its own database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.expect("sqlite connects");

    let backend = db.get_database_backend();
    let schema = Schema::new(DbBackend::Sqlite);
    let tables = [
        schema.create_table_from_entity(users::Entity),
        schema.create_table_from_entity(addresses::Entity),
        schema.create_table_from_entity(categories::Entity),
        schema.create_table_from_entity(products::Entity),
        schema.create_table_from_entity(cart_items::Entity),
        schema.create_table_from_entity(orders::Entity),
        schema.create_table_from_entity(order_items::Entity),
        schema.create_table_from_entity(search_history::Entity),
    ];
    for table in &tables {
        db.execute(backend.build(table)).await.expect("table created");
    }

    db
}

pub fn test_config() -> AppConfig {
    AppConfig::from_lookup(|key| {
        let value = match key {
            "DATABASE_URL" => "sqlite::memory:",
            "JWT_SECRET" => "test-access-secret",
            "JWT_REFRESH_SECRET" => "test-refresh-secret",
            "DELIVERY_CHARGE" => "50",
            "RAZORPAY_KEY_ID" => "rzp_test_key",
            "RAZORPAY_KEY_SECRET" => TEST_PAYMENT_SECRET,
            _ => return None,
        };
        Some(value.to_string())
    })
    .expect("test config is complete")
}

pub fn app_state() -> AppState {
    app_state_with(Arc::new(RecordingSender::default()), Arc::new(FakeGateway::default()))
}

pub fn app_state_with(notifier: Arc<dyn NotificationSender>, gateway: Arc<dyn PaymentGateway>) -> AppState {
    AppState::new(
        test_config(),
        notifier,
        gateway,
        SignatureVerifier::new(Some(SecretString::from(TEST_PAYMENT_SECRET.to_string()))),
    )
}

/// `Authorization` header value for a user
pub fn bearer_for(state: &AppState, user_id: i32, email: &str) -> String {
    let pair = jwt::generate_token_pair(user_id, email, &state.config.jwt).expect("token signs");
    format!("Bearer {}", pair.access_token)
}

// ---------------------------------------------------------------------------
// Seeders
// ---------------------------------------------------------------------------

pub async fn seed_user(db: &DatabaseConnection, name: &str, email: &str) -> users::Model {
    users::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password::hash_password(TEST_PASSWORD)),
        is_email_verified: Set(false),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("user inserted")
}

pub async fn seed_address(db: &DatabaseConnection, user_id: i32, is_default: bool) -> addresses::Model {
    addresses::ActiveModel {
        user_id: Set(user_id),
        full_name: Set("Ana Rao".to_string()),
        phone: Set("9876543210".to_string()),
        street: Set("12 MG Road".to_string()),
        city: Set("Bengaluru".to_string()),
        state: Set("Karnataka".to_string()),
        pincode: Set("560001".to_string()),
        is_default: Set(is_default),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("address inserted")
}

pub async fn seed_category(db: &DatabaseConnection, key: &str, name: &str) -> categories::Model {
    categories::ActiveModel {
        key: Set(key.to_string()),
        name: Set(name.to_string()),
        description: Set(None),
    }
    .insert(db)
    .await
    .expect("category inserted")
}

pub async fn seed_product(db: &DatabaseConnection, name: &str, price: Decimal, stock: i32) -> products::Model {
    seed_product_in(db, name, price, stock, None).await
}

pub async fn seed_product_in(
    db: &DatabaseConnection,
    name: &str,
    price: Decimal,
    stock: i32,
    category_key: Option<&str>,
) -> products::Model {
    products::ActiveModel {
        name: Set(name.to_string()),
        product_type: Set(Some("Accessory".to_string())),
        price: Set(price),
        category_key: Set(category_key.map(str::to_string)),
        stock_quantity: Set(stock),
        availability: Set(if stock > 0 { "In Stock" } else { products::OUT_OF_STOCK }.to_string()),
        description: Set(Some(format!("{name} for everyday use"))),
        image_url: Set(Some(format!("/img/{}.png", name.to_lowercase().replace(' ', "-")))),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("product inserted")
}

pub async fn seed_cart_line(db: &DatabaseConnection, user_id: i32, product_id: i32, quantity: i32) -> cart_items::Model {
    cart_items::ActiveModel {
        user_id: Set(user_id),
        product_id: Set(product_id),
        quantity: Set(quantity),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("cart line inserted")
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Records every email instead of sending it; `failing()` makes every send fail.
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<(String, String)>>, // (kind, recipient)
    fail: bool,
}

impl RecordingSender {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("lock").clone()
    }

    fn record(&self, kind: &str, to: &str) -> Result<(), NotificationError> {
        self.sent.lock().expect("lock").push((kind.to_string(), to.to_string()));
        if self.fail {
            return Err(NotificationError::Api {
                status: 503,
                message: "mail service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send_verification(&self, to: &str, _name: &str, _token: &str) -> Result<(), NotificationError> {
        self.record("verification", to)
    }

    async fn send_password_reset(&self, to: &str, _name: &str, _token: &str) -> Result<(), NotificationError> {
        self.record("password_reset", to)
    }

    async fn send_order_confirmation(
        &self,
        to: &str,
        _name: &str,
        _order: &OrderConfirmation,
    ) -> Result<(), NotificationError> {
        self.record("order_confirmation", to)
    }
}

#[derive(Default)]
pub struct FakeGateway {
    pub requests: Mutex<Vec<GatewayOrderRequest>>,
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    fn key_id(&self) -> Option<&str> {
        Some("rzp_test_key")
    }

    async fn create_order(&self, request: GatewayOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let order = GatewayOrder {
            id: "order_test_1".to_string(),
            amount: request.amount,
            currency: request.currency.clone(),
        };
        self.requests.lock().expect("lock").push(request);
        Ok(order)
    }
}
