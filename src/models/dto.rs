// Request / response shapes of the REST API
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{addresses, cart_items, categories, order_items, orders, products, users};

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Please provide name, email, and password"))]
    pub name: String,
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Please provide email and password"))]
    pub email: String,
    #[validate(length(min = 1, message = "Please provide email and password"))]
    pub password: String,
}

// Used by resend-verification and forgot-password
#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "Token and new password are required"))]
    pub token: String,
    #[serde(rename = "newPassword")]
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailQuery {
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub is_email_verified: bool,
    pub created_at: chrono::NaiveDateTime,
}

impl From<users::Model> for UserView {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            is_email_verified: user.is_email_verified,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: UserView,
    pub tokens: TokenPair,
}

// ---------------------------------------------------------------------------
// Profile & addresses
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewAddressRequest {
    #[validate(length(min = 1, message = "All address fields are required"))]
    pub full_name: String,
    #[validate(length(min = 1, message = "All address fields are required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "All address fields are required"))]
    pub street: String,
    #[validate(length(min = 1, message = "All address fields are required"))]
    pub city: String,
    #[validate(length(min = 1, message = "All address fields are required"))]
    pub state: String,
    #[validate(length(min = 1, message = "All address fields are required"))]
    pub pincode: String,
    #[serde(default)]
    pub is_default: bool,
}

// Every field is optional, absent fields keep their stored value
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAddressRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub is_default: Option<bool>,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: products::Model,
    pub category_name: Option<String>,
}

impl From<(products::Model, Option<categories::Model>)> for ProductView {
    fn from((product, category): (products::Model, Option<categories::Model>)) -> Self {
        Self {
            product,
            category_name: category.map(|c| c.name),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<u64>,
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct AddToCartRequest {
    pub product_id: i32,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCartItemRequest {
    #[validate(range(min = 1, message = "Valid quantity is required (minimum 1)"))]
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct CartLineView {
    #[serde(flatten)]
    pub item: cart_items::Model,
    pub name: String,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub availability: String,
    pub stock_quantity: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub subtotal: Decimal,
    pub delivery_charge: Decimal,
    pub total: Decimal,
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

// address_id / payment_method are optional so that their absence yields
// the domain message instead of a deserialization error
#[derive(Debug, Default, Deserialize)]
pub struct CreateOrderRequest {
    pub address_id: Option<i32>,
    pub payment_method: Option<String>,
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub order_id: i32,
    pub total_amount: Decimal,
    pub payment_method: orders::PaymentMethod,
    pub payment_status: orders::PaymentStatus,
    pub order_status: orders::OrderStatus,
}

#[derive(Debug, Default, Serialize)]
pub struct AddressSummary {
    pub full_name: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub phone: Option<String>,
}

impl From<Option<addresses::Model>> for AddressSummary {
    fn from(address: Option<addresses::Model>) -> Self {
        match address {
            Some(a) => Self {
                full_name: Some(a.full_name),
                street: Some(a.street),
                city: Some(a.city),
                state: Some(a.state),
                pincode: Some(a.pincode),
                phone: Some(a.phone),
            },
            None => Self::default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderSummary {
    #[serde(flatten)]
    pub order: orders::Model,
    #[serde(flatten)]
    pub address: AddressSummary,
    pub item_count: i64,
}

#[derive(Debug, Serialize)]
pub struct OrderItemView {
    #[serde(flatten)]
    pub item: order_items::Model,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: orders::Model,
    #[serde(flatten)]
    pub address: AddressSummary,
    pub items: Vec<OrderItemView>,
}

// ---------------------------------------------------------------------------
// Payment
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct CreatePaymentOrderRequest {
    pub amount: Option<Decimal>,
    pub address_id: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrderView {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub key: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: Option<String>,
    pub razorpay_payment_id: Option<String>,
    pub razorpay_signature: Option<String>,
    pub address_id: Option<i32>,
}
