pub mod account_service;
pub mod auth_service;
pub mod cart_service;
pub mod catalog_service;
pub mod notification;
pub mod order_service;
pub mod payment_gateway;
pub mod payment_service;
pub mod pricing;

pub use account_service::AccountService;
pub use auth_service::AuthService;
pub use cart_service::CartService;
pub use catalog_service::CatalogService;
pub use order_service::OrderService;
pub use payment_service::PaymentService;
