// ============================================================================
// MODEL : ORDERS
// ============================================================================
//
// Columns of the orders table:
//   - id (INTEGER, PRIMARY KEY, SERIAL)
//   - user_id (INTEGER, FK users) / address_id (INTEGER, FK addresses)
//   - subtotal, delivery_charge, total_amount (NUMERIC(10,2))
//   - payment_method ('COD', 'UPI', 'Razorpay')
//   - payment_status ('Pending', 'Completed')
//   - order_status ('Placed', 'Confirmed', 'Shipped', 'Delivered', 'Cancelled')
//   - razorpay_order_id / razorpay_payment_id / razorpay_signature (nullable)
//   - created_at (TIMESTAMP)
//
// Lifecycle:
//   Placed -> Confirmed -> Shipped -> Delivered
//   any non-terminal state -> Cancelled
//
// An order is always written in the same transaction as its order_items.
//
// ============================================================================

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "COD")]
    #[serde(rename = "COD")]
    Cod,
    #[sea_orm(string_value = "UPI")]
    #[serde(rename = "UPI")]
    Upi,
    #[sea_orm(string_value = "Razorpay")]
    Razorpay,
}

impl PaymentMethod {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "COD" => Some(Self::Cod),
            "UPI" => Some(Self::Upi),
            "Razorpay" => Some(Self::Razorpay),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Completed")]
    Completed,
}

impl PaymentStatus {
    /// COD is paid on delivery; a Razorpay order arrives already captured when
    /// the client supplies the gateway payment id.
    pub fn at_checkout(method: PaymentMethod, gateway_payment_id: Option<&str>) -> Self {
        match (method, gateway_payment_id) {
            (PaymentMethod::Razorpay, Some(id)) if !id.is_empty() => Self::Completed,
            _ => Self::Pending,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum OrderStatus {
    #[sea_orm(string_value = "Placed")]
    Placed,
    #[sea_orm(string_value = "Confirmed")]
    Confirmed,
    #[sea_orm(string_value = "Shipped")]
    Shipped,
    #[sea_orm(string_value = "Delivered")]
    Delivered,
    #[sea_orm(string_value = "Cancelled")]
    Cancelled,
}

impl OrderStatus {
    fn rank(self) -> u8 {
        match self {
            Self::Placed => 0,
            Self::Confirmed => 1,
            Self::Shipped => 2,
            Self::Delivered => 3,
            Self::Cancelled => 4,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Forward-only progression; Cancelled is reachable from every non-terminal state.
    pub fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            Self::Cancelled => true,
            _ => next.rank() > self.rank(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Placed => "Placed",
            Self::Confirmed => "Confirmed",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub user_id: i32,

    pub address_id: i32,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub subtotal: Decimal,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub delivery_charge: Decimal,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_amount: Decimal,

    pub payment_method: PaymentMethod,

    pub payment_status: PaymentStatus,

    pub order_status: OrderStatus,

    pub razorpay_order_id: Option<String>,

    pub razorpay_payment_id: Option<String>,

    #[serde(skip_serializing)]
    pub razorpay_signature: Option<String>,

    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::addresses::Entity",
        from = "Column::AddressId",
        to = "super::addresses::Column::Id"
    )]
    Address,

    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::addresses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Address.def()
    }
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_moves_forward_only() {
        assert!(OrderStatus::Placed.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Placed.can_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Placed));
        assert!(!OrderStatus::Confirmed.can_transition_to(OrderStatus::Confirmed));
    }

    #[test]
    fn test_cancel_only_from_non_terminal() {
        assert!(OrderStatus::Placed.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_payment_status_at_checkout() {
        assert_eq!(PaymentStatus::at_checkout(PaymentMethod::Cod, None), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::at_checkout(PaymentMethod::Cod, Some("pay_1")), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::at_checkout(PaymentMethod::Upi, Some("pay_1")), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::at_checkout(PaymentMethod::Razorpay, None), PaymentStatus::Pending);
        assert_eq!(PaymentStatus::at_checkout(PaymentMethod::Razorpay, Some("")), PaymentStatus::Pending);
        assert_eq!(
            PaymentStatus::at_checkout(PaymentMethod::Razorpay, Some("pay_1")),
            PaymentStatus::Completed
        );
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!(PaymentMethod::parse("COD"), Some(PaymentMethod::Cod));
        assert_eq!(PaymentMethod::parse("Razorpay"), Some(PaymentMethod::Razorpay));
        assert_eq!(PaymentMethod::parse("cod"), None);
        assert_eq!(PaymentMethod::parse("Card"), None);
    }
}
