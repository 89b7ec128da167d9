use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Payment status stored as a lowercase string in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "success")]
    Success,
}

/// SeaORM entity for the `payments` table — one row per checkout attempt,
/// reconciled by the payment-processor webhook.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: PaymentStatus,
    pub method: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::payment_items::Entity")]
    Items,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::payment_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckoutItem {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    /// Point amount of the bundle; also the unit charge in the smallest
    /// currency unit, mirroring how the catalog prices bundles.
    #[validate(range(min = 1.0, message = "Item amount must be positive"))]
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[validate(length(min = 1, message = "At least one item is required"))]
    #[validate(nested)]
    pub items: Vec<CheckoutItem>,
}

/// A payment with its line items, as returned after checkout creation.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentWithItems {
    #[serde(flatten)]
    pub payment: Model,
    pub items: Vec<super::payment_items::Model>,
}
