use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// SeaORM entity for the `points` table — the fixed catalog of purchasable
/// point bundles shown on the top-up page.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "points")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePoint {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 to 100 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Amount must not be negative"))]
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePoint {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 to 100 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Amount must not be negative"))]
    pub amount: Option<f64>,
}
