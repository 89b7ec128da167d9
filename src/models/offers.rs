use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// SeaORM entity for the `offers` table — a freelancer's bid on an open job.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "offers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub job_id: Uuid,
    pub freelancer_id: Uuid,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub is_accepted: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::jobs::Entity",
        from = "Column::JobId",
        to = "super::jobs::Column::Id"
    )]
    Job,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::FreelancerId",
        to = "super::users::Column::Id"
    )]
    Freelancer,
}

impl Related<super::jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Freelancer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOffer {
    #[validate(range(min = 0.0, message = "Amount must not be negative"))]
    pub amount: f64,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

/// Body of `POST /api/v1/jobs/{id}/freelancer` — the offer the employer accepts.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectFreelancer {
    pub offer_id: Uuid,
}

/// An offer joined with its job, for the freelancer's "my offers" listing.
#[derive(Debug, Clone, Serialize)]
pub struct OfferWithJob {
    #[serde(flatten)]
    pub offer: Model,
    pub job: Option<super::jobs::JobSummary>,
}
