use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Job lifecycle status stored as a lowercase string in the database.
///
/// Open → Processing (freelancer selected, points escrowed)
/// Processing → Closed (completed, fund released) | Cancelled (deposits refunded)
/// Open → Cancelled | Expired. Closed, Cancelled and Expired are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "closed")]
    Closed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
    #[sea_orm(string_value = "expired")]
    Expired,
}

/// SeaORM entity for the `jobs` table.
///
/// The assignment record (accepted freelancer, deadline, escrowed fund) is
/// flattened into nullable columns; they are only set while the job is in
/// Processing or a later state.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub attachment_url: Option<String>,
    /// Days the posting stays open for offers.
    pub close_time: i32,
    /// Days the freelancer has to complete the job once assigned.
    pub duration: i32,
    #[sea_orm(column_type = "Double")]
    pub min_price: f64,
    #[sea_orm(column_type = "Double")]
    pub max_price: f64,
    pub category_id: Uuid,
    pub owner_id: Uuid,
    pub status: JobStatus,
    pub assigned_freelancer_id: Option<Uuid>,
    pub assigned_offer_id: Option<Uuid>,
    pub deadline: Option<DateTimeUtc>,
    /// Points held in escrow for this job. Zero unless Processing.
    #[sea_orm(column_type = "Double")]
    pub escrow_fund: f64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::offers::Entity")]
    Offers,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::offers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Offers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateJob {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 to 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    /// Base64/data-URL attachment, uploaded to the file host when present.
    pub file: Option<String>,
    #[validate(range(min = 1, message = "Close time must be at least 1 day"))]
    pub close_time: i32,
    #[validate(range(min = 1, message = "Duration must be at least 1 day"))]
    pub duration: i32,
    #[validate(range(min = 0.0, message = "Min price must not be negative"))]
    pub min_price: f64,
    pub max_price: f64,
    pub category_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobListQuery {
    /// Case-insensitive substring match on the title.
    pub title: Option<String>,
    pub status: Option<JobStatus>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl JobListQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(20).min(100)
    }
}

/// Public job representation: the assignment/escrow columns are omitted,
/// matching the summary endpoint that anyone can call.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub attachment_url: Option<String>,
    pub close_time: i32,
    pub duration: i32,
    pub min_price: f64,
    pub max_price: f64,
    pub category_id: Uuid,
    pub owner_id: Uuid,
    pub status: JobStatus,
    pub created_at: DateTimeUtc,
}

impl From<Model> for JobSummary {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            attachment_url: m.attachment_url,
            close_time: m.close_time,
            duration: m.duration,
            min_price: m.min_price,
            max_price: m.max_price,
            category_id: m.category_id,
            owner_id: m.owner_id,
            status: m.status,
            created_at: m.created_at,
        }
    }
}

/// Full job view for the owner/admin: assignment fields plus all offers.
#[derive(Debug, Clone, Serialize)]
pub struct JobDetails {
    #[serde(flatten)]
    pub job: Model,
    pub offers: Vec<super::offers::Model>,
}
