use sea_orm::sea_query::{Expr, Func};
use sea_orm::*;
use uuid::Uuid;

use crate::models::jobs::{self, JobListQuery, JobStatus};

/// Everything needed to insert a job row. The handler has already validated
/// prices, resolved the attachment upload and checked the category.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub attachment_url: Option<String>,
    pub close_time: i32,
    pub duration: i32,
    pub min_price: f64,
    pub max_price: f64,
    pub category_id: Uuid,
    pub owner_id: Uuid,
}

/// Insert a new job in Open status with no assignment.
pub async fn insert_job(db: &DatabaseConnection, input: NewJob) -> Result<jobs::Model, DbErr> {
    let new_job = jobs::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title),
        description: Set(input.description),
        attachment_url: Set(input.attachment_url),
        close_time: Set(input.close_time),
        duration: Set(input.duration),
        min_price: Set(input.min_price),
        max_price: Set(input.max_price),
        category_id: Set(input.category_id),
        owner_id: Set(input.owner_id),
        status: Set(JobStatus::Open),
        assigned_freelancer_id: Set(None),
        assigned_offer_id: Set(None),
        deadline: Set(None),
        escrow_fund: Set(0.0),
        created_at: Set(chrono::Utc::now()),
    };

    new_job.insert(db).await
}

/// Build the listing select: case-insensitive title substring match plus
/// optional status filter, newest first.
fn listing_query(query: &JobListQuery) -> Select<jobs::Entity> {
    let mut find = jobs::Entity::find().order_by_desc(jobs::Column::CreatedAt);

    if let Some(title) = &query.title {
        find = find.filter(
            Expr::expr(Func::lower(Expr::col(jobs::Column::Title)))
                .like(format!("%{}%", title.to_lowercase())),
        );
    }
    if let Some(status) = query.status {
        find = find.filter(jobs::Column::Status.eq(status));
    }

    find
}

/// Fetch a page of jobs matching the listing filter, newest first.
/// Returns the page plus the total row count for the filter.
pub async fn get_jobs_paginated(
    db: &DatabaseConnection,
    query: &JobListQuery,
) -> Result<(Vec<jobs::Model>, u64), DbErr> {
    let paginator = listing_query(query).paginate(db, query.limit());
    let total = paginator.num_items().await?;
    let page_items = paginator.fetch_page(query.page().saturating_sub(1)).await?;

    Ok((page_items, total))
}

/// Fetch a single job by ID.
pub async fn get_job_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<jobs::Model>, DbErr> {
    jobs::Entity::find_by_id(id).one(db).await
}

/// Delete a job by ID.
pub async fn delete_job(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    jobs::Entity::delete_by_id(id).exec(db).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::QueryTrait;

    #[test]
    fn title_filter_is_case_insensitive() {
        let query = JobListQuery {
            title: Some("Rust".to_string()),
            status: None,
            page: None,
            limit: None,
        };

        let sql = listing_query(&query)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"LOWER("title")"#), "{sql}");
        assert!(sql.contains("%rust%"), "{sql}");
    }

    #[test]
    fn status_filter_uses_stored_string_value() {
        let query = JobListQuery {
            title: None,
            status: Some(JobStatus::Open),
            page: None,
            limit: None,
        };

        let sql = listing_query(&query)
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains("'open'"), "{sql}");
    }
}
