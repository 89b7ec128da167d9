use sea_orm::*;
use uuid::Uuid;

use crate::models::jobs::JobSummary;
use crate::models::offers::{self, CreateOffer, OfferWithJob};

/// Insert a new offer (not yet accepted).
pub async fn insert_offer(
    db: &DatabaseConnection,
    job_id: Uuid,
    freelancer_id: Uuid,
    input: CreateOffer,
) -> Result<offers::Model, DbErr> {
    let new_offer = offers::ActiveModel {
        id: Set(Uuid::new_v4()),
        job_id: Set(job_id),
        freelancer_id: Set(freelancer_id),
        amount: Set(input.amount),
        message: Set(input.message),
        is_accepted: Set(false),
        created_at: Set(chrono::Utc::now()),
    };

    new_offer.insert(db).await
}

/// The freelancer's offer on a given job, if any (one per job is allowed).
pub async fn get_offer_for_job_and_freelancer(
    db: &DatabaseConnection,
    job_id: Uuid,
    freelancer_id: Uuid,
) -> Result<Option<offers::Model>, DbErr> {
    offers::Entity::find()
        .filter(offers::Column::JobId.eq(job_id))
        .filter(offers::Column::FreelancerId.eq(freelancer_id))
        .one(db)
        .await
}

/// All offers on a job, oldest first.
pub async fn get_offers_by_job(
    db: &DatabaseConnection,
    job_id: Uuid,
) -> Result<Vec<offers::Model>, DbErr> {
    offers::Entity::find()
        .filter(offers::Column::JobId.eq(job_id))
        .order_by_asc(offers::Column::CreatedAt)
        .all(db)
        .await
}

/// All offers a freelancer has sent, each joined with its job.
pub async fn get_offers_with_jobs_by_freelancer(
    db: &DatabaseConnection,
    freelancer_id: Uuid,
) -> Result<Vec<OfferWithJob>, DbErr> {
    let rows = offers::Entity::find()
        .filter(offers::Column::FreelancerId.eq(freelancer_id))
        .order_by_desc(offers::Column::CreatedAt)
        .find_also_related(crate::models::jobs::Entity)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(offer, job)| OfferWithJob {
            offer,
            job: job.map(JobSummary::from),
        })
        .collect())
}

/// Delete an offer by ID.
pub async fn delete_offer(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    offers::Entity::delete_by_id(id).exec(db).await
}
