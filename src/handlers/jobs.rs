use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::authorization::{require_role, verify_job_owner};
use crate::auth::middleware::AuthenticatedUser;
use crate::db::categories as category_db;
use crate::db::escrow;
use crate::db::jobs as job_db;
use crate::db::offers as offer_db;
use crate::email::EmailService;
use crate::error::ApiError;
use crate::models::jobs::{CreateJob, JobDetails, JobListQuery, JobStatus, JobSummary};
use crate::models::offers::{CreateOffer, SelectFreelancer};
use crate::models::users::Role;
use crate::upload::UploadClient;

/// GET /api/v1/jobs — public listing with title/status filter.
pub async fn get_jobs(
    db: web::Data<DatabaseConnection>,
    query: web::Query<JobListQuery>,
) -> Result<HttpResponse, ApiError> {
    let (jobs, total) = job_db::get_jobs_paginated(db.get_ref(), &query).await?;
    let jobs: Vec<JobSummary> = jobs.into_iter().map(JobSummary::from).collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "page": query.page(),
        "total": total,
        "count": jobs.len(),
        "jobs": jobs,
    })))
}

/// GET /api/v1/jobs/{id} — public summary, assignment omitted.
pub async fn get_job(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let job = job_db::get_job_by_id(db.get_ref(), path.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "job": JobSummary::from(job),
    })))
}

/// GET /api/v1/jobs/{id}/details — owner/admin view with assignment and offers.
pub async fn get_job_details(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let job = job_db::get_job_by_id(db.get_ref(), path.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))?;

    verify_job_owner(&job, &user.0)?;

    let offers = offer_db::get_offers_by_job(db.get_ref(), job.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "job": JobDetails { job, offers },
    })))
}

/// POST /api/v1/jobs/create — employer posts a job.
pub async fn create_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    uploads: web::Data<UploadClient>,
    body: web::Json<CreateJob>,
) -> Result<HttpResponse, ApiError> {
    require_role(&user.0, Role::Employer)?;

    let input = body.into_inner();
    input.validate()?;

    if input.max_price <= input.min_price {
        return Err(ApiError::BadRequest(
            "Max price must be larger than min price".to_string(),
        ));
    }

    category_db::get_category_by_id(db.get_ref(), input.category_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    let attachment_url = match &input.file {
        Some(file) => Some(
            uploads
                .upload(file, "jobs")
                .await
                .map_err(|e| ApiError::Internal(e.to_string()))?,
        ),
        None => None,
    };

    let job = job_db::insert_job(
        db.get_ref(),
        job_db::NewJob {
            title: input.title,
            description: input.description,
            attachment_url,
            close_time: input.close_time,
            duration: input.duration,
            min_price: input.min_price,
            max_price: input.max_price,
            category_id: input.category_id,
            owner_id: user.0.id,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "job": job,
    })))
}

/// DELETE /api/v1/jobs/{id} — owner or admin, only while Open.
pub async fn delete_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let job = job_db::get_job_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))?;

    verify_job_owner(&job, &user.0)?;

    if job.status != JobStatus::Open {
        return Err(ApiError::Forbidden(
            "Can not delete a job that already has a freelancer assigned".to_string(),
        ));
    }

    job_db::delete_job(db.get_ref(), id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": format!("Deleted job with id: {id}"),
    })))
}

/// POST /api/v1/jobs/offer/{id} — freelancer bids on an open job.
pub async fn offer_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<CreateOffer>,
) -> Result<HttpResponse, ApiError> {
    require_role(&user.0, Role::Freelancer)?;

    let job_id = path.into_inner();
    let input = body.into_inner();
    input.validate()?;

    let job = job_db::get_job_by_id(db.get_ref(), job_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))?;

    if job.status != JobStatus::Open {
        return Err(ApiError::Conflict(
            "This job is no longer accepting offers".to_string(),
        ));
    }
    if job.owner_id == user.0.id {
        return Err(ApiError::BadRequest(
            "You cannot send an offer to your own job".to_string(),
        ));
    }
    if input.amount < job.min_price || input.amount > job.max_price {
        return Err(ApiError::BadRequest(format!(
            "Offer amount must be between {} and {}",
            job.min_price, job.max_price
        )));
    }
    if offer_db::get_offer_for_job_and_freelancer(db.get_ref(), job_id, user.0.id)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "You have already sent an offer to this job".to_string(),
        ));
    }

    offer_db::insert_offer(db.get_ref(), job_id, user.0.id, input).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Your offer has been sent to the job",
    })))
}

/// DELETE /api/v1/jobs/offer/cancel/{id} — freelancer withdraws their offer
/// on job `{id}`, as long as it has not been accepted.
pub async fn cancel_offer(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_role(&user.0, Role::Freelancer)?;
    let job_id = path.into_inner();

    let offer = offer_db::get_offer_for_job_and_freelancer(db.get_ref(), job_id, user.0.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Offer not found".to_string()))?;

    if offer.is_accepted {
        return Err(ApiError::Conflict(
            "An accepted offer can not be cancelled".to_string(),
        ));
    }

    offer_db::delete_offer(db.get_ref(), offer.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Cancelled the offer",
    })))
}

/// GET /api/v1/jobs/offers — the freelancer's own offers, with their jobs.
pub async fn my_offers(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    require_role(&user.0, Role::Freelancer)?;

    let offers = offer_db::get_offers_with_jobs_by_freelancer(db.get_ref(), user.0.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "count": offers.len(),
        "offers": offers,
    })))
}

/// POST /api/v1/jobs/{id}/freelancer — employer accepts one offer.
///
/// The escrow transaction debits both parties, funds the job and moves it to
/// Processing; afterwards the freelancer is notified by email (best effort).
pub async fn select_freelancer(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    email: web::Data<EmailService>,
    path: web::Path<Uuid>,
    body: web::Json<SelectFreelancer>,
) -> Result<HttpResponse, ApiError> {
    require_role(&user.0, Role::Employer)?;
    let job_id = path.into_inner();

    let (job, freelancer) =
        escrow::select_freelancer(db.get_ref(), job_id, body.offer_id, user.0.id).await?;

    let message = format!(
        "Congratulations! You have been selected for the job \"{}\".\n\
         Your escrow deposit has been placed and the deadline is {}.",
        job.title,
        job.deadline.map(|d| d.to_rfc3339()).unwrap_or_default()
    );
    if let Err(e) = email
        .send(&freelancer.email, "You have been selected", &message)
        .await
    {
        tracing::warn!("selection email to {} failed: {e}", freelancer.email);
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": format!("Email sent to: {}", freelancer.email),
        "job": job,
    })))
}

/// POST /api/v1/jobs/{id}/complete — employer closes a Processing job and
/// the escrow fund is released to the freelancer.
pub async fn complete_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_role(&user.0, Role::Employer)?;

    let job = escrow::complete_job(db.get_ref(), path.into_inner(), user.0.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "job": job,
    })))
}

/// POST /api/v1/jobs/{id}/cancel — employer cancels a job. Open jobs just
/// flip to Cancelled; Processing jobs refund both deposits first. Both paths
/// run inside one escrow transaction so the status seen is the locked row's.
pub async fn cancel_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_role(&user.0, Role::Employer)?;

    let job = escrow::cancel_job(db.get_ref(), path.into_inner(), user.0.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "job": job,
    })))
}
