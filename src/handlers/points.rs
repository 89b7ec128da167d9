use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::authorization::require_admin;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::points as point_db;
use crate::error::ApiError;
use crate::models::points::{CreatePoint, UpdatePoint};

/// GET /api/v1/points — the public bundle catalog.
pub async fn get_points(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, ApiError> {
    let points = point_db::get_all_points(db.get_ref()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "count": points.len(),
        "points": points,
    })))
}

/// GET /api/v1/points/{id}
pub async fn get_point(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let point = point_db::get_point_by_id(db.get_ref(), path.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound("Point not found".to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "point": point,
    })))
}

/// POST /api/v1/admin/points/create
pub async fn create_point(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreatePoint>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;

    let input = body.into_inner();
    input.validate()?;

    let point = point_db::insert_point(db.get_ref(), input).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "point": point,
    })))
}

/// PUT /api/v1/admin/points/{id}
pub async fn update_point(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePoint>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;

    let input = body.into_inner();
    input.validate()?;

    let point = point_db::update_point(db.get_ref(), path.into_inner(), input)
        .await
        .map_err(|e| match e {
            sea_orm::DbErr::RecordNotFound(_) => ApiError::NotFound("Point not found".to_string()),
            other => ApiError::Database(other),
        })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "point": point,
    })))
}

/// DELETE /api/v1/admin/points/{id}
pub async fn delete_point(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;
    let id = path.into_inner();

    point_db::get_point_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Point not found".to_string()))?;

    point_db::delete_point(db.get_ref(), id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": format!("Deleted point with id: {id}"),
    })))
}
