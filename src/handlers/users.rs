use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::authorization::require_admin;
use crate::auth::jwt;
use crate::auth::middleware::AuthenticatedUser;
use crate::auth::password;
use crate::config::AppConfig;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::models::users::{ChangePassword, UpdateProfile, UserListQuery, UserResponse, UserStatus};

/// GET /api/v1/admin/users — list users (admin, paginated, optional status).
pub async fn get_all_users(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<UserListQuery>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;

    let (users, total) =
        user_db::get_users_paginated(db.get_ref(), query.page(), query.limit(), query.status)
            .await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "page": query.page(),
        "total": total,
        "count": users.len(),
        "users": users,
    })))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;
    let id = path.into_inner();

    let found = user_db::get_user_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "user": UserResponse::from(found),
    })))
}

/// PUT /api/v1/admin/users/ban/{id}
pub async fn ban_user(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;

    let banned = user_db::set_status(db.get_ref(), path.into_inner(), UserStatus::Banned)
        .await
        .map_err(not_found_or_db)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "user": UserResponse::from(banned),
    })))
}

/// DELETE /api/v1/admin/users/{id} — soft delete.
pub async fn delete_user(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;

    let deleted = user_db::set_status(db.get_ref(), path.into_inner(), UserStatus::Deleted)
        .await
        .map_err(not_found_or_db)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "user": UserResponse::from(deleted),
    })))
}

/// GET /api/v1/profile — the caller's own account.
pub async fn get_profile(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "user": UserResponse::from(user.0),
    }))
}

/// PUT /api/v1/profile/update
pub async fn update_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<UpdateProfile>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    input.validate()?;

    let updated = user_db::update_profile(db.get_ref(), user.0.id, input).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "user": UserResponse::from(updated),
    })))
}

/// PUT /api/v1/password/change — verify the old password, store the new
/// hash and re-issue the auth cookie.
pub async fn change_password(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    body: web::Json<ChangePassword>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    input.validate()?;

    if !password::verify_password(&input.old_password, &user.0.password_hash) {
        return Err(ApiError::BadRequest("Old password is incorrect".to_string()));
    }

    let password_hash =
        password::hash_password(&input.new_password).map_err(ApiError::Internal)?;
    let updated = user_db::set_password_hash(db.get_ref(), user.0.id, password_hash).await?;

    let auth = jwt::generate_auth_token(updated.id, &config.jwt).map_err(ApiError::Internal)?;
    Ok(super::auth::send_token(updated, auth, &config))
}

/// DELETE /api/v1/users/delete — soft-delete the caller's own account.
pub async fn delete_my_account(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    user_db::set_status(db.get_ref(), user.0.id, UserStatus::Deleted).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Deleted account",
    })))
}

fn not_found_or_db(e: sea_orm::DbErr) -> ApiError {
    match e {
        sea_orm::DbErr::RecordNotFound(_) => ApiError::NotFound("User not found".to_string()),
        other => ApiError::Database(other),
    }
}
