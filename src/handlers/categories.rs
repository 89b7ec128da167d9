use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;
use validator::Validate;

use crate::auth::authorization::require_admin;
use crate::auth::middleware::AuthenticatedUser;
use crate::db::categories as category_db;
use crate::error::ApiError;
use crate::models::categories::{CreateCategory, UpdateCategory};
use crate::upload::UploadClient;

/// GET /api/v1/categories — the taxonomy: roots with their children.
pub async fn get_categories(
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let categories = category_db::get_roots_with_children(db.get_ref()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "count": categories.len(),
        "categories": categories,
    })))
}

/// GET /api/v1/categories/{id}
pub async fn get_category(
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let category = category_db::get_category_with_children(db.get_ref(), path.into_inner())
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "category": category,
    })))
}

/// POST /api/v1/admin/categories/create
pub async fn create_category(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    uploads: web::Data<UploadClient>,
    body: web::Json<CreateCategory>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;

    let input = body.into_inner();
    input.validate()?;

    if let Some(parent_id) = input.parent_id {
        category_db::get_category_by_id(db.get_ref(), parent_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Parent category not found".to_string()))?;
    }

    let image_url = match &input.image {
        Some(image) => Some(
            uploads
                .upload(image, "categories")
                .await
                .map_err(|e| ApiError::Internal(e.to_string()))?,
        ),
        None => None,
    };

    let category = category_db::insert_category(
        db.get_ref(),
        category_db::NewCategory {
            name: input.name,
            description: input.description,
            image_url,
            parent_id: input.parent_id,
        },
    )
    .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "category": category,
    })))
}

/// PUT /api/v1/admin/categories/{id}
pub async fn update_category(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    uploads: web::Data<UploadClient>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCategory>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;

    let id = path.into_inner();
    let input = body.into_inner();
    input.validate()?;

    if let Some(parent_id) = input.parent_id {
        if parent_id == id {
            return Err(ApiError::BadRequest(
                "A category can not be its own parent".to_string(),
            ));
        }
        category_db::get_category_by_id(db.get_ref(), parent_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Parent category not found".to_string()))?;
    }

    let image_url = match &input.image {
        Some(image) => Some(
            uploads
                .upload(image, "categories")
                .await
                .map_err(|e| ApiError::Internal(e.to_string()))?,
        ),
        None => None,
    };

    let category = category_db::update_category(
        db.get_ref(),
        id,
        input.name,
        input.description,
        image_url,
        input.parent_id,
    )
    .await
    .map_err(|e| match e {
        sea_orm::DbErr::RecordNotFound(_) => ApiError::NotFound("Category not found".to_string()),
        other => ApiError::Database(other),
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "category": category,
    })))
}

/// DELETE /api/v1/admin/categories/{id} — refused while children or jobs
/// still reference the category.
pub async fn delete_category(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&user.0)?;
    let id = path.into_inner();

    category_db::get_category_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;

    if category_db::category_in_use(db.get_ref(), id).await? {
        return Err(ApiError::Conflict(
            "Category still has children or jobs".to_string(),
        ));
    }

    category_db::delete_category(db.get_ref(), id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": format!("Deleted category with id: {id}"),
    })))
}
