use sea_orm::*;
use uuid::Uuid;

use crate::models::users::{self, Role, UpdateProfile, UserStatus};

/// Everything needed to insert a user row. The password is already hashed
/// by the time it reaches this layer.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
}

/// Insert a new user in Unactivated status.
pub async fn insert_user(db: &DatabaseConnection, input: NewUser) -> Result<users::Model, DbErr> {
    let new_user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(input.email),
        password_hash: Set(input.password_hash),
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        avatar_url: Set(None),
        role: Set(input.role),
        status: Set(UserStatus::Unactivated),
        email_confirmed: Set(false),
        points: Set(0.0),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_user.insert(db).await
}

/// Check whether `email` is already taken by another user.
pub async fn is_email_taken(
    db: &DatabaseConnection,
    email: &str,
    exclude_user: Option<Uuid>,
) -> Result<bool, DbErr> {
    let mut query = users::Entity::find().filter(users::Column::Email.eq(email));
    if let Some(id) = exclude_user {
        query = query.filter(users::Column::Id.ne(id));
    }

    Ok(query.count(db).await? > 0)
}

/// Fetch a page of users, optionally filtered by status. Returns the page
/// plus the total row count for the filter.
pub async fn get_users_paginated(
    db: &DatabaseConnection,
    page: u64,
    limit: u64,
    status: Option<UserStatus>,
) -> Result<(Vec<users::Model>, u64), DbErr> {
    let mut query = users::Entity::find().order_by_asc(users::Column::CreatedAt);
    if let Some(status) = status {
        query = query.filter(users::Column::Status.eq(status));
    }

    let paginator = query.paginate(db, limit);
    let total = paginator.num_items().await?;
    let page_items = paginator.fetch_page(page.saturating_sub(1)).await?;

    Ok((page_items, total))
}

/// Fetch a single user by ID.
pub async fn get_user_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

/// Fetch a single user by email.
pub async fn get_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await
}

/// Update the caller's own profile fields.
pub async fn update_profile(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateProfile,
) -> Result<users::Model, DbErr> {
    let user = users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

    let mut active: users::ActiveModel = user.into();

    if let Some(first_name) = input.first_name {
        active.first_name = Set(Some(first_name));
    }
    if let Some(last_name) = input.last_name {
        active.last_name = Set(Some(last_name));
    }
    if let Some(avatar_url) = input.avatar_url {
        active.avatar_url = Set(Some(avatar_url));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Replace a user's password hash.
pub async fn set_password_hash(
    db: &DatabaseConnection,
    id: Uuid,
    password_hash: String,
) -> Result<users::Model, DbErr> {
    let user = users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

    let mut active: users::ActiveModel = user.into();
    active.password_hash = Set(password_hash);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Mark the user's email as confirmed and activate the account.
pub async fn confirm_email(db: &DatabaseConnection, id: Uuid) -> Result<users::Model, DbErr> {
    let user = users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

    let mut active: users::ActiveModel = user.into();
    active.email_confirmed = Set(true);
    active.status = Set(UserStatus::Active);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Change a user's account status (ban / soft delete).
pub async fn set_status(
    db: &DatabaseConnection,
    id: Uuid,
    status: UserStatus,
) -> Result<users::Model, DbErr> {
    let user = users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

    let mut active: users::ActiveModel = user.into();
    active.status = Set(status);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}
