use sea_orm::*;
use uuid::Uuid;

use crate::models::points::{self, CreatePoint, UpdatePoint};

/// Insert a new point bundle into the catalog.
pub async fn insert_point(
    db: &DatabaseConnection,
    input: CreatePoint,
) -> Result<points::Model, DbErr> {
    let new_point = points::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        description: Set(input.description),
        amount: Set(input.amount),
    };

    new_point.insert(db).await
}

/// Fetch the whole catalog.
pub async fn get_all_points(db: &DatabaseConnection) -> Result<Vec<points::Model>, DbErr> {
    points::Entity::find()
        .order_by_asc(points::Column::Amount)
        .all(db)
        .await
}

/// Fetch a single bundle by ID.
pub async fn get_point_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<points::Model>, DbErr> {
    points::Entity::find_by_id(id).one(db).await
}

/// Update a bundle's name/description/amount.
pub async fn update_point(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdatePoint,
) -> Result<points::Model, DbErr> {
    let point = points::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Point not found".to_string()))?;

    let mut active: points::ActiveModel = point.into();

    if let Some(name) = input.name {
        active.name = Set(name);
    }
    if let Some(description) = input.description {
        active.description = Set(Some(description));
    }
    if let Some(amount) = input.amount {
        active.amount = Set(amount);
    }

    active.update(db).await
}

/// Delete a bundle by ID.
pub async fn delete_point(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    points::Entity::delete_by_id(id).exec(db).await
}
