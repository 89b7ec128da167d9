use sea_orm::*;
use uuid::Uuid;

use crate::models::categories::{self, CategoryTree};
use crate::models::jobs;

/// Insert a new category. The handler has already resolved the optional
/// image into a URL and verified the parent exists.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub parent_id: Option<Uuid>,
}

pub async fn insert_category(
    db: &DatabaseConnection,
    input: NewCategory,
) -> Result<categories::Model, DbErr> {
    let new_category = categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name),
        description: Set(input.description),
        image_url: Set(input.image_url),
        parent_id: Set(input.parent_id),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_category.insert(db).await
}

/// Fetch all root categories, each with its children attached.
pub async fn get_roots_with_children(db: &DatabaseConnection) -> Result<Vec<CategoryTree>, DbErr> {
    let roots = categories::Entity::find()
        .filter(categories::Column::ParentId.is_null())
        .order_by_asc(categories::Column::Name)
        .all(db)
        .await?;

    let root_ids: Vec<Uuid> = roots.iter().map(|c| c.id).collect();
    let mut children = if root_ids.is_empty() {
        Vec::new()
    } else {
        categories::Entity::find()
            .filter(categories::Column::ParentId.is_in(root_ids))
            .order_by_asc(categories::Column::Name)
            .all(db)
            .await?
    };

    Ok(roots
        .into_iter()
        .map(|root| {
            let (mine, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut children)
                .into_iter()
                .partition(|c| c.parent_id == Some(root.id));
            children = rest;
            CategoryTree {
                category: root,
                children: mine,
            }
        })
        .collect())
}

/// Fetch a single category by ID.
pub async fn get_category_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<categories::Model>, DbErr> {
    categories::Entity::find_by_id(id).one(db).await
}

/// Fetch one category together with its children.
pub async fn get_category_with_children(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<CategoryTree>, DbErr> {
    let Some(category) = categories::Entity::find_by_id(id).one(db).await? else {
        return Ok(None);
    };

    let children = categories::Entity::find()
        .filter(categories::Column::ParentId.eq(id))
        .order_by_asc(categories::Column::Name)
        .all(db)
        .await?;

    Ok(Some(CategoryTree { category, children }))
}

/// Update a category's name/description/image/parent.
pub async fn update_category(
    db: &DatabaseConnection,
    id: Uuid,
    name: Option<String>,
    description: Option<String>,
    image_url: Option<String>,
    parent_id: Option<Uuid>,
) -> Result<categories::Model, DbErr> {
    let category = categories::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Category not found".to_string()))?;

    let mut active: categories::ActiveModel = category.into();

    if let Some(name) = name {
        active.name = Set(name);
    }
    if let Some(description) = description {
        active.description = Set(Some(description));
    }
    if let Some(image_url) = image_url {
        active.image_url = Set(Some(image_url));
    }
    if let Some(parent_id) = parent_id {
        active.parent_id = Set(Some(parent_id));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// True when the category still has children or jobs referencing it.
pub async fn category_in_use(db: &DatabaseConnection, id: Uuid) -> Result<bool, DbErr> {
    let child_count = categories::Entity::find()
        .filter(categories::Column::ParentId.eq(id))
        .count(db)
        .await?;
    if child_count > 0 {
        return Ok(true);
    }

    let job_count = jobs::Entity::find()
        .filter(jobs::Column::CategoryId.eq(id))
        .count(db)
        .await?;

    Ok(job_count > 0)
}

/// Delete a category by ID.
pub async fn delete_category(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    categories::Entity::delete_by_id(id).exec(db).await
}
