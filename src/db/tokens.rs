use sea_orm::*;
use uuid::Uuid;

use crate::models::tokens::{self, TokenKind};

/// Persist a signed single-purpose token.
pub async fn save_token(
    db: &DatabaseConnection,
    token: &str,
    user_id: Uuid,
    kind: TokenKind,
    expires_at: chrono::DateTime<chrono::Utc>,
) -> Result<tokens::Model, DbErr> {
    let new_token = tokens::ActiveModel {
        id: Set(Uuid::new_v4()),
        token: Set(token.to_string()),
        user_id: Set(user_id),
        kind: Set(kind),
        expires_at: Set(expires_at),
        created_at: Set(chrono::Utc::now()),
    };

    new_token.insert(db).await
}

/// Look up a stored token by its exact value, kind and owner. A missing row
/// means the token was never issued or has already been consumed.
pub async fn find_token(
    db: &DatabaseConnection,
    token: &str,
    kind: TokenKind,
    user_id: Uuid,
) -> Result<Option<tokens::Model>, DbErr> {
    tokens::Entity::find()
        .filter(tokens::Column::Token.eq(token))
        .filter(tokens::Column::Kind.eq(kind))
        .filter(tokens::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// Consume all of a user's tokens of one kind (single-use semantics).
pub async fn delete_tokens_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
    kind: TokenKind,
) -> Result<DeleteResult, DbErr> {
    tokens::Entity::delete_many()
        .filter(tokens::Column::UserId.eq(user_id))
        .filter(tokens::Column::Kind.eq(kind))
        .exec(db)
        .await
}
