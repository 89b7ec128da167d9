use actix_web::FromRequest;
use actix_web::{Error, HttpRequest, dev::Payload, web};
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;

use crate::auth::jwt::{self, TokenType};
use crate::config::AppConfig;
use crate::db::users as user_db;
use crate::models::users::{self, UserStatus};

/// Extractor that authenticates the request and loads the user row.
///
/// The access JWT is taken from the `token` cookie (how the login endpoint
/// delivers it) or, for API clients, from an `Authorization: Bearer` header.
pub struct AuthenticatedUser(pub users::Model);

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // 1. Pull the token from the cookie or the Authorization header.
            let token = req
                .cookie("token")
                .map(|c| c.value().to_string())
                .or_else(|| {
                    req.headers()
                        .get("Authorization")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.strip_prefix("Bearer "))
                        .map(|v| v.to_string())
                })
                .ok_or_else(|| actix_web::error::ErrorUnauthorized("You are not logged in"))?;

            // 2. Validate the JWT.
            let config = req
                .app_data::<web::Data<AppConfig>>()
                .ok_or_else(|| actix_web::error::ErrorInternalServerError("Config not set up"))?;

            let claims = jwt::validate_token(&token, &config.jwt.secret)
                .map_err(|e| actix_web::error::ErrorUnauthorized(format!("Invalid token: {e}")))?;

            // Single-purpose tokens never open a session.
            if claims.token_type != TokenType::Access {
                return Err(actix_web::error::ErrorUnauthorized(
                    "Token is not an access token",
                ));
            }

            let user_id = claims
                .user_id()
                .map_err(actix_web::error::ErrorUnauthorized)?;

            // 3. Load the user.
            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| {
                    actix_web::error::ErrorInternalServerError("Database not configured")
                })?;

            let user = user_db::get_user_by_id(db.get_ref(), user_id)
                .await
                .map_err(|e| {
                    actix_web::error::ErrorInternalServerError(format!("Database error: {e}"))
                })?
                .ok_or_else(|| actix_web::error::ErrorUnauthorized("User no longer exists"))?;

            match user.status {
                UserStatus::Banned => Err(actix_web::error::ErrorForbidden(
                    "Your account has been banned",
                )),
                UserStatus::Deleted => {
                    Err(actix_web::error::ErrorUnauthorized("User no longer exists"))
                }
                _ => Ok(AuthenticatedUser(user)),
            }
        })
    }
}
