use actix_web::cookie::{Cookie, time};
use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use validator::Validate;

use crate::auth::jwt::{self, AuthToken, TokenType};
use crate::auth::password;
use crate::config::AppConfig;
use crate::db::tokens as token_db;
use crate::db::users as user_db;
use crate::email::EmailService;
use crate::error::ApiError;
use crate::models::tokens::TokenKind;
use crate::models::users::{
    self, ForgotPassword, LoginRequest, RegisterUser, ResetPassword, Role, UserResponse, UserStatus,
};

/// Build the `200 OK` login response: auth cookie plus the user and token in
/// the body.
pub(crate) fn send_token(
    user: users::Model,
    auth: AuthToken,
    config: &AppConfig,
) -> HttpResponse {
    let cookie = Cookie::build("token", auth.token.clone())
        .path("/")
        .http_only(true)
        .max_age(time::Duration::days(config.jwt.access_expiration_days))
        .finish();

    HttpResponse::Ok().cookie(cookie).json(serde_json::json!({
        "success": true,
        "user": UserResponse::from(user),
        "token": auth.token,
        "expires": auth.expires,
    }))
}

/// POST /api/v1/register — create an Unactivated account and send the
/// email-confirmation link.
pub async fn register(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    email: web::Data<EmailService>,
    body: web::Json<RegisterUser>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    input.validate()?;

    let role = match input.role {
        Some(Role::Admin) => {
            return Err(ApiError::BadRequest(
                "Cannot register an admin account".to_string(),
            ));
        }
        Some(role) => role,
        None => Role::Freelancer,
    };

    if user_db::is_email_taken(db.get_ref(), &input.email, None).await? {
        return Err(ApiError::BadRequest("Email already taken".to_string()));
    }

    let password_hash = password::hash_password(&input.password).map_err(ApiError::Internal)?;
    let user = user_db::insert_user(
        db.get_ref(),
        user_db::NewUser {
            email: input.email.clone(),
            password_hash,
            first_name: input.first_name,
            last_name: input.last_name,
            role,
        },
    )
    .await?;

    let verify = jwt::generate_verify_email_token(user.id, &config.jwt)
        .map_err(ApiError::Internal)?;
    token_db::save_token(
        db.get_ref(),
        &verify.token,
        user.id,
        TokenKind::VerifyEmail,
        verify.expires,
    )
    .await?;

    let confirm_url = format!(
        "{}/api/v1/email/confirm/{}",
        config.public_base_url, verify.token
    );
    let message = format!(
        "Your confirmation email token is as follow:\n\n{confirm_url}\n\n\
         If you have not requested this email, then ignore it."
    );
    email
        .send(&input.email, "Confirm Your Email", &message)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": format!("Email sent to: {}", input.email),
    })))
}

/// GET /api/v1/email/confirm/{token} — confirm the address, activate the
/// account and log the user in.
pub async fn confirm_email(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let token = path.into_inner();
    let failed = || ApiError::Unauthorized("Email verification failed".to_string());

    let claims = jwt::validate_token(&token, &config.jwt.secret).map_err(|_| failed())?;
    if claims.token_type != TokenType::VerifyEmail {
        return Err(failed());
    }
    let user_id = claims.user_id().map_err(|_| failed())?;

    token_db::find_token(db.get_ref(), &token, TokenKind::VerifyEmail, user_id)
        .await?
        .ok_or_else(failed)?;

    let user = user_db::confirm_email(db.get_ref(), user_id)
        .await
        .map_err(|_| failed())?;
    token_db::delete_tokens_for_user(db.get_ref(), user_id, TokenKind::VerifyEmail).await?;

    let auth = jwt::generate_auth_token(user.id, &config.jwt).map_err(ApiError::Internal)?;
    Ok(send_token(user, auth, &config))
}

/// POST /api/v1/login
pub async fn login(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    input.validate()?;

    let user = user_db::get_user_by_email(db.get_ref(), &input.email)
        .await?
        .filter(|u| password::verify_password(&input.password, &u.password_hash))
        // Deleted accounts are indistinguishable from unknown emails.
        .filter(|u| u.status != UserStatus::Deleted)
        .ok_or_else(|| ApiError::BadRequest("Incorrect Email or Password".to_string()))?;

    if user.status == UserStatus::Banned {
        return Err(ApiError::Forbidden("Your account has been banned".to_string()));
    }
    if !user.email_confirmed {
        return Err(ApiError::Unauthorized(
            "Your email is not verified. Please verify your email!".to_string(),
        ));
    }

    let auth = jwt::generate_auth_token(user.id, &config.jwt).map_err(ApiError::Internal)?;
    Ok(send_token(user, auth, &config))
}

/// POST /api/v1/password/forgot — email a password-reset link.
pub async fn forgot_password(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    email: web::Data<EmailService>,
    body: web::Json<ForgotPassword>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    input.validate()?;

    let user = user_db::get_user_by_email(db.get_ref(), &input.email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let reset = jwt::generate_reset_password_token(user.id, &config.jwt)
        .map_err(ApiError::Internal)?;
    token_db::save_token(
        db.get_ref(),
        &reset.token,
        user.id,
        TokenKind::ResetPassword,
        reset.expires,
    )
    .await?;

    let reset_url = format!(
        "{}/api/v1/password/reset/{}",
        config.public_base_url, reset.token
    );
    let message = format!(
        "Your password reset token is as follow:\n\n{reset_url}\n\n\
         If you have not requested this email, then ignore it."
    );
    email
        .send(&user.email, "Frl password recovery", &message)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": format!("Email sent to: {}", user.email),
    })))
}

/// PUT /api/v1/password/reset/{token}
pub async fn reset_password(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    path: web::Path<String>,
    body: web::Json<ResetPassword>,
) -> Result<HttpResponse, ApiError> {
    let token = path.into_inner();
    let input = body.into_inner();
    input.validate()?;

    if input.password != input.confirm_password {
        return Err(ApiError::BadRequest(
            "Password and ConfirmPassword are not matching".to_string(),
        ));
    }

    let failed = || ApiError::Unauthorized("Password reset failed".to_string());

    let claims = jwt::validate_token(&token, &config.jwt.secret).map_err(|_| failed())?;
    if claims.token_type != TokenType::ResetPassword {
        return Err(failed());
    }
    let user_id = claims.user_id().map_err(|_| failed())?;

    token_db::find_token(db.get_ref(), &token, TokenKind::ResetPassword, user_id)
        .await?
        .ok_or_else(failed)?;

    let password_hash = password::hash_password(&input.password).map_err(ApiError::Internal)?;
    let user = user_db::set_password_hash(db.get_ref(), user_id, password_hash)
        .await
        .map_err(|_| failed())?;
    token_db::delete_tokens_for_user(db.get_ref(), user_id, TokenKind::ResetPassword).await?;

    let auth = jwt::generate_auth_token(user.id, &config.jwt).map_err(ApiError::Internal)?;
    Ok(send_token(user, auth, &config))
}

/// GET /api/v1/logout — clear the auth cookie.
pub async fn logout() -> HttpResponse {
    let cookie = Cookie::build("token", "")
        .path("/")
        .http_only(true)
        .max_age(time::Duration::ZERO)
        .finish();

    HttpResponse::Ok().cookie(cookie).json(serde_json::json!({
        "success": true,
        "message": "Logged out",
    }))
}
