use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;

/// What a token is good for. Single-purpose tokens (email verification,
/// password reset) are never accepted where an access token is expected,
/// and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    VerifyEmail,
    ResetPassword,
}

/// Claims carried by every JWT this service issues (HS256).
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The user's UUID.
    pub sub: String,
    /// Token issued-at (Unix timestamp).
    pub iat: usize,
    /// Token expiration (Unix timestamp).
    pub exp: usize,
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

impl Claims {
    /// Extract the user UUID from the `sub` claim.
    pub fn user_id(&self) -> Result<Uuid, String> {
        Uuid::parse_str(&self.sub).map_err(|e| format!("Invalid UUID in sub claim: {e}"))
    }
}

/// Sign a token for `user_id` that expires at `expires_at`.
pub fn sign_token(
    user_id: Uuid,
    expires_at: chrono::DateTime<Utc>,
    token_type: TokenType,
    secret: &str,
) -> Result<String, String> {
    let claims = Claims {
        sub: user_id.to_string(),
        iat: Utc::now().timestamp() as usize,
        exp: expires_at.timestamp() as usize,
        token_type,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| format!("Failed to sign token: {e}"))
}

/// Validate a JWT's signature and expiry and return the decoded claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("{:?}", e.kind()))
}

/// An access token together with its expiry, sent back in the auth cookie.
#[derive(Debug, Clone, Serialize)]
pub struct AuthToken {
    pub token: String,
    pub expires: chrono::DateTime<Utc>,
}

/// Issue the session access token for a freshly authenticated user.
pub fn generate_auth_token(user_id: Uuid, cfg: &JwtConfig) -> Result<AuthToken, String> {
    let expires = Utc::now() + Duration::days(cfg.access_expiration_days);
    let token = sign_token(user_id, expires, TokenType::Access, &cfg.secret)?;

    Ok(AuthToken { token, expires })
}

/// Issue a reset-password token (minutes-scale expiry).
pub fn generate_reset_password_token(
    user_id: Uuid,
    cfg: &JwtConfig,
) -> Result<AuthToken, String> {
    let expires = Utc::now() + Duration::minutes(cfg.reset_password_expiration_minutes);
    let token = sign_token(user_id, expires, TokenType::ResetPassword, &cfg.secret)?;

    Ok(AuthToken { token, expires })
}

/// Issue a verify-email token (minutes-scale expiry).
pub fn generate_verify_email_token(user_id: Uuid, cfg: &JwtConfig) -> Result<AuthToken, String> {
    let expires = Utc::now() + Duration::minutes(cfg.verify_email_expiration_minutes);
    let token = sign_token(user_id, expires, TokenType::VerifyEmail, &cfg.secret)?;

    Ok(AuthToken { token, expires })
}
