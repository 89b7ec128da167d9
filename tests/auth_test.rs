//! Integration test for JWT issuance and validation.
//!
//! Tokens are minted and validated entirely in-process with a test secret,
//! so no running server or database is needed.
//!
//! Run with: `cargo test --test auth_test`
use chrono::{Duration, Utc};
use uuid::Uuid;

use frl_backend::auth::jwt::{
    TokenType, generate_auth_token, generate_reset_password_token, generate_verify_email_token,
    sign_token, validate_token,
};
use frl_backend::config::JwtConfig;

/// A fake secret for testing — never use the real one in tests committed to git.
const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

fn test_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_SECRET.to_string(),
        access_expiration_days: 7,
        reset_password_expiration_minutes: 30,
        verify_email_expiration_minutes: 30,
    }
}

#[test]
fn test_valid_token_decodes_correctly() {
    let user_id = Uuid::new_v4();
    let auth = generate_auth_token(user_id, &test_config()).expect("Failed to mint token");

    let claims = validate_token(&auth.token, TEST_SECRET).expect("Token should be valid");

    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.user_id().unwrap(), user_id);
    assert_eq!(claims.token_type, TokenType::Access);
}

#[test]
fn test_expired_token_is_rejected() {
    let expires = Utc::now() - Duration::minutes(5); // well past the 60s default leeway
    let token = sign_token(Uuid::new_v4(), expires, TokenType::Access, TEST_SECRET).unwrap();

    let result = validate_token(&token, TEST_SECRET);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("ExpiredSignature"));
}

#[test]
fn test_wrong_secret_is_rejected() {
    let auth = generate_auth_token(Uuid::new_v4(), &test_config()).unwrap();

    let result = validate_token(&auth.token, "completely-wrong-secret-xxxxxxxxxxxxxxxxxxx");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("InvalidSignature"));
}

#[test]
fn test_garbage_token_is_rejected() {
    let result = validate_token("not.a.valid.jwt", TEST_SECRET);
    assert!(result.is_err());
}

#[test]
fn test_single_purpose_tokens_carry_their_type() {
    let user_id = Uuid::new_v4();
    let config = test_config();

    let verify = generate_verify_email_token(user_id, &config).unwrap();
    let claims = validate_token(&verify.token, TEST_SECRET).unwrap();
    assert_eq!(claims.token_type, TokenType::VerifyEmail);

    let reset = generate_reset_password_token(user_id, &config).unwrap();
    let claims = validate_token(&reset.token, TEST_SECRET).unwrap();
    assert_eq!(claims.token_type, TokenType::ResetPassword);
}

#[test]
fn test_reset_token_expiry_is_minutes_not_days() {
    let config = test_config();
    let reset = generate_reset_password_token(Uuid::new_v4(), &config).unwrap();

    let remaining = reset.expires - Utc::now();
    assert!(remaining <= Duration::minutes(30));
    assert!(remaining > Duration::minutes(25));
}
