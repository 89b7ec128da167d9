use std::env;

/// Typed application configuration, read once at startup.
///
/// Everything comes from environment variables (a `.env` file is loaded by
/// `main` before this runs). Missing required variables abort startup with a
/// clear message instead of failing later on the first request.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Public base URL used when building links inside emails.
    pub public_base_url: String,
    pub jwt: JwtConfig,
    pub mail: MailConfig,
    pub stripe: StripeConfig,
    pub upload: Option<UploadConfig>,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_expiration_days: i64,
    pub reset_password_expiration_minutes: i64,
    pub verify_email_expiration_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    /// When unset, webhook signatures are not verified (dev mode).
    pub webhook_secret: Option<String>,
    pub success_url: String,
    pub cancel_url: String,
}

/// File/image host used for job attachments and category images.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub api_url: String,
    pub api_key: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            public_base_url: optional("PUBLIC_BASE_URL")
                .unwrap_or_else(|| "http://localhost:8080".to_string()),
            jwt: JwtConfig {
                secret: required("JWT_SECRET"),
                access_expiration_days: int_or("JWT_ACCESS_EXPIRATION_DAYS", 7),
                reset_password_expiration_minutes: int_or(
                    "JWT_RESET_PASSWORD_EXPIRATION_MINUTES",
                    30,
                ),
                verify_email_expiration_minutes: int_or("JWT_VERIFY_EMAIL_EXPIRATION_MINUTES", 30),
            },
            mail: MailConfig {
                api_url: required("MAIL_API_URL"),
                api_key: required("MAIL_API_KEY"),
                from: optional("MAIL_FROM").unwrap_or_else(|| "no-reply@frl.dev".to_string()),
            },
            stripe: StripeConfig {
                secret_key: required("STRIPE_SECRET_KEY"),
                webhook_secret: optional("STRIPE_WEBHOOK_SECRET"),
                success_url: optional("CHECKOUT_SUCCESS_URL")
                    .unwrap_or_else(|| "http://localhost:8080/api/v1/checkout/success".to_string()),
                cancel_url: optional("CHECKOUT_CANCEL_URL")
                    .unwrap_or_else(|| "http://localhost:8080/api/v1/checkout/cancel".to_string()),
            },
            upload: match (optional("UPLOAD_API_URL"), optional("UPLOAD_API_KEY")) {
                (Some(api_url), Some(api_key)) => Some(UploadConfig { api_url, api_key }),
                _ => None,
            },
        }
    }
}

fn required(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| panic!("{name} must be set"))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn int_or(name: &str, default: i64) -> i64 {
    match env::var(name) {
        Ok(v) => v
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be an integer")),
        Err(_) => default,
    }
}
