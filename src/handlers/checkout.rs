use actix_web::{HttpRequest, HttpResponse, web};
use sea_orm::{DatabaseConnection, TransactionError};
use validator::Validate;

use crate::auth::middleware::AuthenticatedUser;
use crate::config::AppConfig;
use crate::db::payments::{self as payment_db, FulfillError};
use crate::error::ApiError;
use crate::models::payments::CheckoutRequest;
use crate::payments::webhook::{self, WebhookEvent};
use crate::payments::StripeClient;

/// POST /api/v1/checkout — persist a Pending payment and open a Stripe
/// Checkout Session for it.
pub async fn create_session(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    stripe: web::Data<StripeClient>,
    body: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner();
    input.validate()?;

    let payment = payment_db::insert_payment(db.get_ref(), user.0.id, "card", input.items.clone())
        .await
        .map_err(|e| match e {
            TransactionError::Connection(e) | TransactionError::Transaction(e) => {
                ApiError::Database(e)
            }
        })?;

    let session = stripe
        .create_checkout_session(user.0.id, payment.payment.id, &input.items)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "payment": payment,
        "session": session,
    })))
}

/// POST /api/v1/checkout/webhook — inbound events from the payment
/// processor. Signature verification runs whenever a webhook secret is
/// configured; the completed-checkout event credits the purchased points.
pub async fn webhook(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    payload: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    if let Some(secret) = &config.stripe.webhook_secret {
        let header = req
            .headers()
            .get("Stripe-Signature")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError::BadRequest("Missing Stripe-Signature header".to_string())
            })?;

        webhook::verify_signature(&payload, header, secret, chrono::Utc::now().timestamp())
            .map_err(|e| {
                tracing::warn!("webhook signature verification failed: {e}");
                ApiError::BadRequest(format!("Webhook signature verification failed: {e}"))
            })?;
    }

    let event: WebhookEvent = serde_json::from_slice(&payload)
        .map_err(|e| ApiError::BadRequest(format!("Malformed webhook payload: {e}")))?;

    match event.event_type.as_str() {
        "checkout.session.completed" => {
            let payment_id = event.data.object.metadata.payment_id.ok_or_else(|| {
                ApiError::BadRequest("Event metadata has no payment_id".to_string())
            })?;

            let payment = payment_db::fulfill_payment(db.get_ref(), payment_id)
                .await
                .map_err(|e| match e {
                    TransactionError::Connection(e) => ApiError::Database(e),
                    TransactionError::Transaction(FulfillError::PaymentNotFound) => {
                        ApiError::NotFound("Payment not found".to_string())
                    }
                    TransactionError::Transaction(FulfillError::UserNotFound) => {
                        ApiError::NotFound("User not found".to_string())
                    }
                    TransactionError::Transaction(FulfillError::Db(e)) => ApiError::Database(e),
                })?;

            tracing::info!(payment_id = %payment.id, "checkout completed, points credited");
        }
        other => {
            tracing::debug!("unhandled webhook event type: {other}");
        }
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "received webhook event",
    })))
}

/// GET /api/v1/checkout/success — landing page target after payment.
pub async fn success() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Checkout success",
    }))
}

/// GET /api/v1/checkout/cancel
pub async fn cancel() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Checkout cancel",
    }))
}
