use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::config::StripeConfig;
use crate::models::payments::CheckoutItem;

const CHECKOUT_SESSIONS_URL: &str = "https://api.stripe.com/v1/checkout/sessions";

#[derive(Debug, Error)]
pub enum StripeError {
    #[error("Stripe request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Stripe returned status {status}: {message}")]
    Api { status: u16, message: String },
}

/// The subset of the Checkout Session object the frontend needs.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

/// Minimal Stripe client: the API is form-encoded HTTP, so a raw reqwest
/// client covers the one endpoint this service uses.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    config: StripeConfig,
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a Checkout Session for a points top-up. The payment row's id
    /// travels in the metadata so the webhook can reconcile it later.
    pub async fn create_checkout_session(
        &self,
        user_id: Uuid,
        payment_id: Uuid,
        items: &[CheckoutItem],
    ) -> Result<CheckoutSession, StripeError> {
        let form = checkout_session_form(&self.config, user_id, payment_id, items);

        let response = self
            .client
            .post(CHECKOUT_SESSIONS_URL)
            .bearer_auth(&self.config.secret_key)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

/// Build the form parameters for a Checkout Session. Kept separate from the
/// HTTP call so the encoding is testable.
fn checkout_session_form(
    config: &StripeConfig,
    user_id: Uuid,
    payment_id: Uuid,
    items: &[CheckoutItem],
) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), config.success_url.clone()),
        ("cancel_url".to_string(), config.cancel_url.clone()),
        (
            "payment_method_types[0]".to_string(),
            "card".to_string(),
        ),
        ("metadata[user_id]".to_string(), user_id.to_string()),
        ("metadata[payment_id]".to_string(), payment_id.to_string()),
    ];

    for (i, item) in items.iter().enumerate() {
        form.push((
            format!("line_items[{i}][price_data][currency]"),
            "usd".to_string(),
        ));
        form.push((
            format!("line_items[{i}][price_data][product_data][name]"),
            item.name.clone(),
        ));
        // Bundle amounts are priced in the smallest currency unit.
        form.push((
            format!("line_items[{i}][price_data][unit_amount]"),
            (item.amount.round() as i64).to_string(),
        ));
        form.push((format!("line_items[{i}][quantity]"), "1".to_string()));
    }

    form
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> StripeConfig {
        StripeConfig {
            secret_key: "sk_test_xxx".to_string(),
            webhook_secret: None,
            success_url: "https://shop.test/success".to_string(),
            cancel_url: "https://shop.test/cancel".to_string(),
        }
    }

    #[test]
    fn form_carries_metadata_and_line_items() {
        let user_id = Uuid::new_v4();
        let payment_id = Uuid::new_v4();
        let items = vec![
            CheckoutItem {
                name: "Starter pack".to_string(),
                amount: 500.0,
            },
            CheckoutItem {
                name: "Pro pack".to_string(),
                amount: 2000.0,
            },
        ];

        let form = checkout_session_form(&test_config(), user_id, payment_id, &items);
        let get = |k: &str| {
            form.iter()
                .find(|(key, _)| key == k)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("mode"), Some("payment"));
        assert_eq!(get("metadata[user_id]"), Some(user_id.to_string().as_str()));
        assert_eq!(
            get("metadata[payment_id]"),
            Some(payment_id.to_string().as_str())
        );
        assert_eq!(
            get("line_items[0][price_data][product_data][name]"),
            Some("Starter pack")
        );
        assert_eq!(get("line_items[0][price_data][unit_amount]"), Some("500"));
        assert_eq!(get("line_items[1][price_data][unit_amount]"), Some("2000"));
        assert_eq!(get("line_items[1][quantity]"), Some("1"));
    }
}
