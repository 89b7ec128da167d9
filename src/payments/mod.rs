pub mod stripe;
pub mod webhook;

pub use stripe::{CheckoutSession, StripeClient, StripeError};
