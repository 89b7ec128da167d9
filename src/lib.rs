pub mod auth;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod handlers;
pub mod models;
pub mod payments;
pub mod upload;

pub use db::create_pool;
