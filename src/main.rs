use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use frl_backend::config::AppConfig;
use frl_backend::create_pool;
use frl_backend::email::EmailService;
use frl_backend::handlers;
use frl_backend::payments::StripeClient;
use frl_backend::upload::UploadClient;
use migration::{Migrator, MigratorTrait};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env();
    let db = create_pool().await;
    if let Err(e) = Migrator::up(&db, None).await {
        tracing::error!("migration failed: {e}");
        return Err(std::io::Error::other(e));
    }
    let db_data = web::Data::new(db);

    let email = web::Data::new(EmailService::new(config.mail.clone()));
    let stripe = web::Data::new(StripeClient::new(config.stripe.clone()));
    let uploads = web::Data::new(UploadClient::new(config.upload.clone()));
    let config_data = web::Data::new(config);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_addr = format!("0.0.0.0:{port}");
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(config_data.clone())
            .app_data(email.clone())
            .app_data(stripe.clone())
            .app_data(uploads.clone())
            .service(web::scope("/api/v1").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
