pub mod auth;
pub mod categories;
pub mod checkout;
pub mod jobs;
pub mod points;
pub mod users;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth ──
    cfg.route("/register", web::post().to(auth::register));
    cfg.route("/login", web::post().to(auth::login));
    cfg.route("/email/confirm/{token}", web::get().to(auth::confirm_email));
    cfg.route("/password/forgot", web::post().to(auth::forgot_password));
    cfg.route(
        "/password/reset/{token}",
        web::put().to(auth::reset_password),
    );
    cfg.route("/logout", web::get().to(auth::logout));

    // ── Own account ──
    cfg.route("/profile", web::get().to(users::get_profile));
    cfg.route("/profile/update", web::put().to(users::update_profile));
    cfg.route("/password/change", web::put().to(users::change_password));
    cfg.route("/users/delete", web::delete().to(users::delete_my_account));

    // ── Admin: user management ──
    cfg.service(
        web::resource("/admin/users").route(web::get().to(users::get_all_users)),
    );
    cfg.route("/admin/users/ban/{id}", web::put().to(users::ban_user));
    cfg.service(
        web::resource("/admin/users/{id}")
            .route(web::get().to(users::get_user))
            .route(web::delete().to(users::delete_user)),
    );

    // ── Categories ──
    cfg.route("/categories", web::get().to(categories::get_categories));
    cfg.route("/categories/{id}", web::get().to(categories::get_category));
    cfg.route(
        "/admin/categories/create",
        web::post().to(categories::create_category),
    );
    cfg.service(
        web::resource("/admin/categories/{id}")
            .route(web::put().to(categories::update_category))
            .route(web::delete().to(categories::delete_category)),
    );

    // ── Jobs & offers (fixed segments before `{id}` so they match first) ──
    cfg.route("/jobs", web::get().to(jobs::get_jobs));
    cfg.route("/jobs/create", web::post().to(jobs::create_job));
    cfg.route("/jobs/offers", web::get().to(jobs::my_offers));
    cfg.route("/jobs/offer/{id}", web::post().to(jobs::offer_job));
    cfg.route(
        "/jobs/offer/cancel/{id}",
        web::delete().to(jobs::cancel_offer),
    );
    cfg.route(
        "/jobs/{id}/freelancer",
        web::post().to(jobs::select_freelancer),
    );
    cfg.route("/jobs/{id}/details", web::get().to(jobs::get_job_details));
    cfg.route("/jobs/{id}/complete", web::post().to(jobs::complete_job));
    cfg.route("/jobs/{id}/cancel", web::post().to(jobs::cancel_job));
    cfg.service(
        web::resource("/jobs/{id}")
            .route(web::get().to(jobs::get_job))
            .route(web::delete().to(jobs::delete_job)),
    );

    // ── Point catalog ──
    cfg.route("/points", web::get().to(points::get_points));
    cfg.route("/points/{id}", web::get().to(points::get_point));
    cfg.route("/admin/points/create", web::post().to(points::create_point));
    cfg.service(
        web::resource("/admin/points/{id}")
            .route(web::put().to(points::update_point))
            .route(web::delete().to(points::delete_point)),
    );

    // ── Checkout ──
    cfg.route("/checkout", web::post().to(checkout::create_session));
    cfg.route("/checkout/webhook", web::post().to(checkout::webhook));
    cfg.route("/checkout/success", web::get().to(checkout::success));
    cfg.route("/checkout/cancel", web::get().to(checkout::cancel));
}
