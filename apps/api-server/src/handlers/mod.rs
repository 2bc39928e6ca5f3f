//! HTTP handlers and route configuration.

#[cfg(feature = "admin")]
mod admin;
mod blog;
mod health;
mod render;

use actix_web::{HttpResponse, web};
use blog_shared::ErrorResponse;

use crate::middleware::error::public_path_error;
use crate::observability::RequestId;
#[cfg(feature = "admin")]
use crate::middleware::error::bad_input;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health::health_check))
        // Public read paths
        .service(
            web::scope("/blog")
                .app_data(web::PathConfig::default().error_handler(public_path_error))
                .route("", web::get().to(blog::post_list))
                .route("/", web::get().to(blog::post_list))
                .service(
                    web::resource([
                        "/{year}/{month}/{day}/{slug}",
                        "/{year}/{month}/{day}/{slug}/",
                    ])
                    .route(web::get().to(blog::post_detail)),
                ),
        );

    #[cfg(feature = "admin")]
    cfg.service(admin_scope());

    cfg.default_service(web::to(not_found));
}

/// Content management routes. Access control is left to the deployment.
#[cfg(feature = "admin")]
fn admin_scope() -> actix_web::Scope {
    web::scope("/api/admin")
        .app_data(web::QueryConfig::default().error_handler(|err, _| bad_input(err)))
        .app_data(web::JsonConfig::default().error_handler(|err, _| bad_input(err)))
        .service(
            web::resource("/posts")
                .route(web::get().to(admin::list_posts))
                .route(web::post().to(admin::create_post)),
        )
        // Must precede `/posts/{id}`.
        .route("/posts/dates", web::get().to(admin::date_hierarchy))
        .service(
            web::resource("/posts/{id}")
                .route(web::get().to(admin::get_post))
                .route(web::patch().to(admin::update_post))
                .route(web::delete().to(admin::delete_post)),
        )
        .route("/posts/{id}/status", web::patch().to(admin::set_status))
        .route("/slug", web::get().to(admin::suggest_slug))
        .service(
            web::resource("/users")
                .route(web::get().to(admin::lookup_users))
                .route(web::post().to(admin::create_user)),
        )
        .route("/users/{id}", web::delete().to(admin::delete_user))
}

async fn not_found(request_id: RequestId) -> HttpResponse {
    HttpResponse::NotFound().json(
        ErrorResponse::not_found("No route matches the request")
            .with_request_id(request_id.as_str()),
    )
}
