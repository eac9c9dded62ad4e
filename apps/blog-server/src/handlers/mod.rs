//! HTTP handlers and route configuration.

mod fallback;
mod health;
mod posts;

use actix_web::{Resource, web};

use crate::router::RouteName;

/// Largest accepted post form body. Post bodies have no length limit of
/// their own, so this sits well above actix's 16 KiB default.
pub const FORM_LIMIT: usize = 2 * 1024 * 1024;

/// A resource for a named route from the route table.
fn named(route: RouteName) -> Resource {
    web::resource(route.pattern()).name(route.as_str())
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().limit(FORM_LIMIT))
        .route("/health", web::get().to(health::health_check))
        .service(named(RouteName::Home).route(web::get().to(posts::list)))
        .service(
            named(RouteName::PostNew)
                .route(web::get().to(posts::new_form))
                .route(web::post().to(posts::create)),
        )
        .service(named(RouteName::PostDetail).route(web::get().to(posts::detail)))
        .service(
            named(RouteName::PostEdit)
                .route(web::get().to(posts::edit_form))
                .route(web::post().to(posts::update)),
        )
        .service(
            named(RouteName::PostDelete)
                .route(web::get().to(posts::delete_form))
                .route(web::post().to(posts::delete)),
        )
        .default_service(web::to(fallback::not_found));
}
