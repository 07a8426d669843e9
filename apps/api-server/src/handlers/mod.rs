//! HTTP handlers and route configuration.

mod comments;
mod health;
mod posts;

use actix_web::web;

use crate::middleware::error::{json_error_handler, query_error_handler};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/posts")
                        .route("", web::post().to(posts::create_post))
                        .route("", web::get().to(posts::list_posts))
                        .route("/{id}", web::get().to(posts::get_post))
                        .route("/{id}/comments", web::get().to(comments::list_comments))
                        .route(
                            "/{id}/comments/pages",
                            web::get().to(comments::count_comment_pages),
                        ),
                )
                .service(
                    web::scope("/comments")
                        .route("", web::post().to(comments::create_comment))
                        .route("/{id}", web::get().to(comments::get_comment))
                        .route("/{id}/replies", web::get().to(comments::get_replies)),
                ),
        );
}
