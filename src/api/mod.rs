//! HTTP surface. Every handler takes the shared [`AppState`] and returns
//! `Result<HttpResponse, AppError>` so failures render as `{"error": ...}`.
//!
//! [`AppState`]: crate::state::AppState

use actix_web::{
    error::{JsonPayloadError, QueryPayloadError},
    web, HttpRequest,
};
use tracing::debug;

use crate::{error::AppError, messages};

pub mod admin;
pub mod auth;
pub mod chat;
pub mod favorites;
pub mod products;
pub mod public;
pub mod reviews;
pub mod users;

// Malformed or missing JSON bodies are reported like missing fields
fn json_error(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("[API] Rejected JSON body on {}: {}", req.path(), err);
    AppError::bad_request(messages::MISSING_FIELDS).into()
}

fn query_error(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("[API] Rejected query string on {}: {}", req.path(), err);
    AppError::bad_request(messages::INVALID_QUERY).into()
}

// Trimmed, non-empty value of an optional text field
pub(crate) fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Register every route on an actix `App` or scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        // Auth and current user
        .route("/users", web::post().to(auth::register))
        .route("/login", web::post().to(auth::login))
        .route("/user/me", web::get().to(users::me))
        .route("/user/update", web::put().to(users::update))
        .route("/user/change-password", web::post().to(users::change_password))
        .route("/user/delete-account", web::delete().to(users::delete_account))
        // Catalog
        .route("/products", web::get().to(products::list))
        .route("/products/{id}", web::get().to(products::get))
        .route("/products/{id}/reviews", web::get().to(reviews::list))
        .route("/products/{id}/reviews", web::post().to(reviews::create))
        .route(
            "/products/{id}/reviews/{review_id}",
            web::delete().to(reviews::delete),
        )
        .route("/products/{id}/rating", web::get().to(reviews::summary))
        .route("/products/{id}/rating", web::post().to(reviews::rate))
        // Favorites
        .route("/favorites", web::get().to(favorites::list))
        .route("/favorites", web::post().to(favorites::add))
        .route("/favorites/{product_id}", web::delete().to(favorites::remove))
        // Public content
        .route("/tips", web::get().to(public::tips))
        .route("/faqs", web::get().to(public::faqs))
        .route("/social-media", web::get().to(public::social_media))
        // Chatbot
        .route("/chat", web::post().to(chat::chat))
        // Admin dashboard
        .service(
            web::scope("/admin")
                .route("/stats", web::get().to(admin::stats))
                .route("/user-growth", web::get().to(admin::user_growth))
                .route("/product-ratings", web::get().to(admin::product_ratings))
                .route("/users", web::get().to(admin::list_users))
                .route("/users", web::post().to(admin::create_admin))
                .route("/users/{id}", web::delete().to(admin::delete_user))
                .route("/users/{id}/status", web::put().to(admin::set_user_status))
                .route("/products", web::post().to(products::create))
                .route("/products/{id}", web::put().to(products::update))
                .route("/products/{id}", web::delete().to(products::delete))
                .route("/tips", web::post().to(admin::create_tip))
                .route("/tips/{id}", web::put().to(admin::update_tip))
                .route("/tips/{id}", web::delete().to(admin::delete_tip))
                .route("/faqs", web::post().to(admin::create_faq))
                .route("/faqs/{id}", web::put().to(admin::update_faq))
                .route("/faqs/{id}", web::delete().to(admin::delete_faq))
                .route("/social-media", web::post().to(admin::create_social_media))
                .route("/social-media/{id}", web::put().to(admin::update_social_media))
                .route(
                    "/social-media/{id}",
                    web::delete().to(admin::delete_social_media),
                ),
        );
}
