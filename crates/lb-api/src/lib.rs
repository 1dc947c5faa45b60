//! # lb-api
//!
//! The REST surface of the likeboard Record Store.

pub mod error;
pub mod handlers;
pub mod middleware;

use actix_web::web;

pub use error::ApiError;
pub use handlers::AppState;

/// Configures the JSON document routes under `/api`.
///
/// Any collection in the data file is reachable, `/api/threads` being the
/// one the page uses.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/{collection}", web::get().to(handlers::list_records))
            .route("/{collection}", web::post().to(handlers::create_record))
            .route("/{collection}/{id}", web::get().to(handlers::get_record))
            .route("/{collection}/{id}", web::patch().to(handlers::patch_record))
            .route("/{collection}/{id}", web::delete().to(handlers::delete_record)),
    );
}
