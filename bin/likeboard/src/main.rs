//! # likeboard Binary
//!
//! The entry point that wires the JSON-file store, the API and the static page together.

mod config;

use actix_files::Files;
use actix_web::dev::fn_service;
use actix_web::{web, App, HttpServer};
use lb_api::handlers::{self, AppState};
use lb_api::{configure_routes, middleware};
use lb_store_json::JsonFileStore;

use crate::config::Config;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // 1. Open the Record Store
    let store = JsonFileStore::open(&config.data_file).await?;

    // 2. Wrap in AppState (dynamic dispatch keeps the API store-agnostic)
    let state = web::Data::new(AppState {
        store: Box::new(store),
        title: config.title.clone(),
    });

    if !config.public_dir.is_dir() {
        log::warn!("public dir {} not found; only the API and page shell will be served", config.public_dir.display());
    }

    let public_dir = config.public_dir.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::cors_policy())
            .wrap(middleware::standard_middleware())
            .app_data(state.clone())
            .configure(configure_routes)
            .route("/", web::get().to(handlers::index))
            .service(Files::new("/", &public_dir).default_handler(fn_service(handlers::spa_fallback)))
    })
    .bind((config.host.as_str(), config.port))?;

    log::info!("Server running on port {}", config.port);
    server.run().await?;
    Ok(())
}
