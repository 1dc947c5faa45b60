//! # lb-api Handlers
//!
//! Thin HTTP layer over a `RecordStore`. The handlers are collection-agnostic:
//! `/api/threads` is simply the collection the page uses. No vote rules are
//! checked here; whatever the client sends is stored.

use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{web, HttpResponse};
use askama::Template;
use lb_core::traits::RecordStore;
use lb_ui::IndexTemplate;
use serde_json::Value;

use crate::error::ApiError;

/// Collection the page script reads and writes.
pub const THREADS_API: &str = "/api/threads";

/// State shared across all Actix-web workers.
pub struct AppState {
    pub store: Box<dyn RecordStore>,
    pub title: String,
}

/// `GET /api/{collection}`
pub async fn list_records(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let collection = path.into_inner();
    let docs = data.store.list(&collection).await?;
    Ok(HttpResponse::Ok().json(docs))
}

/// `GET /api/{collection}/{id}`
pub async fn get_record(
    data: web::Data<AppState>,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse, ApiError> {
    let (collection, id) = path.into_inner();
    let doc = data.store.get(&collection, id).await?;
    Ok(HttpResponse::Ok().json(doc))
}

/// `POST /api/{collection}`
pub async fn create_record(
    data: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let collection = path.into_inner();
    let doc = data.store.create(&collection, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(doc))
}

/// `PATCH /api/{collection}/{id}`: shallow merge, last write wins.
pub async fn patch_record(
    data: web::Data<AppState>,
    path: web::Path<(String, i64)>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let (collection, id) = path.into_inner();
    let doc = data.store.patch(&collection, id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(doc))
}

/// `DELETE /api/{collection}/{id}`
pub async fn delete_record(
    data: web::Data<AppState>,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse, ApiError> {
    let (collection, id) = path.into_inner();
    data.store.delete(&collection, id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({})))
}

/// Renders the page shell. Served for every path that is neither API nor a static file.
pub fn render_index(state: &AppState) -> Result<HttpResponse, ApiError> {
    let html = IndexTemplate {
        title: &state.title,
        api_base: THREADS_API,
    }
    .render()?;

    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}

pub async fn index(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    render_index(&data)
}

/// Default handler for the static file service: unknown paths get the page shell.
pub async fn spa_fallback(req: ServiceRequest) -> Result<ServiceResponse, actix_web::Error> {
    let (req, _) = req.into_parts();
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("app state missing"))?;
    let res = render_index(&state)?;
    Ok(ServiceResponse::new(req, res))
}
