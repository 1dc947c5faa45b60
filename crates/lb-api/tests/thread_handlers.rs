use actix_web::dev::fn_service;
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use lb_api::{configure_routes, middleware, AppState};
use lb_store_json::JsonFileStore;
use serde_json::{json, Value};

async fn state() -> web::Data<AppState> {
    let path = std::env::temp_dir().join(format!("lb-api-{}.json", uuid::Uuid::new_v4()));
    let store = JsonFileStore::open(path).await.unwrap();
    web::Data::new(AppState {
        store: Box::new(store),
        title: "likeboard".into(),
    })
}

#[actix_web::test]
async fn test_create_list_and_vote_patch() {
    let app = test::init_service(App::new().app_data(state().await).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/threads")
        .set_json(json!({
            "id": 1700000000000i64, "content": "hello", "author": "Amy",
            "likes": 0, "dislikes": 0, "voters": [], "createdAt": "2023-11-14T22:13:20Z"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get().uri("/api/threads").to_request();
    let threads: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0]["likes"], 0);
    assert_eq!(threads[0]["dislikes"], 0);

    let req = test::TestRequest::patch()
        .uri("/api/threads/1700000000000")
        .set_json(json!({ "likes": 1, "voters": ["X"] }))
        .to_request();
    let patched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(patched["likes"], 1);
    assert_eq!(patched["voters"], json!(["X"]));
    assert_eq!(patched["content"], "hello");
    assert_eq!(patched["dislikes"], 0);
}

#[actix_web::test]
async fn test_server_accepts_any_patch() {
    let app = test::init_service(App::new().app_data(state().await).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/threads")
        .set_json(json!({ "id": 1, "content": "hi", "likes": 3 }))
        .to_request();
    test::call_service(&app, req).await;

    // Counters are trusted as sent, even when they go backwards.
    let req = test::TestRequest::patch()
        .uri("/api/threads/1")
        .set_json(json!({ "likes": 0 }))
        .to_request();
    let patched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(patched["likes"], 0);
}

#[actix_web::test]
async fn test_error_statuses() {
    let app = test::init_service(App::new().app_data(state().await).configure(configure_routes)).await;

    let req = test::TestRequest::patch()
        .uri("/api/threads/42")
        .set_json(json!({ "likes": 1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());

    let req = test::TestRequest::get().uri("/api/unknown").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/threads")
        .set_json(json!({ "id": 5, "content": "a" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    let req = test::TestRequest::post()
        .uri("/api/threads")
        .set_json(json!({ "id": 5, "content": "b" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/threads")
        .set_json(json!("just a string"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_get_and_delete_by_id() {
    let app = test::init_service(App::new().app_data(state().await).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/threads")
        .set_json(json!({ "content": "no id given" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::get().uri(&format!("/api/threads/{id}")).to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["content"], "no id given");

    let req = test::TestRequest::delete().uri(&format!("/api/threads/{id}")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri(&format!("/api/threads/{id}")).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_cors_allows_any_origin() {
    let app = test::init_service(
        App::new()
            .wrap(middleware::cors_policy())
            .app_data(state().await)
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/threads")
        .insert_header(("Origin", "http://example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("access-control-allow-origin"));
}

#[actix_web::test]
async fn test_index_page() {
    let app = test::init_service(
        App::new()
            .app_data(state().await)
            .configure(configure_routes)
            .route("/", web::get().to(lb_api::handlers::index))
            .default_service(fn_service(lb_api::handlers::spa_fallback)),
    )
    .await;

    let req = test::TestRequest::get().uri("/some/client/route").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("threadTemplate"));

    let req = test::TestRequest::get().uri("/").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}
