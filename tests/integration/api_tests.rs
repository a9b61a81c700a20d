//! Router tests over the in-memory repository

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use book_library_server::{
    api::create_router, config::MongoConfig, repository::Repository, store::DataStore, AppConfig,
    AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn create_test_app() -> Router {
    create_router(AppState::with_repository(
        AppConfig::default(),
        Repository::in_memory(),
    ))
}

async fn create_disconnected_app() -> Router {
    let store = DataStore::new(&MongoConfig::default()).await.unwrap();
    create_router(AppState::new(AppConfig::default(), store))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn add_book(app: &Router, title: &str, author: &str, year: i32) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/add",
        Some(json!({ "title": title, "author": author, "year": year })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().expect("No book ID").to_string()
}

async fn list_books(app: &Router) -> Vec<Value> {
    let (status, body) = send(app, "GET", "/api/books", None).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().expect("Expected an array").clone()
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_book_lifecycle() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/add",
        Some(json!({ "title": "Dune", "author": "Herbert", "year": 1965 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Book added successfully");
    let id = body["id"].as_str().unwrap().to_string();

    let books = list_books(&app).await;
    assert_eq!(
        books,
        vec![json!({ "id": id, "title": "Dune", "author": "Herbert", "year": 1965 })]
    );

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/edit/{}", id),
        Some(json!({ "title": "Dune", "author": "F. Herbert", "year": 1965 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book updated successfully");

    let books = list_books(&app).await;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["author"], "F. Herbert");
    assert_eq!(books[0]["id"], id.as_str());

    let (status, body) = send(&app, "POST", &format!("/api/delete/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book deleted successfully");

    assert!(list_books(&app).await.is_empty());
}

#[tokio::test]
async fn test_rest_routes() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/books",
        Some(json!({ "title": "Emma", "author": "Austen", "year": 1815 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();
    let uri = format!("/api/books/{}", id);

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Emma");
    assert_eq!(body["year"], 1815);

    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({ "title": "Emma", "author": "Jane Austen", "year": 1815 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(body["author"], "Jane Austen");

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found");
}

#[tokio::test]
async fn test_update_changes_only_target_book() {
    let app = create_test_app();
    let dune = add_book(&app, "Dune", "Herbert", 1965).await;
    let emma = add_book(&app, "Emma", "Austen", 1815).await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/books/{}", dune),
        Some(json!({ "title": "Dune Messiah", "author": "Herbert", "year": 1969 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, "GET", &format!("/api/books/{}", emma), None).await;
    assert_eq!(
        body,
        json!({ "id": emma, "title": "Emma", "author": "Austen", "year": 1815 })
    );
    let (_, body) = send(&app, "GET", &format!("/api/books/{}", dune), None).await;
    assert_eq!(body["title"], "Dune Messiah");
    assert_eq!(body["year"], 1969);
}

#[tokio::test]
async fn test_delete_twice_is_not_an_error() {
    let app = create_test_app();
    let id = add_book(&app, "Dune", "Herbert", 1965).await;

    let (status, _) = send(&app, "DELETE", &format!("/api/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", &format!("/api/books/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_unknown_book_is_not_found() {
    let app = create_test_app();
    let id = bson::oid::ObjectId::new().to_hex();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/edit/{}", id),
        Some(json!({ "title": "Ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found");
    assert!(list_books(&app).await.is_empty());
}

#[tokio::test]
async fn test_malformed_id_is_operation_failure() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/edit/not-an-id",
        Some(json!({ "title": "Dune" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Updating book failed" }));

    let (status, body) = send(&app, "DELETE", "/api/books/not-an-id", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Deleting book failed" }));

    let (status, _) = send(&app, "GET", "/api/books/not-an-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dune_flow_with_get_delete() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/add",
        Some(json!({ "title": "Dune", "author": "Herbert", "year": 1965 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();

    let books = list_books(&app).await;
    assert!(books.contains(
        &json!({ "id": id, "title": "Dune", "author": "Herbert", "year": 1965 })
    ));

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/edit/{}", id),
        Some(json!({ "title": "Dune", "author": "F. Herbert", "year": 1965 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let books = list_books(&app).await;
    assert!(books.contains(
        &json!({ "id": id, "title": "Dune", "author": "F. Herbert", "year": 1965 })
    ));

    let (status, body) = send(&app, "GET", &format!("/api/delete/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Book deleted successfully");

    let books = list_books(&app).await;
    assert!(books.iter().all(|b| b["id"] != id.as_str()));
}

#[tokio::test]
async fn test_form_body_is_coerced() {
    let app = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/add")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("title=Dune&author=Herbert&year=1965"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let books = list_books(&app).await;
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["title"], "Dune");
    assert_eq!(books[0]["year"], 1965);
}

#[tokio::test]
async fn test_missing_fields_are_stored_as_null() {
    let app = create_test_app();

    let (status, _) = send(&app, "POST", "/api/add", Some(json!({ "title": "Untitled" }))).await;
    assert_eq!(status, StatusCode::CREATED);

    let books = list_books(&app).await;
    assert_eq!(books[0]["author"], Value::Null);
    assert_eq!(books[0]["year"], Value::Null);
}

#[tokio::test]
async fn test_empty_body_without_content_type_adds_empty_book() {
    let app = create_test_app();

    let (status, body) = send(&app, "POST", "/api/add", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();

    assert_eq!(
        list_books(&app).await,
        vec![json!({ "id": id, "title": null, "author": null, "year": null })]
    );
}

#[tokio::test]
async fn test_json_body_without_content_type_is_read() {
    let app = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/add")
        .body(Body::from(r#"{"title":"Emma","year":"1815"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let books = list_books(&app).await;
    assert_eq!(books[0]["title"], "Emma");
    assert_eq!(books[0]["year"], 1815);
}

#[tokio::test]
async fn test_unreadable_body_is_bad_request() {
    let app = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/add")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(list_books(&app).await.is_empty());
}

#[tokio::test]
async fn test_concurrent_adds_get_distinct_ids() {
    let app = create_test_app();

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move { add_book(&app, &format!("Book {}", i), "Anon", 2000).await })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);

    let mut listed: Vec<String> = list_books(&app)
        .await
        .iter()
        .map(|b| b["id"].as_str().unwrap().to_string())
        .collect();
    listed.sort();
    assert_eq!(listed, ids);
}

#[tokio::test]
async fn test_store_not_connected() {
    let app = create_disconnected_app().await;

    let (status, body) = send(&app, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "disconnected");

    let (status, body) = send(&app, "GET", "/api/books", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Fetching books failed" }));

    let (status, body) = send(&app, "POST", "/api/add", Some(json!({ "title": "Dune" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Adding book failed" }));
}

#[tokio::test]
async fn test_in_memory_app_is_ready() {
    let app = create_test_app();
    let (status, body) = send(&app, "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_cors_headers_present() {
    let app = create_test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/api/books")
        .header("origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}
