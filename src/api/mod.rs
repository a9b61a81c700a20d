//! API handlers for the book library REST endpoints

pub mod books;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderValue},
    routing::{get, post},
    Form, Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::CorsConfig, error::AppError, models::book::BookInput, AppState};

/// Book fields from a JSON or urlencoded form body.
///
/// A request without a content type is read as JSON, or as an empty book
/// when the body is empty.
pub struct BookPayload(pub BookInput);

#[async_trait]
impl<S> FromRequest<S> for BookPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let Some(content_type) = content_type else {
            // No content type: an empty body is a book with no fields
            let body = Bytes::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            if body.is_empty() {
                return Ok(BookPayload(BookInput::default()));
            }
            let input = serde_json::from_slice(&body)
                .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))?;
            return Ok(BookPayload(input));
        };

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(input) = Form::<BookInput>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(BookPayload(input))
        } else {
            let Json(input) = Json::<BookInput>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(BookPayload(input))
        }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    let api = Router::new()
        .route("/books", get(books::list_books).post(books::add_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::edit_book)
                .delete(books::delete_book),
        )
        // Form-style aliases; GET on delete is kept for older clients
        .route("/add", post(books::add_book))
        .route("/edit/:id", post(books::edit_book))
        .route(
            "/delete/:id",
            post(books::delete_book).get(books::delete_book),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api", api)
        .with_state(state)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allowed_origins.is_empty() || config.allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}
