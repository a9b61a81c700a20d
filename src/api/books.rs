//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::BookPayload;
use crate::{
    error::AppResult,
    models::book::{Book, BookInput, MessageResponse},
    AppState,
};

/// List all books
#[utoipa::path(
    get,
    path = "/api/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<Book>),
        (status = 500, description = "Store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.list().await?;
    Ok(Json(books))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get_by_id(&id).await?;
    Ok(Json(book))
}

/// Add a book. Also served at `POST /api/add`.
#[utoipa::path(
    post,
    path = "/api/books",
    tag = "books",
    request_body(content = BookInput, description = "JSON or urlencoded form"),
    responses(
        (status = 201, description = "Book added", body = MessageResponse),
        (status = 400, description = "Unreadable body", body = crate::error::ErrorResponse),
        (status = 500, description = "Store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_book(
    State(state): State<AppState>,
    BookPayload(input): BookPayload,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let book = state.services.books.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::with_id("Book added successfully", book.id)),
    ))
}

/// Replace a book's title, author and year. Also served at `POST /api/edit/{id}`.
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    request_body(content = BookInput, description = "JSON or urlencoded form"),
    responses(
        (status = 200, description = "Book updated", body = MessageResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 500, description = "Store failure or malformed id", body = crate::error::ErrorResponse)
    )
)]
pub async fn edit_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    BookPayload(input): BookPayload,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.update(&id, input).await?;
    Ok(Json(MessageResponse::new("Book updated successfully")))
}

/// Delete a book. Deleting a missing book succeeds. Also served at `POST /api/delete/{id}`
/// and, for older clients, `GET /api/delete/{id}`.
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 500, description = "Store failure or malformed id", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.books.delete(&id).await?;
    Ok(Json(MessageResponse::new("Book deleted successfully")))
}
