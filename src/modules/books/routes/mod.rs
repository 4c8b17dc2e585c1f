use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use bookshelf_http::{
    error::AppResult,
    extract::{Path, Payload, Query},
    response::Success,
};
use serde::Serialize;

use super::error::Action;
use super::models::{Book, BookFilter, BookPayload, BookQuery, BookSummary};
use super::service::BookService;
use crate::utils;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedBook {
    pub book_id: String,
}

#[derive(Debug, Serialize)]
pub struct BookList {
    pub books: Vec<BookSummary>,
}

#[derive(Debug, Serialize)]
pub struct BookDetail {
    pub book: Book,
}

/// HTTP routes for the Books module, relative to its mount point.
pub fn router(service: Arc<BookService>) -> Router {
    let prefix = utils::log_prefix("books");
    tracing::debug!(target: "bookshelf.routes", %prefix, "registering book routes");

    Router::new()
        .route("/", post(add_book).get(list_books))
        .route("/health", get(health_check))
        .route(
            "/{book_id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(service)
}

async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn add_book(
    State(service): State<Arc<BookService>>,
    Payload(payload): Payload<BookPayload>,
) -> AppResult<(StatusCode, Json<Success<AddedBook>>)> {
    let book_id = service
        .create(payload)
        .map_err(|err| err.into_app_error(Action::Add))?;

    Ok((
        StatusCode::CREATED,
        Json(Success::data(AddedBook { book_id }).with_message("Book added successfully")),
    ))
}

async fn list_books(
    State(service): State<Arc<BookService>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<Success<BookList>>> {
    let filter = BookFilter::from(pairs.into_iter().collect::<BookQuery>());
    let books = service
        .list(&filter)
        .map_err(|err| err.into_app_error(Action::Get))?;

    Ok(Json(Success::data(BookList { books })))
}

async fn get_book(
    State(service): State<Arc<BookService>>,
    Path(book_id): Path<String>,
) -> AppResult<Json<Success<BookDetail>>> {
    let book = service
        .get_by_id(&book_id)
        .map_err(|err| err.into_app_error(Action::Get))?;

    Ok(Json(Success::data(BookDetail { book })))
}

async fn update_book(
    State(service): State<Arc<BookService>>,
    Path(book_id): Path<String>,
    Payload(payload): Payload<BookPayload>,
) -> AppResult<Json<Success>> {
    service
        .update_by_id(&book_id, payload)
        .map_err(|err| err.into_app_error(Action::Update))?;

    Ok(Json(Success::message("Book updated successfully")))
}

async fn delete_book(
    State(service): State<Arc<BookService>>,
    Path(book_id): Path<String>,
) -> AppResult<Json<Success>> {
    service
        .delete_by_id(&book_id)
        .map_err(|err| err.into_app_error(Action::Delete))?;

    Ok(Json(Success::message("Book deleted successfully")))
}
