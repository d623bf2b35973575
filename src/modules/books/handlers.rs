//! Books operations over an injected [`BookRepository`].

use axum::http::StatusCode;
use folio_kernel::{ResourceRequest, ResourceResponse};
use serde_json::json;

use super::error::BookError;
use super::models::BookPayload;
use super::repo::BookRepository;
use super::routes::BookRoute;

pub type HandlerResult = Result<ResourceResponse, BookError>;

/// Resolve the request and run the matching operation.
pub async fn dispatch<R>(repo: &R, request: &ResourceRequest) -> HandlerResult
where
    R: BookRepository + ?Sized,
{
    match BookRoute::resolve(request)? {
        BookRoute::List => list_books(repo).await,
        BookRoute::Get(id) => get_book(repo, id).await,
        BookRoute::Create => create_book(repo, &request.body).await,
        BookRoute::Update(id) => update_book(repo, id, &request.body).await,
        BookRoute::Delete(id) => delete_book(repo, id).await,
    }
}

pub async fn list_books<R: BookRepository + ?Sized>(repo: &R) -> HandlerResult {
    let books = repo.list().await?;
    tracing::debug!(module = "books", count = books.len(), "listed books");
    Ok(ResourceResponse::json(StatusCode::OK, &books)?)
}

pub async fn get_book<R: BookRepository + ?Sized>(repo: &R, id: i64) -> HandlerResult {
    let book = repo.get(id).await?.ok_or(BookError::NotFound { id })?;
    Ok(ResourceResponse::json(StatusCode::OK, &book)?)
}

pub async fn create_book<R: BookRepository + ?Sized>(repo: &R, body: &[u8]) -> HandlerResult {
    let payload = BookPayload::from_body(body)?;
    let id = repo.insert(&payload).await?;
    tracing::info!(module = "books", book_id = id, "book created");
    Ok(ResourceResponse::json(
        StatusCode::CREATED,
        &payload.into_book(id),
    )?)
}

pub async fn update_book<R: BookRepository + ?Sized>(
    repo: &R,
    id: i64,
    body: &[u8],
) -> HandlerResult {
    let payload = BookPayload::from_body(body)?;
    if !repo.update(id, &payload).await? {
        return Err(BookError::NotFound { id });
    }
    tracing::info!(module = "books", book_id = id, "book updated");
    Ok(ResourceResponse::json(StatusCode::OK, &payload.into_book(id))?)
}

pub async fn delete_book<R: BookRepository + ?Sized>(repo: &R, id: i64) -> HandlerResult {
    if !repo.delete(id).await? {
        return Err(BookError::NotFound { id });
    }
    tracing::info!(module = "books", book_id = id, "book deleted");
    Ok(ResourceResponse::new(
        StatusCode::OK,
        json!({ "status": "deleted" }),
    ))
}
