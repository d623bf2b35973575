//! Method and path-parameter resolution for the `books` resource.

use axum::http::Method;
use folio_kernel::ResourceRequest;

use super::error::BookError;

/// The operation a books request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookRoute {
    List,
    Get(i64),
    Create,
    Update(i64),
    Delete(i64),
}

impl BookRoute {
    /// Resolve a request to an operation.
    ///
    /// Only the first path parameter is read, through
    /// [`folio_kernel::parse_int`], so `/books/abc` addresses id `0`.
    /// `POST` ignores any parameters.
    pub fn resolve(request: &ResourceRequest) -> Result<Self, BookError> {
        let id = request.id_param();

        match request.method {
            Method::GET => Ok(id.map_or(BookRoute::List, BookRoute::Get)),
            Method::POST => Ok(BookRoute::Create),
            Method::PUT => id.map(BookRoute::Update).ok_or(BookError::IdRequired),
            Method::DELETE => id.map(BookRoute::Delete).ok_or(BookError::IdRequired),
            _ => Err(BookError::MethodNotAllowed),
        }
    }
}
