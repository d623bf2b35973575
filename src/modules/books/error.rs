use axum::http::StatusCode;
use folio_kernel::ResourceResponse;
use thiserror::Error;

/// Outcomes of a books request other than success.
///
/// Every variant except the storage/encoding faults is a client-facing result
/// with a fixed message.
#[derive(Error, Debug)]
pub enum BookError {
    #[error("Invalid data")]
    InvalidData,

    #[error("ID required")]
    IdRequired,

    #[error("Book not found")]
    NotFound { id: i64 },

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl BookError {
    pub fn status(&self) -> StatusCode {
        match self {
            BookError::InvalidData | BookError::IdRequired => StatusCode::BAD_REQUEST,
            BookError::NotFound { .. } => StatusCode::NOT_FOUND,
            BookError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            BookError::Storage(_) | BookError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render client-facing errors as `{"error": ...}` responses; faults are
    /// handed back to the caller.
    pub fn into_resource_response(self) -> anyhow::Result<ResourceResponse> {
        match self {
            BookError::Storage(err) => Err(anyhow::Error::new(err).context("books storage fault")),
            BookError::Encode(err) => Err(anyhow::Error::new(err).context("books encoding fault")),
            client => Ok(ResourceResponse::error(client.status(), client.to_string())),
        }
    }
}
