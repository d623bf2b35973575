use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::BookError;

/// A persisted book row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// Storage-assigned identifier, never reused
    pub id: i64,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
}

/// Request body for creating or replacing a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookPayload {
    pub title: String,
    pub author: String,
}

impl BookPayload {
    /// Decode and shape-check a request body.
    ///
    /// The body must be a JSON object with `title` and `author` both present
    /// and scalar. Strings are kept as-is, numbers keep their JSON text and
    /// booleans become `"1"` or `""`. `null`, arrays and objects are rejected.
    /// Extra fields are ignored.
    pub fn from_body(body: &[u8]) -> Result<Self, BookError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| BookError::InvalidData)?;
        let object = value.as_object().ok_or(BookError::InvalidData)?;

        Ok(Self {
            title: scalar_text(object.get("title")).ok_or(BookError::InvalidData)?,
            author: scalar_text(object.get("author")).ok_or(BookError::InvalidData)?,
        })
    }

    pub fn into_book(self, id: i64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
        }
    }
}

fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
