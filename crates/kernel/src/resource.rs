//! Transport-neutral request/response types exchanged between the HTTP layer
//! and resource modules.

use axum::{
    body::Bytes,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// A request addressed to a single resource.
///
/// The resource name itself has already been consumed by the router; `params`
/// holds the remaining path segments in order.
#[derive(Debug, Clone)]
pub struct ResourceRequest {
    pub method: Method,
    pub params: Vec<String>,
    pub body: Bytes,
}

impl ResourceRequest {
    /// Split a raw request path into its resource name and a request carrying
    /// the remaining segments.
    ///
    /// Leading and trailing `/` are trimmed before splitting, so `/books/` and
    /// `books` both name the `books` resource. An empty path yields an empty
    /// resource name. Interior empty segments (`/books//1`) are kept.
    ///
    /// Each segment is percent-decoded after splitting, so `%2F` never acts as
    /// a separator. Invalid UTF-8 is replaced rather than rejected.
    pub fn from_path(method: Method, path: &str, body: Bytes) -> (String, Self) {
        let trimmed = path.trim_matches('/');
        let mut segments = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').map(decode_segment).collect::<Vec<_>>()
        };

        let resource = if segments.is_empty() {
            String::new()
        } else {
            segments.remove(0)
        };

        (
            resource,
            Self {
                method,
                params: segments,
                body,
            },
        )
    }

    /// First path parameter parsed with [`parse_int`], if one was supplied.
    pub fn id_param(&self) -> Option<i64> {
        self.params.first().map(|segment| parse_int(segment))
    }
}

fn decode_segment(segment: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(segment.as_bytes())).into_owned()
}

/// Parse a path segment as an integer identifier.
///
/// Accepts optional leading whitespace and sign followed by the longest run of
/// ASCII digits; anything after the digits is ignored. A segment without
/// leading digits parses to `0`, and values outside the `i64` range saturate.
/// This never fails, so `abc` and `0` address the same row.
pub fn parse_int(segment: &str) -> i64 {
    let trimmed = segment.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |value, byte| {
            let digit = i64::from(byte - b'0');
            if negative {
                value.saturating_mul(10).saturating_sub(digit)
            } else {
                value.saturating_mul(10).saturating_add(digit)
            }
        })
}

/// Status code plus JSON body produced by a resource module.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl ResourceResponse {
    pub fn new(status: StatusCode, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    /// Serialize `value` as the body of a response with the given status.
    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> serde_json::Result<Self> {
        Ok(Self::new(status, serde_json::to_value(value)?))
    }

    /// Error response with the single-field `{"error": message}` shape.
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self::new(status, json!({ "error": message.into() }))
    }
}

impl IntoResponse for ResourceResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
