//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod completion;
pub mod health;
pub mod profiles;
pub mod scenarios;

// Re-export all handlers for use in router
pub use completion::*;
pub use health::*;
pub use profiles::*;
pub use scenarios::*;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::AppError;

/// Parse a JSON body leniently: an empty body is `{}`, content type is not checked
pub(crate) fn parse_json_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_str("{}");
    }
    serde_json::from_slice(body)
}

/// Like [`parse_json_body`], mapping a parse failure to 400
pub(crate) fn parse_request<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    parse_json_body(body).map_err(|e| AppError::bad_request(&format!("Invalid JSON body: {}", e)))
}
