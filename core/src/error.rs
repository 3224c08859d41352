//! Error types for the shop API client.
//!
//! # Design
//! `Unauthorized` gets a dedicated variant because the front-end branches on
//! it: a 401 at login means bad credentials, a 401 on a cart or order call
//! means the user must log in first. All other unexpected statuses land in
//! `Http` with the raw status code and body for debugging.

use std::fmt;

/// Errors returned by `ShopClient` build and parse methods.
#[derive(Debug)]
pub enum ApiError {
    /// The server returned 401 — bad credentials or missing/expired token.
    Unauthorized,

    /// The server returned an unexpected status other than 401.
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    Serialization(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "unauthorized"),
            ApiError::Http { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::Deserialization(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::Serialization(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
