//! Error types for the billing API client.
//!
//! # Design
//! `NotFound` and `UnprocessableEntity` get dedicated variants because callers
//! routinely branch on "the resource does not exist" and "the server rejected
//! my payload". Every other non-2xx response lands in `HttpError` with the raw
//! status code and body for debugging. `MalformedResponse` is the only error
//! the paginator adds on its own: a list response without a usable total count.

use thiserror::Error;

/// Result alias used by every fallible operation in this crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by the client, services and paginators.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404: the requested resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned 422: the payload failed remote validation.
    #[error("unprocessable entity: {message}")]
    UnprocessableEntity {
        message: String,
        /// Validation detail exactly as the server sent it.
        details: serde_json::Value,
    },

    /// The server returned a non-2xx status other than 404 or 422.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response (connection, DNS, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// A list response lacked the pagination metadata or had the wrong shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    #[error("no value for path parameter '{name}' in '{template}'")]
    UnresolvedPathParameter { name: String, template: String },

    #[error("invalid path template: {0}")]
    InvalidPathTemplate(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("base URL cannot carry a path: {0}")]
    InvalidBaseUrl(String),

    #[error("configuration error: {message}")]
    Config { message: String },
}
