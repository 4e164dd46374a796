//! Error types for REST calls.

use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Result alias used by every service call.
pub type Result<T> = std::result::Result<T, HttpError>;

/// Errors that can occur while talking to the REST backend.
#[derive(Error, Debug)]
pub enum HttpError {
    /// Base URI is not an absolute http(s) URI.
    #[error("Invalid base URI: {0}")]
    InvalidBaseUri(String),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response.
    #[error("{method} {url} failed")]
    Transport {
        /// Request method.
        method: Method,
        /// Request URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{method} {url} returned {status}: {body}")]
    Status {
        /// Request method.
        method: Method,
        /// Request URL.
        url: String,
        /// Response status.
        status: StatusCode,
        /// Response body, as text.
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response of {method} {url}")]
    Decode {
        /// Request method.
        method: Method,
        /// Request URL.
        url: String,
        /// Underlying decode error.
        #[source]
        source: reqwest::Error,
    },

    /// An entity that must already exist server-side carries no id.
    #[error("{0} has no id")]
    MissingId(&'static str),
}
