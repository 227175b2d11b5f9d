//! Coles `_next/data` API client
//!
//! Two JSON endpoints are used, both rooted at the data base URL built from
//! [`ApiConfig`](crate::config::ApiConfig):
//!
//! - `GET {base}/search/products.json?q={query}`
//! - `GET {base}/product/{slug}.json?slug={slug}`
//!
//! Responses are returned as untyped JSON. Nothing is retried.

pub mod client;
pub mod slug;

pub use client::ColesClient;
pub use slug::{build_slug, normalize_slug};

use thiserror::Error;

/// Errors raised by the API client
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required argument was empty; no request was made
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The request never produced a response (connect failure, timeout, ...)
    #[error("An error occurred while requesting {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-2xx status
    #[error("Error response {status} while requesting {url}")]
    HttpStatus { status: u16, url: String },

    /// A 2xx response whose body is not JSON
    #[error("Invalid JSON response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Client configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// URL of the failed request, when one was attempted
    pub fn url(&self) -> Option<&str> {
        match self {
            ApiError::Transport { url, .. }
            | ApiError::HttpStatus { url, .. }
            | ApiError::Decode { url, .. } => Some(url),
            ApiError::InvalidInput { .. } | ApiError::Config(_) => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<crate::config::ConfigError> for ApiError {
    fn from(err: crate::config::ConfigError) -> Self {
        ApiError::Config(err.to_string())
    }
}
