//! Error types for the workbay client.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, API response, and input validation errors.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// The unified error type for workbay operations.
///
/// This error type covers all possible failure modes in the library,
/// with explicit variants to allow callers to handle specific cases.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (failed session refresh).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// API errors (non-success responses from the workspace backend).
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Input validation errors (invalid base URL, subdomain, request body).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The session refresh call itself failed. Every request waiting on
    /// that refresh (and the request that triggered it) receives a clone
    /// of this error; there is no further automatic retry.
    #[error("session refresh failed: {0}")]
    RefreshFailed(#[source] Arc<Error>),
}

/// A non-success response from the workspace API.
///
/// The backend reports errors as JSON bodies carrying a human-readable
/// `detail`, an optional machine-readable `code`, and an optional
/// `redirect` directive naming a path the client should navigate to.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Machine-readable error code (if present).
    pub code: Option<String>,
    /// Human-readable detail message from the server.
    pub detail: Option<String>,
    /// Path the server wants the client to navigate to (if present).
    pub redirect: Option<String>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref code) = self.code {
            write!(f, " [{}]", code)?;
        }
        if let Some(ref detail) = self.detail {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error.
    pub fn new(
        status: u16,
        code: Option<String>,
        detail: Option<String>,
        redirect: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            detail,
            redirect,
        }
    }

    /// Check whether this error signals an expired session.
    ///
    /// Only a 401 whose detail mentions the token counts; other 401
    /// causes (e.g. bad login credentials) must not trigger a refresh.
    pub fn is_session_expired(&self) -> bool {
        self.status == 401
            && self
                .detail
                .as_deref()
                .is_some_and(|d| d.to_ascii_lowercase().contains("token"))
    }

    /// Check whether this error signals a tenant access restriction
    /// (expired trial or overdue subscription payment).
    pub fn is_payment_required(&self) -> bool {
        self.status == 403 && self.code.as_deref() == Some("payment_required")
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid base URL format.
    #[error("invalid base URL '{value}': {reason}")]
    BaseUrl { value: String, reason: String },

    /// Invalid tenant subdomain format.
    #[error("invalid subdomain '{value}': {reason}")]
    Subdomain { value: String, reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
