//! API endpoint definitions and request/response types.

use serde::{Deserialize, Serialize};

// ============================================================================
// Endpoint Paths
// ============================================================================

/// POST: authenticate and establish a session (sets the session cookies).
pub const OBTAIN_TOKEN: &str = "api/token/";

/// POST: renew the session cookie. Takes no body; success is signalled
/// solely via the response status.
pub const REFRESH_TOKEN: &str = "api/token/refresh/";

/// POST: end the session server-side.
pub const LOGOUT: &str = "api/logout/";

/// GET: the currently authenticated user.
pub const ME: &str = "api/me/";

/// Location the client navigates to when the tenant's trial or
/// subscription has lapsed.
pub const PAYMENT_REQUIRED_PATH: &str = "/payment-required";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for obtaining a session.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// The currently authenticated user, as returned by `api/me/`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Error response format used by the workspace backend.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<String>,
    pub code: Option<String>,
    pub redirect: Option<String>,
}
