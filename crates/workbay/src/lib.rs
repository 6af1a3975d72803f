//! workbay - Client library for a multi-tenant workspace API
//!
//! This library provides a session-aware HTTP client for tenant-scoped
//! workspace backends. All requests flow through an [`ApiClient`], which
//! attaches the session cookie, detects expired sessions, and refreshes
//! them transparently — concurrent requests share a single refresh call.
//!
//! # Example
//!
//! ```no_run
//! use workbay::{ApiClient, BaseUrl, Credentials, Subdomain};
//!
//! # async fn example() -> Result<(), workbay::Error> {
//! let subdomain = Subdomain::new("acme")?;
//! let base = BaseUrl::for_tenant("https", &subdomain, "workbay.app")?;
//! let client = ApiClient::new(base);
//!
//! client.login(&Credentials::new("alice@acme.test", "app-password")).await?;
//!
//! let user = client.me().await?;
//! println!("logged in as {} ({:?})", user.email, user.role);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod error;
pub mod types;

// Re-export primary types at crate root for convenience
pub use api::{ApiClient, ApiRequest, CurrentUser, Navigator, NoopNavigator};
pub use auth::Credentials;
pub use error::Error;
pub use types::{BaseUrl, Subdomain};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
