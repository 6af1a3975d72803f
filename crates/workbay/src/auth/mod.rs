//! Authentication types.
//!
//! The session credential itself is a cookie managed by the HTTP
//! transport; this module only holds the login credentials used to
//! establish a session.

mod credentials;

pub use credentials::Credentials;
