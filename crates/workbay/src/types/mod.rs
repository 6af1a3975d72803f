//! Validated value types used across the client.

mod base_url;
mod subdomain;

pub use base_url::BaseUrl;
pub use subdomain::Subdomain;
