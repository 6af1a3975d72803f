//! HTTP plumbing for the workspace API.

mod client;
pub mod endpoints;
mod navigator;
mod refresh;

pub use client::{ApiClient, ApiRequest};
pub use endpoints::CurrentUser;
pub use navigator::{Navigator, NoopNavigator};
