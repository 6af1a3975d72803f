//! Navigation side effects requested by the server.
//!
//! Some error responses carry a directive that the client should perform
//! a full navigation (tenant payment restriction, explicit `redirect`
//! field). The embedding application supplies the [`Navigator`] that
//! executes those directives.

use tracing::warn;

/// Collaborator that performs a full navigation to a server-indicated
/// location.
pub trait Navigator: Send + Sync {
    /// Navigate the embedding application to `location`.
    fn navigate(&self, location: &str);
}

/// Default navigator that only logs the ignored directive.
#[derive(Debug, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, location: &str) {
        warn!(location, "redirect directive ignored: no navigator installed");
    }
}
