//! Tenant subdomain type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A validated tenant subdomain.
///
/// Each tenant is addressed via a distinct subdomain of the configured
/// root domain (e.g. `acme` in `acme.workbay.app`). The value must be a
/// valid DNS label: lowercase alphanumeric with interior hyphens, at
/// most 63 characters.
///
/// # Example
///
/// ```
/// use workbay::Subdomain;
///
/// let subdomain = Subdomain::new("acme").unwrap();
/// assert_eq!(subdomain.as_str(), "acme");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subdomain(String);

impl Subdomain {
    /// Create a new subdomain from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid DNS label.
    pub fn new(s: impl Into<String>) -> Result<Self, Error> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Extract the tenant subdomain from a request host.
    ///
    /// Returns `None` for the bare root domain, the `www` alias, hosts
    /// outside the root domain, and anything that is not a single label
    /// (nested subdomains are not tenant addresses).
    pub fn from_host(host: &str, root_domain: &str) -> Option<Self> {
        // Ignore any port component
        let host = host.split(':').next().unwrap_or(host);

        let label = host.strip_suffix(root_domain)?.strip_suffix('.')?;
        if label == "www" {
            return None;
        }

        Self::new(label).ok()
    }

    /// Returns the subdomain string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        if s.is_empty() {
            return Err(InvalidInputError::Subdomain {
                value: s.to_string(),
                reason: "must be non-empty".to_string(),
            }
            .into());
        }

        if s.len() > 63 {
            return Err(InvalidInputError::Subdomain {
                value: s.to_string(),
                reason: "must be at most 63 characters".to_string(),
            }
            .into());
        }

        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(InvalidInputError::Subdomain {
                value: s.to_string(),
                reason: "must contain only lowercase letters, digits, and hyphens".to_string(),
            }
            .into());
        }

        if s.starts_with('-') || s.ends_with('-') {
            return Err(InvalidInputError::Subdomain {
                value: s.to_string(),
                reason: "must not start or end with a hyphen".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

impl fmt::Display for Subdomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Subdomain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Subdomain {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Subdomain> for String {
    fn from(subdomain: Subdomain) -> Self {
        subdomain.0
    }
}

impl AsRef<str> for Subdomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
