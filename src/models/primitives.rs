//! Primitive types and newtypes for type-safe API interactions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A decoded record from a listing endpoint.
///
/// Records are passed through untouched; use
/// [`PaginatedStream<T>`](crate::client::PaginatedStream) with your own
/// `T: DeserializeOwned` to get typed values instead.
pub type Record = serde_json::Value;

/// A strongly-typed Dotypos cloud identifier.
///
/// Every listing URL and the signin request are scoped to one cloud.
///
/// # Example
///
/// ```
/// use dotypos_rs::CloudId;
///
/// let cloud = CloudId::new("336474017");
/// assert_eq!(cloud.as_str(), "336474017");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CloudId(String);

impl CloudId {
    /// Create a new cloud id from a string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the cloud id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CloudId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CloudId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for CloudId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CloudId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u64> for CloudId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloud_id() {
        let cloud = CloudId::new("336474017");
        assert_eq!(cloud.as_str(), "336474017");
        assert_eq!(cloud.to_string(), "336474017");
    }

    #[test]
    fn test_cloud_id_conversions() {
        let from_str: CloudId = "42".into();
        let from_int: CloudId = 42u64.into();
        assert_eq!(from_str, from_int);
    }

    #[test]
    fn test_cloud_id_serializes_transparently() {
        let json = serde_json::to_string(&CloudId::new("7")).unwrap();
        assert_eq!(json, "\"7\"");
    }
}
