//! Country and player identifiers.
//!
//! Both are name-based: the game identifies countries and players by their
//! display names, which are unique within a state. The newtypes keep the two
//! namespaces apart at compile time and serialize as plain strings.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Unique country name.
///
/// Ordered so that countries can live in `im::OrdMap`/`OrdSet`, which keeps
/// move generation (and therefore seeded searches) deterministic.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryId(pub String);

impl CountryId {
    /// Create a new country ID.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The country name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CountryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CountryId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl Borrow<str> for CountryId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Unique player name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The player name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
