//! Case-insensitive project identity.
//!
//! Projects are identified by name, and names compare without regard to
//! case (`Core`, `core` and `CORE` are one project). [`ProjectKey`] keeps the
//! spelling it was created with for display, while equality, hashing and
//! ordering all go through one folded form. Every identity comparison in the
//! engine goes through this type.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A project identity key.
///
/// Ordering is by folded name, so sets of keys iterate in a stable,
/// case-insensitive alphabetical order.
#[derive(Clone)]
pub struct ProjectKey {
    display: String,
    folded: String,
}

impl ProjectKey {
    /// Create a key from a project name.
    pub fn new(name: impl Into<String>) -> Self {
        let display = name.into();
        let folded = fold(&display);
        Self { display, folded }
    }

    /// The name as originally spelled.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// The folded form used for comparisons.
    #[must_use]
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Returns `true` if `name` identifies the same project as this key.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.folded == fold(name)
    }
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}

impl PartialEq for ProjectKey {
    fn eq(&self, other: &Self) -> bool {
        self.folded == other.folded
    }
}

impl Eq for ProjectKey {}

impl Hash for ProjectKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded.hash(state);
    }
}

impl PartialOrd for ProjectKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProjectKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded.cmp(&other.folded)
    }
}

impl fmt::Debug for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProjectKey({:?})", self.display)
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl From<&str> for ProjectKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ProjectKey {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl Serialize for ProjectKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.display)
    }
}

impl<'de> Deserialize<'de> for ProjectKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}
