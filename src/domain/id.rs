use std::{fmt, ops::Deref};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque identifier for a person or a gift.
///
/// Identifiers are assigned once, when the record is created, and never
/// change afterwards. Identifiers read back from a saved or imported file are
/// kept verbatim, whatever their format.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Generate a fresh identifier.
    ///
    /// Identifiers are random (UUIDv4 in its compact, hyphen-free form), so
    /// no counter or coordination between callers is needed.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for Id {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::Id;

    #[test]
    fn generated_ids_are_unique() {
        let ids: HashSet<Id> = (0..1000).map(|_| Id::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn generated_ids_are_compact() {
        let id = Id::generate();
        assert_eq!(id.len(), 32);
        assert!(!id.contains('-'));
    }

    #[test]
    fn foreign_ids_are_preserved_verbatim() {
        let id: Id = serde_json::from_str(r#""lq2x9k0abc""#).unwrap();
        assert_eq!(id.as_str(), "lq2x9k0abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""lq2x9k0abc""#);
    }
}
