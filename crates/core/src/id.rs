use std::fmt;

use serde::{Deserialize, Serialize};

/// Entity identifier. Unique within one (entity kind, workspace) pair and
/// never reused across workspaces: every copy into another workspace mints
/// a fresh one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// Mint a fresh identifier (v4 uuid).
    pub fn fresh() -> Self {
        Id(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_distinct() {
        assert_ne!(Id::fresh(), Id::fresh());
    }

    #[test]
    fn serde_transparent() {
        let id = Id::from("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        let back: Id = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(back, id);
    }
}
