use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque identifier for one change (commit, revision, event).
///
/// Only ever compared for equality by the layout engine. The derived `Ord`
/// exists so ids can key ordered collections and keep output deterministic;
/// it carries no topological meaning.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeId(String);

impl ChangeId {
    /// Wrap any string-like value as a change id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviate to at most `len` characters for compact display.
    #[must_use]
    pub fn short(&self, len: usize) -> &str {
        match self.0.char_indices().nth(len) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChangeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ChangeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ChangeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ChangeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn serializes_as_bare_string() {
        let id = ChangeId::new("a1b2c3");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"a1b2c3\"");

        let back: ChangeId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }

    #[test]
    fn short_truncates_on_char_boundaries() {
        let id = ChangeId::new("0123456789abcdef");
        assert_eq!(id.short(7), "0123456");
        assert_eq!(id.short(64), "0123456789abcdef");

        let wide = ChangeId::new("ééééé");
        assert_eq!(wide.short(2), "éé");
    }

    #[test]
    fn borrow_allows_str_lookup() {
        let mut set = HashSet::new();
        set.insert(ChangeId::from("abc"));
        assert!(set.contains("abc"));
        assert!(!set.contains("abd"));
    }
}
