use serde::{Deserialize, Serialize};

use super::change_id::ChangeId;

/// One input row: a change and its ordered parents.
///
/// Parent order is significant. Index 0 is the first parent and keeps the
/// child's lane; every later parent fans out into a lane of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEntry {
    pub current: ChangeId,
    #[serde(default)]
    pub parents: Vec<ChangeId>,
}

impl GraphEntry {
    #[must_use]
    pub fn new<I, P>(current: impl Into<ChangeId>, parents: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ChangeId>,
    {
        Self {
            current: current.into(),
            parents: parents.into_iter().map(Into::into).collect(),
        }
    }

    /// Entry with no parents.
    #[must_use]
    pub fn root(current: impl Into<ChangeId>) -> Self {
        Self {
            current: current.into(),
            parents: Vec::new(),
        }
    }

    #[must_use]
    pub fn first_parent(&self) -> Option<&ChangeId> {
        self.parents.first()
    }

    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_preserves_parent_order() {
        let entry = GraphEntry::new("m", ["p2", "p1", "p3"]);
        let parents: Vec<&str> = entry.parents.iter().map(ChangeId::as_str).collect();
        assert_eq!(parents, ["p2", "p1", "p3"]);
        assert_eq!(entry.first_parent().map(ChangeId::as_str), Some("p2"));
        assert!(entry.is_merge());
    }

    #[test]
    fn missing_parents_field_deserializes_as_root() {
        let entry: GraphEntry =
            serde_json::from_str(r#"{"current":"abc"}"#).expect("deserialize");
        assert_eq!(entry, GraphEntry::root("abc"));
        assert!(entry.first_parent().is_none());
        assert!(!entry.is_merge());
    }
}
