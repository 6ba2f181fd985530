//! Input order diagnostics.
//!
//! The layout engine trusts its input. This module reports the ways an entry
//! listing can break that trust, for callers that want to warn or refuse.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::model::{ChangeId, GraphEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The layout will not be visually sensible.
    Error,
    /// Expected in windowed listings, but worth knowing.
    Warning,
}

/// One problem found in an entry listing. Row numbers are 0-based indexes.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryIssue {
    #[error("row {again}: change {id} already listed at row {first}")]
    DuplicateId {
        id: ChangeId,
        first: usize,
        again: usize,
    },

    #[error("row {row}: parent {parent} is listed above its child at row {parent_row}")]
    ParentAboveChild {
        row: usize,
        parent: ChangeId,
        parent_row: usize,
    },

    #[error("row {row}: parent {parent} never appears in the listing")]
    UnresolvedParent { row: usize, parent: ChangeId },
}

impl EntryIssue {
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::DuplicateId { .. } | Self::ParentAboveChild { .. } => Severity::Error,
            Self::UnresolvedParent { .. } => Severity::Warning,
        }
    }

    /// Row the issue was detected on.
    #[must_use]
    pub const fn row(&self) -> usize {
        match self {
            Self::DuplicateId { again, .. } => *again,
            Self::ParentAboveChild { row, .. } | Self::UnresolvedParent { row, .. } => *row,
        }
    }
}

/// Check that ids are unique and every parent sits strictly below its child.
///
/// Issues are returned ordered by row, then by parent order within a row.
/// Parent positions resolve to the first row listing that id.
#[must_use]
pub fn check_entries(entries: &[GraphEntry]) -> Vec<EntryIssue> {
    let mut positions: HashMap<&ChangeId, usize> = HashMap::with_capacity(entries.len());
    let mut issues = Vec::new();

    for (row, entry) in entries.iter().enumerate() {
        if let Some(&first) = positions.get(&entry.current) {
            issues.push(EntryIssue::DuplicateId {
                id: entry.current.clone(),
                first,
                again: row,
            });
        } else {
            positions.insert(&entry.current, row);
        }
    }

    for (row, entry) in entries.iter().enumerate() {
        for parent in &entry.parents {
            match positions.get(parent) {
                Some(&parent_row) if parent_row <= row => {
                    issues.push(EntryIssue::ParentAboveChild {
                        row,
                        parent: parent.clone(),
                        parent_row,
                    });
                }
                Some(_) => {}
                None => issues.push(EntryIssue::UnresolvedParent {
                    row,
                    parent: parent.clone(),
                }),
            }
        }
    }

    issues.sort_by_key(EntryIssue::row);
    issues
}
