use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::change_id::ChangeId;

/// An in-flight connection seen from some row: a vertical line in `lane`
/// heading toward `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Passthrough {
    pub target: ChangeId,
    pub lane: usize,
}

/// Layout of a single row, one per input entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowLayout {
    /// Copy of the entry's `current` id.
    pub change_id: ChangeId,
    /// Column the row's node occupies.
    pub lane: usize,
    /// Lanes of connections from earlier rows that terminate here, ascending.
    pub child_lanes: Vec<usize>,
    /// Lane of each outgoing connection, parallel to the entry's parents.
    pub parent_lanes: Vec<usize>,
    /// Connections alive at this row that do not terminate here, ordered by
    /// lane. Several lanes may head to the same target.
    pub passthrough_lanes: Vec<Passthrough>,
}

impl RowLayout {
    /// Lowest passthrough lane heading toward `target`, if any.
    #[must_use]
    pub fn passthrough_lane(&self, target: &str) -> Option<usize> {
        self.passthrough_lanes
            .iter()
            .filter(|p| p.target.as_str() == target)
            .map(|p| p.lane)
            .min()
    }

    /// Passthroughs keyed by target. When several lanes head to the same
    /// target, the lowest one is kept.
    #[must_use]
    pub fn passthrough_map(&self) -> BTreeMap<ChangeId, usize> {
        let mut map = BTreeMap::new();
        for p in &self.passthrough_lanes {
            map.entry(p.target.clone())
                .and_modify(|lane: &mut usize| *lane = (*lane).min(p.lane))
                .or_insert(p.lane);
        }
        map
    }

    /// Nothing above this row points at it.
    #[must_use]
    pub fn is_tip(&self) -> bool {
        self.child_lanes.is_empty()
    }

    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parent_lanes.len() > 1
    }

    /// More than one incoming line lands on this node.
    #[must_use]
    pub fn is_convergence(&self) -> bool {
        self.child_lanes.len() > 1
    }

    /// Highest lane mentioned anywhere in this row.
    #[must_use]
    pub fn max_lane(&self) -> usize {
        self.child_lanes
            .iter()
            .chain(&self.parent_lanes)
            .copied()
            .chain(self.passthrough_lanes.iter().map(|p| p.lane))
            .fold(self.lane, usize::max)
    }
}

/// Full layout for one `calculate` call, one row per input entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLayout {
    rows: Vec<RowLayout>,
    /// Connections still in flight after the last row, ordered by lane.
    unresolved: Vec<Passthrough>,
}

impl GraphLayout {
    pub(crate) const fn new(rows: Vec<RowLayout>, unresolved: Vec<Passthrough>) -> Self {
        Self { rows, unresolved }
    }

    #[must_use]
    pub fn rows(&self) -> &[RowLayout] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<RowLayout> {
        self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RowLayout> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RowLayout> {
        self.rows.iter()
    }

    /// Index of the first row for `id`.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.rows.iter().position(|row| row.change_id.as_str() == id)
    }

    /// Number of lane columns needed to draw every row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.max_lane() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Connections to parents that never appeared as a row.
    ///
    /// Each of these kept its lane from the row that created it down to the
    /// last row, where it also shows up as a passthrough.
    #[must_use]
    pub fn unresolved(&self) -> &[Passthrough] {
        &self.unresolved
    }
}

impl<'a> IntoIterator for &'a GraphLayout {
    type Item = &'a RowLayout;
    type IntoIter = std::slice::Iter<'a, RowLayout>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
