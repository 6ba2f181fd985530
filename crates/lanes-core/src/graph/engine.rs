//! Single top-down pass assigning lanes to every row.
//!
//! # Rules
//!
//! Two positional rules produce every shape (tip, continuation, fork landing,
//! merge origin) without classifying rows:
//!
//! 1. **Landing**: a row takes the lowest lane among the connections that
//!    arrive at it. With no arrivals it takes the lowest free lane.
//! 2. **Departure**: the first parent continues in the row's own lane; each
//!    further parent gets the lowest lane free at that moment.
//!
//! Lanes are always allocated lowest-first, so the width at any row equals
//! the number of lines open across it for the given input order.
//!
//! # Passthroughs
//!
//! A row reports the connections that leave its bottom edge and run past the
//! following row without ending there. A line ending at the very next row is
//! a plain row-to-row segment and never shows up as a passthrough. On the
//! last row every connection still in flight is reported.

use std::iter::Peekable;

use tracing::{debug, trace};

use super::reservations::ReservationSet;
use crate::model::{ChangeId, GraphEntry, GraphLayout, RowLayout};

/// Compute the lane layout for an ordered listing of entries.
///
/// Entries must list children before their ancestors. Nothing is validated:
/// duplicate ids or out-of-order parents are laid out mechanically, and
/// parents that never appear keep their lane to the end (see
/// [`GraphLayout::unresolved`]). Use [`super::check_entries`] to diagnose the
/// input separately.
pub fn calculate<'a, I>(entries: I) -> GraphLayout
where
    I: IntoIterator<Item = &'a GraphEntry>,
{
    let mut entries = entries.into_iter().peekable();
    let mut rows = Vec::with_capacity(entries.size_hint().0);
    let mut reservations = ReservationSet::new();

    while let Some(entry) = entries.next() {
        let row = layout_row(&mut reservations, entry, &mut entries);
        trace!(
            row = rows.len(),
            id = %row.change_id,
            lane = row.lane,
            child_lanes = ?row.child_lanes,
            parent_lanes = ?row.parent_lanes,
            passthroughs = row.passthrough_lanes.len(),
            "laid out row"
        );
        rows.push(row);
    }

    let layout = GraphLayout::new(rows, reservations.into_pending());
    debug!(
        rows = layout.len(),
        width = layout.width(),
        unresolved = layout.unresolved().len(),
        "computed graph layout"
    );
    layout
}

fn layout_row<'a, I>(
    reservations: &mut ReservationSet,
    entry: &GraphEntry,
    rest: &mut Peekable<I>,
) -> RowLayout
where
    I: Iterator<Item = &'a GraphEntry>,
{
    let child_lanes = reservations.take_arrivals(&entry.current);
    let lane = child_lanes
        .first()
        .copied()
        .unwrap_or_else(|| reservations.lowest_free_lane());

    let mut parent_lanes = Vec::with_capacity(entry.parents.len());
    for (index, parent) in entry.parents.iter().enumerate() {
        // The first parent is reserved before any allocation, so the row's
        // own lane is already held when later parents look for a free one.
        let parent_lane = if index == 0 {
            lane
        } else {
            reservations.lowest_free_lane()
        };
        reservations.reserve(parent_lane, parent.clone());
        parent_lanes.push(parent_lane);
    }

    let next: Option<&ChangeId> = rest.peek().map(|next| &next.current);
    let passthrough_lanes = reservations.passthroughs_past(next);

    RowLayout {
        change_id: entry.current.clone(),
        lane,
        child_lanes,
        parent_lanes,
        passthrough_lanes,
    }
}
