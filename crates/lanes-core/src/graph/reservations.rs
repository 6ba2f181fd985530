//! In-flight connections owned by a single layout pass.

use std::collections::BTreeMap;

use crate::model::{ChangeId, Passthrough};

/// Lanes currently held by vertical lines that have not reached their target.
///
/// Keyed by lane. A lane is never held twice: continuation lanes come from a
/// row's own lane (freed by its arrival or freshly allocated) and every other
/// lane is allocated from the free ones.
#[derive(Debug, Clone, Default)]
pub struct ReservationSet {
    lanes: BTreeMap<usize, ChangeId>,
}

impl ReservationSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    #[must_use]
    pub fn is_held(&self, lane: usize) -> bool {
        self.lanes.contains_key(&lane)
    }

    /// Smallest non-negative lane not currently held.
    ///
    /// Keys iterate in ascending order, so the first key that differs from its
    /// index marks the first gap.
    #[must_use]
    pub fn lowest_free_lane(&self) -> usize {
        self.lanes
            .keys()
            .enumerate()
            .find(|(index, lane)| index != *lane)
            .map_or(self.lanes.len(), |(index, _)| index)
    }

    /// Hold `lane` for a line heading toward `target`.
    pub fn reserve(&mut self, lane: usize, target: ChangeId) {
        let previous = self.lanes.insert(lane, target);
        debug_assert!(previous.is_none(), "lane {lane} reserved twice");
    }

    /// Remove every reservation heading to `id` and return their lanes,
    /// ascending.
    pub fn take_arrivals(&mut self, id: &ChangeId) -> Vec<usize> {
        let arrived: Vec<usize> = self
            .lanes
            .iter()
            .filter(|(_, target)| *target == id)
            .map(|(lane, _)| *lane)
            .collect();
        for lane in &arrived {
            self.lanes.remove(lane);
        }
        arrived
    }

    /// Reservations that run past the row `next` without ending there,
    /// ordered by lane. With no next row, everything still held.
    #[must_use]
    pub fn passthroughs_past(&self, next: Option<&ChangeId>) -> Vec<Passthrough> {
        self.lanes
            .iter()
            .filter(|(_, target)| next != Some(*target))
            .map(|(lane, target)| Passthrough {
                target: target.clone(),
                lane: *lane,
            })
            .collect()
    }

    /// Consume the set, yielding whatever is still in flight.
    #[must_use]
    pub fn into_pending(self) -> Vec<Passthrough> {
        self.lanes
            .into_iter()
            .map(|(lane, target)| Passthrough { target, lane })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ChangeId {
        ChangeId::new(s)
    }

    #[test]
    fn lowest_free_lane_on_empty_set_is_zero() {
        assert_eq!(ReservationSet::new().lowest_free_lane(), 0);
    }

    #[test]
    fn lowest_free_lane_finds_first_gap() {
        let mut set = ReservationSet::new();
        set.reserve(0, id("a"));
        set.reserve(1, id("b"));
        set.reserve(3, id("c"));
        assert_eq!(set.lowest_free_lane(), 2);

        set.reserve(2, id("d"));
        assert_eq!(set.lowest_free_lane(), 4);
    }

    #[test]
    fn lowest_free_lane_when_zero_is_free() {
        let mut set = ReservationSet::new();
        set.reserve(1, id("a"));
        set.reserve(2, id("b"));
        assert_eq!(set.lowest_free_lane(), 0);
    }

    #[test]
    fn take_arrivals_removes_only_matching_lanes() {
        let mut set = ReservationSet::new();
        set.reserve(0, id("c"));
        set.reserve(1, id("d"));
        set.reserve(2, id("c"));

        assert_eq!(set.take_arrivals(&id("c")), vec![0, 2]);
        assert_eq!(set.len(), 1);
        assert!(set.is_held(1));
        assert!(!set.is_held(0));
        assert_eq!(set.lowest_free_lane(), 0);
        assert!(set.take_arrivals(&id("c")).is_empty());
    }

    #[test]
    fn passthroughs_skip_next_row_and_keep_lane_order() {
        let mut set = ReservationSet::new();
        set.reserve(2, id("x"));
        set.reserve(0, id("y"));
        set.reserve(1, id("me"));

        let passthroughs = set.passthroughs_past(Some(&id("me")));
        let lanes: Vec<(usize, &str)> = passthroughs
            .iter()
            .map(|p| (p.lane, p.target.as_str()))
            .collect();
        assert_eq!(lanes, vec![(0, "y"), (2, "x")]);
        assert_eq!(set.len(), 3);
        assert_eq!(set.passthroughs_past(None).len(), 3);
    }

    #[test]
    fn into_pending_yields_remaining_in_lane_order() {
        let mut set = ReservationSet::new();
        set.reserve(1, id("b"));
        set.reserve(0, id("a"));
        let pending = set.into_pending();
        assert_eq!(
            pending,
            vec![
                Passthrough {
                    target: id("a"),
                    lane: 0
                },
                Passthrough {
                    target: id("b"),
                    lane: 1
                },
            ]
        );
    }
}
