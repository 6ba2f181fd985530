#![no_main]

use std::collections::HashSet;

use lanes_core::{GraphEntry, calculate};
use libfuzzer_sys::fuzz_target;

// Bytes become a listing over a small id alphabet, so duplicates, cycles and
// parents above children all come up quickly. Each pair of bytes is one
// entry: the first byte picks the id, the low bits of the second pick up to
// three parents relative to it.
fuzz_target!(|data: &[u8]| {
    let entries: Vec<GraphEntry> = data
        .chunks(2)
        .map(|chunk| {
            let id = chunk[0] % 32;
            let shape = chunk.get(1).copied().unwrap_or(0);
            let count = usize::from(shape & 0b11);
            let parents = (0..count).map(|k| {
                let step = (shape >> (2 + 2 * k)) & 0b11;
                format!("n{}", (id + step + 1) % 40)
            });
            GraphEntry::new(format!("n{id}"), parents)
        })
        .collect();

    let layout = calculate(&entries);
    assert_eq!(layout.len(), entries.len());

    let width = layout.width();
    for (entry, row) in entries.iter().zip(layout.iter()) {
        assert_eq!(row.change_id, entry.current);
        assert_eq!(row.parent_lanes.len(), entry.parents.len());
        if let Some(first) = row.parent_lanes.first() {
            assert_eq!(*first, row.lane);
        }
        assert!(row.max_lane() < width);

        let through: HashSet<usize> = row.passthrough_lanes.iter().map(|p| p.lane).collect();
        assert_eq!(through.len(), row.passthrough_lanes.len());
    }

    if let Some(last) = layout.rows().last() {
        assert_eq!(last.passthrough_lanes.as_slice(), layout.unresolved());
    }

    let again = calculate(&entries);
    assert_eq!(again, layout);
});
