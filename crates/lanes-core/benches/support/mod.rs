//! Synthetic commit listings for the layout benchmarks.

use lanes_core::{ChangeId, GraphEntry};

/// Shape of a benchmark listing.
#[derive(Clone, Copy, Debug)]
pub struct HistoryShape {
    pub name: &'static str,
    pub rows: usize,
    /// Furthest distance, in rows, from a change down to its first parent.
    /// Larger reaches keep more branches open at once.
    pub reach: usize,
    /// One row in `merge_every` has a second parent.
    pub merge_every: u64,
}

pub const SHAPES: [HistoryShape; 3] = [
    HistoryShape {
        name: "S",
        rows: 500,
        reach: 4,
        merge_every: 8,
    },
    HistoryShape {
        name: "M",
        rows: 5_000,
        reach: 8,
        merge_every: 8,
    },
    HistoryShape {
        name: "L",
        rows: 50_000,
        reach: 16,
        merge_every: 6,
    },
];

/// splitmix64, enough to make listings reproducible from a seed.
struct Dice(u64);

impl Dice {
    fn roll(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `1..=max`.
    fn distance(&mut self, max: usize) -> usize {
        1 + (self.roll() % max.max(1) as u64) as usize
    }

    fn one_in(&mut self, n: u64) -> bool {
        self.roll() % n.max(1) == 0
    }
}

/// A newest-first window over a branchy history.
///
/// Parents point a short, random distance down the listing. Rows near the
/// bottom point past the end, the way a paginated log window does, so the
/// last few rows carry unresolved lanes. Roughly one row in 200 is a root.
pub fn listing(shape: HistoryShape, seed: u64) -> Vec<GraphEntry> {
    let mut dice = Dice(seed);
    (0..shape.rows)
        .map(|row| {
            if dice.one_in(200) {
                return GraphEntry::root(hash(row));
            }
            let first = row + dice.distance(shape.reach);
            let mut parents = vec![hash(first)];
            if dice.one_in(shape.merge_every) {
                let second = row + dice.distance(shape.reach * 4);
                if second != first {
                    parents.push(hash(second));
                }
            }
            GraphEntry::new(hash(row), parents)
        })
        .collect()
}

const MASK_48: u64 = (1 << 48) - 1;

/// Fake 12-digit hash. Multiplying by an odd constant is a bijection mod
/// 2^48, so rows never collide.
fn hash(row: usize) -> ChangeId {
    ChangeId::new(format!("{:012x}", (row as u64).wrapping_mul(0x2545_F491_4F6C_DD1D) & MASK_48))
}
