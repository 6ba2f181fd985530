//! Lane layout for commit graph views.
//!
//! Turns an ordered listing of changes (children above their ancestors) into
//! the columns a log view needs to draw branch and merge topology.
//!
//! # Layout Properties
//!
//! - **Pure**: one call owns all of its working state; nothing is shared
//!   across calls, so concurrent layouts of different listings are independent.
//! - **Deterministic**: identical input, including parent order, always yields
//!   identical output.
//! - **Greedy-minimal**: every allocation takes the lowest free lane.
//! - **Total**: malformed input degrades into a mechanical layout, never an
//!   error.
//!
//! # Sub-modules
//!
//! - [`engine`]: the top-down pass. ([`calculate`])
//! - [`reservations`]: in-flight connections held during a pass.
//!   ([`ReservationSet`])
//! - [`check`]: optional input order diagnostics. ([`check_entries`],
//!   [`EntryIssue`])

pub mod check;
pub mod engine;
pub mod reservations;

pub use check::{EntryIssue, Severity, check_entries};
pub use engine::calculate;
pub use reservations::ReservationSet;
