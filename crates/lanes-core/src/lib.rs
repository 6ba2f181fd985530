//! lanes-core library.
//!
//! Computes minimal-width lane layouts for commit graph views: given changes
//! listed newest-first with their ordered parents, decide which column each
//! change, each parent connection and each passing line occupies.
//!
//! ```
//! use lanes_core::{GraphEntry, calculate};
//!
//! let entries = [
//!     GraphEntry::new("merge", ["main", "topic"]),
//!     GraphEntry::new("main", ["base"]),
//!     GraphEntry::new("topic", ["base"]),
//!     GraphEntry::root("base"),
//! ];
//! let layout = calculate(&entries);
//! assert_eq!(layout.rows()[0].parent_lanes, vec![0, 1]);
//! assert_eq!(layout.rows()[3].child_lanes, vec![0, 1]);
//! assert_eq!(layout.width(), 2);
//! ```
//!
//! # Conventions
//!
//! - **Errors**: the engine is total; `thiserror` types for input and order
//!   diagnostics, `anyhow::Result` at config/IO boundaries.
//! - **Logging**: `tracing` macros (`debug!` per layout, `trace!` per row).

pub mod config;
pub mod error;
pub mod graph;
pub mod input;
pub mod model;
pub mod timing;

pub use graph::{EntryIssue, Severity, calculate, check_entries};
pub use model::{ChangeId, GraphEntry, GraphLayout, Passthrough, RowLayout};
