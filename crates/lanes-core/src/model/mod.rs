//! Value types flowing in and out of the layout engine.
//!
//! - [`ChangeId`]: opaque change identifier.
//! - [`GraphEntry`]: one input row (change + ordered parents).
//! - [`RowLayout`] / [`GraphLayout`]: computed lane layout.

pub mod change_id;
pub mod entry;
pub mod layout;

pub use change_id::ChangeId;
pub use entry::GraphEntry;
pub use layout::{GraphLayout, Passthrough, RowLayout};
