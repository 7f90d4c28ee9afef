//! Entry aggregation.
//!
//! # Responsibility
//! - Recompute per-entry derived values and category/grand totals.
//!
//! # Invariants
//! - Aggregation is stateless and pure; callers re-run it after each
//!   collection change instead of caching results.

mod recompute;

pub use recompute::{recompute, recompute_tag, CategoryAggregate, EntryTotal};
