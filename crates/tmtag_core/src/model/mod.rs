//! Domain model for time-and-material tags.
//!
//! # Responsibility
//! - Define entry records for the four tag categories.
//! - Define the tag aggregate that owns entries and their totals.
//! - Own the single numeric coercion policy used by every entry field.
//!
//! # Invariants
//! - Derived totals are never settable directly.
//! - Entry order is insertion order and is the rendered order.

pub mod entry;
pub mod numeric;
pub mod tag;
