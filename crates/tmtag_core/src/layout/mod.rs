//! Page layout primitives.
//!
//! # Responsibility
//! - Hold fixed page geometry and typography (`LayoutConfig`).
//! - Provide the cursor, page-break policy and line wrapping used by section
//!   renderers.
//! - Define the draw instruction stream consumed by rendering backends.
//!
//! # Invariants
//! - No instruction produced through this module reaches below
//!   `LayoutConfig::page_bottom()`.

pub mod config;
pub mod instruction;
pub mod pagination;
pub mod text_flow;
