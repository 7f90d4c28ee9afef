//! Core use-case services.
//!
//! # Responsibility
//! - Expose tag editing and document generation as use-case level APIs.
//! - Keep UI/FFI/CLI layers decoupled from layout and rendering details.

pub mod document_service;
pub mod tag_service;
