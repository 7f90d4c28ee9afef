//! Flutter-facing FFI surface for tag editing and document generation.

pub mod api;
