//! Core domain logic for time-and-material tags.
//! This crate owns entry aggregation and document layout; UI, storage and
//! transport live outside it.

pub mod aggregate;
pub mod document;
pub mod layout;
pub mod logging;
pub mod model;
pub mod output;
pub mod render;
pub mod service;

pub use aggregate::{recompute, recompute_tag, CategoryAggregate, EntryTotal};
pub use document::{AssembledDocument, DocumentAssembler, GenerationError, SectionKind};
pub use layout::config::{ConfigError, LayoutConfig, PageSize};
pub use layout::instruction::{DrawInstruction, Font, TextStyle};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entry::{
    Entry, EntryCategory, EntryId, EquipmentEntry, LaborEntry, MaterialEntry, OtherEntry,
};
pub use model::numeric::{coerce_numeric, format_two_places, NumericInput};
pub use model::tag::{CategoryTotals, SignatureImage, TagEntry, TagId, TmTag};
pub use output::{serialize, tag_file_name, TagDocument};
pub use render::{
    BackendError, DocumentBackend, HelveticaMetrics, MeasureError, PdfBackend, TextMeasurer,
};
pub use service::document_service::DocumentService;
pub use service::tag_service::{TagService, TagServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
