//! Tag document layout.
//!
//! # Responsibility
//! - Render each document section into draw instructions.
//! - Assemble sections in fixed order, skipping empty ones.
//!
//! # Invariants
//! - Renderers take the cursor by value and return the advanced cursor; no
//!   layout position outlives one assembly.
//! - Assembly is all-or-nothing: a failing section discards the whole stream.

use crate::layout::config::LayoutConfig;
use crate::layout::instruction::DrawInstruction;
use crate::layout::pagination::{LayoutCursor, PaginationController};
use crate::model::entry::EntryCategory;
use crate::render::{BackendError, MeasureError, TextMeasurer};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod assembler;
pub mod sections;
pub mod table;

pub use assembler::{AssembledDocument, DocumentAssembler};

/// Kind of one document section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "category", rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    Description,
    CategoryTable(EntryCategory),
    Totals,
    Signature,
    Footer,
}

impl Display for SectionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Header => write!(f, "header"),
            Self::Description => write!(f, "description"),
            Self::CategoryTable(category) => {
                write!(f, "{}_table", category.label().to_ascii_lowercase())
            }
            Self::Totals => write!(f, "totals"),
            Self::Signature => write!(f, "signature"),
            Self::Footer => write!(f, "footer"),
        }
    }
}

/// Shared collaborators for one assembly.
pub struct LayoutContext<'a> {
    pub config: &'a LayoutConfig,
    pub measurer: &'a dyn TextMeasurer,
    pub pagination: PaginationController<'a>,
}

impl<'a> LayoutContext<'a> {
    pub fn new(config: &'a LayoutConfig, measurer: &'a dyn TextMeasurer) -> Self {
        Self {
            config,
            measurer,
            pagination: PaginationController::new(config),
        }
    }
}

/// Instructions emitted by one section plus the advanced cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionOutput {
    pub instructions: Vec<DrawInstruction>,
    pub cursor: LayoutCursor,
}

/// One section of the tag document.
pub trait SectionRenderer {
    fn kind(&self) -> SectionKind;

    fn render(
        &self,
        cursor: LayoutCursor,
        ctx: &LayoutContext<'_>,
    ) -> Result<SectionOutput, MeasureError>;
}

/// Failure to produce a tag document.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// Layout configuration rejected before rendering.
    InvalidLayout(String),
    /// A section renderer failed; nothing was emitted.
    Render {
        section: SectionKind,
        source: MeasureError,
    },
    /// The backend could not package the finished stream.
    Serialization(BackendError),
}

impl GenerationError {
    /// Human-readable failure reason for envelope responses.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

impl Display for GenerationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLayout(details) => write!(f, "invalid layout: {details}"),
            Self::Render { section, source } => {
                write!(f, "rendering {section} section failed: {source}")
            }
            Self::Serialization(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GenerationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLayout(_) => None,
            Self::Render { source, .. } => Some(source),
            Self::Serialization(err) => Some(err),
        }
    }
}

impl From<BackendError> for GenerationError {
    fn from(value: BackendError) -> Self {
        Self::Serialization(value)
    }
}
