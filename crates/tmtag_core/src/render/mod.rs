//! Rendering collaborator contracts and built-in implementations.
//!
//! # Responsibility
//! - Define the width-measurement and document-encoding seams the layout
//!   engine depends on.
//! - Ship a deterministic Helvetica measurer and a minimal PDF backend.
//!
//! # Invariants
//! - Measurers are pure: same text and style always give the same width.
//! - Backends never see a partial instruction stream.

use crate::layout::config::{PageDimensions, Pt};
use crate::layout::instruction::{DrawInstruction, TextStyle};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod metrics;
pub mod pdf;

pub use metrics::HelveticaMetrics;
pub use pdf::PdfBackend;

/// Text width query supplied by the rendering side.
pub trait TextMeasurer {
    /// Returns the advance width of `text` set in `style`.
    fn text_width(&self, text: &str, style: &TextStyle) -> Result<Pt, MeasureError>;
}

/// Encodes a complete instruction stream into a document artifact.
pub trait DocumentBackend {
    /// File extension of produced artifacts, without the dot.
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn render(
        &self,
        page: PageDimensions,
        instructions: &[DrawInstruction],
    ) -> Result<Vec<u8>, BackendError>;
}

/// Width measurement failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureError {
    message: String,
}

impl MeasureError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for MeasureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "text measurement failed: {}", self.message)
    }
}

impl Error for MeasureError {}

/// Document encoding failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Signature image format the backend cannot embed.
    UnsupportedImage(String),
    /// Any other encoding failure.
    Encoding(String),
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedImage(details) => write!(f, "unsupported image: {details}"),
            Self::Encoding(details) => write!(f, "document encoding failed: {details}"),
        }
    }
}

impl Error for BackendError {}
