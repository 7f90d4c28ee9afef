//! Document generation use-case service.
//!
//! # Responsibility
//! - Run aggregate, assemble and serialize as one unit of work.
//!
//! # Invariants
//! - Totals are recomputed from the entries on every call; cached tag totals
//!   are never trusted for output.
//! - The service holds no per-call state, so one instance can serve many
//!   tags.

use crate::aggregate::recompute_tag;
use crate::document::{AssembledDocument, DocumentAssembler, GenerationError};
use crate::layout::config::LayoutConfig;
use crate::model::tag::TmTag;
use crate::output::{serialize, TagDocument};
use crate::render::{DocumentBackend, HelveticaMetrics, PdfBackend, TextMeasurer};
use chrono::{DateTime, Utc};
use log::{error, info};

/// Use-case service wrapper for tag document generation.
pub struct DocumentService<M: TextMeasurer, B: DocumentBackend> {
    config: LayoutConfig,
    measurer: M,
    backend: B,
}

impl DocumentService<HelveticaMetrics, PdfBackend> {
    /// Creates a service producing PDF files with the built-in Helvetica
    /// metrics.
    pub fn pdf(config: LayoutConfig) -> Self {
        Self::new(config, HelveticaMetrics, PdfBackend)
    }
}

impl<M: TextMeasurer, B: DocumentBackend> DocumentService<M, B> {
    pub fn new(config: LayoutConfig, measurer: M, backend: B) -> Self {
        Self {
            config,
            measurer,
            backend,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lays out `tag` without encoding it.
    pub fn assemble(&self, tag: &TmTag) -> Result<AssembledDocument, GenerationError> {
        let totals = recompute_tag(tag);
        DocumentAssembler::new(&self.config, &self.measurer).assemble(tag, &totals)
    }

    /// Produces the named document artifact for `tag`.
    ///
    /// `now` only feeds the file name fallback when the work date does not
    /// parse.
    ///
    /// # Errors
    /// - Any `GenerationError` from assembly or serialization; no partial
    ///   artifact is returned.
    pub fn generate(
        &self,
        tag: &TmTag,
        now: DateTime<Utc>,
    ) -> Result<TagDocument, GenerationError> {
        let result = self.assemble(tag).and_then(|document| {
            serialize(&document, tag, &self.backend, self.config.page(), now)
        });
        match &result {
            Ok(document) => info!(
                "event=document_generate module=service status=ok tag_id={} pages={}",
                tag.id, document.page_count
            ),
            Err(err) => error!(
                "event=document_generate module=service status=error tag_id={} error={}",
                tag.id, err
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::DocumentService;
    use crate::layout::config::LayoutConfig;
    use crate::model::entry::LaborEntry;
    use crate::model::tag::TmTag;
    use chrono::{TimeZone, Utc};

    #[test]
    fn generates_named_pdf() {
        let service = DocumentService::pdf(LayoutConfig::default());
        let mut tag = TmTag::new("2026-03-02");
        tag.edit_entries(|labor: &mut Vec<LaborEntry>| {
            let mut entry = LaborEntry::blank("2026-03-02");
            entry.set_name("J. Garcia");
            entry.set_st_hours(8u32);
            labor.push(entry);
        });

        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let document = service.generate(&tag, now).unwrap();
        assert_eq!(document.file_name, "TM_Tag_20260302.pdf");
        assert_eq!(document.page_count, 1);
        assert!(document.bytes.starts_with(b"%PDF-1.4"));
    }
}
