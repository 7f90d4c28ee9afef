//! Packaging of assembled documents into named artifacts.
//!
//! # Responsibility
//! - Derive the deterministic artifact file name for a tag.
//! - Hand a complete instruction stream to a `DocumentBackend`.
//!
//! # Invariants
//! - The current time is always injected; this module never reads the clock.
//! - A backend failure yields no artifact, only `GenerationError`.

use crate::document::{AssembledDocument, GenerationError};
use crate::layout::config::PageDimensions;
use crate::model::tag::TmTag;
use crate::render::DocumentBackend;
use chrono::{DateTime, NaiveDate, Utc};
use log::{info, warn};

const FILE_NAME_PREFIX: &str = "TM_Tag_";
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Finished, named document artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub page_count: u32,
}

/// Parses a work date in any accepted input format.
pub fn parse_work_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|moment| moment.date_naive())
        })
}

/// Returns `TM_Tag_<YYYYMMDD>.<extension>` for `tag`.
///
/// Uses the tag's work date when it parses, otherwise the date of `now`.
pub fn tag_file_name(tag: &TmTag, extension: &str, now: DateTime<Utc>) -> String {
    let date = parse_work_date(&tag.date_of_work).unwrap_or_else(|| now.date_naive());
    format!("{FILE_NAME_PREFIX}{}.{extension}", date.format("%Y%m%d"))
}

/// Encodes `document` with `backend` and names the result.
///
/// # Errors
/// - `Serialization` carrying the backend's failure unchanged.
pub fn serialize(
    document: &AssembledDocument,
    tag: &TmTag,
    backend: &dyn DocumentBackend,
    page: PageDimensions,
    now: DateTime<Utc>,
) -> Result<TagDocument, GenerationError> {
    let bytes = backend
        .render(page, &document.instructions)
        .map_err(|err| {
            warn!(
                "event=document_serialize module=output status=error tag_id={} reason={}",
                tag.id, err
            );
            GenerationError::Serialization(err)
        })?;
    let file_name = tag_file_name(tag, backend.extension(), now);

    info!(
        "event=document_serialize module=output status=ok tag_id={} pages={} bytes={}",
        tag.id,
        document.page_count,
        bytes.len()
    );

    Ok(TagDocument {
        file_name,
        bytes,
        page_count: document.page_count,
    })
}
