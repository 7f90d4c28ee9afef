//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose tag totals and document generation to Dart via FRB.
//! - Translate core errors into flat response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - A failed call never carries document bytes.
//! - Tags cross the boundary as JSON in the editing layer's camelCase shape.

use chrono::{DateTime, Utc};
use log::warn;
use tmtag_core::{
    core_version as core_version_inner, format_two_places, init_logging as init_logging_inner,
    DocumentService, LayoutConfig, TmTag,
};

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Generated document envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDocumentResponse {
    pub ok: bool,
    /// `TM_Tag_<YYYYMMDD>.pdf` on success.
    pub file_name: Option<String>,
    /// Document bytes; empty on failure.
    pub bytes: Vec<u8>,
    pub page_count: u32,
    /// Human-readable failure reason, empty on success.
    pub message: String,
}

impl TagDocumentResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            file_name: None,
            bytes: Vec::new(),
            page_count: 0,
            message: message.into(),
        }
    }
}

/// Category totals envelope; amounts are two-decimal strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTotalsResponse {
    pub ok: bool,
    pub labor_hours: String,
    pub materials: String,
    pub equipment: String,
    pub other: String,
    pub grand_total: String,
    /// Tag JSON with every derived total refreshed.
    pub tag_json: Option<String>,
    pub message: String,
}

impl TagTotalsResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            labor_hours: String::new(),
            materials: String::new(),
            equipment: String::new(),
            other: String::new(),
            grand_total: String::new(),
            tag_json: None,
            message: message.into(),
        }
    }
}

/// Recomputes every entry total and category total of a tag.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Non-numeric inputs count as zero; only malformed JSON fails.
#[flutter_rust_bridge::frb(sync)]
pub fn tag_recompute_totals(tag_json: String) -> TagTotalsResponse {
    let tag = match parse_tag(&tag_json) {
        Ok(tag) => tag,
        Err(message) => return TagTotalsResponse::failure(message),
    };
    let totals = tag.category_totals();
    let tag_json = match serde_json::to_string(&tag) {
        Ok(json) => json,
        Err(err) => {
            return TagTotalsResponse::failure(format!("tag_recompute_totals failed: {err}"))
        }
    };

    TagTotalsResponse {
        ok: true,
        labor_hours: format_two_places(totals.labor),
        materials: format_two_places(totals.materials),
        equipment: format_two_places(totals.equipment),
        other: format_two_places(totals.other),
        grand_total: format_two_places(tag.grand_total()),
        tag_json: Some(tag_json),
        message: String::new(),
    }
}

/// Lays out and encodes a tag as a PDF document.
///
/// Input semantics:
/// - `layout_json`: optional partial `LayoutConfig`; missing fields default.
/// - `now_epoch_ms`: caller clock, used when the tag's work date is absent
///   or unparseable.
///
/// # FFI contract
/// - Sync call; CPU-bound, proportional to the number of entries.
/// - Never panics; failures come back as `ok = false` with a reason.
#[flutter_rust_bridge::frb(sync)]
pub fn tag_generate_document(
    tag_json: String,
    layout_json: Option<String>,
    now_epoch_ms: i64,
) -> TagDocumentResponse {
    let tag = match parse_tag(&tag_json) {
        Ok(tag) => tag,
        Err(message) => return TagDocumentResponse::failure(message),
    };
    let config = match parse_layout(layout_json.as_deref()) {
        Ok(config) => config,
        Err(message) => return TagDocumentResponse::failure(message),
    };
    let Some(now) = DateTime::<Utc>::from_timestamp_millis(now_epoch_ms) else {
        return TagDocumentResponse::failure(format!(
            "now_epoch_ms out of range: {now_epoch_ms}"
        ));
    };

    match DocumentService::pdf(config).generate(&tag, now) {
        Ok(document) => TagDocumentResponse {
            ok: true,
            file_name: Some(document.file_name),
            bytes: document.bytes,
            page_count: document.page_count,
            message: String::new(),
        },
        Err(err) => TagDocumentResponse::failure(format!(
            "tag_generate_document failed: {}",
            err.reason()
        )),
    }
}

fn parse_tag(tag_json: &str) -> Result<TmTag, String> {
    serde_json::from_str::<TmTag>(tag_json).map_err(|err| {
        warn!(
            "event=ffi_parse module=ffi status=error target=tag line={} column={}",
            err.line(),
            err.column()
        );
        format!("invalid tag JSON: {err}")
    })
}

fn parse_layout(layout_json: Option<&str>) -> Result<LayoutConfig, String> {
    match layout_json.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => Ok(LayoutConfig::default()),
        Some(raw) => serde_json::from_str::<LayoutConfig>(raw)
            .map_err(|err| format!("invalid layout JSON: {err}")),
    }
}
