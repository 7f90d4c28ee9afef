//! Document generation through the service layer and the PDF backend.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{TimeZone, Utc};
use tmtag_core::{
    BackendError, DocumentService, GenerationError, HelveticaMetrics, LayoutConfig, MeasureError,
    PdfBackend, SectionKind, TextMeasurer, TextStyle, TmTag,
};

const TINY_JPEG: [u8; 23] = [
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, 0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x20,
    0x00, 0x40, 0x01, 0x01, 0x11, 0x00, 0xFF, 0xD9,
];

/// Fails on the first width query that contains `trigger`.
struct FailOn {
    trigger: &'static str,
}

impl TextMeasurer for FailOn {
    fn text_width(&self, text: &str, style: &TextStyle) -> Result<f64, MeasureError> {
        if text.contains(self.trigger) {
            return Err(MeasureError::new("glyph table unavailable"));
        }
        HelveticaMetrics.text_width(text, style)
    }
}

fn tag_from_json(signature: Option<&[u8]>, date_of_work: &str) -> TmTag {
    let signature = signature
        .map(|bytes| format!("\"data:image/jpeg;base64,{}\"", STANDARD.encode(bytes)))
        .unwrap_or_else(|| "null".to_string());
    let json = format!(
        r#"{{
            "projectRef": "P-100",
            "costCode": "26-05",
            "dateOfWork": "{date_of_work}",
            "title": "Panel swap",
            "description": "Replaced main breaker panel and re-terminated feeders.",
            "customerRef": "",
            "laborEntries": [
                {{ "name": "J. Garcia", "classification": "Journeyman", "stHours": "8", "otHours": "2.5" }}
            ],
            "materialEntries": [
                {{ "name": "200A panel", "quantity": 1, "unitCost": "1450.00" }}
            ],
            "equipmentEntries": [],
            "otherEntries": [],
            "signature": {signature},
            "signerName": "R. Ortiz",
            "signerTitle": "Superintendent"
        }}"#
    );
    serde_json::from_str(&json).unwrap()
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 15, 30, 0).unwrap()
}

#[test]
fn signed_tag_becomes_single_page_pdf() {
    let tag = tag_from_json(Some(&TINY_JPEG), "2026-03-02");
    assert_eq!(tag.customer_ref, None);

    let document = DocumentService::pdf(LayoutConfig::default())
        .generate(&tag, now())
        .unwrap();
    assert_eq!(document.file_name, "TM_Tag_20260302.pdf");
    assert_eq!(document.page_count, 1);

    let body = String::from_utf8_lossy(&document.bytes);
    assert!(body.contains("/Filter /DCTDecode"));
    assert!(body.contains("(Grand Total: 1460.50) Tj"));
    assert!(body.contains("(Page 1 of 1) Tj"));
}

#[test]
fn unparseable_work_date_uses_injected_clock() {
    let tag = tag_from_json(None, "next Tuesday");
    let document = DocumentService::pdf(LayoutConfig::default())
        .generate(&tag, now())
        .unwrap();
    assert_eq!(document.file_name, "TM_Tag_20261019.pdf");
}

#[test]
fn non_jpeg_signature_is_a_serialization_failure() {
    let tag = tag_from_json(Some(b"\x89PNG\r\n\x1a\n\x00\x00"), "2026-03-02");
    let err = DocumentService::pdf(LayoutConfig::default())
        .generate(&tag, now())
        .unwrap_err();
    assert!(matches!(
        err,
        GenerationError::Serialization(BackendError::UnsupportedImage(_))
    ));
}

#[test]
fn measurement_failure_names_the_section() {
    let tag = tag_from_json(None, "2026-03-02");
    let service = DocumentService::new(
        LayoutConfig::default(),
        FailOn {
            trigger: "Journeyman",
        },
        PdfBackend,
    );

    let err = service.generate(&tag, now()).unwrap_err();
    match &err {
        GenerationError::Render { section, .. } => {
            assert_eq!(*section, SectionKind::CategoryTable(tmtag_core::EntryCategory::Labor));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.reason().contains("labor_table"));
    assert!(err.reason().contains("glyph table unavailable"));
}

#[test]
fn a4_layout_still_fits_columns() {
    let tag = tag_from_json(None, "2026-03-02");
    let config: LayoutConfig = serde_json::from_str(r#"{ "page_size": "a4" }"#).unwrap();
    let content_right = config.content_right();
    let document = DocumentService::pdf(config).assemble(&tag).unwrap();

    for instruction in &document.instructions {
        if let tmtag_core::DrawInstruction::Text { x, .. } = instruction {
            assert!(*x < content_right);
        }
    }
}
