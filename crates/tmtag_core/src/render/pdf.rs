//! Minimal PDF 1.4 backend.
//!
//! # Responsibility
//! - Encode a draw instruction stream into a self-contained PDF file.
//!
//! # Invariants
//! - Output is byte-for-byte deterministic for the same input (no timestamps,
//!   no random IDs).
//! - Only the base-14 Helvetica faces are referenced, so no font embedding is
//!   needed; text outside printable ASCII is written as `?`.
//! - Signature images are embedded as-is through `DCTDecode`; anything other
//!   than baseline/progressive JPEG is rejected.

use crate::layout::config::{PageDimensions, Pt};
use crate::layout::instruction::{DrawInstruction, Font};
use crate::model::tag::SignatureImage;
use crate::render::{BackendError, DocumentBackend};

const FIRST_IMAGE_OBJECT: usize = 5;
const RULE_WIDTH: f64 = 0.5;

/// Writes instruction streams as PDF documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfBackend;

impl DocumentBackend for PdfBackend {
    fn render(
        &self,
        page: PageDimensions,
        instructions: &[DrawInstruction],
    ) -> Result<Vec<u8>, BackendError> {
        let images = collect_images(instructions)?;
        let pages = split_pages(instructions);
        let first_page_object = FIRST_IMAGE_OBJECT + images.len();
        let page_ids = (0..pages.len())
            .map(|index| first_page_object + index * 2)
            .collect::<Vec<_>>();

        let mut writer = PdfWriter::new();
        writer.object(1, "<< /Type /Catalog /Pages 2 0 R >>");
        let kids = page_ids
            .iter()
            .map(|id| format!("{id} 0 R"))
            .collect::<Vec<_>>()
            .join(" ");
        writer.object(
            2,
            &format!(
                "<< /Type /Pages /Kids [{kids}] /Count {} >>",
                page_ids.len()
            ),
        );
        writer.object(
            3,
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
        );
        writer.object(
            4,
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
        );

        for (index, image) in images.iter().enumerate() {
            let dict = format!(
                "<< /Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace {} \
                 /BitsPerComponent 8 /Filter /DCTDecode /Length {} >>",
                image.info.width,
                image.info.height,
                image.info.color_space(),
                image.bytes.len()
            );
            writer.stream_object(FIRST_IMAGE_OBJECT + index, &dict, image.bytes);
        }

        let xobjects = (0..images.len())
            .map(|index| format!("/Im{} {} 0 R", index + 1, FIRST_IMAGE_OBJECT + index))
            .collect::<Vec<_>>()
            .join(" ");
        let mut image_cursor = 0usize;
        for (index, page_instructions) in pages.iter().enumerate() {
            let page_id = page_ids[index];
            let content_id = page_id + 1;
            let content = page_content(page, page_instructions, &images, &mut image_cursor);
            writer.object(
                page_id,
                &format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                     /Resources << /Font << /F1 3 0 R /F2 4 0 R >> /XObject << {xobjects} >> >> \
                     /Contents {content_id} 0 R >>",
                    num(page.width),
                    num(page.height)
                ),
            );
            writer.stream_object(
                content_id,
                &format!("<< /Length {} >>", content.len()),
                content.as_bytes(),
            );
        }

        Ok(writer.finish())
    }
}

struct EmbeddedImage<'a> {
    bytes: &'a [u8],
    info: JpegInfo,
}

fn collect_images(instructions: &[DrawInstruction]) -> Result<Vec<EmbeddedImage<'_>>, BackendError> {
    instructions
        .iter()
        .filter_map(|instruction| match instruction {
            DrawInstruction::Image { image, .. } => Some(image),
            _ => None,
        })
        .map(|image: &SignatureImage| {
            let info = jpeg_info(image.bytes()).ok_or_else(|| {
                BackendError::UnsupportedImage(
                    "signature must be a JPEG image for PDF embedding".to_string(),
                )
            })?;
            Ok(EmbeddedImage {
                bytes: image.bytes(),
                info,
            })
        })
        .collect()
}

fn split_pages(instructions: &[DrawInstruction]) -> Vec<&[DrawInstruction]> {
    instructions
        .split(|instruction| matches!(instruction, DrawInstruction::NewPage))
        .collect()
}

fn page_content(
    page: PageDimensions,
    instructions: &[DrawInstruction],
    images: &[EmbeddedImage<'_>],
    image_cursor: &mut usize,
) -> String {
    let mut ops = Vec::new();
    for instruction in instructions {
        match instruction {
            DrawInstruction::Text { x, y, text, style } => {
                let font = match style.font {
                    Font::Regular => "F1",
                    Font::Bold => "F2",
                };
                ops.push(format!(
                    "BT /{font} {} Tf {} {} Td ({}) Tj ET",
                    num(style.size),
                    num(*x),
                    num(page.height - y),
                    escape_text(text)
                ));
            }
            DrawInstruction::Line { x1, y1, x2, y2 } => {
                ops.push(format!(
                    "{} w {} {} m {} {} l S",
                    num(RULE_WIDTH),
                    num(*x1),
                    num(page.height - y1),
                    num(*x2),
                    num(page.height - y2)
                ));
            }
            DrawInstruction::Image {
                x,
                y,
                width,
                height,
                ..
            } => {
                let index = *image_cursor;
                *image_cursor += 1;
                if let Some(image) = images.get(index) {
                    let (draw_width, draw_height) =
                        fit_aspect(image.info.width, image.info.height, *width, *height);
                    ops.push(format!(
                        "q {} 0 0 {} {} {} cm /Im{} Do Q",
                        num(draw_width),
                        num(draw_height),
                        num(*x),
                        num(page.height - (y + height)),
                        index + 1
                    ));
                }
            }
            DrawInstruction::NewPage => {}
        }
    }
    ops.join("\n")
}

fn fit_aspect(pixel_width: u16, pixel_height: u16, box_width: Pt, box_height: Pt) -> (Pt, Pt) {
    let scale = (box_width / f64::from(pixel_width)).min(box_height / f64::from(pixel_height));
    (f64::from(pixel_width) * scale, f64::from(pixel_height) * scale)
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '(' | ')' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            ' '..='~' => escaped.push(ch),
            _ => escaped.push('?'),
        }
    }
    escaped
}

/// Formats a coordinate with two decimals and no trailing zeros.
fn num(value: f64) -> String {
    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct JpegInfo {
    width: u16,
    height: u16,
    components: u8,
}

impl JpegInfo {
    fn color_space(&self) -> &'static str {
        match self.components {
            1 => "/DeviceGray",
            4 => "/DeviceCMYK",
            _ => "/DeviceRGB",
        }
    }
}

/// Reads frame dimensions from the first SOF marker of a JPEG stream.
fn jpeg_info(bytes: &[u8]) -> Option<JpegInfo> {
    if bytes.len() < 4 || bytes[0] != 0xFF || bytes[1] != 0xD8 {
        return None;
    }
    let mut offset = 2;
    while offset + 4 <= bytes.len() {
        if bytes[offset] != 0xFF {
            return None;
        }
        let marker = bytes[offset + 1];
        if marker == 0xFF {
            offset += 1;
            continue;
        }
        let length = usize::from(u16::from_be_bytes([bytes[offset + 2], bytes[offset + 3]]));
        let is_frame = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            let segment = bytes.get(offset + 4..offset + 2 + length)?;
            if segment.len() < 6 {
                return None;
            }
            let height = u16::from_be_bytes([segment[1], segment[2]]);
            let width = u16::from_be_bytes([segment[3], segment[4]]);
            if width == 0 || height == 0 {
                return None;
            }
            return Some(JpegInfo {
                width,
                height,
                components: segment[5],
            });
        }
        offset += 2 + length;
    }
    None
}

struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<(usize, usize)>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    fn object(&mut self, id: usize, body: &str) {
        self.offsets.push((id, self.buf.len()));
        self.buf
            .extend_from_slice(format!("{id} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    fn stream_object(&mut self, id: usize, dict: &str, data: &[u8]) {
        self.offsets.push((id, self.buf.len()));
        self.buf
            .extend_from_slice(format!("{id} 0 obj\n{dict}\nstream\n").as_bytes());
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn finish(mut self) -> Vec<u8> {
        self.offsets.sort_by_key(|(id, _)| *id);
        let xref_offset = self.buf.len();
        let size = self.offsets.len() + 1;
        let mut xref = format!("xref\n0 {size}\n0000000000 65535 f \n");
        for (_, offset) in &self.offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {size} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
        ));
        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::{escape_text, jpeg_info, num, PdfBackend};
    use crate::layout::config::PageSize;
    use crate::layout::instruction::{DrawInstruction, TextStyle};
    use crate::model::tag::SignatureImage;
    use crate::render::{BackendError, DocumentBackend};

    fn tiny_jpeg() -> Vec<u8> {
        vec![
            0xFF, 0xD8, // SOI
            0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, // APP0 stub
            0xFF, 0xC0, 0x00, 0x0B, 0x08, 0x00, 0x20, 0x00, 0x40, 0x01, 0x01, 0x11, 0x00, // SOF0
            0xFF, 0xD9, // EOI
        ]
    }

    fn text(y: f64, value: &str) -> DrawInstruction {
        DrawInstruction::Text {
            x: 40.0,
            y,
            text: value.to_string(),
            style: TextStyle::regular(10.0),
        }
    }

    #[test]
    fn renders_one_page_per_break() {
        let instructions = vec![text(60.0, "first"), DrawInstruction::NewPage, text(60.0, "second")];
        let bytes = PdfBackend
            .render(PageSize::Letter.dimensions(), &instructions)
            .unwrap();
        let body = String::from_utf8_lossy(&bytes);
        assert!(body.starts_with("%PDF-1.4"));
        assert!(body.contains("/Count 2"));
        assert!(body.contains("(first) Tj"));
        assert!(body.contains("40 732 Td"));
        assert!(body.trim_end().ends_with("%%EOF"));
    }

    #[test]
    fn output_is_deterministic() {
        let instructions = vec![text(60.0, "same")];
        let page = PageSize::Letter.dimensions();
        assert_eq!(
            PdfBackend.render(page, &instructions).unwrap(),
            PdfBackend.render(page, &instructions).unwrap()
        );
    }

    #[test]
    fn embeds_jpeg_and_rejects_other_images() {
        assert_eq!(jpeg_info(&tiny_jpeg()).map(|info| (info.width, info.height)), Some((64, 32)));

        let image = |bytes: Vec<u8>| DrawInstruction::Image {
            x: 110.0,
            y: 600.0,
            width: 160.0,
            height: 40.0,
            image: SignatureImage::new(bytes),
        };
        let page = PageSize::Letter.dimensions();
        let bytes = PdfBackend.render(page, &[image(tiny_jpeg())]).unwrap();
        let body = String::from_utf8_lossy(&bytes);
        assert!(body.contains("/Filter /DCTDecode"));
        assert!(body.contains("/Im1 Do"));

        let err = PdfBackend
            .render(page, &[image(b"\x89PNG\r\n\x1a\n".to_vec())])
            .unwrap_err();
        assert!(matches!(err, BackendError::UnsupportedImage(_)));
    }

    #[test]
    fn text_escaping_and_number_format() {
        assert_eq!(escape_text(r"a(b)\c é"), r"a\(b\)\\c ?");
        assert_eq!(num(40.0), "40");
        assert_eq!(num(12.5), "12.5");
        assert_eq!(num(-0.001), "0");
    }
}
