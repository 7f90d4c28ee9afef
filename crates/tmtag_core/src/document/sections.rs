//! Header, description, totals, signature and footer sections.

use crate::document::{LayoutContext, SectionKind, SectionOutput, SectionRenderer};
use crate::layout::config::Pt;
use crate::layout::instruction::{DrawInstruction, TextStyle};
use crate::layout::pagination::LayoutCursor;
use crate::layout::text_flow::{fit_to_width, wrap};
use crate::model::numeric::format_two_places;
use crate::model::tag::{SignatureImage, TmTag};
use crate::render::MeasureError;
use rust_decimal::Decimal;

/// Horizontal offset of signature/date rules from the left margin.
const RULE_INDENT: Pt = 70.0;

/// Baseline of a line of text occupying `[top, top + line_height]`.
pub(crate) fn baseline(top: Pt, line_height: Pt) -> Pt {
    top + line_height * 0.75
}

pub(crate) fn text(x: Pt, y: Pt, value: impl Into<String>, style: TextStyle) -> DrawInstruction {
    DrawInstruction::Text {
        x,
        y,
        text: value.into(),
        style,
    }
}

/// Title block plus tag metadata.
pub struct HeaderSection<'a> {
    tag: &'a TmTag,
}

impl<'a> HeaderSection<'a> {
    pub fn new(tag: &'a TmTag) -> Self {
        Self { tag }
    }

    /// Metadata lines actually printed; blank optional values are skipped.
    fn metadata_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Project: {}", self.tag.project_ref),
            format!("Cost Code: {}", self.tag.cost_code),
            format!("Date: {}", self.tag.date_of_work),
            format!("Tag: {}", self.tag.title),
        ];
        if let Some(reference) = self
            .tag
            .customer_ref
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            lines.push(format!("Customer Ref: {reference}"));
        }
        lines
    }
}

impl SectionRenderer for HeaderSection<'_> {
    fn kind(&self) -> SectionKind {
        SectionKind::Header
    }

    fn render(
        &self,
        cursor: LayoutCursor,
        ctx: &LayoutContext<'_>,
    ) -> Result<SectionOutput, MeasureError> {
        let cfg = ctx.config;
        let lines = self.metadata_lines();
        let height = cfg.title_line_height * 2.0 + cfg.line_height * lines.len() as f64;

        let mut instructions = Vec::new();
        let (mut cursor, _) = ctx.pagination.reserve(cursor, height, &mut instructions);

        instructions.push(text(
            cfg.margin_left,
            baseline(cursor.y, cfg.title_line_height),
            cfg.title.as_str(),
            TextStyle::bold(cfg.title_font_size),
        ));
        cursor = cursor.advanced(cfg.title_line_height);
        instructions.push(text(
            cfg.margin_left,
            baseline(cursor.y, cfg.title_line_height),
            cfg.subtitle.as_str(),
            TextStyle::regular(cfg.body_font_size),
        ));
        cursor = cursor.advanced(cfg.title_line_height);

        let style = TextStyle::regular(cfg.body_font_size);
        for line in lines {
            let fitted = fit_to_width(&line, cfg.content_width(), &style, ctx.measurer)?;
            instructions.push(text(
                cfg.margin_left,
                baseline(cursor.y, cfg.line_height),
                fitted,
                style,
            ));
            cursor = cursor.advanced(cfg.line_height);
        }

        Ok(SectionOutput {
            instructions,
            cursor,
        })
    }
}

/// Free-form work description, wrapped to the content width.
pub struct DescriptionSection<'a> {
    text: &'a str,
}

impl<'a> DescriptionSection<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl SectionRenderer for DescriptionSection<'_> {
    fn kind(&self) -> SectionKind {
        SectionKind::Description
    }

    fn render(
        &self,
        cursor: LayoutCursor,
        ctx: &LayoutContext<'_>,
    ) -> Result<SectionOutput, MeasureError> {
        let cfg = ctx.config;
        let style = TextStyle::regular(cfg.body_font_size);
        let lines = wrap(self.text, cfg.content_width(), &style, ctx.measurer)?;

        let mut instructions = Vec::new();
        let mut cursor = cursor;
        for line in lines {
            cursor = ctx
                .pagination
                .reserve(cursor, cfg.line_height, &mut instructions)
                .0;
            instructions.push(text(
                cfg.margin_left,
                baseline(cursor.y, cfg.line_height),
                line,
                style,
            ));
            cursor = cursor.advanced(cfg.line_height);
        }

        Ok(SectionOutput {
            instructions,
            cursor,
        })
    }
}

/// Emphasized grand total line.
pub struct TotalsSection {
    grand_total: Decimal,
}

impl TotalsSection {
    pub fn new(grand_total: Decimal) -> Self {
        Self { grand_total }
    }
}

impl SectionRenderer for TotalsSection {
    fn kind(&self) -> SectionKind {
        SectionKind::Totals
    }

    fn render(
        &self,
        cursor: LayoutCursor,
        ctx: &LayoutContext<'_>,
    ) -> Result<SectionOutput, MeasureError> {
        let cfg = ctx.config;
        let mut instructions = Vec::new();
        let (cursor, _) = ctx
            .pagination
            .reserve(cursor, cfg.title_line_height, &mut instructions);
        instructions.push(text(
            cfg.margin_left,
            baseline(cursor.y, cfg.title_line_height),
            format!("Grand Total: {}", format_two_places(self.grand_total)),
            TextStyle::bold(cfg.body_font_size + 2.0),
        ));

        Ok(SectionOutput {
            instructions,
            cursor: cursor.advanced(cfg.title_line_height),
        })
    }
}

/// Signature and date rules, with the captured image when present.
pub struct SignatureSection<'a> {
    image: Option<&'a SignatureImage>,
    signer_name: &'a str,
    signer_title: &'a str,
}

impl<'a> SignatureSection<'a> {
    pub fn new(tag: &'a TmTag) -> Self {
        Self {
            image: tag.signature.as_ref(),
            signer_name: tag.signer_name.trim(),
            signer_title: tag.signer_title.trim(),
        }
    }

    fn signer_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.signer_name.is_empty() {
            lines.push(format!("Name: {}", self.signer_name));
        }
        if !self.signer_title.is_empty() {
            lines.push(format!("Title: {}", self.signer_title));
        }
        lines
    }
}

impl SectionRenderer for SignatureSection<'_> {
    fn kind(&self) -> SectionKind {
        SectionKind::Signature
    }

    fn render(
        &self,
        cursor: LayoutCursor,
        ctx: &LayoutContext<'_>,
    ) -> Result<SectionOutput, MeasureError> {
        let cfg = ctx.config;
        let signer_lines = self.signer_lines();
        let height = cfg.signature_block_height(signer_lines.len());

        let mut instructions = Vec::new();
        let (top, _) = ctx.pagination.reserve(cursor, height, &mut instructions);
        let rule_start = cfg.margin_left + RULE_INDENT;
        let rule_end = rule_start + cfg.signature_image_width;
        let label_style = TextStyle::regular(cfg.body_font_size);

        if let Some(image) = self.image {
            instructions.push(DrawInstruction::Image {
                x: rule_start,
                y: top.y,
                width: cfg.signature_image_width,
                height: cfg.signature_image_height,
                image: image.clone(),
            });
        }

        let mut row = top.advanced(cfg.signature_image_height);
        let signature_y = baseline(row.y, cfg.line_height);
        instructions.push(text(cfg.margin_left, signature_y, "Signature:", label_style));
        instructions.push(DrawInstruction::Line {
            x1: rule_start,
            y1: signature_y,
            x2: rule_end,
            y2: signature_y,
        });
        row = row.advanced(cfg.line_height);

        for line in signer_lines {
            let fitted = fit_to_width(
                &line,
                cfg.content_right() - rule_start,
                &label_style,
                ctx.measurer,
            )?;
            instructions.push(text(
                rule_start,
                baseline(row.y, cfg.line_height),
                fitted,
                label_style,
            ));
            row = row.advanced(cfg.line_height);
        }

        let date_y = baseline(row.y, cfg.line_height);
        instructions.push(text(cfg.margin_left, date_y, "Date:", label_style));
        instructions.push(DrawInstruction::Line {
            x1: rule_start,
            y1: date_y,
            x2: rule_end,
            y2: date_y,
        });

        Ok(SectionOutput {
            instructions,
            cursor: top.advanced(height),
        })
    }
}

/// Attribution and page number at a fixed position on one page.
///
/// The footer does not flow: it ignores the cursor's y and returns it
/// unchanged.
pub struct FooterSection<'a> {
    attribution: &'a str,
    page_count: u32,
}

impl<'a> FooterSection<'a> {
    pub fn new(attribution: &'a str, page_count: u32) -> Self {
        Self {
            attribution,
            page_count,
        }
    }
}

impl SectionRenderer for FooterSection<'_> {
    fn kind(&self) -> SectionKind {
        SectionKind::Footer
    }

    fn render(
        &self,
        cursor: LayoutCursor,
        ctx: &LayoutContext<'_>,
    ) -> Result<SectionOutput, MeasureError> {
        let cfg = ctx.config;
        let style = TextStyle::regular(cfg.footer_font_size);
        let y = cfg.footer_baseline();
        let page_label = format!("Page {} of {}", cursor.page + 1, self.page_count);
        let label_width = ctx.measurer.text_width(&page_label, &style)?;
        let attribution = fit_to_width(
            self.attribution,
            cfg.content_width() - label_width - RULE_INDENT,
            &style,
            ctx.measurer,
        )?;

        Ok(SectionOutput {
            instructions: vec![
                text(cfg.margin_left, y, attribution, style),
                text(cfg.content_right() - label_width, y, page_label, style),
            ],
            cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DescriptionSection, FooterSection, HeaderSection, SignatureSection};
    use crate::document::{LayoutContext, SectionRenderer};
    use crate::layout::config::LayoutConfig;
    use crate::layout::instruction::DrawInstruction;
    use crate::model::tag::{SignatureImage, TmTag};
    use crate::render::HelveticaMetrics;

    fn texts(instructions: &[DrawInstruction]) -> Vec<&str> {
        instructions.iter().filter_map(DrawInstruction::text).collect()
    }

    #[test]
    fn header_skips_blank_customer_ref_without_gap() {
        let config = LayoutConfig::default();
        let ctx = LayoutContext::new(&config, &HelveticaMetrics);
        let mut tag = TmTag::new("2026-03-02");
        tag.project_ref = "P-100".to_string();

        let start = ctx.pagination.start();
        let without = HeaderSection::new(&tag).render(start, &ctx).unwrap();
        assert_eq!(texts(&without.instructions).len(), 6);
        assert_eq!(without.cursor.y - start.y, 40.0 + 4.0 * 14.0);

        tag.customer_ref = Some("PO-77".to_string());
        let with = HeaderSection::new(&tag).render(start, &ctx).unwrap();
        assert_eq!(texts(&with.instructions).last(), Some(&"Customer Ref: PO-77"));
        assert_eq!(with.cursor.y - without.cursor.y, 14.0);
    }

    #[test]
    fn description_advances_by_line_count() {
        let config = LayoutConfig::default();
        let ctx = LayoutContext::new(&config, &HelveticaMetrics);
        let start = ctx.pagination.start();
        let output = DescriptionSection::new("Pulled wire through conduit in rooms 101 and 102.")
            .render(start, &ctx)
            .unwrap();
        assert_eq!(output.instructions.len(), 1);
        assert_eq!(output.cursor.y - start.y, config.line_height);
    }

    #[test]
    fn signature_without_image_draws_only_rules() {
        let config = LayoutConfig::default();
        let ctx = LayoutContext::new(&config, &HelveticaMetrics);
        let mut tag = TmTag::new("2026-03-02");
        let start = ctx.pagination.start();

        let blank = SignatureSection::new(&tag).render(start, &ctx).unwrap();
        assert!(!blank
            .instructions
            .iter()
            .any(|instruction| matches!(instruction, DrawInstruction::Image { .. })));
        let rules = blank
            .instructions
            .iter()
            .filter(|instruction| matches!(instruction, DrawInstruction::Line { .. }))
            .count();
        assert_eq!(rules, 2);

        tag.signature = Some(SignatureImage::new(vec![0xFF, 0xD8]));
        tag.signer_name = "R. Ortiz".to_string();
        let signed = SignatureSection::new(&tag).render(start, &ctx).unwrap();
        assert!(matches!(
            signed.instructions[0],
            DrawInstruction::Image { .. }
        ));
        assert!(texts(&signed.instructions).contains(&"Name: R. Ortiz"));
        assert_eq!(signed.cursor.y - blank.cursor.y, config.line_height);
    }

    #[test]
    fn footer_sits_on_page_bottom_and_keeps_cursor() {
        let config = LayoutConfig::default();
        let ctx = LayoutContext::new(&config, &HelveticaMetrics);
        let start = ctx.pagination.start();
        let output = FooterSection::new("Generated by TM Tag", 3)
            .render(start, &ctx)
            .unwrap();
        assert_eq!(output.cursor, start);
        assert_eq!(texts(&output.instructions), vec!["Generated by TM Tag", "Page 1 of 3"]);
        for instruction in &output.instructions {
            assert_eq!(instruction.max_y(), Some(config.page_bottom()));
        }
    }
}
