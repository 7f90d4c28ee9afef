//! Fixed-order document assembly with per-page footers.

use crate::document::sections::{
    DescriptionSection, FooterSection, HeaderSection, SignatureSection, TotalsSection,
};
use crate::document::table::CategoryTable;
use crate::document::{GenerationError, LayoutContext, SectionKind, SectionRenderer};
use crate::layout::config::LayoutConfig;
use crate::layout::instruction::DrawInstruction;
use crate::layout::pagination::LayoutCursor;
use crate::model::entry::EntryCategory;
use crate::model::tag::{CategoryTotals, TmTag};
use crate::render::TextMeasurer;
use log::{info, warn};
use rust_decimal::Decimal;

/// Complete instruction stream for one tag.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledDocument {
    pub instructions: Vec<DrawInstruction>,
    /// Sections actually emitted, in document order.
    pub sections: Vec<SectionKind>,
    pub page_count: u32,
    pub totals: CategoryTotals,
    pub grand_total: Decimal,
}

/// Lays out a tag into draw instructions.
pub struct DocumentAssembler<'a> {
    config: &'a LayoutConfig,
    measurer: &'a dyn TextMeasurer,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(config: &'a LayoutConfig, measurer: &'a dyn TextMeasurer) -> Self {
        Self { config, measurer }
    }

    /// Assembles every section of `tag` using the given category totals.
    ///
    /// # Errors
    /// - `InvalidLayout` when the configuration fails validation.
    /// - `Render` when a section's text measurement fails; no instructions
    ///   are returned in that case.
    pub fn assemble(
        &self,
        tag: &TmTag,
        totals: &CategoryTotals,
    ) -> Result<AssembledDocument, GenerationError> {
        self.config
            .validate()
            .map_err(|err| GenerationError::InvalidLayout(err.to_string()))?;

        let ctx = LayoutContext::new(self.config, self.measurer);
        let plan = plan_sections(tag, totals);
        let mut sections = Vec::with_capacity(plan.len() + 1);
        let mut body = Vec::new();
        let mut cursor = ctx.pagination.start();

        for (index, section) in plan.iter().enumerate() {
            if index > 0 {
                cursor = cursor.advanced(self.config.section_gap);
            }
            let output = section
                .render(cursor, &ctx)
                .map_err(|source| render_failed(tag, section.kind(), source))?;
            body.extend(output.instructions);
            cursor = output.cursor;
            sections.push(section.kind());
        }

        let page_count = cursor.page + 1;
        let instructions = with_footers(body, page_count, &ctx)
            .map_err(|source| render_failed(tag, SectionKind::Footer, source))?;
        sections.push(SectionKind::Footer);

        info!(
            "event=document_assemble module=document status=ok tag_id={} sections={} pages={} instructions={}",
            tag.id,
            sections.len(),
            page_count,
            instructions.len()
        );

        Ok(AssembledDocument {
            instructions,
            sections,
            page_count,
            totals: *totals,
            grand_total: totals.grand_total(),
        })
    }
}

fn render_failed(
    tag: &TmTag,
    section: SectionKind,
    source: crate::render::MeasureError,
) -> GenerationError {
    warn!(
        "event=document_assemble module=document status=error tag_id={} section={}",
        tag.id, section
    );
    GenerationError::Render { section, source }
}

/// Flowing sections in document order; empty ones are left out.
fn plan_sections<'t>(
    tag: &'t TmTag,
    totals: &CategoryTotals,
) -> Vec<Box<dyn SectionRenderer + 't>> {
    let mut plan: Vec<Box<dyn SectionRenderer + 't>> = vec![Box::new(HeaderSection::new(tag))];
    if !tag.description.trim().is_empty() {
        plan.push(Box::new(DescriptionSection::new(&tag.description)));
    }
    for category in EntryCategory::ALL {
        if tag.is_category_empty(category) {
            continue;
        }
        let total = totals.for_category(category);
        let table: Box<dyn SectionRenderer + 't> = match category {
            EntryCategory::Labor => Box::new(CategoryTable::new(tag.labor_entries(), total)),
            EntryCategory::Material => {
                Box::new(CategoryTable::new(tag.material_entries(), total))
            }
            EntryCategory::Equipment => {
                Box::new(CategoryTable::new(tag.equipment_entries(), total))
            }
            EntryCategory::Other => Box::new(CategoryTable::new(tag.other_entries(), total)),
        };
        plan.push(table);
    }
    plan.push(Box::new(TotalsSection::new(totals.grand_total())));
    plan.push(Box::new(SignatureSection::new(tag)));
    plan
}

/// Inserts one footer at the end of every page.
fn with_footers(
    body: Vec<DrawInstruction>,
    page_count: u32,
    ctx: &LayoutContext<'_>,
) -> Result<Vec<DrawInstruction>, crate::render::MeasureError> {
    let footer = FooterSection::new(&ctx.config.footer_text, page_count);
    let mut instructions = Vec::with_capacity(body.len() + page_count as usize * 3);
    let mut page_cursor = ctx.pagination.start();

    for instruction in body {
        if instruction == DrawInstruction::NewPage {
            instructions.extend(footer.render(page_cursor, ctx)?.instructions);
            page_cursor = LayoutCursor {
                page: page_cursor.page + 1,
                ..page_cursor
            };
        }
        instructions.push(instruction);
    }
    instructions.extend(footer.render(page_cursor, ctx)?.instructions);
    Ok(instructions)
}

#[cfg(test)]
mod tests {
    use super::DocumentAssembler;
    use crate::document::{GenerationError, SectionKind};
    use crate::layout::config::LayoutConfig;
    use crate::layout::instruction::{DrawInstruction, TextStyle};
    use crate::model::entry::{EntryCategory, LaborEntry};
    use crate::model::tag::TmTag;
    use crate::render::{HelveticaMetrics, MeasureError, TextMeasurer};

    struct FailingMeasurer;

    impl TextMeasurer for FailingMeasurer {
        fn text_width(&self, _text: &str, _style: &TextStyle) -> Result<f64, MeasureError> {
            Err(MeasureError::new("font service unavailable"))
        }
    }

    fn labor_tag() -> TmTag {
        let mut tag = TmTag::new("2026-03-02");
        tag.edit_entries(|labor: &mut Vec<LaborEntry>| {
            let mut entry = LaborEntry::blank("2026-03-02");
            entry.set_st_hours(8u32);
            labor.push(entry);
        });
        tag
    }

    #[test]
    fn one_page_document_gets_one_footer() {
        let config = LayoutConfig::default();
        let tag = labor_tag();
        let document = DocumentAssembler::new(&config, &HelveticaMetrics)
            .assemble(&tag, &tag.category_totals())
            .unwrap();

        assert_eq!(document.page_count, 1);
        assert_eq!(
            document.sections,
            vec![
                SectionKind::Header,
                SectionKind::CategoryTable(EntryCategory::Labor),
                SectionKind::Totals,
                SectionKind::Signature,
                SectionKind::Footer,
            ]
        );
        let footers = document
            .instructions
            .iter()
            .filter(|instruction| instruction.text() == Some("Page 1 of 1"))
            .count();
        assert_eq!(footers, 1);
        assert!(!document.instructions.contains(&DrawInstruction::NewPage));
    }

    #[test]
    fn measurer_failure_fails_whole_assembly() {
        let config = LayoutConfig::default();
        let tag = labor_tag();
        let err = DocumentAssembler::new(&config, &FailingMeasurer)
            .assemble(&tag, &tag.category_totals())
            .unwrap_err();
        match err {
            GenerationError::Render { section, .. } => assert_eq!(section, SectionKind::Header),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn invalid_layout_is_rejected_before_rendering() {
        let config = LayoutConfig {
            row_height: 0.0,
            ..LayoutConfig::default()
        };
        let tag = labor_tag();
        let err = DocumentAssembler::new(&config, &HelveticaMetrics)
            .assemble(&tag, &tag.category_totals())
            .unwrap_err();
        assert!(matches!(err, GenerationError::InvalidLayout(_)));
        assert!(err.reason().contains("row_height"));
    }
}
