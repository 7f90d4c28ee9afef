//! Category entry tables.
//!
//! # Responsibility
//! - Describe the column layout of each category table as static data.
//! - Render one category's rows with header repetition across page breaks.
//!
//! # Invariants
//! - A caption is never stranded: caption, header row and first data row
//!   are reserved together.
//! - Every page a table continues on starts with its header row.
//! - Cell text never exceeds its column width.

use crate::document::sections::{baseline, text};
use crate::document::{LayoutContext, SectionKind, SectionOutput, SectionRenderer};
use crate::layout::config::Pt;
use crate::layout::instruction::{DrawInstruction, TextStyle};
use crate::layout::pagination::LayoutCursor;
use crate::layout::text_flow::fit_to_width;
use crate::model::entry::{
    Entry, EntryCategory, EquipmentEntry, LaborEntry, MaterialEntry, OtherEntry,
};
use crate::model::numeric::format_two_places;
use crate::model::tag::TagEntry;
use crate::render::MeasureError;
use rust_decimal::Decimal;

/// Content width the column offsets are laid out against.
///
/// Offsets scale linearly when the configured content width differs.
pub const REFERENCE_WIDTH: Pt = 532.0;

/// Horizontal padding kept free at the right edge of every cell.
const CELL_PADDING: Pt = 4.0;

/// One table column.
pub struct Column<E: 'static> {
    pub header: &'static str,
    pub offset: Pt,
    pub width: Pt,
    pub cell: fn(&E) -> String,
}

/// Static layout of one category table.
pub struct CategoryTableSpec<E: 'static> {
    pub category: EntryCategory,
    pub columns: &'static [Column<E>],
    /// Index of the column the category total is printed under.
    pub total_column: usize,
    pub total_label: &'static str,
}

/// Entry types with a table layout.
pub trait Tabular: TagEntry + 'static {
    fn table_spec() -> &'static CategoryTableSpec<Self>;
}

fn name<E: Entry>(entry: &E) -> String {
    entry.name().to_string()
}

fn date_of_work<E: Entry>(entry: &E) -> String {
    entry.date_of_work().to_string()
}

fn total<E: Entry>(entry: &E) -> String {
    format_two_places(entry.total())
}

fn classification(entry: &LaborEntry) -> String {
    entry.classification().to_string()
}

fn st_hours(entry: &LaborEntry) -> String {
    format_two_places(entry.st_hours())
}

fn ot_hours(entry: &LaborEntry) -> String {
    format_two_places(entry.ot_hours())
}

fn dt_hours(entry: &LaborEntry) -> String {
    format_two_places(entry.dt_hours())
}

fn pot_hours(entry: &LaborEntry) -> String {
    format_two_places(entry.pot_hours())
}

fn material_unit_cost(entry: &MaterialEntry) -> String {
    format_two_places(entry.unit_cost())
}

fn material_quantity(entry: &MaterialEntry) -> String {
    format_two_places(entry.quantity())
}

fn other_unit_cost(entry: &OtherEntry) -> String {
    format_two_places(entry.unit_cost())
}

fn other_quantity(entry: &OtherEntry) -> String {
    format_two_places(entry.quantity())
}

fn equipment_pieces(entry: &EquipmentEntry) -> String {
    format_two_places(entry.pieces_of_equipment())
}

fn equipment_quantity(entry: &EquipmentEntry) -> String {
    format_two_places(entry.quantity())
}

static LABOR_TABLE: CategoryTableSpec<LaborEntry> = CategoryTableSpec {
    category: EntryCategory::Labor,
    columns: &[
        Column { header: "Name", offset: 0.0, width: 130.0, cell: name },
        Column { header: "Class", offset: 130.0, width: 80.0, cell: classification },
        Column { header: "ST", offset: 210.0, width: 45.0, cell: st_hours },
        Column { header: "OT", offset: 255.0, width: 45.0, cell: ot_hours },
        Column { header: "DT", offset: 300.0, width: 45.0, cell: dt_hours },
        Column { header: "POT", offset: 345.0, width: 45.0, cell: pot_hours },
        Column { header: "Total Hrs", offset: 390.0, width: 60.0, cell: total },
        Column { header: "Date", offset: 450.0, width: 82.0, cell: date_of_work },
    ],
    total_column: 6,
    total_label: "Labor Total Hours",
};

static MATERIAL_TABLE: CategoryTableSpec<MaterialEntry> = CategoryTableSpec {
    category: EntryCategory::Material,
    columns: &[
        Column { header: "Name", offset: 0.0, width: 200.0, cell: name },
        Column { header: "Unit Cost", offset: 200.0, width: 80.0, cell: material_unit_cost },
        Column { header: "Qty", offset: 280.0, width: 70.0, cell: material_quantity },
        Column { header: "Total", offset: 350.0, width: 90.0, cell: total },
        Column { header: "Date", offset: 440.0, width: 92.0, cell: date_of_work },
    ],
    total_column: 3,
    total_label: "Materials Total",
};

static EQUIPMENT_TABLE: CategoryTableSpec<EquipmentEntry> = CategoryTableSpec {
    category: EntryCategory::Equipment,
    columns: &[
        Column { header: "Name", offset: 0.0, width: 200.0, cell: name },
        Column { header: "Pieces", offset: 200.0, width: 80.0, cell: equipment_pieces },
        Column { header: "Qty", offset: 280.0, width: 70.0, cell: equipment_quantity },
        Column { header: "Total", offset: 350.0, width: 90.0, cell: total },
        Column { header: "Date", offset: 440.0, width: 92.0, cell: date_of_work },
    ],
    total_column: 3,
    total_label: "Equipment Total",
};

static OTHER_TABLE: CategoryTableSpec<OtherEntry> = CategoryTableSpec {
    category: EntryCategory::Other,
    columns: &[
        Column { header: "Name", offset: 0.0, width: 200.0, cell: name },
        Column { header: "Unit Cost", offset: 200.0, width: 80.0, cell: other_unit_cost },
        Column { header: "Qty", offset: 280.0, width: 70.0, cell: other_quantity },
        Column { header: "Total", offset: 350.0, width: 90.0, cell: total },
        Column { header: "Date", offset: 440.0, width: 92.0, cell: date_of_work },
    ],
    total_column: 3,
    total_label: "Other Total",
};

impl Tabular for LaborEntry {
    fn table_spec() -> &'static CategoryTableSpec<Self> {
        &LABOR_TABLE
    }
}

impl Tabular for MaterialEntry {
    fn table_spec() -> &'static CategoryTableSpec<Self> {
        &MATERIAL_TABLE
    }
}

impl Tabular for EquipmentEntry {
    fn table_spec() -> &'static CategoryTableSpec<Self> {
        &EQUIPMENT_TABLE
    }
}

impl Tabular for OtherEntry {
    fn table_spec() -> &'static CategoryTableSpec<Self> {
        &OTHER_TABLE
    }
}

/// Renders one category's entries and subtotal.
pub struct CategoryTable<'a, E: Tabular> {
    entries: &'a [E],
    total: Decimal,
}

impl<'a, E: Tabular> CategoryTable<'a, E> {
    pub fn new(entries: &'a [E], total: Decimal) -> Self {
        Self { entries, total }
    }

    fn scale(ctx: &LayoutContext<'_>) -> Pt {
        ctx.config.content_width() / REFERENCE_WIDTH
    }

    fn push_cell(
        &self,
        out: &mut Vec<DrawInstruction>,
        ctx: &LayoutContext<'_>,
        top: Pt,
        column: &Column<E>,
        value: &str,
        style: TextStyle,
    ) -> Result<(), MeasureError> {
        let scale = Self::scale(ctx);
        let width = (column.width * scale - CELL_PADDING).max(0.0);
        let fitted = fit_to_width(value, width, &style, ctx.measurer)?;
        if fitted.is_empty() {
            return Ok(());
        }
        out.push(text(
            ctx.config.margin_left + column.offset * scale,
            baseline(top, ctx.config.row_height),
            fitted,
            style,
        ));
        Ok(())
    }

    fn header_row(
        &self,
        cursor: LayoutCursor,
        ctx: &LayoutContext<'_>,
        out: &mut Vec<DrawInstruction>,
    ) -> Result<LayoutCursor, MeasureError> {
        let cfg = ctx.config;
        let style = TextStyle::bold(cfg.table_font_size);
        for column in E::table_spec().columns {
            self.push_cell(out, ctx, cursor.y, column, column.header, style)?;
        }
        let rule_y = cursor.y + cfg.row_height;
        out.push(DrawInstruction::Line {
            x1: cfg.margin_left,
            y1: rule_y,
            x2: cfg.content_right(),
            y2: rule_y,
        });
        Ok(cursor.advanced(cfg.row_height))
    }

    /// Moves to a new page with a repeated header when one more row does
    /// not fit.
    fn ensure_row(
        &self,
        cursor: LayoutCursor,
        ctx: &LayoutContext<'_>,
        out: &mut Vec<DrawInstruction>,
    ) -> Result<LayoutCursor, MeasureError> {
        if ctx.pagination.fits(cursor, ctx.config.row_height) {
            return Ok(cursor);
        }
        let next = ctx.pagination.break_page(cursor, out);
        self.header_row(next, ctx, out)
    }
}

impl<E: Tabular> SectionRenderer for CategoryTable<'_, E> {
    fn kind(&self) -> SectionKind {
        SectionKind::CategoryTable(E::table_spec().category)
    }

    fn render(
        &self,
        cursor: LayoutCursor,
        ctx: &LayoutContext<'_>,
    ) -> Result<SectionOutput, MeasureError> {
        let cfg = ctx.config;
        let spec = E::table_spec();
        let mut instructions = Vec::new();

        let keep_together = cfg.line_height + cfg.row_height * 2.0;
        let (mut cursor, _) = ctx
            .pagination
            .reserve(cursor, keep_together, &mut instructions);
        instructions.push(text(
            cfg.margin_left,
            baseline(cursor.y, cfg.line_height),
            spec.category.label().to_uppercase(),
            TextStyle::bold(cfg.body_font_size),
        ));
        cursor = cursor.advanced(cfg.line_height);
        cursor = self.header_row(cursor, ctx, &mut instructions)?;

        let cell_style = TextStyle::regular(cfg.table_font_size);
        for entry in self.entries {
            cursor = self.ensure_row(cursor, ctx, &mut instructions)?;
            for column in spec.columns {
                let value = (column.cell)(entry);
                self.push_cell(&mut instructions, ctx, cursor.y, column, &value, cell_style)?;
            }
            cursor = cursor.advanced(cfg.row_height);
        }

        cursor = self.ensure_row(cursor, ctx, &mut instructions)?;
        instructions.push(DrawInstruction::Line {
            x1: cfg.margin_left,
            y1: cursor.y,
            x2: cfg.content_right(),
            y2: cursor.y,
        });
        let total_style = TextStyle::bold(cfg.table_font_size);
        let label_column = Column::<E> {
            header: spec.total_label,
            offset: 0.0,
            width: spec.columns[..spec.total_column]
                .iter()
                .map(|column| column.width)
                .sum(),
            cell: |_| String::new(),
        };
        self.push_cell(
            &mut instructions,
            ctx,
            cursor.y,
            &label_column,
            spec.total_label,
            total_style,
        )?;
        if let Some(column) = spec.columns.get(spec.total_column) {
            self.push_cell(
                &mut instructions,
                ctx,
                cursor.y,
                column,
                &format_two_places(self.total),
                total_style,
            )?;
        }
        cursor = cursor.advanced(cfg.row_height);

        Ok(SectionOutput {
            instructions,
            cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CategoryTable, Tabular};
    use crate::document::{LayoutContext, SectionRenderer};
    use crate::layout::config::LayoutConfig;
    use crate::layout::instruction::DrawInstruction;
    use crate::model::entry::{EquipmentEntry, LaborEntry, MaterialEntry};
    use rust_decimal::Decimal;

    fn texts(instructions: &[DrawInstruction]) -> Vec<&str> {
        instructions.iter().filter_map(DrawInstruction::text).collect()
    }

    #[test]
    fn column_layouts_fit_reference_width() {
        fn check<E: Tabular>() {
            let spec = E::table_spec();
            let mut expected_offset = 0.0;
            for column in spec.columns {
                assert_eq!(column.offset, expected_offset, "{}", column.header);
                expected_offset += column.width;
            }
            assert_eq!(expected_offset, super::REFERENCE_WIDTH);
            assert!(spec.total_column < spec.columns.len());
        }
        check::<LaborEntry>();
        check::<MaterialEntry>();
        check::<EquipmentEntry>();
    }

    #[test]
    fn material_row_prints_two_place_values() {
        let config = LayoutConfig::default();
        let ctx = LayoutContext::new(&config, &crate::render::HelveticaMetrics);
        let mut pipe = MaterialEntry::blank("2026-03-02");
        pipe.set_name("Pipe");
        pipe.set_quantity(4u32);
        pipe.set_unit_cost(12.5);

        let entries = vec![pipe];
        let output = CategoryTable::new(&entries, Decimal::new(50, 0))
            .render(ctx.pagination.start(), &ctx)
            .unwrap();
        let texts = texts(&output.instructions);
        assert_eq!(texts[0], "MATERIALS");
        assert_eq!(
            &texts[1..6],
            &["Name", "Unit Cost", "Qty", "Total", "Date"]
        );
        assert_eq!(&texts[6..11], &["Pipe", "12.50", "4.00", "50.00", "2026-03-02"]);
        assert_eq!(&texts[11..], &["Materials Total", "50.00"]);
    }

    #[test]
    fn header_repeats_after_page_break() {
        let config = LayoutConfig::default();
        let ctx = LayoutContext::new(&config, &crate::render::HelveticaMetrics);
        let entries: Vec<LaborEntry> = (0..60)
            .map(|index| {
                let mut entry = LaborEntry::blank("2026-03-02");
                entry.set_name(format!("Worker {index}"));
                entry.set_st_hours(8u32);
                entry
            })
            .collect();

        let output = CategoryTable::new(&entries, Decimal::new(480, 0))
            .render(ctx.pagination.start(), &ctx)
            .unwrap();
        let breaks: Vec<usize> = output
            .instructions
            .iter()
            .enumerate()
            .filter(|(_, instruction)| matches!(instruction, DrawInstruction::NewPage))
            .map(|(index, _)| index)
            .collect();
        assert_eq!(breaks.len(), 1);
        assert_eq!(output.instructions[breaks[0] + 1].text(), Some("Name"));
        assert_eq!(output.cursor.page, 1);
        for instruction in &output.instructions {
            if let Some(y) = instruction.max_y() {
                assert!(y <= config.flow_limit());
            }
        }
    }
}
