//! Property tests for aggregation and layout invariants.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tmtag_core::layout::text_flow::wrap;
use tmtag_core::{
    recompute, recompute_tag, DocumentAssembler, DrawInstruction, Entry, HelveticaMetrics,
    LaborEntry, LayoutConfig, MaterialEntry, TagService, TextMeasurer, TextStyle, TmTag,
};

#[derive(Debug, Clone)]
enum EditOp {
    Add { quantity: u32, cents: u32 },
    Update { slot: usize, quantity: u32, cents: u32 },
    Remove { slot: usize },
}

fn edit_op() -> impl Strategy<Value = EditOp> {
    prop_oneof![
        (0u32..500, 0u32..100_000).prop_map(|(quantity, cents)| EditOp::Add { quantity, cents }),
        (any::<usize>(), 0u32..500, 0u32..100_000).prop_map(|(slot, quantity, cents)| {
            EditOp::Update {
                slot,
                quantity,
                cents,
            }
        }),
        any::<usize>().prop_map(|slot| EditOp::Remove { slot }),
    ]
}

fn apply(service: &mut TagService, op: &EditOp) {
    let today = chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let ids = service
        .tag()
        .material_entries()
        .iter()
        .map(Entry::id)
        .collect::<Vec<_>>();
    match *op {
        EditOp::Add { quantity, cents } => {
            let id = service.add_entry::<MaterialEntry>(today);
            service
                .update_entry::<MaterialEntry>(id, |entry| {
                    entry.set_quantity(quantity);
                    entry.set_unit_cost(Decimal::new(i64::from(cents), 2));
                })
                .unwrap();
        }
        EditOp::Update {
            slot,
            quantity,
            cents,
        } if !ids.is_empty() => {
            service
                .update_entry::<MaterialEntry>(ids[slot % ids.len()], |entry| {
                    entry.set_quantity(quantity);
                    entry.set_unit_cost(Decimal::new(i64::from(cents), 2));
                })
                .unwrap();
        }
        EditOp::Remove { slot } if !ids.is_empty() => {
            service
                .remove_entry::<MaterialEntry>(ids[slot % ids.len()])
                .unwrap();
        }
        _ => {}
    }
}

fn labor_rows(count: usize) -> Vec<LaborEntry> {
    (0..count)
        .map(|index| {
            let mut entry = LaborEntry::blank("2026-03-02");
            entry.set_name(format!("Worker {index}"));
            entry.set_st_hours(8u32);
            entry
        })
        .collect()
}

fn material_rows(count: usize) -> Vec<MaterialEntry> {
    (0..count)
        .map(|index| {
            let mut entry = MaterialEntry::blank("2026-03-02");
            entry.set_name(format!("Item {index}"));
            entry.set_quantity(1u32);
            entry.set_unit_cost(index as u32);
            entry
        })
        .collect()
}

proptest! {
    #[test]
    fn category_total_matches_entry_sum_after_any_edits(
        ops in prop::collection::vec(edit_op(), 0..40)
    ) {
        let mut service = TagService::new(TmTag::new("2026-03-02"));
        for op in &ops {
            apply(&mut service, op);
            let entries = service.tag().material_entries();
            let sum = entries
                .iter()
                .fold(Decimal::ZERO, |sum, entry| sum + entry.total());
            prop_assert_eq!(service.totals().materials, sum);
            prop_assert_eq!(recompute(entries).category_total, sum);
            prop_assert_eq!(service.grand_total(), service.totals().grand_total());
        }
    }

    #[test]
    fn recompute_is_idempotent(
        hours in prop::collection::vec((0u32..24, 0u32..24, 0u32..24, 0u32..24), 0..30)
    ) {
        let entries = hours
            .iter()
            .map(|&(st, ot, dt, pot)| {
                let mut entry = LaborEntry::blank("2026-03-02");
                entry.set_st_hours(st);
                entry.set_ot_hours(ot);
                entry.set_dt_hours(dt);
                entry.set_pot_hours(pot);
                entry
            })
            .collect::<Vec<_>>();
        let first = recompute(&entries);
        let second = recompute(&entries);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            first.category_total.to_string(),
            second.category_total.to_string()
        );

        let mut tag = TmTag::new("2026-03-02");
        tag.replace_entries(entries);
        prop_assert_eq!(recompute_tag(&tag), tag.category_totals());
    }

    #[test]
    fn wrapped_lines_fit_or_hold_one_long_word(
        words in prop::collection::vec("[a-zA-Z0-9]{1,24}", 0..60),
        separators in prop::collection::vec("[ \t\n]{1,3}", 60),
        max_width in 10.0f64..400.0,
    ) {
        let text = words
            .iter()
            .zip(&separators)
            .map(|(word, separator)| format!("{word}{separator}"))
            .collect::<String>();
        let style = TextStyle::regular(10.0);
        let lines = wrap(&text, max_width, &style, &HelveticaMetrics).unwrap();

        for line in &lines {
            let width = HelveticaMetrics.text_width(line, &style).unwrap();
            prop_assert!(width <= max_width || !line.contains(' '), "line {:?} too wide", line);
        }
        prop_assert_eq!(lines.join(" "), words.join(" "));
    }

    #[test]
    fn no_instruction_below_page_bottom(
        labor_count in 0usize..120,
        material_count in 0usize..80,
        description_words in 0usize..400,
    ) {
        let config = LayoutConfig::default();
        let mut tag = TmTag::new("2026-03-02");
        tag.description = "word ".repeat(description_words);
        tag.replace_entries(labor_rows(labor_count));
        tag.replace_entries(material_rows(material_count));

        let document = DocumentAssembler::new(&config, &HelveticaMetrics)
            .assemble(&tag, &tag.category_totals())
            .unwrap();
        let breaks = document
            .instructions
            .iter()
            .filter(|instruction| matches!(instruction, DrawInstruction::NewPage))
            .count();
        prop_assert_eq!(breaks as u32 + 1, document.page_count);

        for instruction in &document.instructions {
            if let Some(y) = instruction.max_y() {
                prop_assert!(y <= config.page_bottom(), "{:?} below page bottom", instruction);
            }
        }
    }
}
