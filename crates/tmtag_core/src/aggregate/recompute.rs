use crate::model::entry::{Entry, EntryId};
use crate::model::numeric::saturating_sum;
use crate::model::tag::{CategoryTotals, TmTag};
use rust_decimal::Decimal;

/// Derived value of one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryTotal {
    pub id: EntryId,
    pub total: Decimal,
}

/// Aggregation result for one category collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryAggregate {
    /// Derived totals in entry order.
    pub per_entry_totals: Vec<EntryTotal>,
    /// Sum of `per_entry_totals`.
    pub category_total: Decimal,
}

/// Recomputes derived values for one entry collection.
///
/// Values are re-derived from each entry's inputs rather than read from the
/// cached total, so the result only depends on the input fields.
pub fn recompute<E: Entry>(entries: &[E]) -> CategoryAggregate {
    let per_entry_totals = entries
        .iter()
        .map(|entry| EntryTotal {
            id: entry.id(),
            total: entry.derive_total(),
        })
        .collect::<Vec<_>>();
    let category_total = saturating_sum(per_entry_totals.iter().map(|item| item.total));

    CategoryAggregate {
        per_entry_totals,
        category_total,
    }
}

/// Recomputes all four category totals of a tag.
pub fn recompute_tag(tag: &TmTag) -> CategoryTotals {
    CategoryTotals {
        labor: recompute(tag.labor_entries()).category_total,
        materials: recompute(tag.material_entries()).category_total,
        equipment: recompute(tag.equipment_entries()).category_total,
        other: recompute(tag.other_entries()).category_total,
    }
}
