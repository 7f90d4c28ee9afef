//! Work entry records for the four tag categories.
//!
//! # Responsibility
//! - Define labor/material/equipment/other entry records.
//! - Keep every derived total in lock-step with the entry's own inputs.
//!
//! # Invariants
//! - `id` is stable and unique within one tag.
//! - Derived totals are private: every setter recomputes them synchronously,
//!   and deserialization discards any incoming total.
//! - Numeric inputs pass through `coerce_numeric`, so they are never negative.

use crate::model::numeric::{coerce_numeric, saturating_sum, NumericInput};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one entry inside a tag.
pub type EntryId = Uuid;

/// Entry category, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryCategory {
    Labor,
    Material,
    Equipment,
    Other,
}

impl EntryCategory {
    /// All categories in the order they appear on a tag.
    pub const ALL: [EntryCategory; 4] = [
        EntryCategory::Labor,
        EntryCategory::Material,
        EntryCategory::Equipment,
        EntryCategory::Other,
    ];

    /// Human-readable caption used in documents.
    pub fn label(self) -> &'static str {
        match self {
            Self::Labor => "Labor",
            Self::Material => "Materials",
            Self::Equipment => "Equipment",
            Self::Other => "Other",
        }
    }
}

/// Behavior shared by all entry records.
pub trait Entry {
    /// Category this record belongs to.
    const CATEGORY: EntryCategory;

    fn id(&self) -> EntryId;
    fn name(&self) -> &str;
    fn date_of_work(&self) -> &str;

    /// Recomputes the derived value from the entry's own input fields.
    ///
    /// For labor this is the hour total; for every other category it is
    /// `quantity x rate`.
    fn derive_total(&self) -> Decimal;

    /// Returns the derived value maintained by the setters.
    fn total(&self) -> Decimal;
}

/// One worker's hours for the day.
///
/// Hours are additive only; pricing needs an external rate lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LaborEntryInput", rename_all = "camelCase")]
pub struct LaborEntry {
    id: EntryId,
    name: String,
    classification: String,
    st_hours: Decimal,
    ot_hours: Decimal,
    dt_hours: Decimal,
    pot_hours: Decimal,
    total_hours: Decimal,
    date_of_work: String,
}

impl LaborEntry {
    /// Creates an empty labor entry stamped with the given work date.
    pub fn blank(date_of_work: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), date_of_work)
    }

    /// Creates an empty labor entry with a caller-provided stable ID.
    pub fn with_id(id: EntryId, date_of_work: impl Into<String>) -> Self {
        Self {
            id,
            name: String::new(),
            classification: String::new(),
            st_hours: Decimal::ZERO,
            ot_hours: Decimal::ZERO,
            dt_hours: Decimal::ZERO,
            pot_hours: Decimal::ZERO,
            total_hours: Decimal::ZERO,
            date_of_work: date_of_work.into(),
        }
    }

    pub fn classification(&self) -> &str {
        &self.classification
    }

    pub fn st_hours(&self) -> Decimal {
        self.st_hours
    }

    pub fn ot_hours(&self) -> Decimal {
        self.ot_hours
    }

    pub fn dt_hours(&self) -> Decimal {
        self.dt_hours
    }

    pub fn pot_hours(&self) -> Decimal {
        self.pot_hours
    }

    /// Sum of the four hour buckets.
    pub fn total_hours(&self) -> Decimal {
        self.total_hours
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_classification(&mut self, classification: impl Into<String>) {
        self.classification = classification.into();
    }

    pub fn set_date_of_work(&mut self, date_of_work: impl Into<String>) {
        self.date_of_work = date_of_work.into();
    }

    pub fn set_st_hours(&mut self, value: impl Into<NumericInput>) {
        self.st_hours = coerce_numeric(&value.into());
        self.refresh();
    }

    pub fn set_ot_hours(&mut self, value: impl Into<NumericInput>) {
        self.ot_hours = coerce_numeric(&value.into());
        self.refresh();
    }

    pub fn set_dt_hours(&mut self, value: impl Into<NumericInput>) {
        self.dt_hours = coerce_numeric(&value.into());
        self.refresh();
    }

    pub fn set_pot_hours(&mut self, value: impl Into<NumericInput>) {
        self.pot_hours = coerce_numeric(&value.into());
        self.refresh();
    }

    fn refresh(&mut self) {
        self.total_hours = self.derive_total();
    }
}

impl Entry for LaborEntry {
    const CATEGORY: EntryCategory = EntryCategory::Labor;

    fn id(&self) -> EntryId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn date_of_work(&self) -> &str {
        &self.date_of_work
    }

    fn derive_total(&self) -> Decimal {
        saturating_sum([self.st_hours, self.ot_hours, self.dt_hours, self.pot_hours])
    }

    fn total(&self) -> Decimal {
        self.total_hours
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LaborEntryInput {
    #[serde(default = "Uuid::new_v4")]
    id: EntryId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    classification: String,
    #[serde(default)]
    st_hours: NumericInput,
    #[serde(default)]
    ot_hours: NumericInput,
    #[serde(default)]
    dt_hours: NumericInput,
    #[serde(default)]
    pot_hours: NumericInput,
    #[serde(default)]
    date_of_work: String,
}

impl From<LaborEntryInput> for LaborEntry {
    fn from(input: LaborEntryInput) -> Self {
        let mut entry = Self::with_id(input.id, input.date_of_work);
        entry.name = input.name;
        entry.classification = input.classification;
        entry.st_hours = coerce_numeric(&input.st_hours);
        entry.ot_hours = coerce_numeric(&input.ot_hours);
        entry.dt_hours = coerce_numeric(&input.dt_hours);
        entry.pot_hours = coerce_numeric(&input.pot_hours);
        entry.refresh();
        entry
    }
}

/// Material consumed on site, priced per unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PricedEntryInput", rename_all = "camelCase")]
pub struct MaterialEntry {
    id: EntryId,
    name: String,
    quantity: Decimal,
    unit_cost: Decimal,
    total: Decimal,
    date_of_work: String,
}

/// Miscellaneous charge, priced per unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PricedEntryInput", rename_all = "camelCase")]
pub struct OtherEntry {
    id: EntryId,
    name: String,
    quantity: Decimal,
    unit_cost: Decimal,
    total: Decimal,
    date_of_work: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PricedEntryInput {
    #[serde(default = "Uuid::new_v4")]
    id: EntryId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    quantity: NumericInput,
    #[serde(default)]
    unit_cost: NumericInput,
    #[serde(default)]
    date_of_work: String,
}

/// `quantity x rate`, clamped instead of overflowing on absurd input.
fn saturating_product(quantity: Decimal, rate: Decimal) -> Decimal {
    quantity.checked_mul(rate).unwrap_or(Decimal::MAX)
}

// Material and other entries share one shape; only the category differs.
macro_rules! priced_entry {
    ($ty:ident, $category:expr) => {
        impl $ty {
            /// Creates an empty entry stamped with the given work date.
            pub fn blank(date_of_work: impl Into<String>) -> Self {
                Self::with_id(Uuid::new_v4(), date_of_work)
            }

            /// Creates an empty entry with a caller-provided stable ID.
            pub fn with_id(id: EntryId, date_of_work: impl Into<String>) -> Self {
                Self {
                    id,
                    name: String::new(),
                    quantity: Decimal::ZERO,
                    unit_cost: Decimal::ZERO,
                    total: Decimal::ZERO,
                    date_of_work: date_of_work.into(),
                }
            }

            pub fn quantity(&self) -> Decimal {
                self.quantity
            }

            pub fn unit_cost(&self) -> Decimal {
                self.unit_cost
            }

            pub fn set_name(&mut self, name: impl Into<String>) {
                self.name = name.into();
            }

            pub fn set_date_of_work(&mut self, date_of_work: impl Into<String>) {
                self.date_of_work = date_of_work.into();
            }

            pub fn set_quantity(&mut self, value: impl Into<NumericInput>) {
                self.quantity = coerce_numeric(&value.into());
                self.total = self.derive_total();
            }

            pub fn set_unit_cost(&mut self, value: impl Into<NumericInput>) {
                self.unit_cost = coerce_numeric(&value.into());
                self.total = self.derive_total();
            }
        }

        impl Entry for $ty {
            const CATEGORY: EntryCategory = $category;

            fn id(&self) -> EntryId {
                self.id
            }

            fn name(&self) -> &str {
                &self.name
            }

            fn date_of_work(&self) -> &str {
                &self.date_of_work
            }

            fn derive_total(&self) -> Decimal {
                saturating_product(self.quantity, self.unit_cost)
            }

            fn total(&self) -> Decimal {
                self.total
            }
        }

        impl From<PricedEntryInput> for $ty {
            fn from(input: PricedEntryInput) -> Self {
                let mut entry = Self::with_id(input.id, input.date_of_work);
                entry.name = input.name;
                entry.quantity = coerce_numeric(&input.quantity);
                entry.unit_cost = coerce_numeric(&input.unit_cost);
                entry.total = entry.derive_total();
                entry
            }
        }
    };
}

priced_entry!(MaterialEntry, EntryCategory::Material);
priced_entry!(OtherEntry, EntryCategory::Other);

/// Equipment on site; the multiplier is the number of pieces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EquipmentEntryInput", rename_all = "camelCase")]
pub struct EquipmentEntry {
    id: EntryId,
    name: String,
    quantity: Decimal,
    pieces_of_equipment: Decimal,
    total: Decimal,
    date_of_work: String,
}

impl EquipmentEntry {
    /// Creates an empty equipment entry stamped with the given work date.
    pub fn blank(date_of_work: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), date_of_work)
    }

    /// Creates an empty equipment entry with a caller-provided stable ID.
    pub fn with_id(id: EntryId, date_of_work: impl Into<String>) -> Self {
        Self {
            id,
            name: String::new(),
            quantity: Decimal::ZERO,
            pieces_of_equipment: Decimal::ZERO,
            total: Decimal::ZERO,
            date_of_work: date_of_work.into(),
        }
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn pieces_of_equipment(&self) -> Decimal {
        self.pieces_of_equipment
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_date_of_work(&mut self, date_of_work: impl Into<String>) {
        self.date_of_work = date_of_work.into();
    }

    pub fn set_quantity(&mut self, value: impl Into<NumericInput>) {
        self.quantity = coerce_numeric(&value.into());
        self.total = self.derive_total();
    }

    pub fn set_pieces_of_equipment(&mut self, value: impl Into<NumericInput>) {
        self.pieces_of_equipment = coerce_numeric(&value.into());
        self.total = self.derive_total();
    }
}

impl Entry for EquipmentEntry {
    const CATEGORY: EntryCategory = EntryCategory::Equipment;

    fn id(&self) -> EntryId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn date_of_work(&self) -> &str {
        &self.date_of_work
    }

    fn derive_total(&self) -> Decimal {
        saturating_product(self.quantity, self.pieces_of_equipment)
    }

    fn total(&self) -> Decimal {
        self.total
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EquipmentEntryInput {
    #[serde(default = "Uuid::new_v4")]
    id: EntryId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    quantity: NumericInput,
    #[serde(default)]
    pieces_of_equipment: NumericInput,
    #[serde(default)]
    date_of_work: String,
}

impl From<EquipmentEntryInput> for EquipmentEntry {
    fn from(input: EquipmentEntryInput) -> Self {
        let mut entry = Self::with_id(input.id, input.date_of_work);
        entry.name = input.name;
        entry.quantity = coerce_numeric(&input.quantity);
        entry.pieces_of_equipment = coerce_numeric(&input.pieces_of_equipment);
        entry.total = entry.derive_total();
        entry
    }
}
