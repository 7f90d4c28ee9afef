//! Time-and-material tag aggregate.
//!
//! # Responsibility
//! - Hold tag metadata and the four ordered entry collections.
//! - Keep category totals and the grand total consistent with the entries.
//!
//! # Invariants
//! - Entry collections preserve insertion order.
//! - Every collection mutation goes through `edit_entries`, which refreshes
//!   totals before returning; no stale total is observable.
//! - `grand_total == labor + materials + equipment + other`, saturating at
//!   `Decimal::MAX`.

use crate::aggregate::recompute_tag;
use crate::model::numeric::saturating_sum;
use crate::model::entry::{
    Entry, EntryCategory, EquipmentEntry, LaborEntry, MaterialEntry, OtherEntry,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one tag.
pub type TagId = Uuid;

/// Per-category subtotals of one tag.
///
/// `labor` is an hour total; the other three are monetary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub labor: Decimal,
    pub materials: Decimal,
    pub equipment: Decimal,
    pub other: Decimal,
}

impl CategoryTotals {
    /// Sum of all four category totals.
    pub fn grand_total(&self) -> Decimal {
        saturating_sum([self.labor, self.materials, self.equipment, self.other])
    }

    /// Returns the subtotal of one category.
    pub fn for_category(&self, category: EntryCategory) -> Decimal {
        match category {
            EntryCategory::Labor => self.labor,
            EntryCategory::Material => self.materials,
            EntryCategory::Equipment => self.equipment,
            EntryCategory::Other => self.other,
        }
    }
}

/// Captured signature image, kept opaque.
///
/// Serialized as standard base64; a `data:<mime>;base64,` prefix is accepted
/// on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SignatureImage {
    bytes: Vec<u8>,
}

impl SignatureImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decodes a base64 payload, with or without a data-URL prefix.
    pub fn from_base64(encoded: &str) -> Result<Self, SignatureDecodeError> {
        let payload = match encoded.split_once(";base64,") {
            Some((prefix, data)) if prefix.starts_with("data:") => data,
            _ => encoded,
        };
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|err| SignatureDecodeError(err.to_string()))?;
        if bytes.is_empty() {
            return Err(SignatureDecodeError("empty image payload".to_string()));
        }
        Ok(Self { bytes })
    }
}

impl TryFrom<String> for SignatureImage {
    type Error = SignatureDecodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_base64(value.as_str())
    }
}

impl From<SignatureImage> for String {
    fn from(value: SignatureImage) -> Self {
        STANDARD.encode(value.bytes)
    }
}

/// Signature payload could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureDecodeError(String);

impl Display for SignatureDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid signature image: {}", self.0)
    }
}

impl Error for SignatureDecodeError {}

/// One time-and-material tag for a single day/project scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TmTagInput", rename_all = "camelCase")]
pub struct TmTag {
    pub id: TagId,
    pub project_ref: String,
    pub cost_code: String,
    pub date_of_work: String,
    pub title: String,
    pub description: String,
    /// Optional customer purchase order or reference number.
    pub customer_ref: Option<String>,
    labor_entries: Vec<LaborEntry>,
    material_entries: Vec<MaterialEntry>,
    equipment_entries: Vec<EquipmentEntry>,
    other_entries: Vec<OtherEntry>,
    pub signature: Option<SignatureImage>,
    pub signer_name: String,
    pub signer_title: String,
    category_totals: CategoryTotals,
    grand_total: Decimal,
}

impl TmTag {
    /// Creates an empty tag with a generated ID.
    pub fn new(date_of_work: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), date_of_work)
    }

    /// Creates an empty tag with a caller-provided stable ID.
    pub fn with_id(id: TagId, date_of_work: impl Into<String>) -> Self {
        Self {
            id,
            project_ref: String::new(),
            cost_code: String::new(),
            date_of_work: date_of_work.into(),
            title: String::new(),
            description: String::new(),
            customer_ref: None,
            labor_entries: Vec::new(),
            material_entries: Vec::new(),
            equipment_entries: Vec::new(),
            other_entries: Vec::new(),
            signature: None,
            signer_name: String::new(),
            signer_title: String::new(),
            category_totals: CategoryTotals::default(),
            grand_total: Decimal::ZERO,
        }
    }

    pub fn labor_entries(&self) -> &[LaborEntry] {
        &self.labor_entries
    }

    pub fn material_entries(&self) -> &[MaterialEntry] {
        &self.material_entries
    }

    pub fn equipment_entries(&self) -> &[EquipmentEntry] {
        &self.equipment_entries
    }

    pub fn other_entries(&self) -> &[OtherEntry] {
        &self.other_entries
    }

    /// Returns the ordered entries of one category.
    pub fn entries<E: TagEntry>(&self) -> &[E] {
        E::collection(self)
    }

    pub fn category_totals(&self) -> CategoryTotals {
        self.category_totals
    }

    pub fn grand_total(&self) -> Decimal {
        self.grand_total
    }

    /// Returns whether a category has no entries.
    pub fn is_category_empty(&self, category: EntryCategory) -> bool {
        match category {
            EntryCategory::Labor => self.labor_entries.is_empty(),
            EntryCategory::Material => self.material_entries.is_empty(),
            EntryCategory::Equipment => self.equipment_entries.is_empty(),
            EntryCategory::Other => self.other_entries.is_empty(),
        }
    }

    /// Mutates one entry collection and refreshes totals afterwards.
    pub fn edit_entries<E: TagEntry, T>(&mut self, edit: impl FnOnce(&mut Vec<E>) -> T) -> T {
        let result = edit(<E as sealed::Slot>::slot(self));
        self.refresh_totals();
        result
    }

    /// Replaces one entry collection wholesale.
    pub fn replace_entries<E: TagEntry>(&mut self, entries: Vec<E>) {
        self.edit_entries(|slot: &mut Vec<E>| *slot = entries);
    }

    fn refresh_totals(&mut self) {
        let totals = recompute_tag(self);
        self.category_totals = totals;
        self.grand_total = totals.grand_total();
    }
}

mod sealed {
    pub trait Slot: Sized {
        fn slot(tag: &mut super::TmTag) -> &mut Vec<Self>;
    }
}

/// Entry types that live in one of the tag's collections.
pub trait TagEntry: Entry + Clone + sealed::Slot {
    fn collection(tag: &TmTag) -> &[Self];

    /// Creates an empty entry of this category.
    fn blank_entry(date_of_work: String) -> Self;
}

macro_rules! tag_entry {
    ($ty:ident, $field:ident) => {
        impl sealed::Slot for $ty {
            fn slot(tag: &mut TmTag) -> &mut Vec<Self> {
                &mut tag.$field
            }
        }

        impl TagEntry for $ty {
            fn collection(tag: &TmTag) -> &[Self] {
                &tag.$field
            }

            fn blank_entry(date_of_work: String) -> Self {
                $ty::blank(date_of_work)
            }
        }
    };
}

tag_entry!(LaborEntry, labor_entries);
tag_entry!(MaterialEntry, material_entries);
tag_entry!(EquipmentEntry, equipment_entries);
tag_entry!(OtherEntry, other_entries);

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TmTagInput {
    #[serde(default = "Uuid::new_v4")]
    id: TagId,
    #[serde(default)]
    project_ref: String,
    #[serde(default)]
    cost_code: String,
    #[serde(default)]
    date_of_work: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    customer_ref: Option<String>,
    #[serde(default)]
    labor_entries: Vec<LaborEntry>,
    #[serde(default)]
    material_entries: Vec<MaterialEntry>,
    #[serde(default)]
    equipment_entries: Vec<EquipmentEntry>,
    #[serde(default)]
    other_entries: Vec<OtherEntry>,
    #[serde(default)]
    signature: Option<SignatureImage>,
    #[serde(default)]
    signer_name: String,
    #[serde(default)]
    signer_title: String,
}

impl From<TmTagInput> for TmTag {
    fn from(input: TmTagInput) -> Self {
        let mut tag = Self::with_id(input.id, input.date_of_work);
        tag.project_ref = input.project_ref;
        tag.cost_code = input.cost_code;
        tag.title = input.title;
        tag.description = input.description;
        tag.customer_ref = input.customer_ref.filter(|value| !value.trim().is_empty());
        tag.labor_entries = input.labor_entries;
        tag.material_entries = input.material_entries;
        tag.equipment_entries = input.equipment_entries;
        tag.other_entries = input.other_entries;
        tag.signature = input.signature;
        tag.signer_name = input.signer_name;
        tag.signer_title = input.signer_title;
        tag.refresh_totals();
        tag
    }
}
