//! Tag editing use-case service.
//!
//! # Responsibility
//! - Provide add/update/remove/replace entry points for the four entry
//!   collections of one tag.
//!
//! # Invariants
//! - Every mutation goes through `TmTag::edit_entries`, so totals are fresh
//!   when any method returns.
//! - Entry IDs are never reused within one tag.

use crate::model::entry::{Entry, EntryCategory, EntryId};
use crate::model::tag::{CategoryTotals, TagEntry, TmTag};
use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TagServiceResult<T> = Result<T, TagServiceError>;

/// Tag editing error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagServiceError {
    EntryNotFound { category: EntryCategory, id: EntryId },
}

impl Display for TagServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EntryNotFound { category, id } => {
                write!(f, "{} entry not found: {id}", category.label().to_lowercase())
            }
        }
    }
}

impl Error for TagServiceError {}

/// Use-case service owning one tag being edited.
pub struct TagService {
    tag: TmTag,
}

impl TagService {
    pub fn new(tag: TmTag) -> Self {
        Self { tag }
    }

    pub fn tag(&self) -> &TmTag {
        &self.tag
    }

    /// Metadata fields are plain data and can be edited directly.
    pub fn metadata_mut(&mut self) -> TagMetadata<'_> {
        TagMetadata { tag: &mut self.tag }
    }

    pub fn into_tag(self) -> TmTag {
        self.tag
    }

    pub fn totals(&self) -> CategoryTotals {
        self.tag.category_totals()
    }

    pub fn grand_total(&self) -> Decimal {
        self.tag.grand_total()
    }

    /// Appends a blank entry dated `today` and returns its ID.
    pub fn add_entry<E: TagEntry>(&mut self, today: NaiveDate) -> EntryId {
        let entry = E::blank_entry(today.format("%Y-%m-%d").to_string());
        let id = entry.id();
        let count = self.tag.edit_entries(|entries: &mut Vec<E>| {
            entries.push(entry);
            entries.len()
        });
        debug!(
            "event=entry_add module=service status=ok category={} count={}",
            E::CATEGORY.label(),
            count
        );
        id
    }

    /// Applies `edit` to the entry with `id`.
    ///
    /// # Errors
    /// - `EntryNotFound` when no entry of this category has `id`; the tag is
    ///   left unchanged.
    pub fn update_entry<E: TagEntry>(
        &mut self,
        id: EntryId,
        edit: impl FnOnce(&mut E),
    ) -> TagServiceResult<()> {
        let found = self.tag.edit_entries(|entries: &mut Vec<E>| {
            match entries.iter_mut().find(|entry| entry.id() == id) {
                Some(entry) => {
                    edit(entry);
                    true
                }
                None => false,
            }
        });
        if !found {
            return Err(not_found::<E>(id));
        }
        debug!(
            "event=entry_update module=service status=ok category={}",
            E::CATEGORY.label()
        );
        Ok(())
    }

    /// Removes and returns the entry with `id`.
    ///
    /// # Errors
    /// - `EntryNotFound` when no entry of this category has `id`.
    pub fn remove_entry<E: TagEntry>(&mut self, id: EntryId) -> TagServiceResult<E> {
        let removed = self.tag.edit_entries(|entries: &mut Vec<E>| {
            entries
                .iter()
                .position(|entry| entry.id() == id)
                .map(|index| entries.remove(index))
        });
        let removed = removed.ok_or_else(|| not_found::<E>(id))?;
        debug!(
            "event=entry_remove module=service status=ok category={}",
            E::CATEGORY.label()
        );
        Ok(removed)
    }

    /// Replaces a whole collection, e.g. after bulk import.
    pub fn replace_entries<E: TagEntry>(&mut self, entries: Vec<E>) {
        let count = entries.len();
        self.tag.replace_entries(entries);
        debug!(
            "event=entries_replace module=service status=ok category={} count={}",
            E::CATEGORY.label(),
            count
        );
    }
}

/// Mutable view over the tag's plain metadata fields.
///
/// Entry collections are not reachable through this view.
pub struct TagMetadata<'a> {
    tag: &'a mut TmTag,
}

impl TagMetadata<'_> {
    pub fn set_project_ref(&mut self, value: impl Into<String>) -> &mut Self {
        self.tag.project_ref = value.into();
        self
    }

    pub fn set_cost_code(&mut self, value: impl Into<String>) -> &mut Self {
        self.tag.cost_code = value.into();
        self
    }

    pub fn set_title(&mut self, value: impl Into<String>) -> &mut Self {
        self.tag.title = value.into();
        self
    }

    pub fn set_description(&mut self, value: impl Into<String>) -> &mut Self {
        self.tag.description = value.into();
        self
    }

    pub fn set_date_of_work(&mut self, value: impl Into<String>) -> &mut Self {
        self.tag.date_of_work = value.into();
        self
    }

    pub fn set_customer_ref(&mut self, value: Option<String>) -> &mut Self {
        self.tag.customer_ref = value.filter(|reference| !reference.trim().is_empty());
        self
    }
}

fn not_found<E: TagEntry>(id: EntryId) -> TagServiceError {
    TagServiceError::EntryNotFound {
        category: E::CATEGORY,
        id,
    }
}
