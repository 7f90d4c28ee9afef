//! Layout cursor and page-break decisions.
//!
//! # Responsibility
//! - Define the write position threaded through section renderers.
//! - Decide when a block no longer fits and start a new page.
//!
//! # Invariants
//! - A cursor belongs to exactly one document assembly.
//! - After a break the cursor sits at the top-left margin of the next page.
//! - Breaking never fails: a new page is always available.

use crate::layout::config::{LayoutConfig, Pt};
use crate::layout::instruction::DrawInstruction;
use log::debug;

/// Current write position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    /// Zero-based page index.
    pub page: u32,
    pub x: Pt,
    pub y: Pt,
}

impl LayoutCursor {
    /// Returns the cursor moved down by `dy`.
    pub fn advanced(self, dy: Pt) -> Self {
        Self {
            y: self.y + dy,
            ..self
        }
    }
}

/// Outcome of reserving vertical space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTransition {
    /// The block fits on the current page.
    Accumulating,
    /// A `NewPage` was emitted and the cursor moved to the next page.
    PageBreak,
}

/// Page-break policy over a fixed page geometry.
#[derive(Debug, Clone, Copy)]
pub struct PaginationController<'c> {
    config: &'c LayoutConfig,
}

impl<'c> PaginationController<'c> {
    pub fn new(config: &'c LayoutConfig) -> Self {
        Self { config }
    }

    /// Cursor at the top-left margin of the first page.
    pub fn start(&self) -> LayoutCursor {
        LayoutCursor {
            page: 0,
            x: self.config.margin_left,
            y: self.config.margin_top,
        }
    }

    /// Returns whether `height` fits below `cursor` on the current page.
    pub fn fits(&self, cursor: LayoutCursor, height: Pt) -> bool {
        cursor.y + height <= self.config.flow_limit()
    }

    /// Ensures `height` fits below the returned cursor.
    ///
    /// Emits exactly one `NewPage` when the block does not fit, unless the
    /// cursor already sits at the top of a page.
    pub fn reserve(
        &self,
        cursor: LayoutCursor,
        height: Pt,
        out: &mut Vec<DrawInstruction>,
    ) -> (LayoutCursor, PageTransition) {
        if self.fits(cursor, height) || self.at_page_top(cursor) {
            return (cursor, PageTransition::Accumulating);
        }
        (self.break_page(cursor, out), PageTransition::PageBreak)
    }

    /// Emits `NewPage` and returns the cursor at the top of the next page.
    pub fn break_page(&self, cursor: LayoutCursor, out: &mut Vec<DrawInstruction>) -> LayoutCursor {
        out.push(DrawInstruction::NewPage);
        let next = LayoutCursor {
            page: cursor.page + 1,
            x: self.config.margin_left,
            y: self.config.margin_top,
        };
        debug!(
            "event=page_break module=layout status=ok page={} overflow_y={:.2}",
            next.page, cursor.y
        );
        next
    }

    fn at_page_top(&self, cursor: LayoutCursor) -> bool {
        cursor.y <= self.config.margin_top
    }
}

#[cfg(test)]
mod tests {
    use super::{PageTransition, PaginationController};
    use crate::layout::config::LayoutConfig;
    use crate::layout::instruction::DrawInstruction;

    #[test]
    fn reserve_keeps_cursor_when_block_fits() {
        let config = LayoutConfig::default();
        let pagination = PaginationController::new(&config);
        let mut out = Vec::new();
        let start = pagination.start();

        let (cursor, transition) = pagination.reserve(start, 100.0, &mut out);
        assert_eq!(transition, PageTransition::Accumulating);
        assert_eq!(cursor, start);
        assert!(out.is_empty());
    }

    #[test]
    fn reserve_breaks_once_and_resets_to_top_margin() {
        let config = LayoutConfig::default();
        let pagination = PaginationController::new(&config);
        let mut out = Vec::new();
        let low = pagination.start().advanced(config.flow_limit() - config.margin_top - 5.0);

        let (cursor, transition) = pagination.reserve(low, 16.0, &mut out);
        assert_eq!(transition, PageTransition::PageBreak);
        assert_eq!(out, vec![DrawInstruction::NewPage]);
        assert_eq!(cursor.page, 1);
        assert_eq!(cursor.y, config.margin_top);
        assert_eq!(cursor.x, config.margin_left);
    }

    #[test]
    fn oversized_block_at_page_top_does_not_break_again() {
        let config = LayoutConfig::default();
        let pagination = PaginationController::new(&config);
        let mut out = Vec::new();

        let (_, transition) = pagination.reserve(pagination.start(), 10_000.0, &mut out);
        assert_eq!(transition, PageTransition::Accumulating);
        assert!(out.is_empty());
    }
}
