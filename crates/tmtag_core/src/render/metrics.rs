//! Helvetica advance widths.
//!
//! Widths come from the standard Adobe font metrics for the base-14
//! Helvetica and Helvetica-Bold faces, in 1/1000 em. Characters outside
//! printable ASCII use the width of `?` in the matching face, which is also
//! what the PDF backend substitutes for them.

use crate::layout::config::Pt;
use crate::layout::instruction::{Font, TextStyle};
use crate::render::{MeasureError, TextMeasurer};

/// Printable ASCII 0x20..=0x7E.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
    389, 280, 389, 584, // '{'..'~'
];

const QUESTION_MARK_INDEX: usize = (b'?' - b' ') as usize;

/// Stateless measurer for the base-14 Helvetica faces.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelveticaMetrics;

impl HelveticaMetrics {
    fn units(font: Font, ch: char) -> u16 {
        let table = match font {
            Font::Regular => &HELVETICA,
            Font::Bold => &HELVETICA_BOLD,
        };
        let index = match ch {
            ' '..='~' => ch as usize - ' ' as usize,
            _ => QUESTION_MARK_INDEX,
        };
        table[index]
    }
}

impl TextMeasurer for HelveticaMetrics {
    fn text_width(&self, text: &str, style: &TextStyle) -> Result<Pt, MeasureError> {
        if !(style.size.is_finite() && style.size > 0.0) {
            return Err(MeasureError::new(format!(
                "invalid font size {}",
                style.size
            )));
        }
        let units = text
            .chars()
            .map(|ch| u32::from(Self::units(style.font, ch)))
            .sum::<u32>();
        Ok(f64::from(units) * style.size / 1000.0)
    }
}
