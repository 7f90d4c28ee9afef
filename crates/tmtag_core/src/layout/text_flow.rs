//! Width-constrained greedy line wrapping.
//!
//! # Invariants
//! - Input whitespace is normalized: any run of whitespace separates words.
//! - Words are never split; a word wider than the limit gets its own line.
//! - Output depends only on text, width, style and the measurer.

use crate::layout::config::Pt;
use crate::layout::instruction::TextStyle;
use crate::render::{MeasureError, TextMeasurer};

const ELLIPSIS: &str = "...";

/// Wraps `text` into lines no wider than `max_width` where possible.
///
/// Blank text yields no lines.
pub fn wrap(
    text: &str,
    max_width: Pt,
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
) -> Result<Vec<String>, MeasureError> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if measurer.text_width(&candidate, style)? <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    Ok(lines)
}

/// Shortens a single-line cell so it fits `max_width`, marking the cut.
pub fn fit_to_width(
    text: &str,
    max_width: Pt,
    style: &TextStyle,
    measurer: &dyn TextMeasurer,
) -> Result<String, MeasureError> {
    if measurer.text_width(text, style)? <= max_width {
        return Ok(text.to_string());
    }

    // `boundaries[n]` is the byte length of the first `n` chars.
    let boundaries = text.char_indices().map(|(index, _)| index).collect::<Vec<_>>();
    let candidate = |kept: usize| {
        let head = boundaries.get(kept).map_or(text, |&end| &text[..end]);
        format!("{}{ELLIPSIS}", head.trim_end())
    };
    let fits = |kept: usize| -> Result<bool, MeasureError> {
        Ok(measurer.text_width(&candidate(kept), style)? <= max_width)
    };

    if !fits(0)? {
        return Ok(String::new());
    }
    // Candidate width grows with the kept prefix, so bisect on its length.
    let (mut low, mut high) = (0, boundaries.len());
    while high - low > 1 {
        let mid = low + (high - low) / 2;
        if fits(mid)? {
            low = mid;
        } else {
            high = mid;
        }
    }
    Ok(candidate(low))
}
