//! Draw instruction stream handed to rendering backends.

use crate::layout::config::Pt;
use crate::model::tag::SignatureImage;
use serde::Serialize;

/// Font face used by text instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Font {
    Regular,
    Bold,
}

/// Text face and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub font: Font,
    pub size: f64,
}

impl TextStyle {
    pub fn regular(size: f64) -> Self {
        Self {
            font: Font::Regular,
            size,
        }
    }

    pub fn bold(size: f64) -> Self {
        Self {
            font: Font::Bold,
            size,
        }
    }
}

/// One primitive rendering command.
///
/// Instructions apply to the current page; `NewPage` starts the next one.
/// Text `y` is the baseline, image `y` is the top edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawInstruction {
    Text {
        x: Pt,
        y: Pt,
        text: String,
        style: TextStyle,
    },
    Line {
        x1: Pt,
        y1: Pt,
        x2: Pt,
        y2: Pt,
    },
    Image {
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
        #[serde(skip)]
        image: SignatureImage,
    },
    NewPage,
}

impl DrawInstruction {
    /// Lowest y this instruction touches, or `None` for page breaks.
    pub fn max_y(&self) -> Option<Pt> {
        match self {
            Self::Text { y, .. } => Some(*y),
            Self::Line { y1, y2, .. } => Some(y1.max(*y2)),
            Self::Image { y, height, .. } => Some(y + height),
            Self::NewPage => None,
        }
    }

    /// Returns the text payload of a text instruction.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }
}
