//! Page geometry and typography constants.
//!
//! # Invariants
//! - All measurements are PDF points (1/72 inch), y grows downward from the
//!   top page edge.
//! - `flow_limit() < page_bottom()`: flowing content stops above the footer
//!   band, the footer itself sits on `page_bottom()`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Length in PDF points.
pub type Pt = f64;

/// Supported paper sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// US Letter, 8.5 x 11 in.
    #[default]
    Letter,
    /// ISO A4, 210 x 297 mm.
    A4,
}

impl PageSize {
    /// Returns `(width, height)` in points.
    pub fn dimensions(self) -> PageDimensions {
        match self {
            Self::Letter => PageDimensions {
                width: 612.0,
                height: 792.0,
            },
            Self::A4 => PageDimensions {
                width: 595.28,
                height: 841.89,
            },
        }
    }
}

/// Physical page size handed to rendering backends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageDimensions {
    pub width: Pt,
    pub height: Pt,
}

/// Fixed layout configuration for tag documents.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page_size: PageSize,
    pub margin_top: Pt,
    pub margin_bottom: Pt,
    pub margin_left: Pt,
    pub margin_right: Pt,
    /// Space between the flow limit and the page-bottom margin, reserved
    /// for the footer line.
    pub footer_band: Pt,
    pub title_line_height: Pt,
    pub line_height: Pt,
    pub row_height: Pt,
    pub section_gap: Pt,
    pub title_font_size: f64,
    pub body_font_size: f64,
    pub table_font_size: f64,
    pub footer_font_size: f64,
    pub signature_image_height: Pt,
    pub signature_image_width: Pt,
    pub title: String,
    pub subtitle: String,
    pub footer_text: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::Letter,
            margin_top: 40.0,
            margin_bottom: 40.0,
            margin_left: 40.0,
            margin_right: 40.0,
            footer_band: 24.0,
            title_line_height: 20.0,
            line_height: 14.0,
            row_height: 16.0,
            section_gap: 10.0,
            title_font_size: 16.0,
            body_font_size: 10.0,
            table_font_size: 9.0,
            footer_font_size: 8.0,
            signature_image_height: 40.0,
            signature_image_width: 160.0,
            title: "TIME & MATERIAL TAG".to_string(),
            subtitle: "Field Work Record".to_string(),
            footer_text: "Generated by TM Tag".to_string(),
        }
    }
}

impl LayoutConfig {
    pub fn page(&self) -> PageDimensions {
        self.page_size.dimensions()
    }

    /// Usable width between the left and right margins.
    pub fn content_width(&self) -> Pt {
        self.page().width - self.margin_left - self.margin_right
    }

    /// Lowest y any instruction may use.
    pub fn page_bottom(&self) -> Pt {
        self.page().height - self.margin_bottom
    }

    /// Lowest y flowing content may reach.
    pub fn flow_limit(&self) -> Pt {
        self.page_bottom() - self.footer_band
    }

    /// Baseline of the per-page footer line.
    pub fn footer_baseline(&self) -> Pt {
        self.page_bottom()
    }

    /// Right edge of the content area.
    pub fn content_right(&self) -> Pt {
        self.margin_left + self.content_width()
    }

    /// Height of the signature block, which is never split across pages.
    pub fn signature_block_height(&self, extra_lines: usize) -> Pt {
        self.signature_image_height + self.line_height * (2 + extra_lines) as f64
    }

    /// Smallest flowing block that must fit on an empty page.
    fn min_flow_height(&self) -> Pt {
        let table_start = self.line_height + self.row_height * 2.0;
        let title_block = self.title_line_height * 2.0;
        table_start
            .max(title_block)
            .max(self.signature_block_height(2))
    }

    /// Rejects geometry that cannot hold the fixed document blocks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("margin_top", self.margin_top),
            ("margin_bottom", self.margin_bottom),
            ("margin_left", self.margin_left),
            ("margin_right", self.margin_right),
            ("footer_band", self.footer_band),
            ("title_line_height", self.title_line_height),
            ("line_height", self.line_height),
            ("row_height", self.row_height),
            ("title_font_size", self.title_font_size),
            ("body_font_size", self.body_font_size),
            ("table_font_size", self.table_font_size),
            ("footer_font_size", self.footer_font_size),
            ("signature_image_height", self.signature_image_height),
            ("signature_image_width", self.signature_image_width),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if !(self.section_gap.is_finite() && self.section_gap >= 0.0) {
            return Err(ConfigError::NonPositive {
                field: "section_gap",
                value: self.section_gap,
            });
        }
        if self.content_width() <= 0.0 {
            return Err(ConfigError::NoContentWidth(self.content_width()));
        }

        let available = self.flow_limit() - self.margin_top;
        let required = self.min_flow_height();
        if available < required {
            return Err(ConfigError::FlowAreaTooSmall {
                available,
                required,
            });
        }
        Ok(())
    }
}

/// Invalid layout configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositive { field: &'static str, value: f64 },
    NoContentWidth(Pt),
    FlowAreaTooSmall { available: Pt, required: Pt },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositive { field, value } => {
                write!(f, "layout field `{field}` must be positive, got {value}")
            }
            Self::NoContentWidth(width) => {
                write!(f, "margins leave no content width ({width}pt)")
            }
            Self::FlowAreaTooSmall {
                available,
                required,
            } => write!(
                f,
                "flow area of {available}pt cannot hold a {required}pt block"
            ),
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{ConfigError, LayoutConfig, PageSize};

    #[test]
    fn default_config_is_valid_letter() {
        let config = LayoutConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.content_width(), 532.0);
        assert_eq!(config.page_bottom(), 752.0);
        assert_eq!(config.flow_limit(), 728.0);
        assert!(config.flow_limit() < config.footer_baseline());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: LayoutConfig =
            serde_json::from_str(r#"{"page_size":"a4","footer_text":"ACME"}"#).unwrap();
        assert_eq!(config.page_size, PageSize::A4);
        assert_eq!(config.footer_text, "ACME");
        assert_eq!(config.line_height, 14.0);
    }

    #[test]
    fn validate_rejects_bad_geometry() {
        let config = LayoutConfig {
            line_height: 0.0,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive {
                field: "line_height",
                ..
            })
        ));

        let cramped = LayoutConfig {
            margin_top: 380.0,
            margin_bottom: 380.0,
            ..LayoutConfig::default()
        };
        assert!(matches!(
            cramped.validate(),
            Err(ConfigError::FlowAreaTooSmall { .. })
        ));
    }
}
