//! Numeric input coercion shared by every entry field.
//!
//! # Responsibility
//! - Accept whatever the editing layer hands over for a numeric field
//!   (number, numeric text, empty text, null) and turn it into a `Decimal`.
//! - Keep one coercion policy for the whole core.
//!
//! # Invariants
//! - Coercion never fails: unparseable, missing, negative, non-finite or
//!   wrongly typed input becomes `Decimal::ZERO`.
//! - Sums saturate at `Decimal::MAX` instead of overflowing.
//! - Text is read like a form field: leading whitespace is skipped and the
//!   longest numeric prefix wins (`"12.5 hrs"` -> `12.5`).

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize, Serializer};
use std::str::FromStr;

static NUMERIC_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+))([eE][+-]?\d+)?").expect("valid numeric prefix regex")
});

/// Raw numeric field value as received from the editing layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    /// JSON number or an already-typed value.
    Number(f64),
    /// Text typed into a form field.
    Text(String),
    /// Field not filled in.
    Missing,
    /// Any other JSON shape, such as a boolean or an object.
    #[serde(serialize_with = "serialize_unsupported")]
    Unsupported(IgnoredAny),
}

fn serialize_unsupported<S: Serializer>(_: &IgnoredAny, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_none()
}

impl Default for NumericInput {
    fn default() -> Self {
        Self::Missing
    }
}

impl From<Decimal> for NumericInput {
    fn from(value: Decimal) -> Self {
        // Keep full precision by going through the canonical text form.
        Self::Text(value.to_string())
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for NumericInput {
    fn from(value: u32) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for NumericInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<NumericInput>> From<Option<T>> for NumericInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// Coerces one raw numeric field into a non-negative decimal.
pub fn coerce_numeric(value: &NumericInput) -> Decimal {
    let parsed = match value {
        NumericInput::Number(number) => Decimal::from_f64(*number),
        NumericInput::Text(text) => parse_numeric_prefix(text),
        NumericInput::Missing | NumericInput::Unsupported(_) => None,
    };
    match parsed {
        Some(decimal) if decimal.is_sign_positive() => decimal.normalize(),
        _ => Decimal::ZERO,
    }
}

/// Formats a decimal with exactly two fractional digits, half away from zero.
pub fn format_two_places(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Adds non-negative amounts, clamping at `Decimal::MAX`.
pub(crate) fn saturating_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, |sum, value| {
        sum.checked_add(value).unwrap_or(Decimal::MAX)
    })
}

fn parse_numeric_prefix(text: &str) -> Option<Decimal> {
    let caps = NUMERIC_PREFIX_RE.captures(text)?;
    let mantissa = caps.get(1)?.as_str();
    match caps.get(2) {
        Some(exponent) => {
            Decimal::from_scientific(&format!("{mantissa}{}", exponent.as_str())).ok()
        }
        None => Decimal::from_str(mantissa.trim_end_matches('.')).ok(),
    }
}
