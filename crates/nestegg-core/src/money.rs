//! Decimal helpers for amounts and yield rates
//!
//! The finance API is loose about numbers: amounts arrive as JSON numbers,
//! numeric strings, `null`, or not at all. Everything that is not a number
//! is read as zero so that aggregation never has to fail.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Parse a decimal from plain or scientific notation.
///
/// Finite numbers outside the decimal range are clamped to `Decimal::MAX`
/// or `Decimal::MIN`; magnitudes too small to represent read as zero.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(value) = Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s)) {
        return Some(value);
    }

    let float = s.parse::<f64>().ok().filter(|f| f.is_finite())?;
    let clamped = if float.abs() < 1.0 {
        Decimal::ZERO
    } else if float.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    };
    tracing::debug!(input = s, value = %clamped, "Number outside decimal range clamped");
    Some(clamped)
}

/// Sum that stops at `Decimal::MAX`/`Decimal::MIN` instead of overflowing
pub fn saturating_sum<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

/// Coerce an arbitrary JSON value to a decimal, substituting zero for
/// anything non-numeric.
pub fn coerce_decimal(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()).unwrap_or(Decimal::ZERO),
        Value::String(s) => parse_decimal(s).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

/// serde `deserialize_with` adapter around [`coerce_decimal`]
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_decimal).unwrap_or(Decimal::ZERO))
}

/// serde `serialize_with` adapter writing a JSON number instead of a string
pub fn serialize_number<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let value = value.normalize();
    if value.scale() == 0 {
        if let Some(i) = value.to_i64() {
            return serializer.serialize_i64(i);
        }
    }
    serializer.serialize_f64(value.to_f64().unwrap_or(0.0))
}

/// Format an amount with thousands separators and at most two decimals
/// (e.g. `90000` → `"90,000"`, `-1234.5` → `"-1,234.5"`).
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp(2).normalize();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format a percentage rate without trailing zeros (`3.50` → `"3.5"`)
pub fn format_rate(value: Decimal) -> String {
    value.normalize().to_string()
}
