//! Field (de)serializers for the analytics service's loose wire format.
//!
//! The service serializes decimals and dates with `str()`, so numeric fields
//! may arrive as JSON numbers, numeric strings, or `null`. These helpers
//! normalize them at the boundary so model structs carry plain Rust values.

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

fn parse_numeric(raw: &str) -> Result<f64, String> {
    let trimmed = raw.trim().trim_end_matches('%').trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| format!("invalid numeric value: {raw:?}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("non-finite numeric value: {raw:?}"))
    }
}

fn optional_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    match Option::<Numeric>::deserialize(d)? {
        None => Ok(None),
        Some(Numeric::Number(n)) => Ok(Some(n)),
        Some(Numeric::Text(s)) => parse_numeric(&s).map(Some).map_err(D::Error::custom),
    }
}

/// Number or numeric string; `null` becomes `0.0`.
pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(optional_number(d)?.unwrap_or(0.0))
}

/// Non-negative count; `null` and negatives become `0`.
pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let n = number(d)?;
    Ok(if n > 0.0 { n.round() as u64 } else { 0 })
}

/// A service percentage (`4.8` meaning 4.8%) converted to a fraction in `[0, 1]`.
pub fn percent_fraction<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok((number(d)? / 100.0).clamp(0.0, 1.0))
}

/// Inverse of [`percent_fraction`]: writes a fraction back out as a percentage.
pub fn as_percent<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(value * 100.0)
}

/// Star rating clamped to `[0, 5]`.
pub fn star_rating<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(number(d)?.clamp(0.0, 5.0))
}

/// Review score rounded and clamped to `1..=5`; `null` reads as `1`.
pub fn review_score<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
    Ok(number(d)?.round().clamp(1.0, 5.0) as u8)
}

/// Search rank where `0`, negatives, and `null` mean "unranked".
pub fn optional_rank<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(optional_number(d)?
        .map(f64::round)
        .filter(|n| *n >= 1.0)
        .map(|n| n.min(u32::MAX as f64) as u32))
}

/// Search rank that must be present and at least `1`.
pub fn rank<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    match optional_number(d)? {
        Some(n) if n.round() >= 1.0 => Ok(n.round().min(u32::MAX as f64) as u32),
        Some(n) => Err(D::Error::custom(format!("rank must be positive, got {n}"))),
        None => Err(D::Error::custom("rank is missing")),
    }
}

/// Calendar day, accepting a trailing time component (`2024-03-01 00:00:00`).
pub fn date<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
    let raw = String::deserialize(d)?;
    parse_date(&raw).map_err(D::Error::custom)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| format!("invalid date {raw:?}: {e}"))
}

/// Boolean that may be `null`.
pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(Option::<bool>::deserialize(d)?.unwrap_or(false))
}

/// String that may be `null`.
pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}
