//! Built-in schemas: numeric, currency, datetime, boolean, json and string.

use std::cmp::Ordering;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use rust_decimal::Decimal;

use super::ColumnType;
use super::descriptor::SchemaDescriptor;
use crate::sorting::SortDirection;

/// Icon color for untyped columns and the string schema.
pub const DEFAULT_SCHEMA_COLOR: &str = "#CA8EAE";

static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d{1,3}(?:,\d{3})+|\d+)?(?:\.\d+)?(?:[eE][+-]?\d+)?$")
        .expect("numeric pattern is valid")
});

static CURRENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?)\s*(\p{Sc})?\s*([+-]?)\s*(\d[\d,]*(?:\.\d+)?|\.\d+)\s*(\p{Sc})?$")
        .expect("currency pattern is valid")
});

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Generic ordering on raw values with a direction flip.
pub fn default_comparator(a: &str, b: &str, direction: SortDirection) -> Ordering {
    direction.apply(a.cmp(b))
}

/// Compare optional parsed values; unparseable values come first ascending.
fn compare_parsed<T, F>(a: Option<T>, b: Option<T>, cmp: F) -> Ordering
where
    F: FnOnce(&T, &T) -> Ordering,
{
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn score(matched: bool) -> f64 {
    if matched { 1.0 } else { 0.0 }
}

// -----------------------------------------------------------------------------
// Parsers
// -----------------------------------------------------------------------------

fn parse_numeric(value: &str) -> Option<f64> {
    let value = value.trim();
    if !value.bytes().any(|b| b.is_ascii_digit()) || !NUMERIC_RE.is_match(value) {
        return None;
    }
    value
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

fn parse_currency(value: &str) -> Option<Decimal> {
    let caps = CURRENCY_RE.captures(value.trim())?;
    let has_prefix = caps.get(2).is_some();
    let has_suffix = caps.get(5).is_some();
    if has_prefix == has_suffix {
        return None;
    }
    let outer_sign = caps.get(1).map_or("", |m| m.as_str());
    let inner_sign = caps.get(3).map_or("", |m| m.as_str());
    if !outer_sign.is_empty() && !inner_sign.is_empty() {
        return None;
    }
    let digits = caps.get(4)?.as_str().replace(',', "");
    Decimal::from_str(&format!("{outer_sign}{inner_sign}{digits}")).ok()
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn parse_boolean(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn is_json(value: &str) -> bool {
    let value = value.trim();
    (value.starts_with('{') || value.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(value).is_ok()
}

// -----------------------------------------------------------------------------
// Descriptors
// -----------------------------------------------------------------------------

/// The built-in descriptors in registration order.
///
/// The string schema never wins detection; it supplies the metadata used
/// for untyped columns.
pub fn builtin_descriptors() -> Vec<SchemaDescriptor> {
    vec![
        SchemaDescriptor::new(ColumnType::Numeric, |v| score(parse_numeric(v).is_some()))
            .comparator(|a, b, direction| {
                direction.apply(compare_parsed(parse_numeric(a), parse_numeric(b), |a, b| {
                    a.total_cmp(b)
                }))
            })
            .sort_text("Low-High", "High-Low")
            .icon("number")
            .color("#54B399"),
        SchemaDescriptor::new(ColumnType::Currency, |v| score(parse_currency(v).is_some()))
            .comparator(|a, b, direction| {
                direction.apply(compare_parsed(parse_currency(a), parse_currency(b), Ord::cmp))
            })
            .sort_text("Low-High", "High-Low")
            .icon("currency")
            .color("#6092C0"),
        SchemaDescriptor::new(ColumnType::Datetime, |v| score(parse_datetime(v).is_some()))
            .comparator(|a, b, direction| {
                direction.apply(compare_parsed(parse_datetime(a), parse_datetime(b), Ord::cmp))
            })
            .sort_text("Old-New", "New-Old")
            .icon("clock")
            .color("#D36086"),
        SchemaDescriptor::new(ColumnType::Boolean, |v| score(parse_boolean(v).is_some()))
            .comparator(|a, b, direction| {
                direction.apply(compare_parsed(parse_boolean(a), parse_boolean(b), Ord::cmp))
            })
            .sort_text("False-True", "True-False")
            .icon("invert")
            .color("#9170B8"),
        SchemaDescriptor::new(ColumnType::Json, |v| score(is_json(v)))
            .icon("visVega")
            .color("#DA8B45"),
        SchemaDescriptor::new(ColumnType::String, |_| 0.0),
    ]
}
