//! Turning raw cell text into chart values

use std::collections::HashMap;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use pc_core::{FieldKind, Value};

const MS_PER_DAY: f64 = 86_400_000.0;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// A normalized cell, flagged when the raw text could not be read and a
/// default was substituted
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: Value,
    pub degraded: bool,
}

/// Converts raw CSV text to values, relative to a fixed load time
#[derive(Debug, Clone)]
pub struct Normalizer {
    embedded_keys: HashMap<String, String>,
    now: DateTime<Utc>,
}

impl Normalizer {
    pub fn new(embedded_keys: HashMap<String, String>, now: DateTime<Utc>) -> Self {
        Self { embedded_keys, now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Normalize the cell of `column`, read as `kind`
    pub fn normalize(&self, column: &str, kind: FieldKind, raw: &str) -> Cell {
        match kind {
            FieldKind::Qualitative => {
                let parsed = leading_float(raw).filter(|v| v.is_finite());
                Cell {
                    value: Value::Number(parsed.unwrap_or(0.0)),
                    degraded: parsed.is_none() && !raw.trim().is_empty(),
                }
            }
            FieldKind::Quantitative => {
                let token = match self.embedded_keys.get(column) {
                    Some(key) => embedded_value(raw, key),
                    None => raw.to_string(),
                };
                Cell {
                    value: Value::Category(token.into()),
                    degraded: false,
                }
            }
            FieldKind::DateTime => {
                let offset = self.day_offset(raw);
                Cell {
                    value: Value::Number(offset.unwrap_or(0.0)),
                    degraded: offset.is_none(),
                }
            }
        }
    }

    /// Whole days between `raw` and the load time, floored; past dates
    /// are negative
    pub fn day_offset(&self, raw: &str) -> Option<f64> {
        let at = parse_timestamp(raw)?;
        let ms = (at - self.now).num_milliseconds() as f64;
        Some((ms / MS_PER_DAY).floor())
    }
}

/// The longest prefix of `raw` (after leading whitespace) that reads as a
/// decimal number, like `"12.5kg"` -> 12.5
pub fn leading_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let rest = &s[end..];
    if rest.starts_with("Infinity") {
        return s[..end + "Infinity".len()].replace("Infinity", "inf").parse().ok();
    }

    let int_start = end;
    while bytes.get(end).map_or(false, u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).map_or(false, u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while bytes.get(exp_end).map_or(false, u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Pull `key` out of a JSON object held in a cell. Cells that are not
/// valid JSON fall back to a textual scan, and cells without the key are
/// kept as they are.
pub fn embedded_value(raw: &str, key: &str) -> String {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(raw) {
        return match map.get(key) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => raw.to_string(),
        };
    }

    let marker = format!("\"{key}\":");
    match raw.rfind(&marker) {
        Some(at) => {
            let tail = &raw[at + marker.len()..];
            let end = tail.find(",\"").or_else(|| tail.find('}')).unwrap_or(tail.len());
            tail[..end].trim().to_string()
        }
        None => raw.to_string(),
    }
}

/// Parse the timestamp formats found in exported data. Values without a
/// zone are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(at) = DateTime::parse_from_rfc2822(raw) {
        return Some(at.with_timezone(&Utc));
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn normalizer() -> Normalizer {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        Normalizer::new(
            HashMap::from([("perf".to_string(), "isDelayed".to_string())]),
            now,
        )
    }

    #[test]
    fn test_leading_float() {
        assert_eq!(leading_float("42"), Some(42.0));
        assert_eq!(leading_float("  -3.5 units"), Some(-3.5));
        assert_eq!(leading_float(".5"), Some(0.5));
        assert_eq!(leading_float("7."), Some(7.0));
        assert_eq!(leading_float("1e3x"), Some(1000.0));
        assert_eq!(leading_float("2e"), Some(2.0));
        assert_eq!(leading_float("abc"), None);
        assert_eq!(leading_float(""), None);
        assert_eq!(leading_float("-"), None);
        assert_eq!(leading_float("-Infinity"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_qualitative_defaults_to_zero() {
        let n = normalizer();
        assert_eq!(n.normalize("c", FieldKind::Qualitative, "12.25").value, Value::Number(12.25));

        let bad = n.normalize("c", FieldKind::Qualitative, "n/a");
        assert_eq!(bad.value, Value::Number(0.0));
        assert!(bad.degraded);

        let infinite = n.normalize("c", FieldKind::Qualitative, "Infinity");
        assert_eq!(infinite.value, Value::Number(0.0));

        let empty = n.normalize("c", FieldKind::Qualitative, "");
        assert_eq!(empty.value, Value::Number(0.0));
        assert!(!empty.degraded);
    }

    #[test]
    fn test_embedded_key_extraction() {
        assert_eq!(embedded_value(r#"{"isDelayed":true,"days":3}"#, "isDelayed"), "true");
        assert_eq!(embedded_value(r#"{"isDelayed":"maybe"}"#, "isDelayed"), "maybe");
        // not quite JSON, found by scanning
        assert_eq!(embedded_value(r#"{'x':1,"isDelayed":false,"y":2"#, "isDelayed"), "false");
        assert_eq!(embedded_value("plain", "isDelayed"), "plain");

        let n = normalizer();
        let cell = n.normalize("perf", FieldKind::Quantitative, r#"{"isDelayed":false}"#);
        assert_eq!(cell.value, Value::Category("false".into()));
        let untouched = n.normalize("other", FieldKind::Quantitative, r#"{"isDelayed":false}"#);
        assert_eq!(untouched.value, Value::Category(r#"{"isDelayed":false}"#.into()));
    }

    #[test]
    fn test_day_offsets() {
        let n = normalizer();
        assert_eq!(n.day_offset("2024-03-10T12:00:00Z"), Some(0.0));
        assert_eq!(n.day_offset("2024-03-08T12:00:00Z"), Some(-2.0));
        // one hour in the past still floors to the previous day
        assert_eq!(n.day_offset("2024-03-10T11:00:00+00:00"), Some(-1.0));
        assert_eq!(n.day_offset("2024-03-13 18:30:00"), Some(3.0));
        assert_eq!(n.day_offset("2024-03-01"), Some(-10.0));
        assert_eq!(n.day_offset("yesterday"), None);

        let cell = n.normalize("when", FieldKind::DateTime, "garbage");
        assert_eq!(cell.value, Value::Number(0.0));
        assert!(cell.degraded);
    }
}
