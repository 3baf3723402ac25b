// src/content/axis.rs
//
// Normalization of axis and sort values coming from the content API.
// Values are loosely typed JSON, so every function here degrades to None
// instead of failing: None sends an item to the fallback pool, or orders it
// by id.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::OnceLock;

// ordering key for an axis group
#[derive(Debug, Clone)]
pub enum OrderKey {
    Number(f64),
    Timestamp(i64),
    Text(String),
}

impl OrderKey {
    fn rank(&self) -> u8 {
        match self {
            OrderKey::Number(_) => 0,
            OrderKey::Timestamp(_) => 1,
            OrderKey::Text(_) => 2,
        }
    }
}

impl PartialEq for OrderKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderKey {}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (OrderKey::Number(a), OrderKey::Number(b)) => a.total_cmp(b),
            (OrderKey::Timestamp(a), OrderKey::Timestamp(b)) => a.cmp(b),
            (OrderKey::Text(a), OrderKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisValue {
    pub key: OrderKey,
    pub label: String,
    pub raw: String,
    pub timestamp: Option<i64>,
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^\d{4}-\d{2}-\d{2}(?:[T ]\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?(?:Z|[+-]\d{2}:?\d{2})?)?$",
        )
        .expect("date pattern is valid")
    })
}

/// Milliseconds since the epoch for ISO-date-like strings.
pub fn parse_timestamp(s: &str) -> Option<i64> {
    let s = s.trim();
    if !date_pattern().is_match(s) {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    // date prefix of an otherwise odd timestamp
    NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Normalizes an axis value; None means the item belongs in the fallback pool.
pub fn normalize(value: &Value) -> Option<AxisValue> {
    match value {
        Value::Number(n) => {
            let n = n.as_f64().filter(|n| n.is_finite())?;
            let raw = format_number(n);
            Some(AxisValue {
                key: OrderKey::Number(n),
                label: raw.clone(),
                raw,
                timestamp: None,
            })
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            if let Some(ts) = parse_timestamp(trimmed) {
                return Some(AxisValue {
                    key: OrderKey::Timestamp(ts),
                    label: trimmed[..10].to_string(),
                    raw: trimmed.to_string(),
                    timestamp: Some(ts),
                });
            }
            if let Some(n) = trimmed.parse::<f64>().ok().filter(|n| n.is_finite()) {
                return Some(AxisValue {
                    key: OrderKey::Number(n),
                    label: trimmed.to_string(),
                    raw: trimmed.to_string(),
                    timestamp: None,
                });
            }
            Some(AxisValue {
                key: OrderKey::Text(trimmed.to_string()),
                label: trimmed.to_string(),
                raw: trimmed.to_string(),
                timestamp: None,
            })
        }
        _ => None,
    }
}

/// Numeric ordering value for an item's sortValue.
pub fn sort_key(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => parse_timestamp(s)
            .map(|ts| ts as f64)
            .or_else(|| s.trim().parse::<f64>().ok().filter(|n| n.is_finite())),
        _ => None,
    }
}
