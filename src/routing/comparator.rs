//! Primitive comparison functions bound into compiled conditions.
//!
//! Every comparator takes `(actual, expected)` where `actual` is the value
//! taken from the request and `expected` is the literal from the config.
//! All of them are total: parse failures yield `false`.

use chrono::{DateTime, FixedOffset};

/// Signature shared by all comparators.
pub type CompareFn = fn(&str, &str) -> bool;

pub fn contains(haystack: &str, needle: &str) -> bool {
    haystack.contains(needle)
}

pub fn equals(a: &str, b: &str) -> bool {
    a == b
}

pub fn has_prefix(s: &str, prefix: &str) -> bool {
    s.starts_with(prefix)
}

pub fn has_suffix(s: &str, suffix: &str) -> bool {
    s.ends_with(suffix)
}

/// True iff `a` is strictly earlier than `b`.
pub fn time_before(a: &str, b: &str) -> bool {
    match (parse_timestamp(a), parse_timestamp(b)) {
        (Some(t1), Some(t2)) => t1 < t2,
        _ => false,
    }
}

/// True iff `b` is strictly earlier than `a`.
pub fn time_after(a: &str, b: &str) -> bool {
    match (parse_timestamp(a), parse_timestamp(b)) {
        (Some(t1), Some(t2)) => t2 < t1,
        _ => false,
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(ts) => Some(ts),
        Err(e) => {
            tracing::warn!(value = %value, error = %e, "Failed to parse RFC3339 timestamp");
            None
        }
    }
}
