// src/distro/version.rs

//! Numeric interpretation of distro versions
//!
//! Vendor rules compare versions against thresholds like `2` or `0.4`.
//! Versions such as "2.0.6" or "4.0.1-mapr" are reduced to the decimal number
//! formed by their leading `digits[.digits]` prefix.

use std::cmp::Ordering;
use std::fmt;

/// A distro version with its numeric reading
#[derive(Debug, Clone, PartialEq)]
pub struct DistroVersion {
    raw: String,
    numeric: f64,
}

impl DistroVersion {
    /// Parse a version string. Never fails; a version without a numeric
    /// prefix reads as 0.
    ///
    /// Examples:
    /// - "2.0.6" → 2.0
    /// - "0.39" → 0.39
    /// - "cdh5" → 0.0
    pub fn parse(s: &str) -> Self {
        Self {
            raw: s.to_string(),
            numeric: numeric_prefix(s),
        }
    }

    /// The version as typed by the operator
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The numeric reading used for threshold rules
    pub fn numeric(&self) -> f64 {
        self.numeric
    }

    /// True when the numeric reading is at or above `threshold`
    pub fn at_least(&self, threshold: f64) -> bool {
        matches!(
            self.numeric.partial_cmp(&threshold),
            Some(Ordering::Greater | Ordering::Equal)
        )
    }
}

impl fmt::Display for DistroVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Leading `digits[.digits]` of `s` as a float, or 0.0
fn numeric_prefix(s: &str) -> f64 {
    let s = s.trim_start();
    let int_len = s.bytes().take_while(u8::is_ascii_digit).count();
    if int_len == 0 {
        return 0.0;
    }

    let mut end = int_len;
    let rest = &s.as_bytes()[int_len..];
    if rest.first() == Some(&b'.') {
        let frac_len = rest[1..].iter().take_while(|b| b.is_ascii_digit()).count();
        if frac_len > 0 {
            end += 1 + frac_len;
        }
    }

    s[..end].parse::<f64>().unwrap_or(0.0)
}
