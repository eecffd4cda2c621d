//! Quantity field recognition
//!
//! The per-project field is read exactly once into a [`QuantitySpec`]; the
//! allocator only ever sees the tagged value, never the raw text.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::AllocationError;

lazy_static! {
    /// `20` or `po 20` (case-insensitive "po" = "each")
    static ref UNIFORM_REGEX: Regex = Regex::new(r"(?i)^(?:po\s+)?(\d+)$").unwrap();
}

/// What the per-project field says
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum QuantitySpec {
    /// Every project gets the same quantity
    Uniform(u64),
    /// One quantity per project, in ascending project order. Values are kept
    /// signed so that `-5` is reported as non-positive rather than unreadable.
    List(Vec<i64>),
    /// Text that matches neither form
    Unknown(String),
}

impl QuantitySpec {
    /// Recognise the per-project field. Returns `None` for blank input.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(caps) = UNIFORM_REGEX.captures(trimmed) {
            return Some(match caps[1].parse::<u64>() {
                Ok(n) => QuantitySpec::Uniform(n),
                Err(_) => QuantitySpec::Unknown(trimmed.to_string()),
            });
        }

        if trimmed.contains(',') {
            // A blank item still occupies a slot and reads as 0, so `4,,4`
            // is three values and fails the count or positivity check.
            let values: Option<Vec<i64>> = trimmed
                .split(',')
                .map(str::trim)
                .map(|part| {
                    if part.is_empty() {
                        Some(0)
                    } else {
                        part.parse::<i64>().ok()
                    }
                })
                .collect();
            return Some(match values {
                Some(values) => QuantitySpec::List(values),
                None => QuantitySpec::Unknown(trimmed.to_string()),
            });
        }

        Some(QuantitySpec::Unknown(trimmed.to_string()))
    }
}

/// Read the total field.
///
/// Blank input is `None`. Zero comes back as `Some(0)`; whether that counts as
/// a quantity is the allocator's call.
pub fn parse_total(text: &str) -> Result<Option<u64>, AllocationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Some(rest) = trimmed.strip_prefix('-') {
        if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AllocationError::non_positive(trimmed));
        }
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AllocationError::unrecognized_format(trimmed));
    }
    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|_| AllocationError::quantity_limit(format!("Total {} is too large", trimmed)))
}
