//! Coercion views.
//!
//! Every variant can be viewed as every other variant; the views that can
//! lose information (truncation, parsing) are documented per method and the
//! views that are undefined return a type error.

use super::{DataValue, Dictionary, RollResult, ValueKind};
use crate::errors::{not_dictionary, not_numeric, EvalError};

/// Truncate toward zero, saturating at the `i64` bounds. NaN becomes 0.
#[expect(
    clippy::cast_possible_truncation,
    reason = "saturating truncation toward zero is the documented coercion"
)]
fn truncate_to_long(d: f64) -> i64 {
    d as i64
}

#[expect(
    clippy::cast_precision_loss,
    reason = "Long to Double promotion rounds like any mixed arithmetic"
)]
pub(crate) fn long_to_double(n: i64) -> f64 {
    n as f64
}

fn parse_long(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| parse_double(trimmed).map(truncate_to_long))
}

fn parse_double(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

/// Shortest round-trip form; whole numbers keep a `.0` suffix.
fn format_double(d: f64) -> String {
    format!("{d:?}")
}

impl DataValue {
    /// Integer view.
    ///
    /// Doubles truncate toward zero; strings parse as an integer, falling
    /// back to a truncated decimal; a one-element list and a roll result
    /// delegate to their single value.
    pub fn as_long(&self) -> Result<i64, EvalError> {
        match self.kind() {
            ValueKind::Long(n) => Ok(*n),
            ValueKind::Double(d) => Ok(truncate_to_long(*d)),
            ValueKind::String(s) => parse_long(s).ok_or_else(|| not_numeric("string")),
            ValueKind::List(items) => match items.as_slice() {
                [single] => single.as_long(),
                _ => Err(not_numeric("list")),
            },
            ValueKind::Dictionary(_) => Err(not_numeric("dictionary")),
            ValueKind::Result(result) => result.value().as_long(),
        }
    }

    /// Floating-point view, following the same rules as `as_long`.
    pub fn as_double(&self) -> Result<f64, EvalError> {
        match self.kind() {
            ValueKind::Long(n) => Ok(long_to_double(*n)),
            ValueKind::Double(d) => Ok(*d),
            ValueKind::String(s) => parse_double(s).ok_or_else(|| not_numeric("string")),
            ValueKind::List(items) => match items.as_slice() {
                [single] => single.as_double(),
                _ => Err(not_numeric("list")),
            },
            ValueKind::Dictionary(_) => Err(not_numeric("dictionary")),
            ValueKind::Result(result) => result.value().as_double(),
        }
    }

    /// Text view. Total.
    pub fn as_string(&self) -> String {
        match self.kind() {
            ValueKind::Long(n) => n.to_string(),
            ValueKind::Double(d) => format_double(*d),
            ValueKind::String(s) => s.to_string(),
            ValueKind::List(items) => {
                let parts: Vec<String> = items.iter().map(DataValue::as_string).collect();
                format!("[{}]", parts.join(", "))
            }
            ValueKind::Dictionary(entries) => {
                let parts: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| format!("{key}: {}", value.as_string()))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
            ValueKind::Result(result) => result.value().as_string(),
        }
    }

    /// List view: a list's items, or the value itself as a single item.
    pub fn as_list(&self) -> Vec<DataValue> {
        match self.kind() {
            ValueKind::List(items) => items.to_owned_inner(),
            _ => vec![self.clone()],
        }
    }

    /// Dictionary view.
    ///
    /// A roll result exposes `value`, `details` and `individual`. Numeric,
    /// string and list values have no dictionary view.
    pub fn as_dictionary(&self) -> Result<Dictionary, EvalError> {
        match self.kind() {
            ValueKind::Dictionary(entries) => Ok(entries.to_owned_inner()),
            ValueKind::Result(result) => {
                let mut entries = Dictionary::new();
                entries.insert("value".to_string(), result.value().clone());
                entries.insert(
                    "details".to_string(),
                    DataValue::string(result.details()),
                );
                entries.insert(
                    "individual".to_string(),
                    DataValue::list(result.individual_values().to_vec()),
                );
                Ok(entries)
            }
            ValueKind::Long(_) | ValueKind::Double(_) => Err(not_dictionary("numeric")),
            ValueKind::String(_) => Err(not_dictionary("string")),
            ValueKind::List(_) => Err(not_dictionary("list")),
        }
    }

    /// Roll-result view: anything else becomes the primary value of an
    /// otherwise empty breakdown.
    pub fn as_result(&self) -> RollResult {
        match self.kind() {
            ValueKind::Result(result) => result.to_owned_inner(),
            _ => RollResult::new(self.clone()),
        }
    }
}
