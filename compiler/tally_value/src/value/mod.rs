//! Runtime values.
//!
//! `DataValue` is the single dynamically-typed value every script expression
//! produces. Its variant set (`ValueKind`) is closed; operators and coercions
//! match on it exhaustively.
//!
//! # Factory Methods
//!
//! Always construct values through the factories (`DataValue::long`,
//! `DataValue::string`, `DataValue::list`, ...). They take care of the shared
//! `Heap` allocation for payload-carrying variants.

mod coerce;
mod heap;
mod result;

use std::collections::BTreeMap;
use std::fmt;

use crate::DataType;

pub use heap::Heap;
pub use result::RollResult;

pub(crate) use coerce::long_to_double;

/// Name → value mapping. Keys are kept sorted so output is deterministic.
pub type Dictionary = BTreeMap<String, DataValue>;

/// The closed set of value variants.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueKind {
    /// 64-bit signed integer.
    Long(i64),
    /// IEEE-754 double.
    Double(f64),
    String(Heap<String>),
    /// Ordered sequence; items may be of any variant.
    List(Heap<Vec<DataValue>>),
    Dictionary(Heap<Dictionary>),
    /// A dice roll breakdown: primary value, detail text, individual rolls.
    Result(Heap<RollResult>),
}

/// A script value with an optional display label.
#[derive(Clone, Debug, PartialEq)]
pub struct DataValue {
    kind: ValueKind,
    label: Option<Heap<String>>,
}

impl DataValue {
    // Factory methods

    #[inline]
    pub fn long(n: i64) -> Self {
        Self::from_kind(ValueKind::Long(n))
    }

    #[inline]
    pub fn double(d: f64) -> Self {
        Self::from_kind(ValueKind::Double(d))
    }

    /// Flags travel as Long 1 or 0.
    #[inline]
    pub fn boolean(flag: bool) -> Self {
        Self::long(i64::from(flag))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::from_kind(ValueKind::String(Heap::new(s.into())))
    }

    pub fn list(items: Vec<DataValue>) -> Self {
        Self::from_kind(ValueKind::List(Heap::new(items)))
    }

    pub fn empty_list() -> Self {
        Self::list(Vec::new())
    }

    pub fn dictionary(entries: Dictionary) -> Self {
        Self::from_kind(ValueKind::Dictionary(Heap::new(entries)))
    }

    pub fn result(result: RollResult) -> Self {
        Self::from_kind(ValueKind::Result(Heap::new(result)))
    }

    fn from_kind(kind: ValueKind) -> Self {
        DataValue { kind, label: None }
    }

    // Labels

    /// Attach a display label. Operators never propagate labels.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(Heap::new(label.into()));
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref().map(String::as_str)
    }

    pub fn has_label(&self) -> bool {
        self.label.is_some()
    }

    // Inspection

    #[inline]
    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn data_type(&self) -> DataType {
        match self.kind {
            ValueKind::Long(_) => DataType::Long,
            ValueKind::Double(_) => DataType::Double,
            ValueKind::String(_) => DataType::String,
            ValueKind::List(_) => DataType::List,
            ValueKind::Dictionary(_) => DataType::Dictionary,
            ValueKind::Result(_) => DataType::Result,
        }
    }

    /// Lowercase variant name used in error messages.
    pub fn type_name(&self) -> &'static str {
        self.data_type().name()
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, ValueKind::Long(_) | ValueKind::Double(_))
    }

    /// The value arithmetic sees: a `Result` stands for its primary value.
    pub fn primary(&self) -> &DataValue {
        match &self.kind {
            ValueKind::Result(result) => result.value().primary(),
            _ => self,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            ValueKind::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Borrow the items of a `List`.
    pub fn items(&self) -> Option<&[DataValue]> {
        match &self.kind {
            ValueKind::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_roll_result(&self) -> Option<&RollResult> {
        match &self.kind {
            ValueKind::Result(result) => Some(&**result),
            _ => None,
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl From<i64> for DataValue {
    fn from(n: i64) -> Self {
        DataValue::long(n)
    }
}

impl From<f64> for DataValue {
    fn from(d: f64) -> Self {
        DataValue::double(d)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::string(s)
    }
}

impl From<Vec<DataValue>> for DataValue {
    fn from(items: Vec<DataValue>) -> Self {
        DataValue::list(items)
    }
}
