//! Value type tags.

use std::fmt;
use std::str::FromStr;

use crate::errors::{unknown_data_type, EvalError, EvalResult};
use crate::value::DataValue;

/// Tag for a `DataValue` variant, plus `Any` for unconstrained parameters.
///
/// Extension exports name their parameter and return types by these names
/// (case-insensitive).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    Long,
    Double,
    String,
    List,
    Dictionary,
    Result,
    Any,
}

impl DataType {
    pub const fn name(self) -> &'static str {
        match self {
            DataType::Long => "long",
            DataType::Double => "double",
            DataType::String => "string",
            DataType::List => "list",
            DataType::Dictionary => "dictionary",
            DataType::Result => "result",
            DataType::Any => "any",
        }
    }

    /// Convert `value` to this type through its coercion view.
    pub fn coerce(self, value: DataValue) -> EvalResult {
        if self == DataType::Any || value.data_type() == self {
            return Ok(value);
        }
        match self {
            DataType::Long => value.as_long().map(DataValue::long),
            DataType::Double => value.as_double().map(DataValue::double),
            DataType::String => Ok(DataValue::string(value.as_string())),
            DataType::List => Ok(DataValue::list(value.as_list())),
            DataType::Dictionary => value.as_dictionary().map(DataValue::dictionary),
            DataType::Result => Ok(DataValue::result(value.as_result())),
            DataType::Any => Ok(value),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(DataType::Long),
            "double" => Ok(DataType::Double),
            "string" => Ok(DataType::String),
            "list" => Ok(DataType::List),
            "dictionary" => Ok(DataType::Dictionary),
            "result" => Ok(DataType::Result),
            "any" => Ok(DataType::Any),
            _ => Err(unknown_data_type(s)),
        }
    }
}
