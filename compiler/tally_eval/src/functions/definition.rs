//! Function signatures and argument binding.

use std::fmt;
use std::str::FromStr;

use tally_value::errors::{invalid_definition, wrong_arg_count};
use tally_value::{DataType, DataValue, Dictionary, EvalError};

/// One declared parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub data_type: DataType,
    /// Collects every remaining argument into a List. Only valid last.
    pub variadic: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Parameter {
            name: name.into(),
            data_type,
            variadic: false,
        }
    }

    pub fn variadic(name: impl Into<String>, data_type: DataType) -> Self {
        Parameter {
            name: name.into(),
            data_type,
            variadic: true,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dots = if self.variadic { "..." } else { "" };
        write!(f, "{}{dots}: {}", self.name, self.data_type)
    }
}

/// Parses `name`, `name:type` or `name...:type`. The type defaults to `any`.
impl FromStr for Parameter {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, data_type) = match s.split_once(':') {
            Some((name, ty)) => (name.trim(), ty.parse::<DataType>()?),
            None => (s.trim(), DataType::Any),
        };
        let (name, variadic) = match name.strip_suffix("...") {
            Some(name) => (name.trim_end(), true),
            None => (name, false),
        };
        if name.is_empty() {
            return Err(invalid_definition(s, "parameter name is empty"));
        }
        Ok(Parameter {
            name: name.to_string(),
            data_type,
            variadic,
        })
    }
}

/// A callable's signature: name, parameters, return type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDefinition {
    name: String,
    parameters: Vec<Parameter>,
    return_type: DataType,
}

impl FunctionDefinition {
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<Parameter>,
        return_type: DataType,
    ) -> Self {
        FunctionDefinition {
            name: name.into(),
            parameters,
            return_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn return_type(&self) -> DataType {
        self.return_type
    }

    pub fn is_variadic(&self) -> bool {
        self.parameters.last().is_some_and(|param| param.variadic)
    }

    /// Reject signatures that cannot bind unambiguously.
    pub fn validate(&self) -> Result<(), EvalError> {
        if self.name.trim().is_empty() {
            return Err(invalid_definition(&self.name, "function name is empty"));
        }
        let last = self.parameters.len().saturating_sub(1);
        for (index, param) in self.parameters.iter().enumerate() {
            if param.variadic && index != last {
                return Err(invalid_definition(
                    &self.name,
                    format!("variadic parameter {} must come last", param.name),
                ));
            }
            if self.parameters[..index].iter().any(|p| p.name == param.name) {
                return Err(invalid_definition(
                    &self.name,
                    format!("parameter {} is declared more than once", param.name),
                ));
            }
        }
        Ok(())
    }

    /// Bind positional arguments to parameter names.
    ///
    /// Each fixed parameter takes one argument coerced to its type; a
    /// trailing variadic parameter collects the rest as a List.
    pub fn bind(&self, args: Vec<DataValue>) -> Result<Dictionary, EvalError> {
        let fixed = self.parameters.iter().filter(|p| !p.variadic).count();
        if args.len() < fixed || (!self.is_variadic() && args.len() > fixed) {
            return Err(wrong_arg_count(&self.name, fixed, args.len()));
        }

        let mut bound = Dictionary::new();
        let mut args = args.into_iter();
        for param in &self.parameters {
            if param.variadic {
                let rest = args
                    .by_ref()
                    .map(|arg| param.data_type.coerce(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                bound.insert(param.name.clone(), DataValue::list(rest));
            } else if let Some(arg) = args.next() {
                bound.insert(param.name.clone(), param.data_type.coerce(arg)?);
            }
        }
        Ok(bound)
    }
}

impl fmt::Display for FunctionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (index, param) in self.parameters.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, ") -> {}", self.return_type)
    }
}
