//! Dice notation templates.
//!
//! A template such as `#{number:1}d#{sides}` names its numeric arguments
//! with `#{name}` (required) or `#{name:default}` (optional) tokens. Each
//! token becomes a digit capture group; the text between tokens is kept as
//! regex syntax, so templates may use alternation or escapes of their own.

use regex::{Regex, RegexBuilder};
use tally_value::errors::{integer_overflow, invalid_dice_pattern};
use tally_value::{DataValue, Dictionary, EvalError};

/// One declared template argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternArg {
    pub name: String,
    /// `None` means the argument is required.
    pub default: Option<i64>,
}

/// A compiled dice template.
#[derive(Clone, Debug)]
pub struct DicePattern {
    template: String,
    args: Vec<PatternArg>,
    matcher: Regex,
}

impl DicePattern {
    /// Compile `template`. Matching always covers the whole input.
    pub fn new(template: &str, case_insensitive: bool) -> Result<Self, EvalError> {
        let (source, args) = translate(template)?;
        let matcher = RegexBuilder::new(&format!("^(?:{source})$"))
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| invalid_dice_pattern(template, e.to_string()))?;
        Ok(DicePattern {
            template: template.to_string(),
            args,
            matcher,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn args(&self) -> &[PatternArg] {
        &self.args
    }

    pub fn arg_names(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|arg| arg.name.as_str())
    }

    pub fn matches(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }

    /// Argument values for `text`, in declaration order.
    ///
    /// Absent optional captures take their default. Text that does not match
    /// yields an empty set; a capture too large for a Long is an error.
    pub fn extract_args(&self, text: &str) -> Result<DiceArgs, EvalError> {
        let Some(captures) = self.matcher.captures(text) else {
            return Ok(DiceArgs::default());
        };
        let mut values = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            let value = match captures.name(&arg.name) {
                Some(capture) => capture
                    .as_str()
                    .parse::<i64>()
                    .map_err(|_| integer_overflow("dice argument"))?,
                None => match arg.default {
                    Some(default) => default,
                    None => continue,
                },
            };
            values.push((arg.name.clone(), value));
        }
        Ok(DiceArgs(values))
    }
}

/// Extracted argument values, in template order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiceArgs(Vec<(String, i64)>);

impl DiceArgs {
    pub fn get(&self, name: &str) -> Option<i64> {
        self.0
            .iter()
            .find(|(arg, _)| arg == name)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every argument as a Long entry.
    pub fn to_dictionary(&self) -> Dictionary {
        self.iter()
            .map(|(name, value)| (name.to_string(), DataValue::long(value)))
            .collect()
    }
}

/// Rewrite template tokens into named capture groups.
fn translate(template: &str) -> Result<(String, Vec<PatternArg>), EvalError> {
    let mut source = String::with_capacity(template.len() + 32);
    let mut args: Vec<PatternArg> = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("#{") {
        let after = &rest[start + 2..];
        let token = after
            .find('}')
            .and_then(|end| parse_token(&after[..end]).map(|token| (token, end)));

        let Some(((name, default), end)) = token else {
            // Not a token; keep the text for the regex to judge.
            source.push_str(&rest[..start + 2]);
            rest = after;
            continue;
        };

        if args.iter().any(|arg| arg.name == name) {
            return Err(invalid_dice_pattern(
                template,
                format!("argument {name} is declared more than once"),
            ));
        }
        let default = default
            .map(|digits| {
                digits.parse::<i64>().map_err(|_| {
                    invalid_dice_pattern(template, format!("default of {name} is too large"))
                })
            })
            .transpose()?;

        source.push_str(&rest[..start]);
        source.push_str("(?P<");
        source.push_str(name);
        source.push_str(">[0-9]+)");
        if default.is_some() {
            source.push('?');
        }
        args.push(PatternArg {
            name: name.to_string(),
            default,
        });
        rest = &after[end + 1..];
    }
    source.push_str(rest);
    Ok((source, args))
}

/// Split a token body into its name and optional default digits.
///
/// Names are a letter followed by at least one letter or digit.
fn parse_token(body: &str) -> Option<(&str, Option<&str>)> {
    let (name, default) = match body.split_once(':') {
        Some((name, default)) => (name, Some(default)),
        None => (body, None),
    };

    let mut chars = name.chars();
    let valid_name = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && name.len() >= 2
        && chars.all(|c| c.is_ascii_alphanumeric());
    let valid_default = match default {
        Some(digits) => !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()),
        None => true,
    };

    (valid_name && valid_default).then_some((name, default))
}
