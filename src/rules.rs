//! Rule evaluator - checks one validator against one field value.

use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::sync::LazyLock;

use crate::error::SchemaError;
use crate::values::FormValues;

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email shape pattern is valid")
});

/// Result of evaluating a single validator.
/// - `Ok(())` - value passes
/// - `Err(message)` - value fails with the validator's message
pub type RuleResult = Result<(), String>;

/// Regular expression rule for a field value.
///
/// [`Pattern::new`] must match the whole value. [`Pattern::all_of`] instead
/// requires the value to contain a match of each expression, which covers
/// "at least one of each class" rules that would otherwise need lookahead.
#[derive(Clone)]
pub struct Pattern {
    sources: Vec<String>,
    regexes: Vec<Regex>,
    whole: bool,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, SchemaError> {
        let regex = compile(pattern, &format!("^(?:{})$", pattern))?;
        Ok(Self {
            sources: vec![pattern.to_string()],
            regexes: vec![regex],
            whole: true,
        })
    }

    pub fn all_of<I, S>(patterns: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sources = Vec::new();
        let mut regexes = Vec::new();
        for p in patterns {
            let p = p.as_ref();
            regexes.push(compile(p, p)?);
            sources.push(p.to_string());
        }
        Ok(Self {
            sources,
            regexes,
            whole: false,
        })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regexes.iter().all(|r| r.is_match(value))
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }
}

fn compile(source: &str, expr: &str) -> Result<Regex, SchemaError> {
    Regex::new(expr).map_err(|e| SchemaError::InvalidPattern {
        pattern: source.to_string(),
        source: e,
    })
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("sources", &self.sources)
            .field("whole", &self.whole)
            .finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.whole == other.whole && self.sources == other.sources
    }
}

/// A single validation rule applied to a field's value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ValidatorDef")]
pub enum Validator {
    Required { message: String },
    MinLength { min: usize, message: String },
    MaxLength { max: usize, message: String },
    Pattern { pattern: Pattern, message: String },
    Email { message: String },
    EqualsField { other: String, message: String },
    /// Empty values skip every validator of the field.
    Nullable,
}

impl Validator {
    pub fn required(message: impl Into<String>) -> Self {
        Validator::Required { message: message.into() }
    }

    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Validator::MinLength { min, message: message.into() }
    }

    pub fn max_length(max: usize, message: impl Into<String>) -> Self {
        Validator::MaxLength { max, message: message.into() }
    }

    pub fn pattern(pattern: Pattern, message: impl Into<String>) -> Self {
        Validator::Pattern { pattern, message: message.into() }
    }

    pub fn email(message: impl Into<String>) -> Self {
        Validator::Email { message: message.into() }
    }

    pub fn equals_field(other: impl Into<String>, message: impl Into<String>) -> Self {
        Validator::EqualsField { other: other.into(), message: message.into() }
    }

    /// Message reported when this validator fails; empty for `Nullable`.
    pub fn message(&self) -> &str {
        match self {
            Validator::Required { message }
            | Validator::MinLength { message, .. }
            | Validator::MaxLength { message, .. }
            | Validator::Pattern { message, .. }
            | Validator::Email { message }
            | Validator::EqualsField { message, .. } => message,
            Validator::Nullable => "",
        }
    }
}

/// Evaluates `validator` against `value`.
///
/// `all_values` is the full value set of the form; cross-field rules read
/// the referenced field from it. The `Nullable` short-circuit is applied by
/// the schema validator before any validator of the field runs.
///
/// # Returns
/// - `Ok(())` if the value satisfies the validator
/// - `Err(message)` with the validator's message otherwise
pub fn evaluate(validator: &Validator, value: &str, all_values: &FormValues) -> RuleResult {
    let passed = match validator {
        Validator::Required { .. } => !value.trim().is_empty(),
        Validator::MinLength { min, .. } => value.trim().chars().count() >= *min,
        Validator::MaxLength { max, .. } => value.trim().chars().count() <= *max,
        Validator::Pattern { pattern, .. } => pattern.is_match(value),
        Validator::Email { .. } => EMAIL_SHAPE.is_match(value),
        Validator::EqualsField { other, .. } => value == all_values.get(other),
        Validator::Nullable => true,
    };

    if passed {
        Ok(())
    } else {
        Err(validator.message().to_string())
    }
}

// Wire shape of a validator in schema files.
#[derive(Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
enum ValidatorDef {
    Required { message: String },
    MinLength { min: usize, message: String },
    MaxLength { max: usize, message: String },
    Pattern { pattern: PatternDef, message: String },
    Email { message: String },
    EqualsField { other: String, message: String },
    Nullable,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PatternDef {
    One(String),
    AllOf(Vec<String>),
}

impl TryFrom<ValidatorDef> for Validator {
    type Error = SchemaError;

    fn try_from(def: ValidatorDef) -> Result<Self, Self::Error> {
        Ok(match def {
            ValidatorDef::Required { message } => Validator::Required { message },
            ValidatorDef::MinLength { min, message } => Validator::MinLength { min, message },
            ValidatorDef::MaxLength { max, message } => Validator::MaxLength { max, message },
            ValidatorDef::Pattern { pattern, message } => {
                let pattern = match pattern {
                    PatternDef::One(p) => Pattern::new(&p)?,
                    PatternDef::AllOf(ps) => Pattern::all_of(ps)?,
                };
                Validator::Pattern { pattern, message }
            }
            ValidatorDef::Email { message } => Validator::Email { message },
            ValidatorDef::EqualsField { other, message } => Validator::EqualsField { other, message },
            ValidatorDef::Nullable => Validator::Nullable,
        })
    }
}
