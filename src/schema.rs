//! Form schemas and the schema validator.

use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

use crate::error::SchemaError;
use crate::rules::{evaluate, Pattern, Validator};
use crate::values::FormValues;

/// Field name to the message of its first failing validator.
pub type FieldErrors = BTreeMap<String, String>;

/// Ordered validators of one field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldRule {
    pub field: String,
    #[serde(default)]
    pub validators: Vec<Validator>,
}

impl FieldRule {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            validators: Vec::new(),
        }
    }

    pub fn with(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn required(self, message: impl Into<String>) -> Self {
        self.with(Validator::required(message))
    }

    pub fn min_length(self, min: usize, message: impl Into<String>) -> Self {
        self.with(Validator::min_length(min, message))
    }

    pub fn max_length(self, max: usize, message: impl Into<String>) -> Self {
        self.with(Validator::max_length(max, message))
    }

    pub fn pattern(self, pattern: Pattern, message: impl Into<String>) -> Self {
        self.with(Validator::pattern(pattern, message))
    }

    pub fn email(self, message: impl Into<String>) -> Self {
        self.with(Validator::email(message))
    }

    pub fn equals_field(self, other: impl Into<String>, message: impl Into<String>) -> Self {
        self.with(Validator::equals_field(other, message))
    }

    pub fn nullable(self) -> Self {
        self.with(Validator::Nullable)
    }

    pub fn is_required(&self) -> bool {
        self.validators
            .iter()
            .any(|v| matches!(v, Validator::Required { .. }))
    }

    pub fn is_nullable(&self) -> bool {
        self.validators.iter().any(|v| matches!(v, Validator::Nullable))
    }

    /// Runs the validators in order and returns the first failure message.
    ///
    /// An empty value on a nullable field passes without running anything.
    pub fn check(&self, values: &FormValues) -> Option<String> {
        let value = values.get(&self.field);
        if self.is_nullable() && value.trim().is_empty() {
            return None;
        }
        self.validators
            .iter()
            .find_map(|v| evaluate(v, value, values).err())
    }
}

/// Ordered rule set for every field of one form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "SchemaDef")]
pub struct FormSchema {
    rules: Vec<FieldRule>,
}

#[derive(Deserialize)]
struct SchemaDef {
    fields: Vec<FieldRule>,
}

impl TryFrom<SchemaDef> for FormSchema {
    type Error = SchemaError;

    fn try_from(def: SchemaDef) -> Result<Self, Self::Error> {
        FormSchema::new(def.fields)
    }
}

impl FormSchema {
    /// Builds a schema, rejecting duplicate fields and cross-field rules
    /// that point at fields outside the schema.
    pub fn new(rules: Vec<FieldRule>) -> Result<Self, SchemaError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.field.as_str()) {
                return Err(SchemaError::DuplicateField(rule.field.clone()));
            }
        }
        for rule in &rules {
            for v in &rule.validators {
                if let Validator::EqualsField { other, .. } = v {
                    if !seen.contains(other.as_str()) {
                        return Err(SchemaError::UnknownReference {
                            field: rule.field.clone(),
                            other: other.clone(),
                        });
                    }
                }
            }
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn rule(&self, field: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|r| r.field == field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.rule(field).is_some()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.field.as_str())
    }

    /// Initial values: every field present and empty.
    pub fn empty_values(&self) -> FormValues {
        self.field_names().map(|f| (f, "")).collect()
    }

    /// Returns `true` when every required field holds a non-blank value.
    pub fn required_filled(&self, values: &FormValues) -> bool {
        self.rules
            .iter()
            .filter(|r| r.is_required())
            .all(|r| !values.get(&r.field).trim().is_empty())
    }

    pub fn validate(&self, values: &FormValues) -> FieldErrors {
        validate(self, values)
    }
}

/// Validates every field of `schema` against `values`.
///
/// Fields are visited in schema order; each contributes at most one entry,
/// the message of its first failing validator. Passing fields are omitted.
pub fn validate(schema: &FormSchema, values: &FormValues) -> FieldErrors {
    schema
        .rules
        .iter()
        .filter_map(|rule| rule.check(values).map(|msg| (rule.field.clone(), msg)))
        .collect()
}
