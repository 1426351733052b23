//! Field values of one form instance.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Map of field name to its current string value.
///
/// A missing field reads as the empty string, which is what an untouched
/// input holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, String>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of `field`, or `""` when it was never set.
    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copies only the listed fields, e.g. to drop `confirmPassword` from a
    /// registration payload.
    pub fn pick(&self, fields: &[&str]) -> FormValues {
        fields
            .iter()
            .filter_map(|f| self.0.get(*f).map(|v| (f.to_string(), v.clone())))
            .collect()
    }

    /// Returns the value of `field` wrapped so it does not leak through `Debug`.
    pub fn secret(&self, field: &str) -> SecretString {
        SecretString::new(self.get(field).to_string().into())
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for FormValues {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_missing_field_reads_empty() {
        let values = FormValues::from([("email", "a@b.com")]);
        assert_eq!(values.get("email"), "a@b.com");
        assert_eq!(values.get("password"), "");
        assert!(!values.contains("password"));
    }

    #[test]
    fn test_pick_keeps_only_listed_fields() {
        let values = FormValues::from([
            ("name", "Ada"),
            ("password", "Abc12345"),
            ("confirmPassword", "Abc12345"),
        ]);
        let payload = values.pick(&["name", "password", "email"]);
        assert_eq!(payload.len(), 2);
        assert!(!payload.contains("confirmPassword"));
        assert!(!payload.contains("email"));
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let values = FormValues::from([("password", "Hunter22")]);
        let secret = values.secret("password");
        assert_eq!(secret.expose_secret(), "Hunter22");
        assert!(!format!("{:?}", secret).contains("Hunter22"));
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let values = FormValues::from([("phone", ""), ("name", "Ada")]);
        let json = serde_json::to_string(&values).expect("serialize");
        assert_eq!(json, r#"{"name":"Ada","phone":""}"#);
    }
}
