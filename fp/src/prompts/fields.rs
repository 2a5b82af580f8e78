//! Named substitution values for prompt templates

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

/// A single substitution value
///
/// Numbers are rendered with their default `Display` form, so `80.0` becomes `80`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Decimal(x) => write!(f, "{}", x),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Decimal(value)
    }
}

/// Mapping of field name to value, consumed by `PromptLoader::render`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    values: BTreeMap<String, FieldValue>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a field
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        debug!(%name, "Fields::insert: called");
        self.values.insert(name, value.into());
    }

    /// Remove a field, returning its previous value
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.values.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Every value as its textual form, ready for the template engine
    pub(crate) fn to_context(&self) -> BTreeMap<&str, String> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.to_string())).collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_use_default_display() {
        assert_eq!(FieldValue::from(80.0).to_string(), "80");
        assert_eq!(FieldValue::from(72.5).to_string(), "72.5");
        assert_eq!(FieldValue::from(28u32).to_string(), "28");
        assert_eq!(FieldValue::from("Keto").to_string(), "Keto");
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut fields = Fields::new().with("age", 30u32);
        fields.insert("age", 31u32);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("age"), Some(&FieldValue::Integer(31)));
    }

    #[test]
    fn test_to_context_is_textual() {
        let fields: Fields = [("plan", "PLAN"), ("question", "Why?")].into_iter().collect();
        let ctx = fields.to_context();
        assert_eq!(ctx.get("plan").map(String::as_str), Some("PLAN"));
        assert_eq!(ctx.get("question").map(String::as_str), Some("Why?"));
    }
}
