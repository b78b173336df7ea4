//! Wizard schema and form data models.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::WizardError;

/// A single form value as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Flag(bool),
    List(Vec<String>),
}

impl FieldValue {
    /// Numeric view of the value. Numeric text such as `"85"` counts.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Whitespace-only text and empty lists are blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::List(items) => items.iter().all(|s| s.trim().is_empty()),
            Self::Number(_) | Self::Flag(_) => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_string).collect())
    }
}

/// Predicate a field's value must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldRule {
    NonEmptyText,
    NonEmptyList,
    /// Value must be `>= n`.
    MinNumber(f64),
    /// Value must be `> n`.
    GreaterThan(f64),
    Optional,
}

impl FieldRule {
    /// Missing values fail every rule except `Optional`.
    pub fn is_satisfied_by(&self, value: Option<&FieldValue>) -> bool {
        match self {
            Self::Optional => true,
            Self::NonEmptyText => value.is_some_and(|v| !matches!(v, FieldValue::Flag(_)) && !v.is_blank()),
            Self::NonEmptyList => value
                .and_then(FieldValue::as_list)
                .is_some_and(|items| items.iter().any(|s| !s.trim().is_empty())),
            Self::MinNumber(min) => value
                .and_then(FieldValue::as_number)
                .is_some_and(|n| n >= *min),
            Self::GreaterThan(bound) => value
                .and_then(FieldValue::as_number)
                .is_some_and(|n| n > *bound),
        }
    }
}

/// One input within a step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub key: String,
    pub label: String,
    pub rule: FieldRule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldSpec {
    pub fn new(key: impl Into<String>, label: impl Into<String>, rule: FieldRule) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            rule,
            message: None,
        }
    }

    pub fn required(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldRule::NonEmptyText)
    }

    pub fn list(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldRule::NonEmptyList)
    }

    pub fn optional(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldRule::Optional)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn is_satisfied_by(&self, value: Option<&FieldValue>) -> bool {
        self.rule.is_satisfied_by(value)
    }

    /// Message shown when the rule fails.
    pub fn error_message(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        match self.rule {
            FieldRule::NonEmptyText | FieldRule::Optional => format!("{} is required", self.label),
            FieldRule::NonEmptyList => format!("Select at least one {}", self.label.to_lowercase()),
            FieldRule::MinNumber(n) => format!("{} must be at least {n}", self.label),
            FieldRule::GreaterThan(n) => format!("{} must be greater than {n}", self.label),
        }
    }
}

/// One page of the wizard. Its ordinal is its index in the schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepDefinition {
    pub id: String,
    pub title: String,
    pub description: String,
    pub fields: Vec<FieldSpec>,
}

impl StepDefinition {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        fields: Vec<FieldSpec>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            fields,
        }
    }
}

/// Ordered, validated list of steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WizardSchema {
    steps: Vec<StepDefinition>,
}

impl WizardSchema {
    /// Rejects an empty schema, a step without fields, and any key owned
    /// by more than one step.
    pub fn new(steps: Vec<StepDefinition>) -> Result<Self, WizardError> {
        if steps.is_empty() {
            return Err(WizardError::InvalidSchema("schema has no steps".into()));
        }
        let mut seen = HashSet::new();
        for step in &steps {
            if step.fields.is_empty() {
                return Err(WizardError::InvalidSchema(format!(
                    "step '{}' has no fields",
                    step.id
                )));
            }
            for field in &step.fields {
                if !seen.insert(field.key.as_str()) {
                    return Err(WizardError::InvalidSchema(format!(
                        "field '{}' appears in more than one step",
                        field.key
                    )));
                }
            }
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&StepDefinition> {
        self.steps.get(index)
    }

    /// Always at least one.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.steps.iter().flat_map(|s| s.fields.iter())
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields().find(|f| f.key == key)
    }

    pub fn field_count(&self) -> usize {
        self.fields().count()
    }
}

/// Flat map of every value entered so far, keyed by field key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WizardFormState {
    values: BTreeMap<String, FieldValue>,
}

impl WizardFormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) {
        self.values.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.values.remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Seed a form from an existing profile object.
    ///
    /// Only keys the schema knows are taken. A key missing at the top level
    /// is looked up in nested role objects (`healerProfile`,
    /// `customerProfile`). String values holding a JSON-encoded string
    /// array (`"[\"Reiki\"]"`) become lists.
    pub fn from_profile_json(profile: &serde_json::Value, schema: &WizardSchema) -> Self {
        let mut form = Self::new();
        let Some(object) = profile.as_object() else {
            return form;
        };
        for field in schema.fields() {
            if let Some(value) = lookup_profile_key(object, &field.key).and_then(decode_profile_value) {
                form.set(field.key.clone(), value);
            }
        }
        form
    }

    /// Copy every value from `other` over this form.
    pub fn merge(&mut self, other: WizardFormState) {
        self.values.extend(other.values);
    }
}

fn lookup_profile_key<'a>(
    object: &'a serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Option<&'a serde_json::Value> {
    match object.get(key) {
        Some(value) if !value.is_null() => Some(value),
        _ => object
            .values()
            .filter_map(serde_json::Value::as_object)
            .find_map(|nested| nested.get(key).filter(|v| !v.is_null())),
    }
}

fn decode_profile_value(value: &serde_json::Value) -> Option<FieldValue> {
    use serde_json::Value;
    match value {
        Value::Null | Value::Object(_) => None,
        Value::Bool(b) => Some(FieldValue::Flag(*b)),
        Value::Number(n) => n.as_f64().map(FieldValue::Number),
        Value::String(s) => {
            if s.trim_start().starts_with('[') {
                if let Ok(items) = serde_json::from_str::<Vec<String>>(s) {
                    return Some(FieldValue::List(items));
                }
            }
            Some(FieldValue::Text(s.clone()))
        }
        Value::Array(items) => Some(FieldValue::List(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        )),
    }
}
