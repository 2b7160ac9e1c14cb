//! Declarative field validation.
//!
//! A field is checked against an ordered list of [`Rule`]s and yields the
//! message of the first rule that fails. Resource validators combine a set of
//! [`FieldSpec`]s with a [`ValidationMode`]:
//! - `Full` (create/replace): every declared field is required.
//! - `Partial` (patch): only supplied fields are checked, each as required,
//!   and at least one declared field must be supplied.
//!
//! Whether a field was supplied is carried by [`Presence`], which
//! distinguishes a missing key from a key set to a falsy value.

pub mod agent;
pub mod case;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Message for a payload that tries to set the id.
pub const ID_NOT_ALLOWED: &str = "You can't pass an id when making this request";

/// Error-map key used for payload-level errors.
pub const BODY_KEY: &str = "body";

// ============================================================================
// PRESENCE
// ============================================================================

/// Whether a body key was supplied, and with what raw value.
///
/// Used with `#[serde(default)]`: a missing key deserializes to `Absent`,
/// any supplied value (including `null`) to `Present`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Presence {
    #[default]
    Absent,
    Present(Value),
}

impl Presence {
    pub fn is_present(&self) -> bool {
        matches!(self, Presence::Present(_))
    }

    /// The supplied value, if any.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Presence::Present(value) => Some(value),
            Presence::Absent => None,
        }
    }

    /// The supplied value when it is a string.
    pub fn as_str(&self) -> Option<&str> {
        self.value().and_then(Value::as_str)
    }
}

impl From<Value> for Presence {
    fn from(value: Value) -> Self {
        Presence::Present(value)
    }
}

impl<'de> Deserialize<'de> for Presence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Presence::Present)
    }
}

/// JSON values treated as "no value": `null`, `false`, `0` and `""`.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

// ============================================================================
// RULES
// ============================================================================

/// A predicate over a field value plus the message reported when it fails.
pub struct Rule<'a> {
    check: Box<dyn Fn(&Value) -> bool + Send + Sync + 'a>,
    message: String,
}

impl<'a> Rule<'a> {
    pub fn new(
        message: impl Into<String>,
        check: impl Fn(&Value) -> bool + Send + Sync + 'a,
    ) -> Self {
        Self {
            check: Box::new(check),
            message: message.into(),
        }
    }

    /// Value is a JSON string.
    pub fn is_string(message: impl Into<String>) -> Self {
        Self::new(message, Value::is_string)
    }

    /// String predicate; non-strings fail.
    pub fn on_str(
        message: impl Into<String>,
        check: impl Fn(&str) -> bool + Send + Sync + 'a,
    ) -> Self {
        Self::new(message, move |value| value.as_str().is_some_and(&check))
    }

    /// Trimmed string has at least `min` characters.
    pub fn trimmed_min(min: usize, message: impl Into<String>) -> Self {
        Self::on_str(message, move |s| s.trim().chars().count() >= min)
    }

    /// Trimmed string has at most `max` characters.
    pub fn trimmed_max(max: usize, message: impl Into<String>) -> Self {
        Self::on_str(message, move |s| s.trim().chars().count() <= max)
    }

    pub fn passes(&self, value: &Value) -> bool {
        (self.check)(value)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Debug for Rule<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("message", &self.message).finish()
    }
}

/// Validate one field value.
///
/// An absent or falsy value yields "`<field_name>` field is required" when
/// `is_required`, and no error otherwise (rules are skipped). A present value
/// yields the message of the first failing rule, if any.
pub fn validate_field(
    value: Option<&Value>,
    rules: &[Rule<'_>],
    is_required: bool,
    field_name: &str,
) -> Option<String> {
    let value = match value {
        Some(value) if !is_falsy(value) => value,
        _ => {
            return is_required.then(|| format!("{} field is required", field_name));
        }
    };

    rules
        .iter()
        .find(|rule| !rule.passes(value))
        .map(|rule| rule.message.clone())
}

// ============================================================================
// RESOURCE VALIDATION
// ============================================================================

/// Declared field of a resource payload.
#[derive(Debug)]
pub struct FieldSpec<'a> {
    /// Body key (camelCase wire name).
    pub key: &'static str,
    /// Name used in "field is required" messages.
    pub display_name: &'static str,
    pub rules: Vec<Rule<'a>>,
}

/// Which fields a resource validator requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Create/replace: every declared field is required.
    Full,
    /// Patch: supplied fields are checked, at least one must be supplied.
    Partial,
}

/// Validate a payload given its id presence and `(spec, value)` pairs.
pub fn validate_resource(
    id: &Presence,
    fields: &[(FieldSpec<'_>, &Presence)],
    mode: ValidationMode,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if id.is_present() {
        errors.insert("id", ID_NOT_ALLOWED);
    }

    for (spec, value) in fields {
        let should_validate = value.is_present() || mode == ValidationMode::Full;
        if !should_validate {
            continue;
        }
        if let Some(error) = validate_field(value.value(), &spec.rules, true, spec.display_name) {
            errors.insert(spec.key, error);
        }
    }

    if mode == ValidationMode::Partial && !fields.iter().any(|(_, value)| value.is_present()) {
        let names = fields
            .iter()
            .map(|(spec, _)| spec.display_name.to_lowercase())
            .collect::<Vec<_>>()
            .join(", ");
        errors.insert(
            BODY_KEY,
            format!("At least one field ({}) must be provided for update", names),
        );
    }

    errors
}

// ============================================================================
// ERROR MAP
// ============================================================================

/// Field name → error message, in the order the errors were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<(String, String)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();
        match self.entries.iter_mut().find(|(key, _)| *key == field) {
            Some(entry) => entry.1 = message,
            None => self.entries.push((field, message)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, message) in &self.entries {
            map.serialize_entry(field, message)?;
        }
        map.end()
    }
}

/// Whether validation produced any error.
pub fn has_validation_errors(errors: &ValidationErrors) -> bool {
    !errors.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn name_like_rules() -> Vec<Rule<'static>> {
        vec![
            Rule::is_string("must be a string"),
            Rule::trimmed_min(2, "too short"),
        ]
    }

    #[test]
    fn test_absent_required_field() {
        let err = validate_field(None, &name_like_rules(), true, "Name");
        assert_eq!(err.as_deref(), Some("Name field is required"));
    }

    #[test]
    fn test_absent_optional_field_skips_rules() {
        assert_eq!(validate_field(None, &name_like_rules(), false, "Name"), None);
        assert_eq!(
            validate_field(Some(&json!("")), &name_like_rules(), false, "Name"),
            None
        );
    }

    #[test]
    fn test_falsy_values_count_as_missing() {
        for value in [json!(null), json!(false), json!(0), json!("")] {
            let err = validate_field(Some(&value), &name_like_rules(), true, "Name");
            assert_eq!(err.as_deref(), Some("Name field is required"), "{value}");
        }
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let err = validate_field(Some(&json!(42)), &name_like_rules(), true, "Name");
        assert_eq!(err.as_deref(), Some("must be a string"));

        let err = validate_field(Some(&json!(" a ")), &name_like_rules(), true, "Name");
        assert_eq!(err.as_deref(), Some("too short"));

        assert_eq!(
            validate_field(Some(&json!("ok")), &name_like_rules(), true, "Name"),
            None
        );
    }

    #[test]
    fn test_presence_deserialization() {
        #[derive(Deserialize)]
        struct Body {
            #[serde(default)]
            a: Presence,
            #[serde(default)]
            b: Presence,
        }

        let body: Body = serde_json::from_value(json!({ "a": null })).unwrap();
        assert_eq!(body.a, Presence::Present(Value::Null));
        assert_eq!(body.b, Presence::Absent);
    }

    #[test]
    fn test_errors_serialize_in_insertion_order() {
        let mut errors = ValidationErrors::new();
        errors.insert("name", "bad name");
        errors.insert("role", "bad role");
        errors.insert("name", "worse name");

        assert_eq!(errors.len(), 2);
        assert_eq!(
            serde_json::to_string(&errors).unwrap(),
            r#"{"name":"worse name","role":"bad role"}"#
        );
        assert!(has_validation_errors(&errors));
        assert!(!has_validation_errors(&ValidationErrors::new()));
    }
}
