// File: src/view_model.rs
// Purpose: Untyped per-view data populated from REST responses

use serde::Serialize;
use serde_json::{Map, Value};

/// Field name → JSON value mapping read by view templates
///
/// Each field is replaced wholesale when bound; nothing is merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ViewModel {
    fields: Map<String, Value>,
}

impl ViewModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `value` to `field`, replacing whatever was there
    pub fn bind(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    /// Builder form of [`ViewModel::bind`]
    pub fn with(mut self, field: impl Into<String>, value: Value) -> Self {
        self.bind(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Looks up a dotted path like `module.traits.0.name`
    ///
    /// Object members are addressed by key, array elements by index.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.fields.get(parts.next()?)?;
        for part in parts {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

/// Convert a value to text for display in a template
///
/// Strings are shown without quotes, `null` as nothing, whole numbers without
/// a fractional part; arrays and objects fall back to compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bind_replaces_wholesale() {
        let mut vm = ViewModel::new().with("module", json!({"name": "Core", "version": 1}));
        vm.bind("module", json!({"name": "Db"}));
        assert_eq!(vm.get("module"), Some(&json!({"name": "Db"})));
        assert_eq!(vm.len(), 1);
    }

    #[test]
    fn test_lookup_nested() {
        let vm = ViewModel::new().with(
            "module",
            json!({"name": "Core", "traits": [{"name": "Versioned"}]}),
        );
        assert_eq!(vm.lookup("module.name"), Some(&json!("Core")));
        assert_eq!(vm.lookup("module.traits.0.name"), Some(&json!("Versioned")));
        assert_eq!(vm.lookup("module.traits.7"), None);
        assert_eq!(vm.lookup("module.name.first"), None);
        assert_eq!(vm.lookup("missing"), None);
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("Core")), "Core");
        assert_eq!(display_value(&json!(null)), "");
        assert_eq!(display_value(&json!(3)), "3");
        assert_eq!(display_value(&json!(true)), "true");
        assert_eq!(display_value(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let vm = ViewModel::new().with("owner", json!("Owner Name"));
        assert_eq!(serde_json::to_value(&vm).unwrap(), json!({"owner": "Owner Name"}));
    }
}
