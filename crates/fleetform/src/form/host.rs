// File: src/form/host.rs
// Purpose: The form a FormValidator is bound to, plus an in-memory implementation

use crate::form_field::FieldAttrs;
use serde_json::Value;

/// A live, form-like structure
///
/// Implemented by whatever owns the fields: a DOM binding, a TUI, or
/// [`MemoryForm`]. Every lookup tolerates unknown names.
pub trait FormHost {
    /// Field names in document order
    fn field_names(&self) -> Vec<String>;

    /// Constraints for a field, `None` if it is not (or no longer) rendered
    fn field_attrs(&self, name: &str) -> Option<FieldAttrs>;

    /// Current value of a field
    fn value(&self, name: &str) -> Option<Value>;

    /// Store user input; returns `false` for unknown fields
    fn set_value(&mut self, name: &str, value: Value) -> bool;

    /// Detach a field from the form
    fn remove_field(&mut self, _name: &str) -> bool {
        false
    }
}

#[derive(Debug, Clone)]
struct MemoryField {
    name: String,
    attrs: FieldAttrs,
    value: Value,
}

/// In-memory form with fields kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryForm {
    fields: Vec<MemoryField>,
}

impl MemoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a field with an empty value
    pub fn field(mut self, name: impl Into<String>, attrs: FieldAttrs) -> Self {
        self.add_field(name, attrs, Value::String(String::new()));
        self
    }

    /// Add or replace a field
    pub fn add_field(&mut self, name: impl Into<String>, attrs: FieldAttrs, value: Value) {
        let name = name.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.attrs = attrs;
                field.value = value;
            }
            None => self.fields.push(MemoryField { name, attrs, value }),
        }
    }

    fn find(&self, name: &str) -> Option<&MemoryField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl FormHost for MemoryForm {
    fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    fn field_attrs(&self, name: &str) -> Option<FieldAttrs> {
        self.find(name).map(|f| f.attrs.clone())
    }

    fn value(&self, name: &str) -> Option<Value> {
        self.find(name).map(|f| f.value.clone())
    }

    fn set_value(&mut self, name: &str, value: Value) -> bool {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.value = value;
                true
            }
            None => false,
        }
    }

    fn remove_field(&mut self, name: &str) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| f.name != name);
        self.fields.len() != before
    }
}
