//! Form schema: the ordered field table `{field -> rule set}`.
//!
//! ```ignore
//! use forms::{FormSchema, FormField, FieldKind, validation};
//!
//! let schema = FormSchema::new("Edit Task", vec![
//!     FormField::new("title", "Title", FieldKind::Text).rules(validation::title_rules()),
//!     FormField::new("description", "Description", FieldKind::Multiline),
//! ]);
//! assert_eq!(schema.validate("title", "", &Default::default()).as_deref(), Some("Title is required"));
//! ```

use crate::field::FormField;
use crate::state::FormValues;

#[derive(Debug, Clone)]
pub struct FormSchema {
    pub title: String,
    pub fields: Vec<FormField>,
}

impl FormSchema {
    pub fn new(title: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            title: title.into(),
            fields,
        }
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field_by_key(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Run the rule set of `field` against `value`.
    ///
    /// Unknown fields have no rules and therefore always pass.
    pub fn validate(&self, field: &str, value: &str, all: &FormValues) -> Option<String> {
        self.field_by_key(field)
            .and_then(|f| f.rules.evaluate(value, all))
    }
}
