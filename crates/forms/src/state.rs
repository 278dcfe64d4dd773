//! Form runtime state: the controller behind every form instance.
//!
//! `FormState` owns its schema and one `FieldState` per field. Every mutation
//! (`set_value`, `set_touched`, `touch_all`, `reset`) recomputes field errors
//! synchronously, so `is_valid()` can never disagree with the per-field errors.
//!
//! Errors are always computed; `visible_error` only reports them once the
//! field has been touched (blur or submit attempt).
//!
//! ```ignore
//! let mut state = FormState::new(task_schema(), &FormValues::new());
//! state.set_value("title", "Buy milk")?;
//! state.set_touched("title")?;
//! assert!(state.is_valid());
//! ```

use std::collections::HashMap;

use tracing::debug;

use crate::errors::FormError;
use crate::field::FormField;
use crate::schema::FormSchema;

/// Full value set of a form, keyed by field key.
pub type FormValues = HashMap<String, String>;

/// Runtime state of a single field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldState {
    pub value: String,
    pub initial: String,
    pub touched: bool,
    pub error: Option<String>,
}

impl FieldState {
    fn new(initial: String) -> Self {
        Self {
            value: initial.clone(),
            initial,
            touched: false,
            error: None,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.value != self.initial
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    schema: FormSchema,
    fields: HashMap<String, FieldState>,
}

impl FormState {
    /// Seed a form from `initial`. Fields missing from `initial` start empty;
    /// keys without a matching field are ignored.
    pub fn new(schema: FormSchema, initial: &FormValues) -> Self {
        let fields = schema
            .fields
            .iter()
            .map(|f| {
                let value = initial.get(&f.key).cloned().unwrap_or_default();
                (f.key.clone(), FieldState::new(value))
            })
            .collect();
        for key in initial.keys() {
            if schema.field_by_key(key).is_none() {
                debug!("Ignoring initial value for unknown field {key}");
            }
        }
        let mut state = Self { schema, fields };
        state.revalidate();
        state
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Fields in schema order, paired with their runtime state.
    pub fn fields(&self) -> impl Iterator<Item = (&FormField, &FieldState)> {
        self.schema
            .fields
            .iter()
            .filter_map(|f| self.fields.get(&f.key).map(|s| (f, s)))
    }

    pub fn field(&self, key: &str) -> Option<&FieldState> {
        self.fields.get(key)
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(|f| f.value.as_str())
    }

    pub fn values(&self) -> FormValues {
        self.fields
            .iter()
            .map(|(k, f)| (k.clone(), f.value.clone()))
            .collect()
    }

    /// Update a value and re-run validation. Does not mark the field touched.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> Result<(), FormError> {
        let field = self.field_mut(key)?;
        field.value = value.into();
        self.revalidate();
        Ok(())
    }

    /// Mark a field touched (blur).
    pub fn set_touched(&mut self, key: &str) -> Result<(), FormError> {
        self.field_mut(key)?.touched = true;
        self.revalidate();
        Ok(())
    }

    /// Mark every field touched so hidden errors become visible (submit attempt).
    pub fn touch_all(&mut self) {
        for field in self.fields.values_mut() {
            field.touched = true;
        }
        self.revalidate();
    }

    /// Restore initial values and clear touched flags.
    pub fn reset(&mut self) {
        for field in self.fields.values_mut() {
            field.value = field.initial.clone();
            field.touched = false;
        }
        self.revalidate();
    }

    pub fn is_touched(&self, key: &str) -> bool {
        self.fields.get(key).is_some_and(|f| f.touched)
    }

    /// Current validation error, whether or not the user may see it yet.
    pub fn error(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|f| f.error.as_deref())
    }

    /// Error to display: only once the field has been touched.
    pub fn visible_error(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .filter(|f| f.touched)
            .and_then(|f| f.error.as_deref())
    }

    /// Field errors that should currently be shown, in schema order.
    pub fn visible_errors(&self) -> Vec<(&FormField, &str)> {
        self.fields()
            .filter(|(_, s)| s.touched)
            .filter_map(|(f, s)| s.error.as_deref().map(|e| (f, e)))
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.fields.values().all(|f| f.error.is_none())
    }

    pub fn is_dirty(&self) -> bool {
        self.fields.values().any(FieldState::is_dirty)
    }

    fn field_mut(&mut self, key: &str) -> Result<&mut FieldState, FormError> {
        self.fields
            .get_mut(key)
            .ok_or_else(|| FormError::UnknownField(key.to_string()))
    }

    // Cross-field rules can depend on any value, so every field is re-checked.
    fn revalidate(&mut self) {
        let all = self.values();
        for f in &self.schema.fields {
            if let Some(state) = self.fields.get_mut(&f.key) {
                state.error = f.rules.evaluate(&state.value, &all);
            }
        }
    }
}
