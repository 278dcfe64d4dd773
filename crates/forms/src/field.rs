//! Form field metadata.
//!
//! A `FormField` pairs a key with its presentation hints and the `RuleSet`
//! the controller evaluates on every change.

use crate::validation::RuleSet;

/// How a hosting UI should present a field.
///
/// - Text / Secret render as single-line editors (Secret is masked on display only)
/// - Multiline renders as a text area
/// - ReadOnly is shown but never edited; it still takes part in touched/error display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Secret,
    Multiline,
    ReadOnly,
}

/// Declarative description of a form field.
#[derive(Debug, Clone)]
pub struct FormField {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    pub rules: RuleSet,
}

impl FormField {
    /// Create a field with an empty rule set (always valid).
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            rules: RuleSet::new(),
        }
    }

    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn is_editable(&self) -> bool {
        !matches!(self.kind, FieldKind::ReadOnly)
    }

    /// Value as it should be displayed (secrets masked).
    pub fn display_value(&self, value: &str) -> String {
        match self.kind {
            FieldKind::Secret => "•".repeat(value.chars().count()),
            _ => value.to_string(),
        }
    }
}
