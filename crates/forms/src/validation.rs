//! Declarative validation rules.
//!
//! A field owns a `RuleSet`: an ordered list of `Rule`s plus an optional trim
//! transform applied before any rule sees the value. Evaluation is pure and
//! reports at most one message per field:
//!   1. structural rules (`Required`) run first,
//!   2. the remaining rules run in declaration order,
//!   3. the first failing rule wins.
//!
//! ```ignore
//! let rules = RuleSet::new()
//!     .trimmed()
//!     .rule(Rule::required("Title is required"));
//! assert_eq!(rules.evaluate("  ", &FormValues::new()).as_deref(), Some("Title is required"));
//! ```

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

use crate::state::FormValues;

lazy_static! {
    /// `local@domain`, domain made of dot-separated alphanumeric labels
    /// (hyphens allowed inside a label, at most 63 characters each).
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();
}

/// Symbols accepted by the password "special character" rule.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*()_-+={}[]:;\"'|,.<>/?\\";

pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 20;

/// Character classes a value can be required to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Lowercase,
    Uppercase,
    Digit,
    Symbol,
}

impl CharClass {
    pub fn matches(self, c: char) -> bool {
        match self {
            CharClass::Lowercase => c.is_ascii_lowercase(),
            CharClass::Uppercase => c.is_ascii_uppercase(),
            CharClass::Digit => c.is_ascii_digit(),
            CharClass::Symbol => PASSWORD_SYMBOLS.contains(c),
        }
    }
}

/// Predicate over a field value and the whole value set (cross-field rules).
#[derive(Clone, Copy)]
pub struct Predicate(pub fn(&str, &FormValues) -> bool);

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// A single validation rule with its error message.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Value must not be empty. Combine with `RuleSet::trimmed` to reject blanks.
    Required { message: String },
    MinLength { min: usize, message: String },
    MaxLength { max: usize, message: String },
    /// Value must not be empty after trimming.
    NotBlank { message: String },
    /// Well-formed `local@domain` shape.
    Email { message: String },
    /// The text after the first `@` must contain a `.`.
    EmailDomainHasDot { message: String },
    Contains { class: CharClass, message: String },
    Custom {
        name: &'static str,
        check: Predicate,
        message: String,
    },
}

impl Rule {
    pub fn required(message: impl Into<String>) -> Self {
        Rule::Required {
            message: message.into(),
        }
    }

    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Rule::MinLength {
            min,
            message: message.into(),
        }
    }

    pub fn max_length(max: usize, message: impl Into<String>) -> Self {
        Rule::MaxLength {
            max,
            message: message.into(),
        }
    }

    pub fn not_blank(message: impl Into<String>) -> Self {
        Rule::NotBlank {
            message: message.into(),
        }
    }

    pub fn email(message: impl Into<String>) -> Self {
        Rule::Email {
            message: message.into(),
        }
    }

    pub fn email_domain_has_dot(message: impl Into<String>) -> Self {
        Rule::EmailDomainHasDot {
            message: message.into(),
        }
    }

    pub fn contains(class: CharClass, message: impl Into<String>) -> Self {
        Rule::Contains {
            class,
            message: message.into(),
        }
    }

    pub fn custom(
        name: &'static str,
        check: fn(&str, &FormValues) -> bool,
        message: impl Into<String>,
    ) -> Self {
        Rule::Custom {
            name,
            check: Predicate(check),
            message: message.into(),
        }
    }

    /// Stable identifier, mostly useful in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Required { .. } => "required",
            Rule::MinLength { .. } => "min",
            Rule::MaxLength { .. } => "max",
            Rule::NotBlank { .. } => "no-whitespace",
            Rule::Email { .. } => "email",
            Rule::EmailDomainHasDot { .. } => "is-domain-valid",
            Rule::Contains { class, .. } => match class {
                CharClass::Lowercase => "has-lowercase",
                CharClass::Uppercase => "has-uppercase",
                CharClass::Digit => "has-number",
                CharClass::Symbol => "has-symbol",
            },
            Rule::Custom { name, .. } => name,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Rule::Required { message }
            | Rule::MinLength { message, .. }
            | Rule::MaxLength { message, .. }
            | Rule::NotBlank { message }
            | Rule::Email { message }
            | Rule::EmailDomainHasDot { message }
            | Rule::Contains { message, .. }
            | Rule::Custom { message, .. } => message,
        }
    }

    /// Structural rules run before every other rule of the set.
    pub fn is_structural(&self) -> bool {
        matches!(self, Rule::Required { .. })
    }

    pub fn passes(&self, value: &str, all: &FormValues) -> bool {
        match self {
            Rule::Required { .. } => !value.is_empty(),
            Rule::MinLength { min, .. } => value.chars().count() >= *min,
            Rule::MaxLength { max, .. } => value.chars().count() <= *max,
            Rule::NotBlank { .. } => !value.trim().is_empty(),
            Rule::Email { .. } => EMAIL_REGEX.is_match(value),
            Rule::EmailDomainHasDot { .. } => value
                .split_once('@')
                .is_some_and(|(_, domain)| domain.contains('.')),
            Rule::Contains { class, .. } => value.chars().any(|c| class.matches(c)),
            Rule::Custom { check, .. } => (check.0)(value, all),
        }
    }
}

/// Ordered rules for one field.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    trim: bool,
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim the value before evaluating the rules.
    pub fn trimmed(mut self) -> Self {
        self.trim = true;
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// First failing rule for `value`, `None` when every rule passes.
    pub fn evaluate(&self, value: &str, all: &FormValues) -> Option<String> {
        let value = if self.trim { value.trim() } else { value };
        let structural = self.rules.iter().filter(|r| r.is_structural());
        let ordered = self.rules.iter().filter(|r| !r.is_structural());
        structural
            .chain(ordered)
            .find(|rule| !rule.passes(value, all))
            .map(|rule| rule.message().to_string())
    }
}

/// Task title: required once trimmed.
pub fn title_rules() -> RuleSet {
    RuleSet::new()
        .trimmed()
        .rule(Rule::required("Title is required"))
}

/// Credential email. Both the shape check and the domain check report the
/// same message.
pub fn email_rules() -> RuleSet {
    RuleSet::new()
        .trimmed()
        .rule(Rule::email("Invalid email format"))
        .rule(Rule::required("Email is required"))
        .rule(Rule::email_domain_has_dot("Invalid email format"))
}

/// Credential password, evaluated untrimmed.
pub fn password_rules() -> RuleSet {
    RuleSet::new()
        .rule(Rule::required("Password is required"))
        .rule(Rule::min_length(
            PASSWORD_MIN_LEN,
            format!("Password must be at least {PASSWORD_MIN_LEN} characters"),
        ))
        .rule(Rule::max_length(
            PASSWORD_MAX_LEN,
            format!("Password cannot be longer than {PASSWORD_MAX_LEN} characters"),
        ))
        .rule(Rule::not_blank("Password cannot be empty or whitespace only"))
        .rule(Rule::contains(
            CharClass::Lowercase,
            "Password must include at least one lowercase letter",
        ))
        .rule(Rule::contains(
            CharClass::Uppercase,
            "Password must include at least one uppercase letter",
        ))
        .rule(Rule::contains(
            CharClass::Digit,
            "Password must include at least one number",
        ))
        .rule(Rule::contains(
            CharClass::Symbol,
            "Password must include at least one special character",
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(rules: &RuleSet, value: &str) -> Option<String> {
        rules.evaluate(value, &FormValues::new())
    }

    #[test]
    fn title_fails_only_when_blank() {
        let rules = title_rules();
        for blank in ["", " ", "\t", "   \n "] {
            assert_eq!(check(&rules, blank).as_deref(), Some("Title is required"));
        }
        for ok in ["a", " Buy milk ", "x\n"] {
            assert_eq!(check(&rules, ok), None);
        }
    }

    #[test]
    fn email_examples() {
        let rules = email_rules();
        assert_eq!(check(&rules, "a@b.com"), None);
        assert_eq!(check(&rules, "a@b").as_deref(), Some("Invalid email format"));
        assert_eq!(check(&rules, "").as_deref(), Some("Email is required"));
        assert_eq!(check(&rules, "   ").as_deref(), Some("Email is required"));
    }

    #[test]
    fn email_is_trimmed_before_checks() {
        assert_eq!(check(&email_rules(), "  user@site.com  "), None);
    }

    #[test]
    fn email_rejects_malformed_shapes() {
        let rules = email_rules();
        for bad in ["plain", "@site.com", "user@", "user@-site.com", "us er@site.com", "a@b@c.com"] {
            assert_eq!(
                check(&rules, bad).as_deref(),
                Some("Invalid email format"),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn domain_check_only_looks_for_a_dot() {
        let rule = Rule::email_domain_has_dot("Invalid email format");
        let all = FormValues::new();
        assert!(rule.passes("a@b..c", &all));
        assert!(rule.passes("a@.", &all));
        assert!(!rule.passes("a@localhost", &all));
        assert!(!rule.passes("no-at-sign.com", &all));
    }

    #[test]
    fn password_accepts_strong_values() {
        let rules = password_rules();
        for ok in ["Abcdef1!", "Zz9\\zzzz", "aB3 ~~~~ x.", "Aaaaaaaaaaaaaaaaaa1?"] {
            assert_eq!(check(&rules, ok), None, "{ok} should pass");
        }
    }

    #[test]
    fn password_length_is_bounded_to_8_through_20() {
        let rules = password_rules();
        assert_eq!(
            check(&rules, "Abcde1!").as_deref(),
            Some("Password must be at least 8 characters")
        );
        assert_eq!(check(&rules, "Abcdef1!"), None);
        assert_eq!(check(&rules, "Abcdefghijklmnopqr1!"), None);
        assert_eq!(
            check(&rules, "Abcdefghijklmnopqrs1!").as_deref(),
            Some("Password cannot be longer than 20 characters")
        );
    }

    #[test]
    fn password_reports_first_violation_in_order() {
        let rules = password_rules();
        let cases = [
            ("", "Password is required"),
            ("Ab1!", "Password must be at least 8 characters"),
            ("Abcdefghijklmnopqrst1!", "Password cannot be longer than 20 characters"),
            ("        ", "Password cannot be empty or whitespace only"),
            ("ABCDEFG1!", "Password must include at least one lowercase letter"),
            ("abcdefg1!", "Password must include at least one uppercase letter"),
            ("Abcdefgh!", "Password must include at least one number"),
            ("Abcdefgh1", "Password must include at least one special character"),
        ];
        for (value, expected) in cases {
            assert_eq!(check(&rules, value).as_deref(), Some(expected), "value {value:?}");
        }
    }

    #[test]
    fn password_length_counts_characters() {
        // 19 characters, 34 bytes.
        assert_eq!(check(&password_rules(), "ÄÄÄÄÄÄÄÄÄÄÄÄÄÄÄBc1!"), None);
    }

    #[test]
    fn whitespace_is_not_a_symbol() {
        assert!(!CharClass::Symbol.matches(' '));
        assert!(CharClass::Symbol.matches('\\'));
        assert!(CharClass::Symbol.matches('"'));
        assert!(!CharClass::Symbol.matches('~'));
    }

    #[test]
    fn structural_rules_run_first() {
        // `Email` is declared before `Required` in the email set; an empty
        // value must still report the required message.
        let rules = email_rules();
        assert_eq!(rules.rules()[0].name(), "email");
        assert_eq!(check(&rules, "").as_deref(), Some("Email is required"));
    }

    #[test]
    fn empty_rule_set_always_passes() {
        let rules = RuleSet::new();
        assert!(rules.is_empty());
        assert_eq!(check(&rules, ""), None);
        assert_eq!(check(&rules, "anything"), None);
    }

    #[test]
    fn custom_rules_see_all_values() {
        let rules = RuleSet::new().rule(Rule::custom(
            "matches-password",
            |value, all| all.get("password").map(String::as_str) == Some(value),
            "Passwords do not match",
        ));
        let mut all = FormValues::new();
        all.insert("password".into(), "Abcdef1!".into());
        assert_eq!(rules.evaluate("Abcdef1!", &all), None);
        assert_eq!(
            rules.evaluate("other", &all).as_deref(),
            Some("Passwords do not match")
        );
    }
}
