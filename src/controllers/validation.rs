//! Declarative per-field validation.
//!
//! A [`Field`] owns its value, its rules, and the interaction flags used to
//! decide when errors are shown. Rules are re-evaluated on every change.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// WHATWG-style address check: local part, `@`, dot-separated labels.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

/// Letters and spaces only.
pub static PERSON_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z ]*$").expect("name pattern is valid"));

/// Letters, spaces and underscores.
pub static DEPARTMENT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_ ]*$").expect("department pattern is valid"));

/// A single validation rule.
///
/// Only `Required` rejects an empty value; the others pass on empty input
/// so a blank optional field is not reported twice.
#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Pattern(&'static LazyLock<Regex>),
    Email,
}

/// Why a value failed a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Required,
    MinLength { min: usize, actual: usize },
    MaxLength { max: usize, actual: usize },
    Pattern,
    Email,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Required => write!(f, "This field is required."),
            FieldError::MinLength { min, .. } => write!(f, "Must be at least {min} characters."),
            FieldError::MaxLength { max, .. } => write!(f, "Must be at most {max} characters."),
            FieldError::Pattern => write!(f, "Contains invalid characters."),
            FieldError::Email => write!(f, "Please enter a valid email address."),
        }
    }
}

impl Rule {
    /// Check `value`, returning the failure if any.
    pub fn check(&self, value: &str) -> Option<FieldError> {
        let blank = value.trim().is_empty();
        let len = value.chars().count();
        match self {
            Rule::Required if blank => Some(FieldError::Required),
            Rule::Required => None,
            _ if value.is_empty() => None,
            Rule::MinLength(min) if len < *min => Some(FieldError::MinLength {
                min: *min,
                actual: len,
            }),
            Rule::MaxLength(max) if len > *max => Some(FieldError::MaxLength {
                max: *max,
                actual: len,
            }),
            Rule::Pattern(re) if !re.is_match(value) => Some(FieldError::Pattern),
            // Email is submitted trimmed.
            Rule::Email if !EMAIL.is_match(value.trim()) => Some(FieldError::Email),
            _ => None,
        }
    }
}

/// A text input with its rules and interaction state.
#[derive(Debug, Clone)]
pub struct Field {
    value: String,
    rules: Vec<Rule>,
    errors: Vec<FieldError>,
    touched: bool,
    dirty: bool,
    disabled: bool,
}

impl Field {
    pub fn new(rules: Vec<Rule>) -> Self {
        let mut field = Self {
            value: String::new(),
            rules,
            errors: Vec::new(),
            touched: false,
            dirty: false,
            disabled: false,
        };
        field.validate();
        field
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// User edit. Ignored on a disabled field.
    pub fn set(&mut self, value: impl Into<String>) -> bool {
        if self.disabled {
            return false;
        }
        self.value = value.into();
        self.dirty = true;
        self.validate();
        true
    }

    /// Programmatic fill (e.g. from a loaded record). Not a user edit.
    pub fn patch(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.validate();
    }

    pub fn touch(&mut self) {
        self.touched = true;
    }

    pub fn disable(&mut self) {
        self.disabled = true;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Disabled fields are not validated.
    pub fn is_valid(&self) -> bool {
        self.disabled || self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        if self.disabled { &[] } else { &self.errors }
    }

    /// Errors worth showing: only after the user interacted with the field.
    pub fn visible_errors(&self) -> &[FieldError] {
        if self.touched || self.dirty {
            self.errors()
        } else {
            &[]
        }
    }

    fn validate(&mut self) {
        self.errors = self.rules.iter().filter_map(|r| r.check(&self.value)).collect();
    }
}
