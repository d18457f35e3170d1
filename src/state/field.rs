//! Field specifications and per-field validation state

use super::path::FieldPath;
use super::rules::FieldRules;
use super::value::Value;

/// Validation lifecycle of a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldStatus {
    /// Never validated since the step mounted
    #[default]
    Untouched,
    /// A validation pass is in flight for the field
    Validating,
    Valid,
    Invalid,
}

impl FieldStatus {
    pub fn is_invalid(&self) -> bool {
        matches!(self, FieldStatus::Invalid)
    }
}

/// One choice of a select or multi-select field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// What kind of widget edits the field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text { multiline: bool },
    Number,
    /// Single choice cycled with Left/Right
    Select { options: Vec<SelectOption> },
    /// Zero or more choices toggled with Space
    MultiSelect { options: Vec<SelectOption> },
    /// Free-form string list; Enter commits the pending entry
    Entries,
}

/// Static description of a single form field
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Relative to the step root, or to the row for list sub-fields
    pub path: FieldPath,
    pub label: String,
    pub kind: FieldKind,
    pub rules: FieldRules,
    default: Option<Value>,
}

impl FieldSpec {
    fn new(path: FieldPath, label: &str, kind: FieldKind) -> Self {
        Self {
            path,
            label: label.to_string(),
            kind,
            rules: FieldRules::new(),
            default: None,
        }
    }

    /// Single-line text field
    pub fn text(path: FieldPath, label: &str) -> Self {
        Self::new(path, label, FieldKind::Text { multiline: false })
    }

    /// Multi-line text field
    pub fn multiline(path: FieldPath, label: &str) -> Self {
        Self::new(path, label, FieldKind::Text { multiline: true })
    }

    pub fn number(path: FieldPath, label: &str) -> Self {
        Self::new(path, label, FieldKind::Number)
    }

    /// `options` are (value, label) pairs
    pub fn select(path: FieldPath, label: &str, options: &[(&str, &str)]) -> Self {
        let options = options
            .iter()
            .map(|(value, label)| SelectOption::new(value, label))
            .collect();
        Self::new(path, label, FieldKind::Select { options })
    }

    pub fn multi_select(path: FieldPath, label: &str, options: &[(&str, &str)]) -> Self {
        let options = options
            .iter()
            .map(|(value, label)| SelectOption::new(value, label))
            .collect();
        Self::new(path, label, FieldKind::MultiSelect { options })
    }

    pub fn entries(path: FieldPath, label: &str) -> Self {
        Self::new(path, label, FieldKind::Entries)
    }

    pub fn rules(mut self, rules: FieldRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn default_to(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Initial value when no prior data exists for the field
    pub fn default_value(&self) -> Value {
        if let Some(value) = &self.default {
            return value.clone();
        }
        match &self.kind {
            FieldKind::Text { .. } | FieldKind::Select { .. } => Value::Text(String::new()),
            FieldKind::Number => Value::Empty,
            FieldKind::MultiSelect { .. } | FieldKind::Entries => Value::StringList(vec![]),
        }
    }

    pub fn is_required(&self) -> bool {
        self.rules.is_required()
    }
}
