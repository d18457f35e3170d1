//! Declarative validation rules
//!
//! Each field carries an ordered rule set built once per step and
//! immutable afterwards. Evaluation stops at the first failing rule.
//! Rules other than `Required` pass on unset values, so optional fields
//! only validate once something has been entered.

use super::value::Value;
use regex::Regex;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Shown when a custom predicate misbehaves (panics) instead of
/// returning a verdict
pub const GENERIC_RULE_MESSAGE: &str = "Invalid value";

/// Verdict of a custom predicate: pass, or a failure message
pub type CustomResult = Result<(), String>;

type CustomCheck = Arc<dyn Fn(&Value) -> CustomResult + Send + Sync>;

/// A single named check producing a human-readable message on failure
#[derive(Clone)]
pub enum Rule {
    Required { message: String },
    MinLength { min: usize, message: String },
    MaxLength { max: usize, message: String },
    Min { min: i64, message: String },
    Max { max: i64, message: String },
    Pattern { pattern: Regex, message: String },
    Custom { check: CustomCheck },
}

impl Rule {
    /// First failing message, or None when the rule passes
    pub fn check(&self, value: &Value) -> Option<String> {
        match self {
            Rule::Required { message } => value.is_unset().then(|| message.clone()),
            _ if value.is_unset() => None,
            Rule::MinLength { min, message } => value
                .as_text()
                .is_some_and(|s| s.chars().count() < *min)
                .then(|| message.clone()),
            Rule::MaxLength { max, message } => value
                .as_text()
                .is_some_and(|s| s.chars().count() > *max)
                .then(|| message.clone()),
            Rule::Min { min, message } => value
                .as_number()
                .is_some_and(|n| n < *min)
                .then(|| message.clone()),
            Rule::Max { max, message } => value
                .as_number()
                .is_some_and(|n| n > *max)
                .then(|| message.clone()),
            Rule::Pattern { pattern, message } => value
                .as_text()
                .is_some_and(|s| !pattern.is_match(s))
                .then(|| message.clone()),
            Rule::Custom { check } => {
                // A predicate that panics must not take the whole step
                // down with it; it fails with a generic message instead.
                match catch_unwind(AssertUnwindSafe(|| check(value))) {
                    Ok(Ok(())) => None,
                    Ok(Err(message)) => Some(message),
                    Err(_) => Some(GENERIC_RULE_MESSAGE.to_string()),
                }
            }
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required { .. } => write!(f, "Required"),
            Rule::MinLength { min, .. } => write!(f, "MinLength({min})"),
            Rule::MaxLength { max, .. } => write!(f, "MaxLength({max})"),
            Rule::Min { min, .. } => write!(f, "Min({min})"),
            Rule::Max { max, .. } => write!(f, "Max({max})"),
            Rule::Pattern { pattern, .. } => write!(f, "Pattern({})", pattern.as_str()),
            Rule::Custom { .. } => write!(f, "Custom"),
        }
    }
}

/// Ordered rule set for one field. Builders are chained in the
/// canonical order: required first, then type/range/pattern checks,
/// then custom predicates.
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    rules: Vec<Rule>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, message: &str) -> Self {
        self.rules.push(Rule::Required {
            message: message.to_string(),
        });
        self
    }

    pub fn min_length(mut self, min: usize, message: &str) -> Self {
        self.rules.push(Rule::MinLength {
            min,
            message: message.to_string(),
        });
        self
    }

    pub fn max_length(mut self, max: usize, message: &str) -> Self {
        self.rules.push(Rule::MaxLength {
            max,
            message: message.to_string(),
        });
        self
    }

    pub fn min(mut self, min: i64, message: &str) -> Self {
        self.rules.push(Rule::Min {
            min,
            message: message.to_string(),
        });
        self
    }

    pub fn max(mut self, max: i64, message: &str) -> Self {
        self.rules.push(Rule::Max {
            max,
            message: message.to_string(),
        });
        self
    }

    /// Pattern rules are built from static tables; an invalid pattern
    /// is a programming error caught on first construction.
    pub fn pattern(mut self, pattern: &str, message: &str) -> Self {
        self.rules.push(Rule::Pattern {
            pattern: Regex::new(pattern).expect("static rule pattern must compile"),
            message: message.to_string(),
        });
        self
    }

    pub fn custom(
        mut self,
        check: impl Fn(&Value) -> CustomResult + Send + Sync + 'static,
    ) -> Self {
        self.rules.push(Rule::Custom {
            check: Arc::new(check),
        });
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules
            .iter()
            .any(|r| matches!(r, Rule::Required { .. }))
    }

    /// Evaluate in declaration order; first failure wins
    pub fn validate(&self, value: &Value) -> Option<String> {
        self.rules.iter().find_map(|rule| rule.check(value))
    }
}
