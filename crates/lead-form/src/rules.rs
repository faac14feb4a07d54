//! Declarative validation rules and their interpreter.
//!
//! A field carries an ordered list of [`Rule`]s. The interpreter walks the
//! list and reports the first failure, so `Required` placed before a
//! predicate reproduces the usual "required, then well-formed" behavior.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::form::{FieldErrors, FormValues};
use crate::validators::ValidatorKind;

/// Message for a missing required value.
pub const REQUIRED_MESSAGE: &str = "Este campo é obrigatório";

/// Fallback message for a failed predicate without its own message.
pub const INVALID_MESSAGE: &str = "Valor inválido";

/// Predicate over a raw field value.
pub type Check = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// One validation step for a field.
#[derive(Clone)]
pub enum Rule {
    /// Missing or empty values fail.
    Required,
    /// Applied only when a value is present.
    Predicate {
        check: Check,
        message: Option<String>,
    },
}

impl Rule {
    pub fn predicate(check: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate {
            check: Arc::new(check),
            message: None,
        }
    }

    /// Predicate backed by a registry validator.
    pub fn validator(kind: ValidatorKind) -> Self {
        Self::predicate(move |value| kind.check(value))
    }

    /// Error message for `value`, or `None` if the rule passes.
    pub fn evaluate(&self, value: Option<&str>) -> Option<String> {
        let value = value.unwrap_or_default();
        match self {
            Self::Required => value.is_empty().then(|| REQUIRED_MESSAGE.to_string()),
            Self::Predicate { check, message } => (!value.is_empty() && !check(value))
                .then(|| message.clone().unwrap_or_else(|| INVALID_MESSAGE.to_string())),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("Required"),
            Self::Predicate { message, .. } => f
                .debug_struct("Predicate")
                .field("message", message)
                .finish_non_exhaustive(),
        }
    }
}

/// Ordered rules for a single field.
#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    rules: Vec<Rule>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required() -> Self {
        Self::new().push(Rule::Required)
    }

    #[must_use]
    pub fn push(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append a registry validator.
    #[must_use]
    pub fn validate_with(self, kind: ValidatorKind) -> Self {
        self.push(Rule::validator(kind))
    }

    /// Set the message of the most recent predicate.
    ///
    /// An empty message is ignored so failures always carry text.
    #[must_use]
    pub fn message(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        if let Some(Rule::Predicate { message, .. }) = self
            .rules
            .iter_mut()
            .rev()
            .find(|rule| matches!(rule, Rule::Predicate { .. }))
        {
            *message = Some(text);
        }
        self
    }

    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|rule| matches!(rule, Rule::Required))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// First failing rule's message.
    pub fn evaluate(&self, value: Option<&str>) -> Option<String> {
        self.rules.iter().find_map(|rule| rule.evaluate(value))
    }
}

/// Rules keyed by field name. Fields without an entry are never checked.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    fields: BTreeMap<String, FieldRules>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, rules: FieldRules) -> Self {
        self.fields.insert(name.into(), rules);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldRules> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Evaluate every ruled field against `values`.
    ///
    /// The returned map holds one entry per failing field and nothing else.
    pub fn check(&self, values: &FormValues) -> FieldErrors {
        self.fields
            .iter()
            .filter_map(|(name, rules)| {
                rules
                    .evaluate(values.get(name).map(String::as_str))
                    .map(|message| (name.clone(), message))
            })
            .collect()
    }
}

/// True if `values` satisfy every rule in `rules`.
pub fn validate(values: &FormValues, rules: &RuleSet) -> bool {
    rules.check(values).is_empty()
}
