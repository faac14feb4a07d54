//! Generic form engine.
//!
//! A [`Form`] owns field values, the last computed errors, an immutable
//! [`RuleSet`] and the caller's [`SubmitHandler`]. Errors are recomputed
//! only by [`Form::validate`] (and therefore by [`Form::handle_submit`]);
//! editing a field leaves its previous message in place until the next
//! submit attempt.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::rules::RuleSet;

/// Raw field values keyed by field name.
pub type FormValues = BTreeMap<String, String>;

/// Error messages keyed by field name. Only failing fields have entries.
pub type FieldErrors = BTreeMap<String, String>;

/// Build [`FormValues`] from pairs.
pub fn values_from<I, K, V>(pairs: I) -> FormValues
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Receives the value snapshot of a valid submission.
///
/// Errors are returned to the caller of [`Form::handle_submit`] untouched.
#[async_trait]
pub trait SubmitHandler: Send {
    type Error: Send;

    async fn submit(&mut self, values: FormValues) -> Result<(), Self::Error>;
}

/// Submission trigger with a cancellable default action.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Result of a submit attempt that did not fail in the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the handler was not called.
    Invalid,
    /// The handler ran and returned `Ok`.
    Submitted,
}

pub struct Form<H> {
    values: FormValues,
    errors: FieldErrors,
    rules: RuleSet,
    handler: H,
}

impl<H: SubmitHandler> Form<H> {
    pub fn new(initial_values: FormValues, rules: RuleSet, handler: H) -> Self {
        Self {
            values: initial_values,
            errors: FieldErrors::new(),
            rules,
            handler,
        }
    }

    /// Store a value from a change event. Errors are left as they are.
    pub fn handle_change(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Store a value for inputs without a change event (masked inputs).
    pub fn set_value_by_name(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.handle_change(name, value);
    }

    /// Replace every value, e.g. with a record loaded from the server.
    pub fn set_values(&mut self, values: FormValues) {
        self.values = values;
    }

    /// Overlay some values, keeping the rest.
    pub fn merge_values<I, K, V>(&mut self, partial: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.values.extend(
            partial
                .into_iter()
                .map(|(name, value)| (name.into(), value.into())),
        );
    }

    /// Recompute all errors from scratch. Returns true when nothing failed.
    pub fn validate(&mut self) -> bool {
        self.errors = self.rules.check(&self.values);
        if !self.errors.is_empty() {
            tracing::debug!(
                fields = ?self.errors.keys().collect::<Vec<_>>(),
                "form validation failed"
            );
        }
        self.errors.is_empty()
    }

    /// Prevent the default action, validate, and submit when valid.
    pub async fn handle_submit(
        &mut self,
        event: &mut SubmitEvent,
    ) -> Result<SubmitOutcome, H::Error> {
        event.prevent_default();
        if !self.validate() {
            return Ok(SubmitOutcome::Invalid);
        }
        let snapshot = self.values.clone();
        self.handler.submit(snapshot).await?;
        Ok(SubmitOutcome::Submitted)
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Current value of `name`, empty when unset.
    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map_or("", String::as_str)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{FieldRules, REQUIRED_MESSAGE};
    use crate::validators::ValidatorKind;

    #[derive(Default)]
    struct Recorder {
        submitted: Vec<FormValues>,
        fail: bool,
    }

    #[async_trait]
    impl SubmitHandler for Recorder {
        type Error = String;

        async fn submit(&mut self, values: FormValues) -> Result<(), String> {
            if self.fail {
                return Err("network down".to_string());
            }
            self.submitted.push(values);
            Ok(())
        }
    }

    fn contact_form(handler: Recorder) -> Form<Recorder> {
        let rules = RuleSet::new()
            .field("nome", FieldRules::required())
            .field(
                "email",
                FieldRules::required().validate_with(ValidatorKind::Email),
            );
        Form::new(values_from([("nome", ""), ("email", "")]), rules, handler)
    }

    #[tokio::test]
    async fn empty_required_field_blocks_submit() {
        let mut form = contact_form(Recorder::default());
        form.handle_change("email", "ana@example.com");

        let mut event = SubmitEvent::new();
        let outcome = form.handle_submit(&mut event).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Invalid);
        assert!(event.is_default_prevented());
        assert!(form.handler().submitted.is_empty());
        assert_eq!(form.errors().len(), 1);
        assert_eq!(form.error("nome"), Some(REQUIRED_MESSAGE));
    }

    #[tokio::test]
    async fn valid_form_submits_snapshot() {
        let mut form = contact_form(Recorder::default());
        form.handle_change("nome", "Ana");
        form.set_value_by_name("email", "ana@example.com");

        let outcome = form.handle_submit(&mut SubmitEvent::new()).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Submitted);
        assert_eq!(form.handler().submitted.len(), 1);
        assert_eq!(form.handler().submitted[0]["nome"], "Ana");
        assert!(form.errors().is_empty());
    }

    #[tokio::test]
    async fn handler_error_propagates() {
        let mut form = contact_form(Recorder {
            fail: true,
            ..Default::default()
        });
        form.merge_values([("nome", "Ana"), ("email", "ana@example.com")]);

        let result = form.handle_submit(&mut SubmitEvent::new()).await;
        assert_eq!(result, Err("network down".to_string()));
    }

    #[test]
    fn stale_errors_survive_edits_until_next_validation() {
        let mut form = contact_form(Recorder::default());
        assert!(!form.validate());
        assert!(form.error("nome").is_some());

        form.handle_change("nome", "Ana");
        assert!(form.error("nome").is_some());

        form.handle_change("email", "ana@example.com");
        assert!(form.validate());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn errors_are_replaced_not_accumulated() {
        let mut form = contact_form(Recorder::default());
        form.handle_change("nome", "Ana");
        form.handle_change("email", "bad");
        assert!(!form.validate());
        assert_eq!(form.errors().keys().collect::<Vec<_>>(), vec!["email"]);

        form.handle_change("nome", "");
        form.handle_change("email", "ana@example.com");
        assert!(!form.validate());
        assert_eq!(form.errors().keys().collect::<Vec<_>>(), vec!["nome"]);
    }

    #[test]
    fn set_values_replaces_and_merge_overlays() {
        let mut form = contact_form(Recorder::default());
        form.set_values(values_from([("nome", "Bruno")]));
        assert_eq!(form.value("nome"), "Bruno");
        assert_eq!(form.value("email"), "");
        assert!(!form.values().contains_key("email"));

        form.merge_values([("email", "b@c.com")]);
        assert_eq!(form.value("nome"), "Bruno");
        assert_eq!(form.value("email"), "b@c.com");
    }
}
