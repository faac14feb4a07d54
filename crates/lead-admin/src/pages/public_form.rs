//! Public lead capture form.

use std::sync::Arc;

use async_trait::async_trait;

use lead_client::{ApiError, EventSink, LeadApi};
use lead_form::{Form, FormValues, SubmitEvent, SubmitHandler, SubmitOutcome};
use lead_model::fields::{EMAIL, TELEFONE};

use crate::analytics::LeadGeneration;
use crate::context::AppContext;
use crate::pages::lead_form::{capture_values, fields_from_values, lead_rules};

pub const SUBMIT_SUCCESS: &str = "Lead cadastrado com sucesso!";
pub const SUBMIT_FAILED: &str = "Erro ao cadastrar lead. Tente novamente.";

/// Posts the lead anonymously and records the conversion.
pub struct CaptureSubmit {
    api: Arc<dyn LeadApi>,
    context: AppContext,
    analytics: Arc<dyn EventSink>,
    is_submitting: bool,
    is_success: bool,
}

#[async_trait]
impl SubmitHandler for CaptureSubmit {
    type Error = ApiError;

    async fn submit(&mut self, values: FormValues) -> Result<(), ApiError> {
        self.is_submitting = true;
        let created = {
            let _busy = self.context.busy.guard();
            self.api.create_lead(&fields_from_values(&values), None).await
        };
        self.is_submitting = false;

        match created {
            Ok(lead) => {
                tracing::info!(id = %lead.id, "lead captured");
                self.context.events.success(SUBMIT_SUCCESS);
                self.is_success = true;
                let email = values.get(EMAIL).map_or("", String::as_str);
                let phone = values.get(TELEFONE).map_or("", String::as_str);
                self.analytics.push(LeadGeneration::new(email, phone).to_record());
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "lead capture failed");
                self.context.events.error(SUBMIT_FAILED);
                Err(err)
            }
        }
    }
}

/// The public "sign up for news" form.
pub struct PublicFormPage {
    form: Form<CaptureSubmit>,
}

impl PublicFormPage {
    pub fn new(api: Arc<dyn LeadApi>, context: AppContext, analytics: Arc<dyn EventSink>) -> Self {
        let handler = CaptureSubmit {
            api,
            context,
            analytics,
            is_submitting: false,
            is_success: false,
        };
        Self {
            form: Form::new(capture_values(), lead_rules(), handler),
        }
    }

    /// Merge deep-link query parameters. Only keys that are form fields are
    /// taken; returns how many were.
    pub fn prefill<'a, I>(&mut self, params: I) -> usize
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let known: Vec<(String, String)> = params
            .into_iter()
            .filter(|(key, _)| self.form.values().contains_key(*key))
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        let count = known.len();
        if count > 0 {
            tracing::debug!(count, "prefilled from query parameters");
            self.form.merge_values(known);
        }
        count
    }

    pub fn handle_change(&mut self, name: &str, value: &str) {
        self.form.handle_change(name, value);
    }

    /// Validate and, when valid, post the lead.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, ApiError> {
        self.form.handle_submit(&mut SubmitEvent::new()).await
    }

    pub fn form(&self) -> &Form<CaptureSubmit> {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Form<CaptureSubmit> {
        &mut self.form
    }

    pub fn is_submitting(&self) -> bool {
        self.form.handler().is_submitting
    }

    /// The lead was accepted; the front end shows the thank-you screen.
    pub fn is_success(&self) -> bool {
        self.form.handler().is_success
    }
}
