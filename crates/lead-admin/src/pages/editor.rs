//! Admin pages that create and edit leads.

use std::sync::Arc;

use async_trait::async_trait;

use lead_client::{ApiError, LeadApi};
use lead_form::{Form, FormValues, SubmitEvent, SubmitHandler, SubmitOutcome};
use lead_model::fields::NOME;
use lead_model::{Lead, LeadId};

use crate::context::AppContext;
use crate::error::Result;
use crate::events::Route;
use crate::pages::lead_form::{
    contact_values, fields_from_values, lead_rules, lead_rules_with_messages, values_from_lead,
};

pub const CREATE_SUCCESS: &str = "Lead criado com sucesso!";
pub const CREATE_FAILED: &str = "Erro ao criar lead. Verifique os dados e tente novamente.";
pub const UPDATE_SUCCESS: &str = "Lead atualizado com sucesso!";
pub const UPDATE_FAILED: &str = "Erro ao atualizar lead.";
pub const LOAD_FAILED: &str = "Lead não encontrado.";

// =============================================================================
// NEW LEAD
// =============================================================================

pub struct CreateSubmit {
    api: Arc<dyn LeadApi>,
    context: AppContext,
    is_submitting: bool,
}

#[async_trait]
impl SubmitHandler for CreateSubmit {
    type Error = ApiError;

    async fn submit(&mut self, values: FormValues) -> std::result::Result<(), ApiError> {
        self.is_submitting = true;
        let created: std::result::Result<Lead, ApiError> = async {
            let credential = self.context.auth.require()?;
            let _busy = self.context.busy.guard();
            self.api
                .create_lead(&fields_from_values(&values), Some(&credential))
                .await
        }
        .await;
        self.is_submitting = false;

        match created {
            Ok(lead) => {
                tracing::info!(id = %lead.id, "lead created");
                self.context.events.success(CREATE_SUCCESS);
                self.context.events.navigate(Route::Dashboard);
                Ok(())
            }
            Err(err) => {
                self.context.report_failure(&err, CREATE_FAILED);
                Err(err)
            }
        }
    }
}

/// "Inserir Novo Lead"
pub struct NewLeadPage {
    form: Form<CreateSubmit>,
}

impl NewLeadPage {
    pub fn new(api: Arc<dyn LeadApi>, context: AppContext) -> Self {
        let handler = CreateSubmit {
            api,
            context,
            is_submitting: false,
        };
        Self {
            form: Form::new(contact_values(), lead_rules_with_messages(), handler),
        }
    }

    pub fn handle_change(&mut self, name: &str, value: &str) {
        self.form.handle_change(name, value);
    }

    pub async fn submit(&mut self) -> std::result::Result<SubmitOutcome, ApiError> {
        self.form.handle_submit(&mut SubmitEvent::new()).await
    }

    pub fn form(&self) -> &Form<CreateSubmit> {
        &self.form
    }

    pub fn is_submitting(&self) -> bool {
        self.form.handler().is_submitting
    }
}

// =============================================================================
// EDIT LEAD
// =============================================================================

pub struct UpdateSubmit {
    api: Arc<dyn LeadApi>,
    context: AppContext,
    id: LeadId,
    is_submitting: bool,
}

#[async_trait]
impl SubmitHandler for UpdateSubmit {
    type Error = ApiError;

    async fn submit(&mut self, values: FormValues) -> std::result::Result<(), ApiError> {
        self.is_submitting = true;
        let updated: std::result::Result<Lead, ApiError> = async {
            let credential = self.context.auth.require()?;
            let _busy = self.context.busy.guard();
            self.api
                .update_lead(self.id, &fields_from_values(&values), &credential)
                .await
        }
        .await;
        self.is_submitting = false;

        match updated {
            Ok(_) => {
                tracing::info!(id = %self.id, "lead updated");
                self.context.events.success(UPDATE_SUCCESS);
                self.context.events.navigate(Route::Dashboard);
                Ok(())
            }
            Err(err) => {
                self.context.report_failure(&err, UPDATE_FAILED);
                Err(err)
            }
        }
    }
}

/// "Editar Lead"
pub struct EditLeadPage {
    form: Form<UpdateSubmit>,
    loaded: bool,
}

impl EditLeadPage {
    pub fn new(api: Arc<dyn LeadApi>, context: AppContext, id: LeadId) -> Self {
        let handler = UpdateSubmit {
            api,
            context,
            id,
            is_submitting: false,
        };
        Self {
            form: Form::new(contact_values(), lead_rules(), handler),
            loaded: false,
        }
    }

    pub fn id(&self) -> LeadId {
        self.form.handler().id
    }

    /// Load the lead into the form.
    ///
    /// On failure the user is notified and sent back to the dashboard.
    pub async fn load(&mut self) -> Result<()> {
        let handler = self.form.handler();
        let loaded: std::result::Result<Lead, ApiError> = async {
            let credential = handler.context.auth.require()?;
            let _busy = handler.context.busy.guard();
            handler.api.get_lead(handler.id, &credential).await
        }
        .await;

        match loaded {
            Ok(lead) => {
                self.form.set_values(values_from_lead(&lead));
                self.loaded = true;
                Ok(())
            }
            Err(err) => {
                let context = &self.form.handler().context;
                if err.is_unauthorized() {
                    context.expire_session();
                } else {
                    tracing::warn!(error = %err, id = %self.id(), "failed to load lead");
                    context.events.error(LOAD_FAILED);
                    context.events.navigate(Route::Dashboard);
                }
                Err(err.into())
            }
        }
    }

    pub fn handle_change(&mut self, name: &str, value: &str) {
        self.form.handle_change(name, value);
    }

    pub async fn submit(&mut self) -> std::result::Result<SubmitOutcome, ApiError> {
        self.form.handle_submit(&mut SubmitEvent::new()).await
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// `Editar Lead: <nome>`
    pub fn title(&self) -> String {
        format!("Editar Lead: {}", self.form.value(NOME))
    }

    pub fn form(&self) -> &Form<UpdateSubmit> {
        &self.form
    }

    pub fn is_submitting(&self) -> bool {
        self.form.handler().is_submitting
    }
}
