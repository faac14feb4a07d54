//! Sign in and sign out.

use std::sync::Arc;

use async_trait::async_trait;

use lead_client::LeadApi;
use lead_form::{
    FieldRules, Form, FormValues, RuleSet, SubmitEvent, SubmitHandler, SubmitOutcome,
    ValidatorKind, values_from,
};

use crate::context::AppContext;
use crate::error::{AdminError, Result};
use crate::events::Route;

pub const LOGIN_SUCCESS: &str = "Login realizado com sucesso!";
pub const LOGIN_FAILED: &str = "Credenciais inválidas. Tente novamente.";
pub const LOGOUT_DONE: &str = "Você saiu da sua conta.";

pub const EMAIL_FIELD: &str = "email";
pub const PASSWORD_FIELD: &str = "password";

pub struct LoginSubmit {
    api: Arc<dyn LeadApi>,
    context: AppContext,
}

#[async_trait]
impl SubmitHandler for LoginSubmit {
    type Error = AdminError;

    async fn submit(&mut self, values: FormValues) -> Result<()> {
        let email = values.get(EMAIL_FIELD).map_or("", String::as_str);
        let password = values.get(PASSWORD_FIELD).map_or("", String::as_str);

        let credential = {
            let _busy = self.context.busy.guard();
            self.api.login(email, password).await
        };
        let credential = match credential {
            Ok(credential) => credential,
            Err(err) => {
                tracing::warn!(error = %err, "login failed");
                self.context.events.error(LOGIN_FAILED);
                return Err(err.into());
            }
        };

        if let Err(err) = self.context.auth.sign_in(&credential) {
            tracing::warn!(error = %err, "failed to store credential");
            self.context.events.error(err.user_message());
            return Err(err.into());
        }

        tracing::info!("signed in");
        self.context.events.success(LOGIN_SUCCESS);
        self.context.events.navigate(Route::Dashboard);
        Ok(())
    }
}

/// Email and password form.
pub struct LoginPage {
    form: Form<LoginSubmit>,
}

impl LoginPage {
    pub fn new(api: Arc<dyn LeadApi>, context: AppContext) -> Self {
        let rules = RuleSet::new()
            .field(
                EMAIL_FIELD,
                FieldRules::required().validate_with(ValidatorKind::Email),
            )
            .field(PASSWORD_FIELD, FieldRules::required());
        let values = values_from([(EMAIL_FIELD, ""), (PASSWORD_FIELD, "")]);
        Self {
            form: Form::new(values, rules, LoginSubmit { api, context }),
        }
    }

    pub fn handle_change(&mut self, name: &str, value: &str) {
        self.form.handle_change(name, value);
    }

    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        self.form.handle_submit(&mut SubmitEvent::new()).await
    }

    pub fn form(&self) -> &Form<LoginSubmit> {
        &self.form
    }
}

/// Forget the credential and go to the login screen.
pub fn logout(context: &AppContext) -> Result<()> {
    context.auth.sign_out()?;
    tracing::info!("signed out");
    context.events.success(LOGOUT_DONE);
    context.events.navigate(Route::Login);
    Ok(())
}
