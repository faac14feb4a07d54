//! Page controllers against an in-memory lead API.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use lead_admin::events::drain;
use lead_admin::pages::lead_form::PHONE_INVALID;
use lead_admin::pages::{
    DashboardPage, EditLeadPage, LeadDetailPage, LoginPage, NewLeadPage, PublicFormPage, detail,
    editor, login, public_form,
};
use lead_admin::{
    AppContext, FetchOutcome, GuardState, Level, ListConfig, Notification, Route,
    SESSION_EXPIRED, ViewEvent, ViewEvents,
};
use lead_client::{ApiError, AuthContext, LeadApi, ListParams, MemorySink};
use lead_form::SubmitOutcome;
use lead_model::{Credential, Lead, LeadFields, LeadId, LeadPage, LeadSummary};

const TOKEN: &str = "token-123";
const PASSWORD: &str = "segredo";

// =============================================================================
// FAKE API
// =============================================================================

#[derive(Default)]
struct FakeApi {
    leads: Mutex<BTreeMap<u64, Lead>>,
    /// Created payloads and whether a credential was sent.
    created: Mutex<Vec<(LeadFields, bool)>>,
    failure: Mutex<Option<ApiError>>,
}

impl FakeApi {
    fn with_lead(lead: Lead) -> Self {
        let api = Self::default();
        api.leads.lock().unwrap().insert(lead.id.0, lead);
        api
    }

    fn fail_with(&self, err: ApiError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    fn check(&self) -> Result<(), ApiError> {
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn authorize(credential: &Credential) -> Result<(), ApiError> {
        if credential.as_str() == TOKEN {
            Ok(())
        } else {
            Err(ApiError::Unauthorized)
        }
    }

    fn store(&self, id: u64, fields: &LeadFields) -> Lead {
        let lead = Lead {
            id: LeadId(id),
            nome: fields.nome.clone(),
            email: fields.email.clone(),
            telefone: fields.telefone.clone(),
            cargo: fields.cargo.clone(),
            data_nascimento: fields.data_nascimento.clone(),
            mensagem: fields.mensagem.clone(),
            tracking: fields.tracking.clone(),
            created_at: "2024-03-05T14:07:09Z".to_string(),
        };
        self.leads.lock().unwrap().insert(id, lead.clone());
        lead
    }
}

#[async_trait]
impl LeadApi for FakeApi {
    async fn login(&self, _email: &str, password: &str) -> Result<Credential, ApiError> {
        self.check()?;
        if password == PASSWORD {
            Ok(Credential::new(TOKEN).unwrap())
        } else {
            Err(ApiError::Unauthorized)
        }
    }

    async fn list_leads(
        &self,
        params: &ListParams,
        credential: &Credential,
    ) -> Result<LeadPage<LeadSummary>, ApiError> {
        Self::authorize(credential)?;
        self.check()?;
        let leads: Vec<LeadSummary> = self
            .leads
            .lock()
            .unwrap()
            .values()
            .map(|lead| LeadSummary {
                id: lead.id,
                nome: lead.nome.clone(),
                email: lead.email.clone(),
                telefone: lead.telefone.clone(),
                created_at: lead.created_at.clone(),
            })
            .take(params.limit)
            .collect();
        Ok(LeadPage {
            leads,
            total_pages: 1,
        })
    }

    async fn get_lead(&self, id: LeadId, credential: &Credential) -> Result<Lead, ApiError> {
        Self::authorize(credential)?;
        self.check()?;
        self.leads
            .lock()
            .unwrap()
            .get(&id.0)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn create_lead(
        &self,
        fields: &LeadFields,
        credential: Option<&Credential>,
    ) -> Result<Lead, ApiError> {
        if let Some(credential) = credential {
            Self::authorize(credential)?;
        }
        self.check()?;
        self.created
            .lock()
            .unwrap()
            .push((fields.clone(), credential.is_some()));
        let id = self.leads.lock().unwrap().len() as u64 + 1;
        Ok(self.store(id, fields))
    }

    async fn update_lead(
        &self,
        id: LeadId,
        fields: &LeadFields,
        credential: &Credential,
    ) -> Result<Lead, ApiError> {
        Self::authorize(credential)?;
        self.check()?;
        if !self.leads.lock().unwrap().contains_key(&id.0) {
            return Err(ApiError::NotFound);
        }
        Ok(self.store(id.0, fields))
    }

    async fn delete_lead(&self, id: LeadId, credential: &Credential) -> Result<(), ApiError> {
        Self::authorize(credential)?;
        self.check()?;
        self.leads.lock().unwrap().remove(&id.0);
        Ok(())
    }

    async fn export_leads(&self, credential: &Credential) -> Result<Vec<u8>, ApiError> {
        Self::authorize(credential)?;
        self.check()?;
        Ok(b"id\n".to_vec())
    }
}

fn ana() -> Lead {
    serde_json::from_value(serde_json::json!({
        "id": 7,
        "nome": "Ana Souza",
        "email": "ana@example.com",
        "telefone": "(11) 98765-4321",
        "cargo": "Gerente",
        "dataNascimento": "1990-05-17T00:00:00.000Z",
        "mensagem": "Quero saber mais",
        "utm_source": "google",
        "createdAt": "2024-03-05T14:07:09Z"
    }))
    .unwrap()
}

fn context(signed_in: bool) -> (AppContext, mpsc::UnboundedReceiver<ViewEvent>) {
    let (events, rx) = ViewEvents::channel();
    let context = AppContext::new(AuthContext::in_memory(), events);
    if signed_in {
        context
            .auth
            .sign_in(&Credential::new(TOKEN).unwrap())
            .unwrap();
    }
    (context, rx)
}

fn notification(level: Level, message: &str) -> ViewEvent {
    ViewEvent::Notify(Notification {
        level,
        message: message.to_string(),
    })
}

fn fill_contact(mut change: impl FnMut(&str, &str)) {
    change("nome", "Ana Souza");
    change("email", "ana@example.com");
    change("telefone", "(11) 98765-4321");
    change("cargo", "Gerente");
    change("dataNascimento", "1990-05-17");
    change("mensagem", "Quero saber mais");
}

// =============================================================================
// PUBLIC FORM
// =============================================================================

#[tokio::test]
async fn prefill_takes_only_form_fields() {
    let (context, _rx) = context(false);
    let mut page = PublicFormPage::new(
        Arc::new(FakeApi::default()),
        context,
        Arc::new(MemorySink::new()),
    );

    let taken = page.prefill([
        ("utm_source", "newsletter"),
        ("gclid", "abc123"),
        ("ref", "friend"),
        ("nome", "Ana"),
    ]);

    assert_eq!(taken, 3);
    assert_eq!(page.form().value("utm_source"), "newsletter");
    assert_eq!(page.form().value("gclid"), "abc123");
    assert_eq!(page.form().value("nome"), "Ana");
    assert!(!page.form().values().contains_key("ref"));
}

#[tokio::test]
async fn public_submit_records_one_conversion() {
    let api = Arc::new(FakeApi::default());
    let analytics = Arc::new(MemorySink::new());
    let (context, mut rx) = context(false);
    let mut page = PublicFormPage::new(api.clone(), context, analytics.clone());
    page.prefill([("utm_campaign", "lancamento")]);
    fill_contact(|name, value| page.handle_change(name, value));

    assert_eq!(page.submit().await.unwrap(), SubmitOutcome::Submitted);

    assert!(page.is_success());
    assert!(!page.is_submitting());
    let created = api.created.lock().unwrap().clone();
    assert_eq!(created.len(), 1);
    let (fields, authenticated) = &created[0];
    assert!(!authenticated);
    assert_eq!(fields.tracking.utm_campaign.as_deref(), Some("lancamento"));
    assert_eq!(fields.tracking.utm_source, None);

    let conversions = analytics.events_named("generate_lead");
    assert_eq!(conversions.len(), 1);
    assert_eq!(conversions[0]["user_data"]["phone_number"], "11987654321");
    assert_eq!(conversions[0]["user_data"]["email"], "ana@example.com");
    assert_eq!(
        drain(&mut rx),
        vec![notification(Level::Success, public_form::SUBMIT_SUCCESS)]
    );
}

#[tokio::test]
async fn failed_public_submit_records_nothing() {
    let api = Arc::new(FakeApi::default());
    api.fail_with(ApiError::Server {
        status: 500,
        message: "database offline".to_string(),
    });
    let analytics = Arc::new(MemorySink::new());
    let (context, mut rx) = context(false);
    let mut page = PublicFormPage::new(api, context, analytics.clone());
    fill_contact(|name, value| page.handle_change(name, value));

    assert!(page.submit().await.is_err());

    assert!(!page.is_success());
    assert!(analytics.records().is_empty());
    assert_eq!(
        drain(&mut rx),
        vec![notification(Level::Error, public_form::SUBMIT_FAILED)]
    );
}

#[tokio::test]
async fn invalid_public_form_is_not_sent() {
    let api = Arc::new(FakeApi::default());
    let (context, mut rx) = context(false);
    let mut page = PublicFormPage::new(api.clone(), context, Arc::new(MemorySink::new()));
    fill_contact(|name, value| page.handle_change(name, value));
    page.handle_change("email", "ana@");

    assert_eq!(page.submit().await.unwrap(), SubmitOutcome::Invalid);

    assert_eq!(page.form().error("email"), Some(lead_form::INVALID_MESSAGE));
    assert!(api.created.lock().unwrap().is_empty());
    assert!(drain(&mut rx).is_empty());
}

// =============================================================================
// LOGIN
// =============================================================================

#[tokio::test]
async fn login_stores_credential_and_opens_dashboard() {
    let (context, mut rx) = context(false);
    let mut page = LoginPage::new(Arc::new(FakeApi::default()), context.clone());
    page.handle_change(login::EMAIL_FIELD, "admin@example.com");
    page.handle_change(login::PASSWORD_FIELD, PASSWORD);

    assert_eq!(page.submit().await.unwrap(), SubmitOutcome::Submitted);

    assert_eq!(
        context.auth.credential().map(|c| c.as_str().to_string()),
        Some(TOKEN.to_string())
    );
    assert_eq!(
        drain(&mut rx),
        vec![
            notification(Level::Success, login::LOGIN_SUCCESS),
            ViewEvent::Navigate(Route::Dashboard),
        ]
    );
}

#[tokio::test]
async fn wrong_password_stays_signed_out() {
    let (context, mut rx) = context(false);
    let mut page = LoginPage::new(Arc::new(FakeApi::default()), context.clone());
    page.handle_change(login::EMAIL_FIELD, "admin@example.com");
    page.handle_change(login::PASSWORD_FIELD, "errada");

    assert!(page.submit().await.is_err());

    assert!(!context.auth.is_authenticated());
    assert_eq!(
        drain(&mut rx),
        vec![notification(Level::Error, login::LOGIN_FAILED)]
    );
}

#[tokio::test]
async fn login_requires_both_fields() {
    let (context, _rx) = context(false);
    let mut page = LoginPage::new(Arc::new(FakeApi::default()), context);
    page.handle_change(login::EMAIL_FIELD, "admin@example.com");

    assert_eq!(page.submit().await.unwrap(), SubmitOutcome::Invalid);
    assert_eq!(
        page.form().error(login::PASSWORD_FIELD),
        Some(lead_form::REQUIRED_MESSAGE)
    );
}

#[test]
fn logout_forgets_credential() {
    let (context, mut rx) = context(true);

    login::logout(&context).unwrap();

    assert!(!context.auth.is_authenticated());
    assert_eq!(
        drain(&mut rx),
        vec![
            notification(Level::Success, login::LOGOUT_DONE),
            ViewEvent::Navigate(Route::Login),
        ]
    );
}

// =============================================================================
// NEW AND EDIT
// =============================================================================

#[tokio::test]
async fn new_lead_is_created_with_credential() {
    let api = Arc::new(FakeApi::default());
    let (context, mut rx) = context(true);
    let mut page = NewLeadPage::new(api.clone(), context);
    fill_contact(|name, value| page.handle_change(name, value));

    assert_eq!(page.submit().await.unwrap(), SubmitOutcome::Submitted);

    let created = api.created.lock().unwrap().clone();
    assert_eq!(created.len(), 1);
    assert!(created[0].1);
    assert_eq!(
        drain(&mut rx),
        vec![
            notification(Level::Success, editor::CREATE_SUCCESS),
            ViewEvent::Navigate(Route::Dashboard),
        ]
    );
}

#[tokio::test]
async fn new_lead_uses_specific_messages() {
    let (context, _rx) = context(true);
    let mut page = NewLeadPage::new(Arc::new(FakeApi::default()), context);
    fill_contact(|name, value| page.handle_change(name, value));
    page.handle_change("telefone", "1234");

    assert_eq!(page.submit().await.unwrap(), SubmitOutcome::Invalid);
    assert_eq!(page.form().error("telefone"), Some(PHONE_INVALID));
}

#[tokio::test]
async fn edit_page_loads_normalized_values() {
    let (context, _rx) = context(true);
    let mut page = EditLeadPage::new(Arc::new(FakeApi::with_lead(ana())), context, LeadId(7));

    page.load().await.unwrap();

    assert!(page.is_loaded());
    assert_eq!(page.title(), "Editar Lead: Ana Souza");
    assert_eq!(page.form().value("dataNascimento"), "1990-05-17");
    assert_eq!(page.form().value("utm_source"), "google");
}

#[tokio::test]
async fn edit_submit_updates_lead() {
    let api = Arc::new(FakeApi::with_lead(ana()));
    let (context, mut rx) = context(true);
    let mut page = EditLeadPage::new(api.clone(), context, LeadId(7));
    page.load().await.unwrap();
    page.handle_change("cargo", "Diretora");

    assert_eq!(page.submit().await.unwrap(), SubmitOutcome::Submitted);

    let stored = api.leads.lock().unwrap()[&7].clone();
    assert_eq!(stored.cargo, "Diretora");
    assert_eq!(stored.data_nascimento, "1990-05-17");
    assert_eq!(stored.tracking.utm_source.as_deref(), Some("google"));
    assert_eq!(
        drain(&mut rx),
        vec![
            notification(Level::Success, editor::UPDATE_SUCCESS),
            ViewEvent::Navigate(Route::Dashboard),
        ]
    );
}

#[tokio::test]
async fn missing_lead_returns_to_dashboard() {
    let (context, mut rx) = context(true);
    let mut page = EditLeadPage::new(Arc::new(FakeApi::default()), context, LeadId(99));

    assert!(page.load().await.is_err());

    assert!(!page.is_loaded());
    assert_eq!(
        drain(&mut rx),
        vec![
            notification(Level::Error, editor::LOAD_FAILED),
            ViewEvent::Navigate(Route::Dashboard),
        ]
    );
}

#[tokio::test]
async fn update_with_expired_session_signs_out() {
    let api = Arc::new(FakeApi::with_lead(ana()));
    let (context, mut rx) = context(true);
    let mut page = EditLeadPage::new(api.clone(), context.clone(), LeadId(7));
    page.load().await.unwrap();
    api.fail_with(ApiError::Unauthorized);

    let err = page.submit().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!context.auth.is_authenticated());
    assert_eq!(
        drain(&mut rx),
        vec![
            notification(Level::Error, SESSION_EXPIRED),
            ViewEvent::Navigate(Route::Login),
        ]
    );
}

// =============================================================================
// DETAIL AND DASHBOARD
// =============================================================================

#[tokio::test]
async fn detail_page_lists_sections() {
    let (context, _rx) = context(true);
    let mut page = LeadDetailPage::new(Arc::new(FakeApi::with_lead(ana())), context, LeadId(7));

    page.load().await.unwrap();

    assert_eq!(page.title().as_deref(), Some("Detalhes do Lead: Ana Souza"));
    let sections = page.sections();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[1].items.len(), 1);
    assert_eq!(sections[1].items[0].value, "google");
}

#[tokio::test]
async fn detail_failure_returns_to_dashboard() {
    let api = Arc::new(FakeApi::with_lead(ana()));
    api.fail_with(ApiError::Unreachable("refused".to_string()));
    let (context, mut rx) = context(true);
    let mut page = LeadDetailPage::new(api, context.clone(), LeadId(7));

    assert!(page.load().await.is_err());

    assert!(page.lead().is_none());
    assert!(page.sections().is_empty());
    assert!(context.auth.is_authenticated());
    assert_eq!(
        drain(&mut rx),
        vec![
            notification(Level::Error, detail::LOAD_FAILED),
            ViewEvent::Navigate(Route::Dashboard),
        ]
    );
}

#[tokio::test]
async fn dashboard_without_credential_redirects() {
    let (context, mut rx) = context(false);
    let mut page = DashboardPage::new(
        Arc::new(FakeApi::with_lead(ana())),
        context,
        ListConfig::default(),
    );

    assert_eq!(page.open().await, None);
    assert_eq!(drain(&mut rx), vec![ViewEvent::Navigate(Route::Login)]);
}

#[tokio::test]
async fn dashboard_loads_first_page() {
    let (context, mut rx) = context(true);
    let mut page = DashboardPage::new(
        Arc::new(FakeApi::with_lead(ana())),
        context,
        ListConfig::default(),
    );

    assert_eq!(page.open().await, Some(FetchOutcome::Applied));

    let result = page.list().result();
    assert_eq!(result.rows.len(), 1);
    assert_eq!(
        lead_admin::pages::row_cells(&result.rows[0]),
        [
            "Ana Souza".to_string(),
            "ana@example.com".to_string(),
            "(11) 98765-4321".to_string(),
            "05/03/2024".to_string(),
        ]
    );
    assert_eq!(drain(&mut rx), vec![ViewEvent::GuardRendered]);

    page.logout().unwrap();
    assert!(!page.list().context().auth.is_authenticated());
}

#[test]
fn guard_state_is_exposed() {
    let (context, _rx) = context(false);
    let mut guard = lead_admin::RouteGuard::new(context);
    assert_eq!(guard.authorize(), GuardState::Redirect);
}
