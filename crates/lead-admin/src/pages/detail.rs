//! Read-only lead detail page.

use std::sync::Arc;

use lead_client::{ApiError, LeadApi};
use lead_model::{Lead, LeadId};

use crate::context::AppContext;
use crate::error::Result;
use crate::events::Route;
use crate::format::{display_date, display_datetime};

pub const LOAD_FAILED: &str = "Não foi possível carregar os detalhes do lead.";

/// One labeled value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailItem {
    pub label: &'static str,
    pub value: String,
}

/// A titled group of items. Empty values are left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailSection {
    pub title: &'static str,
    pub items: Vec<DetailItem>,
}

impl DetailSection {
    fn new(title: &'static str, items: impl IntoIterator<Item = (&'static str, String)>) -> Self {
        Self {
            title,
            items: items
                .into_iter()
                .filter(|(_, value)| !value.trim().is_empty())
                .map(|(label, value)| DetailItem { label, value })
                .collect(),
        }
    }
}

/// Contact and tracking sections for `lead`.
pub fn sections(lead: &Lead) -> Vec<DetailSection> {
    let tracking = &lead.tracking;
    let optional = |value: &Option<String>| value.clone().unwrap_or_default();
    vec![
        DetailSection::new(
            "Informações de Contato",
            [
                ("Nome Completo", lead.nome.clone()),
                ("Email", lead.email.clone()),
                ("Telefone", lead.telefone.clone()),
                ("Cargo", lead.cargo.clone()),
                ("Data de Nascimento", display_date(&lead.data_nascimento)),
                ("Data de Cadastro", display_datetime(&lead.created_at)),
                ("Mensagem", lead.mensagem.clone()),
            ],
        ),
        DetailSection::new(
            "Dados de Tracking (UTMs)",
            [
                ("UTM Source", optional(&tracking.utm_source)),
                ("UTM Medium", optional(&tracking.utm_medium)),
                ("UTM Campaign", optional(&tracking.utm_campaign)),
                ("UTM Term", optional(&tracking.utm_term)),
                ("UTM Content", optional(&tracking.utm_content)),
                ("Google Click ID (gclid)", optional(&tracking.gclid)),
                ("Facebook Click ID (fbclid)", optional(&tracking.fbclid)),
            ],
        ),
    ]
}

pub struct LeadDetailPage {
    api: Arc<dyn LeadApi>,
    context: AppContext,
    id: LeadId,
    lead: Option<Lead>,
}

impl LeadDetailPage {
    pub fn new(api: Arc<dyn LeadApi>, context: AppContext, id: LeadId) -> Self {
        Self {
            api,
            context,
            id,
            lead: None,
        }
    }

    /// Fetch the lead. On failure the user is notified and sent back to the
    /// dashboard.
    pub async fn load(&mut self) -> Result<&Lead> {
        let loaded: std::result::Result<Lead, ApiError> = async {
            let credential = self.context.auth.require()?;
            let _busy = self.context.busy.guard();
            self.api.get_lead(self.id, &credential).await
        }
        .await;

        match loaded {
            Ok(lead) => Ok(&*self.lead.insert(lead)),
            Err(err) => {
                if err.is_unauthorized() {
                    self.context.expire_session();
                } else {
                    tracing::warn!(error = %err, id = %self.id, "failed to load lead details");
                    self.context.events.error(LOAD_FAILED);
                    self.context.events.navigate(Route::Dashboard);
                }
                Err(err.into())
            }
        }
    }

    pub fn lead(&self) -> Option<&Lead> {
        self.lead.as_ref()
    }

    /// `Detalhes do Lead: <nome>`
    pub fn title(&self) -> Option<String> {
        self.lead
            .as_ref()
            .map(|lead| format!("Detalhes do Lead: {}", lead.nome))
    }

    /// Sections of the loaded lead; empty before a successful load.
    pub fn sections(&self) -> Vec<DetailSection> {
        self.lead.as_ref().map(sections).unwrap_or_default()
    }
}
