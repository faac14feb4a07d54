use std::path::Path;

use anyhow::{Context, bail};

use lead_admin::analytics::pageview;
use lead_admin::pages::{
    DashboardPage, EditLeadPage, LeadDetailPage, LoginPage, NewLeadPage, PublicFormPage, login,
    logout,
};
use lead_admin::{AdminError, DirectoryExportSink, FetchOutcome, Route};
use lead_cli::app::App;
use lead_cli::logging::redact_value;
use lead_cli::render::{detail_tables, field_errors_table, lead_table};
use lead_form::{FieldErrors, SubmitOutcome};
use lead_model::LeadId;
use lead_model::fields::EMAIL;

use crate::cli::{
    ConfigAction, ContactArgs, EditArgs, ExportArgs, ListArgs, LoginArgs, SubmitArgs,
};

const NOT_SIGNED_IN: &str = "not signed in; run `lead-desk login` first";

pub async fn run_login(app: &App, args: &LoginArgs) -> anyhow::Result<()> {
    let mut page = LoginPage::new(app.api(), app.context().clone());
    page.handle_change(login::EMAIL_FIELD, &args.email);
    page.handle_change(login::PASSWORD_FIELD, &args.password);
    tracing::debug!(email = redact_value(&args.email), "signing in");
    match page.submit().await? {
        SubmitOutcome::Submitted => Ok(()),
        SubmitOutcome::Invalid => invalid(page.form().errors()),
    }
}

pub fn run_logout(app: &App) -> anyhow::Result<()> {
    logout(app.context())?;
    Ok(())
}

pub async fn run_list(app: &App, args: &ListArgs) -> anyhow::Result<()> {
    if !app.is_signed_in() {
        bail!(NOT_SIGNED_IN);
    }
    let list = app.lead_list();
    if let Some(limit) = args.limit {
        applied(list.set_page_size(limit).await?)?;
    }
    let outcome = match &args.search {
        Some(term) => list.search_now(term.as_str()).await,
        None => list.fetch().await,
    };
    applied(outcome)?;
    if args.page > 1 {
        applied(list.set_page(args.page - 1).await)?;
    }

    println!("{}", lead_table(&list.result()));
    println!("{}", list.page_label());
    Ok(())
}

pub async fn run_show(app: &App, id: LeadId) -> anyhow::Result<()> {
    if !app.is_signed_in() {
        bail!(NOT_SIGNED_IN);
    }
    let mut page = LeadDetailPage::new(app.api(), app.context().clone(), id);
    page.load().await?;
    if let Some(title) = page.title() {
        println!("{title}");
    }
    for table in detail_tables(&page.sections()) {
        println!("{table}");
    }
    Ok(())
}

pub async fn run_create(app: &App, args: &ContactArgs) -> anyhow::Result<()> {
    if !app.is_signed_in() {
        bail!(NOT_SIGNED_IN);
    }
    let mut page = NewLeadPage::new(app.api(), app.context().clone());
    for (name, value) in args.changes() {
        page.handle_change(name, value);
    }
    match page.submit().await? {
        SubmitOutcome::Submitted => Ok(()),
        SubmitOutcome::Invalid => invalid(page.form().errors()),
    }
}

pub async fn run_edit(app: &App, args: &EditArgs) -> anyhow::Result<()> {
    let changes = args.fields.changes();
    if changes.is_empty() {
        bail!("nothing to change; pass at least one field flag");
    }
    if !app.is_signed_in() {
        bail!(NOT_SIGNED_IN);
    }
    let mut page = EditLeadPage::new(app.api(), app.context().clone(), args.id);
    page.load().await?;
    tracing::info!(id = %args.id, "{}", page.title());
    for (name, value) in changes {
        page.handle_change(name, value);
    }
    match page.submit().await? {
        SubmitOutcome::Submitted => Ok(()),
        SubmitOutcome::Invalid => invalid(page.form().errors()),
    }
}

pub async fn run_delete(app: &App, id: LeadId) -> anyhow::Result<()> {
    let mut dashboard = DashboardPage::new(
        app.api(),
        app.context().clone(),
        app.settings().list_config(),
    );
    match dashboard.open().await {
        None => bail!(NOT_SIGNED_IN),
        Some(outcome) => applied(outcome)?,
    }
    applied(dashboard.list().remove(id).await?)?;
    Ok(())
}

pub async fn run_export(app: &App, args: &ExportArgs) -> anyhow::Result<()> {
    if !app.is_signed_in() {
        bail!(NOT_SIGNED_IN);
    }
    let path = app
        .lead_list()
        .export_all(&DirectoryExportSink::new(&args.output))
        .await?;
    println!("{}", path.display());
    Ok(())
}

pub async fn run_submit(app: &App, args: &SubmitArgs) -> anyhow::Result<()> {
    let analytics = app
        .analytics_sink()
        .context("failed to open the analytics log")?;
    analytics.push(pageview(&Route::PublicForm.to_string()));

    let mut page = PublicFormPage::new(app.api(), app.context().clone(), analytics);
    let taken = page.prefill(
        args.params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str())),
    );
    if taken < args.params.len() {
        tracing::warn!(
            ignored = args.params.len() - taken,
            "query parameters that are not form fields were ignored"
        );
    }
    for (name, value) in args.fields.changes() {
        page.handle_change(name, value);
    }

    tracing::debug!(email = redact_value(page.form().value(EMAIL)), "submitting lead");
    match page.submit().await? {
        SubmitOutcome::Submitted => Ok(()),
        SubmitOutcome::Invalid => invalid(page.form().errors()),
    }
}

pub fn run_config(app: &App, action: &ConfigAction, path: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("# {}", path.display());
            print!("{}", app.settings().to_toml()?);
        }
        ConfigAction::Save => {
            app.settings().save_to(path)?;
            tracing::info!(path = %path.display(), "settings saved");
            println!("{}", path.display());
        }
    }
    Ok(())
}

/// Print the field errors and fail.
fn invalid(errors: &FieldErrors) -> anyhow::Result<()> {
    eprintln!("{}", field_errors_table(errors));
    Err(AdminError::Invalid {
        fields: errors.keys().cloned().collect(),
    }
    .into())
}

/// A fetch that failed becomes an error; the failure was already shown.
fn applied(outcome: FetchOutcome) -> Result<(), AdminError> {
    match outcome {
        FetchOutcome::Applied | FetchOutcome::Superseded => Ok(()),
        FetchOutcome::Failed(err) => Err(err.into()),
    }
}
