//! Lead Desk CLI.

use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::Arc;

use clap::{ColorChoice, Parser};

use lead_admin::AdminError;
use lead_cli::app::App;
use lead_cli::logging::{LogConfig, LogFormat, init_logging};
use lead_cli::progress::Spinner;
use lead_cli::render::print_events;
use lead_cli::settings::{Overrides, Settings, SettingsError};
use lead_client::{ApiError, FileCredentialStore};

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("error: failed to start runtime: {error}");
            std::process::exit(1);
        }
    };
    let exit_code = runtime.block_on(run(cli));
    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> i32 {
    let mut app = match connect(&cli) {
        Ok(app) => app,
        Err(error) => {
            if let Some(settings_error) = error.downcast_ref::<SettingsError>() {
                eprintln!("{}", settings_error.user_message());
            }
            eprintln!("error: {error:#}");
            return 1;
        }
    };

    let settings_path = cli.config.clone().unwrap_or_else(Settings::config_path);
    let spinner = Spinner::follow(&app.context().busy, "Carregando...");
    let result = dispatch(&app, cli.command, &settings_path).await;
    drop(spinner);
    print_events(app.take_events());

    match result {
        Ok(()) => 0,
        Err(error) => {
            if already_reported(&error) {
                tracing::debug!(error = %error, "command failed");
            } else {
                eprintln!("error: {error:#}");
            }
            1
        }
    }
}

async fn dispatch(app: &App, command: Command, settings_path: &Path) -> anyhow::Result<()> {
    match command {
        Command::Login(args) => commands::run_login(app, &args).await,
        Command::Logout => commands::run_logout(app),
        Command::List(args) => commands::run_list(app, &args).await,
        Command::Show(args) => commands::run_show(app, args.id).await,
        Command::Create(args) => commands::run_create(app, &args).await,
        Command::Edit(args) => commands::run_edit(app, &args).await,
        Command::Delete(args) => commands::run_delete(app, args.id).await,
        Command::Export(args) => commands::run_export(app, &args).await,
        Command::Submit(args) => commands::run_submit(app, &args).await,
        Command::Config(args) => commands::run_config(app, &args.action, settings_path),
    }
}

/// Settings file, then the command-line overrides.
fn connect(cli: &Cli) -> anyhow::Result<App> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    let settings = settings.with_overrides(Overrides {
        api_url: cli.api_url.clone(),
        request_timeout_secs: cli.timeout_secs,
        page_size: cli.page_size,
        analytics_log: cli.analytics_log.clone(),
    });
    Ok(App::connect(
        settings,
        Arc::new(FileCredentialStore::open_default()),
    )?)
}

/// Failures the controllers already showed to the user.
fn already_reported(error: &anyhow::Error) -> bool {
    if error.downcast_ref::<ApiError>().is_some() {
        return true;
    }
    matches!(
        error.downcast_ref::<AdminError>(),
        Some(AdminError::Api(_) | AdminError::Export { .. } | AdminError::Invalid { .. })
    )
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !cli.verbosity.is_present();
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
