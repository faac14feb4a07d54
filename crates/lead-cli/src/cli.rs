//! CLI argument definitions for the lead desk.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use lead_model::LeadId;

#[derive(Parser)]
#[command(
    name = "lead-desk",
    version,
    about = "Lead Desk - capture and manage marketing leads",
    long_about = "Capture leads through the public form and manage them from the \
                  admin dashboard.\n\n\
                  Talks to the lead REST API configured in settings.toml, \
                  LEAD_DESK_API_URL or --api-url."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Base URL of the lead API.
    #[arg(long = "api-url", env = "LEAD_DESK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// HTTP request timeout in seconds.
    #[arg(long = "timeout", value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Dashboard rows per page.
    #[arg(long = "page-size", value_name = "ROWS", global = true)]
    pub page_size: Option<usize>,

    /// Append analytics records to this JSON lines file.
    #[arg(long = "analytics-log", value_name = "PATH", global = true)]
    pub analytics_log: Option<PathBuf>,

    /// Settings file to use instead of the default location.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include lead emails and phone numbers in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in to the admin area and remember the credential.
    Login(LoginArgs),

    /// Forget the stored credential.
    Logout,

    /// Show one page of the lead dashboard.
    List(ListArgs),

    /// Show every field of a lead.
    Show(IdArgs),

    /// Insert a new lead as an administrator.
    Create(ContactArgs),

    /// Change fields of an existing lead.
    Edit(EditArgs),

    /// Delete a lead.
    Delete(IdArgs),

    /// Download every lead as CSV.
    Export(ExportArgs),

    /// Submit the public capture form, as a visitor would.
    Submit(SubmitArgs),

    /// Show or save the settings in effect.
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    /// Password (prefer the environment variable over the flag).
    #[arg(long, env = "LEAD_DESK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Args)]
pub struct ListArgs {
    /// Page number, starting at 1.
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (default from settings).
    #[arg(long)]
    pub limit: Option<usize>,

    /// Filter by name or email.
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct IdArgs {
    #[arg(value_name = "ID")]
    pub id: LeadId,
}

/// Contact fields of a lead.
#[derive(Args, Default)]
pub struct ContactArgs {
    #[arg(long)]
    pub nome: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub telefone: Option<String>,

    #[arg(long)]
    pub cargo: Option<String>,

    /// Birth date, e.g. 1990-05-17.
    #[arg(long = "data-nascimento", value_name = "DATE")]
    pub data_nascimento: Option<String>,

    #[arg(long)]
    pub mensagem: Option<String>,
}

impl ContactArgs {
    /// `(field, value)` for every flag that was given.
    pub fn changes(&self) -> Vec<(&'static str, &str)> {
        use lead_model::fields::{CARGO, DATA_NASCIMENTO, EMAIL, MENSAGEM, NOME, TELEFONE};
        [
            (NOME, &self.nome),
            (EMAIL, &self.email),
            (TELEFONE, &self.telefone),
            (CARGO, &self.cargo),
            (DATA_NASCIMENTO, &self.data_nascimento),
            (MENSAGEM, &self.mensagem),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|value| (name, value)))
        .collect()
    }
}

#[derive(Args)]
pub struct EditArgs {
    #[arg(value_name = "ID")]
    pub id: LeadId,

    #[command(flatten)]
    pub fields: ContactArgs,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Directory for the CSV file.
    #[arg(long, short, value_name = "DIR", default_value = ".")]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub fields: ContactArgs,

    /// Landing-page query parameters such as utm_source=google (repeatable).
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the settings file location and the settings in effect.
    Show,

    /// Write the settings in effect (file plus flags) to the settings file.
    Save,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn params_need_a_key() {
        assert_eq!(
            parse_param("utm_source=google"),
            Ok(("utm_source".to_string(), "google".to_string()))
        );
        assert_eq!(
            parse_param("gclid=a=b"),
            Ok(("gclid".to_string(), "a=b".to_string()))
        );
        assert!(parse_param("=x").is_err());
        assert!(parse_param("utm_source").is_err());
    }

    #[test]
    fn setting_flags_are_global() {
        let cli = Cli::try_parse_from([
            "lead-desk",
            "config",
            "save",
            "--page-size",
            "25",
            "--analytics-log",
            "/tmp/analytics.jsonl",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigArgs {
                action: ConfigAction::Save
            })
        ));
        assert_eq!(cli.page_size, Some(25));
        assert_eq!(
            cli.analytics_log,
            Some(PathBuf::from("/tmp/analytics.jsonl"))
        );
    }

    #[test]
    fn edit_collects_given_fields() {
        let cli = Cli::try_parse_from([
            "lead-desk",
            "edit",
            "7",
            "--cargo",
            "Diretora",
            "--data-nascimento",
            "1990-05-17",
        ])
        .unwrap();
        let Command::Edit(args) = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(args.id, LeadId(7));
        assert_eq!(
            args.fields.changes(),
            vec![("cargo", "Diretora"), ("dataNascimento", "1990-05-17")]
        );
    }
}
