use crate::admin::{run_admin, AdminCommand};
use crate::apply::{run_apply, ApplyArgs};
use crate::email::{run_email, EmailCommand};
use crate::server;
use admissions::config::AppConfig;
use admissions::error::AppError;
use admissions::telemetry::{self, LogSink};
use admissions::workflows::Notice;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Admissions Portal",
    about = "Drive the admissions portal workflows and run a local stub backend",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the in-memory stub backend (default command)
    Serve(ServeArgs),
    /// Walk a draft through the intake wizard and submit it
    Apply(ApplyArgs),
    /// List, edit, and export admin collections
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
    /// Send email through the portal backend
    Email {
        #[command(subcommand)]
        command: EmailCommand,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Start without the sample contacts, customers, and posts
    #[arg(long)]
    pub(crate) empty: bool,
}

/// Configuration and logging for the client-side commands.
pub(crate) fn client_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogSink::Cli)?;
    Ok(config)
}

pub(crate) fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        if notice.is_success() {
            println!("[{}] {}", notice.kind.label(), notice.message);
        } else {
            eprintln!("[{}] {}", notice.kind.label(), notice.message);
        }
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Apply(args) => run_apply(args).await,
        Command::Admin { command } => run_admin(command).await,
        Command::Email { command } => run_email(command).await,
    }
}
