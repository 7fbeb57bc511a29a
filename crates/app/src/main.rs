mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dialoguer::Password;
use review_core::model::{PaperId, QuestionId};
use services::{AdminGate, AppServices, Clock, ReviewSettings};
use tracing_subscriber::EnvFilter;

/// Admin password for non-interactive exports; prompted for when unset.
const EXPORT_PASSWORD_ENV: &str = "REVIEW_EXPORT_PASSWORD";

/// Review research papers against a fixed questionnaire.
#[derive(Parser, Debug)]
#[command(name = "review", version, about, long_about = None)]
struct Cli {
    /// Response document (default: $REVIEW_RESPONSES_PATH or responses.json)
    #[arg(long, global = true)]
    responses: Option<PathBuf>,

    /// Paper and question config (default: $REVIEW_CONFIG_PATH or papers_config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List papers with their review status
    Papers,
    /// Show a paper's questions and saved answers
    Show { paper: PaperId },
    /// Answer questions for a paper
    Answer {
        paper: PaperId,
        /// `<question>=<value>`, where question is `N` or `q_N`
        #[arg(
            long = "set",
            value_name = "QUESTION=VALUE",
            required = true,
            value_parser = commands::parse_assignment
        )]
        answers: Vec<(QuestionId, String)>,
    },
    /// Export every stored response (admin only)
    Export {
        #[arg(long)]
        user: String,
        /// Directory the export file is written to
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Show where a paper's PDF can be opened from
    Pdf { paper: PaperId },
}

fn log_filter(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(verbose, quiet)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = ReviewSettings::from_env().with_overrides(cli.responses, cli.config);
    tracing::debug!(
        responses = %settings.responses_path.display(),
        config = %settings.config_path.display(),
        "resolved paths"
    );
    let services =
        AppServices::new_json(&settings, Clock::default_clock(), AdminGate::from_env()).await?;

    match cli.command {
        Command::Papers => commands::papers(&services).await,
        Command::Show { paper } => commands::show(&services, paper).await,
        Command::Answer { paper, answers } => commands::answer(&services, paper, &answers).await,
        Command::Export { user, out } => {
            let password = match std::env::var(EXPORT_PASSWORD_ENV) {
                Ok(password) => password,
                Err(_) => Password::new().with_prompt("Admin password").interact()?,
            };
            commands::export(&services, &user, &password, &out).await
        }
        Command::Pdf { paper } => commands::pdf(&services, paper).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(err) = run(cli).await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
