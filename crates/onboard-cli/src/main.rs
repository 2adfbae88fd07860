use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use onboard_core::journey::JourneyType;

mod commands;

#[derive(Parser)]
#[command(name = "onboard")]
#[command(about = "Onboarding journey engine - drive and inspect journeys from the terminal", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the persisted journey state
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create and inspect invite tokens
    Invite {
        #[command(subcommand)]
        action: InviteAction,
    },
    /// Drive the persisted journey
    Journey {
        /// Print the resulting frame as JSON
        #[arg(long, global = true)]
        json: bool,

        #[command(subcommand)]
        action: JourneyAction,
    },
    /// List journey types and their step sequences
    Catalog,
}

#[derive(Subcommand)]
enum InviteAction {
    /// Create an invite token for an employee
    Create {
        /// Journey type (ntb, etb-nk, etb, journey2)
        #[arg(long)]
        journey: JourneyType,
        #[arg(long)]
        employee_id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        /// Prefilled form field as key=value (repeatable)
        #[arg(long = "prefill")]
        prefill: Vec<String>,
    },
    /// Decode a token and print its payload
    Inspect { token: String },
}

#[derive(Subcommand)]
pub(crate) enum JourneyAction {
    /// Show the current step
    Status {
        /// Present the stored journey from its first step; the next advance
        /// returns to the stored position
        #[arg(long)]
        resume: bool,
    },
    /// Advance one step
    Next {
        /// Resume the stored journey: advance from its first step straight
        /// to the stored position
        #[arg(long)]
        resume: bool,
    },
    /// Go back one step
    Back,
    /// Jump to a step by id
    Goto { step_id: String },
    /// Select a journey type
    Select { journey_type: JourneyType },
    /// Choose physical or digital KYC
    Kyc { method: String },
    /// Merge form fields given as key=value
    Set {
        #[arg(required = true)]
        fields: Vec<String>,
    },
    /// Wipe the stored journey
    Reset,
    /// Open a journey link (invite token or invite id)
    Open { param: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Invite { action } => match action {
            InviteAction::Create {
                journey,
                employee_id,
                name,
                email,
                phone,
                prefill,
            } => commands::invite::create(journey, employee_id, name, email, phone, &prefill)?,
            InviteAction::Inspect { token } => commands::invite::inspect(&token)?,
        },
        Commands::Journey { json, action } => {
            commands::journey::run(cli.config, cli.state_dir, action, json).await?
        }
        Commands::Catalog => commands::catalog::list(),
    }

    Ok(())
}
