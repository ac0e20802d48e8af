//! # kyb: command-line KYB review
//!
//! Main entry point for the `kyb` tool. It talks to the KYB backend to manage
//! companies and documents, generates reports, and runs review sessions.

mod config;
mod credentials;
mod render;
mod review;

use anyhow::{Context, Result};
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use credentials::TokenStore;
use kyb_review::present::format_file_size;
use kyb_review::{ApiClient, Credentials, EditableField, KybBackend};
use review::{in_command_line_order, parse_assignment, ReviewAction, ReviewPlan};
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a YAML config file (defaults to ./kyb.yml when present)
    #[arg(long, global = true, env = "KYB_CONFIG")]
    config: Option<String>,
    /// Access token to use instead of the one stored by `kyb login`
    #[arg(long, global = true, env = "KYB_TOKEN", hide_env_values = true)]
    token: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in to the KYB backend and store the access token
    Login(LoginArgs),
    /// Remove the stored access token
    Logout,
    /// Check that the backend is reachable
    Health,
    /// Manage companies
    Companies {
        #[command(subcommand)]
        command: CompanyCommands,
    },
    /// Upload and list supporting documents
    Documents {
        #[command(subcommand)]
        command: DocumentCommands,
    },
    /// Generate a KYB report for a company
    Generate(GenerateArgs),
    /// List the report fields that can be edited during review
    Fields,
    /// Review a generated report: apply corrections and optionally submit
    Review(ReviewArgs),
}

#[derive(Parser, Debug)]
struct LoginArgs {
    #[arg(long, short)]
    username: String,
    /// Read from stdin when omitted
    #[arg(long, env = "KYB_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand, Debug)]
enum CompanyCommands {
    /// List all companies
    List,
    /// Create a company
    Create { name: String },
    /// Delete a company and its documents
    Delete { company_id: String },
}

#[derive(Subcommand, Debug)]
enum DocumentCommands {
    /// Upload one or more documents for a company
    Upload {
        company_id: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List the documents uploaded for a company
    List { company_id: String },
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    company_id: String,
    /// Write the raw report JSON to this file for a later `review --report`
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ReviewArgs {
    company_id: String,
    /// Review a report saved by `generate --output` instead of generating one
    #[arg(long)]
    report: Option<PathBuf>,
    /// Edit a field, e.g. `--set financialIndicators.annualRevenue.value=1500`
    #[arg(long = "set", value_name = "PATH=VALUE", value_parser = parse_assignment)]
    sets: Vec<(EditableField, String)>,
    /// Restore a field to its report value
    #[arg(long = "revert", value_name = "PATH")]
    reverts: Vec<EditableField>,
    /// Enter and cancel edit mode for a field, discarding any edit
    #[arg(long = "cancel", value_name = "PATH")]
    cancels: Vec<EditableField>,
    /// Submit the reviewed report
    #[arg(long)]
    submit: bool,
    /// Confirm the attestation statement without prompting
    #[arg(long, requires = "submit")]
    attest: bool,
    /// Write the submission payload to this file
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl ReviewArgs {
    /// Builds the plan, interleaving `--set`, `--revert` and `--cancel` in the
    /// order they appeared on the command line.
    fn into_plan(self, matches: Option<&ArgMatches>) -> ReviewPlan {
        let indices = |id: &str| -> Vec<usize> {
            matches
                .and_then(|m| m.indices_of(id))
                .map(|indices| indices.collect())
                .unwrap_or_default()
        };

        let mut indexed = Vec::new();
        indexed.extend(
            indices("sets")
                .into_iter()
                .zip(self.sets.into_iter().map(|(f, v)| ReviewAction::Set(f, v))),
        );
        indexed.extend(
            indices("reverts")
                .into_iter()
                .zip(self.reverts.into_iter().map(ReviewAction::Revert)),
        );
        indexed.extend(
            indices("cancels")
                .into_iter()
                .zip(self.cancels.into_iter().map(ReviewAction::Cancel)),
        );

        ReviewPlan {
            report: self.report,
            actions: in_command_line_order(indexed),
            output: self.output,
            submit: self.submit,
            attest: self.attest,
        }
    }
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let config = config::get_config(cli.config.as_deref())?;

    // Setup logging to a file
    let log_file = File::create(&config.log_file)
        .with_context(|| format!("Failed to create log file '{}'", config.log_file))?;
    let subscriber = fmt::Subscriber::builder()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let client = ApiClient::with_timeout(
        &config.api_base_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let store = TokenStore::new(&config.keyring_service);
    let token = cli.token.clone();
    let credentials = || store.load(token.as_deref());
    info!("Using KYB backend at {}", client.base_url());

    let (label, result) = match cli.command {
        Commands::Login(args) => ("Login", handle_login(&client, &store, args).await),
        Commands::Logout => ("Logout", handle_logout(&store)),
        Commands::Health => ("Health check", handle_health(&client, credentials).await),
        Commands::Companies { command } => {
            ("Command", handle_companies(&client, credentials, command).await)
        }
        Commands::Documents { command } => {
            ("Command", handle_documents(&client, credentials, command).await)
        }
        Commands::Generate(args) => ("Generate", handle_generate(&client, credentials, args).await),
        Commands::Fields => {
            print!("{}", render::editable_fields());
            ("Fields", Ok(()))
        }
        Commands::Review(args) => {
            let company_id = args.company_id.clone();
            let plan = args.into_plan(matches.subcommand_matches("review"));
            (
                "Review",
                review::run(&company_id, &plan, &client, credentials).await,
            )
        }
    };

    if let Err(e) = result {
        eprintln!("{label} failed: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

// --- Command Handlers ---

async fn handle_login(client: &ApiClient, store: &TokenStore, args: LoginArgs) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => {
            print!("Password: ");
            io::stdout().flush()?;
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    info!("Starting login for '{}'...", args.username);
    let token = client.login(&args.username, &password).await?;
    store.save(&Credentials::from(token))?;
    println!("✅ Login successful!");
    Ok(())
}

fn handle_logout(store: &TokenStore) -> Result<()> {
    if store.clear()? {
        println!("Logged out.");
    } else {
        println!("No stored login found.");
    }
    Ok(())
}

async fn handle_health<F>(client: &ApiClient, credentials: F) -> Result<()>
where
    F: FnOnce() -> Result<Credentials>,
{
    let health = client.health(&credentials()?).await?;
    println!("Backend at {} is {}", client.base_url(), health.status);
    Ok(())
}

async fn handle_companies<F>(client: &ApiClient, credentials: F, command: CompanyCommands) -> Result<()>
where
    F: FnOnce() -> Result<Credentials>,
{
    let credentials = credentials()?;
    match command {
        CompanyCommands::List => {
            let companies = client.list_companies(&credentials).await?;
            print!("{}", render::companies(&companies));
        }
        CompanyCommands::Create { name } => {
            let company = client.create_company(&credentials, &name).await?;
            println!("✅ Created company '{}' ({})", company.name, company.company_id);
        }
        CompanyCommands::Delete { company_id } => {
            let response = client.delete_company(&credentials, &company_id).await?;
            println!("{}", response.message);
        }
    }
    Ok(())
}

async fn handle_documents<F>(client: &ApiClient, credentials: F, command: DocumentCommands) -> Result<()>
where
    F: FnOnce() -> Result<Credentials>,
{
    let credentials = credentials()?;
    match command {
        DocumentCommands::Upload { company_id, files } => {
            for file in &files {
                let size = std::fs::metadata(file)
                    .with_context(|| format!("Cannot read '{}'", file.display()))?
                    .len();
                println!("Uploading {} ({})", file.display(), format_file_size(size));
            }
            let response = client
                .upload_documents(&credentials, &company_id, &files)
                .await?;
            print!("{}", render::upload_summary(&response));
        }
        DocumentCommands::List { company_id } => {
            let documents = client.list_documents(&credentials, &company_id).await?;
            print!("{}", render::company_documents(&documents));
        }
    }
    Ok(())
}

async fn handle_generate<F>(client: &ApiClient, credentials: F, args: GenerateArgs) -> Result<()>
where
    F: FnOnce() -> Result<Credentials>,
{
    println!("Generating KYB report for {}...", args.company_id);
    let snapshot = client.generate_kyb(&credentials()?, &args.company_id).await?;
    let company = snapshot.company();
    println!(
        "✅ Report generated: {} editable fields, {} documents, {} exceptions, {} missing fields.",
        company.editable_fields().len(),
        company.documents.len(),
        company.compliance_indicators.exceptions.len(),
        company.missing_fields.len()
    );

    if let Some(path) = &args.output {
        std::fs::write(path, serde_json::to_string_pretty(snapshot.raw())?)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}
