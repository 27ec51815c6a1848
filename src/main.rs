use std::path::PathBuf;

use anyhow::Context;
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};

mod activity;
mod classify;
mod client;
mod config;
mod emit;
mod error;
mod models;
mod pipeline;
mod report;
mod vocab;

use client::EcosendClient;
use config::Config;
use emit::ReportFormat;
use pipeline::ReportRunner;
use report::ReportKind;

#[derive(Parser)]
#[command(name = "pce-hub-reports")]
#[command(about = "Engagement and membership reports for the PCE Hubs contact list", long_about = None)]
struct Cli {
    /// Directory for generated reports (overrides REPORT_OUTPUT_DIR)
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// Spreadsheet format for generated reports
    #[arg(long, global = true, value_enum, default_value_t = ReportFormat::Xlsx)]
    format: ReportFormat,

    /// Do not print report tables to the terminal
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Members and 90-day activity per faculty
    FacultyActivity,
    /// Hub membership broken down by UoS status, alumni and faculty
    Membership,
    /// Members and 90-day activity per hub
    HubActivity,
    /// Activity of current UoS contacts against everyone else
    UosActivity,
    /// Generate all four reports, one after another
    All,
    /// Check the API connection and show a sample contact
    Ping,
    /// List the smart groups defined upstream, or count one group's members
    Groups {
        #[arg(long)]
        members: Option<String>,
    },
    /// List the event types tracked upstream
    EventTypes,
    /// List property definitions, e.g. custom-property names
    Properties {
        /// Only custom properties
        #[arg(long)]
        custom: bool,
    },
    /// Check a single contact's event feed for email opens
    Feed {
        #[arg(long)]
        contact: String,
        #[arg(long, default_value_t = 90)]
        since_days: i64,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(out_dir) = cli.out_dir {
        config.output_dir = out_dir;
    }

    let mut runner = ReportRunner::new(config.clone(), cli.format);
    if cli.quiet {
        runner = runner.quiet();
    }

    match cli.command {
        Commands::FacultyActivity => {
            exported(ReportKind::FacultyActivity, runner.faculty_activity())?
        }
        Commands::Membership => {
            exported(ReportKind::MembershipBreakdown, runner.membership_breakdown())?
        }
        Commands::HubActivity => exported(ReportKind::HubActivity, runner.hub_activity())?,
        Commands::UosActivity => exported(ReportKind::UosActivity, runner.uos_activity())?,
        Commands::All => {
            let mut failed = 0usize;
            for kind in ReportKind::ALL {
                if let Err(err) = exported(kind, runner.generate(kind)) {
                    eprintln!("{err:#}");
                    failed += 1;
                }
            }
            if failed > 0 {
                anyhow::bail!("{failed} of {} reports failed", ReportKind::ALL.len());
            }
        }
        Commands::Ping => {
            let client = EcosendClient::from_config(&config)?;
            let contacts = client
                .fetch_all_contacts(None)
                .context("failed to connect to Ecosend")?;
            println!("Connected. Found {} contacts.", contacts.len());

            if let Some(sample) = contacts.first() {
                println!("Sample contact:");
                println!("  - id: {}", sample.id.as_deref().unwrap_or("-"));
                println!("  - email: {}", sample.email);
                println!("  - smart groups: {}", sample.membership_tags.len());
                println!(
                    "  - last activity: {}",
                    sample.last_activity.as_deref().unwrap_or("-")
                );
                println!("  - custom properties: {}", sample.custom_properties.len());
            }
        }
        Commands::Groups { members } => {
            let client = EcosendClient::from_config(&config)?;
            match members {
                Some(group_id) => {
                    let contacts = client
                        .fetch_smart_group_contacts(&group_id, Some("email"))
                        .with_context(|| format!("failed to list members of {group_id}"))?;
                    println!("Smart group {group_id} has {} members.", contacts.len());
                }
                None => {
                    let groups = client
                        .fetch_smart_groups()
                        .context("failed to list smart groups")?;
                    println!("{}", serde_json::to_string_pretty(&groups)?);
                }
            }
        }
        Commands::EventTypes => {
            let client = EcosendClient::from_config(&config)?;
            let event_types = client
                .fetch_event_types()
                .context("failed to list event types")?;
            println!("{}", serde_json::to_string_pretty(&event_types)?);
        }
        Commands::Properties { custom } => {
            let client = EcosendClient::from_config(&config)?;
            let properties = client
                .fetch_property_types(custom)
                .context("failed to list property types")?;
            println!("{}", serde_json::to_string_pretty(&properties)?);
        }
        Commands::Feed {
            contact,
            since_days,
        } => {
            let client = EcosendClient::from_config(&config)?;
            let since = Utc::now() - Duration::days(since_days.max(1));
            if activity::feed_shows_open_activity(&client, &contact, since) {
                println!("{contact}: email opens found since {}.", since.date_naive());
            } else {
                println!("{contact}: no email opens found since {}.", since.date_naive());
            }
        }
    }

    Ok(())
}

fn exported(kind: ReportKind, result: error::Result<PathBuf>) -> anyhow::Result<()> {
    let path = result.with_context(|| format!("failed to generate {} report", kind.title()))?;
    println!("Report exported to: {}", path.display());
    Ok(())
}
